//! Pre-computed lookup table for tick-path curve evaluation.

/// Pre-computed lookup table (no allocation on lookup).
///
/// Inputs are normalized to `[0,1]`; outputs are whatever the sampled
/// function produced, so multiplier curves above 1.0 are preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveLut {
    table: [f32; 256],
}

impl CurveLut {
    /// LUT size.
    pub const SIZE: usize = 256;

    /// Create a linear (identity) LUT.
    pub fn linear() -> Self {
        Self::from_fn(|x| x)
    }

    /// Sample `f` at 256 evenly spaced inputs in `[0,1]`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        let mut table = [0.0f32; Self::SIZE];

        for (i, entry) in table.iter_mut().enumerate() {
            let input = i as f32 / (Self::SIZE - 1) as f32;
            let value = f(input);
            *entry = if value.is_finite() { value } else { 0.0 };
        }

        Self { table }
    }

    /// Linear interpolation between the two nearest samples.
    #[inline]
    pub fn lookup(&self, input: f32) -> f32 {
        let input = if input.is_nan() {
            0.0
        } else {
            input.clamp(0.0, 1.0)
        };

        let scaled = input * (Self::SIZE - 1) as f32;
        let index_low = (scaled as usize).min(Self::SIZE - 2);
        let fraction = scaled - index_low as f32;

        let low_value = self.table.get(index_low).copied().unwrap_or(0.0);
        let high_value = self.table.get(index_low + 1).copied().unwrap_or(low_value);

        low_value + fraction * (high_value - low_value)
    }

    /// Get the raw table for inspection.
    pub fn table(&self) -> &[f32; 256] {
        &self.table
    }
}

impl Default for CurveLut {
    fn default() -> Self {
        Self::linear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_lut_endpoints() {
        let lut = CurveLut::linear();
        assert!((lut.lookup(0.0) - 0.0).abs() < 1e-6);
        assert!((lut.lookup(1.0) - 1.0).abs() < 1e-6);
        assert!((lut.lookup(0.5) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_lookup_clamps_input() {
        let lut = CurveLut::from_fn(|x| 2.0 * x);
        assert!((lut.lookup(5.0) - 2.0).abs() < 1e-6);
        assert!(lut.lookup(-1.0).abs() < 1e-6);
        assert!(lut.lookup(f32::NAN).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_samples_are_zeroed() {
        let lut = CurveLut::from_fn(|x| if x > 0.5 { f32::INFINITY } else { x });
        assert!(lut.table().iter().all(|v| v.is_finite()));
    }
}
