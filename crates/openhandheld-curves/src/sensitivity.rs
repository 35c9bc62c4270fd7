//! Custom sensitivity curve keyed by normalized input magnitude.
//!
//! The curve is a list of `(x, y)` nodes. Evaluation takes the two nodes
//! nearest to the input, weights each y by `1 / (1 + distance)`, averages
//! them and doubles the result, so a flat curve of `y = 0.5` is (almost)
//! a unit multiplier.

use serde::{Deserialize, Serialize};

use crate::{CurveError, CurveLut};

/// Number of nearest nodes blended per evaluation.
const BLEND_NODES: usize = 2;

/// One point of a sensitivity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveNode {
    /// Normalized input magnitude, `0..=1`.
    pub x: f64,
    /// Output weight, `0..=2`; `0.5` is neutral.
    pub y: f64,
}

/// Sampled custom sensitivity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurveNode>", into = "Vec<CurveNode>")]
pub struct SensitivityCurve {
    nodes: Vec<CurveNode>,
}

impl SensitivityCurve {
    /// Build a curve from nodes, sorting them by x.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError`] if the list is empty or a node is out of range.
    pub fn new(mut nodes: Vec<CurveNode>) -> Result<Self, CurveError> {
        if nodes.is_empty() {
            return Err(CurveError::InvalidConfiguration(
                "sensitivity curve needs at least one node".into(),
            ));
        }
        for (index, node) in nodes.iter().enumerate() {
            if !(0.0..=1.0).contains(&node.x) {
                return Err(CurveError::NodeOutOfRange {
                    index,
                    coordinate: "x",
                    value: node.x,
                });
            }
            if !(0.0..=2.0).contains(&node.y) {
                return Err(CurveError::NodeOutOfRange {
                    index,
                    coordinate: "y",
                    value: node.y,
                });
            }
        }
        nodes.sort_by(|a, b| a.x.total_cmp(&b.x));
        Ok(Self { nodes })
    }

    /// Eleven evenly spaced neutral nodes.
    pub fn flat() -> Self {
        let nodes = (0..=10)
            .map(|i| CurveNode {
                x: f64::from(i) / 10.0,
                y: 0.5,
            })
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[CurveNode] {
        &self.nodes
    }

    /// Multiplier for a value of `value` out of `max`.
    ///
    /// Positions at or below the first node map to 0, positions at or past
    /// the last node map to 1.
    pub fn evaluate(&self, value: f32, max: f32) -> f32 {
        if max.abs() < f32::EPSILON {
            return 0.0;
        }
        let position = f64::from((value / max).abs());
        let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) else {
            return 0.0;
        };
        if position.is_nan() || position <= first.x {
            return 0.0;
        }
        if position >= last.x {
            return 1.0;
        }

        let mut nearest: Vec<(f64, f64)> = self
            .nodes
            .iter()
            .map(|node| ((node.x - position).abs(), node.y))
            .collect();
        nearest.sort_by(|a, b| a.0.total_cmp(&b.0));

        let blended: f64 = nearest
            .iter()
            .take(BLEND_NODES)
            .map(|(distance, y)| y / (1.0 + distance))
            .sum();

        (blended / BLEND_NODES as f64 * 2.0) as f32
    }

    /// Sample into a lookup table keyed by normalized magnitude.
    pub fn to_lut(&self) -> CurveLut {
        CurveLut::from_fn(|x| self.evaluate(x, 1.0))
    }
}

impl Default for SensitivityCurve {
    fn default() -> Self {
        Self::flat()
    }
}

impl TryFrom<Vec<CurveNode>> for SensitivityCurve {
    type Error = CurveError;

    fn try_from(nodes: Vec<CurveNode>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}

impl From<SensitivityCurve> for Vec<CurveNode> {
    fn from(curve: SensitivityCurve) -> Self {
        curve.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_curve_is_near_unit_on_a_node() {
        let curve = SensitivityCurve::flat();
        // On a node: 0.5/1 + 0.5/1.1, averaged and doubled.
        let expected = ((0.5 + 0.5 / 1.1) / 2.0 * 2.0) as f32;
        assert!((curve.evaluate(0.5, 1.0) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_extremes() {
        let curve = SensitivityCurve::flat();
        assert!(curve.evaluate(0.0, 32767.0).abs() < f32::EPSILON);
        assert!((curve.evaluate(40000.0, 32767.0) - 1.0).abs() < f32::EPSILON);
        assert!((curve.evaluate(-40000.0, 32767.0) - 1.0).abs() < f32::EPSILON);
        assert!(curve.evaluate(1.0, 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_bad_nodes() {
        assert!(SensitivityCurve::new(vec![]).is_err());
        assert_eq!(
            SensitivityCurve::new(vec![CurveNode { x: 0.2, y: 3.0 }]),
            Err(CurveError::NodeOutOfRange {
                index: 0,
                coordinate: "y",
                value: 3.0
            })
        );
    }

    #[test]
    fn test_nodes_are_sorted() -> Result<(), CurveError> {
        let curve = SensitivityCurve::new(vec![
            CurveNode { x: 0.9, y: 1.0 },
            CurveNode { x: 0.1, y: 0.2 },
        ])?;
        assert!(curve.nodes()[0].x < curve.nodes()[1].x);
        Ok(())
    }

    #[test]
    fn test_serde_validates() {
        let bad: Result<SensitivityCurve, _> = serde_json::from_str(r#"[{"x": 4.0, "y": 0.5}]"#);
        assert!(bad.is_err());
        let good: Result<SensitivityCurve, _> = serde_json::from_str(r#"[{"x": 0.5, "y": 0.5}]"#);
        assert!(good.is_ok());
    }
}
