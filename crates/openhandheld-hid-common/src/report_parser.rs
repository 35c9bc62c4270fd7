//! HID report parsing utilities
//!
//! [`ReportView`] reads fixed offsets and yields zero for anything past the
//! end of the buffer, which is how adapters decode truncated or garbled
//! reports on a best-effort basis. [`ReportParser`] is the strict sequential
//! reader used where a short buffer is a real error.

use crate::{HidCommonError, HidCommonResult};

/// Bounds-tolerant random-access view over a raw report.
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    data: &'a [u8],
}

impl<'a> ReportView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when `offset..offset + len` is fully inside the report.
    pub fn has(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.data.len())
    }

    pub fn u8_at(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    pub fn bit(&self, offset: usize, mask: u8) -> bool {
        self.u8_at(offset) & mask == mask
    }

    pub fn u16_le_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.u8_at(offset), self.u8_at(offset.saturating_add(1))])
    }

    pub fn u16_be_at(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.u8_at(offset), self.u8_at(offset.saturating_add(1))])
    }

    pub fn i16_le_at(&self, offset: usize) -> i16 {
        self.u16_le_at(offset) as i16
    }

    pub fn i16_be_at(&self, offset: usize) -> i16 {
        self.u16_be_at(offset) as i16
    }

    pub fn u32_le_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.u8_at(offset),
            self.u8_at(offset.saturating_add(1)),
            self.u8_at(offset.saturating_add(2)),
            self.u8_at(offset.saturating_add(3)),
        ])
    }

    /// Copy of the report without its first `n` bytes.
    pub fn skip(&self, n: usize) -> ReportView<'a> {
        ReportView::new(self.data.get(n..).unwrap_or(&[]))
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }
}

pub struct ReportParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let value = *self
            .buffer
            .get(self.position)
            .ok_or_else(|| HidCommonError::InvalidReport("Unexpected end of data".to_string()))?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        let lo = self.read_u8()? as u16;
        let hi = self.read_u8()? as u16;
        Ok(lo | (hi << 8))
    }

    pub fn read_i16_le(&mut self) -> HidCommonResult<i16> {
        Ok(self.read_u16_le()? as i16)
    }

    pub fn read_u32_le(&mut self) -> HidCommonResult<u32> {
        let lo = self.read_u16_le()? as u32;
        let hi = self.read_u16_le()? as u32;
        Ok(lo | (hi << 16))
    }

    pub fn read_bytes(&mut self, count: usize) -> HidCommonResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.buffer.len())
            .ok_or_else(|| HidCommonError::InvalidReport("Unexpected end of data".to_string()))?;
        let bytes = self.buffer.get(self.position..end).unwrap_or(&[]);
        self.position = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) {
        self.position = (self.position + count).min(self.buffer.len());
    }
}

pub struct ReportBuilder {
    buffer: Vec<u8>,
}

impl ReportBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.buffer.push(value as u8);
        self
    }

    pub fn write_u16_le(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i16_le(&mut self, value: i16) -> &mut Self {
        self.write_u16_le(value as u16)
    }

    pub fn write_u32_le(&mut self, value: u32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i32_le(&mut self, value: i32) -> &mut Self {
        self.write_u32_le(value as u32)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(data);
        self
    }

    /// Zero-fill up to `len` bytes; longer buffers are left alone.
    pub fn pad_to(&mut self, len: usize) -> &mut Self {
        if self.buffer.len() < len {
            self.buffer.resize(len, 0);
        }
        self
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_reads_past_end_as_zero() {
        let data = [0x34, 0x12];
        let view = ReportView::new(&data);
        assert_eq!(view.u16_le_at(0), 0x1234);
        assert_eq!(view.u16_be_at(0), 0x3412);
        assert_eq!(view.u8_at(2), 0);
        assert_eq!(view.u16_le_at(1), 0x0012);
        assert_eq!(view.i16_le_at(usize::MAX), 0);
        assert!(!view.has(1, 2));
        assert!(view.has(0, 2));
    }

    #[test]
    fn test_view_bits_and_skip() {
        let data = [0x01, 0b1000_0100];
        let view = ReportView::new(&data);
        assert!(view.bit(1, 0b100));
        assert!(!view.bit(1, 0b10));
        assert_eq!(view.skip(1).u8_at(0), 0b1000_0100);
        assert!(view.skip(10).is_empty());
    }

    #[test]
    fn test_report_parser_sequence() -> HidCommonResult<()> {
        let data = [0x01, 0x34, 0x12, 0xFF, 0xFF, 0xAA, 0xBB];
        let mut parser = ReportParser::new(&data);
        assert_eq!(parser.read_u8()?, 0x01);
        assert_eq!(parser.read_u16_le()?, 0x1234);
        assert_eq!(parser.read_i16_le()?, -1);
        assert_eq!(parser.read_bytes(2)?, &[0xAA, 0xBB]);
        assert_eq!(parser.remaining(), 0);
        assert!(parser.read_u8().is_err());
        Ok(())
    }

    #[test]
    fn test_report_parser_short_bytes() {
        let data = [0u8; 3];
        let mut parser = ReportParser::new(&data);
        assert!(parser.read_bytes(4).is_err());
        assert_eq!(parser.remaining(), 3);
    }

    #[test]
    fn test_report_builder() {
        let mut builder = ReportBuilder::with_capacity(8);
        builder.write_u8(0x87).write_u16_le(0x1234).write_i8(-2).pad_to(6);
        assert_eq!(builder.as_slice(), &[0x87, 0x34, 0x12, 0xFE, 0x00, 0x00]);
    }
}
