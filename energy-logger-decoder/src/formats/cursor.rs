//! Bounded big-endian reader over an in-memory log buffer
//!
//! Every read checks the remaining length first and reports a typed
//! [`DecoderError::Truncated`] naming the field being read, so a short file
//! never surfaces as a panic or as a silently shortened value.

use crate::types::{DecoderError, Result};
use byteorder::{BigEndian, ByteOrder};

/// Forward-only cursor over a byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the first byte of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Absolute offset of the next byte to be read
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True once every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume `len` bytes, failing if fewer are left
    pub fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(DecoderError::Truncated {
                field,
                offset: self.offset,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Consume a fixed number of bytes into an array
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.take(1, field)?[0])
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2, field)?))
    }

    /// Read a 3-byte unsigned integer
    pub fn read_u24(&mut self, field: &'static str) -> Result<u32> {
        Ok(BigEndian::read_u24(self.take(3, field)?))
    }

    /// Read `len` byte-coded-decimal digits.
    ///
    /// Each byte holds one digit 0-9; the value is the left-to-right fold
    /// `value * 10 + digit`.
    pub fn read_bcd(&mut self, len: usize, field: &'static str) -> Result<u64> {
        let start = self.offset;
        let digits = self.take(len, field)?;
        let mut value = 0u64;
        for (i, &digit) in digits.iter().enumerate() {
            if digit > 9 {
                return Err(DecoderError::InvalidDigit {
                    field,
                    offset: start + i,
                    value: digit,
                });
            }
            value = value * 10 + u64::from(digit);
        }
        Ok(value)
    }

    /// Consume everything that is left
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.offset..];
        self.offset = self.data.len();
        bytes
    }
}
