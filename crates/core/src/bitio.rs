//! Bit-level packing for the container payload.
//!
//! `BitWriter` appends variable-length codes to a byte buffer and
//! `BitReader` hands them back one bit at a time for the tree walk.
//! Both use MSB-first order: the first bit written lands in bit 7 of the
//! first byte.
//!
//! # Padding
//! - `BitWriter::finish` fills the last partial byte with zero bits
//! - `BitReader` cannot tell padding from data; the decoder stops at the
//!   end-of-stream code and never looks at the pad bits
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! // 10111 -> padded to 10111000
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert!(reader.read_bit().unwrap());
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a growable byte buffer.
///
/// # Invariants
/// - `pending` holds `pending_bits` bits, left-aligned, and is never full
/// - `pending_bits` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    pending: u8,
    pending_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer whose buffer can hold `bytes` bytes without
    /// reallocating.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if `count > 64`.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            let free = 8 - self.pending_bits as usize;
            let take = remaining.min(free);
            let shift = remaining - take;
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.pending |= chunk << (free - take);
            self.pending_bits += take as u8;
            remaining = shift;

            if self.pending_bits == 8 {
                self.bytes.push(self.pending);
                self.pending = 0;
                self.pending_bits = 0;
            }
        }

        Ok(())
    }

    /// Number of bits written so far, including the partial byte.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.pending_bits as usize
    }

    /// Zero bits `finish` will add to reach a byte boundary.
    pub fn padding_bits(&self) -> usize {
        (8 - self.pending_bits as usize) % 8
    }

    /// Flush the partial byte (zero-padded) and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending_bits > 0 {
            self.bytes.push(self.pending);
        }
        self.bytes
    }
}

/// Reads bits MSB-first from a borrowed byte slice.
///
/// # Invariants
/// - `position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Read one bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once every bit has been consumed.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.position / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = (byte >> (7 - self.position % 8)) & 1;
        self.position += 1;
        Ok(bit == 1)
    }

    /// Read up to 64 bits into the low end of a `u64`.
    ///
    /// Nothing is consumed when the request fails.
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value)
    }

    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Index of the next bit to be read (0 = MSB of the first byte).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whole bytes after the byte holding the last bit read.
    pub fn trailing_bytes(&self) -> usize {
        self.data.len() - self.position.div_ceil(8)
    }

    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}
