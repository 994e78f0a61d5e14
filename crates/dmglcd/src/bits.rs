//! Fixed-width bit vectors used as pixel planes.
//!
//! A [`BitVector`] is a run of bits whose length is a multiple of 32,
//! stored as little-endian `u32` blocks: bit `i` lives in block `i / 32`
//! at position `i % 32`. Vectors are immutable once built; every operation
//! returns a new vector.
mod builder;

use std::fmt;
use std::ops::Not;

pub use builder::BitVectorBuilder;

use crate::error::{ensure_argument, Result};

const BLOCK_BITS: usize = u32::BITS as usize;

/// How bits outside `[0, size)` are seen by an extraction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Extension {
    /// Everything outside the vector reads as 0.
    ZeroPadded,
    /// The vector repeats forever in both directions.
    Wrapped,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct BitVector {
    blocks: Vec<u32>,
}

fn check_size(size: usize) -> Result<()> {
    ensure_argument!(
        size % BLOCK_BITS == 0,
        "bit vector size must be a multiple of {}, got {}",
        BLOCK_BITS,
        size
    );
    Ok(())
}

impl BitVector {
    /// A vector of `size` bits, all set to `fill`.
    pub fn new(size: usize, fill: bool) -> Result<Self> {
        check_size(size)?;
        let block = if fill { u32::MAX } else { 0 };
        Ok(Self {
            blocks: vec![block; size / BLOCK_BITS],
        })
    }

    /// A vector of `size` cleared bits.
    pub fn zeroed(size: usize) -> Result<Self> {
        Self::new(size, false)
    }

    pub(crate) fn from_blocks(blocks: Vec<u32>) -> Self {
        Self { blocks }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.blocks.len() * BLOCK_BITS
    }

    pub fn test_bit(&self, index: usize) -> Result<bool> {
        ensure_argument!(
            index < self.size(),
            "bit index {} out of range for a {}-bit vector",
            index,
            self.size()
        );
        let block = self.blocks[index / BLOCK_BITS];
        Ok(block >> (index % BLOCK_BITS) & 1 == 1)
    }

    pub fn and(&self, other: &BitVector) -> Result<BitVector> {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &BitVector) -> Result<BitVector> {
        self.zip_with(other, |a, b| a | b)
    }

    /// `and` for operands already known to share a size.
    pub(crate) fn and_aligned(&self, other: &BitVector) -> BitVector {
        self.zip_aligned(other, |a, b| a & b)
    }

    /// `or` for operands already known to share a size.
    pub(crate) fn or_aligned(&self, other: &BitVector) -> BitVector {
        self.zip_aligned(other, |a, b| a | b)
    }

    fn zip_with(&self, other: &BitVector, op: impl Fn(u32, u32) -> u32) -> Result<BitVector> {
        ensure_argument!(
            self.size() == other.size(),
            "bit vector sizes differ: {} vs {}",
            self.size(),
            other.size()
        );
        Ok(self.zip_aligned(other, op))
    }

    fn zip_aligned(&self, other: &BitVector, op: impl Fn(u32, u32) -> u32) -> BitVector {
        debug_assert_eq!(self.size(), other.size());
        let blocks = self
            .blocks
            .iter()
            .zip(&other.blocks)
            .map(|(&a, &b)| op(a, b))
            .collect();
        Self { blocks }
    }

    /// Extract `size` bits starting at `index` from the zero-extended
    /// vector. `index` may be negative or past the end.
    pub fn extract_zero_extended(&self, index: isize, size: usize) -> Result<BitVector> {
        check_size(size)?;
        Ok(self.extract(index, size, Extension::ZeroPadded))
    }

    /// Extract `size` bits starting at `index` from the infinite repetition
    /// of this vector.
    pub fn extract_wrapped(&self, index: isize, size: usize) -> Result<BitVector> {
        check_size(size)?;
        Ok(self.extract(index, size, Extension::Wrapped))
    }

    /// Shift towards higher indices by `amount` (towards lower indices when
    /// negative). Vacated bits are 0.
    pub fn shift(&self, amount: isize) -> BitVector {
        self.extract(-amount, self.size(), Extension::ZeroPadded)
    }

    fn extract(&self, index: isize, size: usize, extension: Extension) -> BitVector {
        let block_bits = BLOCK_BITS as isize;
        let first_block = index.div_euclid(block_bits);
        let offset = index.rem_euclid(block_bits) as u32;

        let blocks = (0..(size / BLOCK_BITS) as isize)
            .map(|i| {
                let low = self.extended_block(first_block + i, extension);
                if offset == 0 {
                    low
                } else {
                    let high = self.extended_block(first_block + i + 1, extension);
                    (low >> offset) | (high << (u32::BITS - offset))
                }
            })
            .collect();
        BitVector { blocks }
    }

    /// Block `index` of the extended vector.
    fn extended_block(&self, index: isize, extension: Extension) -> u32 {
        let len = self.blocks.len() as isize;
        match extension {
            Extension::ZeroPadded if (0..len).contains(&index) => self.blocks[index as usize],
            Extension::ZeroPadded => 0,
            Extension::Wrapped if len == 0 => 0,
            Extension::Wrapped => self.blocks[index.rem_euclid(len) as usize],
        }
    }
}

impl Not for &BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        BitVector {
            blocks: self.blocks.iter().map(|b| !b).collect(),
        }
    }
}

impl Not for BitVector {
    type Output = BitVector;

    fn not(mut self) -> BitVector {
        self.blocks.iter_mut().for_each(|b| *b = !*b);
        self
    }
}

impl fmt::Display for BitVector {
    /// Bits from the highest index down to bit 0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.blocks.iter().rev() {
            write!(f, "{:032b}", block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn vector(blocks: &[u32]) -> BitVector {
        BitVector::from_blocks(blocks.to_vec())
    }

    #[test]
    fn size_must_be_a_multiple_of_32() {
        assert!(BitVector::new(0, false).is_ok());
        assert!(BitVector::new(64, true).is_ok());
        assert!(matches!(
            BitVector::new(33, false),
            Err(Error::InvalidArgument(_))
        ));
        assert!(BitVector::zeroed(31).is_err());
    }

    #[test]
    fn complement_swaps_all_clear_and_all_set() {
        for size in [0, 32, 64, 160, 256] {
            let clear = BitVector::new(size, false).unwrap();
            let set = BitVector::new(size, true).unwrap();
            assert_eq!(!&clear, set);
            assert_eq!(!set.clone(), clear);
        }
    }

    #[test]
    fn test_bit_reads_little_endian_blocks() {
        let v = vector(&[0b1010, 0x8000_0000]);
        assert!(!v.test_bit(0).unwrap());
        assert!(v.test_bit(1).unwrap());
        assert!(v.test_bit(3).unwrap());
        assert!(v.test_bit(63).unwrap());
        assert!(!v.test_bit(62).unwrap());
        assert!(v.test_bit(64).is_err());
    }

    #[test]
    fn and_or_require_equal_sizes() {
        let a = vector(&[0b1100]);
        let b = vector(&[0b1010]);
        assert_eq!(a.and(&b).unwrap(), vector(&[0b1000]));
        assert_eq!(a.or(&b).unwrap(), vector(&[0b1110]));

        let wide = BitVector::zeroed(64).unwrap();
        assert!(matches!(a.and(&wide), Err(Error::InvalidArgument(_))));
        assert!(a.or(&wide).is_err());
    }

    #[test]
    fn zero_extended_extraction_pads_with_zeroes() {
        let v = vector(&[0xFFFF_FFFF, 0x0000_00FF]);
        // Window straddling the end of the vector.
        assert_eq!(
            v.extract_zero_extended(48, 32).unwrap(),
            vector(&[0x0000_0000])
        );
        assert_eq!(
            v.extract_zero_extended(40, 32).unwrap(),
            vector(&[0x0000_0000])
        );
        assert_eq!(
            v.extract_zero_extended(36, 32).unwrap(),
            vector(&[0x0000_000F])
        );
        // Negative start shifts the data up.
        assert_eq!(
            v.extract_zero_extended(-4, 32).unwrap(),
            vector(&[0xFFFF_FFF0])
        );
        assert_eq!(
            v.extract_zero_extended(-40, 64).unwrap(),
            vector(&[0x0000_0000, 0xFFFF_FF00])
        );
        assert!(v.extract_zero_extended(0, 16).is_err());
    }

    #[test]
    fn wrapped_extraction_repeats_the_vector() {
        let v = vector(&[0x0000_000F, 0xF000_0000]);
        assert_eq!(v.extract_wrapped(0, 64).unwrap(), v);
        // Bit 63 lands at bit 0 when starting one bit before the vector.
        assert_eq!(v.extract_wrapped(-1, 32).unwrap(), vector(&[0x0000_001F]));
        assert_eq!(v.extract_wrapped(64, 32).unwrap(), vector(&[0x0000_000F]));
        assert_eq!(
            v.extract_wrapped(-64, 96).unwrap(),
            vector(&[0x0000_000F, 0xF000_0000, 0x0000_000F])
        );
        assert_eq!(
            v.extract_wrapped(60, 32).unwrap(),
            vector(&[0x0000_00FF])
        );
    }

    #[test]
    fn identity_extraction_and_zero_shift() {
        let v = vector(&[0xDEAD_BEEF, 0x0123_4567, 0x89AB_CDEF]);
        assert_eq!(v.extract_wrapped(0, v.size()).unwrap(), v);
        assert_eq!(v.extract_zero_extended(0, v.size()).unwrap(), v);
        assert_eq!(v.shift(0), v);
    }

    #[test]
    fn shift_moves_bits_towards_higher_indices() {
        let v = vector(&[0x8000_0001, 0x0000_0000]);
        assert_eq!(v.shift(1), vector(&[0x0000_0002, 0x0000_0001]));
        assert_eq!(v.shift(-1), vector(&[0x4000_0000, 0x0000_0000]));
        assert_eq!(v.shift(33), vector(&[0x0000_0000, 0x0000_0002]));
    }

    #[test]
    fn shifting_by_the_full_size_clears_everything() {
        let v = BitVector::new(160, true).unwrap();
        let cleared = BitVector::zeroed(160).unwrap();
        assert_eq!(v.shift(160), cleared);
        assert_eq!(v.shift(-160), cleared);
        assert_eq!(v.shift(1000), cleared);
    }

    #[test]
    fn display_prints_highest_bit_first() {
        let v = vector(&[0b101]);
        let text = v.to_string();
        assert_eq!(text.len(), 32);
        assert!(text.ends_with("101"));
        assert!(text.starts_with("000"));
    }
}
