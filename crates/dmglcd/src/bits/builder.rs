use super::{check_size, BitVector, BLOCK_BITS};
use crate::error::{ensure_argument, Result};

/// Byte-wise construction of a [`BitVector`].
///
/// Byte `i` covers bits `8*i..8*i + 8`, with the byte's bit 0 at the lowest
/// index. `build` consumes the builder, so a finished builder cannot be
/// touched again.
#[derive(Debug, Clone)]
pub struct BitVectorBuilder {
    blocks: Vec<u32>,
}

impl BitVectorBuilder {
    pub fn new(size: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            blocks: vec![0; size / BLOCK_BITS],
        })
    }

    pub fn set_byte(&mut self, index: usize, value: u8) -> Result<&mut Self> {
        let bytes = self.blocks.len() * 4;
        ensure_argument!(
            index < bytes,
            "byte index {} out of range for a {}-byte vector",
            index,
            bytes
        );
        let shift = (index % 4) * 8;
        let block = &mut self.blocks[index / 4];
        *block = (*block & !(0xFF << shift)) | ((value as u32) << shift);
        Ok(self)
    }

    pub fn build(self) -> BitVector {
        BitVector::from_blocks(self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_pack_little_endian() {
        let mut builder = BitVectorBuilder::new(64).unwrap();
        builder
            .set_byte(0, 0xEF)
            .unwrap()
            .set_byte(1, 0xBE)
            .unwrap()
            .set_byte(3, 0xDE)
            .unwrap()
            .set_byte(4, 0x01)
            .unwrap();
        let v = builder.build();
        assert_eq!(v, BitVector::from_blocks(vec![0xDE00_BEEF, 0x0000_0001]));
        assert!(v.test_bit(32).unwrap());
        assert!(v.test_bit(0).unwrap());
        assert!(!v.test_bit(4).unwrap());
    }

    #[test]
    fn rewriting_a_byte_replaces_it() {
        let mut builder = BitVectorBuilder::new(32).unwrap();
        builder.set_byte(2, 0xFF).unwrap();
        builder.set_byte(2, 0x0F).unwrap();
        assert_eq!(builder.build(), BitVector::from_blocks(vec![0x000F_0000]));
    }

    #[test]
    fn out_of_range_byte_is_rejected() {
        let mut builder = BitVectorBuilder::new(32).unwrap();
        assert!(builder.set_byte(4, 0).is_err());
        assert!(BitVectorBuilder::new(12).is_err());
    }
}
