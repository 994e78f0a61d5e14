use crate::bits::{BitVector, BitVectorBuilder};
use crate::error::{ensure_argument, Result};

/// Palette that maps every color index onto itself.
pub const IDENTITY_PALETTE: u8 = 0b11_10_01_00;

/// One line of pixels as three bit planes.
///
/// Pixel `x` has color index `2 * msb[x] + lsb[x]` and is visible when
/// `opacity[x]` is set; transparent pixels let a lower layer show through.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PixelLine {
    msb: BitVector,
    lsb: BitVector,
    opacity: BitVector,
}

impl PixelLine {
    pub fn new(msb: BitVector, lsb: BitVector, opacity: BitVector) -> Result<Self> {
        ensure_argument!(
            msb.size() == lsb.size() && lsb.size() == opacity.size(),
            "pixel line planes differ in size: msb {}, lsb {}, opacity {}",
            msb.size(),
            lsb.size(),
            opacity.size()
        );
        Ok(Self { msb, lsb, opacity })
    }

    /// Fully transparent line of color 0.
    pub fn blank(size: usize) -> Result<Self> {
        let zero = BitVector::zeroed(size)?;
        Ok(Self {
            msb: zero.clone(),
            lsb: zero.clone(),
            opacity: zero,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.msb.size()
    }

    pub fn msb(&self) -> &BitVector {
        &self.msb
    }

    pub fn lsb(&self) -> &BitVector {
        &self.lsb
    }

    pub fn opacity(&self) -> &BitVector {
        &self.opacity
    }

    /// Color index of pixel `x`.
    pub fn color(&self, x: usize) -> Result<u8> {
        let high = self.msb.test_bit(x)? as u8;
        let low = self.lsb.test_bit(x)? as u8;
        Ok(high << 1 | low)
    }

    pub fn shift(&self, amount: isize) -> PixelLine {
        PixelLine {
            msb: self.msb.shift(amount),
            lsb: self.lsb.shift(amount),
            opacity: self.opacity.shift(amount),
        }
    }

    /// Wrapped extraction of `size` pixels starting at `index`.
    pub fn extract(&self, index: isize, size: usize) -> Result<PixelLine> {
        ensure_argument!(
            size > 0 && size % 32 == 0,
            "line size must be a positive multiple of 32, got {}",
            size
        );
        Ok(PixelLine {
            msb: self.msb.extract_wrapped(index, size)?,
            lsb: self.lsb.extract_wrapped(index, size)?,
            opacity: self.opacity.extract_wrapped(index, size)?,
        })
    }

    /// Replace every color index `i` by bits `2i+1..=2i` of `palette`.
    /// Opacity is left untouched.
    pub fn map_colors(&self, palette: u8) -> PixelLine {
        if palette == IDENTITY_PALETTE {
            return self.clone();
        }

        let not_msb = !&self.msb;
        let not_lsb = !&self.lsb;
        let mut msb = self.msb.clone();
        let mut lsb = self.lsb.clone();

        for source in 0..4u8 {
            // Pixels whose current color is `source`.
            let mask = match source {
                0 => not_msb.and_aligned(&not_lsb),
                1 => not_msb.and_aligned(&self.lsb),
                2 => self.msb.and_aligned(&not_lsb),
                _ => self.msb.and_aligned(&self.lsb),
            };
            let target = palette >> (2 * source) & 0b11;
            lsb = apply_mask(&lsb, &mask, target & 0b01 != 0);
            msb = apply_mask(&msb, &mask, target & 0b10 != 0);
        }

        PixelLine {
            msb,
            lsb,
            opacity: self.opacity.clone(),
        }
    }

    /// Place `upper` on top of `self`: wherever `upper` is opaque its color
    /// wins.
    pub fn below(&self, upper: &PixelLine) -> Result<PixelLine> {
        ensure_argument!(
            self.size() == upper.size(),
            "cannot compose lines of {} and {} pixels",
            self.size(),
            upper.size()
        );
        Ok(self.compose(upper, &upper.opacity))
    }

    /// Like [`below`](Self::below), but `mask` instead of `upper`'s opacity
    /// selects where `upper` replaces `self`. The result is opaque wherever
    /// `self` was or `mask` is set.
    pub fn below_masked(&self, upper: &PixelLine, mask: &BitVector) -> Result<PixelLine> {
        ensure_argument!(
            self.size() == upper.size() && self.size() == mask.size(),
            "cannot compose line of {} pixels with line of {} and mask of {}",
            self.size(),
            upper.size(),
            mask.size()
        );
        Ok(self.compose(upper, mask))
    }

    /// Sizes are checked by the callers.
    fn compose(&self, upper: &PixelLine, mask: &BitVector) -> PixelLine {
        let keep = !mask;
        let pick = |up: &BitVector, own: &BitVector| {
            up.and_aligned(mask).or_aligned(&own.and_aligned(&keep))
        };
        PixelLine {
            msb: pick(&upper.msb, &self.msb),
            lsb: pick(&upper.lsb, &self.lsb),
            opacity: self.opacity.or_aligned(mask),
        }
    }

    /// Pixels `[0, index)` from `self`, `[index, size)` from `other`.
    pub fn join(&self, other: &PixelLine, index: usize) -> Result<PixelLine> {
        ensure_argument!(
            self.size() == other.size(),
            "cannot join lines of {} and {} pixels",
            self.size(),
            other.size()
        );
        ensure_argument!(
            index < self.size(),
            "join index {} out of range for a {}-pixel line",
            index,
            self.size()
        );

        let size = self.size() as isize;
        let index = index as isize;
        // Pushing the tail out the top and back keeps only the head, and
        // the other way round for `other`.
        let head = |v: &BitVector| v.shift(size - index).shift(index - size);
        let tail = |v: &BitVector| v.shift(-index).shift(index);

        Ok(PixelLine {
            msb: head(&self.msb).or_aligned(&tail(&other.msb)),
            lsb: head(&self.lsb).or_aligned(&tail(&other.lsb)),
            opacity: head(&self.opacity).or_aligned(&tail(&other.opacity)),
        })
    }
}

fn apply_mask(plane: &BitVector, mask: &BitVector, set: bool) -> BitVector {
    if set {
        plane.or_aligned(mask)
    } else {
        plane.and_aligned(&!mask)
    }
}

/// Builds a [`PixelLine`] from 8-pixel columns.
///
/// Column `i` covers pixels `8*i..8*i + 8`; bit 0 of each byte is the
/// leftmost pixel of the column. A pixel is opaque iff its color index is
/// non-zero.
#[derive(Debug, Clone)]
pub struct PixelLineBuilder {
    msb: BitVectorBuilder,
    lsb: BitVectorBuilder,
}

impl PixelLineBuilder {
    pub fn new(size: usize) -> Result<Self> {
        ensure_argument!(
            size > 0 && size % 32 == 0,
            "line size must be a positive multiple of 32, got {}",
            size
        );
        Ok(Self {
            msb: BitVectorBuilder::new(size)?,
            lsb: BitVectorBuilder::new(size)?,
        })
    }

    pub fn set_bytes(&mut self, index: usize, msb: u8, lsb: u8) -> Result<&mut Self> {
        self.msb.set_byte(index, msb)?;
        self.lsb.set_byte(index, lsb)?;
        Ok(self)
    }

    pub fn build(self) -> PixelLine {
        let msb = self.msb.build();
        let lsb = self.lsb.build();
        let opacity = msb.or_aligned(&lsb);
        PixelLine { msb, lsb, opacity }
    }
}
