use bitflags::bitflags;

use super::{Reg, Renderer};
use crate::address_map::TILE_SOURCE;
use crate::error::Result;
use crate::lcd::line::{PixelLine, PixelLineBuilder};
use crate::lcd::LCD_WIDTH;

const OAM_ENTRIES: usize = 40;
const MAX_SPRITES_PER_LINE: usize = 10;
const SPRITE_X_OFFSET: isize = 8;
const SPRITE_Y_OFFSET: i32 = 16;

bitflags! {
    /// Byte 3 of an OAM entry.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpriteAttributes: u8 {
        const OBP1            = 0b0001_0000;
        const FLIP_X          = 0b0010_0000;
        const FLIP_Y          = 0b0100_0000;
        const BEHIND_BG       = 0b1000_0000;
    }
}

/// Decoded OAM entry. `y` and `x` are the raw stored values, offset by 16
/// and 8 from screen coordinates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SpriteEntry {
    pub index: u8,
    pub y: u8,
    pub x: u8,
    pub tile: u8,
    pub attributes: SpriteAttributes,
}

impl SpriteEntry {
    pub fn layer(&self) -> SpriteLayer {
        if self.attributes.contains(SpriteAttributes::BEHIND_BG) {
            SpriteLayer::Behind
        } else {
            SpriteLayer::Front
        }
    }
}

/// Which side of the background a sprite is drawn on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SpriteLayer {
    Behind,
    Front,
}

impl Renderer {
    pub fn sprite(&self, index: usize) -> Option<SpriteEntry> {
        let bytes = self.oam.get(index * 4..index * 4 + 4)?;
        Some(SpriteEntry {
            index: index as u8,
            y: bytes[0],
            x: bytes[1],
            tile: bytes[2],
            attributes: SpriteAttributes::from_bits_retain(bytes[3]),
        })
    }

    /// Up to ten sprites covering screen line `line`, picked in OAM order
    /// and returned by ascending X, OAM index breaking ties.
    pub fn sprites_intersecting_line(&self, line: u8) -> Vec<SpriteEntry> {
        let height = i32::from(self.regs.lcdc().sprite_height());
        let line = i32::from(line);

        let mut sprites: Vec<SpriteEntry> = (0..OAM_ENTRIES)
            .filter_map(|index| self.sprite(index))
            .filter(|sprite| {
                let top = i32::from(sprite.y) - SPRITE_Y_OFFSET;
                top <= line && line < top + height
            })
            .take(MAX_SPRITES_PER_LINE)
            .collect();
        sprites.sort_unstable_by_key(|sprite| u16::from(sprite.x) << 8 | u16::from(sprite.index));
        sprites
    }

    /// Render the `layer` sprites among `sprites` on screen line `line`.
    /// Earlier sprites end up on top.
    pub fn sprite_line(
        &self,
        sprites: &[SpriteEntry],
        line: u8,
        layer: SpriteLayer,
    ) -> Result<PixelLine> {
        let mut pixels = PixelLine::blank(LCD_WIDTH)?;
        for sprite in sprites.iter().rev().filter(|s| s.layer() == layer) {
            pixels = pixels.below(&self.render_sprite(sprite, line)?)?;
        }
        Ok(pixels)
    }

    fn render_sprite(&self, sprite: &SpriteEntry, line: u8) -> Result<PixelLine> {
        let height = self.regs.lcdc().sprite_height();
        let mut row = line.wrapping_sub(sprite.y) & (height - 1);
        if sprite.attributes.contains(SpriteAttributes::FLIP_Y) {
            row = height - 1 - row;
        }
        let address = TILE_SOURCE[1] + u16::from(sprite.tile) * 16 + u16::from(row) * 2;
        let mut lsb = self.vram(address);
        let mut msb = self.vram(address + 1);
        if !sprite.attributes.contains(SpriteAttributes::FLIP_X) {
            lsb = lsb.reverse_bits();
            msb = msb.reverse_bits();
        }

        let palette = if sprite.attributes.contains(SpriteAttributes::OBP1) {
            self.regs.get(Reg::Obp1)
        } else {
            self.regs.get(Reg::Obp0)
        };

        let mut builder = PixelLineBuilder::new(LCD_WIDTH)?;
        builder.set_bytes(0, msb, lsb)?;
        Ok(builder
            .build()
            .map_colors(palette)
            .shift(isize::from(sprite.x) - SPRITE_X_OFFSET))
    }
}
