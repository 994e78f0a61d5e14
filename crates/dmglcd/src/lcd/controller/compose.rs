use super::{LcdControl, Reg, Renderer, SpriteLayer};
use crate::address_map::{BG_DISPLAY_DATA, TILE_SOURCE};
use crate::error::Result;
use crate::lcd::line::{PixelLine, PixelLineBuilder};
use crate::lcd::LCD_WIDTH;

/// Width of the background and window tile maps in pixels.
const BG_SIZE: usize = 256;
const TILES_PER_ROW: usize = BG_SIZE / 8;
const WX_OFFSET: isize = 7;

impl Renderer {
    /// Compose screen line `line` from the sprite, background and window
    /// layers.
    pub(super) fn compute_line(&mut self, line: usize) -> Result<PixelLine> {
        let lcdc = self.regs.lcdc();
        let blank = PixelLine::blank(LCD_WIDTH)?;

        let (behind, front) = if lcdc.contains(LcdControl::SPRITE_ENABLE) {
            let sprites = self.sprites_intersecting_line(line as u8);
            (
                self.sprite_line(&sprites, line as u8, SpriteLayer::Behind)?,
                self.sprite_line(&sprites, line as u8, SpriteLayer::Front)?,
            )
        } else {
            (blank.clone(), blank.clone())
        };

        let mut pixels = blank.below(&behind)?;

        if lcdc.contains(LcdControl::BG_ENABLE) {
            let row = (line + usize::from(self.regs.get(Reg::Scy))) % BG_SIZE;
            let map = BG_DISPLAY_DATA[lcdc.contains(LcdControl::BG_TILE_MAP) as usize];
            let background = self
                .tile_row(map, row)?
                .extract(isize::from(self.regs.get(Reg::Scx)), LCD_WIDTH)?
                .map_colors(self.regs.get(Reg::Bgp));
            // Background shows where it is opaque or no behind-sprite is.
            let mask = background.opacity().or(&!behind.opacity())?;
            pixels = pixels.below_masked(&background, &mask)?;
        }

        let window_x = isize::from(self.regs.get(Reg::Wx)) - WX_OFFSET;
        let window_start = window_x.max(0) as usize;
        if lcdc.contains(LcdControl::WINDOW_ENABLE)
            && line >= usize::from(self.regs.get(Reg::Wy))
            && window_start < LCD_WIDTH
        {
            let window = self.window_line(window_x)?;
            pixels = pixels.join(&window, window_start)?;
        }

        pixels.below(&front)
    }

    /// Next row of the window, placed so that its left edge is at screen
    /// column `window_x`.
    fn window_line(&mut self, window_x: isize) -> Result<PixelLine> {
        let lcdc = self.regs.lcdc();
        let map = BG_DISPLAY_DATA[lcdc.contains(LcdControl::WINDOW_TILE_MAP) as usize];
        let row = self.window_line % BG_SIZE;
        self.window_line += 1;

        Ok(self
            .tile_row(map, row)?
            .shift(window_x)
            .extract(0, LCD_WIDTH)?
            .map_colors(self.regs.get(Reg::Bgp)))
    }

    /// The full 256-pixel row `row` of the tile map at `map`.
    fn tile_row(&self, map: u16, row: usize) -> Result<PixelLine> {
        let unsigned = self.regs.lcdc().contains(LcdControl::TILE_DATA);
        let tiles = TILE_SOURCE[unsigned as usize];
        let row_in_tile = (row % 8) as u16;
        let map_row = map + (row / 8 * TILES_PER_ROW) as u16;

        let mut builder = PixelLineBuilder::new(BG_SIZE)?;
        for column in 0..TILES_PER_ROW {
            let mut tile = self.vram(map_row + column as u16);
            if !unsigned {
                // Indices 0..=127 live at 0x9000, 128..=255 at 0x8800.
                tile = tile.wrapping_add(0x80);
            }
            let address = tiles + u16::from(tile) * 16 + row_in_tile * 2;
            let lsb = self.vram(address);
            let msb = self.vram(address + 1);
            // Bit 7 of a tile byte is the leftmost pixel.
            builder.set_bytes(column, msb.reverse_bits(), lsb.reverse_bits())?;
        }
        Ok(builder.build())
    }
}
