//! DMG address map constants used by the bus-attached components.
//!
//! Ranges are half-open: `*_START` is the first mapped address and `*_END`
//! the first address past the window.

pub const CARTRIDGE_ROM_START: u16 = 0x0000;
pub const CARTRIDGE_ROM_END: u16 = 0x8000;
pub const CARTRIDGE_ROM_SIZE: usize = (CARTRIDGE_ROM_END - CARTRIDGE_ROM_START) as usize;

pub const VIDEO_RAM_START: u16 = 0x8000;
pub const VIDEO_RAM_END: u16 = 0xA000;
pub const VIDEO_RAM_SIZE: usize = (VIDEO_RAM_END - VIDEO_RAM_START) as usize;

pub const WORK_RAM_START: u16 = 0xC000;
pub const WORK_RAM_END: u16 = 0xE000;
pub const WORK_RAM_SIZE: usize = (WORK_RAM_END - WORK_RAM_START) as usize;

pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFE00;

pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFEA0;
pub const OAM_RAM_SIZE: usize = (OAM_END - OAM_START) as usize;

pub const REG_IF: u16 = 0xFF0F;

pub const REGS_LCDC_START: u16 = 0xFF40;
pub const REGS_LCDC_END: u16 = 0xFF4C;

pub const HIGH_RAM_START: u16 = 0xFF80;
pub const HIGH_RAM_END: u16 = 0xFFFF;
pub const HIGH_RAM_SIZE: usize = (HIGH_RAM_END - HIGH_RAM_START) as usize;

pub const REG_IE: u16 = 0xFFFF;

/// Tile data bases, indexed by LCDC bit 4.
///
/// Index 0 is the "signed" bank: tile indices are remapped by 128 so that
/// index 0 lands at 0x9000.
pub const TILE_SOURCE: [u16; 2] = [0x8800, 0x8000];

/// Tile map bases, indexed by LCDC bit 3 (background) or bit 6 (window).
pub const BG_DISPLAY_DATA: [u16; 2] = [0x9800, 0x9C00];
