use bitflags::bitflags;

use crate::address_map::{REGS_LCDC_END, REGS_LCDC_START};
use crate::error::{Error, Result};

/// LCD controller registers, in address order from 0xFF40.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Reg {
    Lcdc,
    Stat,
    Scy,
    Scx,
    Ly,
    Lyc,
    Dma,
    Bgp,
    Obp0,
    Obp1,
    Wy,
    Wx,
}

impl Reg {
    pub const COUNT: usize = 12;

    pub const ALL: [Reg; Reg::COUNT] = [
        Reg::Lcdc,
        Reg::Stat,
        Reg::Scy,
        Reg::Scx,
        Reg::Ly,
        Reg::Lyc,
        Reg::Dma,
        Reg::Bgp,
        Reg::Obp0,
        Reg::Obp1,
        Reg::Wy,
        Reg::Wx,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn address(self) -> u16 {
        REGS_LCDC_START + self as u16
    }

    /// Register mapped at `address`, if any.
    pub fn from_address(address: u16) -> Option<Reg> {
        if (REGS_LCDC_START..REGS_LCDC_END).contains(&address) {
            Reg::ALL.get(usize::from(address - REGS_LCDC_START)).copied()
        } else {
            None
        }
    }
}

/// Flat storage for the twelve LCD registers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RegisterFile {
    values: [u8; Reg::COUNT],
}

impl RegisterFile {
    #[inline]
    pub fn get(&self, reg: Reg) -> u8 {
        self.values[reg.index()]
    }

    #[inline]
    pub fn set(&mut self, reg: Reg, value: u8) {
        self.values[reg.index()] = value;
    }

    pub fn test_bit(&self, reg: Reg, bit: u8) -> bool {
        self.get(reg) >> bit & 1 == 1
    }

    pub fn set_bit(&mut self, reg: Reg, bit: u8, on: bool) {
        let value = self.get(reg);
        let mask = 1 << bit;
        self.set(reg, if on { value | mask } else { value & !mask });
    }

    pub fn lcdc(&self) -> LcdControl {
        LcdControl::from_bits_retain(self.get(Reg::Lcdc))
    }

    pub fn stat(&self) -> LcdStatus {
        LcdStatus::from_bits_retain(self.get(Reg::Stat))
    }
}

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE       = 0b0000_0001;
        const SPRITE_ENABLE   = 0b0000_0010;
        /// 8x16 sprites.
        const SPRITE_SIZE     = 0b0000_0100;
        /// Background map at 0x9C00 instead of 0x9800.
        const BG_TILE_MAP     = 0b0000_1000;
        /// Tile data at 0x8000 (unsigned indices) instead of 0x8800.
        const TILE_DATA       = 0b0001_0000;
        const WINDOW_ENABLE   = 0b0010_0000;
        /// Window map at 0x9C00 instead of 0x9800.
        const WINDOW_TILE_MAP = 0b0100_0000;
        const LCD_ENABLE      = 0b1000_0000;
    }
}

bitflags! {
    /// STAT (0xFF41).
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcdStatus: u8 {
        const MODE_MASK        = 0b0000_0011;
        const LYC_EQUAL_LY     = 0b0000_0100;
        const HBLANK_INTERRUPT = 0b0000_1000;
        const VBLANK_INTERRUPT = 0b0001_0000;
        const OAM_INTERRUPT    = 0b0010_0000;
        const LYC_INTERRUPT    = 0b0100_0000;
    }
}

impl LcdControl {
    pub fn sprite_height(self) -> u8 {
        if self.contains(LcdControl::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }
}

/// Controller modes as encoded in STAT bits 0-1.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamSearch = 2,
    PixelTransfer = 3,
}

impl Mode {
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Mode::HBlank),
            1 => Ok(Mode::VBlank),
            2 => Ok(Mode::OamSearch),
            3 => Ok(Mode::PixelTransfer),
            _ => Err(Error::InvalidArgument(format!(
                "LCD mode must be in 0..=3, got {}",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_follow_address_order() {
        assert_eq!(Reg::Lcdc.address(), 0xFF40);
        assert_eq!(Reg::Ly.address(), 0xFF44);
        assert_eq!(Reg::Wx.address(), 0xFF4B);
        for reg in Reg::ALL {
            assert_eq!(Reg::from_address(reg.address()), Some(reg));
        }
        assert_eq!(Reg::from_address(0xFF3F), None);
        assert_eq!(Reg::from_address(0xFF4C), None);
    }

    #[test]
    fn bits_are_set_and_cleared_in_place() {
        let mut regs = RegisterFile::default();
        regs.set(Reg::Stat, 0b1000_0001);
        regs.set_bit(Reg::Stat, 2, true);
        regs.set_bit(Reg::Stat, 0, false);
        assert_eq!(regs.get(Reg::Stat), 0b1000_0100);
        assert!(regs.test_bit(Reg::Stat, 7));
        assert!(!regs.test_bit(Reg::Stat, 0));
        assert!(regs.stat().contains(LcdStatus::LYC_EQUAL_LY));
    }

    #[test]
    fn lcdc_flags_decode() {
        let mut regs = RegisterFile::default();
        regs.set(Reg::Lcdc, 0x91);
        let lcdc = regs.lcdc();
        assert!(lcdc.contains(LcdControl::LCD_ENABLE | LcdControl::TILE_DATA));
        assert!(lcdc.contains(LcdControl::BG_ENABLE));
        assert!(!lcdc.contains(LcdControl::SPRITE_SIZE));
        assert_eq!(lcdc.sprite_height(), 8);
        assert_eq!((lcdc | LcdControl::SPRITE_SIZE).sprite_height(), 16);
    }

    #[test]
    fn mode_conversion_rejects_out_of_range_values() {
        assert_eq!(Mode::try_from(2).unwrap(), Mode::OamSearch);
        assert_eq!(Mode::PixelTransfer.bits(), 3);
        assert!(matches!(Mode::try_from(4), Err(Error::InvalidArgument(_))));
    }
}
