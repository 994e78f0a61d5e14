use crate::address_map::{CARTRIDGE_ROM_END, CARTRIDGE_ROM_SIZE, CARTRIDGE_ROM_START};
use crate::component::Component;
use crate::error::{ensure_argument, Result};

/// Flat 32 KiB ROM cartridge without a memory bank controller.
#[derive(Clone, Debug)]
pub struct Cartridge {
    rom: Box<[u8]>,
}

impl Cartridge {
    pub fn new(rom: Vec<u8>) -> Result<Self> {
        ensure_argument!(
            rom.len() == CARTRIDGE_ROM_SIZE,
            "cartridge ROM must be exactly {} bytes, got {}",
            CARTRIDGE_ROM_SIZE,
            rom.len()
        );
        Ok(Self {
            rom: rom.into_boxed_slice(),
        })
    }

    /// A ROM filled with zeroes.
    pub fn blank() -> Self {
        Self {
            rom: vec![0; CARTRIDGE_ROM_SIZE].into_boxed_slice(),
        }
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }
}

impl Component for Cartridge {
    fn read(&self, address: u16) -> Option<u8> {
        (CARTRIDGE_ROM_START..CARTRIDGE_ROM_END)
            .contains(&address)
            .then(|| self.rom[usize::from(address - CARTRIDGE_ROM_START)])
    }

    fn write(&mut self, _address: u16, _data: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_size_is_fixed() {
        assert!(Cartridge::new(vec![0; 0x4000]).is_err());
        assert!(Cartridge::new(vec![0; 0x8001]).is_err());
        assert!(Cartridge::new(vec![0; 0x8000]).is_ok());
    }

    #[test]
    fn rom_is_read_only() {
        let mut rom = vec![0; CARTRIDGE_ROM_SIZE];
        rom[0x0100] = 0x3C;
        rom[0x7FFF] = 0xC9;
        let mut cartridge = Cartridge::new(rom).unwrap();

        cartridge.write(0x0100, 0x00);
        assert_eq!(cartridge.read(0x0100), Some(0x3C));
        assert_eq!(cartridge.read(0x7FFF), Some(0xC9));
        assert_eq!(cartridge.read(0x8000), None);
    }
}
