//! The LCD controller: video RAM, OAM, registers and the tick-driven
//! mode state machine that turns them into frames.
//!
//! Timing is counted in machine cycles. A line lasts 114 ticks (20 of OAM
//! search, 43 of pixel transfer, 51 of H-blank) and a frame is 154 lines,
//! the last 10 of which are V-blank.
mod compose;
mod registers;
mod sprites;

pub use registers::{LcdControl, LcdStatus, Mode, Reg, RegisterFile};
pub use sprites::{SpriteAttributes, SpriteEntry, SpriteLayer};

use super::image::{FrameBuffer, FrameBufferBuilder};
use super::{LCD_HEIGHT, LCD_WIDTH};
use crate::address_map::{
    OAM_END, OAM_RAM_SIZE, OAM_START, VIDEO_RAM_END, VIDEO_RAM_SIZE, VIDEO_RAM_START,
};
use crate::bus::Bus;
use crate::component::Component;
use crate::cpu::Interrupt;
use crate::error::{Error, Result};

pub const LINE_TICKS: u64 = 114;
pub const FRAME_TICKS: u64 = LINE_TICKS * 154;

const OAM_SEARCH_TICKS: u64 = 20;
const PIXEL_TRANSFER_TICKS: u64 = 43;
const HBLANK_TICKS: u64 = 51;
const HBLANK_START: u64 = OAM_SEARCH_TICKS + PIXEL_TRANSFER_TICKS;

/// Scheduler value while the display is off.
const IDLE: u64 = u64::MAX;

pub struct Renderer {
    video_ram: Box<[u8]>,
    oam: [u8; OAM_RAM_SIZE],
    regs: RegisterFile,
    /// Next tick, relative to `lcd_on`, at which the state machine acts.
    next_non_idle: u64,
    lcd_on: u64,
    /// Window rows drawn so far in the current frame.
    window_line: usize,
    next_frame: Option<FrameBufferBuilder>,
    current_frame: FrameBuffer,
    /// Offset of the next byte to copy while an OAM DMA is running.
    dma_offset: Option<usize>,
    interrupts: Vec<Interrupt>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            video_ram: vec![0; VIDEO_RAM_SIZE].into_boxed_slice(),
            oam: [0; OAM_RAM_SIZE],
            regs: RegisterFile::default(),
            next_non_idle: IDLE,
            lcd_on: 0,
            window_line: 0,
            next_frame: None,
            current_frame: FrameBuffer::blank(LCD_WIDTH, LCD_HEIGHT)?,
            dma_offset: None,
            interrupts: Vec::new(),
        })
    }

    /// Last completed frame, or a blank one before the first frame ends.
    pub fn current_image(&self) -> &FrameBuffer {
        &self.current_frame
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn mode(&self) -> Mode {
        match self.regs.get(Reg::Stat) & LcdStatus::MODE_MASK.bits() {
            0 => Mode::HBlank,
            1 => Mode::VBlank,
            2 => Mode::OamSearch,
            _ => Mode::PixelTransfer,
        }
    }

    pub fn is_display_on(&self) -> bool {
        self.next_non_idle != IDLE
    }

    pub fn is_dma_active(&self) -> bool {
        self.dma_offset.is_some()
    }

    /// Drain the interrupts raised since the last call, oldest first.
    pub fn take_interrupts(&mut self) -> Vec<Interrupt> {
        std::mem::take(&mut self.interrupts)
    }

    /// Advance by one tick. `bus` is only used to fetch DMA source bytes
    /// the controller does not map itself.
    pub fn cycle(&mut self, tick: u64, bus: &Bus) -> Result<()> {
        if self.next_non_idle == IDLE && self.regs.lcdc().contains(LcdControl::LCD_ENABLE) {
            log::debug!("GB LCD: display on at tick {}", tick);
            self.lcd_on = tick;
            self.next_non_idle = 0;
        }

        if tick < self.lcd_on {
            return Err(Error::InvalidArgument(format!(
                "tick {} is before the display was turned on at {}",
                tick, self.lcd_on
            )));
        }

        if tick - self.lcd_on == self.next_non_idle {
            self.advance(tick - self.lcd_on)?;
        }

        self.step_dma(bus)
    }

    /// Run the state machine step scheduled for relative tick `elapsed`.
    fn advance(&mut self, elapsed: u64) -> Result<()> {
        let frame_tick = elapsed % FRAME_TICKS;
        let line_tick = elapsed % LINE_TICKS;
        let line = (frame_tick / LINE_TICKS) as usize;

        if line < LCD_HEIGHT {
            if frame_tick == 0 {
                self.window_line = 0;
                self.next_frame = Some(FrameBufferBuilder::new(LCD_WIDTH, LCD_HEIGHT)?);
            }
            match line_tick {
                0 => {
                    self.change_ly(line as u8);
                    self.next_non_idle += OAM_SEARCH_TICKS;
                    self.change_mode(Mode::OamSearch);
                }
                OAM_SEARCH_TICKS => {
                    let pixels = self.compute_line(line)?;
                    self.next_frame
                        .as_mut()
                        .ok_or_else(|| {
                            Error::InvalidState(format!("line {} computed outside a frame", line))
                        })?
                        .set_line(line, pixels)?;
                    self.next_non_idle += PIXEL_TRANSFER_TICKS;
                    self.change_mode(Mode::PixelTransfer);
                }
                HBLANK_START => {
                    self.next_non_idle += HBLANK_TICKS;
                    self.change_mode(Mode::HBlank);
                }
                _ => {}
            }
        } else {
            if line == LCD_HEIGHT {
                let builder = self.next_frame.take().ok_or_else(|| {
                    Error::InvalidState("V-blank reached without a frame in progress".into())
                })?;
                self.current_frame = builder.build();
                log::debug!("GB LCD: frame complete");
                self.change_mode(Mode::VBlank);
            }
            self.next_non_idle += LINE_TICKS;
            self.change_ly(line as u8);
        }
        Ok(())
    }

    fn change_mode(&mut self, mode: Mode) {
        let stat = self.regs.get(Reg::Stat) & !LcdStatus::MODE_MASK.bits();
        self.regs.set(Reg::Stat, stat | mode.bits());
        log::trace!("GB LCD: mode {:?}", mode);

        let stat = self.regs.stat();
        match mode {
            Mode::HBlank => self.request_if(stat.contains(LcdStatus::HBLANK_INTERRUPT)),
            Mode::VBlank => {
                self.interrupts.push(Interrupt::VBlank);
                self.request_if(stat.contains(LcdStatus::VBLANK_INTERRUPT));
            }
            Mode::OamSearch => self.request_if(stat.contains(LcdStatus::OAM_INTERRUPT)),
            Mode::PixelTransfer => {}
        }
    }

    fn request_if(&mut self, enabled: bool) {
        if enabled {
            self.interrupts.push(Interrupt::LcdStat);
        }
    }

    fn change_ly(&mut self, value: u8) {
        self.regs.set(Reg::Ly, value);
        self.compare_ly_lyc();
    }

    fn change_lyc(&mut self, value: u8) {
        self.regs.set(Reg::Lyc, value);
        self.compare_ly_lyc();
    }

    fn compare_ly_lyc(&mut self) {
        let equal = self.regs.get(Reg::Ly) == self.regs.get(Reg::Lyc);
        self.regs.set_bit(Reg::Stat, 2, equal);
        if equal {
            let enabled = self.regs.stat().contains(LcdStatus::LYC_INTERRUPT);
            self.request_if(enabled);
        }
    }

    fn write_register(&mut self, reg: Reg, data: u8) {
        match reg {
            Reg::Lcdc => {
                self.regs.set(Reg::Lcdc, data);
                if !self.regs.lcdc().contains(LcdControl::LCD_ENABLE) {
                    if self.next_non_idle != IDLE {
                        log::debug!("GB LCD: display off");
                    }
                    self.change_mode(Mode::HBlank);
                    self.change_ly(0);
                    self.next_non_idle = IDLE;
                }
            }
            Reg::Stat => {
                // Mode and coincidence bits are read-only.
                let kept = self.regs.get(Reg::Stat) & 0b0000_0111;
                self.regs.set(Reg::Stat, data & 0b1111_1000 | kept);
            }
            Reg::Ly => {}
            Reg::Lyc => self.change_lyc(data),
            Reg::Dma => {
                self.regs.set(Reg::Dma, data);
                log::debug!("GB LCD: OAM DMA from 0x{:02X}00", data);
                self.dma_offset = Some(0);
            }
            _ => self.regs.set(reg, data),
        }
    }

    /// Copy one byte of a running OAM DMA.
    fn step_dma(&mut self, bus: &Bus) -> Result<()> {
        let Some(offset) = self.dma_offset else {
            return Ok(());
        };
        let source = (u16::from(self.regs.get(Reg::Dma)) << 8) + offset as u16;
        let data = match self.read(source) {
            Some(data) => data,
            // This controller is borrowed for the tick, so it stays out of
            // the bus lookup.
            None => bus.read_from_others(source, self as *const Self as *const ())?,
        };
        self.oam[offset] = data;

        self.dma_offset = (offset + 1 < OAM_RAM_SIZE).then_some(offset + 1);
        Ok(())
    }

    #[inline]
    fn vram(&self, address: u16) -> u8 {
        self.video_ram[usize::from(address - VIDEO_RAM_START)]
    }
}

impl Component for Renderer {
    fn read(&self, address: u16) -> Option<u8> {
        if (VIDEO_RAM_START..VIDEO_RAM_END).contains(&address) {
            Some(self.vram(address))
        } else if (OAM_START..OAM_END).contains(&address) {
            Some(self.oam[usize::from(address - OAM_START)])
        } else {
            Reg::from_address(address).map(|reg| self.regs.get(reg))
        }
    }

    fn write(&mut self, address: u16, data: u8) {
        if (VIDEO_RAM_START..VIDEO_RAM_END).contains(&address) {
            self.video_ram[usize::from(address - VIDEO_RAM_START)] = data;
        } else if (OAM_START..OAM_END).contains(&address) {
            self.oam[usize::from(address - OAM_START)] = data;
        } else if let Some(reg) = Reg::from_address(address) {
            self.write_register(reg, data);
        }
    }
}
