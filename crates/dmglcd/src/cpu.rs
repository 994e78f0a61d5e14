//! Processor-side collaborators of the video core.
//!
//! Instruction execution is not modelled. The machine only needs something
//! that can be ticked, that sits on the bus, and that accepts interrupt
//! requests; [`InterruptLatch`] is the stand-in used by default.
use crate::address_map::{HIGH_RAM_END, HIGH_RAM_SIZE, HIGH_RAM_START, REG_IE, REG_IF};
use crate::component::{Clocked, Component};
use crate::error::Result;

/// Interrupt sources, in IF/IE bit order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}

pub trait InterruptSink {
    fn request_interrupt(&mut self, interrupt: Interrupt);
}

/// The processor as seen by the machine.
pub trait Processor: Component + Clocked + InterruptSink {}

impl<T: Component + Clocked + InterruptSink> Processor for T {}

/// Non-executing processor: owns IF, IE and high RAM and latches
/// interrupt requests into IF.
#[derive(Clone, Debug)]
pub struct InterruptLatch {
    if_reg: u8,
    ie_reg: u8,
    high_ram: [u8; HIGH_RAM_SIZE],
    last_tick: Option<u64>,
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptLatch {
    pub fn new() -> Self {
        Self {
            if_reg: 0,
            ie_reg: 0,
            high_ram: [0; HIGH_RAM_SIZE],
            last_tick: None,
        }
    }

    /// Raw IF bits (0..=4).
    pub fn flags(&self) -> u8 {
        self.if_reg
    }

    pub fn enabled(&self) -> u8 {
        self.ie_reg
    }

    pub fn is_requested(&self, interrupt: Interrupt) -> bool {
        self.if_reg & interrupt.mask() != 0
    }

    /// Acknowledge `interrupt` the way a serviced request would.
    pub fn clear(&mut self, interrupt: Interrupt) {
        self.if_reg &= !interrupt.mask();
    }

    /// Most recent tick this latch was clocked at.
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }
}

impl Component for InterruptLatch {
    fn read(&self, address: u16) -> Option<u8> {
        match address {
            // Bits 5-7 of IF are unused and read back as 1.
            REG_IF => Some(self.if_reg | 0xE0),
            REG_IE => Some(self.ie_reg),
            _ if (HIGH_RAM_START..HIGH_RAM_END).contains(&address) => {
                Some(self.high_ram[(address - HIGH_RAM_START) as usize])
            }
            _ => None,
        }
    }

    fn write(&mut self, address: u16, data: u8) {
        match address {
            REG_IF => self.if_reg = data & 0x1F,
            REG_IE => self.ie_reg = data,
            _ if (HIGH_RAM_START..HIGH_RAM_END).contains(&address) => {
                self.high_ram[(address - HIGH_RAM_START) as usize] = data
            }
            _ => {}
        }
    }
}

impl Clocked for InterruptLatch {
    fn cycle(&mut self, tick: u64) -> Result<()> {
        self.last_tick = Some(tick);
        Ok(())
    }
}

impl InterruptSink for InterruptLatch {
    fn request_interrupt(&mut self, interrupt: Interrupt) {
        log::trace!("CPU: interrupt requested: {:?}", interrupt);
        self.if_reg |= interrupt.mask();
    }
}
