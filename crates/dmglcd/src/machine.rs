//! A headless DMG: bus, memory, cartridge, LCD controller and a processor
//! stand-in, ticked together one logical cycle at a time.
mod builder;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub use builder::MachineBuilder;

use crate::bus::Bus;
use crate::component::Peripheral;
use crate::cpu::Processor;
use crate::error::{ensure_argument, Result};
use crate::lcd::{FrameBuffer, Renderer};

pub struct Machine {
    bus: Bus,
    renderer: Rc<RefCell<Renderer>>,
    processor: Rc<RefCell<dyn Processor>>,
    /// Ticked before the renderer on every cycle, in insertion order.
    peripherals: Vec<Rc<RefCell<dyn Peripheral>>>,
    tick: u64,
}

impl Machine {
    pub fn builder() -> MachineBuilder {
        MachineBuilder::default()
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn renderer(&self) -> &Rc<RefCell<Renderer>> {
        &self.renderer
    }

    pub fn processor(&self) -> &Rc<RefCell<dyn Processor>> {
        &self.processor
    }

    /// Number of ticks run so far, which is also the next tick to run.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn current_image(&self) -> Ref<'_, FrameBuffer> {
        Ref::map(self.renderer.borrow(), Renderer::current_image)
    }

    /// Run every tick up to, but not including, `tick`.
    pub fn run_until(&mut self, tick: u64) -> Result<()> {
        ensure_argument!(
            tick >= self.tick,
            "cannot run back to tick {} from tick {}",
            tick,
            self.tick
        );

        while self.tick < tick {
            for peripheral in &self.peripherals {
                peripheral.borrow_mut().cycle(self.tick)?;
            }
            self.renderer.borrow_mut().cycle(self.tick, &self.bus)?;
            self.forward_interrupts();
            self.processor.borrow_mut().cycle(self.tick)?;
            // Register writes made by the processor can raise LCD interrupts.
            self.forward_interrupts();
            self.tick += 1;
        }
        Ok(())
    }

    fn forward_interrupts(&self) {
        let pending = self.renderer.borrow_mut().take_interrupts();
        if pending.is_empty() {
            return;
        }
        let mut processor = self.processor.borrow_mut();
        for interrupt in pending {
            processor.request_interrupt(interrupt);
        }
    }
}
