use std::cell::RefCell;
use std::rc::Rc;

use super::Machine;
use crate::address_map::{ECHO_RAM_END, ECHO_RAM_START, WORK_RAM_SIZE, WORK_RAM_START};
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::component::{shared, Peripheral, SharedComponent};
use crate::cpu::{InterruptLatch, Processor};
use crate::error::{Error, Result};
use crate::lcd::Renderer;
use crate::memory::{Ram, RamController};

/// Collects the parts of a [`Machine`].
///
/// Only the cartridge is required; the processor defaults to an
/// [`InterruptLatch`].
#[derive(Default)]
pub struct MachineBuilder {
    cartridge: Option<Cartridge>,
    processor: Option<(SharedComponent, Rc<RefCell<dyn Processor>>)>,
    peripherals: Vec<(SharedComponent, Rc<RefCell<dyn Peripheral>>)>,
}

impl MachineBuilder {
    pub fn cartridge(mut self, cartridge: Cartridge) -> Self {
        self.cartridge = Some(cartridge);
        self
    }

    pub fn processor<P: Processor + 'static>(mut self, processor: Rc<RefCell<P>>) -> Self {
        let component: SharedComponent = processor.clone();
        let processor: Rc<RefCell<dyn Processor>> = processor;
        self.processor = Some((component, processor));
        self
    }

    /// Add a clocked component; peripherals are ticked before the renderer
    /// and attached to the bus after the built-in components.
    pub fn peripheral<P: Peripheral + 'static>(mut self, peripheral: Rc<RefCell<P>>) -> Self {
        let component: SharedComponent = peripheral.clone();
        let peripheral: Rc<RefCell<dyn Peripheral>> = peripheral;
        self.peripherals.push((component, peripheral));
        self
    }

    pub fn build(self) -> Result<Machine> {
        let cartridge = self.cartridge.ok_or(Error::MissingDependency("cartridge"))?;
        let (processor_component, processor) = match self.processor {
            Some(processor) => processor,
            None => {
                let latch = shared(InterruptLatch::new());
                let component: SharedComponent = latch.clone();
                let processor: Rc<RefCell<dyn Processor>> = latch;
                (component, processor)
            }
        };

        let work_ram = Rc::new(RefCell::new(Ram::new(WORK_RAM_SIZE)));
        let echo = RamController::new(work_ram.clone(), ECHO_RAM_START, ECHO_RAM_END)?;
        let work = RamController::at(work_ram, WORK_RAM_START)?;
        let renderer = shared(Renderer::new()?);

        let mut bus = Bus::new();
        bus.attach(shared(echo));
        bus.attach(shared(cartridge));
        bus.attach(processor_component);
        bus.attach(renderer.clone());
        bus.attach(shared(work));

        let mut peripherals = Vec::with_capacity(self.peripherals.len());
        for (component, peripheral) in self.peripherals {
            bus.attach(component);
            peripherals.push(peripheral);
        }
        log::debug!(
            "Machine: {} components on the bus, {} extra peripherals",
            bus.len(),
            peripherals.len()
        );

        Ok(Machine {
            bus,
            renderer,
            processor,
            peripherals,
            tick: 0,
        })
    }
}
