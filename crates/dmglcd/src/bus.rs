use crate::component::SharedComponent;
use crate::error::{Error, Result};

/// Value seen on the bus when no component answers a read.
pub const OPEN_BUS: u8 = 0xFF;

/// Ordered list of memory-mapped components.
///
/// Reads go to the first component (in attachment order) that maps the
/// address; writes are broadcast. An access that reaches a component which
/// is already borrowed fails with [`Error::InvalidState`] instead of
/// silently missing it.
#[derive(Default)]
pub struct Bus {
    components: Vec<SharedComponent>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, component: SharedComponent) {
        self.components.push(component);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn read(&self, address: u16) -> Result<u8> {
        self.read_from_others(address, std::ptr::null())
    }

    /// Read on behalf of the component at `caller`, which is left out of
    /// the lookup. Used by a component that is mid-tick and therefore
    /// borrowed, such as the LCD controller fetching DMA source bytes.
    pub(crate) fn read_from_others(&self, address: u16, caller: *const ()) -> Result<u8> {
        for component in &self.components {
            if component.as_ptr() as *const () == caller {
                continue;
            }
            let component = component.try_borrow().map_err(|_| busy("read", address))?;
            if let Some(data) = component.read(address) {
                return Ok(data);
            }
        }
        Ok(OPEN_BUS)
    }

    /// Broadcast a write. Nothing is written unless every component can
    /// take it.
    pub fn write(&self, address: u16, data: u8) -> Result<()> {
        let mut targets = Vec::with_capacity(self.components.len());
        for component in &self.components {
            targets.push(
                component
                    .try_borrow_mut()
                    .map_err(|_| busy("write", address))?,
            );
        }
        for mut target in targets {
            target.write(address, data);
        }
        Ok(())
    }
}

fn busy(access: &str, address: u16) -> Error {
    log::warn!("Bus: {} of 0x{:04X} reached a busy component", access, address);
    Error::InvalidState(format!(
        "{} of 0x{:04X} reached a component that is already borrowed",
        access, address
    ))
}
