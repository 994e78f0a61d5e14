use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;

/// A unit attached to the [`Bus`](crate::Bus).
///
/// `read` returns `None` when the address is outside the component's
/// mapped window; `write` must ignore such addresses since every write is
/// broadcast to all components.
pub trait Component {
    fn read(&self, address: u16) -> Option<u8>;
    fn write(&mut self, address: u16, data: u8);
}

/// Something advanced once per logical tick.
pub trait Clocked {
    fn cycle(&mut self, tick: u64) -> Result<()>;
}

/// A clocked unit that also sits on the bus, such as a timer.
pub trait Peripheral: Component + Clocked {}

impl<T: Component + Clocked> Peripheral for T {}

/// Handle shared between the bus (which routes accesses) and the machine
/// (which ticks the component).
pub type SharedComponent = Rc<RefCell<dyn Component>>;

/// Wrap a component for attachment.
pub fn shared<C: Component + 'static>(component: C) -> Rc<RefCell<C>> {
    Rc::new(RefCell::new(component))
}
