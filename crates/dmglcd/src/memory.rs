use std::cell::RefCell;
use std::rc::Rc;

use crate::component::Component;
use crate::error::{ensure_argument, Result};

/// Plain byte storage, shared between the controllers that map it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn read(&self, index: usize) -> Result<u8> {
        ensure_argument!(
            index < self.data.len(),
            "RAM index {} out of range for {} bytes",
            index,
            self.data.len()
        );
        Ok(self.data[index])
    }

    pub fn write(&mut self, index: usize, value: u8) -> Result<()> {
        ensure_argument!(
            index < self.data.len(),
            "RAM index {} out of range for {} bytes",
            index,
            self.data.len()
        );
        self.data[index] = value;
        Ok(())
    }

    /// Unchecked access for controllers whose window is known to fit.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> u8 {
        self.data[index]
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: u8) {
        self.data[index] = value;
    }
}

/// Maps `[start, end)` of the address space onto the beginning of a [`Ram`].
///
/// Several controllers may share one `Ram`; work RAM and its echo window
/// are mapped that way.
#[derive(Clone, Debug)]
pub struct RamController {
    ram: Rc<RefCell<Ram>>,
    start: u16,
    end: u16,
}

impl RamController {
    pub fn new(ram: Rc<RefCell<Ram>>, start: u16, end: u16) -> Result<Self> {
        ensure_argument!(
            start <= end,
            "RAM window start 0x{:04X} is past its end 0x{:04X}",
            start,
            end
        );
        let size = ram.borrow().size();
        ensure_argument!(
            usize::from(end - start) <= size,
            "RAM window 0x{:04X}..0x{:04X} is larger than the {} byte RAM",
            start,
            end,
            size
        );
        Ok(Self { ram, start, end })
    }

    /// Map the whole of `ram` starting at `start`.
    pub fn at(ram: Rc<RefCell<Ram>>, start: u16) -> Result<Self> {
        let size = ram.borrow().size();
        ensure_argument!(
            usize::from(start) + size < 0x1_0000,
            "{} byte RAM at 0x{:04X} runs past the address space",
            size,
            start
        );
        let end = (usize::from(start) + size) as u16;
        Self::new(ram, start, end)
    }

    #[inline]
    fn offset(&self, address: u16) -> Option<usize> {
        (self.start..self.end)
            .contains(&address)
            .then(|| usize::from(address - self.start))
    }
}

impl Component for RamController {
    fn read(&self, address: u16) -> Option<u8> {
        let offset = self.offset(address)?;
        Some(self.ram.borrow().get(offset))
    }

    fn write(&mut self, address: u16, data: u8) {
        if let Some(offset) = self.offset(address) {
            self.ram.borrow_mut().set(offset, data);
        }
    }
}
