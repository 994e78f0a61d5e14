//! Video subsystem of the DMG: a memory bus, bit-plane pixel lines, frame
//! buffers and the LCD controller that fills them scanline by scanline.
//!
//! [`Machine`] wires the controller to work RAM, a cartridge and a
//! processor stand-in so that whole frames can be produced headlessly.
pub mod address_map;
pub mod bits;
pub mod bus;
pub mod cartridge;
pub mod component;
pub mod cpu;
pub mod dump;
mod error;
pub mod lcd;
pub mod machine;
pub mod memory;

pub use bits::{BitVector, BitVectorBuilder};
pub use bus::Bus;
pub use error::{Error, Result};
pub use lcd::{FrameBuffer, PixelLine, Renderer, LCD_HEIGHT, LCD_WIDTH};
pub use machine::Machine;
