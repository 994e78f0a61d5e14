//! Picture pipeline: pixel lines, frame buffers and the LCD controller.
pub mod controller;
pub mod image;
pub mod line;

pub use controller::{LcdControl, LcdStatus, Mode, Reg, RegisterFile, Renderer, SpriteEntry};
pub use image::{FrameBuffer, FrameBufferBuilder};
pub use line::{PixelLine, PixelLineBuilder, IDENTITY_PALETTE};

/// Visible width of the DMG screen in pixels.
pub const LCD_WIDTH: usize = 160;
/// Visible height of the DMG screen in pixels.
pub const LCD_HEIGHT: usize = 144;
