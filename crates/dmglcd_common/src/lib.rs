mod color;
mod color_map;

pub use color::Color;
pub use color_map::{ColorMap, UnknownColorMap};
