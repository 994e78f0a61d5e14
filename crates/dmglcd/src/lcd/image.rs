use dmglcd_common::ColorMap;

use super::line::PixelLine;
use crate::error::{ensure_argument, Result};

const MAX_WIDTH: usize = 256;
const MAX_HEIGHT: usize = 256;

/// A finished picture: `height` pixel lines of `width` pixels each.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    lines: Vec<PixelLine>,
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    ensure_argument!(
        width > 0 && width <= MAX_WIDTH && width % 32 == 0,
        "frame width must be a multiple of 32 in 32..={}, got {}",
        MAX_WIDTH,
        width
    );
    ensure_argument!(
        height > 0 && height <= MAX_HEIGHT,
        "frame height must be in 1..={}, got {}",
        MAX_HEIGHT,
        height
    );
    Ok(())
}

impl FrameBuffer {
    /// Transparent frame of color 0 everywhere.
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        Ok(FrameBufferBuilder::new(width, height)?.build())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn line(&self, y: usize) -> Option<&PixelLine> {
        self.lines.get(y)
    }

    pub fn lines(&self) -> &[PixelLine] {
        &self.lines
    }

    /// Color index (0..=3) of the pixel at `(x, y)`.
    pub fn get_color(&self, x: usize, y: usize) -> Result<u8> {
        ensure_argument!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside a {}x{} frame",
            x,
            y,
            self.width,
            self.height
        );
        self.lines[y].color(x)
    }

    /// Packed RGB24 pixels, row-major, using `colors` to shade each index.
    pub fn to_rgb24(&self, colors: &ColorMap) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.width * self.height * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let (r, g, b) = colors.color(self.get_color(x, y)?).rgb();
                out.extend_from_slice(&[r, g, b]);
            }
        }
        Ok(out)
    }
}

/// Assembles a [`FrameBuffer`] one line at a time.
///
/// Every line starts out transparent; `build` consumes the builder.
#[derive(Clone, Debug)]
pub struct FrameBufferBuilder {
    width: usize,
    height: usize,
    lines: Vec<PixelLine>,
}

impl FrameBufferBuilder {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        let blank = PixelLine::blank(width)?;
        Ok(Self {
            width,
            height,
            lines: vec![blank; height],
        })
    }

    pub fn set_line(&mut self, index: usize, line: PixelLine) -> Result<&mut Self> {
        ensure_argument!(
            line.size() == self.width,
            "line of {} pixels does not fit a frame {} pixels wide",
            line.size(),
            self.width
        );
        ensure_argument!(
            index < self.height,
            "line index {} outside a frame of {} lines",
            index,
            self.height
        );
        self.lines[index] = line;
        Ok(self)
    }

    pub fn build(self) -> FrameBuffer {
        FrameBuffer {
            width: self.width,
            height: self.height,
            lines: self.lines,
        }
    }
}
