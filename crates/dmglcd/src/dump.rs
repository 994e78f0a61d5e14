//! Headless frame dumps of a built-in demo scene.
//!
//! The scene exercises every layer: a checkered background, a window band
//! along the bottom of the screen and three sprites loaded into OAM by DMA.
use std::path::{Path, PathBuf};

use anyhow::Context;
use dmglcd_common::ColorMap;
use typed_builder::TypedBuilder;

use crate::cartridge::Cartridge;
use crate::error::{ensure_argument, Result};
use crate::lcd::controller::{FRAME_TICKS, LINE_TICKS};
use crate::lcd::{FrameBuffer, LCD_HEIGHT, LCD_WIDTH};
use crate::machine::Machine;

/// Work RAM page the sprite table is staged in before the DMA.
const SPRITE_PAGE: u8 = 0xC1;
const DMA_TICKS: u64 = 160;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DumpFormat {
    /// Headerless `width * height * 3` bytes, as the other frame dumps.
    #[default]
    Rgb24,
    /// Binary PPM (`P6`).
    Ppm,
}

impl DumpFormat {
    /// PPM for a `.ppm` path, raw RGB24 otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ppm") => DumpFormat::Ppm,
            _ => DumpFormat::Rgb24,
        }
    }
}

#[derive(TypedBuilder, Clone, Debug)]
pub struct DumpOptions {
    #[builder(setter(into))]
    pub out_path: PathBuf,
    #[builder(default = 1)]
    pub frames: u32,
    #[builder(default)]
    pub colors: ColorMap,
    #[builder(default)]
    pub format: DumpFormat,
}

/// Load the demo scene into a fresh machine. The display is left on and
/// the machine is positioned on the tick the first frame starts at.
pub fn demo_machine() -> Result<Machine> {
    let mut machine = Machine::builder().cartridge(Cartridge::blank()).build()?;
    let bus = machine.bus();

    // Tile 1 is solid color 1, tile 2 solid color 3 and tile 3 a sprite
    // with a color 3 outline around a color 2 interior.
    for row in 0..8u16 {
        bus.write(0x8010 + row * 2, 0xFF)?;
        bus.write(0x8011 + row * 2, 0x00)?;
        bus.write(0x8020 + row * 2, 0xFF)?;
        bus.write(0x8021 + row * 2, 0xFF)?;
        let edge = row == 0 || row == 7;
        bus.write(0x8030 + row * 2, if edge { 0xFF } else { 0x81 })?;
        bus.write(0x8031 + row * 2, 0xFF)?;
    }
    for y in 0..32u16 {
        for x in 0..32u16 {
            bus.write(0x9800 + y * 32 + x, ((x + y) % 2) as u8)?;
            bus.write(0x9C00 + y * 32 + x, 2)?;
        }
    }

    let sprites: [[u8; 4]; 3] = [
        [32, 24, 3, 0x00],
        [40, 48, 3, 0x30],
        // Behind the background, straddling a color 0 and a color 1 tile.
        [72, 68, 3, 0x80],
    ];
    let base = u16::from(SPRITE_PAGE) << 8;
    for (offset, byte) in sprites.iter().flatten().enumerate() {
        bus.write(base + offset as u16, *byte)?;
    }
    bus.write(0xFF46, SPRITE_PAGE)?;

    bus.write(0xFF47, 0b11_10_01_00)?;
    bus.write(0xFF48, 0b11_10_01_00)?;
    bus.write(0xFF49, 0b01_11_10_00)?;
    bus.write(0xFF4A, 128)?;
    bus.write(0xFF4B, 7)?;

    machine.run_until(DMA_TICKS)?;
    machine.bus().write(0xFF40, 0xF3)?;
    log::debug!("Demo scene loaded at tick {}", machine.ticks());
    Ok(machine)
}

/// Render `frames` frames of the demo scene and return the last one.
pub fn render_demo(frames: u32) -> Result<FrameBuffer> {
    ensure_argument!(frames > 0, "at least one frame must be rendered");
    let mut machine = demo_machine()?;
    let start = machine.ticks();
    let last = start + u64::from(frames - 1) * FRAME_TICKS + LCD_HEIGHT as u64 * LINE_TICKS;
    machine.run_until(last + 1)?;
    let frame = machine.current_image().clone();
    Ok(frame)
}

pub fn encode(frame: &FrameBuffer, colors: &ColorMap, format: DumpFormat) -> Result<Vec<u8>> {
    let pixels = frame.to_rgb24(colors)?;
    Ok(match format {
        DumpFormat::Rgb24 => pixels,
        DumpFormat::Ppm => {
            let mut out = format!("P6\n{} {}\n255\n", frame.width(), frame.height()).into_bytes();
            out.extend_from_slice(&pixels);
            out
        }
    })
}

/// Render and write the dump described by `options`, returning the number
/// of bytes written.
pub fn dump(options: &DumpOptions) -> anyhow::Result<usize> {
    let frame = render_demo(options.frames)
        .with_context(|| format!("rendering {} frames", options.frames))?;
    let bytes = encode(&frame, &options.colors, options.format)?;
    std::fs::write(&options.out_path, &bytes)
        .with_context(|| format!("writing '{}'", options.out_path.display()))?;
    log::info!(
        "Wrote {}x{} {:?} frame to '{}'",
        LCD_WIDTH,
        LCD_HEIGHT,
        options.format,
        options.out_path.display()
    );
    Ok(bytes.len())
}
