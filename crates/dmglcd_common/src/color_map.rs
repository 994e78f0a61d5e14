use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Color;

/// Shades used to present the four DMG color indices.
///
/// Index 0 is the lightest shade on every map. The selected map is passed
/// explicitly to whatever converts a frame into pixels; there is no global
/// "current palette".
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ColorMap {
    #[default]
    Grayscale,
    Ocean,
    /// Green tint close to the original reflective LCD.
    Original,
    Apocalypse,
}

const GRAYSCALE: [Color; 4] = [
    Color::from_argb(0xFF_FF_FF_FF),
    Color::from_argb(0xFF_D3_D3_D3),
    Color::from_argb(0xFF_A9_A9_A9),
    Color::from_argb(0xFF_00_00_00),
];

const OCEAN: [Color; 4] = [
    Color::from_argb(0xFF_FF_FF_FF),
    Color::from_argb(0xFF_00_FF_FF),
    Color::from_argb(0xFF_A9_FF_FF),
    Color::from_argb(0xFF_00_00_00),
];

const ORIGINAL: [Color; 4] = [
    Color::from_argb(0xFF_9E_FD_A9),
    Color::from_argb(0xFF_00_60_10),
    Color::from_argb(0xFF_16_B8_4E),
    Color::from_argb(0xFF_00_00_00),
];

const APOCALYPSE: [Color; 4] = [
    Color::from_argb(0xFF_9E_FD_A9),
    Color::from_argb(0xFF_00_60_10),
    Color::from_argb(0xFF_16_B8_4E),
    Color::from_argb(0xFF_99_00_00),
];

impl ColorMap {
    pub const ALL: [ColorMap; 4] = [
        ColorMap::Grayscale,
        ColorMap::Ocean,
        ColorMap::Original,
        ColorMap::Apocalypse,
    ];

    pub const fn shades(&self) -> &'static [Color; 4] {
        match self {
            ColorMap::Grayscale => &GRAYSCALE,
            ColorMap::Ocean => &OCEAN,
            ColorMap::Original => &ORIGINAL,
            ColorMap::Apocalypse => &APOCALYPSE,
        }
    }

    /// Shade for a 2-bit color index. Only the low two bits are used.
    #[inline]
    pub const fn color(&self, index: u8) -> Color {
        self.shades()[(index & 0b11) as usize]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ColorMap::Grayscale => "grayscale",
            ColorMap::Ocean => "ocean",
            ColorMap::Original => "original",
            ColorMap::Apocalypse => "apocalypse",
        }
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown color map '{0}' (expected grayscale, ocean, original or apocalypse)")]
pub struct UnknownColorMap(pub String);

impl FromStr for ColorMap {
    type Err = UnknownColorMap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" | "gray" | "grey" | "base" => Ok(ColorMap::Grayscale),
            "ocean" => Ok(ColorMap::Ocean),
            "original" | "green" | "dmg" => Ok(ColorMap::Original),
            "apocalypse" => Ok(ColorMap::Apocalypse),
            other => {
                log::debug!("rejecting color map name '{}'", other);
                Err(UnknownColorMap(s.to_string()))
            }
        }
    }
}
