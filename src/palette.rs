//! Tile colours and elevation shading
//!
//! Each block type has a base colour; cells are darkened quadratically the
//! further their height is from the water level.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terrain::BlockType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("colour must look like #RRGGBB (got {0:?})")]
    Format(String),
    #[error("invalid hex digits in colour {0:?}")]
    Digits(String),
}

/// 8-bit RGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (hex digits in either case).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorParseError::Format(s.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError::Digits(s.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// `#rrggbb`, lower-case
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Pack as `0x00RRGGBB` for framebuffer output.
    pub fn to_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb(c.to_rgb())
    }
}

/// Base colour for every block type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tileset {
    pub water: Color,
    pub sand: Color,
    pub grass: Color,
    pub stone: Color,
    pub snow: Color,
}

impl Default for Tileset {
    fn default() -> Self {
        Self {
            water: Color::new(0x15, 0x7A, 0xC2),
            sand: Color::new(0xD4, 0xCB, 0x90),
            grass: Color::new(0x15, 0xC2, 0x38),
            stone: Color::new(0xB3, 0xB3, 0xB3),
            snow: Color::new(0xFF, 0xFF, 0xFF),
        }
    }
}

impl Tileset {
    pub fn color(&self, block: BlockType) -> Color {
        match block {
            BlockType::Water => self.water,
            BlockType::Sand => self.sand,
            BlockType::Grass => self.grass,
            BlockType::Stone => self.stone,
            BlockType::Snow => self.snow,
        }
    }
}

/// Scale every channel by `1 + val`, clamped to 0..=255 and truncated.
pub fn darken(color: Color, val: f64) -> Color {
    let scale = |c: u8| (c as f64 * (1.0 + val)).clamp(0.0, 255.0) as u8;
    Color::new(scale(color.r), scale(color.g), scale(color.b))
}

/// Maps a block type and its elevation to a display colour.
#[derive(Clone, Debug, Default)]
pub struct ColorMapper {
    tileset: Tileset,
}

impl ColorMapper {
    pub fn new(tileset: Tileset) -> Self {
        Self { tileset }
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn base_color(&self, block: BlockType) -> Color {
        self.tileset.color(block)
    }

    /// Base colour darkened by `-((height - water_level) / 255)^2`.
    ///
    /// A cell exactly at the water level keeps its base colour.
    pub fn render_color(&self, block: BlockType, height: u8, water_level: u8) -> Color {
        let offset = (height as f64 - water_level as f64) / 255.0;
        darken(self.base_color(block), -(offset * offset))
    }

    pub fn render_hex(&self, block: BlockType, height: u8, water_level: u8) -> String {
        self.render_color(block, height, water_level).to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#157AC2").unwrap(), Color::new(0x15, 0x7a, 0xc2));
        assert_eq!(Color::from_hex("#d4cb90").unwrap(), Color::new(0xd4, 0xcb, 0x90));

        assert!(matches!(Color::from_hex("157AC2"), Err(ColorParseError::Format(_))));
        assert!(matches!(Color::from_hex("#157AC"), Err(ColorParseError::Format(_))));
        assert!(matches!(Color::from_hex("#éé7AC"), Err(ColorParseError::Format(_))));
        assert!(matches!(Color::from_hex("#GG7AC2"), Err(ColorParseError::Digits(_))));
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        assert_eq!(Color::new(0x15, 0x7A, 0xC2).to_hex(), "#157ac2");
        assert_eq!(Color::new(0, 0, 0).to_string(), "#000000");
    }

    #[test]
    fn test_reference_tileset() {
        let tiles = Tileset::default();
        assert_eq!(tiles.color(BlockType::Water), Color::from_hex("#157AC2").unwrap());
        assert_eq!(tiles.color(BlockType::Sand), Color::from_hex("#D4CB90").unwrap());
        assert_eq!(tiles.color(BlockType::Grass), Color::from_hex("#15C238").unwrap());
        assert_eq!(tiles.color(BlockType::Stone), Color::from_hex("#B3B3B3").unwrap());
        assert_eq!(tiles.color(BlockType::Snow), Color::from_hex("#FFFFFF").unwrap());
    }

    #[test]
    fn test_darken() {
        let c = Color::new(200, 100, 50);
        assert_eq!(darken(c, 0.0), c);
        assert_eq!(darken(c, -0.5), Color::new(100, 50, 25));
        assert_eq!(darken(c, -2.0), Color::new(0, 0, 0));
        // Brightening saturates
        assert_eq!(darken(c, 0.5), Color::new(255, 150, 75));
    }

    #[test]
    fn test_water_level_keeps_base_colour() {
        let mapper = ColorMapper::default();
        for block in BlockType::ALL {
            for level in [0u8, 102, 255] {
                assert_eq!(mapper.render_color(block, level, level), mapper.base_color(block));
            }
        }
    }

    #[test]
    fn test_darkening_is_monotonic() {
        let mapper = ColorMapper::default();
        let water_level = 102u8;
        for block in BlockType::ALL {
            let mut last_up = mapper.base_color(block);
            for h in water_level..=255 {
                let c = mapper.render_color(block, h, water_level);
                assert!(c.r <= last_up.r && c.g <= last_up.g && c.b <= last_up.b);
                last_up = c;
            }

            let mut last_down = mapper.base_color(block);
            for h in (0..=water_level).rev() {
                let c = mapper.render_color(block, h, water_level);
                assert!(c.r <= last_down.r && c.g <= last_down.g && c.b <= last_down.b);
                last_down = c;
            }
        }
    }

    #[test]
    fn test_render_hex_snow_peak() {
        let mapper = ColorMapper::default();
        // (255 - 102) / 255 = 0.6, factor 1 - 0.36 = 0.64, 255 * 0.64 = 163.2
        assert_eq!(mapper.render_hex(BlockType::Snow, 255, 102), "#a3a3a3");
    }
}
