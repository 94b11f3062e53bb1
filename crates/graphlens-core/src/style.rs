//! Visual style: node palette, glyph metrics and label truncation

use crate::model::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Diameter of every node glyph, in world units.
pub const NODE_DIAMETER: f64 = 60.0;
pub const NODE_RADIUS: f64 = NODE_DIAMETER / 2.0;

pub const NODE_BORDER_WIDTH: f64 = 2.0;
pub const EMPHASIS_BORDER_WIDTH: f64 = 4.0;
pub const EDGE_WIDTH: f64 = 1.0;
pub const SELECTED_EDGE_WIDTH: f64 = 3.0;
pub const FADED_OPACITY: f64 = 0.1;

/// Labels longer than this are truncated for display.
pub const LABEL_MAX_CHARS: usize = 8;
const LABEL_KEEP_CHARS: usize = 7;
const LABEL_ELLIPSIS: &str = "..";

pub const NODE_BORDER: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const HIGHLIGHT_BORDER: Color = Color::rgb(0x33, 0xC6, 0xFF);
pub const EDGE_COLOR: Color = Color::rgb(0xA5, 0xAB, 0xB6);
pub const SELECTED_EDGE_COLOR: Color = Color::rgb(0x00, 0x8C, 0xC1);

/// An sRGB colour with 8-bit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s.trim()).ok_or_else(|| format!("invalid colour '{s}'"))
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl NodeType {
    /// Fill colour for this node category.
    pub fn color(&self) -> Color {
        match self {
            NodeType::Function => Color::rgb(0x33, 0xC6, 0xFF),
            NodeType::Class => Color::rgb(0xF1, 0xC4, 0x0F),
            NodeType::File => Color::rgb(0x2E, 0xCC, 0x71),
            NodeType::Module => Color::rgb(0xE7, 0x4C, 0x3C),
            NodeType::Repository => Color::rgb(0xE6, 0x7E, 0x22),
            NodeType::Default => Color::rgb(0x7B, 0x28, 0x90),
        }
    }
}

/// The text drawn inside a node glyph. The underlying label is untouched.
pub fn display_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let mut short: String = label.chars().take(LABEL_KEEP_CHARS).collect();
        short.push_str(LABEL_ELLIPSIS);
        short
    } else {
        label.to_string()
    }
}
