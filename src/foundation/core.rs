use std::{fmt, str::FromStr};

use crate::foundation::error::{FractreeError, FractreeResult};

pub use kurbo::{Affine, BezPath, Line, Point, Rect, Vec2};

pub const TAU: f64 = std::f64::consts::TAU;

/// Side length of the square logo view, in user units.
pub const VIEW_SIZE: f64 = 400.0;

/// Center of the logo view. All spokes and masks are laid out around it.
pub const CENTER: Point = Point::new(VIEW_SIZE / 2.0, VIEW_SIZE / 2.0);

/// Full-canvas rectangle in view coordinates.
pub fn view_rect() -> Rect {
    Rect::new(0.0, 0.0, VIEW_SIZE, VIEW_SIZE)
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Opaque sRGB color, written and parsed as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse_hex(s: &str) -> FractreeResult<Self> {
        let hex = s.trim();
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| FractreeError::config(format!("color '{s}' must start with '#'")))?;

        if !digits.is_ascii() {
            return Err(FractreeError::config(format!("color '{s}' is not valid hex")));
        }

        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => {
                return Err(FractreeError::config(format!(
                    "color '{s}' must be #rgb or #rrggbb"
                )));
            }
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| FractreeError::config(format!("color '{s}' is not valid hex")))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb8 {
    type Err = FractreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = FractreeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
