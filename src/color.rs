use crate::{Scalar, clamp};
use bytemuck::{Pod, Zeroable};
use std::{fmt, str::FromStr};

/// Non-premultiplied color packed as `0xAARRGGBB`
///
/// This is the layout mobile platforms use for their integer colors, so values
/// coming from a host palette can be wrapped without any conversion. Any value
/// is a valid color, including fully transparent ones.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct ARGB(u32);

impl ARGB {
    /// Fully transparent black, the color of an untouched pixel
    pub const TRANSPARENT: ARGB = ARGB(0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Wrap packed `0xAARRGGBB` value as is
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Packed `0xAARRGGBB` value
    pub const fn to_argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xff) as u8
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Convert color to sRGBA list
    pub fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Convert color to sRGB list (alpha is discarded)
    pub fn to_rgb(self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }

    /// Scale alpha component by the pixel coverage in `[0, 1]`
    pub fn with_coverage(self, coverage: Scalar) -> Self {
        let alpha = (self.alpha() as Scalar * clamp(coverage, 0.0, 1.0)).round() as u8;
        Self((self.0 & 0x00ff_ffff) | ((alpha as u32) << 24))
    }

    /// Blend other color on top of this color (source-over)
    pub fn blend_over(self, other: Self) -> Self {
        if self.alpha() == 0 || other.alpha() == 255 {
            return other;
        }
        if other.alpha() == 0 {
            return self;
        }
        let src_a = other.alpha() as Scalar / 255.0;
        let dst_a = self.alpha() as Scalar / 255.0 * (1.0 - src_a);
        let out_a = src_a + dst_a;
        let channel = |src: u8, dst: u8| {
            ((src as Scalar * src_a + dst as Scalar * dst_a) / out_a).round() as u8
        };
        Self::new(
            channel(other.red(), self.red()),
            channel(other.green(), self.green()),
            channel(other.blue(), self.blue()),
            (out_a * 255.0).round() as u8,
        )
    }

    /// Calculate LUMA of the color.
    pub fn luma(self) -> f32 {
        let [r, g, b] = self.to_rgb();
        0.2126 * (r as f32 / 255.0) + 0.7152 * (g as f32 / 255.0) + 0.0722 * (b as f32 / 255.0)
    }

    /// Pick color that produces the best contrast with self
    pub fn best_contrast(self, c0: Self, c1: Self) -> Self {
        let luma = self.luma();
        if (luma - c0.luma()).abs() < (luma - c1.luma()).abs() {
            c1
        } else {
            c0
        }
    }
}

impl From<u32> for ARGB {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

impl From<ARGB> for u32 {
    fn from(color: ARGB) -> Self {
        color.0
    }
}

impl fmt::Debug for ARGB {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [bg_r, bg_g, bg_b] = self.to_rgb();
        let [fg_r, fg_g, fg_b] = self
            .best_contrast(ARGB::new(255, 255, 255, 255), ARGB::new(0, 0, 0, 255))
            .to_rgb();
        write!(
            fmt,
            "\x1b[38;2;{};{};{};48;2;{};{};{}m",
            fg_r, fg_g, fg_b, bg_r, bg_g, bg_b
        )?;
        write!(fmt, "{}", self)?;
        write!(fmt, "\x1b[m")
    }
}

impl fmt::Display for ARGB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba();
        write!(f, "#")?;
        if a != 255 {
            write!(f, "{:02x}", a)?;
        }
        write!(f, "{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for ARGB {
    type Err = ColorError;

    /// Parse `#RRGGBB` or `#AARRGGBB`
    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let hex = color.strip_prefix('#').ok_or(ColorError::HexExpected)?;
        if (hex.len() != 6 && hex.len() != 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::HexExpected);
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| ColorError::HexExpected)?;
        if hex.len() == 6 {
            Ok(ARGB(0xff00_0000 | value))
        } else {
            Ok(ARGB(value))
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ARGB {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ARGB {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let color = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        color.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    HexExpected,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #RRGGBB or #AARRGGBB in hexadecimal format")
            }
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_argb() {
        let c = ARGB::new(1, 2, 3, 4);
        assert_eq!(c.to_argb(), 0x04010203);
        assert_eq!([1, 2, 3, 4], c.to_rgba());
        assert_eq!(1, c.red());
        assert_eq!(2, c.green());
        assert_eq!(3, c.blue());
        assert_eq!(4, c.alpha());
        assert_eq!(ARGB::from_argb(0xff336699), ARGB::new(0x33, 0x66, 0x99, 0xff));
        assert_eq!(u32::from(ARGB::from(0x80123456)), 0x80123456);
    }

    #[test]
    fn test_display_parse() -> Result<(), ColorError> {
        let c: ARGB = "#04010203".parse()?;
        assert_eq!(c, ARGB::new(1, 2, 3, 4));
        assert_eq!(c.to_string(), "#04010203");

        let c: ARGB = "#010203".parse()?;
        assert_eq!(c, ARGB::new(1, 2, 3, 255));
        assert_eq!(c.to_string(), "#010203");

        let c: ARGB = "#AABBCC".parse()?;
        assert_eq!(c, ARGB::new(170, 187, 204, 255));

        assert_eq!("010203".parse::<ARGB>(), Err(ColorError::HexExpected));
        assert_eq!("#0102".parse::<ARGB>(), Err(ColorError::HexExpected));
        assert_eq!("#01020g".parse::<ARGB>(), Err(ColorError::HexExpected));
        assert_eq!("#+1020304".parse::<ARGB>(), Err(ColorError::HexExpected));
        Ok(())
    }

    #[test]
    fn test_with_coverage() {
        let c = ARGB::new(10, 20, 30, 255);
        assert_eq!(c.with_coverage(1.0), c);
        assert_eq!(c.with_coverage(0.0), ARGB::new(10, 20, 30, 0));
        assert_eq!(c.with_coverage(0.5).alpha(), 128);
        assert_eq!(c.with_coverage(2.0), c);
        assert_eq!(ARGB::new(10, 20, 30, 100).with_coverage(0.5).alpha(), 50);
    }

    #[test]
    fn test_blend_over() {
        let red = ARGB::new(255, 0, 0, 255);
        let blue = ARGB::new(0, 0, 255, 255);
        assert_eq!(ARGB::TRANSPARENT.blend_over(red), red);
        assert_eq!(blue.blend_over(red), red);
        assert_eq!(red.blend_over(ARGB::TRANSPARENT), red);

        let half_red = ARGB::new(255, 0, 0, 128);
        assert_eq!(ARGB::TRANSPARENT.blend_over(half_red), half_red);
        let mixed = blue.blend_over(half_red);
        assert_eq!(mixed.alpha(), 255);
        assert_eq!(mixed.red(), 128);
        assert_eq!(mixed.blue(), 127);
    }
}
