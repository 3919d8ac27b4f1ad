//! Colors used by the track, thumb and hint outputs.
//!
//! ## Usage
//!
//! Interpolate between configured colors as the thumb travels.

use bytemuck::{Pod, Zeroable};

/// An RGBA color with sRGB-encoded channels, as given by the `u8` and hex
/// constructors. No gamma conversion is applied.
///
/// Values are stored as `f32`s, typically in the range `[0.0, 1.0]`. The
/// layout is `#[repr(C)]` so a presentation layer can upload it directly as a
/// uniform.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new `Color` from four `f32` values (red, green, blue, alpha).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new `Color` from four `u8` values (red, green, blue, alpha).
    #[inline]
    pub const fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Creates a new opaque `Color` from three `u8` values (red, green, blue).
    #[inline]
    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Creates a color from a packed `0xAARRGGBB` value.
    ///
    /// ```
    /// use draggle::Color;
    ///
    /// let green = Color::from_argb_hex(0xFF4CAF50);
    /// assert_eq!(green, Color::from_rgb_u8(0x4C, 0xAF, 0x50));
    /// ```
    pub const fn from_argb_hex(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Returns the same color with its alpha replaced.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Linearly interpolates every channel from `self` toward `to`.
    ///
    /// `fraction` is clamped to `[0.0, 1.0]`.
    pub fn lerp(self, to: Color, fraction: f32) -> Color {
        let t = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let s = 1.0 - t;
        Color {
            r: self.r * s + to.r * t,
            g: self.g * s + to.g * t,
            b: self.b * s + to.b * t,
            a: self.a * s + to.a * t,
        }
    }

    /// Converts the color to an array of `[f32; 4]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        bytemuck::cast(self)
    }
}

/// The default color is fully transparent.
impl Default for Color {
    #[inline]
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<[f32; 4]> for Color {
    #[inline]
    fn from(array: [f32; 4]) -> Self {
        bytemuck::cast(array)
    }
}

impl From<Color> for [f32; 4] {
    #[inline]
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argb_hex() {
        let color = Color::from_argb_hex(0x80FF0000);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_endpoints_and_clamp() {
        let from = Color::BLACK;
        let to = Color::WHITE;
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        assert_eq!(from.lerp(to, 2.0), to);
        assert_eq!(from.lerp(to, -1.0), from);
        assert_eq!(from.lerp(to, f32::NAN), from);

        let mid = from.lerp(to, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert_eq!(mid.a, 1.0);
    }

    #[test]
    fn test_array_layout() {
        let color = Color::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(color.to_array(), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(Color::from([0.1, 0.2, 0.3, 0.4]), color);
        assert_eq!(bytemuck::bytes_of(&color).len(), 16);
    }
}
