//! # Density-Independent Pixels (Dp)
//!
//! Sizes and speeds in the configuration are expressed in [`Dp`] so the same
//! configuration feels identical on screens of different densities. The
//! state machine itself works in pixels; conversion happens once, with the
//! density supplied in the configuration.
//!
//! ```
//! use draggle::Dp;
//!
//! let thumb = Dp(40.0);
//! assert_eq!(thumb.to_px(2.0), 80.0);
//! assert_eq!(Dp::from_px(80.0, 2.0), thumb);
//! ```

use std::ops::{Add, Mul};

/// Density-independent length (or, for speeds, length per second).
///
/// One dp equals `density` physical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Dp(pub f32);

impl Dp {
    /// Converts this value to physical pixels.
    ///
    /// A non-finite or non-positive density falls back to `1.0`.
    pub fn to_px(self, density: f32) -> f32 {
        self.0 * sanitize_density(density)
    }

    /// Creates a `Dp` value from physical pixels.
    pub fn from_px(px: f32, density: f32) -> Self {
        Dp(px / sanitize_density(density))
    }
}

fn sanitize_density(density: f32) -> f32 {
    if density.is_finite() && density > 0.0 {
        density
    } else {
        1.0
    }
}

impl Add for Dp {
    type Output = Dp;

    fn add(self, rhs: Self) -> Self::Output {
        Dp(self.0 + rhs.0)
    }
}

impl Mul<f32> for Dp {
    type Output = Dp;

    fn mul(self, rhs: f32) -> Self::Output {
        Dp(self.0 * rhs)
    }
}

impl From<f32> for Dp {
    fn from(value: f32) -> Self {
        Dp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dp_conversion() {
        assert_eq!(Dp(10.0).to_px(1.0), 10.0);
        assert_eq!(Dp(10.0).to_px(2.75), 27.5);
        assert_eq!(Dp::from_px(27.5, 2.75), Dp(10.0));
    }

    #[test]
    fn test_invalid_density_falls_back() {
        assert_eq!(Dp(10.0).to_px(0.0), 10.0);
        assert_eq!(Dp(10.0).to_px(f32::NAN), 10.0);
        assert_eq!(Dp::from_px(10.0, -3.0), Dp(10.0));
    }

    #[test]
    fn test_dp_arithmetic() {
        assert_eq!(Dp(40.0) + Dp(10.0) * 2.0, Dp(60.0));
    }
}
