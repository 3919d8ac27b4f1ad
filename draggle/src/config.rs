//! Tunables for the slide-to-confirm control.
//!
//! ## Usage
//!
//! Start from [`DraggableConfig::default`] and override what the design
//! calls for with the builder setters:
//!
//! ```
//! use draggle::{DraggableConfig, Dp};
//!
//! let config = DraggableConfig::default()
//!     .track_padding(Dp(10.0))
//!     .velocity_threshold(Dp(1250.0))
//!     .density(2.0);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.thumb_extent_px(), 120.0);
//! ```

use derive_setters::Setters;

use crate::{
    animation::{AnimationSpec, DecaySpec},
    color::Color,
    dp::Dp,
    error::ConfigError,
};

/// Default values for [`DraggableConfig`].
pub struct DraggableDefaults;

impl DraggableDefaults {
    /// Fraction of the travel past which a slow release settles at the end.
    pub const POSITIONAL_THRESHOLD: f32 = 0.5;
    /// Release speed above which the fling projection decides, per second.
    pub const VELOCITY_THRESHOLD: Dp = Dp(125.0);
    /// Thumb diameter.
    pub const THUMB_SIZE: Dp = Dp(40.0);
    /// Horizontal padding between the track edge and the thumb.
    pub const TRACK_PADDING: Dp = Dp(0.0);
    /// Fraction of the travel at which the track reaches its end color.
    pub const COLOR_FULL_AT: f32 = 0.4;
    /// Fraction of the travel at which the hint has fully faded out.
    pub const FADE_FULL_AT: f32 = 0.35;
    /// Track color at the start anchor.
    pub const START_COLOR: Color = Color::from_argb_hex(0xFF4CAF50);
    /// Track color once the thumb has travelled `COLOR_FULL_AT`.
    pub const END_COLOR: Color = Color::from_argb_hex(0xFF117322);
    /// Track color while the control is disabled.
    pub const DISABLED_TRACK_COLOR: Color = Color::TRANSPARENT;
    /// Hint text color at full opacity.
    pub const HINT_COLOR: Color = Color::WHITE;
}

/// Every tunable of the control in one place.
#[derive(Debug, Clone, PartialEq, Setters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DraggableConfig {
    /// Fraction of the travel, in `[0, 1]`, at or past which a release
    /// without fling settles at the end anchor.
    pub positional_threshold: f32,
    /// Release speed (dp per second) above which the decay projection is used
    /// instead of the release position.
    pub velocity_threshold: Dp,
    /// Physical pixels per dp.
    pub density: f32,
    /// Thumb size along the track.
    pub thumb_size: Dp,
    /// Padding on each side of the track; added twice to the thumb size when
    /// computing the end anchor.
    pub track_padding: Dp,
    /// Fraction of the travel, in `(0, 1]`, at which the track color reaches
    /// `end_color`.
    pub color_full_at: f32,
    /// Fraction of the travel, in `(0, 1]`, at which the hint is fully
    /// transparent.
    pub fade_full_at: f32,
    /// Track color at the start.
    pub start_color: Color,
    /// Track color at and past `color_full_at`.
    pub end_color: Color,
    /// Track color while disabled.
    pub disabled_track_color: Color,
    /// Hint color at full opacity.
    pub hint_color: Color,
    /// Animation used to settle on an anchor.
    pub snap_animation: AnimationSpec,
    /// Fling deceleration after a fast release.
    pub decay: DecaySpec,
}

impl Default for DraggableConfig {
    fn default() -> Self {
        Self {
            positional_threshold: DraggableDefaults::POSITIONAL_THRESHOLD,
            velocity_threshold: DraggableDefaults::VELOCITY_THRESHOLD,
            density: 1.0,
            thumb_size: DraggableDefaults::THUMB_SIZE,
            track_padding: DraggableDefaults::TRACK_PADDING,
            color_full_at: DraggableDefaults::COLOR_FULL_AT,
            fade_full_at: DraggableDefaults::FADE_FULL_AT,
            start_color: DraggableDefaults::START_COLOR,
            end_color: DraggableDefaults::END_COLOR,
            disabled_track_color: DraggableDefaults::DISABLED_TRACK_COLOR,
            hint_color: DraggableDefaults::HINT_COLOR,
            snap_animation: AnimationSpec::default(),
            decay: DecaySpec::default(),
        }
    }
}

impl DraggableConfig {
    /// Checks every value against the range the control can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fraction("positional_threshold", self.positional_threshold, true)?;
        fraction("color_full_at", self.color_full_at, false)?;
        fraction("fade_full_at", self.fade_full_at, false)?;
        positive("density", self.density)?;
        non_negative("velocity_threshold", self.velocity_threshold.0)?;
        non_negative("thumb_size", self.thumb_size.0)?;
        non_negative("track_padding", self.track_padding.0)?;
        at_least("decay.friction", self.decay.friction, DecaySpec::MIN_FRICTION)?;
        non_negative("decay.stop_velocity", self.decay.stop_velocity)?;

        match self.snap_animation {
            AnimationSpec::Tween { duration, .. } => {
                if duration.is_zero() {
                    return Err(ConfigError::ZeroDuration);
                }
            }
            AnimationSpec::Spring {
                stiffness,
                damping_ratio,
            } => {
                positive("snap_animation.stiffness", stiffness)?;
                positive("snap_animation.damping_ratio", damping_ratio)?;
            }
        }
        Ok(())
    }

    /// Release speed threshold in pixels per second.
    pub fn velocity_threshold_px(&self) -> f32 {
        self.velocity_threshold.to_px(self.density)
    }

    /// Length the thumb occupies on the track, padding included, in pixels.
    pub fn thumb_extent_px(&self) -> f32 {
        (self.thumb_size + self.track_padding * 2.0).to_px(self.density)
    }
}

fn fraction(name: &'static str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && lower_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange {
            name,
            value,
            range: if allow_zero { "[0, 1]" } else { "(0, 1]" },
        })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn at_least(name: &'static str, value: f32, min: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ConfigError::BelowMinimum { name, value, min })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
