//! Configuration errors.

use thiserror::Error;

/// A configuration value outside the range the control can work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A fraction of the track travel was outside `[0, 1]` (or `(0, 1]`).
    #[error("{name} must be a fraction in {range}, got {value}")]
    FractionOutOfRange {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Human-readable accepted range.
        range: &'static str,
    },
    /// A value that must be strictly positive was zero, negative or not finite.
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A value that must not be negative was negative or not finite.
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A value fell below the smallest one the control runs with.
    #[error("{name} must be at least {min}, got {value}")]
    BelowMinimum {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Smallest accepted value.
        min: f32,
    },
    /// The snap tween has no duration.
    #[error("snap animation duration must be greater than zero")]
    ZeroDuration,
}
