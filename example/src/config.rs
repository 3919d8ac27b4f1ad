//! Demo configuration file.
//!
//! Everything is optional; an absent file or table falls back to the
//! defaults. Example:
//!
//! ```toml
//! track_width = 360.0
//! timeout_ms = 2500
//!
//! [control]
//! density = 2.0
//! velocity_threshold = 1250.0
//!
//! [control.snap_animation]
//! kind = "spring"
//! stiffness = 600.0
//! damping_ratio = 0.8
//! ```

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use draggle::{DraggableConfig, Dp};
use serde::{Deserialize, Serialize};

use crate::loading::DEFAULT_TIMEOUT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Width of the simulated track.
    pub track_width: Dp,
    /// How long the simulated action keeps the control busy.
    pub timeout_ms: u64,
    pub control: DraggableConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            track_width: Dp(320.0),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            control: DraggableConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Self::parse(&source)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn parse(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("Invalid TOML")?;
        config
            .control
            .validate()
            .context("Invalid control configuration")?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Track width in pixels.
    pub fn track_width_px(&self) -> f32 {
        self.track_width.to_px(self.control.density)
    }
}
