//! Flip settings
//!
//! Default spring and named stagger configurations, loadable from TOML:
//!
//! ```toml
//! spring = "gentle"                 # or { stiffness = 300, damping = 20 }
//!
//! [stagger.default]
//! speed = 0.5
//!
//! [stagger.list]
//! reverse = true
//! ```

use crate::error::Result;
use crate::presets::{FlipSpringConfig, SpringPreset};
use crate::stagger::StaggerConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Stagger key used for elements that ask for staggering without naming a group
pub const DEFAULT_STAGGER_KEY: &str = "default";

/// Spring given either by preset name or explicit parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpringSetting {
    Preset(SpringPreset),
    Custom(FlipSpringConfig),
}

impl SpringSetting {
    pub fn resolve(self) -> FlipSpringConfig {
        match self {
            SpringSetting::Preset(preset) => preset.config(),
            SpringSetting::Custom(config) => config,
        }
    }
}

impl Default for SpringSetting {
    fn default() -> Self {
        SpringSetting::Preset(SpringPreset::default())
    }
}

/// Settings shared by every flip run by one animator
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipSettings {
    /// Spring used by descriptors that do not bring their own
    pub spring: SpringSetting,
    /// Stagger configurations by stagger key
    pub stagger: HashMap<String, StaggerConfig>,
}

impl FlipSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: FlipSettings = toml::from_str(source)?;
        settings.warn_out_of_range();
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading flip settings");
        Self::from_toml_str(&source)
    }

    /// Set the default spring.
    pub fn with_spring(mut self, spring: impl Into<SpringSetting>) -> Self {
        self.spring = spring.into();
        self
    }

    /// Add or replace a stagger configuration.
    pub fn with_stagger(mut self, key: impl Into<String>, config: StaggerConfig) -> Self {
        self.stagger.insert(key.into(), config);
        self
    }

    pub fn spring_config(&self) -> FlipSpringConfig {
        self.spring.resolve()
    }

    /// Stagger configuration for `key`, or the default configuration
    pub fn stagger(&self, key: &str) -> StaggerConfig {
        self.stagger.get(key).copied().unwrap_or_default()
    }

    fn warn_out_of_range(&self) {
        for (key, config) in &self.stagger {
            if let Some(speed) = config.speed {
                if !(0.0..=1.0).contains(&speed) {
                    tracing::warn!(key = %key, speed, "stagger speed outside 0..=1 will be clamped");
                }
            }
        }
    }
}

impl From<SpringPreset> for SpringSetting {
    fn from(preset: SpringPreset) -> Self {
        SpringSetting::Preset(preset)
    }
}

impl From<FlipSpringConfig> for SpringSetting {
    fn from(config: FlipSpringConfig) -> Self {
        SpringSetting::Custom(config)
    }
}
