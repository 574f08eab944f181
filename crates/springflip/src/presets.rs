//! Spring presets
//!
//! Named origami-scale spring parameters for flip transitions.

use crate::error::FlipError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spring parameters attached to a flip descriptor
///
/// `stiffness` and `damping` are origami-scale values, converted to physical
/// parameters by the spring system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlipSpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    #[serde(default)]
    pub overshoot_clamping: bool,
}

impl FlipSpringConfig {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            overshoot_clamping: false,
        }
    }

    /// Stop at the end value instead of oscillating around it
    pub fn with_overshoot_clamping(mut self, enabled: bool) -> Self {
        self.overshoot_clamping = enabled;
        self
    }
}

impl Default for FlipSpringConfig {
    fn default() -> Self {
        SpringPreset::default().config()
    }
}

impl From<SpringPreset> for FlipSpringConfig {
    fn from(preset: SpringPreset) -> Self {
        preset.config()
    }
}

/// Named spring configurations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpringPreset {
    /// Quick with no visible overshoot
    #[default]
    NoWobble,
    /// Slow, soft settle
    Gentle,
    /// Softer than gentle with a little more damping
    VeryGentle,
    /// Visible overshoot and bounce
    Wobbly,
    /// Fast and firm
    Stiff,
}

impl SpringPreset {
    pub const ALL: [SpringPreset; 5] = [
        SpringPreset::NoWobble,
        SpringPreset::Gentle,
        SpringPreset::VeryGentle,
        SpringPreset::Wobbly,
        SpringPreset::Stiff,
    ];

    pub fn config(self) -> FlipSpringConfig {
        let (stiffness, damping) = match self {
            SpringPreset::NoWobble => (200.0, 26.0),
            SpringPreset::Gentle => (120.0, 14.0),
            SpringPreset::VeryGentle => (130.0, 17.0),
            SpringPreset::Wobbly => (180.0, 12.0),
            SpringPreset::Stiff => (260.0, 26.0),
        };
        FlipSpringConfig::new(stiffness, damping)
    }

    pub fn name(self) -> &'static str {
        match self {
            SpringPreset::NoWobble => "noWobble",
            SpringPreset::Gentle => "gentle",
            SpringPreset::VeryGentle => "veryGentle",
            SpringPreset::Wobbly => "wobbly",
            SpringPreset::Stiff => "stiff",
        }
    }
}

impl fmt::Display for SpringPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpringPreset {
    type Err = FlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpringPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| FlipError::UnknownPreset(s.to_string()))
    }
}
