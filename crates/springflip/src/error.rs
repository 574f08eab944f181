//! Error types for springflip
//!
//! Scheduling never fails; only loading settings does.

use std::io;
use thiserror::Error;

/// Errors that can occur when loading flip settings
#[derive(Error, Debug)]
pub enum FlipError {
    /// IO error when reading a settings file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Settings file is not valid TOML or has the wrong shape
    #[error("Settings parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Spring preset name not recognised
    #[error("Unknown spring preset: {0}")]
    UnknownPreset(String),
}

/// Result type for springflip operations
pub type Result<T> = std::result::Result<T, FlipError>;
