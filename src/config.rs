//! Editor configuration parsed from environment variables.

use std::str::FromStr;

use crate::consts::{DEFAULT_CONVERTER, DEFAULT_FPS, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};

pub const CONVERTER_VAR: &str = "POLYEDIT_CONVERTER";
pub const VIEWPORT_WIDTH_VAR: &str = "POLYEDIT_VIEWPORT_WIDTH";
pub const VIEWPORT_HEIGHT_VAR: &str = "POLYEDIT_VIEWPORT_HEIGHT";
pub const FPS_VAR: &str = "POLYEDIT_FPS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub converter: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub fps: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            converter: DEFAULT_CONVERTER.to_owned(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            fps: DEFAULT_FPS,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `POLYEDIT_CONVERTER`: converter executable, default `PolyConverter.exe`
    /// - `POLYEDIT_VIEWPORT_WIDTH`: default 1200
    /// - `POLYEDIT_VIEWPORT_HEIGHT`: default 600
    /// - `POLYEDIT_FPS`: default 60
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when a numeric variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`EditorConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            converter: lookup(CONVERTER_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.converter),
            viewport_width: parse_or(&lookup, VIEWPORT_WIDTH_VAR, defaults.viewport_width)?,
            viewport_height: parse_or(&lookup, VIEWPORT_HEIGHT_VAR, defaults.viewport_height)?,
            fps: parse_or(&lookup, FPS_VAR, defaults.fps)?,
        })
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: T) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var: var.to_owned(), value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
