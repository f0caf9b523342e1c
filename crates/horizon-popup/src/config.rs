//! Popup configuration.
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! document (or no document at all) is a valid configuration:
//!
//! ```toml
//! haptic_feedback_enabled = true
//! default_style = 1
//! clamp_horizontally = true
//!
//! [screen_insets]
//! top = 24
//! bottom = 48
//! ```

use std::path::Path;

use horizon_popup_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Insets;
use crate::style::StyleId;

/// Settings shared by every popup a controller shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Passed through to surfaces, which decide whether to vibrate on select.
    pub haptic_feedback_enabled: bool,
    /// Style used when neither the menu, the show call nor the theme pick one.
    pub default_style: StyleId,
    /// Shift the surface horizontally to keep it on screen.
    pub clamp_horizontally: bool,
    /// Screen areas the surface keeps clear of (status bar, navigation bar).
    pub screen_insets: Insets,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            screen_insets: Insets::ZERO,
            haptic_feedback_enabled: true,
            default_style: StyleId::DEFAULT_MENU,
            clamp_horizontally: true,
        }
    }
}

impl PopupConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PopupConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            "popup configuration loaded"
        );
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("popup configuration", e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let insets = self.screen_insets;
        for (side, value) in [
            ("top", insets.top),
            ("bottom", insets.bottom),
            ("left", insets.left),
            ("right", insets.right),
        ] {
            if value < 0 {
                return Err(ConfigError::invalid_value(
                    format!("screen_insets.{side}"),
                    format!("must not be negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}
