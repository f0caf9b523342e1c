//! Error types for popup menus.

use std::path::PathBuf;

/// Result type alias for popup operations.
pub type Result<T> = std::result::Result<T, PopupError>;

/// Errors that can occur while building, showing or configuring popups.
#[derive(Debug, thiserror::Error)]
pub enum PopupError {
    /// The menu content is invalid. Raised before any surface is created.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `show` was called while the popup is already visible.
    #[error("Popup is already visible; dismiss it before showing it again")]
    AlreadyVisible,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Menu content validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The menu has no sections.
    #[error("Menu has no sections")]
    EmptyMenu,

    /// A section has no items.
    #[error("Section {index} ({}) has no items", .title.as_deref().unwrap_or("untitled"))]
    EmptySection { index: usize, title: Option<String> },
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing error.
    #[error("Failed to parse popup configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read popup configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid property value.
    #[error("Invalid value for '{property}': {message}")]
    InvalidValue { property: String, message: String },
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }
}
