//! Error types for the crate's edges.
//!
//! Per-frame operations never fail; abnormal input is modelled as data
//! (`None`, fallback shapes, ignored payloads). Errors only arise when loading
//! configuration or decoding records that arrive from outside the process.

/// Error types for configuration loading and wire decoding.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Unknown message kind: {0}")]
    UnknownMessage(String),
}

impl SketchError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SketchError>;
