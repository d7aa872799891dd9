//! Error types shared across Lodestone crates.
//!
//! Only configuration and script handling can fail. Pointer attraction and
//! spring smoothing absorb their numeric edge cases locally.

use std::path::PathBuf;

use lodestone_model::{ScriptError, SpringParamsError};

/// Top-level error type for Lodestone operations.
#[derive(Debug, thiserror::Error)]
pub enum LodestoneError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid spring `{name}`: {source}")]
    InvalidSpring {
        name: String,
        #[source]
        source: SpringParamsError,
    },

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using LodestoneError.
pub type LodestoneResult<T> = Result<T, LodestoneError>;

impl LodestoneError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_spring(name: impl Into<String>, source: SpringParamsError) -> Self {
        Self::InvalidSpring {
            name: name.into(),
            source,
        }
    }
}
