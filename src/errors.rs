//! Error types for the diaglab client.
//!
//! This module defines custom error types that categorize different failures
//! that can occur while talking to the diagram service or managing local
//! session state.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the diaglab client.
#[derive(Error, Debug)]
pub enum DiaglabError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors raised by the HTTP layer before a response body is available.
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failure reported by the diagram service itself, carrying the message
    /// from the response envelope.
    #[error("{message}")]
    Api { message: String },

    /// Input rejected locally before any request was sent.
    #[error("{message}")]
    Validation { message: String },

    /// No stored session; the command needs a signed-in user.
    #[error("not signed in; run `diaglab login` or `diaglab demo` first")]
    NoSession,

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },
}

impl DiaglabError {
    /// True when the failure came back from the service rather than from the
    /// local environment.
    pub fn is_remote(&self) -> bool {
        matches!(self, DiaglabError::Api { .. } | DiaglabError::Transport(_))
    }
}
