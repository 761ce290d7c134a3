//! Error types for the heartnotes application.
//!
//! This module defines the error kinds that can surface from the note store,
//! the daily counter, image decoding and the command-line front end.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the heartnotes application.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Errors related to file I/O operations outside the key-value store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A note was rejected before it was created.
    #[error("Invalid note: {message}")]
    Validation { message: String },

    /// The key-value store failed to read or write a value.
    #[error("Storage error on '{key}': {message}")]
    Storage { key: String, message: String },

    /// A file could not be turned into an embeddable image.
    #[error("Could not decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: i64 },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("{message}")]
    EditorError { message: String },
}

impl JournalError {
    /// Whether this error came from input the user can correct.
    pub fn is_validation(&self) -> bool {
        matches!(self, JournalError::Validation { .. })
    }
}
