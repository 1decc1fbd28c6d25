/*!
 * Error types for the vosync library.
 *
 * This module contains custom error types for the conversion, loading and
 * playback layers, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::language_utils::Language;

/// Errors that can occur while converting a source table into a collection
#[derive(Error, Debug)]
pub enum ConversionError {
    /// A required column is absent from a row, or the key cell is blank
    #[error("Malformed record at row {row}: required column '{column}' is missing or empty")]
    MalformedRecord {
        /// 1-based data row number
        row: usize,
        /// Name of the missing column
        column: String,
    },

    /// A timestamp token is not a number
    #[error("Failed to parse timestamp '{token}' in column '{column}' at row {row}")]
    TimestampParse {
        /// 1-based data row number
        row: usize,
        /// Column the token was read from
        column: String,
        /// Offending token
        token: String,
    },

    /// Timestamps and lines of one language disagree
    #[error("Malformed record at row {row} (key '{key}', language {language}): {reason}")]
    InvalidSegments {
        row: usize,
        key: String,
        language: Language,
        reason: String,
    },

    /// The source table itself could not be read or tokenized
    #[error("Failed to read source table {path:?}: {message}")]
    Source {
        path: PathBuf,
        message: String,
    },

    /// The output location could not be created or written
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the collection failed
    #[error("Failed to serialize voiceover collection: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur while loading a persisted collection
#[derive(Error, Debug)]
pub enum LoadError {
    /// The persisted collection does not exist
    #[error("Missing voiceover resource: {resource}")]
    MissingResource {
        resource: String,
    },

    /// The persisted collection is not a valid document
    #[error("Failed to deserialize {resource}: {message}")]
    Deserialization {
        resource: String,
        message: String,
    },

    /// The same key appears twice in one collection
    #[error("Duplicate voiceover key '{key}' in {resource}")]
    DuplicateKey {
        resource: String,
        key: String,
    },

    /// Two distinct keys map to the same voiceover id
    #[error("Voiceover keys '{first}' and '{second}' collide in {resource}")]
    HashCollision {
        resource: String,
        first: String,
        second: String,
    },

    /// A line violates the segment invariants
    #[error("Invalid voiceover line '{key}' in {resource} ({language}): {reason}")]
    InvalidLine {
        resource: String,
        key: String,
        language: Language,
        reason: String,
    },

    /// Reading the resource failed for another reason
    #[error("Failed to read {resource}: {message}")]
    Io {
        resource: String,
        message: String,
    },
}

impl LoadError {
    /// Name of the resource the error refers to
    pub fn resource(&self) -> &str {
        match self {
            Self::MissingResource { resource }
            | Self::Deserialization { resource, .. }
            | Self::DuplicateKey { resource, .. }
            | Self::HashCollision { resource, .. }
            | Self::InvalidLine { resource, .. }
            | Self::Io { resource, .. } => resource,
        }
    }
}

/// Errors reported by an audio collaborator
#[derive(Error, Debug)]
pub enum AudioError {
    /// The referenced clip could not be resolved
    #[error("Audio clip not found: {0}")]
    ClipNotFound(String),

    /// The clip was found but playback could not start
    #[error("Audio playback failed: {0}")]
    PlaybackFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from conversion
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error from loading
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Error from audio playback
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
