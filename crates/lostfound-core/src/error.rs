//! Error types for lostfound.
//!
//! A single error type with explicit variants for input validation,
//! unknown items, rejected media, and storage failures. Transport layers
//! map these variants onto their own status codes.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for lostfound operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input (required fields, status values, ids).
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// No item with the given id exists.
    #[error("item {id} not found")]
    NotFound { id: String },

    /// An uploaded image was rejected.
    #[error("media rejected: {0}")]
    Media(#[from] MediaError),

    /// Reading or writing durable storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Create a not-found error for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more of title, description, contact is empty or absent.
    #[error("Missing required fields: title, description, contact.")]
    MissingFields,

    /// A status value outside `active` / `resolved`.
    #[error("Status must be 'active' or 'resolved'")]
    InvalidStatus { value: String },

    /// Malformed item id.
    #[error("invalid item id '{value}': {reason}")]
    InvalidId { value: String, reason: String },

    /// Malformed media reference.
    #[error("invalid media reference '{value}': {reason}")]
    InvalidMediaRef { value: String, reason: String },
}

/// Image upload constraint violations.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Declared mime type is not an accepted image type.
    #[error("Only image files are allowed")]
    Unsupported { mime: String },

    /// Payload exceeds the size ceiling. `size` is a lower bound when the
    /// upload was cut off before it was fully read.
    #[error("File too large: the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
}

/// Durable storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The snapshot on disk is not a valid item collection.
    #[error("corrupt snapshot {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
