//! Error types for Compass
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Only document lookups and configuration surface errors to callers. Blank
//! queries are not errors (they yield an empty result) and per-document load
//! failures are collected and skipped rather than aborting an index build.

use std::io;
use thiserror::Error;

/// Result type alias for Compass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Compass
#[derive(Debug, Error)]
pub enum Error {
    /// Requested document id is absent from the index
    #[error("Document '{id}' not found{}", format_suggestions(.suggestions))]
    NotFound {
        /// The id that was requested
        id: String,
        /// Best-effort alternatives from a truncated-prefix search
        suggestions: Vec<String>,
    },

    /// Blank query; reported in the search envelope, never raised by search
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A single source document could not be read or parsed
    #[error("Failed to load '{source_name}': {reason}")]
    LoadFailure {
        /// File name or id of the offending source
        source_name: String,
        /// Human-readable cause
        reason: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read, parsed, or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a `NotFound` error
    pub fn not_found(id: impl Into<String>, suggestions: Vec<String>) -> Self {
        Error::NotFound {
            id: id.into(),
            suggestions,
        }
    }

    /// Build a `LoadFailure` error
    pub fn load_failure(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Error::LoadFailure {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Suggestions carried by a `NotFound` error, empty otherwise
    pub fn suggestions(&self) -> &[String] {
        match self {
            Error::NotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Did you mean: {}?", suggestions.join(", "))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
