//! Core types for Compass
//!
//! This crate defines the foundational types used throughout the system:
//! - DocumentKind, DocumentContent, IndexedDocument: the document model
//! - MatchType, IntentKind, ScoreWeights, RankedResult, SearchOptions: search types
//! - SearchConfig: configuration loaded from `compass.toml`
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod search_types;

pub use config::{DataConfig, SearchConfig, CONFIG_FILE_NAME};
pub use document::{extract_tags, searchable_text, DocumentContent, DocumentKind, IndexedDocument};
pub use error::{Error, Result};
pub use search_types::{
    round2, IntentKind, MatchType, RankedResult, RelevanceFactors, ScoreWeights, SearchOptions,
    WeightOverrides,
};
