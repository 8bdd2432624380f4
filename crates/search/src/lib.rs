//! Retrieval layer for Compass
//!
//! This crate provides:
//! - Tokenizer shared by indexing and querying
//! - InvertedIndex with term, prefix, tag and category postings
//! - DocumentSource trait with directory and in-memory implementations
//!
//! Ranking lives in `compass-intelligence`; this crate only surfaces
//! candidates.
//!
//! # Usage
//!
//! ```
//! use compass_core::{DocumentKind, IndexedDocument};
//! use compass_search::InvertedIndex;
//! use serde_json::json;
//!
//! let mut index = InvertedIndex::new();
//! index.add_item(IndexedDocument::from_content(
//!     "button",
//!     DocumentKind::Component,
//!     json!({ "componentName": "Button", "summary": "Primary action" }),
//! ));
//!
//! let candidates = index.search("button", 20);
//! assert_eq!(candidates[0].document.id, "button");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod source;
pub mod tokenizer;

// Re-export commonly used types
pub use index::{
    IndexStats, InvertedIndex, PostingKind, PostingList, PostingMap, SearchCandidate,
    DEFAULT_MAX_CANDIDATES,
};
pub use source::{DirectorySource, DocumentSource, InMemorySource, LoadReport};
pub use tokenizer::{tokenize, tokenize_unique};
