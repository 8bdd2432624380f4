//! Compass - search and ranking over design-system knowledge bases
//!
//! Compass indexes component, system, workflow and recipe documents and
//! answers free-text queries with ranked, explained results.
//!
//! # Quick Start
//!
//! ```
//! use compass::{DocumentKind, InMemorySource, SearchOptions, SearchService};
//! use serde_json::json;
//!
//! let source = InMemorySource::default().with_document(
//!     "form-item",
//!     DocumentKind::Component,
//!     json!({ "componentName": "FormItem", "summary": "Labelled form input" }),
//! );
//!
//! let service = SearchService::default();
//! service.initialize(&source);
//!
//! let results = service.search("form", &SearchOptions::new());
//! assert_eq!(results[0].id, "formitem");
//! ```
//!
//! # Architecture
//!
//! - `compass-core`: document model, search types, errors, configuration
//! - `compass-search`: tokenizer, inverted index, document sources
//! - `compass-intelligence`: intent, expansion, ranking, cache, analytics
//!
//! Only the facade types are re-exported here. Depend on the member crates
//! directly for scorer, cache or index internals.

pub use compass_core::{
    DocumentContent, DocumentKind, Error, IndexedDocument, IntentKind, MatchType, RankedResult,
    RelevanceFactors, Result, ScoreWeights, SearchConfig, SearchOptions, WeightOverrides,
    CONFIG_FILE_NAME,
};
pub use compass_intelligence::{
    InitSummary, IntentSummary, QueryPatternReport, SearchAnalytics, SearchOutcome,
    SearchService,
};
pub use compass_search::{DirectorySource, DocumentSource, InMemorySource, IndexStats};

/// Build a service from configuration and load its `[data]` directories
///
/// # Errors
///
/// `Error::Config` when the configuration is invalid or names no data
/// directory.
pub fn open(config: SearchConfig) -> Result<(SearchService, InitSummary)> {
    config.validate()?;
    let data_dir = config
        .data
        .data_dir
        .clone()
        .ok_or_else(|| Error::Config("[data] data_dir is not set".into()))?;

    let mut source = DirectorySource::new(data_dir);
    if let Some(docs_dir) = &config.data.docs_dir {
        source = source.with_docs_dir(docs_dir);
    }

    let service = SearchService::new(config);
    let summary = service.initialize(&source);
    Ok((service, summary))
}
