//! Ranking layer for Compass
//!
//! Derived operations over index candidates: intent detection, concept
//! expansion, relevance scoring, priority rules, result caching and query
//! analytics. `SearchService` ties them together.
//!
//! This crate provides:
//! - IntentClassifier and QueryIntent for query classification
//! - ConceptMap for synonym expansion
//! - Scorer trait with BaseRelevanceScorer and WeightedScorer
//! - RelevanceRanker for threshold, weighting and recency boost
//! - PriorityRules for pinned setup and workflow entries
//! - QueryCache (TTL + capacity bound) and QueryAnalytics
//! - SearchService facade
//!
//! # Usage
//!
//! ```
//! use compass_core::{DocumentKind, SearchOptions};
//! use compass_intelligence::SearchService;
//! use compass_search::InMemorySource;
//! use serde_json::json;
//!
//! let source = InMemorySource::default().with_document(
//!     "button",
//!     DocumentKind::Component,
//!     json!({ "componentName": "Button", "summary": "Primary action button" }),
//! );
//!
//! let service = SearchService::default();
//! service.initialize(&source);
//!
//! let results = service.search("button", &SearchOptions::new());
//! assert_eq!(results[0].id, "button");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analytics;
pub mod cache;
pub mod expand;
pub mod fuzzy;
pub mod intent;
pub mod ranker;
pub mod rules;
pub mod scorer;
pub mod semantic;
pub mod service;

// Re-export commonly used types
pub use analytics::{
    QueryAnalytics, QueryComplexity, QueryCount, QueryPatternReport, SearchAnalytics,
    TermFrequency,
};
pub use cache::{normalize_query, CacheEntry, QueryCache};
pub use expand::ConceptMap;
pub use fuzzy::{fuzzy_similarity, levenshtein_distance};
pub use intent::{IntentClassifier, QueryIntent};
pub use ranker::{rank_candidates, RankingParams, RelevanceRanker};
pub use rules::{PriorityRules, QuerySignals, MANDATORY_ENTRY_ID};
pub use scorer::{BaseRelevanceScorer, DocumentSignals, Scorer, ScorerContext, WeightedScorer};
pub use service::{InitSummary, IntentSummary, SearchOutcome, SearchService};
