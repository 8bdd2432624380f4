//! Inverted index for fast candidate lookup
//!
//! This module provides:
//! - InvertedIndex with four independent posting maps (term, prefix, tag, category)
//! - Document storage keyed by id
//! - Candidate search with match counting and match-type priority
//! - Transactional rebuild (clear, then re-add every held document)
//!
//! # Consistency
//!
//! Every id in any posting list refers to a stored document. Re-adding an
//! id replaces the stored document but does NOT remove its stale postings;
//! call `rebuild()` after bulk replacement to restore exact postings.
//!
//! # Ordering
//!
//! Posting lists are ordered sets, so candidates with equal match count and
//! equal type priority come out in ascending id order.

use crate::tokenizer::{camel_case_tokens, prefix_key, prefixes, tokenize};
use chrono::{DateTime, Utc};
use compass_core::{DocumentKind, IndexedDocument, MatchType};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};

/// Default number of candidates returned by `search`
pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// Ordered set of document ids
pub type PostingList = BTreeSet<String>;

/// Mapping from a key (term, prefix, tag, category) to document ids
pub type PostingMap = HashMap<String, PostingList>;

// ============================================================================
// PostingKind
// ============================================================================

/// Which posting map to address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingKind {
    /// Whole word terms
    Term,
    /// Term prefixes of length 2..=4
    Prefix,
    /// Normalized tags
    Tag,
    /// Normalized categories
    Category,
}

// ============================================================================
// SearchCandidate
// ============================================================================

/// A document surfaced by the index for a query, before relevance scoring
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    /// The matched document
    pub document: IndexedDocument,
    /// Query-token x match-type hits, always >= 1
    pub match_count: u32,
    /// Distinct ways the document matched
    pub match_types: BTreeSet<MatchType>,
}

impl SearchCandidate {
    fn new(document: IndexedDocument) -> Self {
        SearchCandidate {
            document,
            match_count: 0,
            match_types: BTreeSet::new(),
        }
    }

    /// 10 x exact + 5 x tag + 3 x category + 1 x partial
    pub fn type_priority(&self) -> u32 {
        self.match_types.iter().map(MatchType::priority).sum()
    }

    /// True if one of the match types is `Exact`
    pub fn has_exact(&self) -> bool {
        self.match_types.contains(&MatchType::Exact)
    }

    /// Human-readable summary of the match types
    pub fn match_reason(&self) -> String {
        let reasons: Vec<&str> = [
            (MatchType::Exact, "Exact term match"),
            (MatchType::Tag, "Tag match"),
            (MatchType::Category, "Category match"),
            (MatchType::Partial, "Partial match"),
        ]
        .iter()
        .filter(|(mt, _)| self.match_types.contains(mt))
        .map(|(_, reason)| *reason)
        .collect();

        if reasons.is_empty() {
            "General match".to_string()
        } else {
            reasons.join(", ")
        }
    }
}

// ============================================================================
// IndexStats
// ============================================================================

/// Index size and timing statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    /// Stored documents
    pub total_items: usize,
    /// Distinct terms in the term postings
    pub total_terms: usize,
    /// `total_terms / total_items`, 0 when empty
    pub average_terms_per_item: f64,
    /// Duration of the last rebuild in milliseconds
    pub build_time_ms: f64,
    /// When the index was last modified
    pub last_updated: DateTime<Utc>,
}

impl Default for IndexStats {
    fn default() -> Self {
        IndexStats {
            total_items: 0,
            total_terms: 0,
            average_terms_per_item: 0.0,
            build_time_ms: 0.0,
            last_updated: Utc::now(),
        }
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

/// Inverted index over knowledge-base documents
///
/// Not internally synchronized: wrap it in a lock when sharing it between
/// threads, with `rebuild()` taking exclusive access.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    terms: PostingMap,
    prefixes: PostingMap,
    tags: PostingMap,
    categories: PostingMap,

    /// id -> document
    items: HashMap<String, IndexedDocument>,
    /// ids in first-insertion order
    order: Vec<String>,

    stats: IndexStats,
}

impl InvertedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Index Updates
    // ========================================================================

    /// Index a document
    ///
    /// Re-adding an existing id replaces the stored document and adds its new
    /// postings, but leaves the old postings in place.
    pub fn add_item(&mut self, doc: IndexedDocument) {
        let id = doc.id.clone();

        for term in Self::extract_terms(&doc) {
            for prefix in prefixes(&term) {
                insert_posting(&mut self.prefixes, prefix, &id);
            }
            insert_posting(&mut self.terms, term, &id);
        }

        for tag in &doc.tags {
            let normalized = normalize_term(tag);
            if !normalized.is_empty() {
                insert_posting(&mut self.tags, normalized, &id);
            }
        }

        if let Some(category) = &doc.category {
            let normalized = normalize_term(category);
            if !normalized.is_empty() {
                insert_posting(&mut self.categories, normalized, &id);
            }
        }

        if self.items.insert(id.clone(), doc).is_none() {
            self.order.push(id);
        }
        self.update_stats();
    }

    /// Remove every document and posting
    pub fn clear(&mut self) {
        self.terms.clear();
        self.prefixes.clear();
        self.tags.clear();
        self.categories.clear();
        self.items.clear();
        self.order.clear();
        self.update_stats();
    }

    /// Discard all postings and re-add every held document
    ///
    /// Documents are re-added in their original insertion order.
    pub fn rebuild(&mut self) {
        let start = Instant::now();
        let order = std::mem::take(&mut self.order);
        let mut items = std::mem::take(&mut self.items);
        let docs: Vec<IndexedDocument> = order.iter().filter_map(|id| items.remove(id)).collect();

        self.clear();
        for doc in docs {
            self.add_item(doc);
        }

        self.stats.build_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            target: "compass::index",
            items = self.stats.total_items,
            terms = self.stats.total_terms,
            elapsed_ms = self.stats.build_time_ms,
            "Index rebuilt"
        );
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Find candidate documents for a query
    ///
    /// Each query token contributes one hit per match type (exact, partial,
    /// tag, category) to every document it matches. Candidates are sorted by
    /// descending match count, then descending type priority, and truncated
    /// to `max_results`. Blank queries yield no candidates.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchCandidate> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut by_id: HashMap<&str, usize> = HashMap::new();
        let mut candidates: Vec<SearchCandidate> = Vec::new();

        for term in &query_terms {
            let term = normalize_term(term);
            let lookups = [
                (MatchType::Exact, self.terms.get(&term)),
                (MatchType::Partial, self.prefixes.get(&prefix_key(&term))),
                (MatchType::Tag, self.tags.get(&term)),
                (MatchType::Category, self.categories.get(&term)),
            ];

            for (match_type, ids) in lookups {
                let Some(ids) = ids else { continue };
                for id in ids {
                    let Some(doc) = self.items.get(id) else { continue };
                    let slot = *by_id.entry(doc.id.as_str()).or_insert_with(|| {
                        candidates.push(SearchCandidate::new(doc.clone()));
                        candidates.len() - 1
                    });
                    let candidate = &mut candidates[slot];
                    candidate.match_count += 1;
                    candidate.match_types.insert(match_type);
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.match_count
                .cmp(&a.match_count)
                .then_with(|| b.type_priority().cmp(&a.type_priority()))
        });
        candidates.truncate(max_results);

        debug!(
            target: "compass::index",
            query = query,
            tokens = query_terms.len(),
            candidates = candidates.len(),
            "Index search completed"
        );

        candidates
    }

    /// Get a document by id (ids are lowercase)
    pub fn get_item(&self, id: &str) -> Option<&IndexedDocument> {
        self.items.get(id)
    }

    /// Check whether an id is stored
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All documents of a kind, in insertion order
    pub fn get_items_by_type(&self, kind: DocumentKind) -> Vec<&IndexedDocument> {
        self.documents().filter(|doc| doc.kind == kind).collect()
    }

    /// All documents, in insertion order
    pub fn documents(&self) -> impl Iterator<Item = &IndexedDocument> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no documents are stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow one of the posting maps
    pub fn postings(&self, kind: PostingKind) -> &PostingMap {
        match kind {
            PostingKind::Term => &self.terms,
            PostingKind::Prefix => &self.prefixes,
            PostingKind::Tag => &self.tags,
            PostingKind::Category => &self.categories,
        }
    }

    /// Current statistics
    pub fn stats(&self) -> IndexStats {
        self.stats.clone()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Distinct terms of a document: searchable text plus camelCase name words
    fn extract_terms(doc: &IndexedDocument) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        let name_terms = doc
            .content
            .component_name()
            .map(camel_case_tokens)
            .unwrap_or_default();

        for term in tokenize(&doc.searchable_text).into_iter().chain(name_terms) {
            if seen.insert(term.clone()) {
                terms.push(term);
            }
        }
        terms
    }

    fn update_stats(&mut self) {
        self.stats.total_items = self.items.len();
        self.stats.total_terms = self.terms.len();
        self.stats.average_terms_per_item = if self.stats.total_items > 0 {
            self.stats.total_terms as f64 / self.stats.total_items as f64
        } else {
            0.0
        };
        self.stats.last_updated = Utc::now();
    }
}

fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

fn insert_posting(map: &mut PostingMap, key: String, id: &str) {
    map.entry(key).or_default().insert(id.to_string());
}

// ============================================================================
// Tests
// ============================================================================
