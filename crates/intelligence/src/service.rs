//! Search service facade
//!
//! `SearchService` owns the index, the query cache and the analytics for one
//! knowledge base. Independent instances share nothing.
//!
//! # Locking
//!
//! - `index`: `RwLock`; searches read, `initialize`/`add_document`/`rebuild_index` write.
//! - `state`: `Mutex` over cache and analytics, which are always reset together.
//!
//! When both are needed, `state` is taken first. Writers to `index` never
//! hold `state` at the same time.
//!
//! # Search flow
//!
//! ```text
//! query ─► normalize ─► record query ─► cache? ──hit──────────────┐
//!                                         │ miss                  │
//!                                         ▼                       │
//!                        intent ─► index candidates ─► rank ─► cache put
//!                                                                 │
//!                         filters ◄───────────────────────────────┘
//!                            │
//!                            ▼
//!                     priority rules ─► truncate ─► round
//! ```

use crate::analytics::{QueryAnalytics, QueryPatternReport, SearchAnalytics};
use crate::cache::{normalize_query, QueryCache};
use crate::expand::ConceptMap;
use crate::intent::{IntentClassifier, QueryIntent};
use crate::ranker::{RankingParams, RelevanceRanker};
use crate::rules::PriorityRules;
use crate::scorer::ScorerContext;
use chrono::{DateTime, Utc};
use compass_core::{
    extract_tags, DocumentKind, Error, IndexedDocument, IntentKind, RankedResult, Result,
    SearchConfig, SearchOptions,
};
use compass_search::{DocumentSource, IndexStats, InvertedIndex};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Index suggestions attached to an empty search outcome
pub const EMPTY_RESULT_SUGGESTIONS: usize = 3;

/// Suggestions attached to a `NotFound` error
pub const NOT_FOUND_SUGGESTIONS: usize = 5;

/// Characters of a name used for suggestion lookups
const SUGGESTION_PREFIX_LEN: usize = 3;

// ============================================================================
// Outcome types
// ============================================================================

/// Intent as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentSummary {
    /// Detected intent
    pub kind: IntentKind,
    /// Confidence, rounded to 2 decimal places
    pub confidence: f64,
    /// Suggested downstream operations
    pub suggested_tools: Vec<String>,
}

impl From<&QueryIntent> for IntentSummary {
    fn from(intent: &QueryIntent) -> Self {
        IntentSummary {
            kind: intent.kind,
            confidence: compass_core::round2(intent.confidence),
            suggested_tools: intent.suggested_tools.clone(),
        }
    }
}

/// Structured search response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// The query as received
    pub query: String,
    /// Detected intent
    pub intent: IntentSummary,
    /// Ranked results came from the cache
    pub cache_hit: bool,
    /// Results before truncation (after filters and priority rules)
    pub total_results: usize,
    /// Results, best first, rounded to 2 decimal places
    pub results: Vec<RankedResult>,
    /// Component names to try instead, when there are no results
    pub suggestions: Vec<String>,
    /// Hint shown when there are no results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_tip: Option<String>,
    /// Problem with the request, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    fn blank(query: &str) -> Self {
        SearchOutcome {
            query: query.to_string(),
            intent: IntentSummary::from(&QueryIntent::fallback()),
            cache_hit: false,
            total_results: 0,
            results: Vec::new(),
            suggestions: Vec::new(),
            search_tip: Some(search_tip(query)),
            error: Some(Error::InvalidQuery("query is blank".into()).to_string()),
        }
    }
}

fn search_tip(query: &str) -> String {
    format!(
        "No matches found for \"{}\". Try terms like \"form\", \"layout\", \"button\", \"figma\", or \"design conversion\".",
        query
    )
}

/// Result of loading a document source
#[derive(Debug)]
pub struct InitSummary {
    /// Index statistics after the load
    pub stats: IndexStats,
    /// Documents that were skipped
    pub failures: Vec<Error>,
}

// ============================================================================
// SearchService
// ============================================================================

struct QueryState {
    cache: QueryCache,
    analytics: QueryAnalytics,
}

/// Search and ranking over one knowledge base
pub struct SearchService {
    config: SearchConfig,
    index: RwLock<InvertedIndex>,
    state: Mutex<QueryState>,
    concepts: ConceptMap,
    classifier: IntentClassifier,
    ranker: RelevanceRanker,
    rules: PriorityRules,
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchService {
    /// Create an empty service
    pub fn new(config: SearchConfig) -> Self {
        let cache = QueryCache::new(config.cache_capacity, config.cache_ttl());
        SearchService {
            config,
            index: RwLock::new(InvertedIndex::new()),
            state: Mutex::new(QueryState {
                cache,
                analytics: QueryAnalytics::new(),
            }),
            concepts: ConceptMap::standard(),
            classifier: IntentClassifier::new(),
            ranker: RelevanceRanker::new(),
            rules: PriorityRules::default(),
        }
    }

    /// Builder: replace the concept map
    pub fn with_concepts(mut self, concepts: ConceptMap) -> Self {
        self.concepts = concepts;
        self
    }

    /// Builder: replace the priority rules
    pub fn with_rules(mut self, rules: PriorityRules) -> Self {
        self.rules = rules;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Replace the index with every document of a source
    ///
    /// Skipped documents are reported, not fatal. Cached results are dropped;
    /// analytics are kept.
    pub fn initialize(&self, source: &dyn DocumentSource) -> InitSummary {
        let report = source.list_documents();

        let mut fresh = InvertedIndex::new();
        for document in report.documents {
            fresh.add_item(document);
        }
        fresh.rebuild();
        let stats = fresh.stats();

        *self.index.write() = fresh;
        self.state.lock().cache.clear();

        info!(
            target: "compass::service",
            source = source.name(),
            documents = stats.total_items,
            terms = stats.total_terms,
            skipped = report.failures.len(),
            "Knowledge base loaded"
        );

        InitSummary {
            stats,
            failures: report.failures,
        }
    }

    /// Index one more document and drop cached results
    pub fn add_document(&self, document: IndexedDocument) {
        self.index.write().add_item(document);
        self.state.lock().cache.clear();
    }

    /// Rebuild the index postings from the held documents
    pub fn rebuild_index(&self) -> IndexStats {
        let mut index = self.index.write();
        index.rebuild();
        index.stats()
    }

    /// Current index statistics
    pub fn index_stats(&self) -> IndexStats {
        self.index.read().stats()
    }

    /// Number of indexed documents of a kind
    pub fn document_count(&self, kind: DocumentKind) -> usize {
        self.index.read().get_items_by_type(kind).len()
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Ranked results for a query; blank queries yield nothing
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<RankedResult> {
        self.search_detailed(query, options).results
    }

    /// Search with the full response envelope
    pub fn search_detailed(&self, query: &str, options: &SearchOptions) -> SearchOutcome {
        self.search_detailed_at(query, options, Utc::now())
    }

    /// Search at a given time (freshness and cache expiry use `now`)
    pub fn search_detailed_at(
        &self,
        query: &str,
        options: &SearchOptions,
        now: DateTime<Utc>,
    ) -> SearchOutcome {
        if query.trim().is_empty() {
            debug!(target: "compass::service", "Blank query");
            return SearchOutcome::blank(query);
        }

        let normalized = normalize_query(query);
        let intent = self.classifier.detect(query);
        let params = self.ranking_params(options);
        let cacheable = options.custom_weights.is_none()
            && params.boost_recent == self.config.boost_recent;

        let (ranked, cache_hit) = {
            let mut state = self.state.lock();
            state.analytics.record_query(&normalized);

            match cacheable
                .then(|| state.cache.get_at(&normalized, now))
                .flatten()
            {
                Some(results) => (results, true),
                None => {
                    state.analytics.record_intent(intent.kind);
                    let expanded = self.concepts.expand(query);
                    let ctx = ScorerContext {
                        query,
                        expanded_terms: &expanded,
                        intent: &intent,
                        now,
                    };
                    let ranked = {
                        let index = self.index.read();
                        let candidates = index.search(query, self.config.candidate_limit);
                        self.ranker.rank(&candidates, &ctx, &state.analytics, &params)
                    };
                    if cacheable {
                        state.cache.put_at(&normalized, ranked.clone(), now);
                    }
                    (ranked, false)
                }
            }
        };

        let mut results = ranked;
        if options.has_filters() {
            results.retain(|r| passes_filters(r, options));
        }

        let mut results = self.rules.apply(results, query, &self.index.read());
        let total_results = results.len();
        results.truncate(options.max_results.unwrap_or(self.config.max_results));
        let results: Vec<RankedResult> = results.iter().map(RankedResult::rounded).collect();

        let (suggestions, search_tip) = if results.is_empty() {
            (
                self.search_suggestions(query, EMPTY_RESULT_SUGGESTIONS),
                Some(search_tip(query)),
            )
        } else {
            (Vec::new(), None)
        };

        debug!(
            target: "compass::service",
            query = %normalized,
            intent = %intent.kind,
            cache_hit,
            total = total_results,
            returned = results.len(),
            "Search completed"
        );

        SearchOutcome {
            query: query.to_string(),
            intent: IntentSummary::from(&intent),
            cache_hit,
            total_results,
            results,
            suggestions,
            search_tip,
            error: None,
        }
    }

    fn ranking_params(&self, options: &SearchOptions) -> RankingParams {
        let weights = match &options.custom_weights {
            Some(overrides) => {
                let (merged, rejected) = self.config.weights.with_overrides(overrides);
                if !rejected.is_empty() {
                    warn!(
                        target: "compass::service",
                        fields = ?rejected,
                        "Ignoring invalid custom weights, using defaults"
                    );
                }
                merged
            }
            None => self.config.weights,
        };
        RankingParams {
            weights,
            similarity_threshold: self.config.similarity_threshold,
            boost_recent: options.boost_recent.unwrap_or(self.config.boost_recent),
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// A document by id (case-insensitive)
    ///
    /// # Errors
    ///
    /// `Error::NotFound` with component-name suggestions.
    pub fn get_document(&self, id: &str) -> Result<IndexedDocument> {
        let found = self.index.read().get_item(&id.to_lowercase()).cloned();
        found.ok_or_else(|| Error::not_found(id, self.search_suggestions(id, NOT_FOUND_SUGGESTIONS)))
    }

    /// Full component content, optionally focused on one framework
    ///
    /// The name is matched by id, then by variations (lowercase, without
    /// `-`/`_`, camelCase as kebab-case). With a framework whose
    /// `installation` entry exists, the result gains `focusedFramework` and
    /// `focusedExamples`.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` with component-name suggestions.
    pub fn get_component_details(&self, name: &str, framework: Option<&str>) -> Result<Value> {
        let component = self.find_component(name).ok_or_else(|| {
            Error::not_found(name, self.search_suggestions(name, NOT_FOUND_SUGGESTIONS))
        })?;

        let mut content = component.content.into_value();
        if let Some(framework) = framework {
            let examples = content
                .get("installation")
                .and_then(|inst| inst.get(framework))
                .cloned();
            if let (Some(examples), Some(map)) = (examples, content.as_object_mut()) {
                map.insert("focusedFramework".into(), Value::String(framework.to_string()));
                map.insert("focusedExamples".into(), examples);
            }
        }
        Ok(content)
    }

    fn find_component(&self, name: &str) -> Option<IndexedDocument> {
        let index = self.index.read();
        let lower = name.to_lowercase();
        if let Some(doc) = index
            .get_item(&lower)
            .filter(|d| d.kind == DocumentKind::Component)
        {
            return Some(doc.clone());
        }

        let variations = name_variations(name);
        index
            .get_items_by_type(DocumentKind::Component)
            .into_iter()
            .find(|doc| {
                let doc_name = doc.name().to_lowercase();
                let doc_compact = strip_separators(&doc.id);
                variations
                    .iter()
                    .any(|v| *v == doc.id || *v == doc_name || *v == doc_compact)
            })
            .cloned()
    }

    /// Component names sharing the first three characters of `partial`
    pub fn search_suggestions(&self, partial: &str, max: usize) -> Vec<String> {
        let prefix: String = partial
            .trim()
            .to_lowercase()
            .chars()
            .take(SUGGESTION_PREFIX_LEN)
            .collect();
        if prefix.trim().is_empty() {
            return Vec::new();
        }

        let index = self.index.read();
        let mut seen = HashSet::new();
        index
            .search(&prefix, self.config.candidate_limit)
            .into_iter()
            .filter(|c| c.document.kind == DocumentKind::Component)
            .map(|c| c.document.name().to_string())
            .filter(|name| seen.insert(name.clone()))
            .take(max)
            .collect()
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    /// Analytics snapshot
    pub fn get_analytics(&self) -> SearchAnalytics {
        let state = self.state.lock();
        state.analytics.snapshot(&state.cache)
    }

    /// Past queries resembling `partial`, most frequent first
    pub fn query_suggestions(&self, partial: &str, max: usize) -> Vec<String> {
        self.state.lock().analytics.suggestions(partial, max)
    }

    /// Term, complexity and tuning analysis of past queries
    pub fn analyze_query_patterns(&self) -> QueryPatternReport {
        let state = self.state.lock();
        state.analytics.analyze_patterns(&state.cache)
    }

    /// Wipe the cache together with query and intent analytics
    pub fn clear_cache(&self) {
        let mut state = self.state.lock();
        state.cache.clear();
        state.analytics.clear();
        info!(target: "compass::service", "Cache and analytics cleared");
    }

    /// Number of cached result sets
    pub fn cached_queries(&self) -> usize {
        self.state.lock().cache.len()
    }
}

fn passes_filters(result: &RankedResult, options: &SearchOptions) -> bool {
    let tags = extract_tags(&result.content);
    options.accepts(result.kind, result.content.category(), &tags)
}

fn strip_separators(name: &str) -> String {
    name.chars().filter(|c| *c != '-' && *c != '_').collect()
}

/// camelCase / PascalCase -> kebab-case
fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn name_variations(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let mut variations = vec![lower.clone(), strip_separators(&lower), camel_to_kebab(name)];
    variations.dedup();
    variations
}
