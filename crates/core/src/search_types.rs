//! Core search types shared by the index, the ranker and the service
//!
//! This module defines:
//! - MatchType: how a candidate matched a query token
//! - IntentKind: coarse classification of query purpose
//! - ScoreWeights / WeightOverrides: the ranking weight vector
//! - RelevanceFactors: per-document scoring inputs
//! - RankedResult: a scored, explained search result
//! - SearchOptions: caller-supplied filters and overrides

use crate::document::{DocumentContent, DocumentKind};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MatchType
// ============================================================================

/// How a candidate matched a query token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Whole-term match against the term postings
    Exact,
    /// Prefix match (token truncated to at most 4 chars)
    Partial,
    /// Tag match
    Tag,
    /// Category match
    Category,
}

impl MatchType {
    /// Contribution to a candidate's type priority
    ///
    /// Exact > Tag > Category > Partial.
    pub fn priority(&self) -> u32 {
        match self {
            MatchType::Exact => 10,
            MatchType::Tag => 5,
            MatchType::Category => 3,
            MatchType::Partial => 1,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Partial => "partial",
            MatchType::Tag => "tag",
            MatchType::Category => "category",
        }
    }
}

// ============================================================================
// IntentKind
// ============================================================================

/// Coarse classification of what a query is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Looking up a component
    ComponentSearch,
    /// Asking how to implement or integrate something
    ImplementationGuidance,
    /// Asking for a workflow (design conversion, build process)
    WorkflowRequest,
    /// Something is broken
    Troubleshooting,
}

impl IntentKind {
    /// All intents, in registration order
    pub const ALL: [IntentKind; 4] = [
        IntentKind::ComponentSearch,
        IntentKind::ImplementationGuidance,
        IntentKind::WorkflowRequest,
        IntentKind::Troubleshooting,
    ];

    /// snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::ComponentSearch => "component_search",
            IntentKind::ImplementationGuidance => "implementation_guidance",
            IntentKind::WorkflowRequest => "workflow_request",
            IntentKind::Troubleshooting => "troubleshooting",
        }
    }

    /// Human-readable label ("component search")
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ScoreWeights
// ============================================================================

/// Weight vector for the final ranking score
///
/// Each raw factor is scaled before weighting: exact match contributes
/// `weight * 100` when true, context relevance `factor * weight * 50`, every
/// other factor `factor * weight * 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of the exact-name-match flag
    pub exact_match: f64,
    /// Weight of expanded-term overlap
    pub semantic_similarity: f64,
    /// Weight of intent context boosts
    pub context_relevance: f64,
    /// Weight of intent/kind alignment
    pub intent_alignment: f64,
    /// Weight of document freshness
    pub freshness: f64,
    /// Weight of historical query popularity
    pub popularity: f64,
    /// Weight of intent/kind type relevance
    pub type_relevance: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            exact_match: 0.25,
            semantic_similarity: 0.20,
            context_relevance: 0.20,
            intent_alignment: 0.15,
            freshness: 0.10,
            popularity: 0.05,
            type_relevance: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Apply caller overrides on top of these weights
    ///
    /// Overrides that are negative, NaN or infinite are ignored and the
    /// current value kept. Returns the merged weights and the names of the
    /// rejected fields.
    pub fn with_overrides(&self, overrides: &WeightOverrides) -> (ScoreWeights, Vec<&'static str>) {
        let mut merged = *self;
        let mut rejected = Vec::new();

        let fields: [(&'static str, Option<f64>, &mut f64); 7] = [
            ("exact_match", overrides.exact_match, &mut merged.exact_match),
            (
                "semantic_similarity",
                overrides.semantic_similarity,
                &mut merged.semantic_similarity,
            ),
            (
                "context_relevance",
                overrides.context_relevance,
                &mut merged.context_relevance,
            ),
            (
                "intent_alignment",
                overrides.intent_alignment,
                &mut merged.intent_alignment,
            ),
            ("freshness", overrides.freshness, &mut merged.freshness),
            ("popularity", overrides.popularity, &mut merged.popularity),
            (
                "type_relevance",
                overrides.type_relevance,
                &mut merged.type_relevance,
            ),
        ];

        for (name, value, slot) in fields {
            match value {
                Some(v) if v.is_finite() && v >= 0.0 => *slot = v,
                Some(_) => rejected.push(name),
                None => {}
            }
        }

        (merged, rejected)
    }

    /// True if every weight is finite and non-negative
    pub fn is_valid(&self) -> bool {
        [
            self.exact_match,
            self.semantic_similarity,
            self.context_relevance,
            self.intent_alignment,
            self.freshness,
            self.popularity,
            self.type_relevance,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Partial weight vector supplied per request
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    /// Override for `exact_match`
    pub exact_match: Option<f64>,
    /// Override for `semantic_similarity`
    pub semantic_similarity: Option<f64>,
    /// Override for `context_relevance`
    pub context_relevance: Option<f64>,
    /// Override for `intent_alignment`
    pub intent_alignment: Option<f64>,
    /// Override for `freshness`
    pub freshness: Option<f64>,
    /// Override for `popularity`
    pub popularity: Option<f64>,
    /// Override for `type_relevance`
    pub type_relevance: Option<f64>,
}

// ============================================================================
// RelevanceFactors / RankedResult
// ============================================================================

/// Scoring inputs computed for one document against one query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceFactors {
    /// Name equals the query or contains an expanded term
    pub exact_match: bool,
    /// Fraction of expanded terms found in the document text, [0, 1]
    pub semantic_similarity: f64,
    /// Sum of matched intent context boosts, [0, 2]
    pub context_relevance: f64,
    /// Intent/kind alignment, [0, 1]
    pub intent_alignment: f64,
    /// Time-decay freshness, [0, 1]
    pub freshness: f64,
}

impl RelevanceFactors {
    fn rounded(&self) -> Self {
        RelevanceFactors {
            exact_match: self.exact_match,
            semantic_similarity: round2(self.semantic_similarity),
            context_relevance: round2(self.context_relevance),
            intent_alignment: round2(self.intent_alignment),
            freshness: round2(self.freshness),
        }
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Document kind
    pub kind: DocumentKind,
    /// Document id (or the synthetic name of a priority entry)
    pub id: String,
    /// Full document content
    pub content: DocumentContent,
    /// Final score, higher is better
    pub score: f64,
    /// Inputs behind the score
    pub relevance_factors: RelevanceFactors,
    /// Human-readable explanation
    pub explanation: String,
}

impl RankedResult {
    /// Copy with score and factors rounded to 2 decimal places
    pub fn rounded(&self) -> Self {
        RankedResult {
            score: round2(self.score),
            relevance_factors: self.relevance_factors.rounded(),
            ..self.clone()
        }
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// SearchOptions
// ============================================================================

/// Caller-supplied search options
///
/// # Examples
///
/// ```
/// use compass_core::{DocumentKind, SearchOptions};
///
/// let opts = SearchOptions::new()
///     .with_max_results(5)
///     .with_kind(DocumentKind::Component)
///     .with_tags(vec!["forms".into()]);
///
/// assert_eq!(opts.max_results, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Truncate results to this many (config default when None)
    pub max_results: Option<usize>,
    /// Keep only documents in this category (case-insensitive)
    pub category: Option<String>,
    /// Keep only documents with a tag containing any of these (case-insensitive)
    pub tags: Vec<String>,
    /// Keep only documents of this kind
    pub kind: Option<DocumentKind>,
    /// Per-request weight overrides
    pub custom_weights: Option<WeightOverrides>,
    /// Override the configured recency boost
    pub boost_recent: Option<bool>,
}

impl SearchOptions {
    /// Options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set max results
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// Builder: set category filter
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder: set tag filter
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Builder: set kind filter
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Builder: set weight overrides
    pub fn with_custom_weights(mut self, weights: WeightOverrides) -> Self {
        self.custom_weights = Some(weights);
        self
    }

    /// Builder: enable or disable the recency boost
    pub fn with_boost_recent(mut self, boost: bool) -> Self {
        self.boost_recent = Some(boost);
        self
    }

    /// True if any document filter is set
    pub fn has_filters(&self) -> bool {
        self.kind.is_some() || self.category.is_some() || !self.tags.is_empty()
    }

    /// Check whether a document passes the kind/category/tag filters
    pub fn accepts(&self, kind: DocumentKind, category: Option<&str>, tags: &[String]) -> bool {
        if let Some(wanted) = self.kind {
            if wanted != kind {
                return false;
            }
        }
        if let Some(wanted) = &self.category {
            match category {
                Some(c) if c.to_lowercase() == wanted.to_lowercase() => {}
                _ => return false,
            }
        }
        if !self.tags.is_empty() {
            let doc_tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
            let any = self.tags.iter().any(|wanted| {
                let wanted = wanted.to_lowercase();
                doc_tags.iter().any(|t| t.contains(&wanted))
            });
            if !any {
                return false;
            }
        }
        true
    }
}
