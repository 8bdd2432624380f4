//! Relevance scoring
//!
//! Scoring happens in two steps:
//! 1. `compute_factors` derives per-document `RelevanceFactors` from the
//!    query, its expansion and the detected intent.
//! 2. A `Scorer` folds factors (plus popularity and type relevance) into a
//!    single number.
//!
//! Two scorers ship:
//! - `BaseRelevanceScorer`: fixed-coefficient formula scaled by intent
//!   confidence, capped at 100. The ranker uses it as the admission
//!   threshold.
//! - `WeightedScorer`: configurable weight vector. The ranker uses it for
//!   the final order.
//!
//! All functions here are pure; the only time input is `ScorerContext::now`.

use crate::intent::QueryIntent;
use crate::semantic::{extract_text, semantic_similarity};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use compass_core::{DocumentKind, IndexedDocument, IntentKind, RelevanceFactors, ScoreWeights};

/// Upper bound of the summed context boosts
pub const MAX_CONTEXT_RELEVANCE: f64 = 2.0;

/// Upper bound of the base relevance score
pub const MAX_BASE_SCORE: f64 = 100.0;

/// Neutral value used when a table has no entry or data is missing
pub const NEUTRAL_SCORE: f64 = 0.5;

// ============================================================================
// ScorerContext / DocumentSignals
// ============================================================================

/// Query-level inputs shared by every document scored for one query
#[derive(Debug, Clone)]
pub struct ScorerContext<'a> {
    /// The raw query
    pub query: &'a str,
    /// Concept expansion of the query
    pub expanded_terms: &'a [String],
    /// Detected intent
    pub intent: &'a QueryIntent,
    /// Reference time for freshness
    pub now: DateTime<Utc>,
}

/// Everything a scorer needs about one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentSignals {
    /// Base relevance factors
    pub factors: RelevanceFactors,
    /// Historical popularity, [0, 1]
    pub popularity: f64,
    /// Intent/kind type relevance, [0, 1]
    pub type_relevance: f64,
}

// ============================================================================
// Scorer trait
// ============================================================================

/// Pluggable scoring interface
///
/// Scorers are stateless and must be deterministic for equal inputs.
pub trait Scorer: Send + Sync {
    /// Score one document; higher is more relevant
    fn score(&self, signals: &DocumentSignals, ctx: &ScorerContext<'_>) -> f64;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Fixed-coefficient relevance formula
///
/// `semantic*40 + exact*30 + context*20 + alignment*15 + freshness*5`,
/// multiplied by `0.7 + 0.3 * intent confidence` and capped at 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseRelevanceScorer;

impl Scorer for BaseRelevanceScorer {
    fn score(&self, signals: &DocumentSignals, ctx: &ScorerContext<'_>) -> f64 {
        let f = &signals.factors;
        let mut score = f.semantic_similarity * 40.0;
        if f.exact_match {
            score += 30.0;
        }
        score += f.context_relevance * 20.0;
        score += f.intent_alignment * 15.0;
        score += f.freshness * 5.0;
        score *= 0.7 + ctx.intent.confidence * 0.3;
        score.min(MAX_BASE_SCORE)
    }

    fn name(&self) -> &str {
        "base_relevance"
    }
}

/// Weighted business score
///
/// Exact match contributes `weight * 100` when set, context relevance
/// `value * weight * 50`, every other signal `value * weight * 100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScorer {
    weights: ScoreWeights,
}

impl WeightedScorer {
    /// Create a scorer with the given weights
    pub fn new(weights: ScoreWeights) -> Self {
        WeightedScorer { weights }
    }

    /// Weights in use
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }
}

impl Scorer for WeightedScorer {
    fn score(&self, signals: &DocumentSignals, _ctx: &ScorerContext<'_>) -> f64 {
        let w = &self.weights;
        let f = &signals.factors;

        let exact = if f.exact_match { w.exact_match * 100.0 } else { 0.0 };
        exact
            + f.semantic_similarity * w.semantic_similarity * 100.0
            + f.context_relevance * w.context_relevance * 50.0
            + f.intent_alignment * w.intent_alignment * 100.0
            + f.freshness * w.freshness * 100.0
            + signals.popularity * w.popularity * 100.0
            + signals.type_relevance * w.type_relevance * 100.0
    }

    fn name(&self) -> &str {
        "weighted"
    }
}

// ============================================================================
// Factors
// ============================================================================

/// Compute the relevance factors of a document for a query
pub fn compute_factors(doc: &IndexedDocument, ctx: &ScorerContext<'_>) -> RelevanceFactors {
    let text = extract_text(doc.content.as_value());
    let text_lower = text.to_lowercase();

    RelevanceFactors {
        exact_match: is_exact_match(&doc.id, ctx.query, ctx.expanded_terms),
        semantic_similarity: semantic_similarity(ctx.expanded_terms, &text_lower),
        context_relevance: context_relevance(&text_lower, &ctx.intent.context_boosts),
        intent_alignment: intent_alignment(ctx.intent.kind, doc.kind),
        freshness: freshness_score(doc.content.last_updated(), ctx.now),
    }
}

/// Name equals the query, or contains any expanded term (case-insensitive)
pub fn is_exact_match(name: &str, query: &str, expanded_terms: &[String]) -> bool {
    let name = name.to_lowercase();
    name == query.to_lowercase()
        || expanded_terms
            .iter()
            .any(|term| name.contains(&term.to_lowercase()))
}

/// Sum of boosts whose term occurs in the text, capped at 2.0
pub fn context_relevance(text_lower: &str, boosts: &[(String, f64)]) -> f64 {
    let sum: f64 = boosts
        .iter()
        .filter(|(term, _)| text_lower.contains(&term.to_lowercase()))
        .map(|(_, boost)| boost)
        .sum();
    sum.min(MAX_CONTEXT_RELEVANCE)
}

/// Time-decay freshness of a `lastUpdated` value
///
/// Under 30 days old scores 1.0, over 365 days 0.1, linear in between.
/// Missing or unparseable dates score 0.5. Future dates count as fresh.
pub fn freshness_score(last_updated: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(updated) = last_updated.and_then(parse_timestamp) else {
        return NEUTRAL_SCORE;
    };
    let days = (now - updated).num_milliseconds() as f64 / 86_400_000.0;

    if days < 30.0 {
        1.0
    } else if days > 365.0 {
        0.1
    } else {
        1.0 - (days - 30.0) / 335.0 * 0.9
    }
}

/// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS` (as UTC) or `YYYY-MM-DD`
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// How well a document kind fits an intent (intent alignment table)
pub fn intent_alignment(intent: IntentKind, kind: DocumentKind) -> f64 {
    use DocumentKind::*;
    use IntentKind::*;
    match (intent, kind) {
        (ComponentSearch, Component) => 1.0,
        (ComponentSearch, System) => 0.3,
        (ComponentSearch, Workflow) => 0.2,
        (ImplementationGuidance, Component) => 0.8,
        (ImplementationGuidance, System) => 1.0,
        (ImplementationGuidance, Workflow) => 0.9,
        (WorkflowRequest, Workflow) => 1.0,
        (WorkflowRequest, System) => 0.7,
        (WorkflowRequest, Component) => 0.3,
        (Troubleshooting, Component) => 0.8,
        (Troubleshooting, System) => 0.9,
        (Troubleshooting, Workflow) => 0.5,
        (_, Recipe) => NEUTRAL_SCORE,
    }
}

/// How relevant a document kind is to an intent (type relevance table)
pub fn type_relevance(intent: IntentKind, kind: DocumentKind) -> f64 {
    use DocumentKind::*;
    use IntentKind::*;
    match (intent, kind) {
        (ComponentSearch, Component) => 1.0,
        (ComponentSearch, System) => 0.3,
        (ComponentSearch, Workflow) => 0.2,
        (ImplementationGuidance, System) => 1.0,
        (ImplementationGuidance, Component) => 0.8,
        (ImplementationGuidance, Workflow) => 0.7,
        (WorkflowRequest, Workflow) => 1.0,
        (WorkflowRequest, System) => 0.6,
        (WorkflowRequest, Component) => 0.3,
        (Troubleshooting, Component) => 0.9,
        (Troubleshooting, System) => 0.8,
        (Troubleshooting, Workflow) => 0.4,
        (_, Recipe) => NEUTRAL_SCORE,
    }
}

/// Score multiplier applied when boosting recent documents
pub fn recency_multiplier(freshness: f64) -> f64 {
    1.0 + freshness * 0.2
}

// ============================================================================
// Explanations
// ============================================================================

/// Explain a score from its base factors
pub fn base_explanation(factors: &RelevanceFactors, intent: IntentKind) -> String {
    let mut parts: Vec<String> = Vec::new();
    if factors.exact_match {
        parts.push("Exact name match".to_string());
    }
    if factors.semantic_similarity > 0.7 {
        parts.push("High semantic relevance".to_string());
    }
    if factors.context_relevance > 1.0 {
        parts.push("Strong context alignment".to_string());
    }
    if factors.intent_alignment > 0.8 {
        parts.push(format!("Matches {} intent", intent.label()));
    }

    if parts.is_empty() {
        "General relevance match".to_string()
    } else {
        parts.join(", ")
    }
}

/// Append popularity, type and confidence notes to a base explanation
pub fn enhance_explanation(base: &str, signals: &DocumentSignals, intent_confidence: f64) -> String {
    let mut extra: Vec<&str> = Vec::new();
    if signals.popularity > 0.7 {
        extra.push("Popular choice");
    }
    if signals.type_relevance > 0.8 {
        extra.push("Strong type match");
    }
    if intent_confidence > 0.8 {
        extra.push("High intent confidence");
    }

    if extra.is_empty() {
        base.to_string()
    } else {
        format!("{}; {}", base, extra.join(", "))
    }
}
