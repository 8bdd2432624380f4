//! Candidate ranking
//!
//! Turns index candidates into ordered `RankedResult`s:
//!
//! ```text
//! candidates
//!     │
//!     ▼
//! compute_factors ──► base score ──► drop if <= threshold
//!     │
//!     ▼
//! weighted score (+ popularity, type relevance) ──► recency boost
//!     │
//!     ▼
//! sort by score, descending (stable: ties keep candidate order)
//! ```
//!
//! The ranker is stateless; popularity comes from the caller's analytics.

use crate::analytics::QueryAnalytics;
use crate::intent::QueryIntent;
use crate::scorer::{
    base_explanation, compute_factors, enhance_explanation, recency_multiplier, type_relevance,
    BaseRelevanceScorer, DocumentSignals, Scorer, ScorerContext, WeightedScorer,
};
use chrono::{DateTime, Utc};
use compass_core::{RankedResult, ScoreWeights};
use compass_search::SearchCandidate;
use std::cmp::Ordering;
use tracing::debug;

/// Per-query ranking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingParams {
    /// Weight vector for the final score
    pub weights: ScoreWeights,
    /// Base score a candidate must exceed
    pub similarity_threshold: f64,
    /// Multiply scores by `1 + freshness * 0.2`
    pub boost_recent: bool,
}

impl Default for RankingParams {
    fn default() -> Self {
        RankingParams {
            weights: ScoreWeights::default(),
            similarity_threshold: 0.3,
            boost_recent: true,
        }
    }
}

/// Ranks candidates for one query
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker {
    threshold_scorer: BaseRelevanceScorer,
}

impl RelevanceRanker {
    /// Create a ranker
    pub fn new() -> Self {
        Self::default()
    }

    /// Score, filter and order candidates
    pub fn rank(
        &self,
        candidates: &[SearchCandidate],
        ctx: &ScorerContext<'_>,
        analytics: &QueryAnalytics,
        params: &RankingParams,
    ) -> Vec<RankedResult> {
        let scorer = WeightedScorer::new(params.weights);
        let mut results: Vec<RankedResult> = Vec::with_capacity(candidates.len());
        let mut below_threshold = 0usize;

        for candidate in candidates {
            let doc = &candidate.document;
            let factors = compute_factors(doc, ctx);
            let signals = DocumentSignals {
                factors,
                popularity: analytics.popularity(&doc.id),
                type_relevance: type_relevance(ctx.intent.kind, doc.kind),
            };

            let base = self.threshold_scorer.score(&signals, ctx);
            if base <= params.similarity_threshold {
                below_threshold += 1;
                continue;
            }

            let mut score = scorer.score(&signals, ctx);
            if params.boost_recent {
                score *= recency_multiplier(factors.freshness);
            }

            results.push(RankedResult {
                kind: doc.kind,
                id: doc.id.clone(),
                content: doc.content.clone(),
                score,
                relevance_factors: factors,
                explanation: enhance_explanation(
                    &base_explanation(&factors, ctx.intent.kind),
                    &signals,
                    ctx.intent.confidence,
                ),
            });
        }

        sort_by_score(&mut results);

        debug!(
            target: "compass::search",
            candidates = candidates.len(),
            ranked = results.len(),
            below_threshold,
            scorer = scorer.name(),
            "Ranked candidates"
        );
        results
    }
}

/// Sort descending by score; equal scores keep their relative order
pub fn sort_by_score(results: &mut [RankedResult]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Convenience: rank with a fresh context
pub fn rank_candidates(
    candidates: &[SearchCandidate],
    query: &str,
    expanded_terms: &[String],
    intent: &QueryIntent,
    analytics: &QueryAnalytics,
    params: &RankingParams,
    now: DateTime<Utc>,
) -> Vec<RankedResult> {
    let ctx = ScorerContext {
        query,
        expanded_terms,
        intent,
        now,
    };
    RelevanceRanker::new().rank(candidates, &ctx, analytics, params)
}
