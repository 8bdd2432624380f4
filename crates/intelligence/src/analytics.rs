//! Query and intent analytics
//!
//! Counters keyed by normalized query and by intent. They feed popularity
//! scoring, query suggestions and pattern analysis, and are reset together
//! with the cache.

use crate::cache::QueryCache;
use crate::fuzzy::fuzzy_similarity;
use compass_core::IntentKind;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Queries listed in `SearchAnalytics::popular_queries`
pub const TOP_QUERIES: usize = 10;

/// Terms listed in `QueryPatternReport::common_terms`
pub const TOP_TERMS: usize = 20;

/// Fuzzy similarity a stored query must exceed to be suggested
pub const SUGGESTION_SIMILARITY: f64 = 0.6;

// ============================================================================
// Snapshot types
// ============================================================================

/// A query and how often it was asked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryCount {
    /// Normalized query
    pub query: String,
    /// Times asked
    pub count: u64,
}

/// Analytics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAnalytics {
    /// Queries received, hits and misses alike
    pub total_queries: u64,
    /// Cache hits / total queries, 0 when no queries
    pub cache_hit_rate: f64,
    /// Mean cached result-set size
    pub average_result_count: f64,
    /// Most frequent queries, at most 10
    pub popular_queries: Vec<QueryCount>,
    /// Resolved intents (cache misses only)
    pub intent_distribution: BTreeMap<IntentKind, u64>,
}

/// A term and the number of distinct queries using it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    /// Term
    pub term: String,
    /// Distinct queries containing it
    pub frequency: u64,
}

/// Distinct queries by word count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryComplexity {
    /// 1-2 words
    pub simple: u64,
    /// 3-5 words
    pub medium: u64,
    /// 6+ words
    pub complex: u64,
}

/// Query pattern analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPatternReport {
    /// Most common terms longer than 2 characters, at most 20
    pub common_terms: Vec<TermFrequency>,
    /// Complexity histogram
    pub query_complexity: QueryComplexity,
    /// Suggested tuning steps
    pub recommended_optimizations: Vec<String>,
}

// ============================================================================
// QueryAnalytics
// ============================================================================

/// Query and intent counters
#[derive(Debug, Clone, Default)]
pub struct QueryAnalytics {
    queries: HashMap<String, u64>,
    intents: HashMap<IntentKind, u64>,
}

impl QueryAnalytics {
    /// Empty counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a normalized query
    pub fn record_query(&mut self, normalized_query: &str) {
        *self.queries.entry(normalized_query.to_string()).or_insert(0) += 1;
    }

    /// Count a resolved intent
    pub fn record_intent(&mut self, intent: IntentKind) {
        *self.intents.entry(intent).or_insert(0) += 1;
    }

    /// Sum of all query counts
    pub fn total_queries(&self) -> u64 {
        self.queries.values().sum()
    }

    /// Count for one normalized query
    pub fn query_count(&self, normalized_query: &str) -> u64 {
        self.queries.get(normalized_query).copied().unwrap_or(0)
    }

    /// Count for one intent
    pub fn intent_count(&self, intent: IntentKind) -> u64 {
        self.intents.get(&intent).copied().unwrap_or(0)
    }

    /// Popularity of a document name in [0, 1]
    ///
    /// Sums the counts of past queries that contain the name or are
    /// contained in it, divides by the total, scales by 10 and caps at 1.
    /// With no history at all the score is a neutral 0.5.
    pub fn popularity(&self, name: &str) -> f64 {
        let total = self.total_queries();
        if total == 0 {
            return 0.5;
        }
        let name = name.to_lowercase();
        let relevant: u64 = self
            .queries
            .iter()
            .filter(|(query, _)| {
                let query = query.to_lowercase();
                query.contains(&name) || name.contains(&query)
            })
            .map(|(_, count)| count)
            .sum();
        (relevant as f64 / total as f64 * 10.0).min(1.0)
    }

    /// Queries sorted by count descending, then alphabetically
    fn ranked_queries(&self) -> Vec<(&String, u64)> {
        let mut ranked: Vec<(&String, u64)> = self.queries.iter().map(|(q, c)| (q, *c)).collect();
        ranked.sort_by_key(|(query, count)| (Reverse(*count), (*query).clone()));
        ranked
    }

    /// Most frequent queries
    pub fn top_queries(&self, limit: usize) -> Vec<QueryCount> {
        self.ranked_queries()
            .into_iter()
            .take(limit)
            .map(|(query, count)| QueryCount {
                query: query.clone(),
                count,
            })
            .collect()
    }

    /// Intent histogram
    pub fn intent_distribution(&self) -> BTreeMap<IntentKind, u64> {
        self.intents.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Past queries matching a partial query, most frequent first
    ///
    /// A past query matches when it contains the (lowercased) partial
    /// query or is more than 60% similar to it.
    pub fn suggestions(&self, partial: &str, max: usize) -> Vec<String> {
        let partial = partial.to_lowercase();
        self.ranked_queries()
            .into_iter()
            .filter(|(query, _)| {
                let query = query.to_lowercase();
                query.contains(&partial) || fuzzy_similarity(&query, &partial) > SUGGESTION_SIMILARITY
            })
            .take(max)
            .map(|(query, _)| query.clone())
            .collect()
    }

    /// Snapshot combined with cache statistics
    pub fn snapshot(&self, cache: &QueryCache) -> SearchAnalytics {
        let total_queries = self.total_queries();
        let cache_hit_rate = if total_queries > 0 {
            cache.total_hits() as f64 / total_queries as f64
        } else {
            0.0
        };
        SearchAnalytics {
            total_queries,
            cache_hit_rate,
            average_result_count: cache.average_result_count(),
            popular_queries: self.top_queries(TOP_QUERIES),
            intent_distribution: self.intent_distribution(),
        }
    }

    /// Analyze distinct historical queries
    pub fn analyze_patterns(&self, cache: &QueryCache) -> QueryPatternReport {
        let mut term_frequency: HashMap<&str, u64> = HashMap::new();
        let mut complexity = QueryComplexity::default();

        for query in self.queries.keys() {
            let words: Vec<&str> = query.split_whitespace().collect();
            for word in words.iter().copied() {
                if word.chars().count() > 2 {
                    *term_frequency.entry(word).or_insert(0) += 1;
                }
            }
            match words.len() {
                0..=2 => complexity.simple += 1,
                3..=5 => complexity.medium += 1,
                _ => complexity.complex += 1,
            }
        }

        let mut common_terms: Vec<TermFrequency> = term_frequency
            .into_iter()
            .map(|(term, frequency)| TermFrequency {
                term: term.to_string(),
                frequency,
            })
            .collect();
        common_terms.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.term.cmp(&b.term)));
        common_terms.truncate(TOP_TERMS);

        let mut recommended = Vec::new();
        if complexity.complex > complexity.simple {
            recommended.push("Consider query simplification suggestions".to_string());
        }
        if (cache.len() as f64) < cache.capacity() as f64 * 0.3 {
            recommended.push(
                "Cache utilization is low - consider adjusting cache parameters".to_string(),
            );
        }
        let total_intents: u64 = self.intents.values().sum();
        if let Some(top) = common_terms.first() {
            if top.frequency as f64 > total_intents as f64 * 0.3 {
                recommended.push(format!(
                    "High frequency term \"{}\" suggests need for dedicated search path",
                    top.term
                ));
            }
        }

        QueryPatternReport {
            common_terms,
            query_complexity: complexity,
            recommended_optimizations: recommended,
        }
    }

    /// Reset every counter
    pub fn clear(&mut self) {
        self.queries.clear();
        self.intents.clear();
    }
}
