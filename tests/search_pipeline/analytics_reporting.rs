//! Analytics snapshots, query suggestions and pattern analysis.

use crate::common::*;
use compass::SearchOptions;

#[test]
fn snapshot_counts_hits_and_misses() {
    let service = sample_service();
    let opts = SearchOptions::new();
    service.search("button", &opts);
    service.search("Button", &opts);
    service.search("modal", &opts);

    let analytics = service.get_analytics();
    assert_eq!(analytics.total_queries, 3);
    assert!((analytics.cache_hit_rate - 1.0 / 3.0).abs() < 1e-9);
    assert!(analytics.average_result_count > 0.0);

    assert_eq!(analytics.popular_queries[0].query, "button");
    assert_eq!(analytics.popular_queries[0].count, 2);
    assert_eq!(analytics.popular_queries[1].query, "modal");

    // the cache hit re-detects intent without counting it
    let resolved: u64 = analytics.intent_distribution.values().sum();
    assert_eq!(resolved, 2);
}

#[test]
fn empty_service_reports_zero_rate() {
    let service = sample_service();
    let analytics = service.get_analytics();
    assert_eq!(analytics.total_queries, 0);
    assert_eq!(analytics.cache_hit_rate, 0.0);
    assert!(analytics.popular_queries.is_empty());
}

#[test]
fn query_suggestions_by_substring_and_similarity() {
    let service = sample_service();
    let opts = SearchOptions::new();
    service.search("button", &opts);
    service.search("button", &opts);
    service.search("modal", &opts);

    assert_eq!(service.query_suggestions("buton", 5), vec!["button"]);
    assert_eq!(service.query_suggestions("o", 5), vec!["button", "modal"]);
    assert_eq!(service.query_suggestions("o", 1), vec!["button"]);
    assert!(service.query_suggestions("zzzz", 5).is_empty());
}

#[test]
fn pattern_analysis_over_distinct_queries() {
    let service = sample_service();
    let opts = SearchOptions::new();
    service.search("button", &opts);
    service.search("button", &opts);
    service.search("how do i build a responsive form layout", &opts);

    let report = service.analyze_query_patterns();
    assert_eq!(report.query_complexity.simple, 1);
    assert_eq!(report.query_complexity.medium, 0);
    assert_eq!(report.query_complexity.complex, 1);

    let terms: Vec<&str> = report.common_terms.iter().map(|t| t.term.as_str()).collect();
    assert!(terms.contains(&"button"));
    assert!(terms.contains(&"responsive"));
    assert!(!terms.contains(&"do"));
    assert!(report.common_terms.iter().all(|t| t.frequency == 1));

    assert!(report
        .recommended_optimizations
        .iter()
        .any(|r| r.starts_with("Cache utilization is low")));
}

#[test]
fn clear_cache_resets_analytics_together() {
    let service = sample_service();
    let opts = SearchOptions::new();
    service.search("button", &opts);
    service.search("button", &opts);

    service.clear_cache();
    let analytics = service.get_analytics();
    assert_eq!(analytics.total_queries, 0);
    assert!(analytics.intent_distribution.is_empty());
    assert!(service.query_suggestions("button", 5).is_empty());
    assert!(!service.search_detailed("button", &opts).cache_hit);
}
