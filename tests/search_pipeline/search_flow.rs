//! Search flows through the service facade.

use crate::common::*;
use compass::{DocumentKind, Error, IntentKind, SearchOptions, WeightOverrides};

fn is_rounded(value: f64) -> bool {
    ((value * 100.0).round() - value * 100.0).abs() < 1e-6
}

#[test]
fn button_query_ranks_button_first() {
    let service = sample_service();
    let results = service.search("button", &SearchOptions::new());
    assert_eq!(results[0].id, "button");
    assert!(results[0].relevance_factors.exact_match);
    assert!(results[0].explanation.starts_with("Exact name match"));
    assert_descending(&results);
}

#[test]
fn surfaced_values_are_rounded() {
    let service = sample_service();
    for result in service.search("form input", &SearchOptions::new()) {
        assert!(is_rounded(result.score), "{} score {}", result.id, result.score);
        let f = result.relevance_factors;
        for value in [
            f.semantic_similarity,
            f.context_relevance,
            f.intent_alignment,
            f.freshness,
        ] {
            assert!(is_rounded(value));
        }
    }
}

#[test]
fn factors_stay_in_range() {
    let service = sample_service();
    for result in service.search("select a form option", &SearchOptions::new()) {
        let f = result.relevance_factors;
        assert!((0.0..=1.0).contains(&f.semantic_similarity));
        assert!((0.0..=2.0).contains(&f.context_relevance));
        assert!((0.0..=1.0).contains(&f.intent_alignment));
        assert!((0.0..=1.0).contains(&f.freshness));
    }
}

#[test]
fn blank_query_returns_empty_envelope() {
    let service = sample_service();
    assert!(service.search("", &SearchOptions::new()).is_empty());

    let outcome = service.search_detailed("   ", &SearchOptions::new());
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.total_results, 0);
    assert!(outcome.error.is_some());
    assert_eq!(outcome.intent.kind, IntentKind::ComponentSearch);
}

#[test]
fn no_match_carries_tip() {
    let service = sample_service();
    let outcome = service.search_detailed("zzqx", &SearchOptions::new());
    assert!(outcome.results.is_empty());
    assert!(outcome.suggestions.is_empty());
    let tip = outcome.search_tip.unwrap();
    assert!(tip.starts_with("No matches found for \"zzqx\""));
    assert!(outcome.error.is_none());
}

#[test]
fn kind_filter_keeps_components() {
    let service = sample_service();
    let opts = SearchOptions::new().with_kind(DocumentKind::Component);
    let results = service.search("forms", &opts);
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.kind == DocumentKind::Component));
}

#[test]
fn category_filter_is_case_insensitive() {
    let service = sample_service();
    let opts = SearchOptions::new().with_category("INPUTS");
    let results = service.search("forms", &opts);
    let mut found = ids(&results);
    found.sort();
    assert_eq!(found, vec!["button", "dropdown"]);
}

#[test]
fn tag_filter_matches_substrings() {
    let service = sample_service();
    let opts = SearchOptions::new().with_tags(vec!["SEL".into()]);
    let results = service.search("forms", &opts);
    assert_eq!(ids(&results), vec!["dropdown"]);
}

#[test]
fn max_results_truncates_after_counting() {
    let service = sample_service();
    let all = service.search_detailed("forms", &SearchOptions::new());
    assert!(all.total_results >= 3);

    let one = service.search_detailed("forms", &SearchOptions::new().with_max_results(1));
    assert_eq!(one.results.len(), 1);
    assert_eq!(one.total_results, all.total_results);
    assert_eq!(one.results[0], all.results[0]);
}

#[test]
fn default_truncation_comes_from_config() {
    let mut config = compass::SearchConfig::default();
    config.max_results = 2;
    let service = service_with(config);
    let results = service.search("forms", &SearchOptions::new());
    assert_eq!(results.len(), 2);
}

#[test]
fn custom_weights_change_scores_and_skip_cache() {
    let service = sample_service();
    let default = service.search_detailed("forms", &SearchOptions::new());

    let opts = SearchOptions::new().with_custom_weights(WeightOverrides {
        type_relevance: Some(2.0),
        ..Default::default()
    });
    let custom = service.search_detailed("forms", &opts);
    assert!(!custom.cache_hit);
    assert!(custom.results[0].score > default.results[0].score);

    // the default entry is still cached and untouched
    let again = service.search_detailed("forms", &SearchOptions::new());
    assert!(again.cache_hit);
    assert_eq!(again.results, default.results);
}

#[test]
fn invalid_custom_weights_fall_back_to_defaults() {
    let service = sample_service();
    let default = service.search("forms", &SearchOptions::new());

    let opts = SearchOptions::new().with_custom_weights(WeightOverrides {
        exact_match: Some(f64::NAN),
        freshness: Some(-1.0),
        ..Default::default()
    });
    let fallback = service.search("forms", &opts);
    assert_eq!(ids(&fallback), ids(&default));
    assert_eq!(fallback[0].score, default[0].score);
}

#[test]
fn disabling_recency_boost_lowers_fresh_scores() {
    let service = sample_service();
    let boosted = service.search("button", &SearchOptions::new());
    let plain = service.search("button", &SearchOptions::new().with_boost_recent(false));
    assert!(plain[0].score < boosted[0].score);
}

#[test]
fn intent_is_reported() {
    let service = sample_service();
    let outcome = service.search_detailed("react example code", &SearchOptions::new());
    assert_eq!(outcome.intent.kind, IntentKind::ImplementationGuidance);
    assert_eq!(outcome.intent.confidence, 0.6);
    assert!(!outcome.intent.suggested_tools.is_empty());
}

#[test]
fn document_lookup_and_not_found() {
    let service = sample_service();
    assert_eq!(service.get_document("Modal").unwrap().id, "modal");

    let err = service.get_document("modl").unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(err.suggestions(), &["Modal".to_string()]);
    assert!(err.to_string().contains("Did you mean: Modal?"));
}

#[test]
fn component_details_resolve_name_variations() {
    let service = sample_service();
    for name in ["FormItem", "form-item", "form_item", "FORMITEM"] {
        let details = service.get_component_details(name, None).unwrap();
        assert_eq!(details["componentName"], "FormItem", "lookup by {}", name);
    }
}

#[test]
fn search_suggestions_use_component_prefix() {
    let service = sample_service();
    assert_eq!(service.search_suggestions("dropdwn", 3), vec!["Dropdown"]);
    assert!(service.search_suggestions("x", 3).is_empty());
}

#[test]
fn disk_source_serves_same_results() {
    let kb = DiskKnowledgeBase::new();
    let service = compass::SearchService::default();
    let summary = service.initialize(&kb.source());
    assert!(summary.failures.is_empty());

    let from_disk = service.search("forms", &SearchOptions::new());
    let from_memory = sample_service().search("forms", &SearchOptions::new());
    assert_eq!(ids(&from_disk), ids(&from_memory));
}
