//! Pinned setup and workflow entries.

use crate::common::*;
use compass::{DocumentKind, InMemorySource, SearchOptions, SearchService};
use compass_intelligence::MANDATORY_ENTRY_ID;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn build_request_pins_mandatory_principles() {
    let service = sample_service();
    let results = service.search("build a form", &SearchOptions::new());
    assert_eq!(results[0].id, MANDATORY_ENTRY_ID);
    assert_eq!(results[0].score, 150.0);
    assert_eq!(results[0].kind, DocumentKind::System);
    assert_eq!(
        results[0].content.summary(),
        Some("Mandatory development principles")
    );
    assert!(results[0].relevance_factors.exact_match);
    assert_descending(&results);
}

#[test]
fn figma_trigger_pins_workflow_once() {
    let service = sample_service();
    let results = service.search("figma mockup", &SearchOptions::new());
    assert_eq!(results[0].id, "figma-to-code-workflow");
    assert_eq!(results[0].score, 120.0);
    assert_eq!(results[0].explanation, "Figma conversion workflow detected");
    let copies = results
        .iter()
        .filter(|r| r.id == "figma-to-code-workflow")
        .count();
    assert_eq!(copies, 1);
}

#[test]
fn build_with_framework_pins_both() {
    let service = sample_service();
    let results = service.search("convert this page to react", &SearchOptions::new());
    assert_eq!(
        ids(&results[..2]),
        vec![MANDATORY_ENTRY_ID, "figma-to-code-workflow"]
    );
}

#[test]
fn pinned_entries_ignore_filters() {
    let service = sample_service();
    let opts = SearchOptions::new().with_kind(DocumentKind::Component);
    let results = service.search("build button", &opts);
    assert_eq!(results[0].id, MANDATORY_ENTRY_ID);
    assert!(results[1..].iter().all(|r| r.kind == DocumentKind::Component));
}

#[test]
fn pinned_entries_count_toward_max_results() {
    let service = sample_service();
    let results = service.search("build button", &SearchOptions::new().with_max_results(1));
    assert_eq!(ids(&results), vec![MANDATORY_ENTRY_ID]);
}

#[test]
fn no_setup_document_no_pin() {
    let source = InMemorySource::default().with_document(
        "button",
        DocumentKind::Component,
        json!({ "componentName": "Button", "summary": "Primary action button" }),
    );
    let service = SearchService::default();
    service.initialize(&source);

    let results = service.search("build button", &SearchOptions::new());
    assert_eq!(ids(&results), vec!["button"]);
}

#[test]
fn pinned_entries_are_not_cached() {
    let service = sample_service();
    service.search("react button", &SearchOptions::new());
    let outcome = service.search_detailed("react button", &SearchOptions::new());
    assert!(outcome.cache_hit);
    assert_eq!(outcome.results[0].id, MANDATORY_ENTRY_ID);
    let pinned = outcome
        .results
        .iter()
        .filter(|r| r.id == MANDATORY_ENTRY_ID)
        .count();
    assert_eq!(pinned, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn build_or_react_always_leads_with_mandatory(
        before in "[a-z]{0,6}",
        keyword in prop::sample::select(vec!["build", "react"]),
        after in "[a-z ]{0,12}",
    ) {
        let service = sample_service();
        let query = format!("{} {} {}", before, keyword, after);
        let results = service.search(&query, &SearchOptions::new());
        prop_assert!(!results.is_empty());
        prop_assert_eq!(results[0].id.as_str(), MANDATORY_ENTRY_ID);
        prop_assert_eq!(results[0].score, 150.0);
    }
}
