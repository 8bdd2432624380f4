//! Index scenarios: candidate retrieval and rebuild consistency.

use crate::common::*;
use compass::{DocumentKind, IndexedDocument, MatchType};
use compass_search::{InvertedIndex, PostingKind};
use proptest::prelude::*;

fn scenario_index() -> InvertedIndex {
    let mut index = InvertedIndex::new();
    index.add_item(IndexedDocument::new(
        "button",
        DocumentKind::Component,
        Default::default(),
        "primary action button click".to_string(),
        vec!["forms".to_string()],
        None,
    ));
    index.add_item(IndexedDocument::new(
        "modal",
        DocumentKind::Component,
        Default::default(),
        "dialog popup window".to_string(),
        vec!["overlay".to_string()],
        None,
    ));
    index
}

#[test]
fn exact_token_finds_button() {
    let index = scenario_index();
    let candidates = index.search("button", 20);
    assert_eq!(candidates[0].document.id, "button");
    assert!(candidates[0].match_types.contains(&MatchType::Exact));
    assert!(candidates.iter().all(|c| c.document.id != "modal"));
}

#[test]
fn exact_token_finds_modal() {
    let index = scenario_index();
    let candidates = index.search("popup", 20);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].document.id, "modal");
    assert!(candidates[0].match_types.contains(&MatchType::Exact));
}

#[test]
fn blank_query_finds_nothing() {
    let index = scenario_index();
    assert!(index.search("", 20).is_empty());
    assert!(index.search("  \t ", 20).is_empty());
}

#[test]
fn tag_match_is_reported() {
    let index = scenario_index();
    let candidates = index.search("overlay", 20);
    assert_eq!(candidates[0].document.id, "modal");
    assert!(candidates[0].match_types.contains(&MatchType::Tag));
}

#[test]
fn service_index_holds_every_sample_document() {
    let service = sample_service();
    let stats = service.index_stats();
    assert_eq!(stats.total_items, sample_documents().len());
    assert!(stats.total_terms > 0);
    assert_eq!(service.document_count(DocumentKind::System), 2);
    assert_eq!(service.document_count(DocumentKind::Recipe), 0);
}

/// Distinct ids; re-adding an id keeps stale postings, which rebuild drops
fn documents_strategy() -> impl Strategy<Value = Vec<(String, String, Vec<String>)>> {
    prop::collection::btree_map(
        "[a-z]{3,8}",
        (
            prop::collection::vec("[a-z]{2,7}", 1..6).prop_map(|words| words.join(" ")),
            prop::collection::vec("[a-z]{3,6}", 0..3),
        ),
        1..12,
    )
    .prop_map(|docs| {
        docs.into_iter()
            .map(|(id, (text, tags))| (id, text, tags))
            .collect()
    })
}

proptest! {
    #[test]
    fn rebuild_matches_fresh_index(docs in documents_strategy()) {
        let build = |docs: &[(String, String, Vec<String>)]| {
            let mut index = InvertedIndex::new();
            for (id, text, tags) in docs {
                index.add_item(IndexedDocument::new(
                    id.clone(),
                    DocumentKind::Component,
                    Default::default(),
                    text.clone(),
                    tags.clone(),
                    None,
                ));
            }
            index
        };

        let fresh = build(&docs);
        let mut rebuilt = build(&docs);
        rebuilt.rebuild();

        for kind in [PostingKind::Term, PostingKind::Prefix, PostingKind::Tag, PostingKind::Category] {
            prop_assert_eq!(fresh.postings(kind), rebuilt.postings(kind));
        }
    }
}
