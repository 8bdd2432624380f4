//! Priority rules applied after ranking
//!
//! Two business rules pin synthetic entries above organic results:
//! - Build or framework queries get the mandatory setup principles (score 150).
//! - Design-conversion queries get the design-to-code workflow (score 120)
//!   when one of its triggers occurs in the query, or when the query is a
//!   build request naming a framework.
//!
//! An entry is only added when its backing document is indexed. A pinned
//! workflow replaces its organic result. The list is re-sorted afterwards,
//! so synthetic entries stay on top only while their score beats every
//! organic one.

use crate::ranker::sort_by_score;
use compass_core::{DocumentKind, IndexedDocument, RankedResult, RelevanceFactors};
use compass_search::InvertedIndex;
use tracing::debug;

/// Keywords marking a build or code-generation request
pub const BUILD_KEYWORDS: &[&str] = &[
    "build",
    "create",
    "make",
    "generate",
    "code",
    "implement",
    "develop",
    "convert",
    "design",
    "page",
    "component",
    "build this",
];

/// Framework keywords
pub const FRAMEWORK_KEYWORDS: &[&str] = &["react", "angular"];

/// Keywords marking a design-conversion request
pub const DESIGN_KEYWORDS: &[&str] = &[
    "figma",
    "design",
    "convert",
    "build this",
    "build in",
    "react",
    "angular",
    "prototype",
    "mockup",
    "wireframe",
    "turn this into",
    "code this design",
    "build this page",
    "create this",
    "make this",
    "implement this",
];

/// Id of the synthetic mandatory-principles entry
pub const MANDATORY_ENTRY_ID: &str = "mandatory-principles";

/// Score of the mandatory-principles entry
pub const MANDATORY_SCORE: f64 = 150.0;

/// Score of the design workflow entry
pub const WORKFLOW_SCORE: f64 = 120.0;

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Which rules a query triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySignals {
    /// Contains a build keyword
    pub build_request: bool,
    /// Contains a framework keyword
    pub framework: bool,
    /// Contains a design-conversion keyword
    pub design_request: bool,
}

impl QuerySignals {
    /// Classify a raw query (case-insensitive)
    pub fn detect(query: &str) -> Self {
        let lower = query.to_lowercase();
        QuerySignals {
            build_request: contains_any(&lower, BUILD_KEYWORDS),
            framework: contains_any(&lower, FRAMEWORK_KEYWORDS),
            design_request: contains_any(&lower, DESIGN_KEYWORDS),
        }
    }
}

/// The post-ranking priority pass
#[derive(Debug, Clone)]
pub struct PriorityRules {
    setup_doc_id: String,
    workflow_doc_id: String,
}

impl Default for PriorityRules {
    fn default() -> Self {
        PriorityRules {
            setup_doc_id: "system-setup".to_string(),
            workflow_doc_id: "figma-to-code-workflow".to_string(),
        }
    }
}

impl PriorityRules {
    /// Rules backed by custom document ids
    pub fn new(setup_doc_id: impl Into<String>, workflow_doc_id: impl Into<String>) -> Self {
        PriorityRules {
            setup_doc_id: setup_doc_id.into().to_lowercase(),
            workflow_doc_id: workflow_doc_id.into().to_lowercase(),
        }
    }

    /// Prepend synthetic entries as the query demands, then re-sort
    pub fn apply(
        &self,
        mut results: Vec<RankedResult>,
        query: &str,
        index: &InvertedIndex,
    ) -> Vec<RankedResult> {
        let signals = QuerySignals::detect(query);
        let lower = query.to_lowercase();

        if signals.build_request || signals.framework {
            if let Some(setup) = self.indexed(index, &self.setup_doc_id, DocumentKind::System) {
                debug!(target: "compass::search", "Prepending mandatory principles");
                results.insert(0, mandatory_entry(setup));
            }
        }

        if signals.design_request {
            if let Some(workflow) =
                self.indexed(index, &self.workflow_doc_id, DocumentKind::Workflow)
            {
                let triggered = workflow
                    .content
                    .triggers()
                    .iter()
                    .any(|t| lower.contains(&t.to_lowercase()));
                if triggered || (signals.build_request && signals.framework) {
                    debug!(target: "compass::search", "Prepending design workflow");
                    results.retain(|r| r.id != workflow.id);
                    results.insert(0, workflow_entry(workflow));
                }
            }
        }

        sort_by_score(&mut results);
        results
    }

    fn indexed<'a>(
        &self,
        index: &'a InvertedIndex,
        id: &str,
        kind: DocumentKind,
    ) -> Option<&'a IndexedDocument> {
        index.get_item(id).filter(|doc| doc.kind == kind)
    }
}

fn mandatory_entry(setup: &IndexedDocument) -> RankedResult {
    RankedResult {
        kind: DocumentKind::System,
        id: MANDATORY_ENTRY_ID.to_string(),
        content: setup.content.clone(),
        score: MANDATORY_SCORE,
        relevance_factors: RelevanceFactors {
            exact_match: true,
            semantic_similarity: 1.0,
            context_relevance: 2.0,
            intent_alignment: 1.0,
            freshness: 1.0,
        },
        explanation: "Mandatory development principles for all build requests".to_string(),
    }
}

fn workflow_entry(workflow: &IndexedDocument) -> RankedResult {
    RankedResult {
        kind: DocumentKind::Workflow,
        id: workflow.id.clone(),
        content: workflow.content.clone(),
        score: WORKFLOW_SCORE,
        relevance_factors: RelevanceFactors {
            exact_match: false,
            semantic_similarity: 0.9,
            context_relevance: 2.0,
            intent_alignment: 1.0,
            freshness: 1.0,
        },
        explanation: "Figma conversion workflow detected".to_string(),
    }
}
