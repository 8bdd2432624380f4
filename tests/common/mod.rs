//! Shared fixtures for the cross-crate test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use compass::{DirectorySource, DocumentKind, InMemorySource, SearchConfig, SearchService};
use serde_json::{json, Value};
use tempfile::TempDir;

// ============================================================================
// Logging
// ============================================================================

/// Route `tracing` output through the test harness (once per binary)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// ============================================================================
// Clock
// ============================================================================

/// Fixed "now" used by time-sensitive tests
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

// ============================================================================
// In-memory knowledge base
// ============================================================================

/// Component, system and workflow documents shaped like real data files
pub fn sample_documents() -> Vec<(&'static str, DocumentKind, Value)> {
    vec![
        (
            "system-setup",
            DocumentKind::System,
            json!({
                "summary": "Mandatory development principles",
                "description": "Use design system components before custom markup"
            }),
        ),
        (
            "layout",
            DocumentKind::System,
            json!({ "summary": "Page layout grid, spacing and containers" }),
        ),
        (
            "figma-to-code-workflow",
            DocumentKind::Workflow,
            json!({
                "methodologyName": "Figma to code",
                "summary": "Convert a figma design into components",
                "triggers": ["figma", "mockup", "design conversion"]
            }),
        ),
        (
            "button",
            DocumentKind::Component,
            json!({
                "componentName": "Button",
                "summary": "Primary action button",
                "category": "inputs",
                "tags": ["forms", "actions"],
                "lastUpdated": "2024-05-20"
            }),
        ),
        (
            "formitem",
            DocumentKind::Component,
            json!({
                "componentName": "FormItem",
                "summary": "Wraps a form input with a label and error message",
                "category": "forms",
                "tags": ["forms"],
                "lastUpdated": "2023-01-01"
            }),
        ),
        (
            "modal",
            DocumentKind::Component,
            json!({
                "componentName": "Modal",
                "summary": "Dialog popup window",
                "category": "feedback",
                "tags": ["overlay"]
            }),
        ),
        (
            "dropdown",
            DocumentKind::Component,
            json!({
                "componentName": "Dropdown",
                "summary": "Select one option from a list",
                "category": "inputs",
                "tags": ["forms", "select"]
            }),
        ),
    ]
}

/// Source over `sample_documents`
pub fn sample_source() -> InMemorySource {
    sample_documents()
        .into_iter()
        .fold(InMemorySource::default(), |source, (id, kind, content)| {
            source.with_document(id, kind, content)
        })
}

/// Service loaded with `sample_documents` and default configuration
pub fn sample_service() -> SearchService {
    service_with(SearchConfig::default())
}

/// Service loaded with `sample_documents` and the given configuration
pub fn service_with(config: SearchConfig) -> SearchService {
    init_tracing();
    let service = SearchService::new(config);
    service.initialize(&sample_source());
    service
}

// ============================================================================
// On-disk knowledge base
// ============================================================================

/// `sample_documents` written out in the directory layout
pub struct DiskKnowledgeBase {
    pub dir: TempDir,
}

impl DiskKnowledgeBase {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let kb = DiskKnowledgeBase { dir };
        for (id, kind, content) in sample_documents() {
            let path = match kind {
                DocumentKind::System => kb.data_dir().join(format!("{}.json", id)),
                DocumentKind::Workflow => kb.docs_dir().join(format!("{}.json", id)),
                _ => kb.data_dir().join("components").join(format!("{}.json", id)),
            };
            write_json(&path, &content);
        }
        kb
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.dir.path().join("docs")
    }

    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(self.data_dir()).with_docs_dir(self.docs_dir())
    }

    pub fn write_component(&self, file_name: &str, content: &str) {
        write_raw(&self.data_dir().join("components").join(file_name), content);
    }
}

pub fn write_json(path: &Path, value: &Value) {
    write_raw(path, &serde_json::to_string_pretty(value).unwrap());
}

pub fn write_raw(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ============================================================================
// Assertions
// ============================================================================

/// Result ids in order
pub fn ids(results: &[compass::RankedResult]) -> Vec<String> {
    results.iter().map(|r| r.id.clone()).collect()
}

/// Scores never increase down the list
pub fn assert_descending(results: &[compass::RankedResult]) {
    for pair in results.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "results out of order: {} ({}) before {} ({})",
            pair[0].id,
            pair[0].score,
            pair[1].id,
            pair[1].score
        );
    }
}
