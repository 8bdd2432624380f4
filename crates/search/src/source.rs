//! Document sources feeding the index
//!
//! A `DocumentSource` lists every document once at startup and can reload a
//! single document by id. Two implementations:
//! - `DirectorySource`: JSON files on disk
//! - `InMemorySource`: a fixed set of documents (tests, embedding)
//!
//! Per-file failures never abort a listing; they are collected in the
//! returned `LoadReport` and logged.

use compass_core::{DocumentKind, Error, IndexedDocument, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// System documents read from the data directory, by file stem
pub const SYSTEM_FILES: [&str; 2] = ["layout", "system-setup"];

/// Subdirectory of the data directory holding component documents
pub const COMPONENTS_DIR: &str = "components";

// ============================================================================
// LoadReport
// ============================================================================

/// Outcome of listing a source
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Documents that loaded successfully
    pub documents: Vec<IndexedDocument>,
    /// One `Error::LoadFailure` per skipped file
    pub failures: Vec<Error>,
}

impl LoadReport {
    /// Number of documents loaded
    pub fn loaded(&self) -> usize {
        self.documents.len()
    }

    /// True if nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, source_name: impl Into<String>, reason: impl Into<String>) {
        let err = Error::load_failure(source_name, reason.into());
        warn!(target: "compass::loader", error = %err, "Skipping document");
        self.failures.push(err);
    }
}

// ============================================================================
// DocumentSource
// ============================================================================

/// Supplies documents to the index
pub trait DocumentSource: Send + Sync {
    /// List every available document
    fn list_documents(&self) -> LoadReport;

    /// Load one document by id and kind
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the source has no such document, or
    /// `Error::LoadFailure` if it exists but cannot be read.
    fn load_document(&self, id: &str, kind: DocumentKind) -> Result<IndexedDocument>;

    /// Name for logs
    fn name(&self) -> &str;
}

// ============================================================================
// InMemorySource
// ============================================================================

/// A fixed set of documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: Vec<IndexedDocument>,
}

impl InMemorySource {
    /// Create a source from prepared documents
    pub fn new(documents: Vec<IndexedDocument>) -> Self {
        InMemorySource { documents }
    }

    /// Builder: add a document derived from raw content
    pub fn with_document(mut self, id: &str, kind: DocumentKind, content: Value) -> Self {
        self.documents
            .push(IndexedDocument::from_content(id, kind, content));
        self
    }

    /// Add a prepared document
    pub fn push(&mut self, document: IndexedDocument) {
        self.documents.push(document);
    }
}

impl DocumentSource for InMemorySource {
    fn list_documents(&self) -> LoadReport {
        LoadReport {
            documents: self.documents.clone(),
            failures: Vec::new(),
        }
    }

    fn load_document(&self, id: &str, kind: DocumentKind) -> Result<IndexedDocument> {
        let id = id.to_lowercase();
        self.documents
            .iter()
            .find(|doc| doc.id == id && doc.kind == kind)
            .cloned()
            .ok_or_else(|| Error::not_found(id, Vec::new()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// DirectorySource
// ============================================================================

/// JSON documents on disk
///
/// Layout:
/// - `<data_dir>/layout.json`, `<data_dir>/system-setup.json`: system documents
/// - `<data_dir>/components/*.json`: component documents
/// - `<docs_dir>/*.json`: workflow documents
#[derive(Debug, Clone)]
pub struct DirectorySource {
    data_dir: PathBuf,
    docs_dir: Option<PathBuf>,
}

impl DirectorySource {
    /// Create a source rooted at a data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DirectorySource {
            data_dir: data_dir.into(),
            docs_dir: None,
        }
    }

    /// Builder: set the workflow documents directory
    pub fn with_docs_dir(mut self, docs_dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = Some(docs_dir.into());
        self
    }

    /// Data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn components_dir(&self) -> PathBuf {
        self.data_dir.join(COMPONENTS_DIR)
    }

    fn load_system(&self, report: &mut LoadReport) {
        for stem in SYSTEM_FILES {
            let path = self.data_dir.join(format!("{}.json", stem));
            if !path.exists() {
                debug!(target: "compass::loader", path = %path.display(), "System file absent");
                continue;
            }
            match read_json(&path) {
                Ok(content) => report.documents.push(IndexedDocument::from_content(
                    stem,
                    DocumentKind::System,
                    content,
                )),
                Err(reason) => report.record_failure(path.display().to_string(), reason),
            }
        }
    }

    fn load_workflows(&self, report: &mut LoadReport) {
        let Some(docs_dir) = &self.docs_dir else { return };
        for path in json_files(docs_dir, report) {
            let Some(stem) = file_stem(&path) else { continue };
            match read_json(&path) {
                Ok(content) => report.documents.push(IndexedDocument::from_content(
                    stem,
                    DocumentKind::Workflow,
                    content,
                )),
                Err(reason) => report.record_failure(path.display().to_string(), reason),
            }
        }
    }

    fn load_components(&self, report: &mut LoadReport) {
        let dir = self.components_dir();
        for path in json_files(&dir, report) {
            let Some(stem) = file_stem(&path) else { continue };
            match read_json(&path) {
                Ok(content) => {
                    let id = component_id(&content, &stem);
                    report.documents.push(IndexedDocument::from_content(
                        id,
                        DocumentKind::Component,
                        content,
                    ));
                }
                Err(reason) => report.record_failure(path.display().to_string(), reason),
            }
        }
    }

    fn find_path(&self, id: &str, kind: DocumentKind) -> Option<PathBuf> {
        match kind {
            DocumentKind::System => SYSTEM_FILES
                .iter()
                .find(|stem| **stem == id)
                .map(|stem| self.data_dir.join(format!("{}.json", stem)))
                .filter(|p| p.exists()),
            DocumentKind::Workflow => self
                .docs_dir
                .as_ref()
                .map(|dir| dir.join(format!("{}.json", id)))
                .filter(|p| p.exists()),
            DocumentKind::Component => {
                let mut scratch = LoadReport::default();
                json_files(&self.components_dir(), &mut scratch)
                    .into_iter()
                    .find(|path| {
                        let Some(stem) = file_stem(path) else { return false };
                        if component_stem_id(&stem) == id {
                            return true;
                        }
                        read_json(path)
                            .map(|content| component_id(&content, &stem) == id)
                            .unwrap_or(false)
                    })
            }
            DocumentKind::Recipe => None,
        }
    }
}

impl DocumentSource for DirectorySource {
    fn list_documents(&self) -> LoadReport {
        let mut report = LoadReport::default();
        self.load_system(&mut report);
        self.load_workflows(&mut report);
        self.load_components(&mut report);

        debug!(
            target: "compass::loader",
            source = %self.data_dir.display(),
            loaded = report.loaded(),
            failed = report.failures.len(),
            "Listed documents"
        );
        report
    }

    fn load_document(&self, id: &str, kind: DocumentKind) -> Result<IndexedDocument> {
        let id = id.to_lowercase();
        let path = self
            .find_path(&id, kind)
            .ok_or_else(|| Error::not_found(id.clone(), Vec::new()))?;
        let content = read_json(&path)
            .map_err(|reason| Error::load_failure(path.display().to_string(), reason))?;
        Ok(IndexedDocument::from_content(id, kind, content))
    }

    fn name(&self) -> &str {
        "directory"
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Component id: lowercased `componentName`, else the file stem without `_consumer`
fn component_id(content: &Value, stem: &str) -> String {
    content
        .get("componentName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| component_stem_id(stem))
}

fn component_stem_id(stem: &str) -> String {
    stem.replacen("_consumer", "", 1).to_lowercase()
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn read_json(path: &Path) -> std::result::Result<Value, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// `*.json` files of a directory, sorted by name; a missing directory is empty
fn json_files(dir: &Path, report: &mut LoadReport) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            report.record_failure(dir.display().to_string(), e.to_string());
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    files.sort();
    files
}
