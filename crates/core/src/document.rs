//! Document model for the knowledge base
//!
//! This module defines:
//! - DocumentKind: the four kinds of indexed documents
//! - DocumentContent: opaque JSON payload with typed accessor helpers
//! - IndexedDocument: a document plus the searchable text and tags derived from it
//!
//! Documents are created once per loaded source file and never mutated after
//! indexing; the derived fields are computed in `IndexedDocument::from_content`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// DocumentKind
// ============================================================================

/// Kind of knowledge-base document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A UI component (button, modal, ...)
    Component,
    /// System documentation (layout, setup)
    System,
    /// A workflow (e.g. design-to-code conversion)
    Workflow,
    /// A recipe combining several components
    Recipe,
}

impl DocumentKind {
    /// All kinds, in declaration order
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Component,
        DocumentKind::System,
        DocumentKind::Workflow,
        DocumentKind::Recipe,
    ];

    /// Lowercase name used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Component => "component",
            DocumentKind::System => "system",
            DocumentKind::Workflow => "workflow",
            DocumentKind::Recipe => "recipe",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "component" => Ok(DocumentKind::Component),
            "system" => Ok(DocumentKind::System),
            "workflow" => Ok(DocumentKind::Workflow),
            "recipe" => Ok(DocumentKind::Recipe),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

// ============================================================================
// DocumentContent
// ============================================================================

/// Raw document payload
///
/// Wraps the JSON value loaded from storage. Kind-specific fields are read
/// through the accessor helpers; missing or mistyped fields read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentContent(Value);

impl DocumentContent {
    /// Wrap a JSON value
    pub fn new(value: Value) -> Self {
        DocumentContent(value)
    }

    /// Borrow the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume into the underlying JSON value
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Field lookup on an object payload
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Non-empty string field
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// String-array field; non-string elements are skipped
    pub fn str_list(&self, field: &str) -> Vec<&str> {
        string_items(self.0.get(field))
    }

    /// `componentName` field
    pub fn component_name(&self) -> Option<&str> {
        self.str_field("componentName")
    }

    /// `summary` field
    pub fn summary(&self) -> Option<&str> {
        self.str_field("summary")
    }

    /// `category` field
    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    /// `lastUpdated` field, unparsed
    pub fn last_updated(&self) -> Option<&str> {
        self.str_field("lastUpdated")
    }

    /// `triggers` list (workflow documents)
    pub fn triggers(&self) -> Vec<&str> {
        self.str_list("triggers")
    }

    /// Short display summary: summary, methodologyName, purpose, in that order
    pub fn display_summary(&self) -> &str {
        self.summary()
            .or_else(|| self.str_field("methodologyName"))
            .or_else(|| self.str_field("purpose"))
            .unwrap_or("No summary available")
    }
}

impl From<Value> for DocumentContent {
    fn from(value: Value) -> Self {
        DocumentContent(value)
    }
}

fn string_items(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

// ============================================================================
// IndexedDocument
// ============================================================================

/// A document as stored by the inverted index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Unique, lowercase id
    pub id: String,
    /// Document kind
    pub kind: DocumentKind,
    /// Full raw content
    pub content: DocumentContent,
    /// Concatenation of the textual fields
    pub searchable_text: String,
    /// Tags (explicit tags, aiTags, category, status, custom element)
    pub tags: Vec<String>,
    /// Category, if present
    pub category: Option<String>,
}

impl IndexedDocument {
    /// Create a document with explicit derived fields
    pub fn new(
        id: impl Into<String>,
        kind: DocumentKind,
        content: DocumentContent,
        searchable_text: impl Into<String>,
        tags: Vec<String>,
        category: Option<String>,
    ) -> Self {
        IndexedDocument {
            id: id.into().to_lowercase(),
            kind,
            content,
            searchable_text: searchable_text.into(),
            tags,
            category,
        }
    }

    /// Create a document, deriving searchable text, tags and category from content
    ///
    /// Malformed content (non-object, missing fields) degrades to empty text
    /// and no tags.
    pub fn from_content(id: impl Into<String>, kind: DocumentKind, content: Value) -> Self {
        let content = DocumentContent::new(content);
        let searchable_text = searchable_text(&content);
        let tags = extract_tags(&content);
        let category = content.category().map(str::to_string);
        IndexedDocument::new(id, kind, content, searchable_text, tags, category)
    }

    /// Display name: `componentName` if present, else the id
    pub fn name(&self) -> &str {
        self.content.component_name().unwrap_or(&self.id)
    }
}

/// Concatenate the searchable fields of a document
pub fn searchable_text(content: &DocumentContent) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for field in ["componentName", "summary", "description", "purpose", "commonUse"] {
        if let Some(text) = content.str_field(field) {
            parts.push(text);
        }
    }

    if let Some(guidance) = content.get("designGuidance") {
        for field in ["whenToUse", "bestPractices"] {
            let items = string_items(guidance.get(field));
            if !items.is_empty() {
                parts.extend(items);
            }
        }
    }

    if let Some(props) = content
        .get("api")
        .and_then(|api| api.get("props"))
        .and_then(Value::as_array)
    {
        for prop in props {
            for field in ["name", "description", "usage"] {
                if let Some(text) = prop.get(field).and_then(Value::as_str) {
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
            }
        }
    }

    parts.join(" ")
}

/// Collect tags from a document
pub fn extract_tags(content: &DocumentContent) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    tags.extend(content.str_list("tags").into_iter().map(str::to_string));
    tags.extend(content.str_list("aiTags").into_iter().map(str::to_string));

    if let Some(category) = content.category() {
        tags.push(category.to_string());
    }
    if let Some(status) = content.str_field("status") {
        tags.push(status.to_string());
    }
    if let Some(tag_name) = content
        .get("customElement")
        .and_then(|el| el.get("tagName"))
        .and_then(Value::as_str)
    {
        tags.push(tag_name.replacen("goa-", "", 1));
    }

    tags.retain(|tag| !tag.is_empty());
    tags
}
