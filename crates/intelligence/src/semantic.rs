//! Content-level semantic similarity
//!
//! Similarity is the fraction of expanded query terms that occur (as
//! case-insensitive substrings) in the text extracted from a document's
//! salient fields.

use serde_json::Value;

/// Fields read at every object level
pub const SALIENT_FIELDS: [&str; 11] = [
    "componentName",
    "summary",
    "description",
    "purpose",
    "commonUse",
    "tags",
    "aiTags",
    "category",
    "methodologyName",
    "triggers",
    "usage",
];

/// Extract searchable text from document content
///
/// A string is returned as-is. For an object, every truthy salient field is
/// included (arrays item by item), then nested objects and arrays under
/// other keys are visited recursively. Scalars under other keys are ignored.
pub fn extract_text(content: &Value) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_text(content, &mut parts);
    parts.join(" ")
}

fn collect_text(content: &Value, parts: &mut Vec<String>) {
    match content {
        Value::String(s) => parts.push(s.clone()),
        Value::Object(map) => {
            for field in SALIENT_FIELDS {
                match map.get(field) {
                    Some(Value::Array(items)) => {
                        parts.extend(items.iter().map(value_to_text));
                    }
                    Some(value) if is_truthy(value) => parts.push(value_to_text(value)),
                    _ => {}
                }
            }
            for (key, value) in map {
                if SALIENT_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                if let Value::Object(_) | Value::Array(_) = value {
                    collect_nested(value, parts);
                }
            }
        }
        Value::Array(_) => collect_nested(content, parts),
        _ => {}
    }
}

/// Nested containers contribute only through their own salient fields
fn collect_nested(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::Object(_) => collect_text(value, parts),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(_) | Value::Array(_) = item {
                    collect_nested(item, parts);
                }
            }
        }
        _ => {}
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fraction of `expanded_terms` found in `text`, in [0, 1]
///
/// # Example
///
/// ```
/// use compass_intelligence::semantic::semantic_similarity;
///
/// let terms = vec!["modal".to_string(), "dialog".to_string()];
/// assert_eq!(semantic_similarity(&terms, "A Dialog window"), 0.5);
/// ```
pub fn semantic_similarity(expanded_terms: &[String], text: &str) -> f64 {
    if expanded_terms.is_empty() {
        return 0.0;
    }
    let text = text.to_lowercase();
    let matches = expanded_terms
        .iter()
        .filter(|term| text.contains(&term.to_lowercase()))
        .count();
    matches as f64 / expanded_terms.len() as f64
}
