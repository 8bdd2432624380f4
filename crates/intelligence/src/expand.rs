//! Concept-based query expansion
//!
//! A static concept map ties each canonical design-system concept to its
//! synonyms. Expanding a query adds, for every concept touched by a query
//! token, the concept name and all its synonyms. Expansion is one hop only:
//! added synonyms are not expanded again.

use std::collections::HashSet;

/// Canonical concept -> synonyms, in registration order
const CONCEPTS: &[(&str, &[&str])] = &[
    (
        "button",
        &[
            "btn",
            "click",
            "action",
            "submit",
            "cta",
            "call-to-action",
            "primary button",
            "secondary button",
            "link button",
        ],
    ),
    (
        "input",
        &[
            "textbox",
            "field",
            "form field",
            "text input",
            "entry",
            "form control",
            "input field",
            "text field",
        ],
    ),
    (
        "dropdown",
        &[
            "select",
            "picker",
            "chooser",
            "menu",
            "options",
            "selection",
            "combo box",
            "listbox",
        ],
    ),
    (
        "modal",
        &["dialog", "popup", "overlay", "lightbox", "window", "panel"],
    ),
    (
        "layout",
        &[
            "structure",
            "grid",
            "organization",
            "arrangement",
            "framework",
            "page structure",
            "content layout",
            "responsive layout",
        ],
    ),
    (
        "container",
        &[
            "wrapper",
            "box",
            "card",
            "panel",
            "section",
            "grouping",
            "content area",
            "widget",
        ],
    ),
    (
        "notification",
        &[
            "alert",
            "message",
            "banner",
            "toast",
            "feedback",
            "status",
            "warning",
            "error",
            "success message",
        ],
    ),
    (
        "callout",
        &[
            "highlight",
            "attention",
            "emphasis",
            "important",
            "notice",
            "info box",
            "alert box",
        ],
    ),
    (
        "navigation",
        &[
            "nav",
            "menu",
            "breadcrumb",
            "link",
            "routing",
            "wayfinding",
            "site navigation",
            "page navigation",
        ],
    ),
    (
        "government",
        &[
            "official",
            "alberta",
            "goa",
            "public service",
            "civic",
            "government service",
            "official website",
        ],
    ),
    (
        "form",
        &[
            "application",
            "submission",
            "registration",
            "questionnaire",
            "data entry",
            "user input",
            "form validation",
        ],
    ),
    (
        "figma",
        &[
            "design",
            "mockup",
            "wireframe",
            "prototype",
            "visual design",
            "design file",
            "design handoff",
            "design system",
        ],
    ),
];

/// Static concept -> synonyms table
#[derive(Debug, Clone)]
pub struct ConceptMap {
    concepts: Vec<(String, Vec<String>)>,
}

impl Default for ConceptMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConceptMap {
    /// The built-in design-system concepts
    pub fn standard() -> Self {
        let concepts = CONCEPTS
            .iter()
            .map(|(concept, synonyms)| {
                (
                    concept.to_string(),
                    synonyms.iter().map(|s| s.to_lowercase()).collect(),
                )
            })
            .collect();
        ConceptMap { concepts }
    }

    /// A custom table (concept names and synonyms are lowercased)
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: AsRef<str>,
    {
        let concepts = pairs
            .into_iter()
            .map(|(concept, synonyms)| {
                (
                    concept.as_ref().to_lowercase(),
                    synonyms.iter().map(|s| s.as_ref().to_lowercase()).collect(),
                )
            })
            .collect();
        ConceptMap { concepts }
    }

    /// Number of concepts
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// True if the table is empty
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Synonyms of a concept
    pub fn synonyms(&self, concept: &str) -> Option<&[String]> {
        self.concepts
            .iter()
            .find(|(name, _)| name == concept)
            .map(|(_, synonyms)| synonyms.as_slice())
    }

    /// Expand a query with related concepts
    ///
    /// The result always starts with the original query verbatim, followed
    /// by its lowercase whitespace-split tokens, then the names and synonyms
    /// of every concept whose name or synonym is a substring of a token.
    /// Duplicates are dropped, keeping first-seen order.
    ///
    /// # Example
    ///
    /// ```
    /// use compass_intelligence::expand::ConceptMap;
    ///
    /// let terms = ConceptMap::standard().expand("Popup");
    /// assert_eq!(terms[0], "Popup");
    /// assert!(terms.contains(&"modal".to_string()));
    /// assert!(terms.contains(&"dialog".to_string()));
    /// ```
    pub fn expand(&self, query: &str) -> Vec<String> {
        let lower = query.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut terms: Vec<String> = Vec::new();
        let mut push = |term: &str| {
            if seen.insert(term.to_string()) {
                terms.push(term.to_string());
            }
        };

        push(query);
        for token in &tokens {
            push(token);
        }

        for (concept, synonyms) in &self.concepts {
            let touched = tokens.iter().any(|token| {
                token.contains(concept.as_str())
                    || synonyms.iter().any(|s| token.contains(s.as_str()))
            });
            if touched {
                for synonym in synonyms {
                    push(synonym);
                }
                push(concept);
            }
        }

        terms
    }
}
