//! Query intent classification
//!
//! Intents are detected with a static, ordered table of case-insensitive
//! regex patterns. Every matching pattern adds `PATTERN_INCREMENT` to its
//! intent's confidence (capped at 1.0); the highest confidence wins and ties
//! go to the intent registered first. Queries matching nothing fall back to
//! `ComponentSearch` at `FALLBACK_CONFIDENCE`.
//!
//! Each intent also carries the downstream tools worth suggesting and the
//! context terms that boost matching documents during scoring.

use compass_core::IntentKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Confidence added per matching pattern
pub const PATTERN_INCREMENT: f64 = 0.3;

/// Confidence of the fallback intent
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Pattern sources, in registration order
const PATTERN_TABLE: &[(IntentKind, &[&str])] = &[
    (
        IntentKind::ComponentSearch,
        &[
            r"\b(find|search|look for|need|want|use)\s+\w+\s+(component|button|input|form)\b",
            r"\bhow to\s+(create|build|use|implement)\s+\w+",
            r"\bwhat\s+(component|element)\s+(for|to)\b",
        ],
    ),
    (
        IntentKind::ImplementationGuidance,
        &[
            r"\b(how to|how do I|best practice|implement|integrate|setup)\b",
            r"\b(example|sample|code|snippet|pattern)\b",
            r"\b(react|angular|framework|install|configure)\b",
        ],
    ),
    (
        IntentKind::WorkflowRequest,
        &[
            r"\b(figma|design|convert|build|workflow|process)\b",
            r"\b(design to code|figma to react|mockup|wireframe)\b",
            r"\b(build this|create this|implement this)\b",
        ],
    ),
    (
        IntentKind::Troubleshooting,
        &[
            r"\b(error|problem|issue|not working|broken|fix)\b",
            r"\b(why|troubleshoot|debug|solve|help)\b",
        ],
    ),
];

/// Compiled once; a pattern that fails to compile is dropped
static COMPILED_PATTERNS: Lazy<Vec<(IntentKind, Vec<Regex>)>> = Lazy::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|(kind, sources)| {
            let compiled = sources
                .iter()
                .filter_map(|src| Regex::new(&format!("(?i){}", src)).ok())
                .collect();
            (*kind, compiled)
        })
        .collect()
});

/// Downstream operations worth suggesting for an intent
pub fn suggested_tools(kind: IntentKind) -> &'static [&'static str] {
    match kind {
        IntentKind::ComponentSearch => &["search_components", "get_component_details"],
        IntentKind::ImplementationGuidance => &["project_knowledge_search", "get_usage_patterns"],
        IntentKind::WorkflowRequest => &["project_knowledge_search"],
        IntentKind::Troubleshooting => &["project_knowledge_search", "give_feedback"],
    }
}

/// Context term -> boost multiplier pairs for an intent
pub fn context_boosts(kind: IntentKind) -> &'static [(&'static str, f64)] {
    match kind {
        IntentKind::ComponentSearch => &[("component", 1.5), ("api", 1.3), ("usage", 1.2)],
        IntentKind::ImplementationGuidance => &[
            ("example", 1.5),
            ("installation", 1.4),
            ("setup", 1.3),
            ("pattern", 1.2),
        ],
        IntentKind::WorkflowRequest => &[("workflow", 2.0), ("figma", 1.8), ("conversion", 1.5)],
        IntentKind::Troubleshooting => &[
            ("troubleshooting", 1.8),
            ("error", 1.5),
            ("common", 1.3),
        ],
    }
}

// ============================================================================
// QueryIntent
// ============================================================================

/// Detected intent of a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryIntent {
    /// Winning intent
    pub kind: IntentKind,
    /// Accumulated confidence, (0, 1]
    pub confidence: f64,
    /// Suggested downstream operations
    pub suggested_tools: Vec<String>,
    /// Context term boosts used by the scorer
    #[serde(skip)]
    pub context_boosts: Vec<(String, f64)>,
}

impl QueryIntent {
    /// Intent with its static tool and boost tables
    pub fn new(kind: IntentKind, confidence: f64) -> Self {
        QueryIntent {
            kind,
            confidence,
            suggested_tools: suggested_tools(kind).iter().map(|t| t.to_string()).collect(),
            context_boosts: context_boosts(kind)
                .iter()
                .map(|(term, boost)| (term.to_string(), *boost))
                .collect(),
        }
    }

    /// Fallback when no pattern matches
    pub fn fallback() -> Self {
        QueryIntent::new(IntentKind::ComponentSearch, FALLBACK_CONFIDENCE)
    }
}

// ============================================================================
// IntentClassifier
// ============================================================================

/// Regex-table intent classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    /// Create a classifier over the built-in pattern table
    pub fn new() -> Self {
        IntentClassifier
    }

    /// Confidence per intent, in registration order (zero when nothing matched)
    pub fn scores(&self, query: &str) -> Vec<(IntentKind, f64)> {
        COMPILED_PATTERNS
            .iter()
            .map(|(kind, patterns)| {
                let hits = patterns.iter().filter(|re| re.is_match(query)).count();
                (*kind, (hits as f64 * PATTERN_INCREMENT).min(1.0))
            })
            .collect()
    }

    /// Classify a query
    ///
    /// # Example
    ///
    /// ```
    /// use compass_core::IntentKind;
    /// use compass_intelligence::intent::IntentClassifier;
    ///
    /// let intent = IntentClassifier::new().detect("Why is my form broken?");
    /// assert_eq!(intent.kind, IntentKind::Troubleshooting);
    /// ```
    pub fn detect(&self, query: &str) -> QueryIntent {
        let mut best: Option<(IntentKind, f64)> = None;
        for (kind, confidence) in self.scores(query) {
            if confidence <= 0.0 {
                continue;
            }
            match best {
                Some((_, top)) if confidence <= top => {}
                _ => best = Some((kind, confidence)),
            }
        }

        let intent = match best {
            Some((kind, confidence)) => QueryIntent::new(kind, confidence),
            None => QueryIntent::fallback(),
        };
        debug!(
            target: "compass::search",
            intent = %intent.kind,
            confidence = intent.confidence,
            "Intent detected"
        );
        intent
    }
}
