//! Search Pipeline Test Suite
//!
//! End-to-end tests through the `compass` facade: index, intent, ranking,
//! priority rules, cache and analytics working together.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Core Properties** (fast, must pass)
//!   Cache TTL boundary, capacity bound, rebuild idempotence, pinned entries.
//!
//! - **Tier 2: Behavioral Scenarios** (workflow tests)
//!   Search flows, filters, lookups, analytics, configuration loading.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test search_pipeline
//! ```

#[path = "../common/mod.rs"]
mod common;

mod analytics_reporting;
mod cache_behavior;
mod config_loading;
mod index_scenarios;
mod priority_rules;
mod search_flow;
