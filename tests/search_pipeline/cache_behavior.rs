//! Query cache: TTL boundary, capacity bound, hit counting.

use std::collections::VecDeque;
use std::time::Duration as StdDuration;

use crate::common::*;
use chrono::Duration;
use compass::{SearchConfig, SearchOptions};
use compass_intelligence::QueryCache;
use proptest::prelude::*;

#[test]
fn put_then_get_increments_hit_count() {
    let service = sample_service();
    let mut cache = QueryCache::default();
    let results = service.search("forms", &SearchOptions::new());

    cache.put_at("forms", results.clone(), fixed_now());
    assert_eq!(cache.peek("forms").unwrap().hit_count, 0);

    assert_eq!(cache.get_at("forms", fixed_now()), Some(results));
    assert_eq!(cache.peek("forms").unwrap().hit_count, 1);
}

#[test]
fn service_ttl_boundary() {
    let config = SearchConfig {
        cache_ttl_secs: 60,
        ..SearchConfig::default()
    };
    let service = service_with(config);
    let opts = SearchOptions::new();
    let t0 = fixed_now();
    let ttl = Duration::seconds(60);

    assert!(!service.search_detailed_at("modal", &opts, t0).cache_hit);
    assert!(
        service
            .search_detailed_at("modal", &opts, t0 + ttl - Duration::milliseconds(1))
            .cache_hit
    );
    assert!(
        !service
            .search_detailed_at("modal", &opts, t0 + ttl + Duration::milliseconds(1))
            .cache_hit
    );
}

#[test]
fn cache_key_is_normalized_query() {
    let service = sample_service();
    let opts = SearchOptions::new();
    service.search("Primary   Button", &opts);
    assert!(service.search_detailed("  primary button ", &opts).cache_hit);
    assert_eq!(service.cached_queries(), 1);
}

#[test]
fn service_cache_respects_capacity() {
    let config = SearchConfig {
        cache_capacity: 2,
        ..SearchConfig::default()
    };
    let service = service_with(config);
    let opts = SearchOptions::new();
    let t0 = fixed_now();

    service.search_detailed_at("button", &opts, t0);
    service.search_detailed_at("modal", &opts, t0 + Duration::seconds(1));
    service.search_detailed_at("dropdown", &opts, t0 + Duration::seconds(2));
    assert_eq!(service.cached_queries(), 2);

    // "button" was inserted first and is gone
    let again = service.search_detailed_at("button", &opts, t0 + Duration::seconds(3));
    assert!(!again.cache_hit);
    let again = service.search_detailed_at("dropdown", &opts, t0 + Duration::seconds(4));
    assert!(again.cache_hit);
}

#[test]
fn filters_do_not_split_cache_entries() {
    let service = sample_service();
    service.search("forms", &SearchOptions::new());
    let filtered = service.search_detailed(
        "forms",
        &SearchOptions::new().with_category("forms").with_max_results(1),
    );
    assert!(filtered.cache_hit);
    assert_eq!(ids(&filtered.results), vec!["formitem"]);
    assert_eq!(service.cached_queries(), 1);
}

proptest! {
    #[test]
    fn capacity_bound_evicts_earliest_inserted(
        capacity in 1usize..8,
        queries in prop::collection::vec("[a-z]{1,4}", 1..40),
    ) {
        let mut cache = QueryCache::new(capacity, StdDuration::from_secs(3600));
        let mut model: VecDeque<String> = VecDeque::new();

        for (i, query) in queries.iter().enumerate() {
            let now = fixed_now() + Duration::seconds(i as i64);
            if model.contains(query) {
                // overwrite: fresh timestamp, moves to the back
                model.retain(|q| q != query);
            } else if model.len() == capacity {
                let evicted = model.pop_front().unwrap();
                cache.put_at(query, Vec::new(), now);
                prop_assert!(!cache.contains(&evicted));
                model.push_back(query.clone());
                prop_assert!(cache.len() <= capacity);
                continue;
            }
            cache.put_at(query, Vec::new(), now);
            model.push_back(query.clone());
            prop_assert!(cache.len() <= capacity);
        }

        prop_assert_eq!(cache.len(), model.len());
        for query in &model {
            prop_assert!(cache.contains(query));
        }
    }
}
