//! Configuration files and the `open` entry point.

use crate::common::*;
use compass::{Error, SearchConfig, SearchOptions};
use tempfile::TempDir;

#[test]
fn default_file_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(compass::CONFIG_FILE_NAME);
    SearchConfig::write_default_if_missing(&path).unwrap();
    assert_eq!(SearchConfig::from_file(&path).unwrap(), SearchConfig::default());
}

#[test]
fn partial_file_keeps_defaults() {
    let config = SearchConfig::from_toml_str("max_results = 3\ncache_ttl_secs = 10\n").unwrap();
    assert_eq!(config.max_results, 3);
    assert_eq!(config.cache_ttl_secs, 10);
    assert_eq!(config.cache_capacity, 100);
    assert_eq!(config.similarity_threshold, 0.3);
}

#[test]
fn invalid_values_are_config_errors() {
    assert!(matches!(
        SearchConfig::from_toml_str("cache_capacity = 0"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        SearchConfig::from_toml_str("similarity_threshold = -1.0"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        SearchConfig::from_toml_str("max_results = \"many\""),
        Err(Error::Config(_))
    ));
}

#[test]
fn open_loads_configured_directories() {
    let kb = DiskKnowledgeBase::new();
    let toml = format!(
        "max_results = 2\n\n[data]\ndata_dir = {:?}\ndocs_dir = {:?}\n",
        kb.data_dir().display().to_string(),
        kb.docs_dir().display().to_string(),
    );
    let path = kb.dir.path().join(compass::CONFIG_FILE_NAME);
    write_raw(&path, &toml);

    let config = SearchConfig::from_file(&path).unwrap();
    let (service, summary) = compass::open(config).unwrap();
    assert_eq!(summary.stats.total_items, sample_documents().len());
    assert!(summary.failures.is_empty());
    assert_eq!(service.search("forms", &SearchOptions::new()).len(), 2);
}

#[test]
fn open_reports_skipped_files() {
    let kb = DiskKnowledgeBase::new();
    kb.write_component("broken.json", "{ not json");

    let mut config = SearchConfig::default();
    config.data.data_dir = Some(kb.data_dir());
    let (_service, summary) = compass::open(config).unwrap();
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].to_string().contains("broken.json"));
}

#[test]
fn open_without_data_dir_fails() {
    assert!(matches!(
        compass::open(SearchConfig::default()),
        Err(Error::Config(_))
    ));
}
