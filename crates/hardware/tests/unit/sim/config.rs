//! # Configuration Tests
//!
//! Defaults, partial JSON documents, validation and file errors.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use tomasim_core::common::SimError;
use tomasim_core::config::{Config, UnitConfig};

fn write_json(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace);
    assert_eq!(config.general.max_cycles, 10_000);
    assert_eq!(config.general.offset_scale, 4);
    assert_eq!(config.rob.entries, 128);
    assert_eq!(
        config.units.fp_multiplier,
        UnitConfig {
            rs_entries: 2,
            latency: 8,
            count: 1,
        }
    );
    assert_eq!(config.units.load_store.queue_entries, 3);
    assert_eq!(config.units.load_store.mem_latency, 4);
    config.validate().unwrap();
}

#[test]
fn test_partial_document_keeps_defaults() {
    let file = write_json(
        r#"{
            "general": { "max_cycles": 50 },
            "units": { "fp_adder": { "rs_entries": 4, "latency": 7, "count": 2 } }
        }"#,
    );
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.general.max_cycles, 50);
    assert_eq!(config.general.offset_scale, 4);
    assert_eq!(config.units.fp_adder.latency, 7);
    assert_eq!(config.units.fp_adder.count, 2);
    assert_eq!(config.units.fp_multiplier, Config::default().units.fp_multiplier);
    assert_eq!(config.rob, Config::default().rob);
}

#[test]
fn test_json_round_trip_through_file() {
    let mut config = Config::default();
    config.rob.entries = 6;
    config.units.load_store.ex_latency = 2;
    let file = write_json(&serde_json::to_string(&config).unwrap());
    assert_eq!(Config::from_file(file.path()).unwrap(), config);
}

#[test]
fn test_zero_capacity_is_rejected() {
    let err = Config::from_json(r#"{ "rob": { "entries": 0 } }"#).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));

    let err = Config::from_json(r#"{ "units": { "load_store": { "mem_latency": 0 } } }"#)
        .unwrap_err();
    assert!(matches!(err, SimError::Config(ref m) if m.contains("load_store")));
}

#[test]
fn test_malformed_json_is_reported() {
    let err = Config::from_json("{ \"rob\": ").unwrap_err();
    assert!(matches!(err, SimError::Json(_)));
}

#[test]
fn test_missing_file_is_reported() {
    let err = Config::from_file("/nonexistent/machine.json").unwrap_err();
    assert!(matches!(err, SimError::Io { .. }));
}
