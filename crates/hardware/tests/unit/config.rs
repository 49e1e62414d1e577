//! # Configuration Tests
//!
//! Defaults, JSON deserialization, and geometry validation.

use microcache_core::common::ConfigError;
use microcache_core::config::*;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.cache.size_bytes, 1024);
    assert_eq!(config.cache.ways, 4);
    assert_eq!(config.cache.latency, 1);
    assert_eq!(config.cache.num_sets(), 4);
    assert_eq!(config.memory.controller, MemoryController::Simple);
    assert_eq!(config.memory.latency, 10);
    assert_eq!(config.requester.issue_gap, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.cache.size_bytes, Config::default().cache.size_bytes);
    assert_eq!(config.memory.row_bytes, 2048);
}

#[test]
fn test_partial_cache_section_keeps_other_defaults() {
    let config = Config::from_json(r#"{ "cache": { "ways": 2 } }"#).unwrap();
    assert_eq!(config.cache.ways, 2);
    assert_eq!(config.cache.size_bytes, 1024);
    assert_eq!(config.cache.num_sets(), 8);
}

#[rstest]
#[case("\"Simple\"", MemoryController::Simple)]
#[case("\"Dram\"", MemoryController::Dram)]
#[case("\"DRAM\"", MemoryController::Dram)]
fn test_memory_controller_names(#[case] name: &str, #[case] expected: MemoryController) {
    let json = format!(r#"{{ "memory": {{ "controller": {name} }} }}"#);
    let config = Config::from_json(&json).unwrap();
    assert_eq!(config.memory.controller, expected);
}

#[test]
fn test_unknown_controller_is_rejected() {
    assert!(Config::from_json(r#"{ "memory": { "controller": "Hbm" } }"#).is_err());
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(Config::from_json("{ cache: ").is_err());
}

#[rstest]
#[case(64, 1, 1)]
#[case(256, 4, 1)]
#[case(1024, 4, 4)]
#[case(192, 1, 3)]
#[case(32768, 8, 64)]
fn test_valid_geometry(#[case] size: usize, #[case] ways: usize, #[case] sets: usize) {
    let cache = CacheConfig {
        size_bytes: size,
        ways,
        latency: 1,
    };
    assert_eq!(cache.validate(), Ok(()));
    assert_eq!(cache.num_sets(), sets);
}

#[rstest]
#[case(1024, 0, ConfigError::ZeroWays)]
#[case(0, 1, ConfigError::TooSmall { size: 0, block: 64 })]
#[case(32, 1, ConfigError::TooSmall { size: 32, block: 64 })]
#[case(64, 2, ConfigError::Geometry { size: 64, stride: 128 })]
#[case(320, 4, ConfigError::Geometry { size: 320, stride: 256 })]
#[case(100, 1, ConfigError::Geometry { size: 100, stride: 64 })]
fn test_invalid_geometry(#[case] size: usize, #[case] ways: usize, #[case] err: ConfigError) {
    let cache = CacheConfig {
        size_bytes: size,
        ways,
        latency: 1,
    };
    assert_eq!(cache.validate(), Err(err));
}

#[rstest]
#[case(0)]
#[case(3000)]
fn test_bad_row_size(#[case] row_bytes: u64) {
    let memory = MemoryConfig {
        row_bytes,
        ..MemoryConfig::default()
    };
    assert_eq!(memory.validate(), Err(ConfigError::RowSize(row_bytes)));
}

#[test]
fn test_validate_reports_cache_error_first() {
    let json = r#"{ "cache": { "size_bytes": 100 }, "memory": { "row_bytes": 3 } }"#;
    let config = Config::from_json(json).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Geometry { size: 100, .. })
    ));
}

#[test]
fn test_config_errors_have_messages() {
    let msg = ConfigError::Geometry {
        size: 320,
        stride: 256,
    }
    .to_string();
    assert!(msg.contains("320"));
    assert!(msg.contains("256"));
}
