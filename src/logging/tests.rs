//! Tests for the logging system

use super::*;
use tempfile::TempDir;

#[test]
fn test_log_level_display() {
    assert_eq!(LogLevel::Trace.to_string(), "trace");
    assert_eq!(LogLevel::Debug.to_string(), "debug");
    assert_eq!(LogLevel::Info.to_string(), "info");
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Error.to_string(), "error");
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, LogLevel::Info);
    assert_eq!(config.format, LogFormat::Text);
    assert_eq!(config.output, LogOutput::Console);
    assert!(config.include_target);
    assert!(!config.include_thread_id);
    assert!(!config.include_file_info);
}

#[test]
fn test_logging_config_builder() {
    let config = LoggingConfig::new()
        .with_level(LogLevel::Debug)
        .with_format(LogFormat::Json)
        .with_output(LogOutput::File)
        .with_module_level("preview_broker::media", LogLevel::Trace);

    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.output, LogOutput::File);
    assert_eq!(
        config.module_levels.get("preview_broker::media"),
        Some(&LogLevel::Trace)
    );
}

#[test]
fn test_logging_config_presets() {
    let dev = LoggingConfig::development();
    assert_eq!(dev.level, LogLevel::Debug);
    assert_eq!(dev.output, LogOutput::Console);
    assert!(dev.include_file_info);

    let prod = LoggingConfig::production();
    assert_eq!(prod.format, LogFormat::Json);
    assert_eq!(prod.output, LogOutput::Both);
    assert!(prod.log_directory.is_some());
}

#[test]
fn test_filter_directives() {
    let config = LoggingConfig::new()
        .with_level(LogLevel::Warn)
        .with_module_level("tower_http", LogLevel::Debug)
        .with_module_level("preview_broker::token", LogLevel::Trace);

    assert_eq!(
        config.filter_directives(),
        "warn,preview_broker::token=trace,tower_http=debug"
    );
}

#[test]
fn test_config_deserializes_partially() {
    let config: LoggingConfig =
        serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.output, LogOutput::Console);
    assert_eq!(config.rotation, RotationStrategy::Daily);
}

#[test]
fn test_log_directory_created() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("nested").join("logs");
    let config = LoggingConfig::new().with_log_directory(dir.clone());

    let resolved = LoggingSystem::resolve_log_directory(&config).unwrap();
    assert_eq!(resolved, dir);
    assert!(dir.is_dir());
}

#[test]
fn test_second_global_init_reported() {
    init_basic_logging(LogLevel::Info);
    // Already installed; reports on stderr instead of panicking
    init_basic_logging(LogLevel::Debug);

    let result = LoggingSystem::init(LoggingConfig::new());
    assert!(matches!(result, Err(LoggingError::InitializationError(_))));
}
