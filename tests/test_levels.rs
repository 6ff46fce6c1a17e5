//! # Level Registry Test Suite

use pino_ng::core::error::LogError;
use pino_ng::loggers::core::{LevelInput, require_level};
use pino_ng::loggers::{LogLevel, Logger, resolve_level};

#[test]
fn catalog_is_ordered_and_unique() {
    let weights: Vec<u8> = LogLevel::ALL.iter().map(|l| l.weight()).collect();
    let names: Vec<&str> = LogLevel::ALL.iter().map(|l| l.name()).collect();

    assert_eq!(weights, vec![20, 30, 40, 50, 60]);
    assert_eq!(names, vec!["debug", "info", "warn", "error", "critical"]);
    assert!(LogLevel::ALL.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn resolve_by_identity_code_and_name() {
    assert_eq!(resolve_level(LogLevel::Warn), Some(LogLevel::Warn));
    assert_eq!(resolve_level(60), Some(LogLevel::Critical));
    assert_eq!(resolve_level("debug"), Some(LogLevel::Debug));
    assert_eq!(resolve_level(String::from("error")), Some(LogLevel::Error));
}

#[test]
fn resolve_has_no_fallback() {
    assert_eq!(resolve_level("trace"), None);
    assert_eq!(resolve_level("INFO"), None);
    assert_eq!(resolve_level(25), None);
    assert_eq!(resolve_level(LevelInput::Code(-30)), None);

    assert_eq!(require_level(10), Err(LogError::UnknownLevel("10".into())));
}

#[test]
fn from_str_and_display_agree() {
    for level in LogLevel::ALL {
        assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
    }
    assert!("fatal".parse::<LogLevel>().is_err());
}

#[test]
fn serde_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&LogLevel::Critical).unwrap(), "\"critical\"");
    let parsed: LogLevel = serde_json::from_str("\"warn\"").unwrap();
    assert_eq!(parsed, LogLevel::Warn);
}

#[test]
fn unknown_level_at_construction_fails() {
    let res = Logger::builder().with_level("trace").build();
    assert!(matches!(res, Err(LogError::UnknownLevel(_))));

    let by_code = Logger::builder().with_level(70).build();
    assert!(matches!(by_code, Err(LogError::UnknownLevel(_))));
}

#[test]
fn default_level_is_info() {
    let logger = Logger::builder().build().unwrap();
    assert_eq!(logger.level(), "info");
    assert!(!logger.is_enabled_for(LogLevel::Debug));
    assert!(logger.is_enabled_for(LogLevel::Info));
}
