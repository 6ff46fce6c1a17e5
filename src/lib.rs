//! # pino_ng
//!
//! Structured JSON logging core: one JSON object per call, child loggers
//! with merged context fields, per-instance level gating and optional
//! `millidiff` timing between emissions.

pub mod core;
pub mod configs;
pub mod loggers;

pub use crate::core::error::LogError;
pub use crate::configs::LoggerSettings;
pub use crate::loggers::{Call, Fields, LogLevel, Logger, LoggerBuilder};
