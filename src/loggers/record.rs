//! # Record Builder
//!
//! Turns one [`Call`] into a [`LogRecord`], then into a single serialized
//! line on the configured sink.

use chrono::Utc;
use std::sync::{Arc, OnceLock};
use sysinfo::System;

use crate::core::error::LogError;
use crate::loggers::builder::LoggerConfig;
use crate::loggers::core::{LogLevel, LogRecord};
use crate::loggers::fields::{merge, Fields};
use crate::loggers::message::Call;
use crate::loggers::sink::LINE_ENDING;

/// Turns an assembled record object into its JSON text.
pub type Serializer = Arc<dyn Fn(&Fields) -> Result<String, LogError> + Send + Sync>;

/// Compact `serde_json` encoding; string contents are escaped, so the
/// output never contains a raw newline.
pub fn json_serializer() -> Serializer {
    Arc::new(|obj: &Fields| serde_json::to_string(obj).map_err(LogError::from))
}

/// Wall clock in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}

static HOSTNAME: OnceLock<String> = OnceLock::new();

/// Machine host name, resolved on first use and cached for the process.
pub fn hostname() -> &'static str {
    HOSTNAME.get_or_init(|| System::host_name().unwrap_or_else(|| "localhost".to_string()))
}

pub fn pid() -> u32 {
    std::process::id()
}

/// Assembles the record for one call.
///
/// `last` is the previous emission time of the instance; the returned
/// record's `time` becomes the next one when timing is on.
pub fn build_record(
    level: LogLevel,
    call: &Call,
    config: &LoggerConfig,
    last: Option<i64>,
) -> Result<LogRecord, LogError> {
    let ctx = merge(call.fields.as_ref(), Some(&config.bindings));
    let msg = call.message.resolve()?;
    let time = config.clock.now_millis();

    let millidiff = config
        .millidiff
        .then(|| last.map_or(0, |prev| time - prev));

    Ok(LogRecord {
        level,
        time,
        pid: pid(),
        msg,
        hostname: hostname().to_string(),
        ctx,
        millidiff,
    })
}

/// Serializes the record and writes it as one flushed line.
pub fn write_record(record: LogRecord, config: &LoggerConfig) -> Result<(), LogError> {
    let obj = record.into_object(&config.message_key);
    let line = (config.serializer)(&obj)?;
    config.sink.write_str(&line)?;
    config.sink.write_str(LINE_ENDING)?;
    config.sink.flush()?;
    Ok(())
}
