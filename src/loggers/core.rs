use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::LogError;
use crate::loggers::fields::Fields;

/// Severity catalog. Discriminants are the numeric weights written to the
/// `level` key of every record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 20,
    Info = 30,
    Warn = 40,
    Error = 50,
    Critical = 60,
}

impl LogLevel {
    /// Every level, ascending by weight.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub const fn weight(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Position of the level inside [`LogLevel::ALL`].
    pub(crate) const fn index(self) -> usize {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warn => 2,
            LogLevel::Error => 3,
            LogLevel::Critical => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<LogLevel> {
        Self::ALL.into_iter().find(|l| i64::from(l.weight()) == code)
    }

    /// Case-sensitive lookup: `"info"` resolves, `"INFO"` does not.
    pub fn from_name(name: &str) -> Option<LogLevel> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::from_name(s).ok_or_else(|| LogError::UnknownLevel(s.to_string()))
    }
}

/// Anything a caller may hand in where a level is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelInput {
    Level(LogLevel),
    Code(i64),
    Name(String),
}

impl From<LogLevel> for LevelInput {
    fn from(level: LogLevel) -> Self {
        LevelInput::Level(level)
    }
}

impl From<i64> for LevelInput {
    fn from(code: i64) -> Self {
        LevelInput::Code(code)
    }
}

impl From<i32> for LevelInput {
    fn from(code: i32) -> Self {
        LevelInput::Code(i64::from(code))
    }
}

impl From<u8> for LevelInput {
    fn from(code: u8) -> Self {
        LevelInput::Code(i64::from(code))
    }
}

impl From<&str> for LevelInput {
    fn from(name: &str) -> Self {
        LevelInput::Name(name.to_string())
    }
}

impl From<String> for LevelInput {
    fn from(name: String) -> Self {
        LevelInput::Name(name)
    }
}

impl fmt::Display for LevelInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelInput::Level(level) => write!(f, "{level}"),
            LevelInput::Code(code) => write!(f, "{code}"),
            LevelInput::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// Looks a level up by identity, numeric code or name. No fallback: an
/// unrecognized input is `None`.
pub fn resolve_level(input: impl Into<LevelInput>) -> Option<LogLevel> {
    match input.into() {
        LevelInput::Level(level) => Some(level),
        LevelInput::Code(code) => LogLevel::from_code(code),
        LevelInput::Name(name) => LogLevel::from_name(&name),
    }
}

/// Like [`resolve_level`] but turns a miss into [`LogError::UnknownLevel`].
pub fn require_level(input: impl Into<LevelInput>) -> Result<LogLevel, LogError> {
    let input = input.into();
    let shown = input.to_string();
    resolve_level(input).ok_or(LogError::UnknownLevel(shown))
}

/// Keys every record carries regardless of configuration.
pub const FIXED_KEYS: [&str; 4] = ["level", "time", "pid", "hostname"];
pub const MILLIDIFF_KEY: &str = "millidiff";

/// Rejects a message key that would overwrite one of the fixed keys.
pub fn check_message_key(key: &str, millidiff: bool) -> Result<(), LogError> {
    if FIXED_KEYS.contains(&key) || (millidiff && key == MILLIDIFF_KEY) {
        return Err(LogError::ConfigError(format!(
            "message key {key:?} collides with a fixed record key"
        )));
    }
    Ok(())
}

/// One emitted log line before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub pid: u32,
    pub msg: String,
    pub hostname: String,
    pub ctx: Fields,
    pub millidiff: Option<i64>,
}

impl LogRecord {
    /// Flattens the record into the JSON object that gets serialized.
    ///
    /// Context fields go in first so that `level`, `time`, `pid`, `hostname`
    /// and the message key always carry the real values.
    pub fn into_object(self, message_key: &str) -> Fields {
        let mut obj = self.ctx;
        obj.insert("level".into(), self.level.weight().into());
        obj.insert("time".into(), self.time.into());
        obj.insert("pid".into(), self.pid.into());
        obj.insert(message_key.to_string(), self.msg.into());
        obj.insert("hostname".into(), self.hostname.into());
        if let Some(delta) = self.millidiff {
            obj.insert(MILLIDIFF_KEY.into(), delta.into());
        }
        obj
    }
}
