use arc_swap::ArcSwap;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::configs::LoggerSettings;
use crate::core::error::LogError;
use crate::loggers::child::ChildBuilder;
use crate::loggers::core::{LevelInput, LogLevel, check_message_key, require_level};
use crate::loggers::dispatch::{Dispatch, DispatchTable, LoggerState};
use crate::loggers::fields::Fields;
use crate::loggers::message::Call;
use crate::loggers::record::{self, Clock, Serializer, SystemClock, json_serializer};
use crate::loggers::sink::{LogSink, StdoutSink};

/// Process-unique identity of a logger, used as the parent lineage tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoggerId(u64);

impl LoggerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        LoggerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Immutable configuration snapshot. Changing the level swaps in a new
/// snapshot rather than editing this one.
#[derive(Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub sink: Arc<dyn LogSink>,
    pub enabled: bool,
    pub bindings: Fields,
    pub message_key: String,
    pub millidiff: bool,
    pub parent: Option<LoggerId>,
    pub serializer: Serializer,
    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("level", &self.level)
            .field("enabled", &self.enabled)
            .field("bindings", &self.bindings)
            .field("message_key", &self.message_key)
            .field("millidiff", &self.millidiff)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Structured JSON logger.
///
/// Every severity method runs the whole pipeline (merge, build, serialize,
/// write, flush) on the calling thread before returning. The last emission
/// time lives in a `Cell`, so a `Logger` can be moved to another thread but
/// not shared between threads; give each thread its own instance or child.
pub struct Logger {
    id: LoggerId,
    config: ArcSwap<LoggerConfig>,
    table: Cell<DispatchTable>,
    last_timestamp: Cell<Option<i64>>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// A logger whose every severity is a permanent no-op.
    pub fn disabled() -> Self {
        Self::from_config(LoggerConfig {
            enabled: false,
            ..LoggerBuilder::new().into_config(LogLevel::Info)
        })
    }

    fn from_config(config: LoggerConfig) -> Self {
        let table = DispatchTable::derive(config.enabled, config.level);
        Self {
            id: LoggerId::next(),
            config: ArcSwap::from_pointee(config),
            table: Cell::new(table),
            last_timestamp: Cell::new(None),
        }
    }

    pub fn debug(&self, call: impl Into<Call>) -> Result<(), LogError> {
        self.log(LogLevel::Debug, call)
    }

    pub fn info(&self, call: impl Into<Call>) -> Result<(), LogError> {
        self.log(LogLevel::Info, call)
    }

    pub fn warn(&self, call: impl Into<Call>) -> Result<(), LogError> {
        self.log(LogLevel::Warn, call)
    }

    pub fn error(&self, call: impl Into<Call>) -> Result<(), LogError> {
        self.log(LogLevel::Error, call)
    }

    pub fn critical(&self, call: impl Into<Call>) -> Result<(), LogError> {
        self.log(LogLevel::Critical, call)
    }

    /// Routes a call through the dispatch table. A no-op slot returns
    /// `Ok(())` without touching the sink or resolving the message.
    pub fn log(&self, level: LogLevel, call: impl Into<Call>) -> Result<(), LogError> {
        match self.table.get().get(level) {
            Dispatch::Noop => Ok(()),
            Dispatch::Active => self.emit(level, &call.into()),
        }
    }

    fn emit(&self, level: LogLevel, call: &Call) -> Result<(), LogError> {
        let cfg = self.config.load();
        let rec = record::build_record(level, call, &cfg, self.last_timestamp.get())?;
        if cfg.millidiff {
            self.last_timestamp.set(Some(rec.time));
        }
        record::write_record(rec, &cfg)
    }

    /// Replaces the threshold and rebuilds the whole dispatch table.
    /// An unknown level leaves the logger untouched.
    pub fn set_level(&self, level: impl Into<LevelInput>) -> Result<(), LogError> {
        let level = require_level(level)?;
        let current = self.config.load_full();
        let next = LoggerConfig { level, ..LoggerConfig::clone(&current) };
        self.table.set(DispatchTable::derive(next.enabled, next.level));
        self.config.store(Arc::new(next));
        Ok(())
    }

    /// Name of the current threshold, e.g. `"info"`.
    pub fn level(&self) -> &'static str {
        self.config.load().level.name()
    }

    pub fn log_level(&self) -> LogLevel {
        self.config.load().level
    }

    pub fn state(&self) -> LoggerState {
        let cfg = self.config.load();
        if cfg.enabled {
            LoggerState::Enabled(cfg.level)
        } else {
            LoggerState::Disabled
        }
    }

    pub fn dispatch_table(&self) -> DispatchTable {
        self.table.get()
    }

    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        self.table.get().get(level) == Dispatch::Active
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<LoggerConfig> {
        self.config.load_full()
    }

    pub fn bindings(&self) -> Fields {
        self.config.load().bindings.clone()
    }

    pub fn message_key(&self) -> String {
        self.config.load().message_key.clone()
    }

    pub fn id(&self) -> LoggerId {
        self.id
    }

    pub fn parent(&self) -> Option<LoggerId> {
        self.config.load().parent
    }

    /// Time of the last timed emission, if any.
    pub fn last_timestamp(&self) -> Option<i64> {
        self.last_timestamp.get()
    }

    /// Child with `fields` merged over this logger's bindings and every
    /// other setting inherited.
    pub fn child(&self, fields: Fields) -> Logger {
        let child = Self::from_config(self.child_config(fields));
        child.last_timestamp.set(self.last_timestamp.get());
        child
    }

    /// Child with selective overrides; see [`ChildBuilder`].
    pub fn child_builder(&self, fields: Fields) -> ChildBuilder<'_> {
        ChildBuilder::new(self, fields)
    }

    pub(crate) fn child_config(&self, fields: Fields) -> LoggerConfig {
        let cfg = self.config.load();
        LoggerConfig {
            bindings: crate::loggers::fields::merge(Some(&fields), Some(&cfg.bindings)),
            parent: Some(self.id),
            ..LoggerConfig::clone(&cfg)
        }
    }

    pub(crate) fn with_last_timestamp(self, last: Option<i64>) -> Self {
        self.last_timestamp.set(last);
        self
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.id)
            .field("config", &*self.config.load())
            .field("last_timestamp", &self.last_timestamp.get())
            .finish()
    }
}

pub struct LoggerBuilder {
    bindings: Fields,
    level: LevelInput,
    sink: Arc<dyn LogSink>,
    enabled: bool,
    parent: Option<LoggerId>,
    millidiff: bool,
    message_key: String,
    serializer: Serializer,
    clock: Arc<dyn Clock>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            bindings: Fields::new(),
            level: LevelInput::Level(LogLevel::Info),
            sink: Arc::new(StdoutSink),
            enabled: true,
            parent: None,
            millidiff: true,
            message_key: "msg".to_string(),
            serializer: json_serializer(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Starts from environment-derived [`LoggerSettings`].
    pub fn from_settings(settings: &LoggerSettings) -> Self {
        Self::new()
            .with_level(settings.level.clone())
            .enabled(settings.enabled)
            .with_message_key(settings.message_key.clone())
            .with_millidiff(settings.millidiff)
    }

    pub fn with_bindings(mut self, bindings: Fields) -> Self {
        self.bindings = bindings;
        self
    }

    /// Accepts a level, a numeric code or a name; checked in [`build`](Self::build).
    pub fn with_level(mut self, level: impl Into<LevelInput>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_sink(self, sink: impl LogSink + 'static) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    pub fn with_shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_parent(mut self, parent: LoggerId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_millidiff(mut self, millidiff: bool) -> Self {
        self.millidiff = millidiff;
        self
    }

    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = key.into();
        self
    }

    pub fn with_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Fields) -> Result<String, LogError> + Send + Sync + 'static,
    {
        self.serializer = Arc::new(serializer);
        self
    }

    pub fn with_shared_serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Fails with [`LogError::UnknownLevel`] when the level does not resolve,
    /// and with [`LogError::ConfigError`] when the message key names a fixed
    /// record key (`millidiff` only counts while timing is on).
    pub fn build(self) -> Result<Logger, LogError> {
        let level = require_level(self.level.clone())?;
        check_message_key(&self.message_key, self.millidiff)?;
        Ok(Logger::from_config(self.into_config(level)))
    }

    fn into_config(self, level: LogLevel) -> LoggerConfig {
        LoggerConfig {
            level,
            sink: self.sink,
            enabled: self.enabled,
            bindings: self.bindings,
            message_key: self.message_key,
            millidiff: self.millidiff,
            parent: self.parent,
            serializer: self.serializer,
            clock: self.clock,
        }
    }

    /// Pre-filled from an existing snapshot; used for child derivation.
    pub(crate) fn from_config(cfg: LoggerConfig) -> Self {
        Self {
            bindings: cfg.bindings,
            level: LevelInput::Level(cfg.level),
            sink: cfg.sink,
            enabled: cfg.enabled,
            parent: cfg.parent,
            millidiff: cfg.millidiff,
            message_key: cfg.message_key,
            serializer: cfg.serializer,
            clock: cfg.clock,
        }
    }
}
