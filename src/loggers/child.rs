//! # Child Factory
//!
//! A child starts from its parent's current snapshot: bindings are merged
//! (child keys win), everything else is copied unless overridden, and the
//! parent's last emission time carries over so `millidiff` stays continuous
//! across the hierarchy. The parent link is an id, never a reference, so no
//! field is ever looked up through it at emission time.

use std::sync::Arc;

use crate::core::error::LogError;
use crate::loggers::builder::{Logger, LoggerBuilder};
use crate::loggers::core::LevelInput;
use crate::loggers::fields::Fields;
use crate::loggers::record::{Clock, Serializer};
use crate::loggers::sink::LogSink;

pub struct ChildBuilder<'a> {
    parent: &'a Logger,
    builder: LoggerBuilder,
}

impl<'a> ChildBuilder<'a> {
    pub(crate) fn new(parent: &'a Logger, fields: Fields) -> Self {
        Self {
            builder: LoggerBuilder::from_config(parent.child_config(fields)),
            parent,
        }
    }

    pub fn with_level(mut self, level: impl Into<LevelInput>) -> Self {
        self.builder = self.builder.with_level(level);
        self
    }

    /// A disabled parent yields a disabled child unless this is set to `true`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.builder = self.builder.enabled(enabled);
        self
    }

    pub fn with_millidiff(mut self, millidiff: bool) -> Self {
        self.builder = self.builder.with_millidiff(millidiff);
        self
    }

    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.builder = self.builder.with_message_key(key);
        self
    }

    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.builder = self.builder.with_sink(sink);
        self
    }

    pub fn with_shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.builder = self.builder.with_shared_sink(sink);
        self
    }

    pub fn with_shared_serializer(mut self, serializer: Serializer) -> Self {
        self.builder = self.builder.with_shared_serializer(serializer);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.builder = self.builder.with_clock(clock);
        self
    }

    /// Fails only when an overridden level does not resolve.
    pub fn build(self) -> Result<Logger, LogError> {
        let last = self.parent.last_timestamp();
        Ok(self.builder.build()?.with_last_timestamp(last))
    }
}
