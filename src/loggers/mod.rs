// src/loggers/mod.rs

pub mod builder;
pub mod child;
pub mod core;
pub mod dispatch;
pub mod fields;
pub mod format;
pub mod message;
pub mod record;
pub mod sink;

pub use self::builder::{Logger, LoggerBuilder, LoggerConfig, LoggerId};
pub use self::child::ChildBuilder;
pub use self::core::{LevelInput, LogLevel, LogRecord, resolve_level};
pub use self::dispatch::{Dispatch, DispatchTable, LoggerState};
pub use self::fields::{Fields, merge};
pub use self::message::{Call, Message};
pub use self::sink::{LogSink, MemorySink, StderrSink, StdoutSink, WriterSink};

use serde::Serialize;
use serde_json::Value;

use crate::core::error::LogError;

/// Backs the logging macros: converts the captured arguments and forwards
/// to [`Logger::log`]. Conversion failures are returned, not nulled out.
#[doc(hidden)]
pub fn emit_from_macro(
    logger: &Logger,
    level: LogLevel,
    template: impl Into<String>,
    args: Vec<Result<Value, LogError>>,
    ctx: Vec<(String, Result<Value, LogError>)>,
) -> Result<(), LogError> {
    let args = args.into_iter().collect::<Result<Vec<_>, _>>()?;
    let mut fields = Fields::new();
    for (k, v) in ctx {
        fields.insert(k, v?);
    }
    let call = Call::positional(template, args);
    let call = if fields.is_empty() { call } else { call.with_fields(fields) };
    logger.log(level, call)
}

#[doc(hidden)]
pub fn macro_value<T: Serialize>(value: T) -> Result<Value, LogError> {
    serde_json::to_value(value).map_err(LogError::from)
}

#[macro_export]
macro_rules! log_base {
    // Positional template arguments in brackets, then kv pairs
    ($logger:expr, $level:expr, $tmpl:expr, [ $( $arg:expr ),* $(,)? ] $(, $k:expr => $v:expr )* $(,)? ) => {
        {
            let logger: &$crate::loggers::Logger = &$logger;
            let level: $crate::loggers::LogLevel = $level;
            // Skip argument conversion entirely for gated-off levels
            if !logger.is_enabled_for(level) {
                ::std::result::Result::<(), $crate::LogError>::Ok(())
            } else {
                $crate::loggers::emit_from_macro(
                    logger,
                    level,
                    $tmpl,
                    ::std::vec![ $( $crate::loggers::macro_value($arg) ),* ],
                    ::std::vec![ $( (::std::string::ToString::to_string(&$k), $crate::loggers::macro_value($v)) ),* ],
                )
            }
        }
    };
    // Plain message with kv pairs (zero or more)
    ($logger:expr, $level:expr, $msg:expr $(, $k:expr => $v:expr )* $(,)? ) => {
        $crate::log_base!($logger, $level, $msg, [] $(, $k => $v )* )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_base!($logger, $crate::loggers::LogLevel::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_base!($logger, $crate::loggers::LogLevel::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_base!($logger, $crate::loggers::LogLevel::Warn, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_base!($logger, $crate::loggers::LogLevel::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_base!($logger, $crate::loggers::LogLevel::Critical, $($rest)+)
    };
}
