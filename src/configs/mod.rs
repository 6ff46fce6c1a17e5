use figment::{Figment, providers::{Env, Serialized}};
use serde::{Deserialize, Serialize};

use crate::core::error::LogError;
use crate::loggers::core::LevelInput;

/// Level as it appears in settings: `PINO_LEVEL=warn` or `PINO_LEVEL=40`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    Code(i64),
    Name(String),
}

impl From<LevelSetting> for LevelInput {
    fn from(setting: LevelSetting) -> Self {
        match setting {
            LevelSetting::Code(code) => LevelInput::Code(code),
            LevelSetting::Name(name) => LevelInput::Name(name),
        }
    }
}

/// Logger defaults that can be overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    pub level: LevelSetting,
    pub enabled: bool,
    pub message_key: String,
    pub millidiff: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: LevelSetting::Name("info".to_string()),
            enabled: true,
            message_key: "msg".to_string(),
            millidiff: true,
        }
    }
}

impl LoggerSettings {
    pub const ENV_PREFIX: &'static str = "PINO_";

    /// Defaults merged with `PINO_`-prefixed env vars. Nothing is read from disk.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn from_env() -> Result<Self, LogError> {
        Ok(Self::figment().extract()?)
    }
}
