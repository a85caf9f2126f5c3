use std::str::FromStr;

use derive_more::Display;
use snafu::Snafu;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum LogLevel {
    #[display("debug")]
    Debug,
    #[display("info")]
    Info,
    #[default]
    #[display("warn")]
    Warn,
    #[display("error")]
    Error,
    #[display("silent")]
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

impl FromStr for LogLevel {
    type Err = UnknownLogLevelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" | "off" => Ok(LogLevel::Silent),
            _ => Err(UnknownLogLevelError {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown log level '{}'", value))]
pub struct UnknownLogLevelError {
    value: String,
}
