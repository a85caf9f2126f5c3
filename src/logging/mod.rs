//! Tracing setup for embedders that do not install their own subscriber.

mod log_level;

pub use log_level::{LogLevel, UnknownLogLevelError};

/// Installs a compact, timestamp-free fmt subscriber at `level`.
///
/// Does nothing for [`LogLevel::Silent`] or when a global subscriber is already set.
pub fn setup_tracing(level: LogLevel) {
    if let Some(level) = level.to_tracing_level() {
        let installed = tracing_subscriber::fmt()
            .with_max_level(level)
            .without_time()
            .compact()
            .try_init();
        if installed.is_err() {
            tracing::debug!("A tracing subscriber is already installed, keeping it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_tracing_twice_keeps_first_subscriber() {
        setup_tracing(LogLevel::Silent);
        setup_tracing(LogLevel::Debug);
        setup_tracing(LogLevel::Warn);
        tracing::debug!("still logging after repeated setup");
    }
}
