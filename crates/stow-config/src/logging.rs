//! Centralized logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over all)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// Returns `false` when a global subscriber was already installed.
///
/// ```bash
/// # Follow every directory the resolver creates
/// RUST_LOG=stow_placement=debug my-host-tool
/// ```
pub fn initialize(config: &AppConfig) -> bool {
    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);

    // RUST_LOG takes precedence over config
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let format = format_override(std::env::var("LOG_FORMAT").ok().as_deref())
        .unwrap_or_else(|| config.logging.format.clone());

    // Always stderr: stdout belongs to the host
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.is_ok()
}

fn format_override(value: Option<&str>) -> Option<LogFormat> {
    match value?.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

/// Span wrapping one placement so nested events carry the target path
pub fn placement_span(target: &str) -> tracing::Span {
    tracing::info_span!("placement", target = %target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_override() {
        assert_eq!(format_override(Some("JSON")), Some(LogFormat::Json));
        assert_eq!(format_override(Some("human")), Some(LogFormat::Pretty));
        assert_eq!(format_override(Some("xml")), None);
        assert_eq!(format_override(None), None);
    }

    #[test]
    fn test_initialize_twice_reports_existing_subscriber() {
        let config = AppConfig::default();
        initialize(&config);
        assert!(!initialize(&config));
    }
}
