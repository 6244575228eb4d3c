//! Structured logging built on tracing

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{ObservabilityError, Result};

/// Log manager
#[derive(Debug)]
pub struct LogManager;

impl LogManager {
    /// Install the global subscriber, writing to stderr
    ///
    /// Fails with [`ObservabilityError::Init`] when another subscriber is
    /// already installed.
    pub fn init(config: &LoggingConfig) -> Result<()> {
        let filter = build_filter(config)?;
        let registry = tracing_subscriber::registry().with(filter);

        let installed = if config.json_format {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(config.include_target)
                .with_line_number(config.include_line_number)
                .with_ansi(false);
            registry.with(layer).try_init()
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.include_target)
                .with_line_number(config.include_line_number)
                .with_ansi(config.ansi_colors);
            registry.with(layer).try_init()
        };
        installed.map_err(|e| ObservabilityError::init(e.to_string()))?;

        tracing::debug!(
            target: "gigacheck_observability",
            "Log manager initialized with level: {}",
            config.level
        );

        Ok(())
    }
}

/// Build the env filter from the base level plus module overrides
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ObservabilityError::logging(format!("Invalid log level: {}", e)))?;

    for (module, level) in &config.module_levels {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| ObservabilityError::logging(format!("Invalid directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Span around one HTTP request
pub fn create_request_span(request_id: &str, method: &str, url: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        url = %url,
    )
}

/// Span around one scenario case
pub fn create_scenario_span(scenario_id: &str) -> tracing::Span {
    tracing::info_span!("scenario", id = %scenario_id)
}

/// Span around a whole suite run
pub fn create_session_span(base_url: &str) -> tracing::Span {
    tracing::info_span!("session", base_url = %base_url)
}
