//! Configuration types for the logging subsystem.

use tracing_subscriber::fmt::format::FmtSpan;

/// Configuration for the stderr logging layer
#[derive(Debug, Clone)]
pub struct StdoutConfig {
    /// Use JSON format instead of compact format
    pub json_format: bool,
    /// Span events to log (ENTER, EXIT, CLOSE, etc.)
    pub fmt_span: FmtSpan,
}

impl Default for StdoutConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            fmt_span: FmtSpan::NONE,
        }
    }
}

/// Main logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Name reported in the startup event
    pub service_name: String,
    pub stdout_config: StdoutConfig,
}

impl LoggerConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            stdout_config: StdoutConfig::default(),
        }
    }

    pub fn with_json_logging(mut self, json_format: bool) -> Self {
        self.stdout_config.json_format = json_format;
        self
    }

    pub fn with_span_events(mut self, fmt_span: FmtSpan) -> Self {
        self.stdout_config.fmt_span = fmt_span;
        self
    }
}
