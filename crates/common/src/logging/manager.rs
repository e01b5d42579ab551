//! Logging initialization.

use std::io;

use tracing::*;
use tracing_subscriber::{
    fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::types::LoggerConfig;

/// Builds the filter used by [`init`]: `INFO` unless overridden through `RUST_LOG`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy()
}

/// Initializes the logging subsystem with the provided config.
///
/// Events go to stderr so command output on stdout stays machine readable.
pub fn init(config: LoggerConfig) {
    let filt = env_filter();

    let stderr_sub = if config.stdout_config.json_format {
        layer()
            .json()
            .with_writer(io::stderr)
            .with_span_events(config.stdout_config.fmt_span)
            .with_filter(filt)
            .boxed()
    } else {
        layer()
            .compact()
            .with_writer(io::stderr)
            .with_span_events(config.stdout_config.fmt_span)
            .with_filter(filt)
            .boxed()
    };

    tracing_subscriber::registry().with(stderr_sub).init();

    debug!(service_name = %config.service_name, "logging initialized");
}
