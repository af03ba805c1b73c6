//! Global tracing subscriber setup for binaries and tests embedding the
//! engine. The library itself only emits spans and events.

use serde::{Deserialize, Serialize};
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Installs a registry with an `EnvFilter` (`RUST_LOG`, default `info`)
/// and a fmt layer in the chosen format. `log` records are bridged into
/// tracing.
///
/// Fails if a global subscriber is already set; callers may ignore that.
pub fn init_tracing(format: LogFormat) -> Result<(), SetGlobalDefaultError> {
    // Already set when another logger won the race; tracing still works.
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(true).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);
    tracing::subscriber::set_global_default(subscriber)
}
