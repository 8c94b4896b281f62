use crate::helper::error_chain_fmt;
use log::SetLoggerError;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// Composes the layers of the `tracing` pipeline used by the binaries and their tests.
///
/// - an `EnvFilter` reading `RUST_LOG`, falling back to `fallback_env_filter` when it is unset
/// - a `JsonStorageLayer` keeping span fields so they are attached to every child event
/// - a `BunyanFormattingLayer` writing bunyan-compatible JSON records to `sink`
///
/// The CLI passes `std::io::stderr` as sink: stdout is reserved for the messages meant for the user.
/// Tests pass `std::io::sink` unless `TEST_LOG` is set.
pub fn get_tracing_subscriber<Sink>(
    name: String,
    fallback_env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    // The sink must be able to build a writer for any lifetime `'a`
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_env_filter));

    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Registers `subscriber` as the global default and redirects `log` records to it.
///
/// Can only succeed once per process.
pub fn try_init_tracing_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

/// Same as [`try_init_tracing_subscriber`], panicking if a global subscriber is already set.
pub fn init_tracing_subscriber(subscriber: impl Subscriber + Send + Sync) {
    if let Err(error) = try_init_tracing_subscriber(subscriber) {
        panic!("Failed to set up tracing: {:?}", error);
    }
}

#[derive(thiserror::Error)]
pub enum TelemetryError {
    #[error("A logger was already set")]
    LoggerAlreadySet(#[from] SetLoggerError),
    #[error("A global tracing subscriber was already set")]
    SubscriberAlreadySet(#[from] SetGlobalDefaultError),
}

impl std::fmt::Debug for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
