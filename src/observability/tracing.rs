use anyhow::{Error, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber once.
///
/// Emits flattened JSON events unless `RUST_LOG_FORMAT` is set to something other than `json`.
/// Filtering follows `RUST_LOG`, defaulting to `info`.
///
/// # Errors
/// Returns an error when another global subscriber is already installed.
pub fn init() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = if use_json_format() {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true),
                )
                .try_init()
        } else {
            registry.with(fmt::layer().with_target(false)).try_init()
        };
        result.map_err(|e: tracing_subscriber::util::TryInitError| Error::msg(e.to_string()))
    })?;
    Ok(())
}

fn use_json_format() -> bool {
    std::env::var("RUST_LOG_FORMAT").map_or(true, |format| format == "json")
}
