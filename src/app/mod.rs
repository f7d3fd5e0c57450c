mod router;
pub mod server;
mod state;

pub use router::build_router;
pub use state::AppState;

use crate::config::Config;
use crate::error::AppError;

/// Loads the model, then serves until a shutdown signal arrives.
///
/// # Errors
/// Any [`AppError`] from artifact loading, binding or serving.
pub async fn run(config: Config) -> Result<(), AppError> {
    let state = AppState::from_config(&config)?;
    let router = build_router(state, config.body_limit_bytes());
    server::serve(router, config.http_bind()).await
}
