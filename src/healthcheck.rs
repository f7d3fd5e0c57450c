use std::time::Duration;

use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum HealthcheckError {
    #[error("failed to read configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("health endpoint returned status: {0}")]
    Status(reqwest::StatusCode),
}

/// Probe the liveness endpoint on the port the service is configured to bind.
///
/// # Errors
/// Returns [`HealthcheckError`] when the configuration is invalid or the probe does not succeed.
pub async fn healthcheck() -> Result<(), HealthcheckError> {
    let config = Config::from_env()?;
    healthcheck_with_port(config.http_bind().port()).await
}

/// Probe `GET /health/live` on `127.0.0.1:{port}` with a 2s timeout.
///
/// # Errors
/// Returns [`HealthcheckError`] on connection failure, timeout or a non-2xx status.
pub async fn healthcheck_with_port(port: u16) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(HealthcheckError::Client)?;

    let url = format!("http://127.0.0.1:{port}/health/live");

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(HealthcheckError::Request)?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(HealthcheckError::Status(resp.status()))
    }
}
