pub mod metrics;
pub mod tracing;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};

use self::metrics::Metrics;
use crate::classification::{TopicPrediction, UNKNOWN_CATEGORY};

pub use self::tracing::init as init_tracing;

/// Service metrics on a private registry.
#[derive(Debug, Clone)]
pub struct Telemetry {
    registry: Arc<Registry>,
    metrics: Arc<Metrics>,
}

impl Telemetry {
    /// # Errors
    /// Returns an error when the collectors cannot be registered.
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(Metrics::new(&registry)?);
        Ok(Self { registry, metrics })
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn record_model_loaded(&self, n_topics: usize) {
        self.metrics.model_topics.set(n_topics as f64);
    }

    pub fn record_analysis(&self, prediction: &TopicPrediction, elapsed: Duration) {
        self.metrics.analyses.inc();
        self.metrics
            .analysis_duration
            .observe(elapsed.as_secs_f64());
        if prediction.category == UNKNOWN_CATEGORY {
            self.metrics.unknown_category.inc();
            ::tracing::warn!(
                topic_index = prediction.topic_index,
                "topic has no category entry"
            );
        }
    }

    pub fn record_analysis_failure(&self) {
        self.metrics.analysis_failures.inc();
    }

    pub fn record_missing_input(&self) {
        self.metrics.missing_input.inc();
    }

    pub fn record_ready_probe(&self) {
        ::tracing::debug!("service ready probe");
    }

    pub fn record_live_probe(&self) {
        ::tracing::debug!("service live probe");
    }

    /// Renders the registry in the Prometheus text exposition format.
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
            ::tracing::error!(error = %error, "failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
