/// Prometheus metric definitions.
use std::sync::Arc;

use prometheus::{
    Counter, Gauge, Histogram, Registry, register_counter_with_registry,
    register_gauge_with_registry, register_histogram_with_registry,
};

const ANALYSIS_DURATION_BUCKETS: [f64; 10] = [
    0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

#[derive(Debug, Clone)]
pub struct Metrics {
    pub analyses: Counter,
    pub analysis_failures: Counter,
    pub missing_input: Counter,
    pub unknown_category: Counter,

    pub analysis_duration: Histogram,

    pub model_topics: Gauge,
}

impl Metrics {
    /// Registers every collector on `registry`.
    ///
    /// # Errors
    /// Fails when a metric with the same name is already registered.
    pub fn new(registry: &Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            analyses: register_counter_with_registry!(
                "review_topics_analyses_total",
                "Total number of reviews analyzed",
                registry
            )?,
            analysis_failures: register_counter_with_registry!(
                "review_topics_analysis_failures_total",
                "Number of analyses that failed during inference",
                registry
            )?,
            missing_input: register_counter_with_registry!(
                "review_topics_missing_input_total",
                "Number of requests rejected for a missing review field",
                registry
            )?,
            unknown_category: register_counter_with_registry!(
                "review_topics_unknown_category_total",
                "Number of analyses whose topic had no category entry",
                registry
            )?,
            analysis_duration: register_histogram_with_registry!(
                "review_topics_analysis_duration_seconds",
                "Time spent vectorizing and inferring topics for one review",
                ANALYSIS_DURATION_BUCKETS.to_vec(),
                registry
            )?,
            model_topics: register_gauge_with_registry!(
                "review_topics_model_topics",
                "Number of topics in the loaded model",
                registry
            )?,
        })
    }
}
