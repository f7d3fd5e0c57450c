use std::sync::Arc;

use tracing::info;

use crate::classification::{CategoryMap, JsonArtifactStore, TopicAnalyzer};
use crate::config::Config;
use crate::error::AppError;
use crate::observability::Telemetry;

/// Shared, read-only request state.
#[derive(Debug, Clone)]
pub struct AppState {
    analyzer: Arc<TopicAnalyzer>,
    telemetry: Telemetry,
}

impl AppState {
    #[must_use]
    pub fn new(analyzer: Arc<TopicAnalyzer>, telemetry: Telemetry) -> Self {
        telemetry.record_model_loaded(analyzer.n_topics());
        Self {
            analyzer,
            telemetry,
        }
    }

    /// Loads both artifacts from the configured paths. Nothing is served until this succeeds.
    ///
    /// # Errors
    /// Returns [`AppError::Load`] for unreadable or incompatible artifacts and
    /// [`AppError::Telemetry`] when the metrics registry cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let store = JsonArtifactStore::new(config.vectorizer_path(), config.model_path());
        let analyzer = TopicAnalyzer::from_store(&store, CategoryMap::default_catalog())?;
        info!(
            n_topics = analyzer.n_topics(),
            n_features = analyzer.n_features(),
            "topic analyzer ready"
        );

        let telemetry = Telemetry::new().map_err(|e| AppError::Telemetry(format!("{e:#}")))?;
        Ok(Self::new(Arc::new(analyzer), telemetry))
    }

    #[must_use]
    pub fn analyzer(&self) -> &TopicAnalyzer {
        &self.analyzer
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }
}
