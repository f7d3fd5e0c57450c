//! Review topic inference: vectorize, infer the topic distribution, pick the arg-max topic and
//! map it to a product category.
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AnalyzeError, InferenceError, LoadError};

pub mod artifact;
pub mod category;
pub(crate) mod special;
pub mod tokenizer;
pub mod topic_model;
pub mod vectorizer;

pub use artifact::{ArtifactStore, JsonArtifactStore};
pub use category::{CategoryMap, UNKNOWN_CATEGORY};
pub use topic_model::{LdaArtifact, LdaModel, TopicDistribution, TopicModel};
pub use vectorizer::{FeatureVector, FittedVectorizer, Vectorizer, VectorizerArtifact};

/// Index of the largest value, ties resolved to the lowest index. NaN never wins over a number.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut best_idx = 0;
    let mut best = *first;
    for (offset, &value) in rest.iter().enumerate() {
        if value > best || (best.is_nan() && !value.is_nan()) {
            best_idx = offset + 1;
            best = value;
        }
    }
    Some(best_idx)
}

/// 1-based display label for a 0-based topic index.
#[must_use]
pub fn topic_label(topic_index: usize) -> String {
    format!("Topic {}", topic_index + 1)
}

/// Outcome of analyzing one review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicPrediction {
    pub topic_index: usize,
    pub topic_label: String,
    pub category: &'static str,
    pub distribution: TopicDistribution,
}

/// Vectorizer, topic model and category table wired together. Immutable once built, so it can be
/// shared across request handlers without locking.
#[derive(Debug, Clone)]
pub struct TopicAnalyzer {
    vectorizer: Arc<dyn Vectorizer>,
    model: Arc<dyn TopicModel>,
    categories: CategoryMap,
}

impl TopicAnalyzer {
    /// # Errors
    /// Returns [`LoadError::DimensionMismatch`] when the two artifacts were not fitted together.
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        model: Arc<dyn TopicModel>,
        categories: CategoryMap,
    ) -> Result<Self, LoadError> {
        if vectorizer.n_features() != model.n_features() {
            return Err(LoadError::DimensionMismatch {
                vectorizer: vectorizer.n_features(),
                model: model.n_features(),
            });
        }
        if model.n_topics() != categories.len() {
            warn!(
                n_topics = model.n_topics(),
                n_categories = categories.len(),
                "topic count differs from category table; unmatched topics resolve to the fallback category"
            );
        }

        Ok(Self {
            vectorizer,
            model,
            categories,
        })
    }

    /// Loads both artifacts and validates them together before anything can be analyzed.
    ///
    /// # Errors
    /// Propagates the first [`LoadError`] from the store or the compatibility check.
    pub fn from_store(store: &dyn ArtifactStore, categories: CategoryMap) -> Result<Self, LoadError> {
        let vectorizer = store.load_vectorizer()?;
        let model = store.load_topic_model()?;
        Self::new(vectorizer, model, categories)
    }

    /// Runs the full pipeline on one review. Any string is accepted, including the empty one.
    ///
    /// # Errors
    /// Returns [`AnalyzeError::Inference`] if the topic model rejects the feature vector.
    pub fn analyze(&self, review: &str) -> Result<TopicPrediction, AnalyzeError> {
        let features = self.vectorizer.transform(review);
        let distribution = self.model.transform(&features)?;
        let topic_index = distribution
            .argmax()
            .ok_or(InferenceError::EmptyDistribution)?;
        let category = self.categories.lookup_index(topic_index);

        debug!(
            review_len = review.len(),
            active_features = features.nonzero().count(),
            topic_index,
            category,
            "topic inference complete"
        );

        Ok(TopicPrediction {
            topic_index,
            topic_label: topic_label(topic_index),
            category,
            distribution,
        })
    }

    /// Boundary entry point for a possibly absent form field. A missing review never reaches the
    /// vectorizer.
    ///
    /// # Errors
    /// Returns [`AnalyzeError::MissingInput`] for `None`, otherwise as [`Self::analyze`].
    pub fn analyze_field(&self, review: Option<&str>) -> Result<TopicPrediction, AnalyzeError> {
        let review = review.ok_or(AnalyzeError::MissingInput)?;
        self.analyze(review)
    }

    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.model.n_topics()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }
}
