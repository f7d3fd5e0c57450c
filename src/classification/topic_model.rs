//! Fitted LDA topic model: variational inference of a document's topic distribution.
use std::fmt;

use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::argmax;
use super::special::digamma;
use super::vectorizer::FeatureVector;
use crate::error::InferenceError;

const DEFAULT_MAX_DOC_UPDATE_ITER: usize = 100;
const DEFAULT_MEAN_CHANGE_TOL: f64 = 1e-3;

/// Probability of each topic for one document; sums to ~1.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TopicDistribution(Vec<f64>);

impl TopicDistribution {
    #[must_use]
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self(probabilities)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First-occurrence arg-max; `None` only for an empty distribution.
    #[must_use]
    pub fn argmax(&self) -> Option<usize> {
        argmax(&self.0)
    }
}

/// Feature vector to topic distribution capability.
pub trait TopicModel: Send + Sync + fmt::Debug {
    /// # Errors
    /// Fails when `features` does not have [`TopicModel::n_features`] columns.
    fn transform(&self, features: &FeatureVector) -> Result<TopicDistribution, InferenceError>;

    fn n_features(&self) -> usize;

    fn n_topics(&self) -> usize;
}

fn default_max_doc_update_iter() -> usize {
    DEFAULT_MAX_DOC_UPDATE_ITER
}

fn default_mean_change_tol() -> f64 {
    DEFAULT_MEAN_CHANGE_TOL
}

/// Serialized form of a fitted LDA model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdaArtifact {
    pub n_components: usize,
    pub n_features: usize,
    /// Topic-word pseudo-counts, `n_components` rows of `n_features`.
    pub components: Vec<Vec<f64>>,
    /// Defaults to `1 / n_components`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_topic_prior: Option<f64>,
    #[serde(default = "default_max_doc_update_iter")]
    pub max_doc_update_iter: usize,
    #[serde(default = "default_mean_change_tol")]
    pub mean_change_tol: f64,
}

impl LdaArtifact {
    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.n_components > 0, "n_components must be at least 1");
        anyhow::ensure!(self.n_features > 0, "n_features must be at least 1");
        anyhow::ensure!(
            self.components.len() == self.n_components,
            "components row count mismatch: expected {}, got {}",
            self.n_components,
            self.components.len()
        );
        for (topic, row) in self.components.iter().enumerate() {
            anyhow::ensure!(
                row.len() == self.n_features,
                "components row {topic} length mismatch: expected {}, got {}",
                self.n_features,
                row.len()
            );
            anyhow::ensure!(
                row.iter().all(|w| w.is_finite() && *w >= 0.0),
                "components row {topic} has negative or non-finite weights"
            );
            anyhow::ensure!(
                row.iter().sum::<f64>() > 0.0,
                "components row {topic} sums to zero"
            );
        }
        if let Some(prior) = self.doc_topic_prior {
            anyhow::ensure!(
                prior.is_finite() && prior > 0.0,
                "doc_topic_prior must be positive, got {prior}"
            );
        }
        anyhow::ensure!(
            self.max_doc_update_iter > 0,
            "max_doc_update_iter must be at least 1"
        );
        anyhow::ensure!(
            self.mean_change_tol.is_finite() && self.mean_change_tol >= 0.0,
            "mean_change_tol must be non-negative"
        );
        Ok(())
    }
}

/// A validated LDA model with its Dirichlet expectations precomputed.
#[derive(Debug, Clone)]
pub struct LdaModel {
    artifact: LdaArtifact,
    /// `exp(E[log beta])`, topics x features.
    exp_topic_word: Array2<f64>,
    doc_topic_prior: f64,
}

impl LdaModel {
    /// # Errors
    /// Returns an error when the artifact is structurally inconsistent.
    pub fn from_artifact(artifact: LdaArtifact) -> Result<Self> {
        artifact.validate()?;

        let flat: Vec<f64> = artifact.components.iter().flatten().copied().collect();
        let mut exp_topic_word =
            Array2::from_shape_vec((artifact.n_components, artifact.n_features), flat)?;
        for mut row in exp_topic_word.axis_iter_mut(Axis(0)) {
            let psi_total = digamma(row.sum());
            // psi(0) is -inf, so a zero weight contributes nothing.
            row.mapv_inplace(|w| {
                if w > 0.0 {
                    (digamma(w) - psi_total).exp()
                } else {
                    0.0
                }
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let doc_topic_prior = artifact
            .doc_topic_prior
            .unwrap_or(1.0 / artifact.n_components as f64);

        Ok(Self {
            artifact,
            exp_topic_word,
            doc_topic_prior,
        })
    }

    #[must_use]
    pub fn artifact(&self) -> &LdaArtifact {
        &self.artifact
    }
}

/// `exp(E[log theta])` for a Dirichlet with parameter `alpha`.
fn exp_dirichlet_expectation(alpha: &Array1<f64>) -> Array1<f64> {
    let psi_total = digamma(alpha.sum());
    alpha.mapv(|a| (digamma(a) - psi_total).exp())
}

fn normalize(doc_topic: Array1<f64>) -> TopicDistribution {
    let total = doc_topic.sum();
    if total.is_finite() && total > 0.0 {
        TopicDistribution::new((doc_topic / total).to_vec())
    } else {
        #[allow(clippy::cast_precision_loss)]
        let uniform = 1.0 / doc_topic.len() as f64;
        TopicDistribution::new(vec![uniform; doc_topic.len()])
    }
}

impl TopicModel for LdaModel {
    fn transform(&self, features: &FeatureVector) -> Result<TopicDistribution, InferenceError> {
        if features.len() != self.n_features() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }

        let mut doc_topic = Array1::<f64>::ones(self.n_topics());
        let (ids, counts): (Vec<usize>, Vec<f64>) = features.nonzero().unzip();
        if ids.is_empty() {
            return Ok(normalize(doc_topic));
        }

        let counts = Array1::from(counts);
        let exp_topic_word = self.exp_topic_word.select(Axis(1), &ids);
        let mut exp_doc_topic = exp_dirichlet_expectation(&doc_topic);

        for _ in 0..self.artifact.max_doc_update_iter {
            let last = doc_topic.clone();
            let norm_phi = exp_doc_topic.dot(&exp_topic_word) + f64::EPSILON;
            let weighted = &counts / &norm_phi;
            doc_topic = &exp_doc_topic * &exp_topic_word.dot(&weighted);
            doc_topic += self.doc_topic_prior;
            exp_doc_topic = exp_dirichlet_expectation(&doc_topic);

            let mean_change = (&last - &doc_topic).mapv(f64::abs).mean().unwrap_or(0.0);
            if mean_change < self.artifact.mean_change_tol {
                break;
            }
        }

        Ok(normalize(doc_topic))
    }

    fn n_features(&self) -> usize {
        self.artifact.n_features
    }

    fn n_topics(&self) -> usize {
        self.artifact.n_components
    }
}
