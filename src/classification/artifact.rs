//! Loading of the fitted vectorizer and topic model.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use super::topic_model::{LdaArtifact, LdaModel, TopicModel};
use super::vectorizer::{FittedVectorizer, Vectorizer, VectorizerArtifact};
use crate::error::{ArtifactKind, LoadError};

/// Source of the two fitted artifacts the analyzer is built from.
pub trait ArtifactStore {
    /// # Errors
    /// Returns [`LoadError`] when the vectorizer cannot be read or is malformed.
    fn load_vectorizer(&self) -> Result<Arc<dyn Vectorizer>, LoadError>;

    /// # Errors
    /// Returns [`LoadError`] when the topic model cannot be read or is malformed.
    fn load_topic_model(&self) -> Result<Arc<dyn TopicModel>, LoadError>;
}

/// Artifacts exported as JSON files on local storage.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    vectorizer_path: PathBuf,
    topic_model_path: PathBuf,
}

impl JsonArtifactStore {
    #[must_use]
    pub fn new(vectorizer_path: impl Into<PathBuf>, topic_model_path: impl Into<PathBuf>) -> Self {
        Self {
            vectorizer_path: vectorizer_path.into(),
            topic_model_path: topic_model_path.into(),
        }
    }

    /// # Errors
    /// Returns [`LoadError`] when the file is unreadable, not valid JSON, or inconsistent.
    pub fn read_vectorizer(&self) -> Result<FittedVectorizer, LoadError> {
        let kind = ArtifactKind::Vectorizer;
        let artifact: VectorizerArtifact = read_json(kind, &self.vectorizer_path)?;
        let vectorizer =
            FittedVectorizer::from_artifact(artifact).map_err(|error| LoadError::Invalid {
                kind,
                reason: format!("{error:#}"),
            })?;
        info!(
            path = %self.vectorizer_path.display(),
            n_features = vectorizer.n_features(),
            "vectorizer artifact loaded"
        );
        Ok(vectorizer)
    }

    /// # Errors
    /// Returns [`LoadError`] when the file is unreadable, not valid JSON, or inconsistent.
    pub fn read_topic_model(&self) -> Result<LdaModel, LoadError> {
        let kind = ArtifactKind::TopicModel;
        let artifact: LdaArtifact = read_json(kind, &self.topic_model_path)?;
        let model = LdaModel::from_artifact(artifact).map_err(|error| LoadError::Invalid {
            kind,
            reason: format!("{error:#}"),
        })?;
        info!(
            path = %self.topic_model_path.display(),
            n_topics = model.n_topics(),
            n_features = model.n_features(),
            "topic model artifact loaded"
        );
        Ok(model)
    }
}

impl ArtifactStore for JsonArtifactStore {
    fn load_vectorizer(&self) -> Result<Arc<dyn Vectorizer>, LoadError> {
        Ok(Arc::new(self.read_vectorizer()?))
    }

    fn load_topic_model(&self) -> Result<Arc<dyn TopicModel>, LoadError> {
        Ok(Arc::new(self.read_topic_model()?))
    }
}

fn read_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Decode {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
