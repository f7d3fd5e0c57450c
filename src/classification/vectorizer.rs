//! Fitted text vectorizer (bag-of-words counts or TF-IDF) loaded from its JSON export.
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use anyhow::{Context, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::tokenizer::{DEFAULT_TOKEN_PATTERN, StripAccents, TextAnalyzer};

/// Dense feature representation of one review, one column per vocabulary term.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    #[must_use]
    pub fn new(values: Array1<f64>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn zeros(n_features: usize) -> Self {
        Self::new(Array1::zeros(n_features))
    }

    #[must_use]
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-zero `(column, value)` pairs in column order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0.0)
            .map(|(idx, value)| (idx, *value))
    }
}

/// Text to feature vector capability.
pub trait Vectorizer: Send + Sync + fmt::Debug {
    fn transform(&self, text: &str) -> FeatureVector;

    /// Width of every vector [`Vectorizer::transform`] returns.
    fn n_features(&self) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorizerKind {
    #[default]
    Count,
    Tfidf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

#[allow(clippy::unnecessary_wraps)]
fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Serialized form of a fitted vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    #[serde(default)]
    pub kind: VectorizerKind,
    pub vocabulary: BTreeMap<String, usize>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub strip_accents: Option<StripAccents>,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

impl VectorizerArtifact {
    fn validate(&self) -> Result<()> {
        let n_features = self.vocabulary.len();
        anyhow::ensure!(n_features > 0, "vocabulary is empty");

        let mut seen = vec![false; n_features];
        for (term, &idx) in &self.vocabulary {
            anyhow::ensure!(
                idx < n_features,
                "vocabulary index {idx} for {term:?} is out of range 0..{n_features}"
            );
            anyhow::ensure!(!seen[idx], "vocabulary index {idx} is assigned twice");
            seen[idx] = true;
        }

        match (self.kind, &self.idf) {
            (VectorizerKind::Tfidf, None) => anyhow::bail!("tfidf vectorizer is missing idf weights"),
            (VectorizerKind::Tfidf, Some(idf)) => {
                anyhow::ensure!(
                    idf.len() == n_features,
                    "idf length mismatch: expected {n_features}, got {}",
                    idf.len()
                );
                anyhow::ensure!(
                    idf.iter().all(|w| w.is_finite() && *w >= 0.0),
                    "idf weights must be finite and non-negative"
                );
            }
            (VectorizerKind::Count, _) => {}
        }
        Ok(())
    }
}

/// A validated, ready-to-use vectorizer.
#[derive(Debug, Clone)]
pub struct FittedVectorizer {
    artifact: VectorizerArtifact,
    analyzer: TextAnalyzer,
    vocab_index: HashMap<String, usize>,
    idf: Option<Array1<f64>>,
}

impl FittedVectorizer {
    /// # Errors
    /// Returns an error when the artifact is structurally inconsistent.
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        artifact.validate()?;
        let analyzer = TextAnalyzer::new(
            artifact.lowercase,
            artifact.strip_accents,
            &artifact.token_pattern,
            &artifact.stop_words,
            artifact.ngram_range,
        )
        .context("invalid analyzer settings")?;
        let vocab_index = artifact
            .vocabulary
            .iter()
            .map(|(term, idx)| (term.clone(), *idx))
            .collect();
        let idf = match artifact.kind {
            VectorizerKind::Tfidf => artifact.idf.clone().map(Array1::from),
            VectorizerKind::Count => None,
        };

        Ok(Self {
            artifact,
            analyzer,
            vocab_index,
            idf,
        })
    }

    #[must_use]
    pub fn artifact(&self) -> &VectorizerArtifact {
        &self.artifact
    }

    fn apply_tfidf(&self, counts: &mut Array1<f64>, idf: &Array1<f64>) {
        if self.artifact.sublinear_tf {
            counts.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { 0.0 });
        }
        *counts *= idf;

        let norm = match self.artifact.norm {
            Some(Norm::L2) => counts.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => counts.iter().map(|v| v.abs()).sum(),
            None => return,
        };
        if norm > 0.0 {
            *counts /= norm;
        }
    }
}

impl Vectorizer for FittedVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        let mut counts = Array1::<f64>::zeros(self.n_features());
        for term in self.analyzer.analyze(text) {
            if let Some(&idx) = self.vocab_index.get(&term) {
                counts[idx] += 1.0;
            }
        }

        if self.artifact.binary {
            counts.mapv_inplace(|v| if v > 0.0 { 1.0 } else { 0.0 });
        }
        if let Some(idf) = &self.idf {
            self.apply_tfidf(&mut counts, idf);
        }

        FeatureVector::new(counts)
    }

    fn n_features(&self) -> usize {
        self.vocab_index.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn count_vectorizer() -> FittedVectorizer {
        let artifact: VectorizerArtifact = serde_json::from_value(json!({
            "vocabulary": {"battery": 0, "laptop": 1, "life": 2, "novel": 3},
            "stop_words": ["this", "has"]
        }))
        .expect("artifact");
        FittedVectorizer::from_artifact(artifact).expect("vectorizer")
    }

    #[test]
    fn counts_vocabulary_hits_and_ignores_unknown_terms() {
        let vectorizer = count_vectorizer();
        let fv = vectorizer.transform("This laptop has amazing battery life, battery!");
        assert_eq!(fv.values().to_vec(), vec![2.0, 1.0, 1.0, 0.0]);
        assert_eq!(fv.nonzero().collect::<Vec<_>>(), vec![(0, 2.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn empty_text_is_all_zero_vector() {
        let vectorizer = count_vectorizer();
        let fv = vectorizer.transform("");
        assert_eq!(fv.len(), 4);
        assert_eq!(fv.nonzero().count(), 0);
    }

    #[test]
    fn binary_clamps_counts() {
        let artifact: VectorizerArtifact = serde_json::from_value(json!({
            "vocabulary": {"battery": 0, "laptop": 1},
            "binary": true
        }))
        .expect("artifact");
        let vectorizer = FittedVectorizer::from_artifact(artifact).expect("vectorizer");
        let fv = vectorizer.transform("battery battery battery laptop");
        assert_eq!(fv.values().to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn tfidf_weights_and_l2_normalizes() {
        let artifact: VectorizerArtifact = serde_json::from_value(json!({
            "kind": "tfidf",
            "vocabulary": {"battery": 0, "laptop": 1, "novel": 2},
            "idf": [1.0, 2.0, 3.0]
        }))
        .expect("artifact");
        let vectorizer = FittedVectorizer::from_artifact(artifact).expect("vectorizer");
        let fv = vectorizer.transform("battery battery laptop");
        // raw tf-idf is [2, 2, 0]
        let expected = 1.0 / 2.0_f64.sqrt();
        let values = fv.values();
        assert!((values[0] - expected).abs() < 1e-12);
        assert!((values[1] - expected).abs() < 1e-12);
        assert_eq!(values[2], 0.0);
    }

    #[test]
    fn tfidf_without_norm_keeps_zero_vector_for_empty_text() {
        let artifact: VectorizerArtifact = serde_json::from_value(json!({
            "kind": "tfidf",
            "vocabulary": {"battery": 0},
            "idf": [1.5],
            "norm": null,
            "sublinear_tf": true
        }))
        .expect("artifact");
        let vectorizer = FittedVectorizer::from_artifact(artifact).expect("vectorizer");
        assert_eq!(vectorizer.transform("").values().to_vec(), vec![0.0]);
        let fv = vectorizer.transform("battery battery");
        assert!((fv.values()[0] - 1.5 * (1.0 + 2.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn rejects_gapped_vocabulary() {
        let artifact: VectorizerArtifact = serde_json::from_value(json!({
            "vocabulary": {"battery": 0, "laptop": 2}
        }))
        .expect("artifact");
        let error = FittedVectorizer::from_artifact(artifact).expect_err("gap should fail");
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn rejects_tfidf_without_idf() {
        let artifact: VectorizerArtifact = serde_json::from_value(json!({
            "kind": "tfidf",
            "vocabulary": {"battery": 0}
        }))
        .expect("artifact");
        assert!(FittedVectorizer::from_artifact(artifact).is_err());
    }
}
