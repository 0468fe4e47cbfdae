//! TF-IDF transform against a trained vocabulary.
//!
//! The vocabulary and idf weights are exported by the training side; the
//! transform here must reproduce the training-side weighting exactly (term
//! counts scaled by idf, then L2-normalized) or the text classifier's input
//! space shifts under it.

use std::collections::HashMap;

use serde::Deserialize;

/// On-disk shape of the vectorizer artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f32>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum VectorizerError {
    #[error("vocabulary has {vocabulary} entries but idf carries {idf} weights")]
    LengthMismatch { vocabulary: usize, idf: usize },
    #[error("vocabulary index {index} out of bounds for {size} idf weights")]
    IndexOutOfBounds { index: usize, size: usize },
}

/// Immutable TF-IDF vectorizer for the SMS path.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Validate and adopt a loaded artifact.
    pub fn new(artifact: VectorizerArtifact) -> Result<Self, VectorizerError> {
        let VectorizerArtifact { vocabulary, idf } = artifact;
        if vocabulary.len() != idf.len() {
            return Err(VectorizerError::LengthMismatch {
                vocabulary: vocabulary.len(),
                idf: idf.len(),
            });
        }
        for &index in vocabulary.values() {
            if index >= idf.len() {
                return Err(VectorizerError::IndexOutOfBounds {
                    index,
                    size: idf.len(),
                });
            }
        }
        Ok(Self { vocabulary, idf })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Transform a preprocessed token string into the model input vector.
    ///
    /// Unknown tokens are ignored; an empty input yields the zero vector.
    pub fn transform(&self, cleaned: &str) -> Vec<f32> {
        let mut values = vec![0.0f32; self.idf.len()];
        for token in cleaned.split_whitespace() {
            if let Some(&index) = self.vocabulary.get(token) {
                values[index] += 1.0;
            }
        }
        for (value, idf) in values.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }
        values
    }
}
