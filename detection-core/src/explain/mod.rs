//! Attribution and human-readable explanation.
//!
//! Attribution is an optional capability. When no engine is configured, or
//! the engine errors at runtime, explanation degrades to a fixed
//! placeholder instead of failing the classification response. Only the
//! URL path carries attribution.

use std::sync::Arc;

use crate::constants::{EXPLANATION_UNAVAILABLE, MALICIOUS_CLASS};
use crate::model::classifier::{ModelError, ProbabilityModel};
use crate::url::features::layout::display_label;
use crate::url::features::{UrlFeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExplainError {
    #[error("background sample set is empty")]
    EmptyBackground,
    #[error("background sample has {actual} columns, expected {expected}")]
    BackgroundShape { expected: usize, actual: usize },
    #[error("model output carries no malicious-class probability")]
    MissingClass,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Signed per-feature contribution scores, in schema order. Positive scores
/// push toward the malicious class.
#[derive(Debug, Clone, Copy, Default)]
pub struct Attribution {
    pub scores: [f32; FEATURE_COUNT],
}

/// Per-prediction attribution engine.
pub trait AttributionEngine: Send + Sync {
    fn attribute(&self, features: &UrlFeatureVector) -> Result<Attribution, ExplainError>;
}

/// Occlusion-style attribution against a background baseline.
///
/// The baseline is the column mean of a representative background sample.
/// A feature's contribution is the change in malicious probability when
/// that feature is replaced by its baseline value.
pub struct BaselineOcclusion {
    model: Arc<dyn ProbabilityModel>,
    baseline: [f32; FEATURE_COUNT],
}

impl BaselineOcclusion {
    pub fn new(
        model: Arc<dyn ProbabilityModel>,
        background: &[Vec<f32>],
    ) -> Result<Self, ExplainError> {
        if background.is_empty() {
            return Err(ExplainError::EmptyBackground);
        }
        let mut baseline = [0.0f32; FEATURE_COUNT];
        for row in background {
            if row.len() != FEATURE_COUNT {
                return Err(ExplainError::BackgroundShape {
                    expected: FEATURE_COUNT,
                    actual: row.len(),
                });
            }
            for (slot, value) in baseline.iter_mut().zip(row.iter()) {
                *slot += value;
            }
        }
        for slot in &mut baseline {
            *slot /= background.len() as f32;
        }
        Ok(Self { model, baseline })
    }

    fn malicious_probability(&self, input: &[f32]) -> Result<f32, ExplainError> {
        let probabilities = self.model.predict_proba(input)?;
        probabilities
            .get(MALICIOUS_CLASS)
            .copied()
            .ok_or(ExplainError::MissingClass)
    }
}

impl AttributionEngine for BaselineOcclusion {
    fn attribute(&self, features: &UrlFeatureVector) -> Result<Attribution, ExplainError> {
        let input = features.to_model_input();
        let reference = self.malicious_probability(&input)?;

        let mut scores = [0.0f32; FEATURE_COUNT];
        for index in 0..FEATURE_COUNT {
            let mut occluded = input;
            occluded[index] = self.baseline[index];
            scores[index] = reference - self.malicious_probability(&occluded)?;
        }
        Ok(Attribution { scores })
    }
}

/// Rank attribution entries by absolute magnitude descending and render the
/// top entries as reasons.
///
/// The sort is stable, so tied magnitudes keep schema order. Zero-magnitude
/// features never outrank contributing ones and are not rendered; when
/// nothing survives, the placeholder reason is returned so the caller
/// always has something to show.
pub fn reasons(attribution: &Attribution, top_k: usize) -> Vec<String> {
    let mut ranked: Vec<(usize, f32)> = attribution.scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let rendered: Vec<String> = ranked
        .into_iter()
        .filter(|(_, score)| *score != 0.0)
        .take(top_k)
        .map(|(index, score)| render(index, score))
        .collect();

    if rendered.is_empty() {
        vec![EXPLANATION_UNAVAILABLE.to_string()]
    } else {
        rendered
    }
}

fn render(index: usize, score: f32) -> String {
    let label = display_label(index).unwrap_or("Feature");
    if score > 0.0 {
        format!("{} increased the phishing risk", label)
    } else {
        format!("{} reduced the phishing risk", label)
    }
}
