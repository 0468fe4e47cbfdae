//! Classifier contract and the ONNX Runtime backend.
//!
//! The pipeline is agnostic to the scoring backend: anything that maps a
//! feature vector to a class probability distribution plugs in behind
//! [`ProbabilityModel`]. The concrete backend shipped here wraps a
//! pretrained model exported to ONNX.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::Serialize;

// ============================================================================
// CONTRACT
// ============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("model artifact not found: {0}")]
    NotFound(String),
    #[error("failed to load model: {0}")]
    Load(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model produced no float probability output")]
    NoProbabilityOutput,
    #[error("model returned an empty distribution")]
    EmptyDistribution,
}

/// Black-box scoring contract around a pretrained classifier.
///
/// Implementations are pure functions over their trained parameters; the
/// contract never mutates or retrains.
pub trait ProbabilityModel: Send + Sync {
    /// Class probabilities for one input vector, in training class order,
    /// summing to 1.
    fn predict_proba(&self, input: &[f32]) -> Result<Vec<f32>, ModelError>;
}

/// Outcome of a single classification.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// argmax class index; ties break toward the lowest index
    pub class: usize,
    /// probability mass at the predicted class
    pub confidence: f32,
    pub probabilities: Vec<f32>,
}

/// Run the argmax decision on top of a scoring backend.
pub fn predict(model: &dyn ProbabilityModel, input: &[f32]) -> Result<Prediction, ModelError> {
    let probabilities = model.predict_proba(input)?;
    if probabilities.is_empty() {
        return Err(ModelError::EmptyDistribution);
    }
    let mut class = 0;
    for (index, &p) in probabilities.iter().enumerate() {
        if p > probabilities[class] {
            class = index;
        }
    }
    Ok(Prediction {
        class,
        confidence: probabilities[class],
        probabilities,
    })
}

/// Load-time metadata, surfaced through the engine status.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub path: String,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// ONNX BACKEND
// ============================================================================

/// ONNX Runtime backed classifier.
///
/// `Session::run` needs exclusive access, so the session sits behind a
/// mutex; everything else is immutable after load.
pub struct OnnxModel {
    session: Mutex<Session>,
    output_names: Vec<String>,
    info: ModelInfo,
}

impl OnnxModel {
    /// Load a model artifact from disk. Absence is fatal at startup.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }
        tracing::info!("Loading ONNX model from {}", path.display());

        let session = Session::builder()
            .map_err(|e| ModelError::Load(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Load(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| ModelError::Load(e.to_string()))?;

        let output_names = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(Self {
            session: Mutex::new(session),
            output_names,
            info: ModelInfo {
                path: path.display().to_string(),
                loaded_at: Utc::now(),
            },
        })
    }

    pub fn info(&self) -> ModelInfo {
        self.info.clone()
    }
}

impl ProbabilityModel for OnnxModel {
    fn predict_proba(&self, input: &[f32]) -> Result<Vec<f32>, ModelError> {
        let array = Array2::<f32>::from_shape_vec((1, input.len()), input.to_vec())
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        let tensor =
            Value::from_array(array).map_err(|e| ModelError::Inference(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        // skl2onnx-style exports emit an integer label output ahead of the
        // probability tensor; take the first output that extracts as f32.
        for name in &self.output_names {
            if let Some(value) = outputs.get(name) {
                if let Ok(extracted) = value.try_extract_tensor::<f32>() {
                    let data = extracted.1;
                    if !data.is_empty() {
                        return Ok(data.to_vec());
                    }
                }
            }
        }

        Err(ModelError::NoProbabilityOutput)
    }
}
