//! Risk bucketing.

use serde::{Deserialize, Serialize};

use crate::constants::MALICIOUS_CLASS;
use super::classifier::Prediction;

/// Coarse risk bucket over the malicious-class probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `< 0.3` is Low, `0.3..0.7` is Medium, `>= 0.7` is High.
    pub fn bucket(malicious_probability: f32) -> Self {
        if malicious_probability < 0.3 {
            RiskLevel::Low
        } else if malicious_probability < 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Probability mass on the malicious class.
///
/// When the predicted class is the safe one this is the residual
/// `1 - confidence`. Deployed clients score against this exact formula,
/// although it is only a proxy for a calibrated malicious probability when
/// the classifier is not binary or not well-calibrated.
pub fn malicious_probability(prediction: &Prediction) -> f32 {
    if prediction.class == MALICIOUS_CLASS {
        prediction.confidence
    } else {
        1.0 - prediction.confidence
    }
}
