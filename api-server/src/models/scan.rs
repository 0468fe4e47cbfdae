//! Scan request/response contracts.
//!
//! Field names and shapes are consumed by the web frontend and the browser
//! extension (mixed casing included); renaming anything here breaks
//! deployed clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use phishguard_core::{SmsVerdict, UrlVerdict};

/// URL scan request
#[derive(Debug, Deserialize, Validate)]
pub struct UrlScanRequest {
    #[validate(length(min = 1, message = "no url provided"))]
    pub url: String,
}

/// SMS scan request
#[derive(Debug, Deserialize, Validate)]
pub struct SmsScanRequest {
    #[validate(length(min = 1, message = "no message provided"))]
    pub message: String,
}

/// URL scan response
#[derive(Debug, Serialize)]
pub struct UrlScanResponse {
    pub url: String,
    pub prediction: String,
    /// Predicted-class confidence, rendered as "NN.NN%"
    pub confidence: String,
    #[serde(rename = "riskScore")]
    pub risk_score: f32,
    #[serde(rename = "riskLevel")]
    pub risk_level: String,
    #[serde(rename = "riskReasons")]
    pub risk_reasons: Vec<String>,
    /// Feature name -> code map in schema order; empty for whitelisted URLs
    pub features: Map<String, Value>,
    pub is_whitelisted: bool,
}

impl From<UrlVerdict> for UrlScanResponse {
    fn from(verdict: UrlVerdict) -> Self {
        let mut features = Map::new();
        if let Some(vector) = &verdict.features {
            for (name, value) in vector.named() {
                features.insert(name.to_string(), Value::from(value));
            }
        }

        Self {
            url: verdict.url,
            prediction: verdict.label.as_str().to_string(),
            confidence: format!("{:.2}%", verdict.confidence * 100.0),
            risk_score: verdict.malicious_probability * 100.0,
            risk_level: verdict.risk.as_str().to_string(),
            risk_reasons: verdict.reasons,
            features,
            is_whitelisted: verdict.whitelisted,
        }
    }
}

/// SMS scan response
#[derive(Debug, Serialize)]
pub struct SmsScanResponse {
    pub original_message: String,
    pub prediction: String,
    /// Predicted-class confidence, 0.0 - 1.0
    pub confidence: f32,
    #[serde(rename = "riskScore")]
    pub risk_score: f32,
}

impl From<SmsVerdict> for SmsScanResponse {
    fn from(verdict: SmsVerdict) -> Self {
        Self {
            original_message: verdict.message,
            prediction: verdict.label.as_str().to_string(),
            confidence: verdict.confidence,
            risk_score: verdict.malicious_probability * 100.0,
        }
    }
}
