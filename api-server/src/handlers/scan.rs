//! Scan handlers

use axum::{extract::State, Json};
use validator::Validate;

use phishguard_core::ScanError;

use crate::models::{SmsScanRequest, SmsScanResponse, UrlScanRequest, UrlScanResponse};
use crate::{AppError, AppResult, AppState};

/// Classify a URL
pub async fn scan_url(
    State(state): State<AppState>,
    Json(req): Json<UrlScanRequest>,
) -> AppResult<Json<UrlScanResponse>> {
    req.validate()
        .map_err(|_| AppError::InvalidInput("no url provided".to_string()))?;

    let verdict = state
        .engine
        .scan_url(&req.url)
        .map_err(|e| map_scan_error(e, "no url provided"))?;

    Ok(Json(UrlScanResponse::from(verdict)))
}

/// Classify an SMS-style message
pub async fn scan_sms(
    State(state): State<AppState>,
    Json(req): Json<SmsScanRequest>,
) -> AppResult<Json<SmsScanResponse>> {
    req.validate()
        .map_err(|_| AppError::InvalidInput("no message provided".to_string()))?;

    let verdict = state
        .engine
        .scan_message(&req.message)
        .map_err(|e| map_scan_error(e, "no message provided"))?;

    Ok(Json(SmsScanResponse::from(verdict)))
}

fn map_scan_error(err: ScanError, empty_message: &str) -> AppError {
    match err {
        ScanError::EmptyInput => AppError::InvalidInput(empty_message.to_string()),
        ScanError::Model(e) => AppError::PredictionFailed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use phishguard_core::text::vectorizer::{TfidfVectorizer, VectorizerArtifact};
    use phishguard_core::url::whitelist::WhitelistSet;
    use phishguard_core::{DetectionEngine, ProbabilityModel};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct FixedModel(Vec<f32>);

    impl ProbabilityModel for FixedModel {
        fn predict_proba(
            &self,
            _input: &[f32],
        ) -> Result<Vec<f32>, phishguard_core::model::classifier::ModelError> {
            Ok(self.0.clone())
        }
    }

    fn test_state(url_proba: Vec<f32>, whitelist: WhitelistSet) -> AppState {
        let vectorizer = TfidfVectorizer::new(VectorizerArtifact {
            vocabulary: HashMap::from([("win".to_string(), 0)]),
            idf: vec![1.0],
        })
        .unwrap();
        let engine = DetectionEngine::from_parts(
            Arc::new(FixedModel(url_proba)),
            Arc::new(FixedModel(vec![0.1, 0.9])),
            vectorizer,
            whitelist,
            None,
        );
        AppState {
            engine: Arc::new(engine),
            config: Config::from_env(),
        }
    }

    #[tokio::test]
    async fn test_scan_url_whitelisted_short_circuit() {
        let state = test_state(vec![0.0, 1.0], WhitelistSet::from_entries(["google.com"]));
        let response = scan_url(
            State(state),
            Json(UrlScanRequest {
                url: "https://www.google.com".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.prediction, "Legitimate");
        assert_eq!(response.0.risk_score, 0.0);
        assert!(response.0.is_whitelisted);
        assert_eq!(response.0.risk_reasons, vec!["Whitelisted trusted domain"]);
        assert!(response.0.features.is_empty());
    }

    #[tokio::test]
    async fn test_scan_url_empty_input_is_client_error() {
        let state = test_state(vec![0.5, 0.5], WhitelistSet::empty());
        let result = scan_url(
            State(state),
            Json(UrlScanRequest {
                url: "".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_scan_url_phishing_response() {
        let state = test_state(vec![0.2, 0.8], WhitelistSet::empty());
        let response = scan_url(
            State(state),
            Json(UrlScanRequest {
                url: "http://secure-login.com//redirect".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.prediction, "Phishing");
        assert_eq!(response.0.risk_level, "High");
        assert_eq!(response.0.features.len(), 8);
    }

    #[tokio::test]
    async fn test_scan_sms_response() {
        let state = test_state(vec![0.5, 0.5], WhitelistSet::empty());
        let response = scan_sms(
            State(state),
            Json(SmsScanRequest {
                message: "Win a prize now".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.prediction, "Smishing");
        assert!((response.0.confidence - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_scan_sms_blank_message_rejected() {
        let state = test_state(vec![0.5, 0.5], WhitelistSet::empty());
        let result = scan_sms(
            State(state),
            Json(SmsScanRequest {
                message: "   ".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
