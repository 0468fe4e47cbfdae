//! Detection engine: process-wide read-only state and the two scan paths.
//!
//! Everything here is loaded once at startup and never mutated afterwards,
//! so concurrent requests share it without locking. Scans are pure,
//! bounded-time computations: linear in input length for extraction and
//! preprocessing, bounded by the fixed vector size for classification and
//! attribution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::constants::{DEFAULT_TOP_REASONS, EXPLANATION_UNAVAILABLE, MALICIOUS_CLASS, WHITELISTED_REASON};
use crate::explain::{self, AttributionEngine, BaselineOcclusion, ExplainError};
use crate::model::classifier::{predict, ModelError, ModelInfo, OnnxModel, ProbabilityModel};
use crate::model::risk::{malicious_probability, RiskLevel};
use crate::text::preprocess::preprocess;
use crate::text::vectorizer::{TfidfVectorizer, VectorizerArtifact, VectorizerError};
use crate::url::features::layout::{self, LayoutInfo, SchemaMismatchError};
use crate::url::features::{extract, UrlFeatureVector};
use crate::url::normalize::ensure_scheme;
use crate::url::whitelist::WhitelistSet;

// ============================================================================
// ERRORS
// ============================================================================

/// Startup artifact failures. All of these prevent the process from
/// serving; there is no degraded mode for a missing model or schema.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact {path} unavailable: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("artifact {path} is malformed: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("vectorizer artifact invalid: {0}")]
    Vectorizer(#[from] VectorizerError),
    #[error("attribution baseline invalid: {0}")]
    Background(#[from] ExplainError),
}

/// Per-request scan failures.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Input was empty after trimming. Surfaced as a client error before
    /// any extraction or model work happens.
    #[error("empty input")]
    EmptyInput,
    #[error(transparent)]
    Model(#[from] ModelError),
}

// ============================================================================
// ARTIFACTS
// ============================================================================

/// Locations of the startup artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub url_model: PathBuf,
    pub feature_schema: PathBuf,
    pub background: PathBuf,
    pub whitelist: PathBuf,
    pub sms_model: PathBuf,
    pub sms_vectorizer: PathBuf,
}

impl ArtifactPaths {
    /// Conventional layout under a single artifact directory.
    pub fn under(dir: &Path) -> Self {
        Self {
            url_model: dir.join("url_model.onnx"),
            feature_schema: dir.join("feature_columns.json"),
            background: dir.join("background_samples.json"),
            whitelist: dir.join("whitelist.txt"),
            sms_model: dir.join("sms_model.onnx"),
            sms_vectorizer: dir.join("sms_vectorizer.json"),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

// ============================================================================
// VERDICTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UrlLabel {
    Phishing,
    Legitimate,
}

impl UrlLabel {
    pub fn from_class(class: usize) -> Self {
        if class == MALICIOUS_CLASS {
            UrlLabel::Phishing
        } else {
            UrlLabel::Legitimate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlLabel::Phishing => "Phishing",
            UrlLabel::Legitimate => "Legitimate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SmsLabel {
    Smishing,
    NotSmishing,
}

impl SmsLabel {
    pub fn from_class(class: usize) -> Self {
        if class == MALICIOUS_CLASS {
            SmsLabel::Smishing
        } else {
            SmsLabel::NotSmishing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SmsLabel::Smishing => "Smishing",
            SmsLabel::NotSmishing => "Not Smishing",
        }
    }
}

/// URL-path outcome.
#[derive(Debug, Clone, Serialize)]
pub struct UrlVerdict {
    /// Scheme-coerced form that was matched and scored.
    pub url: String,
    pub label: UrlLabel,
    /// Probability mass at the predicted class.
    pub confidence: f32,
    pub malicious_probability: f32,
    pub risk: RiskLevel,
    pub reasons: Vec<String>,
    /// None on the whitelist short-circuit, where no extraction happens.
    pub features: Option<UrlFeatureVector>,
    pub whitelisted: bool,
}

/// SMS-path outcome. No attribution on this path.
#[derive(Debug, Clone, Serialize)]
pub struct SmsVerdict {
    pub message: String,
    pub label: SmsLabel,
    pub confidence: f32,
    pub malicious_probability: f32,
    pub risk: RiskLevel,
}

/// Snapshot of the loaded process-wide state, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub layout: LayoutInfo,
    pub whitelist_entries: usize,
    pub vocabulary_size: usize,
    pub explain_available: bool,
    pub url_model: Option<ModelInfo>,
    pub sms_model: Option<ModelInfo>,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct DetectionEngine {
    url_model: Arc<dyn ProbabilityModel>,
    sms_model: Arc<dyn ProbabilityModel>,
    vectorizer: TfidfVectorizer,
    whitelist: WhitelistSet,
    explainer: Option<Box<dyn AttributionEngine>>,
    url_model_info: Option<ModelInfo>,
    sms_model_info: Option<ModelInfo>,
}

impl DetectionEngine {
    /// One-time startup load.
    ///
    /// Models, the feature schema, and the vectorizer are required. The
    /// whitelist fails open to empty. The background sample is required
    /// only when explanations are enabled; disabling them degrades every
    /// explanation to the placeholder instead.
    pub fn load(paths: &ArtifactPaths, explain_enabled: bool) -> Result<Self, ArtifactError> {
        let schema: Vec<String> = read_json(&paths.feature_schema)?;
        layout::validate_schema(&schema)?;

        let url_model = OnnxModel::load(&paths.url_model)?;
        let url_model_info = Some(url_model.info());
        let url_model: Arc<dyn ProbabilityModel> = Arc::new(url_model);

        let sms_model = OnnxModel::load(&paths.sms_model)?;
        let sms_model_info = Some(sms_model.info());
        let sms_model: Arc<dyn ProbabilityModel> = Arc::new(sms_model);

        let vectorizer =
            TfidfVectorizer::new(read_json::<VectorizerArtifact>(&paths.sms_vectorizer)?)?;
        let whitelist = WhitelistSet::load(&paths.whitelist);

        let explainer: Option<Box<dyn AttributionEngine>> = if explain_enabled {
            let background: Vec<Vec<f32>> = read_json(&paths.background)?;
            Some(Box::new(BaselineOcclusion::new(
                url_model.clone(),
                &background,
            )?))
        } else {
            tracing::info!("Attribution disabled; explanations degrade to placeholder");
            None
        };

        Ok(Self {
            url_model,
            sms_model,
            vectorizer,
            whitelist,
            explainer,
            url_model_info,
            sms_model_info,
        })
    }

    /// Assemble an engine from explicit parts, letting tests and
    /// alternative scoring backends plug in without artifacts on disk.
    pub fn from_parts(
        url_model: Arc<dyn ProbabilityModel>,
        sms_model: Arc<dyn ProbabilityModel>,
        vectorizer: TfidfVectorizer,
        whitelist: WhitelistSet,
        explainer: Option<Box<dyn AttributionEngine>>,
    ) -> Self {
        Self {
            url_model,
            sms_model,
            vectorizer,
            whitelist,
            explainer,
            url_model_info: None,
            sms_model_info: None,
        }
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            layout: LayoutInfo::current(),
            whitelist_entries: self.whitelist.len(),
            vocabulary_size: self.vectorizer.vocabulary_size(),
            explain_available: self.explainer.is_some(),
            url_model: self.url_model_info.clone(),
            sms_model: self.sms_model_info.clone(),
        }
    }

    /// Classify a URL.
    ///
    /// Whitelisted hosts short-circuit the pipeline entirely: no feature
    /// extraction, no classifier call, deterministic legitimate verdict.
    pub fn scan_url(&self, raw: &str) -> Result<UrlVerdict, ScanError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScanError::EmptyInput);
        }

        let url = ensure_scheme(trimmed);

        if self.whitelist.is_trusted(&url) {
            tracing::debug!("Whitelist short-circuit for {}", url);
            return Ok(UrlVerdict {
                url,
                label: UrlLabel::Legitimate,
                confidence: 1.0,
                malicious_probability: 0.0,
                risk: RiskLevel::Low,
                reasons: vec![WHITELISTED_REASON.to_string()],
                features: None,
                whitelisted: true,
            });
        }

        let features = extract(&url);
        let prediction = predict(self.url_model.as_ref(), &features.to_model_input())?;
        let p_malicious = malicious_probability(&prediction);
        let risk = RiskLevel::bucket(p_malicious);
        let label = UrlLabel::from_class(prediction.class);
        let reasons = self.reasons_for(&features);

        tracing::info!(
            "URL scan: {} -> {} (risk {}, p={:.3})",
            url,
            label.as_str(),
            risk.as_str(),
            p_malicious
        );

        Ok(UrlVerdict {
            url,
            label,
            confidence: prediction.confidence,
            malicious_probability: p_malicious,
            risk,
            reasons,
            features: Some(features),
            whitelisted: false,
        })
    }

    /// Classify an SMS-style message.
    pub fn scan_message(&self, raw: &str) -> Result<SmsVerdict, ScanError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScanError::EmptyInput);
        }

        let cleaned = preprocess(trimmed);
        let vector = self.vectorizer.transform(&cleaned);
        let prediction = predict(self.sms_model.as_ref(), &vector)?;
        let p_malicious = malicious_probability(&prediction);
        let risk = RiskLevel::bucket(p_malicious);
        let label = SmsLabel::from_class(prediction.class);

        tracing::info!(
            "SMS scan: {} (risk {}, p={:.3})",
            label.as_str(),
            risk.as_str(),
            p_malicious
        );

        Ok(SmsVerdict {
            message: trimmed.to_string(),
            label,
            confidence: prediction.confidence,
            malicious_probability: p_malicious,
            risk,
        })
    }

    /// Best-effort explanation. A failing or absent engine degrades to the
    /// placeholder; it never fails the scan.
    fn reasons_for(&self, features: &UrlFeatureVector) -> Vec<String> {
        match &self.explainer {
            Some(engine) => match engine.attribute(features) {
                Ok(attribution) => explain::reasons(&attribution, DEFAULT_TOP_REASONS),
                Err(e) => {
                    tracing::warn!("Attribution failed: {}", e);
                    vec![EXPLANATION_UNAVAILABLE.to_string()]
                }
            },
            None => vec![EXPLANATION_UNAVAILABLE.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::Attribution;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scoring backend stub with a call counter, so tests can assert the
    /// short-circuit paths really skip the classifier.
    struct CountingModel {
        probabilities: Vec<f32>,
        calls: AtomicUsize,
    }

    impl CountingModel {
        fn new(probabilities: Vec<f32>) -> Self {
            Self {
                probabilities,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ProbabilityModel for CountingModel {
        fn predict_proba(&self, _input: &[f32]) -> Result<Vec<f32>, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.probabilities.clone())
        }
    }

    struct FailingModel;

    impl ProbabilityModel for FailingModel {
        fn predict_proba(&self, _input: &[f32]) -> Result<Vec<f32>, ModelError> {
            Err(ModelError::Inference("backend down".to_string()))
        }
    }

    struct FailingExplainer;

    impl AttributionEngine for FailingExplainer {
        fn attribute(&self, _features: &UrlFeatureVector) -> Result<Attribution, ExplainError> {
            Err(ExplainError::MissingClass)
        }
    }

    fn vectorizer() -> TfidfVectorizer {
        let vocabulary = HashMap::from([("win".to_string(), 0), ("cash".to_string(), 1)]);
        TfidfVectorizer::new(VectorizerArtifact {
            vocabulary,
            idf: vec![1.0, 1.0],
        })
        .unwrap()
    }

    fn engine_with(
        url_model: Arc<CountingModel>,
        sms_model: Arc<CountingModel>,
        whitelist: WhitelistSet,
    ) -> DetectionEngine {
        DetectionEngine::from_parts(url_model, sms_model, vectorizer(), whitelist, None)
    }

    #[test]
    fn test_whitelisted_url_bypasses_classifier() {
        // Model that would call everything phishing with full confidence.
        let url_model = Arc::new(CountingModel::new(vec![0.0, 1.0]));
        let sms_model = Arc::new(CountingModel::new(vec![1.0, 0.0]));
        let engine = engine_with(
            url_model.clone(),
            sms_model,
            WhitelistSet::from_entries(["google.com"]),
        );

        let verdict = engine.scan_url("https://mail.google.com/inbox").unwrap();
        assert_eq!(verdict.label, UrlLabel::Legitimate);
        assert!(verdict.whitelisted);
        assert_eq!(verdict.malicious_probability, 0.0);
        assert_eq!(verdict.risk, RiskLevel::Low);
        assert_eq!(verdict.reasons, vec![WHITELISTED_REASON.to_string()]);
        assert!(verdict.features.is_none());
        assert_eq!(url_model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_url_never_reaches_model() {
        let url_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let sms_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let engine = engine_with(url_model.clone(), sms_model.clone(), WhitelistSet::empty());

        assert!(matches!(engine.scan_url("   "), Err(ScanError::EmptyInput)));
        assert!(matches!(engine.scan_message(""), Err(ScanError::EmptyInput)));
        assert_eq!(url_model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(sms_model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scan_url_phishing_verdict() {
        let url_model = Arc::new(CountingModel::new(vec![0.2, 0.8]));
        let sms_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let engine = engine_with(url_model, sms_model, WhitelistSet::empty());

        let verdict = engine.scan_url("secure-login-update.com/account").unwrap();
        assert_eq!(verdict.url, "http://secure-login-update.com/account");
        assert_eq!(verdict.label, UrlLabel::Phishing);
        assert_eq!(verdict.confidence, 0.8);
        assert_eq!(verdict.risk, RiskLevel::High);
        assert!(!verdict.whitelisted);
        let features = verdict.features.unwrap();
        assert_eq!(features.get_by_name("Prefix_Suffix"), Some(1));
        // No explainer configured: single placeholder reason.
        assert_eq!(verdict.reasons, vec![EXPLANATION_UNAVAILABLE.to_string()]);
    }

    #[test]
    fn test_scan_url_safe_verdict_uses_residual_risk() {
        let url_model = Arc::new(CountingModel::new(vec![0.9, 0.1]));
        let sms_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let engine = engine_with(url_model, sms_model, WhitelistSet::empty());

        let verdict = engine.scan_url("https://example.com").unwrap();
        assert_eq!(verdict.label, UrlLabel::Legitimate);
        assert!((verdict.malicious_probability - 0.1).abs() < 1e-6);
        assert_eq!(verdict.risk, RiskLevel::Low);
    }

    #[test]
    fn test_scan_url_classifier_failure_propagates() {
        let engine = DetectionEngine::from_parts(
            Arc::new(FailingModel),
            Arc::new(FailingModel),
            vectorizer(),
            WhitelistSet::empty(),
            None,
        );
        assert!(matches!(
            engine.scan_url("http://example.com"),
            Err(ScanError::Model(_))
        ));
    }

    #[test]
    fn test_failing_explainer_degrades_to_placeholder() {
        let engine = DetectionEngine::from_parts(
            Arc::new(CountingModel::new(vec![0.3, 0.7])),
            Arc::new(CountingModel::new(vec![0.5, 0.5])),
            vectorizer(),
            WhitelistSet::empty(),
            Some(Box::new(FailingExplainer)),
        );
        let verdict = engine.scan_url("http://example.com").unwrap();
        assert_eq!(verdict.label, UrlLabel::Phishing);
        assert_eq!(verdict.reasons, vec![EXPLANATION_UNAVAILABLE.to_string()]);
    }

    #[test]
    fn test_scan_message_smishing_verdict() {
        let url_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let sms_model = Arc::new(CountingModel::new(vec![0.05, 0.95]));
        let engine = engine_with(url_model, sms_model, WhitelistSet::empty());

        let verdict = engine.scan_message("Win FREE cash NOW!!!").unwrap();
        assert_eq!(verdict.label, SmsLabel::Smishing);
        assert_eq!(verdict.confidence, 0.95);
        assert_eq!(verdict.risk, RiskLevel::High);
        assert_eq!(verdict.message, "Win FREE cash NOW!!!");
    }

    #[test]
    fn test_scan_message_not_smishing() {
        let url_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let sms_model = Arc::new(CountingModel::new(vec![0.85, 0.15]));
        let engine = engine_with(url_model, sms_model, WhitelistSet::empty());

        let verdict = engine.scan_message("See you at dinner tonight").unwrap();
        assert_eq!(verdict.label, SmsLabel::NotSmishing);
        assert!((verdict.malicious_probability - 0.15).abs() < 1e-6);
        assert_eq!(verdict.risk, RiskLevel::Low);
    }

    #[test]
    fn test_status_reports_parts() {
        let url_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let sms_model = Arc::new(CountingModel::new(vec![0.5, 0.5]));
        let engine = engine_with(
            url_model,
            sms_model,
            WhitelistSet::from_entries(["google.com", "paypal.com"]),
        );
        let status = engine.status();
        assert_eq!(status.whitelist_entries, 2);
        assert_eq!(status.vocabulary_size, 2);
        assert!(!status.explain_available);
        assert_eq!(status.layout.feature_count, 8);
    }

    #[test]
    fn test_load_rejects_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::under(dir.path());
        let mut file = std::fs::File::create(&paths.feature_schema).unwrap();
        write!(file, "{}", r#"["wrong_feature", "order"]"#).unwrap();

        let result = DetectionEngine::load(&paths, false);
        assert!(matches!(result, Err(ArtifactError::Schema(_))));
    }

    #[test]
    fn test_load_requires_feature_schema() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::under(dir.path());
        let result = DetectionEngine::load(&paths, false);
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }
}
