//! PhishGuard detection core.
//!
//! Deterministic feature extraction, whitelist override, classification
//! contract, and attribution-to-text explanation shared by the URL-phishing
//! and SMS-smishing scan paths. The HTTP surface lives in the
//! `phishguard-api` crate.
//!
//! All process-wide state (models, feature schema, whitelist, attribution
//! baseline) is loaded once at startup into a [`DetectionEngine`] and shared
//! read-only across requests; everything else is request-scoped.

pub mod constants;
pub mod engine;
pub mod explain;
pub mod model;
pub mod text;
pub mod url;

pub use engine::{
    ArtifactError, ArtifactPaths, DetectionEngine, EngineStatus, ScanError, SmsLabel, SmsVerdict,
    UrlLabel, UrlVerdict,
};
pub use model::classifier::{Prediction, ProbabilityModel};
pub use model::risk::RiskLevel;
