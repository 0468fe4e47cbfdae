//! Classification: the scoring contract, the ONNX backend, and risk
//! bucketing.

pub mod classifier;
pub mod risk;

pub use classifier::{predict, OnnxModel, Prediction, ProbabilityModel};
pub use risk::RiskLevel;
