//! Configuration module

use std::env;
use std::path::PathBuf;

use phishguard_core::ArtifactPaths;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the model/schema/whitelist artifacts
    pub artifact_dir: PathBuf,

    /// Attribution capability flag; off degrades explanations to the
    /// placeholder and skips the background-sample artifact
    pub explain_enabled: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            artifact_dir: env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("artifacts")),

            explain_enabled: env::var("EXPLAIN_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::under(&self.artifact_dir)
    }
}
