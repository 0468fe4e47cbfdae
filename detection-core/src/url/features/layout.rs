//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the URL feature schema.**
//!
//! The vector order here must exactly match the order the classifier was
//! trained on. The feature-schema artifact shipped next to the model is
//! checked against this layout once at startup; a mismatch is fatal because
//! predictions over a reordered vector are meaningless.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Current feature layout version. Incremented whenever a feature is added,
/// removed, or reordered.
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in the exact order they appear in the vector.
pub const FEATURE_LAYOUT: &[&str] = &[
    "having_IPhaving_IP_Address", // 0: dotted-quad pattern anywhere in the URL
    "URLURL_Length",              // 1: total-length bucket
    "Shortining_Service",         // 2: known shortener substring
    "having_At_Symbol",           // 3: '@' anywhere in the URL
    "double_slash_redirecting",   // 4: '//' inside the path component
    "Prefix_Suffix",              // 5: '-' in the host
    "having_Sub_Domain",          // 6: dot-count bucket of the host
    "HTTPS_token",                // 7: https scheme prefix
];

/// Total number of features. Must match FEATURE_LAYOUT.len().
pub const FEATURE_COUNT: usize = 8;

/// Human-readable labels, index-aligned with FEATURE_LAYOUT.
pub const DISPLAY_LABELS: &[&str] = &[
    "IP Address",
    "URL Length",
    "Shortening Service",
    "@ Symbol",
    "Double Slash Redirect",
    "Prefix/Suffix",
    "Sub-Domain",
    "HTTPS Token",
];

/// Compute CRC32 hash of the feature layout, used to surface layout
/// identity in the engine status.
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Get the display label for a feature index
pub fn display_label(index: usize) -> Option<&'static str> {
    DISPLAY_LABELS.get(index).copied()
}

/// Complete layout information for the status endpoint and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Error when the feature-schema artifact disagrees with this layout.
#[derive(Debug, Clone, thiserror::Error)]
#[error("feature schema mismatch: artifact lists {actual:?}, layout expects {expected:?}")]
pub struct SchemaMismatchError {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Validate the ordered names loaded from the feature-schema artifact.
/// Length and name order must both match exactly.
pub fn validate_schema(names: &[String]) -> Result<(), SchemaMismatchError> {
    let matches = names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT.iter()).all(|(a, b)| a == b);
    if matches {
        Ok(())
    } else {
        Err(SchemaMismatchError {
            expected: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            actual: names.to_vec(),
        })
    }
}
