//! Central configuration constants
//!
//! Single source of truth for the pipeline's fixed values.

/// Class index the training side assigned to the malicious class
/// (phishing on the URL path, smishing on the SMS path).
pub const MALICIOUS_CLASS: usize = 1;

/// Class index of the safe class.
pub const SAFE_CLASS: usize = 0;

/// Known URL shortening services, matched as substrings of the lowercased URL.
pub const SHORTENING_SERVICES: &[&str] = &["bit.ly", "tinyurl.com", "goo.gl", "t.co"];

/// Reason attached to whitelist short-circuit verdicts.
pub const WHITELISTED_REASON: &str = "Whitelisted trusted domain";

/// Placeholder reason when attribution is unavailable or fails.
pub const EXPLANATION_UNAVAILABLE: &str = "Explanation unavailable";

/// How many top attribution entries are rendered into risk reasons.
pub const DEFAULT_TOP_REASONS: usize = 3;
