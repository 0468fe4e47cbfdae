//! URL subsystem: normalization, trusted-domain whitelist, feature extraction.

pub mod features;
pub mod normalize;
pub mod whitelist;

pub use normalize::{ensure_scheme, normalize};
pub use whitelist::WhitelistSet;
