//! URL feature extraction.
//!
//! Fixed-schema lexical/structural feature derivation. `layout` is the
//! single source of truth for ordering; `rules` derives the values;
//! `vector` is the ordered container handed to the classifier.

pub mod layout;
pub mod rules;
pub mod vector;

pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use rules::extract;
pub use vector::UrlFeatureVector;
