//! Fixed-order URL feature vector.

use serde::{Deserialize, Serialize};

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};

/// Ordered feature values for one URL.
///
/// Length and name order are fixed by [`FEATURE_LAYOUT`] and never vary per
/// input. Values are the small integer codes the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFeatureVector {
    values: [i32; FEATURE_COUNT],
}

impl UrlFeatureVector {
    pub fn from_values(values: [i32; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_array(&self) -> &[i32; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<i32> {
        feature_index(name).and_then(|index| self.get(index))
    }

    /// Projection used as classifier input.
    pub fn to_model_input(&self) -> [f32; FEATURE_COUNT] {
        let mut input = [0.0f32; FEATURE_COUNT];
        for (slot, value) in input.iter_mut().zip(self.values.iter()) {
            *slot = *value as f32;
        }
        input
    }

    /// Name/value pairs in schema order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name() {
        let vector = UrlFeatureVector::from_values([1, 0, -1, 1, -1, -1, 0, 1]);
        assert_eq!(vector.get_by_name("having_IPhaving_IP_Address"), Some(1));
        assert_eq!(vector.get_by_name("HTTPS_token"), Some(1));
        assert_eq!(vector.get_by_name("nonexistent"), None);
    }

    #[test]
    fn test_model_input_projection() {
        let vector = UrlFeatureVector::from_values([-1, 2, -1, -1, -1, 1, 0, -1]);
        let input = vector.to_model_input();
        assert_eq!(input.len(), FEATURE_COUNT);
        assert_eq!(input[0], -1.0);
        assert_eq!(input[1], 2.0);
        assert_eq!(input[5], 1.0);
    }

    #[test]
    fn test_named_preserves_schema_order() {
        let vector = UrlFeatureVector::from_values([0, 1, 2, 3, 4, 5, 6, 7]);
        let named: Vec<_> = vector.named().collect();
        assert_eq!(named[0], ("having_IPhaving_IP_Address", 0));
        assert_eq!(named[7], ("HTTPS_token", 7));
    }
}
