//! SMS message preprocessing.
//!
//! The cleaning pipeline is strictly ordered: lowercase, alphanumeric
//! tokenization, stop-word removal, Porter-style stemming, single-space
//! join. It is total and deterministic; an empty message yields an empty
//! string.

use rust_stemmers::{Algorithm, Stemmer};

use super::stopwords::is_stop_word;

/// Clean a raw message into the space-joined token string the vectorizer
/// consumes.
pub fn preprocess(message: &str) -> String {
    let stemmer = Stemmer::create(Algorithm::English);
    let lowered = message.to_lowercase();
    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| !is_stop_word(token))
        .map(|token| stemmer.stem(token).into_owned())
        .collect();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(preprocess("Win FREE cash NOW!!!"), "win free cash");
    }

    #[test]
    fn test_drops_stop_words() {
        let cleaned = preprocess("You have a prize waiting for you");
        assert!(!cleaned.contains("you"));
        assert!(!cleaned.contains(" a "));
        assert!(cleaned.contains("prize"));
    }

    #[test]
    fn test_stems_tokens() {
        assert_eq!(preprocess("winning prizes"), "win prize");
        assert_eq!(preprocess("claimed rewards"), "claim reward");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(preprocess(""), "");
        assert_eq!(preprocess("!!! ... ???"), "");
    }

    #[test]
    fn test_deterministic() {
        let message = "URGENT! Your account has been suspended, verify immediately.";
        assert_eq!(preprocess(message), preprocess(message));
    }

    #[test]
    fn test_numbers_survive() {
        let cleaned = preprocess("Text WIN to 80085 today");
        assert!(cleaned.contains("80085"));
    }
}
