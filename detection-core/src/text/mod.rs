//! SMS text subsystem: preprocessing and TF-IDF vectorization.

pub mod preprocess;
pub mod stopwords;
pub mod vectorizer;

pub use preprocess::preprocess;
pub use vectorizer::TfidfVectorizer;
