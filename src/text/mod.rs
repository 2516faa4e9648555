//! Text processing: tokenization, stop words, and normalization
//!
//! Turns the raw abstract text extracted from a document page into the
//! labeled token row that gets appended to the corpus.

mod normalize;
mod stopwords;

pub use normalize::{normalize, tokenize};
pub use stopwords::StopWords;
