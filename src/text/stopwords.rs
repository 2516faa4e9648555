//! Stop-word set used by the normalizer
//!
//! The set is the union of the standard English stop-word list and the 26
//! single-letter strings, so stray letters left over from split contractions
//! ("don't" → "don", "t") never reach the corpus.

use std::collections::HashSet;

/// Standard English stop words. Contracted forms are omitted: the tokenizer
/// splits on apostrophes, so they can never appear as tokens.
const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn",
    "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// The stop-word set consulted by [`normalize`](crate::text::normalize)
///
/// Built once per run and shared by reference.
#[derive(Debug, Clone)]
pub struct StopWords {
    set: HashSet<String>,
}

impl StopWords {
    /// Builds the full stop-word set: English words plus single letters a-z
    pub fn new() -> Self {
        let mut set: HashSet<String> = ENGLISH.iter().map(|w| w.to_string()).collect();
        for c in 'a'..='z' {
            set.insert(c.to_string());
        }
        Self { set }
    }

    /// Returns true if `word` is excluded from normalized output
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word)
    }

    /// Number of words in the set
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns true if the set is empty (never, in practice)
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new()
    }
}
