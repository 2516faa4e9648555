//! Text normalization: raw abstract text → labeled token row
//!
//! The pipeline is deterministic and order-preserving:
//!
//! 1. Tokenize into maximal alphanumeric runs
//! 2. Drop the first token (boilerplate header word, e.g. "Abstract")
//! 3. Keep only fully-alphabetic tokens, lowercased
//! 4. Drop stop words
//! 5. Prepend the category code
//!
//! The result is never empty: it contains at minimum the category label.

use crate::text::StopWords;

/// Splits text into maximal runs of alphanumeric characters, in order
///
/// Punctuation and whitespace act as separators and are discarded, so
/// "model, fitted" yields `["model", "fitted"]` and "don't" yields
/// `["don", "t"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Normalizes abstract text into a labeled token row
///
/// The first element of the returned row is always `category`; every
/// following element is a lowercase alphabetic content word that is not a
/// stop word. Identical inputs always produce identical rows.
///
/// # Arguments
///
/// * `text` - Raw abstract text, including its boilerplate header word
/// * `category` - Two-character category code, prepended as the label
/// * `stop_words` - The stop-word set to filter against
pub fn normalize(text: &str, category: &str, stop_words: &StopWords) -> Vec<String> {
    let tokens = tokenize(text);

    // Skip the header token, keep alphabetic words lowercased
    let words = tokens
        .iter()
        .skip(1)
        .filter(|t| t.chars().all(char::is_alphabetic))
        .map(|t| t.to_lowercase())
        .filter(|w| !stop_words.contains(w));

    let mut row = vec![category.to_string()];
    row.extend(words);
    row
}
