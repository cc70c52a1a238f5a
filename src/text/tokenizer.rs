use crate::config::TextConfig;
use std::collections::HashSet;

/// English stop words dropped by default
pub const ENGLISH_STOP_WORDS: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Turns raw text into an ordered sequence of normalized tokens
///
/// Implementations must be deterministic and free of side effects; the
/// crawler calls them from many workers at once.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits on non-word characters, lower-cases, and drops stop words
#[derive(Debug, Clone)]
pub struct StopWordTokenizer {
    stop_words: HashSet<String>,
    min_token_length: usize,
}

impl StopWordTokenizer {
    /// Tokenizer using the built-in English stop words
    pub fn new() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            min_token_length: 1,
        }
    }

    /// Tokenizer that keeps every word
    pub fn without_stop_words() -> Self {
        Self {
            stop_words: HashSet::new(),
            min_token_length: 1,
        }
    }

    /// Builds the tokenizer described by the `[text]` config section
    pub fn from_config(config: &TextConfig) -> Self {
        Self::new()
            .with_stop_words(config.extra_stop_words.iter().map(String::as_str))
            .with_min_token_length(config.min_token_length)
    }

    /// Adds stop words (case-insensitive)
    pub fn with_stop_words<'a, I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.trim().to_lowercase()));
        self
    }

    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length.max(1);
        self
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

impl Default for StopWordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for StopWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !Self::is_word_char(c))
            .filter(|raw| !raw.is_empty())
            .map(str::to_lowercase)
            .filter(|token| token.chars().count() >= self.min_token_length)
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }
}
