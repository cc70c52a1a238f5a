//! Text normalization
//!
//! The crawler only depends on the [`Tokenizer`] trait; `StopWordTokenizer`
//! is the default implementation. Grammatical-category filtering can be
//! layered on by supplying another `Tokenizer`.

mod tokenizer;

pub use tokenizer::{StopWordTokenizer, Tokenizer, ENGLISH_STOP_WORDS};
