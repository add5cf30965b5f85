//! Sentence anagrams: every way to spell a phrase's letters as a sequence of
//! dictionary words.
//!
//! Words are reduced to letter-count signatures over the phrase's alphabet,
//! a backtracking search finds signature sequences that use up every letter,
//! and each sequence is expanded into sentences by picking one word per
//! signature.
//!
//! ```no_run
//! let words = ["a", "tea", "ate", "eat"];
//! for sentence in sentence_anagrams::generate("aaet", &words, 1, 2)? {
//!     println!("{sentence}");
//! }
//! # Ok::<(), sentence_anagrams::Error>(())
//! ```

pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod expand;
pub mod histogram;
pub mod search;
pub mod wordlist;

pub use config::GeneratorConfig;
pub use dictionary::{SignatureDictionary, SignatureId, WordSignature};
pub use engine::{generate, GenerationSummary, Generator, Sentences, Session};
pub use error::{Error, Result};
pub use expand::SentenceExpander;
pub use histogram::{Alphabet, LetterHistogram};
pub use search::{Combination, Combinations, StopHandle};
