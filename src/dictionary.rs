//! Word list reduced to the signatures that can take part in one phrase.

use std::collections::hash_map::Entry;
use std::fmt;

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::histogram::{letters, Alphabet, LetterHistogram};

/// One-letter words that survive regardless of `min_word_length`.
pub const SINGLE_LETTER_WORDS: [&str; 3] = ["a", "i", "o"];

/// Index of a signature in the dictionary that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId(u32);

impl SignatureId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(i: usize) -> SignatureId {
        SignatureId(i as u32)
    }
}

impl fmt::Display for SignatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Letter-count identity shared by all anagrams of a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WordSignature {
    histogram: LetterHistogram,
    total: usize,
}

impl WordSignature {
    pub fn new(histogram: LetterHistogram) -> WordSignature {
        WordSignature {
            total: histogram.total(),
            histogram,
        }
    }

    pub fn histogram(&self) -> &LetterHistogram {
        &self.histogram
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Signatures of every usable word, their surface forms, and a per-size
/// index of which signatures can still fit.
///
/// Built once per phrase and read-only afterwards.
pub struct SignatureDictionary {
    alphabet: Alphabet,
    phrase: LetterHistogram,
    signatures: Vec<WordSignature>,
    words: Vec<Vec<String>>,
    ids: FxHashMap<LetterHistogram, SignatureId>,
    usable_within: Vec<Vec<SignatureId>>,
}

impl SignatureDictionary {
    pub fn build<S: AsRef<str>>(
        wordlist: &[S],
        phrase: &str,
        min_word_length: usize,
    ) -> Result<SignatureDictionary> {
        let alphabet = Alphabet::from_text(phrase);
        let phrase = LetterHistogram::from_text(&alphabet, phrase)?;

        let mut seen = FxHashSet::default();
        let mut signatures: Vec<WordSignature> = Vec::new();
        let mut words: Vec<Vec<String>> = Vec::new();
        let mut ids: FxHashMap<LetterHistogram, SignatureId> = FxHashMap::default();

        for word in wordlist.iter().map(|w| w.as_ref().trim().to_lowercase()) {
            if !is_candidate(&word, &alphabet, min_word_length) || seen.contains(&word) {
                continue;
            }
            let histogram = match LetterHistogram::from_text(&alphabet, &word) {
                Ok(h) => h,
                // more of one letter than any phrase can hold
                Err(Error::CountOverflow { .. }) => {
                    trace!("skipping oversized word {word:?}");
                    continue;
                }
                Err(e) => return Err(e),
            };
            // zero-letter signatures would let the search extend a finished path
            if histogram.is_zero() {
                continue;
            }
            seen.insert(word.clone());

            match ids.entry(histogram) {
                Entry::Occupied(e) => words[e.get().index()].push(word),
                Entry::Vacant(e) => {
                    e.insert(SignatureId::from_index(signatures.len()));
                    signatures.push(WordSignature::new(histogram));
                    words.push(vec![word]);
                }
            }
        }

        let usable_within: Vec<Vec<SignatureId>> = (0..=phrase.total())
            .map(|k| {
                signatures
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.total <= k)
                    .map(|(i, _)| SignatureId::from_index(i))
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(
            "reduced {} words to {} forms in {} signatures over {:?}",
            wordlist.len(),
            seen.len(),
            signatures.len(),
            alphabet
        );

        Ok(SignatureDictionary {
            alphabet,
            phrase,
            signatures,
            words,
            ids,
            usable_within,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Histogram of the cleaned phrase this dictionary was built for.
    pub fn phrase(&self) -> &LetterHistogram {
        &self.phrase
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Number of distinct surface words across all signatures.
    pub fn word_count(&self) -> usize {
        self.words.iter().map(Vec::len).sum()
    }

    pub fn signature(&self, id: SignatureId) -> Option<&WordSignature> {
        self.signatures.get(id.index())
    }

    /// Histogram of an id handed out by this dictionary.
    pub(crate) fn histogram(&self, id: SignatureId) -> &LetterHistogram {
        &self.signatures[id.index()].histogram
    }

    pub fn lookup(&self, histogram: &LetterHistogram) -> Option<SignatureId> {
        self.ids.get(histogram).copied()
    }

    pub fn words_for(&self, id: SignatureId) -> Result<&[String]> {
        self.words
            .get(id.index())
            .map(Vec::as_slice)
            .ok_or(Error::UnknownSignature(id))
    }

    /// Signatures with at most `total` letters, in insertion order.
    pub fn signatures_usable_within(&self, total: usize) -> &[SignatureId] {
        let k = total.min(self.usable_within.len() - 1);
        &self.usable_within[k]
    }

    /// The sorted-letter key of a signature, e.g. `"aet"` for "tea".
    pub fn key_text(&self, id: SignatureId) -> Result<String> {
        self.signature(id)
            .map(|s| s.histogram.to_text(&self.alphabet))
            .ok_or(Error::UnknownSignature(id))
    }
}

/// `word` is already trimmed and lowercased.
fn is_candidate(word: &str, alphabet: &Alphabet, min_word_length: usize) -> bool {
    if !word.bytes().all(|b| b.is_ascii_lowercase() || b == b'\'') {
        return false;
    }
    let long_enough = match letters(word).count() {
        0 => false,
        1 => SINGLE_LETTER_WORDS.contains(&word),
        n => n >= min_word_length,
    };
    long_enough && letters(word).all(|b| alphabet.contains(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(dict: &SignatureDictionary, ids: &[SignatureId]) -> Vec<String> {
        ids.iter().map(|&id| dict.key_text(id).unwrap()).collect()
    }

    #[test]
    fn groups_anagrams_under_one_signature() {
        let dict = SignatureDictionary::build(&["a", "tea", "ate", "eat"], "aaet", 1).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.word_count(), 4);

        let aet = LetterHistogram::from_text(dict.alphabet(), "aet").unwrap();
        let id = dict.lookup(&aet).unwrap();
        assert_eq!(dict.words_for(id).unwrap(), ["tea", "ate", "eat"]);
        assert_eq!(dict.key_text(id).unwrap(), "aet");
        assert_eq!(dict.signature(id).unwrap().total(), 3);
    }

    #[test]
    fn filters_words_that_cannot_be_spelled() {
        let words = ["Tea ", "TEA", "tax", "x", "e", "i", "at", "ta-ta", "ea't", ""];
        let dict = SignatureDictionary::build(&words, "a tea", 1).unwrap();
        let mut all = (0..dict.len())
            .flat_map(|i| dict.words_for(SignatureId::from_index(i)).unwrap().to_vec())
            .collect::<Vec<_>>();
        all.sort();
        // "i" is whitelisted but not in the phrase, "e" is not whitelisted
        assert_eq!(all, ["at", "ea't", "tea"]);
    }

    #[test]
    fn min_word_length_keeps_whitelisted_single_letters() {
        let dict = SignatureDictionary::build(&["a", "at", "ate", "tate"], "a tate", 3).unwrap();
        let all = (0..dict.len())
            .flat_map(|i| dict.words_for(SignatureId::from_index(i)).unwrap().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(all, ["a", "ate", "tate"]);
    }

    #[test]
    fn apostrophes_do_not_count_towards_length() {
        let dict = SignatureDictionary::build(&["don't"], "dont", 5).unwrap();
        assert!(dict.is_empty());

        let dict = SignatureDictionary::build(&["don't"], "dont", 4).unwrap();
        assert_eq!(dict.word_count(), 1);
        assert_eq!(dict.key_text(SignatureId::from_index(0)).unwrap(), "dnot");
    }

    #[test]
    fn usable_within_indexes_by_size() {
        let dict = SignatureDictionary::build(&["a", "at", "tea", "teat"], "a teat", 1).unwrap();
        assert!(dict.signatures_usable_within(0).is_empty());
        assert_eq!(keys(&dict, dict.signatures_usable_within(1)), ["a"]);
        assert_eq!(keys(&dict, dict.signatures_usable_within(3)), ["a", "at", "aet"]);
        assert_eq!(dict.signatures_usable_within(5).len(), 4);
        assert_eq!(dict.signatures_usable_within(100).len(), 4);
    }

    #[test]
    fn unknown_signature_is_reported() {
        let dict = SignatureDictionary::build(&["a"], "a", 1).unwrap();
        let missing = SignatureId::from_index(7);
        assert!(matches!(
            dict.words_for(missing),
            Err(Error::UnknownSignature(id)) if id == missing
        ));
        assert!(dict.key_text(missing).is_err());
    }

    #[test]
    fn empty_phrase_builds_empty_dictionary() {
        let dict = SignatureDictionary::build(&["a", "tea"], "  ", 1).unwrap();
        assert!(dict.is_empty());
        assert!(dict.phrase().is_zero());
        assert!(dict.signatures_usable_within(0).is_empty());
    }
}
