//! Letter multisets as fixed-width count vectors.
//!
//! An [`Alphabet`] is fixed once per run from the target phrase: its distinct
//! letters in ascending order. A [`LetterHistogram`] stores one count per
//! alphabet slot, so comparing, subtracting and summing are plain loops over a
//! small array instead of string work.

use std::fmt;

use itertools::Itertools;

use crate::error::{Error, Result};

/// Upper bound on alphabet size: the lowercase ASCII letters.
pub const MAX_LETTERS: usize = 26;

/// Lowercased ASCII letters of `text`; everything else is dropped.
pub fn letters(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase)
        .map(|c| c as u8)
}

#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<u8>,
    slots: [Option<u8>; MAX_LETTERS],
}

impl Alphabet {
    /// The distinct letters of `seed`, sorted.
    pub fn from_text(seed: &str) -> Alphabet {
        let letters = letters(seed).sorted().dedup().collect_vec();
        let mut slots = [None; MAX_LETTERS];
        for (slot, b) in letters.iter().enumerate() {
            slots[(b - b'a') as usize] = Some(slot as u8);
        }
        Alphabet { letters, slots }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letters(&self) -> &[u8] {
        &self.letters
    }

    /// `letter` must be a lowercase ASCII letter.
    pub fn contains(&self, letter: u8) -> bool {
        self.slot(letter).is_some()
    }

    fn slot(&self, letter: u8) -> Option<usize> {
        debug_assert!(letter.is_ascii_lowercase());
        self.slots[(letter - b'a') as usize].map(usize::from)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet({})", String::from_utf8_lossy(&self.letters))
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterHistogram {
    counts: [u8; MAX_LETTERS],
}

impl LetterHistogram {
    pub const ZERO: LetterHistogram = LetterHistogram {
        counts: [0; MAX_LETTERS],
    };

    /// Counts the letters of `text` against `alphabet`. Case is folded and
    /// non-letters (spaces, apostrophes, punctuation) are skipped.
    pub fn from_text(alphabet: &Alphabet, text: &str) -> Result<LetterHistogram> {
        let mut counts = [0u8; MAX_LETTERS];
        for letter in letters(text) {
            let slot = alphabet.slot(letter).ok_or_else(|| Error::InvalidCharacter {
                letter: letter as char,
                text: text.to_owned(),
            })?;
            counts[slot] = counts[slot].checked_add(1).ok_or(Error::CountOverflow {
                letter: letter as char,
            })?;
        }
        Ok(LetterHistogram { counts })
    }

    /// Builds a histogram from leading slot counts; the rest are zero.
    ///
    /// # Panics
    ///
    /// If more than [`MAX_LETTERS`] counts are given.
    pub fn from_counts(counts: &[u8]) -> LetterHistogram {
        assert!(counts.len() <= MAX_LETTERS, "too many histogram slots");
        let mut h = LetterHistogram::ZERO;
        h.counts[..counts.len()].copy_from_slice(counts);
        h
    }

    pub fn counts(&self) -> &[u8; MAX_LETTERS] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Whether `other` can be subtracted from `self`.
    pub fn dominates(&self, other: &LetterHistogram) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .all(|(a, b)| a >= b)
    }

    /// Component-wise difference. Callers must check [`dominates`] first.
    ///
    /// [`dominates`]: LetterHistogram::dominates
    pub fn subtract(&self, other: &LetterHistogram) -> LetterHistogram {
        debug_assert!(self.dominates(other), "{self:?} - {other:?}");
        let mut counts = self.counts;
        for (c, o) in counts.iter_mut().zip(other.counts.iter()) {
            *c -= o;
        }
        LetterHistogram { counts }
    }

    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Letters in alphabet order, each repeated by its count.
    pub fn to_text(&self, alphabet: &Alphabet) -> String {
        alphabet
            .letters()
            .iter()
            .zip(self.counts.iter())
            .flat_map(|(&letter, &n)| std::iter::repeat(letter as char).take(n as usize))
            .collect()
    }
}

impl fmt::Debug for LetterHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self
            .counts
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        write!(f, "LetterHistogram({:?})", &self.counts[..used])
    }
}
