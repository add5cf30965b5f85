//! Depth-first enumeration of signature sequences that use up a histogram.
//!
//! Each node of the search holds the letters still unused. From a node we try
//! every signature small enough to fit (the dictionary indexes them by size)
//! and descend into the ones the remaining letters dominate. A node whose
//! remainder is zero is a finished combination; a node that already holds
//! `max_words` signatures and still has letters left is abandoned.
//!
//! The walk keeps its own stack so callers can pull combinations one at a
//! time and stop whenever they like.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::trace;

use crate::dictionary::{SignatureDictionary, SignatureId};
use crate::histogram::LetterHistogram;

/// Ordered signatures whose histograms add up to the phrase.
pub type Combination = Vec<SignatureId>;

/// Cooperative cancellation shared by a search, its stream and its workers.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

struct Frame<'d> {
    remaining: LetterHistogram,
    candidates: &'d [SignatureId],
    next: usize,
}

pub struct Combinations<'d> {
    dictionary: &'d SignatureDictionary,
    max_words: usize,
    root: Option<LetterHistogram>,
    path: Vec<SignatureId>,
    stack: Vec<Frame<'d>>,
    nodes: u64,
    stop: Option<StopHandle>,
}

impl<'d> Combinations<'d> {
    /// Searches from `start`, which must only use the dictionary's alphabet.
    pub fn new(
        dictionary: &'d SignatureDictionary,
        start: LetterHistogram,
        max_words: usize,
    ) -> Combinations<'d> {
        Combinations {
            dictionary,
            max_words,
            root: Some(start),
            path: Vec::new(),
            stack: Vec::new(),
            nodes: 0,
            stop: None,
        }
    }

    /// Ends the search as soon as `stop` is set, even between results.
    pub fn with_stop(mut self, stop: StopHandle) -> Combinations<'d> {
        self.stop = Some(stop);
        self
    }

    fn is_stopped(&self) -> bool {
        self.stop.as_ref().map_or(false, StopHandle::is_stopped)
    }

    fn abandon(&mut self) {
        trace!("search stopped after {} nodes", self.nodes);
        self.root = None;
        self.stack.clear();
        self.path.clear();
    }

    /// Search nodes entered so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn descend(&mut self, remaining: LetterHistogram) -> Option<Combination> {
        self.nodes += 1;
        if remaining.is_zero() {
            return Some(self.path.clone());
        }
        if self.path.len() < self.max_words {
            let candidates = self.dictionary.signatures_usable_within(remaining.total());
            self.stack.push(Frame {
                remaining,
                candidates,
                next: 0,
            });
        }
        None
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.is_stopped() {
            self.abandon();
            return None;
        }
        if let Some(root) = self.root.take() {
            if let Some(found) = self.descend(root) {
                return Some(found);
            }
        }

        let dictionary = self.dictionary;
        let stop = self.stop.clone();
        loop {
            let frame = self.stack.last_mut()?;

            let mut child = None;
            let mut stopped = false;
            while let Some(&id) = frame.candidates.get(frame.next) {
                if stop.as_ref().map_or(false, StopHandle::is_stopped) {
                    stopped = true;
                    break;
                }
                frame.next += 1;
                let histogram = dictionary.histogram(id);
                if frame.remaining.dominates(histogram) {
                    child = Some((id, frame.remaining.subtract(histogram)));
                    break;
                }
            }

            if stopped {
                self.abandon();
                return None;
            }

            match child {
                Some((id, remaining)) => {
                    self.path.push(id);
                    let depth = self.stack.len();
                    let found = self.descend(remaining);
                    // leaf: nothing pushed, so undo the step right away
                    if self.stack.len() == depth {
                        self.path.pop();
                    }
                    if found.is_some() {
                        return found;
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                    if self.stack.is_empty() {
                        trace!("search finished after {} nodes", self.nodes);
                    }
                }
            }
        }
    }
}

impl FusedIterator for Combinations<'_> {}

/// All combinations for the dictionary's own phrase.
pub fn combinations(dictionary: &SignatureDictionary, max_words: usize) -> Combinations<'_> {
    Combinations::new(dictionary, *dictionary.phrase(), max_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_combinations(dict: &SignatureDictionary, max_words: usize) -> Vec<Vec<String>> {
        let mut out = combinations(dict, max_words)
            .map(|c| c.iter().map(|&id| dict.key_text(id).unwrap()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        out.sort();
        out
    }

    #[test]
    fn finds_both_orders_of_a_pair() {
        let dict = SignatureDictionary::build(&["a", "tea", "ate", "eat"], "aaet", 1).unwrap();
        assert_eq!(
            key_combinations(&dict, 4),
            vec![vec!["a", "aet"], vec!["aet", "a"]]
        );
    }

    #[test]
    fn respects_max_words() {
        let dict = SignatureDictionary::build(&["a"], "aaa", 1).unwrap();
        assert_eq!(key_combinations(&dict, 3), vec![vec!["a", "a", "a"]]);
        assert!(key_combinations(&dict, 2).is_empty());

        let dict = SignatureDictionary::build(&["a", "tea"], "aaet", 1).unwrap();
        assert!(key_combinations(&dict, 1).is_empty());
    }

    #[test]
    fn zero_max_words_only_matches_empty_phrase() {
        let dict = SignatureDictionary::build(&["a"], "a", 1).unwrap();
        assert_eq!(combinations(&dict, 0).count(), 0);

        let dict = SignatureDictionary::build(&["a"], "", 1).unwrap();
        assert_eq!(combinations(&dict, 0).collect::<Vec<_>>(), vec![vec![]]);
    }

    #[test]
    fn no_fitting_words_yields_nothing() {
        let dict = SignatureDictionary::build(&["abc", "bad", "dab"], "abcd", 4).unwrap();
        assert!(dict.is_empty());
        assert_eq!(combinations(&dict, 4).count(), 0);
    }

    #[test]
    fn every_combination_spends_the_whole_phrase() {
        let words = ["a", "i", "at", "it", "ti", "tea", "tie", "eat", "ate", "tit", "tat"];
        let dict = SignatureDictionary::build(&words, "tea tit a", 1).unwrap();
        let mut count = 0;
        for combination in combinations(&dict, 5) {
            let mut remaining = *dict.phrase();
            for &id in &combination {
                let h = dict.signature(id).unwrap().histogram();
                assert!(remaining.dominates(h));
                remaining = remaining.subtract(h);
            }
            assert!(remaining.is_zero());
            assert!(combination.len() <= 5);
            count += 1;
        }
        assert!(count > 0);
    }

    #[test]
    fn iterator_stays_exhausted() {
        let dict = SignatureDictionary::build(&["a"], "a", 1).unwrap();
        let mut search = combinations(&dict, 2);
        assert!(search.next().is_some());
        assert!(search.next().is_none());
        assert!(search.next().is_none());
        assert!(search.nodes() >= 2);
    }

    #[test]
    fn stop_ends_a_fruitless_search() {
        // no word covers the 'q', so the walk over the 'a's never yields
        let phrase = format!("q{}", "a".repeat(40));
        let dict = SignatureDictionary::build(&["a", "aa", "aaa"], &phrase, 1).unwrap();
        let stop = StopHandle::default();
        let mut search = combinations(&dict, 41).with_stop(stop.clone());
        stop.stop();
        assert!(search.next().is_none());
        assert!(search.next().is_none());
        assert!(search.nodes() <= 1);
    }

    #[test]
    fn stop_is_observed_mid_search() {
        let dict = SignatureDictionary::build(&["a", "aa"], "aaaa", 1).unwrap();
        let stop = StopHandle::default();
        let mut search = combinations(&dict, 4).with_stop(stop.clone());
        assert!(search.next().is_some());
        stop.stop();
        assert!(search.next().is_none());
        assert!(search.stack.is_empty());
        assert!(search.next().is_none());
    }
}
