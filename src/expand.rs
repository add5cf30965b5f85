//! Turning signature combinations into concrete sentences.

use itertools::{Either, Itertools};

use crate::dictionary::{SignatureDictionary, SignatureId};
use crate::error::Result;

pub const WORD_SEPARATOR: &str = " ";

#[derive(Clone, Copy)]
pub struct SentenceExpander<'d> {
    dictionary: &'d SignatureDictionary,
}

impl<'d> SentenceExpander<'d> {
    pub fn new(dictionary: &'d SignatureDictionary) -> SentenceExpander<'d> {
        SentenceExpander { dictionary }
    }

    /// Every sentence that picks one word per slot, slots kept in order.
    ///
    /// The first slot varies slowest. An empty combination gives exactly one
    /// empty sentence.
    pub fn expand(
        &self,
        combination: &[SignatureId],
    ) -> Result<impl Iterator<Item = String> + 'd> {
        if combination.is_empty() {
            return Ok(Either::Left(std::iter::once(String::new())));
        }
        let dictionary = self.dictionary;
        let slots = combination
            .iter()
            .map(|&id| dictionary.words_for(id).map(|words| words.iter()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Either::Right(
            slots
                .into_iter()
                .multi_cartesian_product()
                .map(|words| words.iter().join(WORD_SEPARATOR)),
        ))
    }

    /// How many sentences [`expand`] would yield, without building them.
    ///
    /// [`expand`]: SentenceExpander::expand
    pub fn sentence_count(&self, combination: &[SignatureId]) -> Result<u128> {
        combination.iter().try_fold(1u128, |n, &id| {
            let words = self.dictionary.words_for(id)?;
            Ok(n.saturating_mul(words.len() as u128))
        })
    }
}
