//! Wiring dictionary, search and expansion into a lazy sentence stream.
//!
//! The search runs on a background thread and feeds finished combinations to
//! a dedicated rayon pool through `par_bridge`. Each worker expands its own
//! combination and pushes sentences into a bounded channel, so nothing is
//! produced much faster than the caller reads it. Dropping the stream (or
//! calling [`StopHandle::stop`]) makes the search give up at its next
//! candidate and every worker at its next sentence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::GeneratorConfig;
use crate::dictionary::{SignatureDictionary, SignatureId};
use crate::error::{Error, Result};
use crate::expand::SentenceExpander;
use crate::histogram::LetterHistogram;
use crate::search::{combinations, Combinations, StopHandle};

/// Owns a word list and turns phrases into sentence streams.
pub struct Generator {
    wordlist: Vec<String>,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new<I, S>(wordlist: I, config: GeneratorConfig) -> Generator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Generator {
            wordlist: wordlist.into_iter().map(Into::into).collect(),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Reduces the word list for `phrase` without starting any work.
    pub fn prepare(&self, phrase: &str) -> Result<Session> {
        let dictionary = SignatureDictionary::build(
            self.wordlist.as_slice(),
            phrase,
            self.config.min_word_length,
        )?;
        Ok(Session {
            dictionary: Arc::new(dictionary),
            config: self.config.clone(),
        })
    }

    pub fn generate(&self, phrase: &str) -> Result<Sentences> {
        self.prepare(phrase)?.sentences()
    }
}

/// Every sentence anagram of `phrase` using at most `max_words` words.
pub fn generate<S: AsRef<str>>(
    phrase: &str,
    wordlist: &[S],
    min_word_length: usize,
    max_words: usize,
) -> Result<Sentences> {
    let config = GeneratorConfig::default()
        .with_min_word_length(min_word_length)
        .with_max_words(max_words);
    let dictionary = SignatureDictionary::build(wordlist, phrase, min_word_length)?;
    spawn(Arc::new(dictionary), &config)
}

/// A dictionary prepared for one phrase.
pub struct Session {
    dictionary: Arc<SignatureDictionary>,
    config: GeneratorConfig,
}

impl Session {
    pub fn dictionary(&self) -> &SignatureDictionary {
        &self.dictionary
    }

    pub fn phrase_histogram(&self) -> &LetterHistogram {
        self.dictionary.phrase()
    }

    /// Sequential, lazy combination search.
    pub fn combinations(&self) -> Combinations<'_> {
        combinations(&self.dictionary, self.config.max_words)
    }

    /// Combinations spelled as sorted-letter keys, e.g. `["a", "aet"]`.
    pub fn key_combinations(&self) -> impl Iterator<Item = Result<Vec<String>>> + '_ {
        self.combinations().map(move |combination| {
            combination
                .iter()
                .map(|&id| self.dictionary.key_text(id))
                .collect()
        })
    }

    pub fn expand(
        &self,
        combination: &[SignatureId],
    ) -> Result<impl Iterator<Item = String> + '_> {
        SentenceExpander::new(&self.dictionary).expand(combination)
    }

    /// Sentences for the whole phrase, expanded in parallel.
    pub fn sentences(&self) -> Result<Sentences> {
        spawn(Arc::clone(&self.dictionary), &self.config)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Combinations handed to expansion workers.
    pub combinations: u64,
    /// Sentences delivered to the channel.
    pub sentences: u64,
    /// Whether generation ended before the search was exhausted.
    pub stopped: bool,
}

/// Lazy stream of space-joined sentences.
///
/// Order across combinations is unspecified. Dropping the stream stops and
/// joins the workers.
pub struct Sentences {
    receiver: Option<Receiver<String>>,
    stop: StopHandle,
    worker: Option<JoinHandle<Result<GenerationSummary>>>,
}

impl Sentences {
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Stops if still running, waits for the workers and reports what they
    /// did, or the error that ended them.
    pub fn finish(mut self) -> Result<GenerationSummary> {
        self.shutdown().unwrap_or_else(|| Ok(GenerationSummary::default()))
    }

    fn shutdown(&mut self) -> Option<Result<GenerationSummary>> {
        let worker = self.worker.take()?;
        self.stop.stop();
        // wakes any worker blocked on a full channel
        drop(self.receiver.take());
        Some(worker.join().map_err(|_| Error::WorkerPanicked).and_then(|r| r))
    }
}

impl Iterator for Sentences {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.receiver.as_ref()?.recv().ok()
    }
}

impl Drop for Sentences {
    fn drop(&mut self) {
        if let Some(Err(e)) = self.shutdown() {
            warn!("sentence generation ended with an error: {e}");
        }
    }
}

fn spawn(dictionary: Arc<SignatureDictionary>, config: &GeneratorConfig) -> Result<Sentences> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("anagram-expand-{i}"));
    if let Some(n) = config.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;
    debug!(
        "expanding {} signatures on {} threads",
        dictionary.len(),
        pool.current_num_threads()
    );

    let (sender, receiver) = mpsc::sync_channel(config.channel_capacity);
    let stop = StopHandle::default();
    let worker = {
        let stop = stop.clone();
        let max_words = config.max_words;
        thread::Builder::new()
            .name("anagram-search".into())
            .spawn(move || pool.install(|| produce(&dictionary, max_words, sender, &stop)))
            .map_err(Error::Spawn)?
    };

    Ok(Sentences {
        receiver: Some(receiver),
        stop,
        worker: Some(worker),
    })
}

enum Halt {
    Stopped,
    Failed(Error),
}

fn produce(
    dictionary: &SignatureDictionary,
    max_words: usize,
    sender: SyncSender<String>,
    stop: &StopHandle,
) -> Result<GenerationSummary> {
    let expander = SentenceExpander::new(dictionary);
    let combination_count = AtomicU64::new(0);
    let sentence_count = AtomicU64::new(0);

    let outcome = combinations(dictionary, max_words)
        .with_stop(stop.clone())
        .par_bridge()
        .try_for_each_with(sender.clone(), |sender, combination| {
            if stop.is_stopped() {
                return Err(Halt::Stopped);
            }
            combination_count.fetch_add(1, Ordering::Relaxed);
            for sentence in expander.expand(&combination).map_err(Halt::Failed)? {
                if stop.is_stopped() || sender.send(sentence).is_err() {
                    return Err(Halt::Stopped);
                }
                sentence_count.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        });

    let summary = GenerationSummary {
        combinations: combination_count.into_inner(),
        sentences: sentence_count.into_inner(),
        stopped: matches!(outcome, Err(Halt::Stopped)) || stop.is_stopped(),
    };
    // the consumer sees the end of the stream only once this is gone
    drop(sender);
    match outcome {
        Err(Halt::Failed(e)) => {
            error!("expansion failed after {} sentences: {e}", summary.sentences);
            Err(e)
        }
        _ => {
            debug!(
                "{} sentences from {} combinations{}",
                summary.sentences,
                summary.combinations,
                if summary.stopped { " (stopped early)" } else { "" }
            );
            Ok(summary)
        }
    }
}
