use std::io;
use std::path::PathBuf;

use crate::dictionary::SignatureId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A letter outside the run's alphabet reached histogram conversion.
    /// Dictionary filtering should make this unreachable.
    #[error("letter '{letter}' in {text:?} is not part of the phrase alphabet")]
    InvalidCharacter { letter: char, text: String },

    /// A signature handed to the dictionary was not produced by it.
    #[error("signature {0} is not in the dictionary")]
    UnknownSignature(SignatureId),

    #[error("letter '{letter}' occurs more than {} times", u8::MAX)]
    CountOverflow { letter: char },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn search thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("sentence expansion worker panicked")]
    WorkerPanicked,

    #[error("failed to read word list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
