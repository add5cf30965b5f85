use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use sentence_anagrams::{wordlist, Generator, GeneratorConfig};

/// Print every sentence that uses exactly the letters of PHRASE.
#[derive(Parser, Debug)]
#[command(name = "anagram", version)]
struct Args {
    /// Word list, one word per line
    wordlist: PathBuf,

    /// Phrase to rearrange
    phrase: String,

    #[arg(long, default_value_t = 4)]
    min_word_length: usize,

    #[arg(long, default_value_t = 4)]
    max_words: usize,

    /// Expansion threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Stop after this many sentences
    #[arg(long)]
    limit: Option<usize>,

    /// Only print how many sentences were found
    #[arg(long)]
    count: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let words = wordlist::load(&args.wordlist)?;
    let mut config = GeneratorConfig::default()
        .with_min_word_length(args.min_word_length)
        .with_max_words(args.max_words);
    config.threads = args.threads;

    let start = Instant::now();
    let generator = Generator::new(words, config);
    let session = generator
        .prepare(&args.phrase)
        .with_context(|| format!("failed to prepare {:?}", args.phrase))?;
    info!(
        "{} signatures, {} words usable for {:?} (min length {}, max {} words)",
        session.dictionary().len(),
        session.dictionary().word_count(),
        args.phrase,
        generator.config().min_word_length,
        generator.config().max_words
    );

    let mut sentences = session.sentences()?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut found = 0usize;
    for sentence in sentences.by_ref().take(limit) {
        found += 1;
        if !args.count {
            writeln!(out, "{sentence}")?;
        }
    }
    if args.count {
        writeln!(out, "{found}")?;
    }
    out.flush()?;

    let summary = sentences.finish()?;
    info!(
        "{} sentences from {} combinations in {:?}{}",
        found,
        summary.combinations,
        start.elapsed(),
        if summary.stopped { ", stopped early" } else { "" }
    );
    Ok(())
}
