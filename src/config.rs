/// Knobs for one generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Shortest word (in letters) taken from the word list. Whitelisted
    /// one-letter words are kept regardless.
    pub min_word_length: usize,
    /// Longest sentence, in words.
    pub max_words: usize,
    /// Expansion worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Sentences buffered ahead of the consumer.
    pub channel_capacity: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            min_word_length: 4,
            max_words: 4,
            threads: None,
            channel_capacity: 1024,
        }
    }
}

impl GeneratorConfig {
    pub fn with_min_word_length(mut self, n: usize) -> Self {
        self.min_word_length = n;
        self
    }

    pub fn with_max_words(mut self, n: usize) -> Self {
        self.max_words = n;
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    pub fn with_channel_capacity(mut self, n: usize) -> Self {
        self.channel_capacity = n;
        self
    }
}
