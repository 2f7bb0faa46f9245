use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Dictionary capability used by the word segmenter.
pub trait Lexicon: Send + Sync {
    /// Whether `word` is a recognised dictionary word (case-insensitive).
    fn is_word(&self, word: &str) -> bool;
}

impl<F> Lexicon for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_word(&self, word: &str) -> bool {
        self(word)
    }
}

/// Shared handle to a lexicon.
pub type SharedLexicon = Arc<dyn Lexicon>;

/// Fixed, case-insensitive word list.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Build a word list from any iterator of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a newline-delimited word list; blank lines and `#` comments are skipped
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a newline-delimited word list file (e.g. `/usr/share/dict/words`)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let list = Self::parse(&text);
        log::debug!(
            "loaded {} words from {}",
            list.len(),
            path.as_ref().display()
        );
        Ok(list)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Lexicon for WordList {
    fn is_word(&self, word: &str) -> bool {
        !word.is_empty() && self.words.contains(&word.to_lowercase())
    }
}

/// Union of several dictionaries: a word is accepted if any of them knows it.
///
/// Useful for regional spelling variants (`en_GB`, `en_US`, ...).
#[derive(Clone, Default)]
pub struct Lexicons {
    members: Vec<SharedLexicon>,
}

impl Lexicons {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a dictionary
    #[must_use]
    pub fn with(mut self, lexicon: impl Lexicon + 'static) -> Self {
        self.members.push(Arc::new(lexicon));
        self
    }
}

impl Lexicon for Lexicons {
    fn is_word(&self, word: &str) -> bool {
        self.members.iter().any(|lexicon| lexicon.is_word(word))
    }
}
