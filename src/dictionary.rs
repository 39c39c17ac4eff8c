use std::{collections::HashMap, fs, path::Path};

use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// A plain word list, uppercased and grouped by word length.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    by_length: HashMap<usize, Vec<String>>,
    len: usize,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keeps non-empty words that start with a letter, in the order given.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::default();
        for word in words {
            let word = word.as_ref().trim();
            if !word.chars().next().map_or(false, char::is_alphabetic) {
                continue;
            }
            let word = word.to_uppercase();
            dictionary.by_length.entry(word.len()).or_default().push(word);
            dictionary.len += 1;
        }
        dictionary
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| Error::read(path, err))?;
        let dictionary = Self::from_words(text.lines());
        debug!(words = dictionary.len(), "loaded dictionary");
        Ok(dictionary)
    }

    /// Words of exactly `len` bytes.
    pub fn words_of_length(&self, len: usize) -> &[String] {
        self.by_length.get(&len).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
