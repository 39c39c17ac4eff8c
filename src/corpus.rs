//! The collection of known puzzle solutions that boards are matched against.

use std::{collections::HashSet, fs, path::Path};

use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// One known solution, as written in the corpus and in its matchable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub solution: String,
    /// Uppercase letters separated by single spaces.
    pub normalized: String,
}

impl CorpusEntry {
    pub fn new(solution: &str) -> Self {
        let solution = solution.trim().to_uppercase();
        let normalized = normalize(&solution);
        Self {
            solution,
            normalized,
        }
    }

    /// Parses a corpus record, whose first comma-separated field is the solution.
    pub fn from_record(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        let solution = line.split(',').next().unwrap_or_default();
        Some(Self::new(solution))
    }
}

/// Keeps the letters and spaces of `text`, then collapses runs of whitespace.
pub fn normalize(text: &str) -> String {
    let letters: String = text
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_whitespace())
        .collect();
    letters.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An immutable, deduplicated list of corpus entries in priority order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a corpus from solutions, dropping any whose normalized text was
    /// already seen.
    pub fn from_solutions<I, S>(solutions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_entries(solutions.into_iter().map(|s| CorpusEntry::new(s.as_ref())))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CorpusEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| !entry.normalized.is_empty())
            .filter(|entry| seen.insert(entry.normalized.clone()))
            .collect();
        Self { entries }
    }

    /// Reads the records of one corpus file.
    pub fn load_file(path: &Path) -> Result<Vec<CorpusEntry>> {
        let text = fs::read_to_string(path).map_err(|err| Error::read(path, err))?;
        Ok(text.lines().filter_map(CorpusEntry::from_record).collect())
    }

    /// Loads every readable file in order. Unreadable files are skipped with
    /// a warning; if none can be read the corpus is simply empty.
    #[instrument(skip_all)]
    pub fn load<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        let mut entries = Vec::new();
        for path in paths {
            match Self::load_file(path.as_ref()) {
                Ok(mut file_entries) => {
                    debug!(path = %path.as_ref().display(), count = file_entries.len(), "read corpus file");
                    entries.append(&mut file_entries);
                }
                Err(err) => warn!(%err, "skipping corpus file"),
            }
        }

        let corpus = Self::from_entries(entries);
        if corpus.is_empty() {
            warn!("no corpus entries loaded, letter estimates will use English frequencies only");
        } else {
            debug!(entries = corpus.len(), "corpus ready");
        }
        corpus
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
