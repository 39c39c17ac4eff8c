use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    corpus::{Corpus, CorpusEntry},
    pattern::{Pattern, BLANK},
};

/// Anchored regex for a board: a blank matches any one letter, everything
/// else must match literally.
pub fn pattern_regex(pattern: &str) -> Option<Regex> {
    let mut source = String::with_capacity(pattern.len() * 5 + 2);
    source.push('^');
    for c in pattern.chars() {
        if c == BLANK {
            source.push_str("[A-Z]");
        } else {
            source.push_str(&regex::escape(&c.to_string()));
        }
    }
    source.push('$');

    match Regex::new(&source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(%err, pattern, "could not build pattern matcher");
            None
        }
    }
}

/// Every corpus entry whose normalized text fits `pattern` position by position.
///
/// Entries come back in corpus priority order. The corpus is already
/// deduplicated, so so is the result.
pub fn find_candidates<'c>(corpus: &'c Corpus, pattern: &Pattern) -> Vec<&'c CorpusEntry> {
    if pattern.is_empty() {
        return Vec::new();
    }
    let regex = match pattern_regex(pattern.as_str()) {
        Some(regex) => regex,
        None => return Vec::new(),
    };

    let len = pattern.len();
    let candidates: Vec<&CorpusEntry> = corpus
        .entries()
        .par_iter()
        .filter(|entry| entry.normalized.len() == len && regex.is_match(&entry.normalized))
        .collect();

    debug!(%pattern, candidates = candidates.len(), "matched corpus");
    candidates
}
