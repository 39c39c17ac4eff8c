//! Per-letter estimates of what a guess would reveal.
//!
//! The model is rebuilt for every decision and thrown away afterwards. When
//! corpus candidates fit the board, the estimates come from counting letters
//! in the candidates' blank positions. Otherwise they are English letter
//! frequencies, with `expected_reveals` equal to the frequency itself: not a
//! real count, but it ranks letters the same way.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::{
    corpus::CorpusEntry,
    letters::{is_vowel, LetterSet, BASE_FREQUENCIES},
    pattern::Pattern,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Counted from corpus candidates.
    Candidates,
    /// Candidates exist but the board has no blanks left.
    Solved,
    /// No candidates; English frequencies.
    Frequencies,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterModel {
    pub prob_any: BTreeMap<char, f64>,
    pub expected_reveals: BTreeMap<char, f64>,
    pub info_gain: BTreeMap<char, f64>,
    pub best_vowel: Option<char>,
    pub best_consonant: Option<char>,
    pub best_info_vowel: Option<char>,
    pub best_info_consonant: Option<char>,
    pub available_vowels: usize,
    pub candidate_count: usize,
    pub source: ModelSource,
}

/// `2p(1 - p)`: zero for letters that are certainly in or out, 0.5 at a coin flip.
pub fn info_gain(p: f64) -> f64 {
    2.0 * p * (1.0 - p)
}

/// Letter with the highest value, earliest letter on ties.
fn argmax<'a>(values: impl Iterator<Item = (&'a char, &'a f64)>) -> Option<char> {
    values
        .fold(None, |best: Option<(char, f64)>, (&letter, &value)| match best {
            Some((_, top)) if value <= top => best,
            _ => Some((letter, value)),
        })
        .map(|(letter, _)| letter)
}

fn best_of(values: &BTreeMap<char, f64>, vowels: bool) -> Option<char> {
    argmax(values.iter().filter(|(l, _)| is_vowel(**l) == vowels))
}

impl LetterModel {
    /// Builds the model from the candidates that fit `pattern`.
    ///
    /// `candidates` should already be capped by the caller.
    pub fn build(pattern: &Pattern, guessed: &LetterSet, candidates: &[&CorpusEntry]) -> Self {
        if candidates.is_empty() {
            return Self::from_frequencies(guessed);
        }

        let blanks = pattern.blank_indices();
        if blanks.is_empty() {
            return Self::solved(candidates.len());
        }

        // Only the blank positions matter: a revealed letter tells us nothing
        // new, and a letter already called cannot be called again. For each
        // candidate we count every hidden occurrence (how many tiles a call
        // would turn) and, separately, whether the letter shows up at all (how
        // often the call would hit). Dividing both by the number of candidates
        // gives expected reveals and the probability of appearing.
        let mut candidate_hits: BTreeMap<char, usize> = BTreeMap::new();
        let mut reveal_counts: BTreeMap<char, usize> = BTreeMap::new();

        for candidate in candidates {
            let bytes = candidate.normalized.as_bytes();
            let mut seen = HashSet::new();
            for &pos in &blanks {
                let letter = match bytes.get(pos) {
                    Some(&b) => b as char,
                    None => continue,
                };
                if letter == ' ' || guessed.contains(letter) {
                    continue;
                }
                *reveal_counts.entry(letter).or_default() += 1;
                seen.insert(letter);
            }
            for letter in seen {
                *candidate_hits.entry(letter).or_default() += 1;
            }
            trace!(candidate = %candidate.normalized, "counted candidate");
        }

        let total = candidates.len() as f64;
        let prob_any: BTreeMap<char, f64> = candidate_hits
            .into_iter()
            .map(|(letter, hits)| (letter, hits as f64 / total))
            .collect();
        let expected_reveals: BTreeMap<char, f64> = reveal_counts
            .into_iter()
            .map(|(letter, count)| (letter, count as f64 / total))
            .collect();

        let model = Self::assemble(prob_any, expected_reveals, candidates.len(), ModelSource::Candidates);
        debug!(
            candidates = model.candidate_count,
            best_vowel = ?model.best_vowel,
            best_consonant = ?model.best_consonant,
            "letter model from candidates"
        );
        model
    }

    /// English single-letter frequencies restricted to unguessed letters.
    pub fn from_frequencies(guessed: &LetterSet) -> Self {
        let available: BTreeMap<char, f64> = BASE_FREQUENCIES
            .iter()
            .filter(|(letter, _)| !guessed.contains(*letter))
            .map(|&(letter, freq)| (letter, freq))
            .collect();

        let mut model = Self::assemble(available.clone(), available, 0, ModelSource::Frequencies);
        model.best_info_vowel = model.best_info_vowel.or(model.best_vowel);
        model.best_info_consonant = model.best_info_consonant.or(model.best_consonant);
        model
    }

    fn solved(candidate_count: usize) -> Self {
        Self {
            prob_any: BTreeMap::new(),
            expected_reveals: BTreeMap::new(),
            info_gain: BTreeMap::new(),
            best_vowel: None,
            best_consonant: None,
            best_info_vowel: None,
            best_info_consonant: None,
            available_vowels: 0,
            candidate_count,
            source: ModelSource::Solved,
        }
    }

    fn assemble(
        prob_any: BTreeMap<char, f64>,
        expected_reveals: BTreeMap<char, f64>,
        candidate_count: usize,
        source: ModelSource,
    ) -> Self {
        let info: BTreeMap<char, f64> = prob_any.iter().map(|(&l, &p)| (l, info_gain(p))).collect();

        Self {
            best_vowel: best_of(&expected_reveals, true),
            best_consonant: best_of(&expected_reveals, false),
            best_info_vowel: best_of(&info, true),
            best_info_consonant: best_of(&info, false),
            available_vowels: expected_reveals.keys().filter(|l| is_vowel(**l)).count(),
            prob_any,
            expected_reveals,
            info_gain: info,
            candidate_count,
            source,
        }
    }

    pub fn prob_any(&self, letter: char) -> Option<f64> {
        self.prob_any.get(&letter).copied()
    }

    pub fn expected_reveals(&self, letter: char) -> Option<f64> {
        self.expected_reveals.get(&letter).copied()
    }

    pub fn info_gain(&self, letter: char) -> Option<f64> {
        self.info_gain.get(&letter).copied()
    }

    /// Vowel to buy: best by expected reveals, else best by information gain.
    pub fn vowel_pick(&self) -> Option<char> {
        self.best_vowel.or(self.best_info_vowel)
    }

    pub fn consonant_pick(&self) -> Option<char> {
        self.best_consonant.or(self.best_info_consonant)
    }

    pub fn is_empty(&self) -> bool {
        self.expected_reveals.is_empty()
    }

    /// Letters ordered by expected reveals, then by probability of appearing.
    pub fn ranking(&self) -> Vec<char> {
        let mut letters: Vec<(char, f64, f64)> = self
            .expected_reveals
            .iter()
            .map(|(&l, &e)| (l, e, self.prob_any(l).unwrap_or(0.0)))
            .collect();
        letters.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.2.total_cmp(&a.2)));
        letters.into_iter().map(|(l, _, _)| l).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::matcher::find_candidates;
    use pretty_assertions::assert_eq;

    fn model_for(solutions: &[&str], showing: &str, guessed: &str) -> LetterModel {
        let corpus = Corpus::from_solutions(solutions);
        let pattern = Pattern::new(showing);
        let candidates = find_candidates(&corpus, &pattern);
        LetterModel::build(&pattern, &LetterSet::parse(guessed), &candidates)
    }

    #[test]
    fn counts_letters_in_blanks() {
        let model = model_for(
            &["BOOK", "LOOK", "TOOK", "BOOT"],
            "_OO_",
            "O",
        );
        assert_eq!(model.source, ModelSource::Candidates);
        assert_eq!(model.candidate_count, 4);
        assert_eq!(model.prob_any('K'), Some(0.75));
        assert_eq!(model.prob_any('B'), Some(0.5));
        // BOOT puts T in the last blank, TOOK in the first
        assert_eq!(model.prob_any('T'), Some(0.5));
        assert_eq!(model.expected_reveals('K'), Some(0.75));
        assert_eq!(model.best_consonant, Some('K'));
        assert_eq!(model.best_info_consonant, Some('B'));
        assert_eq!(model.info_gain('B'), Some(0.5));
        assert_eq!(model.best_vowel, None);
        assert_eq!(model.available_vowels, 0);
    }

    #[test]
    fn repeated_letters_count_every_occurrence() {
        let model = model_for(&["ABBA", "ABCA"], "A__A", "A");
        assert_eq!(model.prob_any('B'), Some(1.0));
        assert_eq!(model.expected_reveals('B'), Some(1.5));
        assert_eq!(model.info_gain('B'), Some(0.0));
    }

    #[test]
    fn guessed_letters_are_skipped() {
        let model = model_for(&["BOOK", "LOOK"], "_OO_", "OK");
        assert_eq!(model.prob_any('K'), None);
        assert_eq!(model.best_consonant, Some('B'));
    }

    #[test]
    fn falls_back_to_frequencies() {
        let model = model_for(&["WHEEL OF FORTUNE"], "___ _____", "ET");
        assert_eq!(model.source, ModelSource::Frequencies);
        assert_eq!(model.candidate_count, 0);
        assert_eq!(model.prob_any('E'), None);
        assert_eq!(model.expected_reveals('A'), Some(0.081));
        assert_eq!(model.prob_any('A'), Some(0.081));
        assert_eq!(model.best_vowel, Some('A'));
        assert_eq!(model.best_consonant, Some('N'));
        assert_eq!(model.available_vowels, 4);
        assert_eq!(model.best_info_consonant, Some('N'));
    }

    #[test]
    fn solved_board_has_nothing_to_guess() {
        let model = model_for(&["BOOK"], "BOOK", "BOK");
        assert_eq!(model.source, ModelSource::Solved);
        assert!(model.is_empty());
        assert_eq!(model.vowel_pick(), None);
    }

    #[test]
    fn info_gain_is_bounded() {
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            let gain = info_gain(p);
            assert!((0.0..=0.5).contains(&gain));
            if gain == 0.5 {
                assert_eq!(p, 0.5);
            }
        }
        assert_eq!(info_gain(0.0), 0.0);
        assert_eq!(info_gain(1.0), 0.0);
    }

    #[test]
    fn ranking_breaks_ties_by_probability() {
        let model = model_for(&["ABBA", "ACDA", "ACEA"], "A__A", "A");
        // C: 2 reveals / 3, B: 2 reveals / 3 but only one candidate
        assert_eq!(&model.ranking()[..2], &['C', 'B']);
    }

    #[test]
    fn build_is_deterministic() {
        let a = model_for(&["BOOK", "LOOK", "TOOK"], "_OO_", "");
        let b = model_for(&["BOOK", "LOOK", "TOOK"], "_OO_", "");
        assert_eq!(a, b);
    }
}
