//! How likely the leading guess at the full solution is to be right.
//!
//! Sources are tried in order by [`estimate`]: corpus candidates, then
//! dictionary synthesis, then frequency fill. The first that produces a
//! candidate wins.

use tracing::debug;

use crate::{
    corpus::CorpusEntry,
    dictionary::Dictionary,
    model::LetterModel,
    pattern::{Pattern, BLANK},
    synth::{synthesize, synthesize_from_dictionary, Synthesis},
};

/// Floor for the pseudo-confidence of a frequency-filled guess.
const FILL_CONFIDENCE_FLOOR: f64 = 0.35;
const FILL_CONFIDENCE_CEILING: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionSource {
    Corpus,
    Dictionary,
    FrequencyFill,
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub solution: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionDistribution {
    /// Best first, at most `top_k` long.
    pub candidates: Vec<ScoredCandidate>,
    pub top_probability: f64,
    /// Corpus candidates that fit; zero for synthesized guesses.
    pub candidate_count: usize,
    pub source: SolutionSource,
}

impl SolutionDistribution {
    pub fn nothing() -> Self {
        Self {
            candidates: Vec::new(),
            top_probability: 0.0,
            candidate_count: 0,
            source: SolutionSource::Nothing,
        }
    }

    fn single(solution: String, probability: f64, source: SolutionSource) -> Self {
        Self {
            candidates: vec![ScoredCandidate {
                solution,
                probability,
            }],
            top_probability: probability,
            candidate_count: 0,
            source,
        }
    }

    pub fn top(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(
            self.source,
            SolutionSource::Dictionary | SolutionSource::FrequencyFill
        )
    }

    pub fn probability_of(&self, solution: &str) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.solution == solution)
            .map(|c| c.probability)
    }
}

fn score(pattern: &Pattern, normalized: &str) -> f64 {
    let revealed = pattern
        .as_str()
        .chars()
        .zip(normalized.chars())
        .filter(|&(p, c)| p != BLANK && p == c)
        .count();
    let spaces = normalized.chars().filter(|&c| c == ' ').count();
    let blanks = pattern.blank_count() as f64;
    1.0 + revealed as f64 + (blanks - spaces as f64) * 0.1
}

fn from_corpus(pattern: &Pattern, matches: &[&CorpusEntry], top_k: usize) -> Option<SolutionDistribution> {
    if matches.is_empty() {
        return None;
    }

    let scored: Vec<(&str, f64)> = matches
        .iter()
        .map(|entry| (entry.solution.as_str(), score(pattern, &entry.normalized)))
        .collect();
    let total: f64 = scored.iter().map(|(_, s)| s).sum();

    let mut candidates: Vec<ScoredCandidate> = scored
        .into_iter()
        .map(|(solution, s)| ScoredCandidate {
            solution: solution.to_owned(),
            probability: s / total,
        })
        .collect();
    candidates.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    candidates.truncate(top_k.max(1));

    Some(SolutionDistribution {
        top_probability: candidates.first().map_or(0.0, |c| c.probability),
        candidates,
        candidate_count: matches.len(),
        source: SolutionSource::Corpus,
    })
}

fn from_dictionary(
    pattern: &Pattern,
    model: &LetterModel,
    dictionary: &Dictionary,
) -> Option<SolutionDistribution> {
    match synthesize_from_dictionary(pattern, model, dictionary) {
        Synthesis::Found {
            candidate,
            confidence,
        } => Some(SolutionDistribution::single(
            candidate,
            confidence,
            SolutionSource::Dictionary,
        )),
        Synthesis::NotFound => None,
    }
}

fn from_fill(pattern: &Pattern, model: &LetterModel, dictionary: &Dictionary) -> Option<SolutionDistribution> {
    let candidate = synthesize(pattern, model, dictionary);
    if candidate.trim_matches(|c| c == BLANK || c == ' ').is_empty() {
        return None;
    }
    let confidence = (FILL_CONFIDENCE_CEILING - pattern.blank_ratio()).max(FILL_CONFIDENCE_FLOOR);
    Some(SolutionDistribution::single(
        candidate,
        confidence,
        SolutionSource::FrequencyFill,
    ))
}

/// Estimates the distribution over full solutions.
///
/// `matches` are the corpus candidates for `pattern`; pass an empty slice to
/// rely on synthesis alone.
pub fn estimate(
    pattern: &Pattern,
    matches: &[&CorpusEntry],
    model: &LetterModel,
    dictionary: &Dictionary,
    top_k: usize,
) -> SolutionDistribution {
    let distribution = from_corpus(pattern, matches, top_k)
        .or_else(|| from_dictionary(pattern, model, dictionary))
        .or_else(|| from_fill(pattern, model, dictionary))
        .unwrap_or_else(SolutionDistribution::nothing);

    debug!(
        source = ?distribution.source,
        top = distribution.top_probability,
        candidates = distribution.candidate_count,
        "solution distribution"
    );
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{corpus::Corpus, letters::LetterSet, matcher::find_candidates};
    use pretty_assertions::assert_eq;

    fn run(solutions: &[&str], words: &[&str], showing: &str) -> SolutionDistribution {
        let corpus = Corpus::from_solutions(solutions);
        let dictionary = Dictionary::from_words(words);
        let pattern = Pattern::new(showing);
        let matches = find_candidates(&corpus, &pattern);
        let model = LetterModel::build(&pattern, &LetterSet::new(), &matches);
        estimate(&pattern, &matches, &model, &dictionary, 10)
    }

    #[test]
    fn single_corpus_match_is_certain() {
        let distribution = run(&["THE QUICK BROWN FOX", "WHEEL OF FORTUNE"], &[], "THE QUICK _RO_N _O_");
        assert_eq!(distribution.source, SolutionSource::Corpus);
        assert_eq!(distribution.candidate_count, 1);
        assert_eq!(distribution.top_probability, 1.0);
        assert_eq!(
            distribution.top().map(|c| c.solution.as_str()),
            Some("THE QUICK BROWN FOX")
        );
    }

    #[test]
    fn corpus_matches_share_probability() {
        let distribution = run(&["BOOK", "LOOK", "TOOK", "COOK"], &[], "_OO_");
        assert_eq!(distribution.candidate_count, 4);
        assert_eq!(distribution.top_probability, 0.25);
        assert_eq!(distribution.probability_of("COOK"), Some(0.25));
        assert!(!distribution.is_synthesized());
    }

    #[test]
    fn top_k_limits_candidates_not_count() {
        let corpus = Corpus::from_solutions(["BOOK", "LOOK", "TOOK", "COOK"]);
        let pattern = Pattern::new("_OO_");
        let matches = find_candidates(&corpus, &pattern);
        let model = LetterModel::build(&pattern, &LetterSet::new(), &matches);
        let distribution = estimate(&pattern, &matches, &model, &Dictionary::empty(), 2);
        assert_eq!(distribution.candidates.len(), 2);
        assert_eq!(distribution.candidate_count, 4);
    }

    #[test]
    fn dictionary_before_fill() {
        let distribution = run(&[], &["brown", "fox"], "_RO_N _O_");
        assert_eq!(distribution.source, SolutionSource::Dictionary);
        assert_eq!(distribution.top().map(|c| c.solution.as_str()), Some("BROWN FOX"));
        assert_eq!(distribution.top_probability, 0.65);
        assert_eq!(distribution.candidate_count, 0);
    }

    #[test]
    fn fill_when_dictionary_fails() {
        let distribution = run(&[], &[], "_RO_N _O_");
        assert_eq!(distribution.source, SolutionSource::FrequencyFill);
        // 0.85 - 4/8 falls below the floor
        assert_eq!(distribution.top_probability, 0.35);
        assert!(distribution.is_synthesized());

        let nearly = run(&[], &[], "THE QUICK BROWN _OX");
        assert_eq!(nearly.top_probability, 0.85 - 1.0 / 16.0);
    }

    #[test]
    fn nothing_for_empty_board() {
        assert_eq!(run(&[], &[], "  "), SolutionDistribution::nothing());
    }
}
