//! Second opinion on a full solve attempt.
//!
//! A guess is checked against the board and the guess history first; only a
//! guess that could be right gets a confidence, taken from the engine's own
//! solution estimate.

use std::fmt;

use itertools::Itertools;
use thiserror::Error as ThisError;
use tracing::debug;

use crate::{
    corpus::normalize,
    engine::Engine,
    letters::LetterSet,
    pattern::{Pattern, BLANK},
};

const HIGH_CONFIDENCE: f64 = 75.0;
const MEDIUM_CONFIDENCE: f64 = 50.0;
/// Confidence for a valid guess the engine has no opinion on.
const UNKNOWN_GUESS_CONFIDENCE: f64 = 50.0;
const TRUSTED_CONFIDENCE: f64 = 85.0;
const POSSIBILITY_CAP: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionMismatch {
    ExpectedLetter { position: usize, found: char },
    ExpectedSpace { position: usize, found: char },
    Expected { position: usize, expected: char, found: char },
}

impl fmt::Display for PositionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedLetter { position, found } => {
                write!(f, "Position {}: expected letter, got '{}'", position, found)
            }
            Self::ExpectedSpace { position, found } => {
                write!(f, "Position {}: expected space, got '{}'", position, found)
            }
            Self::Expected {
                position,
                expected,
                found,
            } => write!(f, "Position {}: expected '{}', got '{}'", position, expected, found),
        }
    }
}

/// Why a guess cannot be the answer to a board. Positions count from 1.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PatternMismatch {
    #[error("Length mismatch: pattern has {pattern} chars, guess has {guess}")]
    Length { pattern: usize, guess: usize },

    #[error("Letter mismatch at position {position}: pattern shows '{expected}', guess has '{found}'")]
    Letter {
        position: usize,
        expected: char,
        found: char,
    },

    #[error("{}", .0.iter().join("; "))]
    Positions(Vec<PositionMismatch>),
}

/// Checks a guess position by position against the raw board.
///
/// A wrong revealed letter is reported on its own; every other problem is
/// collected.
pub fn check_pattern(showing: &str, guess: &str) -> Result<(), PatternMismatch> {
    let showing: Vec<char> = showing.trim().to_uppercase().chars().collect();
    let guess: Vec<char> = guess.trim().to_uppercase().chars().collect();
    if showing.len() != guess.len() {
        return Err(PatternMismatch::Length {
            pattern: showing.len(),
            guess: guess.len(),
        });
    }

    let mut problems = Vec::new();
    for (index, (&expected, &found)) in showing.iter().zip(&guess).enumerate() {
        let position = index + 1;
        match expected {
            BLANK if !found.is_alphabetic() => {
                problems.push(PositionMismatch::ExpectedLetter { position, found })
            }
            BLANK => {}
            ' ' if found != ' ' => problems.push(PositionMismatch::ExpectedSpace { position, found }),
            ' ' => {}
            letter if letter.is_alphabetic() && letter != found => {
                return Err(PatternMismatch::Letter {
                    position,
                    expected,
                    found,
                })
            }
            other if other != found => problems.push(PositionMismatch::Expected {
                position,
                expected,
                found,
            }),
            _ => {}
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PatternMismatch::Positions(problems))
    }
}

/// Letters that were called, are not on the board, and yet appear in the guess.
pub fn check_consistency(showing: &str, guess: &str, guessed: &LetterSet) -> LetterSet {
    let showing = showing.to_uppercase();
    let guess = guess.to_uppercase();
    guessed
        .iter()
        .filter(|&letter| !showing.contains(letter) && guess.contains(letter))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncertainty {
    Low,
    Medium,
    High,
}

impl fmt::Display for Uncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// A deliberately loose upper bound on how many fillings the board allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Possibilities {
    pub blank_count: usize,
    pub remaining_letters: usize,
    pub estimated: u64,
    pub uncertainty: Uncertainty,
}

pub fn remaining_possibilities(pattern: &Pattern, guessed: &LetterSet) -> Possibilities {
    let blank_count = pattern.blank_count();
    let remaining_letters = 26 - guessed.len();

    let estimated = (0..blank_count).try_fold(1u64, |acc, _| {
        let next = acc.saturating_mul(remaining_letters as u64);
        if next > POSSIBILITY_CAP {
            Err(POSSIBILITY_CAP)
        } else {
            Ok(next)
        }
    });

    Possibilities {
        blank_count,
        remaining_letters,
        estimated: estimated.unwrap_or_else(|cap| cap),
        uncertainty: match blank_count {
            0..=2 => Uncertainty::Low,
            3..=5 => Uncertainty::Medium,
            _ => Uncertainty::High,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Invalid,
    SolveNow,
    Solve,
    ConsiderSolving,
    Risky,
    Wait,
}

impl Verdict {
    pub fn from_confidence(confidence: f64, blank_count: usize) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            if blank_count <= 3 {
                Self::SolveNow
            } else {
                Self::Solve
            }
        } else if confidence >= MEDIUM_CONFIDENCE {
            if blank_count <= 2 {
                Self::ConsiderSolving
            } else {
                Self::Risky
            }
        } else {
            Self::Wait
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "INVALID - guess cannot be the answer",
            Self::SolveNow => "SOLVE NOW - high confidence",
            Self::Solve => "SOLVE - good chance of success",
            Self::ConsiderSolving => "Consider solving - decent odds",
            Self::Risky => "Risky - maybe guess more letters first",
            Self::Wait => "WAIT - keep guessing letters to be sure",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveAdvice {
    pub guess: String,
    /// Percent, rounded to one decimal.
    pub confidence: f64,
    pub verdict: Verdict,
    /// Why the guess was rejected, for invalid guesses.
    pub problem: Option<String>,
    pub possibilities: Option<Possibilities>,
}

impl SolveAdvice {
    fn invalid(guess: String, problem: String) -> Self {
        Self {
            guess,
            confidence: 0.0,
            verdict: Verdict::Invalid,
            problem: Some(problem),
            possibilities: None,
        }
    }
}

/// Confidence in percent, adjusted for how much of the board is still blank.
pub fn adjusted_confidence(base: f64, blank_count: usize) -> f64 {
    if base < TRUSTED_CONFIDENCE {
        base * (1.0 - blank_count as f64 * 0.02).max(0.85)
    } else if blank_count <= 3 && base >= 90.0 {
        (base + 3.0).min(99.0)
    } else {
        base
    }
}

pub fn advise(engine: &Engine, showing: &str, guess: &str, guessed: &LetterSet) -> SolveAdvice {
    let upper_guess = guess.trim().to_uppercase();

    if let Err(mismatch) = check_pattern(showing, guess) {
        return SolveAdvice::invalid(upper_guess, mismatch.to_string());
    }
    let violations = check_consistency(showing, guess, guessed);
    if !violations.is_empty() {
        let listed = violations.iter().join(", ");
        return SolveAdvice::invalid(
            upper_guess,
            format!("Guess contains letters already confirmed NOT in puzzle: {}", listed),
        );
    }

    let pattern = Pattern::new(showing);
    let possibilities = remaining_possibilities(&pattern, guessed);
    let distribution = engine.solution_distribution(&pattern, guessed);
    let wanted = normalize(&upper_guess);
    let base = distribution
        .candidates
        .iter()
        .find(|candidate| normalize(&candidate.solution) == wanted)
        .map_or(UNKNOWN_GUESS_CONFIDENCE, |candidate| candidate.probability * 100.0);

    let confidence = adjusted_confidence(base, possibilities.blank_count);
    let verdict = Verdict::from_confidence(confidence, possibilities.blank_count);
    debug!(guess = %upper_guess, base, confidence, ?verdict, "advised on solve");

    SolveAdvice {
        guess: upper_guess,
        confidence: (confidence * 10.0).round() / 10.0,
        verdict,
        problem: None,
        possibilities: Some(possibilities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, corpus::Corpus, dictionary::Dictionary};
    use pretty_assertions::assert_eq;

    #[test]
    fn pattern_checks() {
        assert_eq!(check_pattern("THE _O_", "the fox"), Ok(()));
        assert_eq!(
            check_pattern("THE _O_", "THE FOXES"),
            Err(PatternMismatch::Length { pattern: 7, guess: 9 })
        );
        assert_eq!(
            check_pattern("THE _O_", "THE BIG"),
            Err(PatternMismatch::Letter {
                position: 6,
                expected: 'O',
                found: 'I'
            })
        );
        assert_eq!(
            check_pattern("IT'S _O", "IT S 2O"),
            Err(PatternMismatch::Positions(vec![
                PositionMismatch::Expected {
                    position: 3,
                    expected: '\'',
                    found: ' '
                },
                PositionMismatch::ExpectedLetter { position: 6, found: '2' },
            ]))
        );
    }

    #[test]
    fn mismatch_messages() {
        let err = check_pattern("A _B", "AB B").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Position 2: expected space, got 'B'; Position 3: expected letter, got ' '"
        );
    }

    #[test]
    fn consistency_flags_called_misses() {
        let guessed = LetterSet::parse("TSX");
        assert_eq!(check_consistency("T_E _O_", "THE FOX", &guessed).to_string(), "X");
        assert!(check_consistency("T_E _O_", "THE FOB", &guessed).is_empty());
    }

    #[test]
    fn possibilities() {
        let guessed = LetterSet::parse("ETAOIN");
        let few = remaining_possibilities(&Pattern::new("T_E"), &guessed);
        assert_eq!(few.remaining_letters, 20);
        assert_eq!(few.estimated, 20);
        assert_eq!(few.uncertainty, Uncertainty::Low);

        let many = remaining_possibilities(&Pattern::new("______"), &guessed);
        assert_eq!(many.estimated, POSSIBILITY_CAP);
        assert_eq!(many.uncertainty, Uncertainty::High);

        assert_eq!(remaining_possibilities(&Pattern::new("DONE"), &guessed).estimated, 1);
    }

    #[test]
    fn confidence_adjustments() {
        assert_eq!(adjusted_confidence(50.0, 10), 50.0 * 0.85);
        assert!((adjusted_confidence(80.0, 2) - 76.8).abs() < 1e-9);
        assert_eq!(adjusted_confidence(100.0, 1), 99.0);
        assert_eq!(adjusted_confidence(88.0, 1), 88.0);
        assert_eq!(adjusted_confidence(95.0, 6), 95.0);
    }

    #[test]
    fn verdicts() {
        assert_eq!(Verdict::from_confidence(99.0, 3), Verdict::SolveNow);
        assert_eq!(Verdict::from_confidence(75.0, 4), Verdict::Solve);
        assert_eq!(Verdict::from_confidence(60.0, 2), Verdict::ConsiderSolving);
        assert_eq!(Verdict::from_confidence(50.0, 3), Verdict::Risky);
        assert_eq!(Verdict::from_confidence(49.9, 0), Verdict::Wait);
    }

    #[test]
    fn advice_uses_the_solution_estimate() {
        let engine = Engine::with_resources(
            Corpus::from_solutions(["THE QUICK BROWN FOX"]),
            Dictionary::empty(),
            EngineConfig::default(),
        );
        let guessed = LetterSet::parse("THEQUICKRON");

        let known = advise(&engine, "THE QUICK _RO_N _O_", "the quick brown fox", &guessed);
        assert_eq!(known.confidence, 100.0);
        assert_eq!(known.verdict, Verdict::Solve);
        assert_eq!(known.guess, "THE QUICK BROWN FOX");

        let other = advise(&engine, "THE QUICK _RO_N _O_", "THE QUICK BROWN BOX", &guessed);
        assert_eq!(other.confidence, 46.0);
        assert_eq!(other.verdict, Verdict::Wait);

        let missed = LetterSet::parse("THEQUICKRONS");
        let called = advise(&engine, "THE QUICK _RO_N _O_", "THE QUICK BROWN SOX", &missed);
        assert_eq!(called.verdict, Verdict::Invalid);
        assert_eq!(called.confidence, 0.0);
        assert!(called.problem.is_some());
    }
}
