//! Filling in a whole board when the corpus has nothing that fits.
//!
//! There are two layers. Dictionary synthesis replaces each blank word with
//! the best-scoring dictionary word and gives up entirely if any word has
//! no match. Frequency fill never fails: it writes ranked letters into the
//! blanks left to right, with two hard spelling rules for `Q`.

use tracing::{debug, trace};

use crate::{
    dictionary::Dictionary,
    letters::{base_frequency, FILL_CYCLE},
    matcher::pattern_regex,
    model::LetterModel,
    pattern::{Pattern, BLANK},
};

/// Confidence reported for a board that has no blanks left.
pub const SOLVED_CONFIDENCE: f64 = 0.9;

const QU_I_BONUS: f64 = 0.5;
const QU_VOWEL_PENALTY: f64 = 0.2;
const UNKNOWN_LETTER_WEIGHT: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub enum Synthesis {
    Found { candidate: String, confidence: f64 },
    NotFound,
}

impl Synthesis {
    pub fn candidate(&self) -> Option<&str> {
        match self {
            Self::Found { candidate, .. } => Some(candidate.as_str()),
            Self::NotFound => None,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Self::Found { confidence, .. } => *confidence,
            Self::NotFound => 0.0,
        }
    }
}

/// Scores a dictionary word: summed letter probabilities plus a nudge
/// toward `QUI` over `QUA`/`QUE`/`QUO`/`QUY`.
fn word_score(word: &str, model: &LetterModel) -> f64 {
    let base: f64 = word
        .chars()
        .map(|c| {
            model
                .prob_any(c)
                .or_else(|| base_frequency(c))
                .unwrap_or(UNKNOWN_LETTER_WEIGHT)
        })
        .sum();

    let bonus: f64 = word
        .as_bytes()
        .windows(3)
        .map(|w| match w {
            [b'Q', b'U', b'I'] => QU_I_BONUS,
            [b'Q', b'U', b'A' | b'O' | b'E' | b'Y'] => -QU_VOWEL_PENALTY,
            _ => 0.0,
        })
        .sum();

    base + bonus
}

/// True when `candidate` puts something other than `U` in a blank right
/// after `Q`, or something other than `I` in a blank right after `QU`.
fn breaks_q_rules(word: &str, candidate: &str) -> bool {
    let shown = word.as_bytes();
    let letters = candidate.as_bytes();
    shown.iter().enumerate().any(|(i, &b)| {
        if b != BLANK as u8 {
            return false;
        }
        match &letters[..i] {
            [.., b'Q'] => letters[i] != b'U',
            [.., b'Q', b'U'] => letters[i] != b'I',
            _ => false,
        }
    })
}

/// Highest-scoring dictionary word fitting a single word of the board.
/// Words that break the `Q` spelling rules in a blank are never picked.
/// The first word in dictionary order wins ties.
pub fn best_word_match<'d>(
    word: &str,
    model: &LetterModel,
    dictionary: &'d Dictionary,
) -> Option<&'d str> {
    let candidates = dictionary.words_of_length(word.len());
    if candidates.is_empty() {
        return None;
    }
    let regex = pattern_regex(word)?;

    let mut best: Option<(&str, f64)> = None;
    let fitting = candidates
        .iter()
        .filter(|w| regex.is_match(w.as_str()) && !breaks_q_rules(word, w.as_str()));
    for candidate in fitting {
        let score = word_score(candidate, model);
        trace!(candidate = candidate.as_str(), score, "dictionary candidate");
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate.as_str(), score)),
        }
    }
    best.map(|(word, _)| word)
}

/// Fills every blank word from the dictionary, or nothing at all.
///
/// Confidence starts at 0.4 and grows with the revealed share of the board,
/// up to 0.85.
pub fn synthesize_from_dictionary(
    pattern: &Pattern,
    model: &LetterModel,
    dictionary: &Dictionary,
) -> Synthesis {
    if pattern.is_empty() {
        return Synthesis::NotFound;
    }
    if !pattern.has_blanks() {
        return Synthesis::Found {
            candidate: pattern.to_string(),
            confidence: SOLVED_CONFIDENCE,
        };
    }

    let mut filled = Vec::new();
    for word in pattern.words() {
        if !word.contains(BLANK) {
            filled.push(word);
            continue;
        }
        match best_word_match(word, model, dictionary) {
            Some(found) => filled.push(found),
            None => {
                debug!(word, "no dictionary word fits, giving up on dictionary synthesis");
                return Synthesis::NotFound;
            }
        }
    }

    let revealed_ratio = 1.0 - pattern.blank_ratio();
    let confidence = (0.4 + 0.5 * revealed_ratio).min(0.85);
    Synthesis::Found {
        candidate: filled.join(" "),
        confidence,
    }
}

/// Fills the blanks of one word from `cycle`, restarting the cycle for
/// each word. A blank right after `Q` is always `U`, and a blank right after
/// `QU` is always `I`.
pub fn fill_blanks(word: &str, cycle: &[char]) -> String {
    let cycle = if cycle.is_empty() { &FILL_CYCLE[..] } else { cycle };
    let mut filled: Vec<char> = Vec::with_capacity(word.len());
    let mut next = 0;

    for ch in word.chars() {
        if ch != BLANK {
            filled.push(ch);
            continue;
        }
        let letter = match filled.as_slice() {
            [.., 'Q'] => 'U',
            [.., 'Q', 'U'] => 'I',
            _ => {
                let letter = cycle[next % cycle.len()];
                next += 1;
                letter
            }
        };
        filled.push(letter);
    }

    filled.into_iter().collect()
}

/// Best-effort full guess: dictionary word where one fits, frequency fill
/// otherwise. The result contains no blanks unless the board was empty.
pub fn synthesize(pattern: &Pattern, model: &LetterModel, dictionary: &Dictionary) -> String {
    if pattern.as_str().is_empty() {
        return String::new();
    }

    let ranking = model.ranking();
    pattern
        .words()
        .map(|word| {
            if !word.contains(BLANK) {
                word.to_owned()
            } else if let Some(found) = best_word_match(word, model, dictionary) {
                found.to_owned()
            } else {
                fill_blanks(word, &ranking)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
