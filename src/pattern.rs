use std::fmt;

use crate::letters::is_vowel;

pub const BLANK: char = '_';

/// The board as the player sees it: uppercase letters that have been
/// revealed, [`BLANK`] for letters that have not, and spaces between words.
///
/// Anything else in the input (punctuation, digits, the dashes some boards
/// show) is dropped during normalization.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    text: String,
}

impl Pattern {
    pub fn new(showing: &str) -> Self {
        let text = showing
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .filter(|&c| c.is_ascii_uppercase() || c == BLANK || c == ' ')
            .collect();
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when there is not a single letter position on the board.
    pub fn is_empty(&self) -> bool {
        self.letter_positions() == 0
    }

    pub fn blank_count(&self) -> usize {
        self.text.chars().filter(|&c| c == BLANK).count()
    }

    /// Positions that hold a letter, revealed or not.
    pub fn letter_positions(&self) -> usize {
        self.text.chars().filter(|&c| c != ' ').count()
    }

    pub fn revealed(&self) -> impl Iterator<Item = char> + '_ {
        self.text.chars().filter(char::is_ascii_uppercase)
    }

    pub fn blank_indices(&self) -> Vec<usize> {
        self.text
            .char_indices()
            .filter(|&(_, c)| c == BLANK)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_blanks(&self) -> bool {
        self.text.contains(BLANK)
    }

    pub fn words(&self) -> std::str::Split<'_, char> {
        self.text.split(' ')
    }

    /// Fraction of letter positions still hidden.
    pub fn blank_ratio(&self) -> f64 {
        self.blank_count() as f64 / self.letter_positions().max(1) as f64
    }
}

impl From<&str> for Pattern {
    fn from(showing: &str) -> Self {
        Self::new(showing)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.text)
    }
}

/// Summary counts for a board, with rough vowel/consonant estimates.
///
/// The estimates assume about 40% of the letters in an English phrase are
/// vowels.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub total_letters: usize,
    pub blank_count: usize,
    pub revealed_count: usize,
    pub completion_ratio: f64,
    pub vowels_revealed: usize,
    pub consonants_revealed: usize,
    pub estimated_remaining_vowels: usize,
    pub estimated_remaining_consonants: usize,
    pub vowel_density: f64,
}

const VOWEL_SHARE: f64 = 0.4;

impl GameState {
    pub fn analyze(pattern: &Pattern) -> Self {
        let total_letters = pattern.letter_positions();
        let blank_count = pattern.blank_count();
        let revealed_count = total_letters - blank_count;

        let vowels_revealed = pattern.revealed().filter(|&c| is_vowel(c)).count();
        let consonants_revealed = revealed_count - vowels_revealed;

        let estimated_total_vowels = ((total_letters as f64 * VOWEL_SHARE) as usize).max(1);
        let estimated_total_consonants = total_letters.saturating_sub(estimated_total_vowels);

        let estimated_remaining_vowels = estimated_total_vowels.saturating_sub(vowels_revealed);
        let estimated_remaining_consonants =
            estimated_total_consonants.saturating_sub(consonants_revealed);

        let completion_ratio = if total_letters > 0 {
            revealed_count as f64 / total_letters as f64
        } else {
            0.0
        };
        let vowel_density = if blank_count > 0 {
            estimated_remaining_vowels as f64 / blank_count as f64
        } else {
            0.0
        };

        Self {
            total_letters,
            blank_count,
            revealed_count,
            completion_ratio,
            vowels_revealed,
            consonants_revealed,
            estimated_remaining_vowels,
            estimated_remaining_consonants,
            vowel_density,
        }
    }
}
