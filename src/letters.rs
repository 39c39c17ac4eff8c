use std::fmt;

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter)
}

pub fn is_consonant(letter: char) -> bool {
    letter.is_ascii_uppercase() && !is_vowel(letter)
}

// Single-letter English frequencies used whenever the corpus has nothing to
// say about a pattern. Ordered most-to-least frequent.
pub const BASE_FREQUENCIES: [(char, f64); 26] = [
    ('E', 0.127),
    ('T', 0.091),
    ('A', 0.081),
    ('O', 0.075),
    ('I', 0.070),
    ('N', 0.069),
    ('S', 0.067),
    ('H', 0.063),
    ('R', 0.061),
    ('D', 0.060),
    ('L', 0.043),
    ('U', 0.040),
    ('C', 0.028),
    ('M', 0.024),
    ('F', 0.024),
    ('W', 0.024),
    ('Y', 0.020),
    ('G', 0.020),
    ('P', 0.020),
    ('B', 0.019),
    ('V', 0.013),
    ('K', 0.010),
    ('Q', 0.008),
    ('J', 0.001),
    ('X', 0.001),
    ('Z', 0.001),
];

// The recommenders carry their own, slightly different, static tables.
pub const VOWEL_FREQUENCIES: [(char, f64); 5] = [
    ('E', 0.127),
    ('A', 0.082),
    ('O', 0.075),
    ('I', 0.070),
    ('U', 0.028),
];

pub const CONSONANT_FREQUENCIES: [(char, f64); 21] = [
    ('T', 0.091),
    ('N', 0.067),
    ('S', 0.063),
    ('H', 0.061),
    ('R', 0.060),
    ('D', 0.043),
    ('L', 0.040),
    ('C', 0.028),
    ('M', 0.024),
    ('W', 0.024),
    ('F', 0.022),
    ('G', 0.020),
    ('Y', 0.020),
    ('P', 0.019),
    ('B', 0.013),
    ('V', 0.010),
    ('K', 0.008),
    ('J', 0.001),
    ('X', 0.001),
    ('Q', 0.001),
    ('Z', 0.001),
];

/// Letters used to fill blanks when there is no model to rank them.
pub const FILL_CYCLE: [char; 12] = ['E', 'T', 'A', 'O', 'I', 'N', 'S', 'H', 'R', 'D', 'L', 'U'];

/// Frequency of `letter` in [`BASE_FREQUENCIES`], if it is a letter at all.
pub fn base_frequency(letter: char) -> Option<f64> {
    BASE_FREQUENCIES
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, f)| *f)
}

/// The letters guessed so far in a puzzle.
///
/// Stored as a bitfield with bit 0 for 'A' up to bit 25 for 'Z'. Anything
/// that is not an ASCII letter is ignored on the way in, and lowercase is
/// folded to uppercase.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const fn new() -> Self {
        Self(0)
    }

    fn bit(letter: char) -> Option<u32> {
        let upper = letter.to_ascii_uppercase();
        upper
            .is_ascii_uppercase()
            .then(|| 1 << (upper as u32 - 'A' as u32))
    }

    /// Adds a letter, returning `false` if it was already present or is not a letter.
    pub fn insert(&mut self, letter: char) -> bool {
        match Self::bit(letter) {
            Some(bit) if self.0 & bit == 0 => {
                self.0 |= bit;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, letter: char) -> bool {
        Self::bit(letter).map_or(false, |bit| self.0 & bit != 0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        ('A'..='Z').filter(move |&c| self.contains(c))
    }

    pub fn vowel_count(&self) -> usize {
        VOWELS.iter().filter(|&&v| self.contains(v)).count()
    }

    /// Parses a loose list of letters such as `"T,H,E"`, `"t h e"` or `"THE"`.
    pub fn parse(text: &str) -> Self {
        text.chars().collect()
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = Self::new();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

impl<'a> FromIterator<&'a char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = &'a char>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}
