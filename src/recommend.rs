use crate::{
    letters::{LetterSet, CONSONANT_FREQUENCIES, VOWEL_FREQUENCIES},
    model::LetterModel,
};

pub const DEFAULT_VOWEL: char = 'E';
pub const DEFAULT_CONSONANT: char = 'T';

/// Most frequent unguessed letter of a static table. Earlier entries win ties.
fn most_frequent(table: &[(char, f64)], guessed: &LetterSet) -> Option<char> {
    table
        .iter()
        .filter(|(letter, _)| !guessed.contains(*letter))
        .fold(None, |best: Option<(char, f64)>, &(letter, freq)| match best {
            Some((_, top)) if freq <= top => best,
            _ => Some((letter, freq)),
        })
        .map(|(letter, _)| letter)
}

pub fn best_vowel(model: &LetterModel, guessed: &LetterSet) -> char {
    model
        .vowel_pick()
        .or_else(|| most_frequent(&VOWEL_FREQUENCIES, guessed))
        .unwrap_or(DEFAULT_VOWEL)
}

pub fn best_consonant(model: &LetterModel, guessed: &LetterSet) -> char {
    model
        .consonant_pick()
        .or_else(|| most_frequent(&CONSONANT_FREQUENCIES, guessed))
        .unwrap_or(DEFAULT_CONSONANT)
}
