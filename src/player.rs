//! Computer players built on the decision policy.
//!
//! A player turns a [`Decision`] into a concrete play for its seat. The
//! cautious and bold styles bend the decision in one direction before the
//! affordability check is applied again.

use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    decision::{Action, Decision, Strategy, VOWEL_PRICE},
    engine::Engine,
    error::ParseError,
    letters::LetterSet,
    pattern::Pattern,
};

/// Conservative players keep buying vowels until this many have been called.
const CONSERVATIVE_VOWEL_LIMIT: usize = 3;
const CONSERVATIVE_MIN_BLANKS: usize = 3;
const AGGRESSIVE_BLANK_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStyle {
    #[default]
    Smart,
    Conservative,
    Aggressive,
}

impl fmt::Display for PlayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Smart => "smart",
            Self::Conservative => "conservative",
            Self::Aggressive => "aggressive",
        })
    }
}

impl FromStr for PlayerStyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smart" => Ok(Self::Smart),
            "conservative" => Ok(Self::Conservative),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(ParseError::PlayerStyle(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Play {
    Solve { candidate: String, probability: f64 },
    BuyVowel(char),
    /// Spin, then call `consonant` if the wheel lands on cash.
    Spin { consonant: char },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnPlan {
    pub reasoning: String,
    pub play: Play,
}

impl PlayerStyle {
    /// Adjusts the policy's decision to this style.
    pub fn adjust(self, decision: Decision, pattern: &Pattern, winnings: u32, guessed: &LetterSet) -> Decision {
        match self {
            Self::Smart => decision,
            Self::Conservative
                if decision.action == Action::Spin
                    && winnings >= VOWEL_PRICE
                    && pattern.blank_count() > CONSERVATIVE_MIN_BLANKS
                    && guessed.vowel_count() < CONSERVATIVE_VOWEL_LIMIT =>
            {
                Decision {
                    action: Action::BuyVowel,
                    reasoning: "Conservative strategy: preserving money for vowels".to_owned(),
                }
            }
            Self::Aggressive
                if decision.action == Action::BuyVowel && pattern.blank_ratio() < AGGRESSIVE_BLANK_RATIO =>
            {
                Decision {
                    action: Action::Spin,
                    reasoning: "Aggressive strategy: spinning for higher rewards".to_owned(),
                }
            }
            _ => decision,
        }
    }
}

/// Plans the turn of the player in `seat`; everyone else at the table is an
/// opponent.
pub fn plan_turn(
    engine: &Engine,
    style: PlayerStyle,
    pattern: &Pattern,
    table_winnings: &[u32],
    seat: usize,
    guessed: &LetterSet,
) -> TurnPlan {
    let winnings = table_winnings.get(seat).copied().unwrap_or(0);
    let opponents: Vec<u32> = table_winnings
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != seat)
        .map(|(_, &w)| w)
        .collect();

    let decision = engine.decide(pattern, winnings, guessed, &opponents, Strategy::Optimized);
    let Decision { action, mut reasoning } = style.adjust(decision, pattern, winnings, guessed);

    let play = match action {
        Action::Solve => {
            let distribution = engine.solution_distribution(pattern, guessed);
            match distribution.top() {
                Some(top) => Play::Solve {
                    candidate: top.solution.clone(),
                    probability: distribution.top_probability,
                },
                None => Play::Solve {
                    candidate: engine.synthesize(pattern, guessed),
                    probability: distribution.top_probability,
                },
            }
        }
        Action::BuyVowel if winnings >= VOWEL_PRICE => Play::BuyVowel(engine.best_vowel(pattern, guessed)),
        Action::BuyVowel => {
            reasoning.push_str("; cannot afford a vowel, spinning instead");
            Play::Spin {
                consonant: engine.best_consonant(pattern, guessed),
            }
        }
        Action::Spin => Play::Spin {
            consonant: engine.best_consonant(pattern, guessed),
        },
    };

    debug!(%style, seat, ?play, "planned turn");
    TurnPlan { reasoning, play }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, corpus::Corpus, dictionary::Dictionary};
    use pretty_assertions::assert_eq;

    fn engine(solutions: &[&str]) -> Engine {
        Engine::with_resources(
            Corpus::from_solutions(solutions),
            Dictionary::empty(),
            EngineConfig::default(),
        )
    }

    fn spin() -> Decision {
        Decision {
            action: Action::Spin,
            reasoning: "spin".to_owned(),
        }
    }

    fn buy() -> Decision {
        Decision {
            action: Action::BuyVowel,
            reasoning: "buy".to_owned(),
        }
    }

    #[test]
    fn parses_styles() {
        assert_eq!("Aggressive".parse(), Ok(PlayerStyle::Aggressive));
        assert_eq!(
            "reckless".parse::<PlayerStyle>(),
            Err(ParseError::PlayerStyle("reckless".to_owned()))
        );
    }

    #[test]
    fn conservative_buys_early_vowels() {
        let pattern = Pattern::new("_____ __ _______");
        let none = LetterSet::new();
        let adjusted = PlayerStyle::Conservative.adjust(spin(), &pattern, 500, &none);
        assert_eq!(adjusted.action, Action::BuyVowel);

        // broke, few blanks, or enough vowels already: keep spinning
        assert_eq!(PlayerStyle::Conservative.adjust(spin(), &pattern, 200, &none).action, Action::Spin);
        let nearly = Pattern::new("WHEEL OF FORT___");
        assert_eq!(PlayerStyle::Conservative.adjust(spin(), &nearly, 500, &none).action, Action::Spin);
        let vowels = LetterSet::parse("AEI");
        assert_eq!(PlayerStyle::Conservative.adjust(spin(), &pattern, 500, &vowels).action, Action::Spin);
    }

    #[test]
    fn aggressive_spins_on_revealed_boards() {
        let revealed = Pattern::new("WHEEL OF FORT___");
        assert_eq!(
            PlayerStyle::Aggressive.adjust(buy(), &revealed, 500, &LetterSet::new()).action,
            Action::Spin
        );
        let blank = Pattern::new("_____ __ _______");
        assert_eq!(
            PlayerStyle::Aggressive.adjust(buy(), &blank, 500, &LetterSet::new()),
            buy()
        );
    }

    #[test]
    fn smart_keeps_the_decision() {
        let pattern = Pattern::new("_____");
        assert_eq!(PlayerStyle::Smart.adjust(buy(), &pattern, 0, &LetterSet::new()), buy());
    }

    #[test]
    fn solves_with_the_top_candidate() {
        let engine = engine(&["THE QUICK BROWN FOX"]);
        let plan = plan_turn(
            &engine,
            PlayerStyle::Smart,
            &Pattern::new("THE QUICK _RO_N _O_"),
            &[300, 1200, 100],
            1,
            &LetterSet::parse("THEQUICKRON"),
        );
        assert_eq!(
            plan.play,
            Play::Solve {
                candidate: "THE QUICK BROWN FOX".to_owned(),
                probability: 1.0
            }
        );
    }

    #[test]
    fn broke_players_spin() {
        let engine = engine(&[]);
        let plan = plan_turn(
            &engine,
            PlayerStyle::Conservative,
            &Pattern::new("_____ __ _______"),
            &[100, 5000],
            0,
            &LetterSet::new(),
        );
        assert_eq!(plan.play, Play::Spin { consonant: 'T' });
        assert_eq!(plan.reasoning, "Insufficient funds to buy vowel ($250 required)");
    }

    #[test]
    fn missing_seat_has_no_money() {
        let engine = engine(&[]);
        let plan = plan_turn(
            &engine,
            PlayerStyle::Smart,
            &Pattern::new("____"),
            &[1000],
            4,
            &LetterSet::new(),
        );
        assert!(matches!(plan.play, Play::Spin { .. }));
    }
}
