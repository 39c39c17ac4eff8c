//! Spin, buy a vowel, or solve.
//!
//! [`decide`] runs a fixed sequence of gates, the first that fires wins:
//! affordability, near-complete solve, strategy overrides, confidence solve,
//! and finally the expected-utility comparison. The letter model and the
//! solution estimate are only computed once the affordability gate has
//! passed.

use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    config::Thresholds,
    error::ParseError,
    letters::{LetterSet, VOWEL_FREQUENCIES},
    model::LetterModel,
    pattern::{GameState, Pattern},
    solutions::SolutionDistribution,
    wheel::{analyze_wheel, WheelAnalysis},
};

/// Price of a vowel. Both the affordability gate and the vowel utility use it.
pub const VOWEL_PRICE: u32 = 250;

const VOWEL_LETTER_VALUE: f64 = 90.0;
const VOWEL_INFO_VALUE: f64 = 80.0;
const LOSE_TURN_COST_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Spin,
    BuyVowel,
    Solve,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spin => "spin",
            Self::BuyVowel => "buy_vowel",
            Self::Solve => "solve",
        })
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spin" => Ok(Self::Spin),
            "buy_vowel" | "vowel" => Ok(Self::BuyVowel),
            "solve" => Ok(Self::Solve),
            _ => Err(ParseError::Action(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Expected utility, checked against the weighted score.
    #[default]
    Optimized,
    AlwaysSpin,
    /// Solve whenever there is any candidate at all.
    AlwaysSolve,
    /// The weighted score alone.
    Legacy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optimized => "optimized",
            Self::AlwaysSpin => "always_spin",
            Self::AlwaysSolve => "always_solve",
            Self::Legacy => "legacy",
        })
    }
}

impl FromStr for Strategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "optimized" => Ok(Self::Optimized),
            "always_spin" => Ok(Self::AlwaysSpin),
            "always_solve" => Ok(Self::AlwaysSolve),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ParseError::Strategy(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// Names the numbers that decided it.
    pub reasoning: String,
}

impl Decision {
    fn new(action: Action, reasoning: impl Into<String>) -> Self {
        Self {
            action,
            reasoning: reasoning.into(),
        }
    }
}

/// Everything about the turn that comes from the caller.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub pattern: &'a Pattern,
    pub winnings: u32,
    pub guessed: &'a LetterSet,
    pub opponents: &'a [u32],
    pub strategy: Strategy,
}

/// What buying the best vowel is expected to achieve.
#[derive(Debug, Clone, PartialEq)]
pub struct VowelAnalysis {
    pub vowel: Option<char>,
    pub expected_letters: f64,
    pub probability_of_hit: f64,
    pub info_gain: f64,
    pub available_vowels: usize,
}

impl VowelAnalysis {
    pub fn new(state: &GameState, model: &LetterModel, guessed: &LetterSet) -> Self {
        if let Some(vowel) = model.vowel_pick() {
            return Self {
                vowel: Some(vowel),
                expected_letters: model.expected_reveals(vowel).unwrap_or(0.0),
                probability_of_hit: model.prob_any(vowel).unwrap_or(0.0),
                info_gain: model.info_gain(vowel).unwrap_or(0.0),
                available_vowels: model.available_vowels,
            };
        }

        let available: Vec<(char, f64)> = VOWEL_FREQUENCIES
            .iter()
            .copied()
            .filter(|(v, _)| !guessed.contains(*v))
            .collect();
        let best = available
            .iter()
            .copied()
            .fold(None, |best: Option<(char, f64)>, (v, f)| match best {
                Some((_, top)) if f <= top => best,
                _ => Some((v, f)),
            });

        match best {
            None => Self {
                vowel: None,
                expected_letters: 0.0,
                probability_of_hit: 0.0,
                info_gain: 0.0,
                available_vowels: 0,
            },
            Some((vowel, frequency)) => Self {
                vowel: Some(vowel),
                expected_letters: state.vowel_density * state.blank_count as f64 * frequency * 2.0,
                probability_of_hit: (state.vowel_density * 2.0).min(0.9),
                info_gain: 0.0,
                available_vowels: available.len(),
            },
        }
    }
}

/// Cash a spin is expected to earn with the best consonant.
pub fn spin_expected_cash(state: &GameState, wheel: &WheelAnalysis, model: &LetterModel) -> f64 {
    let (expected_consonants, consonant_prob) = match model.consonant_pick() {
        Some(consonant) => (
            model.expected_reveals(consonant).unwrap_or(0.5).max(0.5),
            model.prob_any(consonant).unwrap_or(0.2).clamp(0.05, 1.0),
        ),
        None => {
            let remaining = state.estimated_remaining_consonants as f64;
            let prob = if state.blank_count > 0 {
                remaining / state.blank_count as f64
            } else {
                0.5
            };
            (remaining.clamp(0.5, 3.0), prob.clamp(0.05, 1.0))
        }
    };

    wheel.average_positive_value * wheel.success_probability * expected_consonants * consonant_prob
}

/// Additive per-action score from fixed heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionScore {
    pub spin: f64,
    pub buy_vowel: f64,
    pub reasoning: String,
}

impl DecisionScore {
    pub fn calculate(state: &GameState, wheel: &WheelAnalysis, vowel: &VowelAnalysis, winnings: u32) -> Self {
        let mut spin = 0.0;
        let mut buy_vowel = 0.0;

        let spin_expected = wheel.average_positive_value
            * wheel.success_probability
            * state.estimated_remaining_consonants.min(3) as f64;
        spin += spin_expected * 0.3;
        buy_vowel += vowel.expected_letters * 100.0 * 0.3;
        buy_vowel += vowel.info_gain * 300.0;

        let risk_penalty = wheel.bankrupt_probability * 500.0 + wheel.lose_turn_probability * 200.0;
        spin -= risk_penalty * 0.2;

        if state.completion_ratio < 0.3 {
            buy_vowel += 100.0;
        } else if state.completion_ratio > 0.6 {
            spin += 100.0;
        }

        if state.vowel_density > 0.4 {
            buy_vowel += 150.0;
        } else if state.vowel_density < 0.2 {
            spin += 100.0;
        }

        if winnings > 1000 {
            spin += 50.0;
        } else if winnings < 500 {
            buy_vowel += 75.0;
        }

        let reasoning = if buy_vowel > spin {
            let mut text = format!(
                "Buy vowel: High vowel density ({:.2}), expected {:.1} letters revealed",
                state.vowel_density, vowel.expected_letters
            );
            if vowel.info_gain > 0.15 {
                text.push_str(&format!(", info gain {:.2}", vowel.info_gain));
            }
            text
        } else {
            format!(
                "Spin wheel: Expected value ${:.0}, {:.1}% success rate",
                spin_expected,
                wheel.success_probability * 100.0
            )
        };

        Self {
            spin,
            buy_vowel,
            reasoning,
        }
    }

    /// Ties go to spinning.
    pub fn favors_spin(&self) -> bool {
        self.spin >= self.buy_vowel
    }

    fn into_decision(self) -> Decision {
        let action = if self.buy_vowel > self.spin {
            Action::BuyVowel
        } else {
            Action::Spin
        };
        Decision::new(action, self.reasoning)
    }
}

/// Dollar utilities of the two letter-buying actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utilities {
    pub spin_ev: f64,
    pub spin: f64,
    pub vowel: f64,
}

impl Utilities {
    pub fn new(spin_ev: f64, wheel: &WheelAnalysis, vowel: &VowelAnalysis, winnings: u32) -> Self {
        let winnings = f64::from(winnings);
        let downside = wheel.bankrupt_probability * winnings
            + wheel.lose_turn_probability * winnings * LOSE_TURN_COST_SHARE;
        Self {
            spin_ev,
            spin: spin_ev - downside,
            vowel: vowel.expected_letters * VOWEL_LETTER_VALUE + vowel.info_gain * VOWEL_INFO_VALUE
                - f64::from(VOWEL_PRICE),
        }
    }
}

/// The optimized choice between spinning and buying a vowel.
///
/// Spinning needs the higher utility, a weighted score that agrees, and a
/// vowel whose information gain is at most `info_heavy`.
pub fn choose_optimized(
    utilities: &Utilities,
    score: &DecisionScore,
    vowel: &VowelAnalysis,
    confidence: f64,
    info_heavy: f64,
) -> Decision {
    let heavy = vowel.info_gain > info_heavy;
    if utilities.spin > utilities.vowel && score.favors_spin() && !heavy {
        return Decision::new(
            Action::Spin,
            format!(
                "Spin EV ${:.0} vs vowel utility ${:.0}; confidence {:.1}%",
                utilities.spin_ev,
                utilities.vowel,
                confidence * 100.0
            ),
        );
    }

    let mut reasoning = format!(
        "Buy vowel: utility ${:.0} vs spin EV ${:.0}; confidence {:.1}%",
        utilities.vowel,
        utilities.spin_ev,
        confidence * 100.0
    );
    if heavy {
        reasoning.push_str(&format!(", info gain {:.2}", vowel.info_gain));
    }
    Decision::new(Action::BuyVowel, reasoning)
}

pub fn under_pressure(winnings: u32, opponents: &[u32], margin: u32) -> bool {
    opponents
        .iter()
        .max()
        .map_or(false, |&leader| leader > winnings.saturating_add(margin))
}

/// Runs the decision sequence for one turn.
///
/// `evidence` builds the letter model and solution estimate; it is not
/// called when the player cannot afford a vowel.
pub fn decide<F>(turn: &Turn<'_>, thresholds: &Thresholds, evidence: F) -> Decision
where
    F: FnOnce() -> (LetterModel, SolutionDistribution),
{
    // The gates run in a fixed order and the first one to fire decides the
    // turn. Affordability comes first and looks at nothing but the money, so
    // a player short of a vowel always spins whatever the board or strategy
    // says. Only after that do we pay for the model and the solution
    // estimate.
    if turn.winnings < VOWEL_PRICE {
        return Decision::new(
            Action::Spin,
            format!("Insufficient funds to buy vowel (${} required)", VOWEL_PRICE),
        );
    }

    let state = GameState::analyze(turn.pattern);
    let wheel = analyze_wheel();
    let (model, distribution) = evidence();
    let vowel = VowelAnalysis::new(&state, &model, turn.guessed);
    let confidence = distribution.top_probability;

    debug!(
        completion = state.completion_ratio,
        confidence,
        candidates = distribution.candidate_count,
        strategy = %turn.strategy,
        "deciding"
    );

    // A nearly finished board is solved as long as anything supports the
    // guess. This gate sits ahead of the strategies, so even AlwaysSpin
    // takes a board that is ready.
    if state.completion_ratio > thresholds.near_complete_ratio
        && (confidence >= thresholds.near_complete_confidence || distribution.candidate_count > 0)
    {
        return Decision::new(
            Action::Solve,
            format!(
                "Puzzle is {:.1}% complete - time to solve",
                state.completion_ratio * 100.0
            ),
        );
    }

    match turn.strategy {
        Strategy::AlwaysSpin => return Decision::new(Action::Spin, "Strategy: always spin"),
        Strategy::AlwaysSolve if confidence > 0.0 => {
            return Decision::new(Action::Solve, "Strategy: always solve when any confidence exists")
        }
        _ => {}
    }

    let spin_ev = spin_expected_cash(&state, &wheel, &model);

    // The normal solve bar drops when someone at the table is pulling away.
    let mut solve_threshold = thresholds.solve_confidence;
    if under_pressure(turn.winnings, turn.opponents, thresholds.pressure_margin) {
        solve_threshold -= thresholds.pressure_discount;
    }
    if confidence >= solve_threshold {
        return Decision::new(
            Action::Solve,
            format!("Solve: top candidate has probability {:.1}%", confidence * 100.0),
        );
    }

    // Nothing forced the turn, so it comes down to letters: the dollar
    // utilities of spinning and buying, and the older weighted score. The
    // optimized strategy wants both to agree before it spins; everything else
    // goes by the score alone.
    let utilities = Utilities::new(spin_ev, &wheel, &vowel, turn.winnings);
    let score = DecisionScore::calculate(&state, &wheel, &vowel, turn.winnings);
    debug!(
        spin_utility = utilities.spin,
        vowel_utility = utilities.vowel,
        spin_score = score.spin,
        vowel_score = score.buy_vowel,
        "compared utilities"
    );

    match turn.strategy {
        Strategy::Optimized => choose_optimized(&utilities, &score, &vowel, confidence, thresholds.info_heavy),
        _ => score.into_decision(),
    }
}
