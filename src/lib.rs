//! Turn decisions for a computer player in a Wheel of Fortune style game.
//!
//! Given the board as it is showing, the letters called so far and the
//! money at the table, the engine says whether to spin, buy a vowel or
//! solve, and which letter to call. It matches the board against a corpus of
//! known puzzles, falls back to a word list and then to English letter
//! frequencies, and never needs the game loop for anything but the board.
//!
//! ```no_run
//! use wheel_guesser::{decide, Action, LetterSet, Strategy};
//!
//! let guessed = LetterSet::parse("THEQUICKRON");
//! let decision = decide("THE QUICK _RO_N _O_", 1200, &guessed, &[], Strategy::Optimized);
//! if decision.action == Action::Solve {
//!     println!("{}", decision.reasoning);
//! }
//! ```

pub mod advisor;
pub mod config;
pub mod corpus;
pub mod decision;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod letters;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod pattern;
pub mod player;
pub mod recommend;
pub mod solutions;
pub mod synth;
pub mod wheel;

pub use config::EngineConfig;
pub use decision::{Action, Decision, Strategy, VOWEL_PRICE};
pub use engine::Engine;
pub use error::{Error, Result};
pub use letters::LetterSet;
pub use pattern::Pattern;

/// Decides this turn with the shared engine.
pub fn decide(showing: &str, winnings: u32, guessed: &LetterSet, opponents: &[u32], strategy: Strategy) -> Decision {
    Engine::shared().decide(&Pattern::new(showing), winnings, guessed, opponents, strategy)
}

pub fn best_vowel(showing: &str, guessed: &LetterSet) -> char {
    Engine::shared().best_vowel(&Pattern::new(showing), guessed)
}

pub fn best_consonant(showing: &str, guessed: &LetterSet) -> char {
    Engine::shared().best_consonant(&Pattern::new(showing), guessed)
}
