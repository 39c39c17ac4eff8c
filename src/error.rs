use std::{io, path::PathBuf};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("problem loading config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("could not read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{0}' is not an action, expected 'spin', 'buy_vowel' or 'solve'")]
    Action(String),

    #[error("'{0}' is not a strategy, expected 'optimized', 'always_spin', 'always_solve' or 'legacy'")]
    Strategy(String),

    #[error("'{0}' is not a player style, expected 'smart', 'conservative' or 'aggressive'")]
    PlayerStyle(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
