use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "wheel_guesser.toml";
pub const ENV_PREFIX: &str = "WHEEL_GUESSER";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the puzzle corpus files.
    pub corpus_dir: PathBuf,
    /// Corpus files in priority order; earlier files win when entries repeat.
    pub corpus_files: Vec<String>,
    pub dictionary_path: PathBuf,
    /// Upper bound on candidates fed into the letter model.
    pub max_candidates: usize,
    /// How many candidates the solution distribution keeps.
    pub top_k: usize,
    /// When false, solution estimates come from synthesis only, even if the
    /// corpus holds the exact puzzle.
    pub allow_corpus_lookup: bool,
    pub thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("data/puzzles"),
            corpus_files: ["valid.csv", "train.csv", "test.csv", "years_1_25.csv"]
                .into_iter()
                .map(String::from)
                .collect(),
            dictionary_path: PathBuf::from("/usr/share/dict/words"),
            max_candidates: 400,
            top_k: 10,
            allow_corpus_lookup: true,
            thresholds: Thresholds::default(),
        }
    }
}

/// Tunable gates of the decision policy.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub near_complete_ratio: f64,
    pub near_complete_confidence: f64,
    pub solve_confidence: f64,
    /// How far an opponent must lead before solving gets more aggressive.
    pub pressure_margin: u32,
    pub pressure_discount: f64,
    /// Vowel information gain above which buying is preferred.
    pub info_heavy: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            near_complete_ratio: 0.8,
            near_complete_confidence: 0.6,
            solve_confidence: 0.75,
            pressure_margin: 500,
            pressure_discount: 0.15,
            info_heavy: 0.25,
        }
    }
}

impl EngineConfig {
    /// Reads a TOML file and `WHEEL_GUESSER__*` environment overrides.
    ///
    /// Without an explicit `path`, `wheel_guesser.toml` in the working
    /// directory is used if it exists.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = ::config::Config::builder()
            .add_source(file.format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!(?config, "loaded engine config");
        Ok(config)
    }

    pub fn corpus_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.corpus_files.iter().map(|name| self.corpus_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_candidates, 400);
        assert_eq!(
            config.corpus_paths().collect::<Vec<_>>(),
            vec![
                PathBuf::from("data/puzzles/valid.csv"),
                PathBuf::from("data/puzzles/train.csv"),
                PathBuf::from("data/puzzles/test.csv"),
                PathBuf::from("data/puzzles/years_1_25.csv"),
            ]
        );
        assert_eq!(config.thresholds.solve_confidence, 0.75);
        assert_eq!(config.thresholds.near_complete_confidence, 0.6);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file should be created");
        writeln!(
            file,
            "max_candidates = 50\nallow_corpus_lookup = false\n\n[thresholds]\nsolve_confidence = 0.9"
        )
        .expect("temp file should be writable");

        let config = EngineConfig::load(Some(file.path())).expect("config should parse");
        assert_eq!(config.max_candidates, 50);
        assert!(!config.allow_corpus_lookup);
        assert_eq!(config.thresholds.solve_confidence, 0.9);
        assert_eq!(config.thresholds.pressure_margin, 500);
        assert_eq!(config.top_k, 10);
    }

    #[test]
    fn environment_overrides_the_file() {
        // no other test reads this key, so setting it cannot leak into them
        const KEY: &str = "WHEEL_GUESSER__THRESHOLDS__PRESSURE_DISCOUNT";

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file should be created");
        writeln!(file, "[thresholds]\npressure_discount = 0.2").expect("temp file should be writable");

        std::env::set_var(KEY, "0.3");
        let loaded = EngineConfig::load(Some(file.path()));
        std::env::remove_var(KEY);

        let config = loaded.expect("config should parse");
        assert_eq!(config.thresholds.pressure_discount, 0.3);
        assert_eq!(config.thresholds.solve_confidence, 0.75);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(EngineConfig::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
