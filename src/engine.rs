//! The engine owns configuration plus the two read-only resources, the
//! puzzle corpus and the word list. Both are loaded the first time they are
//! needed and never change afterwards.

use std::sync::OnceLock;

use tracing::{debug, instrument, warn};

use crate::{
    config::EngineConfig,
    corpus::{Corpus, CorpusEntry},
    decision::{self, Decision, Strategy, Turn},
    dictionary::Dictionary,
    letters::LetterSet,
    matcher,
    model::LetterModel,
    pattern::Pattern,
    recommend,
    solutions::{self, SolutionDistribution},
    synth::{self, Synthesis},
};

static SHARED: OnceLock<Engine> = OnceLock::new();

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    corpus: OnceLock<Corpus>,
    dictionary: OnceLock<Dictionary>,
}

impl Engine {
    /// An engine that will load its corpus and dictionary from the paths in
    /// `config` on first use.
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            corpus: OnceLock::new(),
            dictionary: OnceLock::new(),
        }
    }

    /// An engine over in-memory resources. Nothing is read from disk.
    pub fn with_resources(corpus: Corpus, dictionary: Dictionary, config: EngineConfig) -> Self {
        Self {
            config,
            corpus: OnceLock::from(corpus),
            dictionary: OnceLock::from(dictionary),
        }
    }

    /// The process-wide engine, configured from `wheel_guesser.toml` and the
    /// environment. A broken configuration falls back to the defaults.
    pub fn shared() -> &'static Engine {
        SHARED.get_or_init(|| {
            let config = EngineConfig::load(None).unwrap_or_else(|err| {
                warn!(%err, "using default engine config");
                EngineConfig::default()
            });
            Self::from_config(config)
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        self.corpus
            .get_or_init(|| Corpus::load(self.config.corpus_paths()))
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.dictionary.get_or_init(|| {
            Dictionary::load(&self.config.dictionary_path).unwrap_or_else(|err| {
                warn!(%err, "no dictionary, dictionary synthesis disabled");
                Dictionary::empty()
            })
        })
    }

    pub fn find_candidates(&self, pattern: &Pattern) -> Vec<&CorpusEntry> {
        matcher::find_candidates(self.corpus(), pattern)
    }

    fn model_from(&self, pattern: &Pattern, guessed: &LetterSet, matches: &[&CorpusEntry]) -> LetterModel {
        let capped = &matches[..matches.len().min(self.config.max_candidates)];
        LetterModel::build(pattern, guessed, capped)
    }

    pub fn letter_model(&self, pattern: &Pattern, guessed: &LetterSet) -> LetterModel {
        let matches = self.find_candidates(pattern);
        self.model_from(pattern, guessed, &matches)
    }

    /// Letter model and solution estimate from a single corpus scan.
    fn evidence(&self, pattern: &Pattern, guessed: &LetterSet) -> (LetterModel, SolutionDistribution) {
        let matches = self.find_candidates(pattern);
        let model = self.model_from(pattern, guessed, &matches);
        let lookup: &[&CorpusEntry] = if self.config.allow_corpus_lookup {
            &matches
        } else {
            &[]
        };
        let distribution = solutions::estimate(pattern, lookup, &model, self.dictionary(), self.config.top_k);
        (model, distribution)
    }

    pub fn solution_distribution(&self, pattern: &Pattern, guessed: &LetterSet) -> SolutionDistribution {
        self.evidence(pattern, guessed).1
    }

    pub fn synthesize(&self, pattern: &Pattern, guessed: &LetterSet) -> String {
        let model = self.letter_model(pattern, guessed);
        synth::synthesize(pattern, &model, self.dictionary())
    }

    pub fn synthesize_from_dictionary(&self, pattern: &Pattern, guessed: &LetterSet) -> Synthesis {
        let model = self.letter_model(pattern, guessed);
        synth::synthesize_from_dictionary(pattern, &model, self.dictionary())
    }

    #[instrument(level = "debug", skip_all, fields(%pattern, winnings = winnings, %strategy))]
    pub fn decide(
        &self,
        pattern: &Pattern,
        winnings: u32,
        guessed: &LetterSet,
        opponents: &[u32],
        strategy: Strategy,
    ) -> Decision {
        let turn = Turn {
            pattern,
            winnings,
            guessed,
            opponents,
            strategy,
        };
        let decision = decision::decide(&turn, &self.config.thresholds, || self.evidence(pattern, guessed));
        debug!(action = %decision.action, reasoning = %decision.reasoning, "decided");
        decision
    }

    pub fn best_vowel(&self, pattern: &Pattern, guessed: &LetterSet) -> char {
        recommend::best_vowel(&self.letter_model(pattern, guessed), guessed)
    }

    pub fn best_consonant(&self, pattern: &Pattern, guessed: &LetterSet) -> char {
        recommend::best_consonant(&self.letter_model(pattern, guessed), guessed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Action;
    use pretty_assertions::assert_eq;
    use std::{fs, io::Write};
    use tracing_test::traced_test;

    fn engine(solutions: &[&str], words: &[&str]) -> Engine {
        Engine::with_resources(
            Corpus::from_solutions(solutions),
            Dictionary::from_words(words),
            EngineConfig::default(),
        )
    }

    #[test]
    fn candidate_cap_only_limits_the_model() {
        let config = EngineConfig {
            max_candidates: 2,
            ..EngineConfig::default()
        };
        let corpus = Corpus::from_solutions(["BOOK", "LOOK", "TOOK", "COOK", "HOOK"]);
        let engine = Engine::with_resources(corpus, Dictionary::empty(), config);
        let pattern = Pattern::new("_OO_");
        let guessed = LetterSet::parse("O");

        assert_eq!(engine.letter_model(&pattern, &guessed).candidate_count, 2);
        assert_eq!(engine.solution_distribution(&pattern, &guessed).candidate_count, 5);
    }

    #[test]
    fn corpus_lookup_can_be_disabled() {
        let config = EngineConfig {
            allow_corpus_lookup: false,
            ..EngineConfig::default()
        };
        let engine = Engine::with_resources(
            Corpus::from_solutions(["THE QUICK BROWN FOX"]),
            Dictionary::empty(),
            config,
        );
        let pattern = Pattern::new("THE QUICK _RO_N _O_");
        let guessed = LetterSet::parse("THEQUICKRON");

        let distribution = engine.solution_distribution(&pattern, &guessed);
        assert!(distribution.is_synthesized());
        // the model still learns from the corpus
        assert_eq!(engine.letter_model(&pattern, &guessed).candidate_count, 1);
        assert_eq!(engine.best_consonant(&pattern, &guessed), 'B');
    }

    #[test]
    fn recommends_from_corpus() {
        let engine = engine(&["BOOK", "BAKE"], &[]);
        let guessed = LetterSet::parse("BK");
        assert_eq!(engine.best_vowel(&Pattern::new("B__K"), &guessed), 'O');
    }

    #[test]
    fn synthesizes_through_the_dictionary() {
        let engine = engine(&[], &["quick"]);
        let pattern = Pattern::new("QU_CK");
        assert_eq!(engine.synthesize(&pattern, &LetterSet::new()), "QUICK");
        assert_eq!(
            engine.synthesize_from_dictionary(&pattern, &LetterSet::new()).candidate(),
            Some("QUICK")
        );
    }

    #[test]
    #[traced_test]
    fn decides_with_in_memory_resources() {
        let engine = engine(&["THE QUICK BROWN FOX"], &[]);
        let decision = engine.decide(
            &Pattern::new("THE QUICK _RO_N _O_"),
            1200,
            &LetterSet::parse("THEQUICKRON"),
            &[],
            Strategy::Optimized,
        );
        assert_eq!(decision.action, Action::Solve);
        assert!(logs_contain("winnings=1200"));
        assert!(logs_contain("strategy=optimized"));
    }

    #[test]
    #[traced_test]
    fn missing_resources_degrade() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let mut file = fs::File::create(dir.path().join("valid.csv")).expect("corpus file should be created");
        writeln!(file, "WHEEL OF FORTUNE,Phrase").expect("corpus file should be writable");

        let config = EngineConfig {
            corpus_dir: dir.path().to_path_buf(),
            dictionary_path: dir.path().join("no-words"),
            ..EngineConfig::default()
        };
        let engine = Engine::from_config(config);

        assert_eq!(engine.corpus().len(), 1);
        assert!(engine.dictionary().is_empty());
        assert!(logs_contain("skipping corpus file"));
        assert!(logs_contain("no dictionary"));

        let pattern = Pattern::new("_____ __ _______");
        assert_eq!(engine.find_candidates(&pattern).len(), 1);
    }

    #[test]
    fn resources_load_once() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let corpus_path = dir.path().join("valid.csv");
        fs::write(&corpus_path, "BOOK,Thing\n").expect("corpus file should be writable");
        let words_path = dir.path().join("words");
        fs::write(&words_path, "book\n").expect("word list should be writable");

        let engine = Engine::from_config(EngineConfig {
            corpus_dir: dir.path().to_path_buf(),
            dictionary_path: words_path.clone(),
            ..EngineConfig::default()
        });
        let corpus: *const Corpus = engine.corpus();
        let dictionary: *const Dictionary = engine.dictionary();
        assert_eq!(engine.corpus().len(), 1);

        // later reads come from the loaded copy, not the files
        fs::write(&corpus_path, "BOOK,Thing\nLOOK,Thing\n").expect("corpus file should be writable");
        fs::remove_file(&words_path).expect("word list should be removable");
        assert_eq!(engine.corpus() as *const Corpus, corpus);
        assert_eq!(engine.dictionary() as *const Dictionary, dictionary);
        assert_eq!(engine.corpus().len(), 1);
        assert_eq!(engine.dictionary().len(), 1);
    }
}
