use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use tracing::error;

use wheel_guesser::{
    advisor,
    logging::init_tracing,
    player::{plan_turn, Play, PlayerStyle},
    solutions::SolutionSource,
    wheel::{analyze_wheel, WHEEL_SEGMENTS},
    Engine, EngineConfig, LetterSet, Pattern, Result, Strategy,
};

/// Advice for a computer player in a Wheel of Fortune style game.
#[derive(Parser, Debug)]
#[clap(name = "wheel_guesser", version)]
struct Cli {
    /// TOML config file; defaults to ./wheel_guesser.toml when present
    #[clap(long, global = true, value_parser)]
    config: Option<PathBuf>,

    /// Directory holding the puzzle corpus files
    #[clap(long, global = true, value_parser)]
    corpus_dir: Option<PathBuf>,

    /// Word list, one word per line
    #[clap(long, global = true, value_parser)]
    dictionary: Option<PathBuf>,

    /// Log decisions and model summaries to stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Board {
    /// The board as showing, `_` for every hidden letter
    showing: String,

    /// Letters called so far, e.g. "RSTLNE"
    #[clap(short, long, default_value = "")]
    guessed: String,
}

impl Board {
    fn pattern(&self) -> Pattern {
        Pattern::new(&self.showing)
    }

    fn guessed(&self) -> LetterSet {
        LetterSet::parse(&self.guessed)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spin, buy a vowel or solve
    Decide {
        #[clap(flatten)]
        board: Board,

        /// Your winnings this round
        #[clap(short, long, default_value_t = 0, value_parser)]
        winnings: u32,

        /// An opponent's winnings; repeat for each opponent
        #[clap(long = "opponent", value_parser)]
        opponents: Vec<u32>,

        #[clap(long, default_value = "optimized", value_parser)]
        strategy: Strategy,
    },

    /// Best vowel to buy
    Vowel {
        #[clap(flatten)]
        board: Board,
    },

    /// Best consonant to call
    Consonant {
        #[clap(flatten)]
        board: Board,
    },

    /// Likely solutions for the board
    Candidates {
        #[clap(flatten)]
        board: Board,
    },

    /// Check a solve attempt before making it
    Check {
        #[clap(flatten)]
        board: Board,

        /// The full solution you want to try
        guess: String,
    },

    /// Plan a computer player's turn
    Plan {
        #[clap(flatten)]
        board: Board,

        /// Winnings of every seat at the table, comma separated
        #[clap(long, value_parser, value_delimiter = ',', required = true)]
        table: Vec<u32>,

        /// Seat of the player to plan for, counting from 0
        #[clap(long, default_value_t = 0, value_parser)]
        seat: usize,

        #[clap(long, default_value = "smart", value_parser)]
        style: PlayerStyle,
    },

    /// Wheel odds
    Wheel,
}

fn wrap(text: &str) -> String {
    textwrap::fill(text, textwrap::termwidth())
}

fn engine(cli: &Cli) -> Result<Engine> {
    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.corpus_dir {
        config.corpus_dir = dir.clone();
    }
    if let Some(path) = &cli.dictionary {
        config.dictionary_path = path.clone();
    }
    Ok(Engine::from_config(config))
}

fn run(cli: &Cli) -> Result<()> {
    if let Command::Wheel = cli.command {
        let wheel = analyze_wheel();
        println!("segments: {}", WHEEL_SEGMENTS.iter().join(" "));
        println!("expected value per spin: ${:.2}", wheel.expected_value);
        println!("average cash segment:    ${:.2}", wheel.average_positive_value);
        println!("cash:      {:>5.1}%", wheel.success_probability * 100.0);
        println!("bankrupt:  {:>5.1}%", wheel.bankrupt_probability * 100.0);
        println!("lose turn: {:>5.1}%", wheel.lose_turn_probability * 100.0);
        return Ok(());
    }

    let engine = engine(cli)?;

    match &cli.command {
        Command::Decide {
            board,
            winnings,
            opponents,
            strategy,
        } => {
            let decision = engine.decide(&board.pattern(), *winnings, &board.guessed(), opponents, *strategy);
            println!("{}", decision.action);
            println!("{}", wrap(&decision.reasoning));
        }
        Command::Vowel { board } => println!("{}", engine.best_vowel(&board.pattern(), &board.guessed())),
        Command::Consonant { board } => {
            println!("{}", engine.best_consonant(&board.pattern(), &board.guessed()))
        }
        Command::Candidates { board } => {
            let distribution = engine.solution_distribution(&board.pattern(), &board.guessed());
            let source = match distribution.source {
                SolutionSource::Corpus => "corpus",
                SolutionSource::Dictionary => "dictionary",
                SolutionSource::FrequencyFill => "letter frequencies",
                SolutionSource::Nothing => "nothing",
            };
            println!(
                "{} corpus matches, best guesses from {}:",
                distribution.candidate_count, source
            );
            for candidate in &distribution.candidates {
                println!("{:>6.1}%  {}", candidate.probability * 100.0, candidate.solution);
            }
        }
        Command::Check { board, guess } => {
            let advice = advisor::advise(&engine, &board.showing, guess, &board.guessed());
            println!("{}: {:.1}%", advice.verdict, advice.confidence);
            if let Some(problem) = &advice.problem {
                println!("{}", wrap(problem));
            }
            if let Some(possibilities) = &advice.possibilities {
                println!(
                    "{} blanks, {} letters left, up to {} fillings ({} uncertainty)",
                    possibilities.blank_count,
                    possibilities.remaining_letters,
                    possibilities.estimated,
                    possibilities.uncertainty
                );
            }
        }
        Command::Plan {
            board,
            table,
            seat,
            style,
        } => {
            let plan = plan_turn(&engine, *style, &board.pattern(), table, *seat, &board.guessed());
            match &plan.play {
                Play::Solve {
                    candidate,
                    probability,
                } => println!("solve: {} (p={:.2})", candidate, probability),
                Play::BuyVowel(vowel) => println!("buy vowel: {}", vowel),
                Play::Spin { consonant } => println!("spin, then call {}", consonant),
            }
            println!("{}", wrap(&plan.reasoning));
        }
        Command::Wheel => {}
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "giving up");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
