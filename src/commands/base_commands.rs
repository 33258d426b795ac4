use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::lesson::LessonId;
use crate::services::statistics::IRR_DEFAULT_GUESS;

#[derive(Parser)]
#[command(name = "stochastics", author, version, about)]
pub struct CliArgs {
    /// Course config YAML
    #[arg(short, long, global = true)]
    pub config: Option<String>,
    /// Lesson catalog YAML (defaults to the built-in course)
    #[arg(long, global = true)]
    pub lessons: Option<String>,
    /// Progress JSON file
    #[arg(long, global = true)]
    pub progress: Option<String>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List phases and lessons with their progress
    Lessons,
    /// Show a lesson and mark it as started
    Lesson {
        /// Lesson id
        id: LessonId,
    },
    /// Run a lesson's Monte Carlo simulation
    Simulate {
        /// Lesson id
        id: LessonId,
        /// Parameter override as name=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of histogram bins
        #[arg(short, long)]
        bins: Option<usize>,
        /// Output YAML file for the result
        #[arg(short, long)]
        output: Option<String>,
        /// Output PNG file for the histogram
        #[arg(long)]
        histogram: Option<String>,
    },
    /// Score quiz answers for a lesson
    Quiz {
        /// Lesson id
        id: LessonId,
        /// Answers YAML file (question id: answer)
        #[arg(short, long)]
        answers: String,
    },
    /// Show overall and per-phase progress
    Progress,
    /// Save notes for a lesson
    Notes {
        /// Lesson id
        id: LessonId,
        /// Notes text
        text: String,
    },
    /// Clear all stored progress
    Reset,
    /// Internal rate of return of a cashflow series (first value at t=0)
    Irr {
        /// Cashflows, one per period
        #[arg(required = true, allow_negative_numbers = true)]
        cashflows: Vec<f64>,
        /// Initial guess for the rate
        #[arg(short, long, default_value_t = IRR_DEFAULT_GUESS, allow_negative_numbers = true)]
        guess: f64,
    },
    /// Debt service coverage ratio
    Dscr {
        /// Net cashflow of the period
        #[arg(allow_negative_numbers = true)]
        net_cashflow: f64,
        /// Debt service due in the period
        #[arg(allow_negative_numbers = true)]
        debt_service: f64,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
