use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use stochastics::commands::base_commands::{CliArgs, Commands};
use stochastics::commands::context::CourseContext;
use stochastics::commands::finance_cmd::{dscr_command, irr_command};
use stochastics::commands::lessons_cmd::{lesson_command, lessons_command};
use stochastics::commands::progress_cmd::{notes_command, progress_command, reset_command};
use stochastics::commands::quiz_cmd::quiz_command;
use stochastics::commands::simulate_cmd::simulate_command;
use stochastics::logging::init_tracing;

fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "stochastics=info",
        _ => "stochastics=debug",
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(default_log_filter(args.verbose));

    match args.command {
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            generate(shell, &mut command, name, &mut std::io::stdout());
            return ExitCode::SUCCESS;
        }
        Commands::Irr { .. } => return irr_command(args.command),
        Commands::Dscr { .. } => return dscr_command(args.command),
        _ => {}
    }

    let mut ctx = match CourseContext::from_args(&args) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to load course: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Commands::Lessons => lessons_command(&ctx, args.command),
        Commands::Lesson { .. } => lesson_command(&mut ctx, args.command),
        Commands::Simulate { .. } => simulate_command(&mut ctx, args.command),
        Commands::Quiz { .. } => quiz_command(&mut ctx, args.command),
        Commands::Progress => progress_command(&ctx, args.command),
        Commands::Notes { .. } => notes_command(&mut ctx, args.command),
        Commands::Reset => reset_command(&mut ctx, args.command),
        Commands::Irr { .. } | Commands::Dscr { .. } | Commands::Completions { .. } => {
            ExitCode::SUCCESS
        }
    }
}
