use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::commands::context::CourseContext;
use crate::commands::report_format::format_progress_overview;

pub fn progress_command(ctx: &CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Progress = cmd {
        let progress = ctx.store.progress();
        let phases: Vec<_> = ctx
            .catalog
            .phases()
            .iter()
            .map(|phase| (phase.clone(), ctx.store.phase_progress(&phase.lessons)))
            .collect();
        println!("{}", format_progress_overview(&ctx.catalog, &progress, &phases));
    }
    ExitCode::SUCCESS
}

pub fn notes_command(ctx: &mut CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Notes { id, text } = cmd {
        if let Err(e) = ctx.lesson(id) {
            eprintln!("Failed to save notes: {e}");
            return ExitCode::FAILURE;
        }
        match ctx.store.save_lesson_notes(id, &text) {
            Ok(()) => println!("Notes saved for lesson {id}"),
            Err(e) => {
                eprintln!("Failed to save notes: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

pub fn reset_command(ctx: &mut CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Reset = cmd {
        match ctx.store.reset_progress() {
            Ok(()) => println!("Progress reset"),
            Err(e) => {
                eprintln!("Failed to reset progress: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
