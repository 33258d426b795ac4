use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::commands::context::CourseContext;
use crate::commands::report_format::{format_lesson, format_lesson_list};

pub fn lessons_command(ctx: &CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Lessons = cmd {
        let progress = ctx.store.progress();
        println!("{}", format_lesson_list(&ctx.catalog, &progress));
    }
    ExitCode::SUCCESS
}

pub fn lesson_command(ctx: &mut CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Lesson { id } = cmd {
        let lesson = match ctx.lesson(id) {
            Ok(lesson) => lesson.clone(),
            Err(e) => {
                eprintln!("Failed to open lesson: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = ctx.store.mark_lesson_started(id) {
            eprintln!("Failed to record lesson start: {e}");
            return ExitCode::FAILURE;
        }

        let progress = ctx.store.lesson_progress(id);
        let phase = ctx.catalog.phase_for_lesson(id);
        println!("{}", format_lesson(&lesson, phase, &progress, &ctx.catalog));
    }
    ExitCode::SUCCESS
}
