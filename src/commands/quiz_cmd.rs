use std::process::ExitCode;

use tracing::info;

use crate::commands::base_commands::Commands;
use crate::commands::context::CourseContext;
use crate::commands::report_format::format_quiz_outcome;
use crate::services::quiz_scoring::{load_answers_from_yaml_file, score_quiz};

pub fn quiz_command(ctx: &mut CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Quiz { id, answers } = cmd {
        let lesson = match ctx.lesson(id) {
            Ok(lesson) => lesson.clone(),
            Err(e) => {
                eprintln!("Failed to score quiz: {e}");
                return ExitCode::FAILURE;
            }
        };
        let submitted = match load_answers_from_yaml_file(&answers) {
            Ok(submitted) => submitted,
            Err(e) => {
                eprintln!("Failed to load answers: {e}");
                return ExitCode::FAILURE;
            }
        };

        let outcome = score_quiz(&lesson.quiz, &submitted);
        info!(lesson_id = id, score = outcome.score, passed = outcome.passed, "quiz scored");
        if let Err(e) = ctx
            .store
            .save_quiz_score(id, outcome.score, outcome.passing_score)
        {
            eprintln!("Failed to save quiz score: {e}");
            return ExitCode::FAILURE;
        }
        println!("{}", format_quiz_outcome(&lesson, &outcome));
    }
    ExitCode::SUCCESS
}
