use crate::domain::lesson::{Lesson, LessonCatalog, PhaseInfo};
use crate::domain::progress::{LessonProgress, PhaseProgress, UserProgress};
use crate::services::histogram::HistogramBin;
use crate::services::quiz_scoring::QuizOutcome;
use crate::services::simulation_types::SimulationResult;

const BAR_WIDTH: usize = 40;

/// Axis label for a lesson's samples. The first phase simulates irradiance.
pub fn value_label(lesson: &Lesson) -> &'static str {
    if lesson.id <= 4 { "kWh/kWp" } else { "Value" }
}

pub fn format_simulation_report(lesson: &Lesson, result: &SimulationResult) -> String {
    let stats = &result.stats;
    let mut lines = Vec::new();
    lines.push(format!("Simulation Report: Lesson {} - {}", lesson.id, lesson.title));
    lines.push(format!("Simulation: {}", result.kind));
    lines.push(format!("Samples: {}", result.sample_count));
    lines.push(format!("Parameters: {}", format_params(result)));
    lines.push(String::new());
    lines.push("Statistic | Value".to_string());
    lines.push("----------|------".to_string());
    lines.push(format_stat_row("Mean", stats.mean));
    lines.push(format_stat_row("Std Dev", stats.std_dev));
    lines.push(format_stat_row("Variance", stats.variance));
    lines.push(format_stat_row("Min", stats.min));
    lines.push(format_stat_row("Max", stats.max));
    lines.push(format_stat_row("P10", stats.p10));
    lines.push(format_stat_row("P50", stats.p50));
    lines.push(format_stat_row("P90", stats.p90));
    if !result.histogram.is_empty() {
        lines.push(String::new());
        lines.push(format!("Histogram ({}):", value_label(lesson)));
        lines.extend(format_histogram_bars(&result.histogram));
    }

    lines.join("\n")
}

fn format_params(result: &SimulationResult) -> String {
    if result.params.is_empty() {
        return "defaults".to_string();
    }
    result
        .params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_stat_row(label: &str, value: f64) -> String {
    format!("{label} | {value:.2}")
}

pub fn format_histogram_bars(bins: &[HistogramBin]) -> Vec<String> {
    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or(0).max(1);
    let label_width = bins.iter().map(|bin| bin.label.len()).max().unwrap_or(0);
    bins.iter()
        .map(|bin| {
            let bar = "#".repeat(bin.count * BAR_WIDTH / max_count);
            format!(
                "{label:>width$} | {bar} {count}",
                label = bin.label,
                width = label_width,
                count = bin.count
            )
        })
        .collect()
}

pub fn format_quiz_outcome(lesson: &Lesson, outcome: &QuizOutcome) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Quiz: Lesson {} - {}", lesson.id, lesson.title));
    for (question, result) in lesson.quiz.questions.iter().zip(&outcome.questions) {
        let verdict = match (result.answered, result.correct) {
            (false, _) => "Unanswered",
            (true, true) => "Correct",
            (true, false) => "Incorrect",
        };
        lines.push(format!("[{verdict}] {}", question.prompt));
        lines.push(format!("    {}", result.explanation));
    }
    lines.push(String::new());
    lines.push(format!(
        "Score: {}% ({}/{} correct)",
        outcome.score, outcome.correct, outcome.total
    ));
    if outcome.passed {
        lines.push("Quiz passed!".to_string());
    } else {
        lines.push(format!(
            "You need {}% to pass. Review the material and try again.",
            outcome.passing_score
        ));
    }
    lines.join("\n")
}

pub fn format_lesson(
    lesson: &Lesson,
    phase: Option<&PhaseInfo>,
    progress: &LessonProgress,
    catalog: &LessonCatalog,
) -> String {
    let mut lines = Vec::new();
    if let Some(phase) = phase {
        lines.push(format!("{} - {}", phase.title, phase.subtitle));
    }
    lines.push(format!("Lesson {}: {}", lesson.id, lesson.title));
    lines.push(format_status(progress));
    lines.push(String::new());
    lines.push("Concept".to_string());
    lines.push(lesson.concept.clone());
    lines.push(String::new());
    lines.push("Context".to_string());
    lines.push(lesson.context.clone());
    lines.push(String::new());
    lines.push(format!("Simulation ({})", lesson.simulation.kind));
    lines.push(lesson.simulation.description.clone());
    lines.push(format!(
        "Default parameters: {}",
        lesson
            .simulation
            .default_params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push(String::new());
    lines.push(format!("Key insight: {}", lesson.key_insight));
    if !lesson.reflection_questions.is_empty() {
        lines.push(String::new());
        lines.push("Questions to ask on a real deal:".to_string());
        for question in &lesson.reflection_questions {
            lines.push(format!("  - {question}"));
        }
    }
    if !progress.notes.is_empty() {
        lines.push(String::new());
        lines.push(format!("Notes: {}", progress.notes));
    }
    lines.push(String::new());
    let previous = catalog
        .previous_lesson(lesson.id)
        .map(|id| format!("previous: {id}"));
    let next = catalog.next_lesson(lesson.id).map(|id| format!("next: {id}"));
    let navigation: Vec<String> = previous.into_iter().chain(next).collect();
    if !navigation.is_empty() {
        lines.push(format!("Navigation: {}", navigation.join(", ")));
    }

    lines.join("\n")
}

fn format_status(progress: &LessonProgress) -> String {
    let mut parts = Vec::new();
    if progress.completed {
        parts.push("Completed".to_string());
    } else if progress.simulation_completed {
        parts.push("Simulation done".to_string());
    } else if progress.started {
        parts.push("Started".to_string());
    } else {
        parts.push("Not started".to_string());
    }
    if let Some(score) = progress.quiz_score {
        let plural = if progress.quiz_attempts == 1 { "" } else { "s" };
        parts.push(format!(
            "Quiz: {score}% ({} attempt{plural})",
            progress.quiz_attempts
        ));
    }
    format!("Status: {}", parts.join(" | "))
}

fn lesson_marker(progress: &LessonProgress) -> &'static str {
    if progress.completed {
        "[x]"
    } else if progress.started || progress.simulation_completed {
        "[~]"
    } else {
        "[ ]"
    }
}

pub fn format_lesson_list(catalog: &LessonCatalog, progress: &UserProgress) -> String {
    let mut lines = Vec::new();
    for phase in catalog.phases() {
        lines.push(format!("{}: {}", phase.title, phase.subtitle));
        for id in &phase.lessons {
            if let Some(lesson) = catalog.lesson(*id) {
                let marker = lesson_marker(&progress.lesson(*id));
                let current = if progress.current_lesson == *id { " <" } else { "" };
                lines.push(format!("  {marker} {:>2}. {}{current}", lesson.id, lesson.title));
            }
        }
    }
    lines.join("\n")
}

pub fn format_progress_overview(
    catalog: &LessonCatalog,
    progress: &UserProgress,
    phases: &[(PhaseInfo, PhaseProgress)],
) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Completed lessons: {}/{}",
        progress.completed_lessons(),
        catalog.lessons().len()
    ));
    lines.push(format!("Current lesson: {}", progress.current_lesson));
    lines.push(format!(
        "Last accessed: {}",
        progress.last_accessed.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(String::new());
    lines.push("Phase | Completed | Percent".to_string());
    lines.push("------|-----------|--------".to_string());
    for (phase, phase_progress) in phases {
        lines.push(format!(
            "{} | {}/{} | {}%",
            phase.title, phase_progress.completed, phase_progress.total, phase_progress.percentage
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lesson::Phase;
    use crate::domain::simulation::{SimulationKind, SimulationParams};
    use crate::services::statistics::SummaryStats;
    use crate::services::quiz_scoring::QuestionResult;
    use crate::test_support::{build_lesson, fixed_now};

    fn build_result() -> SimulationResult {
        SimulationResult {
            lesson_id: 1,
            kind: SimulationKind::SingleNormal,
            params: SimulationParams::new().with("mean", 1500.0).with("stdDev", 100.0),
            sample_count: 1000,
            stats: SummaryStats {
                mean: 1501.234,
                variance: 9950.0,
                std_dev: 99.75,
                min: 1180.0,
                max: 1820.5,
                p10: 1372.1,
                p50: 1500.9,
                p90: 1628.0,
            },
            histogram: vec![
                HistogramBin {
                    min: 1180.0,
                    max: 1500.0,
                    count: 10,
                    label: "1180-1500".to_string(),
                },
                HistogramBin {
                    min: 1500.0,
                    max: 1820.5,
                    count: 5,
                    label: "1500-1821".to_string(),
                },
            ],
            samples: Vec::new(),
        }
    }

    #[test]
    fn simulation_report_includes_stats_table_and_bars() {
        let lesson = build_lesson(1, Phase::A, SimulationKind::SingleNormal);
        let output = format_simulation_report(&lesson, &build_result());

        assert!(output.contains("Simulation Report: Lesson 1 - Lesson 1"));
        assert!(output.contains("Simulation: single-normal"));
        assert!(output.contains("Samples: 1000"));
        assert!(output.contains("Parameters: mean=1500, stdDev=100"));
        assert!(output.contains("Mean | 1501.23"));
        assert!(output.contains("P10 | 1372.10"));
        assert!(output.contains("P90 | 1628.00"));
        assert!(output.contains("Histogram (kWh/kWp):"));
        assert!(output.contains(&format!("1180-1500 | {} 10", "#".repeat(40))));
        assert!(output.contains(&format!("1500-1821 | {} 5", "#".repeat(20))));
    }

    #[test]
    fn later_lessons_use_a_generic_value_label() {
        let lesson = build_lesson(9, Phase::C, SimulationKind::SimpleCashflow);
        assert_eq!(value_label(&lesson), "Value");
    }

    #[test]
    fn quiz_outcome_reports_score_and_verdicts() {
        let lesson = build_lesson(3, Phase::A, SimulationKind::VarianceComparison);
        let outcome = QuizOutcome {
            correct: 0,
            total: 1,
            score: 0,
            passing_score: 80,
            passed: false,
            questions: vec![QuestionResult {
                id: "l3q1".to_string(),
                correct: false,
                answered: true,
                explanation: "No.".to_string(),
            }],
        };
        let output = format_quiz_outcome(&lesson, &outcome);
        assert!(output.contains("[Incorrect] Is a base case a distribution?"));
        assert!(output.contains("Score: 0% (0/1 correct)"));
        assert!(output.contains("You need 80% to pass."));
    }

    #[test]
    fn lesson_list_marks_progress_and_current_lesson() {
        let catalog = LessonCatalog::new(
            vec![PhaseInfo {
                id: Phase::A,
                title: "Phase A".to_string(),
                subtitle: "Random Variables".to_string(),
                lessons: vec![1, 2],
            }],
            vec![
                build_lesson(1, Phase::A, SimulationKind::SingleNormal),
                build_lesson(2, Phase::A, SimulationKind::ExpectedVsRealized),
            ],
        );
        let mut progress = UserProgress::new(fixed_now());
        progress.current_lesson = 2;
        progress.lesson_progress.insert(
            1,
            LessonProgress {
                completed: true,
                ..LessonProgress::default()
            },
        );

        let output = format_lesson_list(&catalog, &progress);
        assert!(output.contains("Phase A: Random Variables"));
        assert!(output.contains("[x]  1. Lesson 1"));
        assert!(output.contains("[ ]  2. Lesson 2 <"));
    }

    #[test]
    fn status_pluralises_attempts() {
        let progress = LessonProgress {
            quiz_score: Some(67),
            quiz_attempts: 2,
            simulation_completed: true,
            ..LessonProgress::default()
        };
        assert_eq!(
            format_status(&progress),
            "Status: Simulation done | Quiz: 67% (2 attempts)"
        );
    }
}
