use std::collections::{BTreeMap, HashSet};
use std::io;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::lesson::{Lesson, LessonCatalog, LessonId, Phase, PhaseInfo, SimulationConfig};
use crate::domain::quiz::{AnswerKey, Quiz, QuizQuestion};
use crate::domain::simulation::{SimulationKind, SimulationParams};

/// The course shipped with the binary.
pub const BUILTIN_LESSONS_YAML: &str = include_str!("../../content/lessons.yaml");

#[derive(Error, Debug)]
pub enum LessonYamlError {
    #[error("failed to read lessons yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse lessons yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(LessonId),
    #[error("phase {phase} references unknown lesson {lesson}")]
    UnknownPhaseLesson { phase: Phase, lesson: LessonId },
    #[error("question {question}: correct answer {correct:?} is not one of its options")]
    CorrectAnswerNotAnOption { question: String, correct: String },
    #[error("question {question}: tolerance must not be negative")]
    NegativeTolerance { question: String },
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    phases: Vec<PhaseRecord>,
    lessons: Vec<LessonRecord>,
}

#[derive(Debug, Deserialize)]
struct PhaseRecord {
    id: Phase,
    title: String,
    #[serde(default)]
    subtitle: String,
    lessons: Vec<LessonId>,
}

#[derive(Debug, Deserialize)]
struct LessonRecord {
    id: LessonId,
    title: String,
    phase: Phase,
    #[serde(default)]
    concept: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    key_insight: String,
    #[serde(default)]
    reflection_questions: Vec<String>,
    simulation: SimulationRecord,
    quiz: QuizRecord,
}

#[derive(Debug, Deserialize)]
struct SimulationRecord {
    kind: SimulationKind,
    #[serde(default)]
    description: String,
    #[serde(default)]
    default_params: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct QuizRecord {
    passing_score: u32,
    questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum QuestionRecord {
    MultipleChoice {
        id: String,
        prompt: String,
        options: Vec<String>,
        correct: String,
        #[serde(default)]
        explanation: String,
    },
    TrueFalse {
        id: String,
        prompt: String,
        correct: bool,
        #[serde(default)]
        explanation: String,
    },
    Numerical {
        id: String,
        prompt: String,
        target: f64,
        #[serde(default)]
        tolerance: f64,
        #[serde(default)]
        explanation: String,
    },
}

pub fn load_builtin_catalog() -> Result<LessonCatalog, LessonYamlError> {
    deserialize_catalog_from_yaml_str(BUILTIN_LESSONS_YAML)
}

pub fn load_catalog_from_yaml_file(path: &str) -> Result<LessonCatalog, LessonYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_catalog_from_yaml_str(&contents)
}

/// Loads the file at `path` when given, otherwise the built-in course.
pub fn load_catalog(path: Option<&str>) -> Result<LessonCatalog, LessonYamlError> {
    match path {
        Some(path) => load_catalog_from_yaml_file(path),
        None => load_builtin_catalog(),
    }
}

pub fn deserialize_catalog_from_yaml_str(input: &str) -> Result<LessonCatalog, LessonYamlError> {
    let record: CatalogRecord = serde_yaml::from_str(input)?;

    let mut seen = HashSet::new();
    let lessons = record
        .lessons
        .into_iter()
        .map(|lesson| {
            if !seen.insert(lesson.id) {
                return Err(LessonYamlError::DuplicateLesson(lesson.id));
            }
            lesson_from_record(lesson)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let phases = record
        .phases
        .into_iter()
        .map(|phase| {
            if let Some(unknown) = phase.lessons.iter().find(|id| !seen.contains(*id)) {
                return Err(LessonYamlError::UnknownPhaseLesson {
                    phase: phase.id,
                    lesson: *unknown,
                });
            }
            Ok(PhaseInfo {
                id: phase.id,
                title: phase.title,
                subtitle: phase.subtitle,
                lessons: phase.lessons,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LessonCatalog::new(phases, lessons))
}

fn lesson_from_record(record: LessonRecord) -> Result<Lesson, LessonYamlError> {
    let mut default_params = SimulationParams::new();
    for (name, value) in &record.simulation.default_params {
        default_params.set(name, *value);
    }

    let questions = record
        .quiz
        .questions
        .into_iter()
        .map(question_from_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Lesson {
        id: record.id,
        title: record.title,
        phase: record.phase,
        concept: record.concept,
        context: record.context,
        key_insight: record.key_insight,
        reflection_questions: record.reflection_questions,
        simulation: SimulationConfig {
            kind: record.simulation.kind,
            description: record.simulation.description,
            default_params,
        },
        quiz: Quiz {
            questions,
            passing_score: record.quiz.passing_score,
        },
    })
}

fn question_from_record(record: QuestionRecord) -> Result<QuizQuestion, LessonYamlError> {
    let question = match record {
        QuestionRecord::MultipleChoice {
            id,
            prompt,
            options,
            correct,
            explanation,
        } => {
            if !options.contains(&correct) {
                return Err(LessonYamlError::CorrectAnswerNotAnOption {
                    question: id,
                    correct,
                });
            }
            QuizQuestion {
                id,
                prompt,
                explanation,
                answer: AnswerKey::MultipleChoice { options, correct },
            }
        }
        QuestionRecord::TrueFalse {
            id,
            prompt,
            correct,
            explanation,
        } => QuizQuestion {
            id,
            prompt,
            explanation,
            answer: AnswerKey::TrueFalse { correct },
        },
        QuestionRecord::Numerical {
            id,
            prompt,
            target,
            tolerance,
            explanation,
        } => {
            if tolerance < 0.0 {
                return Err(LessonYamlError::NegativeTolerance { question: id });
            }
            QuizQuestion {
                id,
                prompt,
                explanation,
                answer: AnswerKey::Numerical { target, tolerance },
            }
        }
    };
    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
phases:
  - id: A
    title: Phase A
    subtitle: Random Variables
    lessons: [1]
lessons:
  - id: 1
    title: One Random Variable
    phase: A
    simulation:
      kind: single-normal
      default_params: { mean: 1500, stdDev: 100, samples: 1000 }
    quiz:
      passing_score: 80
      questions:
        - id: l1q1
          kind: multiple-choice
          prompt: What does 1500 represent?
          options: [The exact value, The expected value]
          correct: The expected value
        - id: l1q2
          kind: true-false
          prompt: A base case ignores uncertainty.
          correct: true
        - id: l1q3
          kind: numerical
          prompt: E[X] of a fair coin?
          target: 0.5
          tolerance: 0.01
"#;

    #[test]
    fn parses_minimal_catalog() {
        let catalog = deserialize_catalog_from_yaml_str(MINIMAL).unwrap();
        assert_eq!(catalog.phases().len(), 1);
        let lesson = catalog.lesson(1).unwrap();
        assert_eq!(lesson.simulation.kind, SimulationKind::SingleNormal);
        assert_eq!(lesson.simulation.default_params.get("stdDev"), Some(100.0));
        assert_eq!(lesson.quiz.passing_score, 80);
        assert_eq!(lesson.quiz.questions.len(), 3);
        assert_eq!(
            lesson.quiz.questions[2].answer,
            AnswerKey::Numerical {
                target: 0.5,
                tolerance: 0.01
            }
        );
    }

    #[test]
    fn builtin_catalog_has_fifteen_lessons_in_four_phases() {
        let catalog = load_builtin_catalog().unwrap();
        assert_eq!(catalog.lessons().len(), 15);
        assert_eq!(catalog.phases().len(), 4);
        assert_eq!(catalog.phase_for_lesson(15).unwrap().id, Phase::D);
        assert_eq!(catalog.lesson(10).unwrap().simulation.kind, SimulationKind::BinaryDefault);
        assert!(catalog
            .lessons()
            .iter()
            .all(|lesson| lesson.quiz.questions.len() == 3));
    }

    #[test]
    fn rejects_duplicate_lesson_ids() {
        let input = MINIMAL.replace("lessons: [1]", "lessons: []")
            + r#"  - id: 1
    title: Duplicate
    phase: A
    simulation:
      kind: single-normal
    quiz:
      passing_score: 80
      questions: []
"#;
        let err = deserialize_catalog_from_yaml_str(&input).unwrap_err();
        assert!(matches!(err, LessonYamlError::DuplicateLesson(1)));
    }

    #[test]
    fn rejects_phase_referencing_unknown_lesson() {
        let input = MINIMAL.replace("lessons: [1]", "lessons: [1, 2]");
        let err = deserialize_catalog_from_yaml_str(&input).unwrap_err();
        assert!(matches!(
            err,
            LessonYamlError::UnknownPhaseLesson {
                phase: Phase::A,
                lesson: 2
            }
        ));
    }

    #[test]
    fn rejects_correct_answer_missing_from_options() {
        let input = MINIMAL.replace("correct: The expected value", "correct: The P90");
        let err = deserialize_catalog_from_yaml_str(&input).unwrap_err();
        assert!(matches!(err, LessonYamlError::CorrectAnswerNotAnOption { .. }));
    }

    #[test]
    fn rejects_unknown_simulation_kind() {
        let input = MINIMAL.replace("kind: single-normal", "kind: lognormal");
        let err = deserialize_catalog_from_yaml_str(&input).unwrap_err();
        assert!(matches!(err, LessonYamlError::Parse(_)));
    }

    #[test]
    fn rejects_negative_tolerance() {
        let input = MINIMAL.replace("tolerance: 0.01", "tolerance: -1");
        let err = deserialize_catalog_from_yaml_str(&input).unwrap_err();
        assert!(matches!(err, LessonYamlError::NegativeTolerance { .. }));
    }
}
