use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::domain::quiz::{Quiz, SubmittedAnswer};

#[derive(Error, Debug)]
pub enum AnswerFileError {
    #[error("failed to read answers file: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse answers yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Answers = BTreeMap<String, SubmittedAnswer>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub id: String,
    pub correct: bool,
    pub answered: bool,
    pub explanation: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    /// `round(100 * correct / total)`, 0 for a quiz without questions.
    pub score: u32,
    pub passing_score: u32,
    pub passed: bool,
    pub questions: Vec<QuestionResult>,
}

/// Scores `answers` (question id => submitted value) against `quiz`.
/// Unanswered questions count as incorrect.
pub fn score_quiz(quiz: &Quiz, answers: &Answers) -> QuizOutcome {
    let questions: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .map(|question| {
            let submitted = answers.get(&question.id);
            QuestionResult {
                id: question.id.clone(),
                correct: submitted.is_some_and(|answer| question.is_correct(answer)),
                answered: submitted.is_some(),
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let correct = questions.iter().filter(|result| result.correct).count();
    let total = questions.len();
    let score = if total == 0 {
        0
    } else {
        (correct as f64 / total as f64 * 100.0).round() as u32
    };

    QuizOutcome {
        correct,
        total,
        score,
        passing_score: quiz.passing_score,
        passed: score >= quiz.passing_score,
        questions,
    }
}

pub fn deserialize_answers_from_yaml_str(input: &str) -> Result<Answers, AnswerFileError> {
    if input.trim().is_empty() {
        return Ok(Answers::new());
    }
    Ok(serde_yaml::from_str(input)?)
}

pub fn load_answers_from_yaml_file(path: &str) -> Result<Answers, AnswerFileError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_answers_from_yaml_str(&contents)
}
