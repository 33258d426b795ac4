use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerKey {
    MultipleChoice { options: Vec<String>, correct: String },
    TrueFalse { correct: bool },
    Numerical { target: f64, tolerance: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub explanation: String,
    pub answer: AnswerKey,
}

impl QuizQuestion {
    /// Exact match for choice and true/false questions, absolute difference
    /// within tolerance for numerical ones. An answer of the wrong shape is
    /// never correct.
    pub fn is_correct(&self, submitted: &SubmittedAnswer) -> bool {
        match (&self.answer, submitted) {
            (AnswerKey::MultipleChoice { correct, .. }, SubmittedAnswer::Choice(choice)) => {
                choice == correct
            }
            (AnswerKey::TrueFalse { correct }, SubmittedAnswer::Flag(flag)) => flag == correct,
            (AnswerKey::Numerical { target, tolerance }, SubmittedAnswer::Number(value)) => {
                (value - target).abs() <= *tolerance
            }
            _ => false,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.answer {
            AnswerKey::MultipleChoice { .. } => "multiple-choice",
            AnswerKey::TrueFalse { .. } => "true-false",
            AnswerKey::Numerical { .. } => "numerical",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    /// Percentage needed to pass, e.g. 80.
    pub passing_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    Flag(bool),
    Number(f64),
    Choice(String),
}
