use chrono::{DateTime, TimeZone, Utc};

use crate::domain::lesson::{Lesson, LessonId, Phase, SimulationConfig};
use crate::domain::quiz::{AnswerKey, Quiz, QuizQuestion};
use crate::domain::simulation::{SimulationKind, SimulationParams};
use crate::services::progress_store::ProgressStoreError;
use crate::services::sampler::Sampler;
use crate::services::simulation::CompletionSink;

// A Sampler that replays fixed draws in a loop; an empty list always yields 0.
pub struct FixedSampler {
    normals: Vec<f64>,
    uniforms: Vec<f64>,
    next_normal: usize,
    next_uniform: usize,
}

impl FixedSampler {
    pub fn new(normals: Vec<f64>, uniforms: Vec<f64>) -> Self {
        Self {
            normals,
            uniforms,
            next_normal: 0,
            next_uniform: 0,
        }
    }
}

fn replay(values: &[f64], cursor: &mut usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let value = values[*cursor % values.len()];
    *cursor += 1;
    value
}

impl Sampler for FixedSampler {
    fn standard_normal(&mut self) -> f64 {
        replay(&self.normals, &mut self.next_normal)
    }

    fn unit_uniform(&mut self) -> f64 {
        replay(&self.uniforms, &mut self.next_uniform)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub completed: Vec<LessonId>,
}

impl CompletionSink for RecordingSink {
    fn simulation_completed(&mut self, lesson_id: LessonId) -> Result<(), ProgressStoreError> {
        self.completed.push(lesson_id);
        Ok(())
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

pub fn build_lesson(id: LessonId, phase: Phase, kind: SimulationKind) -> Lesson {
    Lesson {
        id,
        title: format!("Lesson {id}"),
        phase,
        concept: "concept".to_string(),
        context: "context".to_string(),
        key_insight: "insight".to_string(),
        reflection_questions: vec!["question?".to_string()],
        simulation: SimulationConfig {
            kind,
            description: "description".to_string(),
            default_params: SimulationParams::new()
                .with("mean", 1500.0)
                .with("stdDev", 100.0)
                .with("samples", 100.0),
        },
        quiz: Quiz {
            questions: vec![QuizQuestion {
                id: format!("l{id}q1"),
                prompt: "Is a base case a distribution?".to_string(),
                explanation: "No.".to_string(),
                answer: AnswerKey::TrueFalse { correct: false },
            }],
            passing_score: 80,
        },
    }
}
