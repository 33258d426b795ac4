pub mod lesson;
pub mod progress;
pub mod quiz;
pub mod simulation;
