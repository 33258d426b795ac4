pub mod histogram;
pub mod lesson_yaml;
pub mod percentiles;
pub mod progress_store;
pub mod quiz_scoring;
pub mod sampler;
pub mod simulation;
pub mod simulation_types;
pub mod statistics;
