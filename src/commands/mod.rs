pub mod base_commands;
pub mod context;
pub mod finance_cmd;
pub mod lessons_cmd;
pub mod progress_cmd;
pub mod quiz_cmd;
pub mod report_format;
pub mod simulate_cmd;
