use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::commands::context::CourseContext;
use crate::commands::report_format::{format_simulation_report, value_label};
use crate::domain::simulation::params_from_overrides;
use crate::services::histogram::write_histogram_png;
use crate::services::sampler::RngSampler;
use crate::services::simulation::SimulationSession;

pub fn simulate_command(ctx: &mut CourseContext, cmd: Commands) -> ExitCode {
    if let Commands::Simulate {
        id,
        params,
        seed,
        bins,
        output,
        histogram,
    } = cmd
    {
        let lesson = match ctx.lesson(id) {
            Ok(lesson) => lesson.clone(),
            Err(e) => {
                eprintln!("Failed to simulate lesson: {e}");
                return ExitCode::FAILURE;
            }
        };
        let overrides = match params_from_overrides(params.as_slice()) {
            Ok(overrides) => overrides,
            Err(e) => {
                eprintln!("Failed to parse parameters: {e}");
                return ExitCode::FAILURE;
            }
        };

        let bin_count = bins.unwrap_or(ctx.config.histogram_bins);
        let mut session = SimulationSession::new(&lesson, bin_count).with_run_delay(ctx.run_delay());
        if let Err(e) = session.apply_overrides(&overrides) {
            eprintln!("Failed to apply parameters: {e}");
            return ExitCode::FAILURE;
        }

        let mut sampler = RngSampler::from_seed_option(seed);
        let result = match session.run(&mut sampler, &mut ctx.store) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Failed to run simulation: {e}");
                return ExitCode::FAILURE;
            }
        };

        println!("{}", format_simulation_report(&lesson, result));

        if let Some(output) = output {
            let yaml = match serde_yaml::to_string(result) {
                Ok(contents) => contents,
                Err(e) => {
                    eprintln!("Failed to serialize simulation output: {e}");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = std::fs::write(&output, yaml) {
                eprintln!("Failed to write simulation output: {e}");
                return ExitCode::FAILURE;
            }
            println!("Simulation result written to {output}");
        }

        if let Some(histogram) = histogram {
            if result.histogram.is_empty() {
                println!("No histogram written: the run produced no samples");
            } else if let Err(e) =
                write_histogram_png(&histogram, &result.histogram, value_label(&lesson))
            {
                eprintln!("Failed to write simulation histogram: {e}");
                return ExitCode::FAILURE;
            } else {
                println!("Simulation histogram written to {histogram}");
            }
        }
    }
    ExitCode::SUCCESS
}
