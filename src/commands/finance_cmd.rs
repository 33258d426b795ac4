use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::services::statistics::{calculate_dscr, calculate_irr_with_guess};

pub fn irr_command(cmd: Commands) -> ExitCode {
    if let Commands::Irr { cashflows, guess } = cmd {
        let estimate = calculate_irr_with_guess(&cashflows, guess);
        println!("IRR: {:.2}%", estimate.rate * 100.0);
        if !estimate.converged {
            println!(
                "Warning: no convergence after {} iterations, the estimate may be unreliable",
                estimate.iterations
            );
        }
    }
    ExitCode::SUCCESS
}

pub fn dscr_command(cmd: Commands) -> ExitCode {
    if let Commands::Dscr {
        net_cashflow,
        debt_service,
    } = cmd
    {
        let dscr = calculate_dscr(net_cashflow, debt_service);
        if dscr.is_infinite() {
            println!("DSCR: infinite (no debt service)");
        } else {
            println!("DSCR: {dscr:.2}x");
        }
    }
    ExitCode::SUCCESS
}
