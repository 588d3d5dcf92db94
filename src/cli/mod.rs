//! Command-line interface layer.
//!
//! Parses arguments, runs a command and prints its result. The engine in
//! `crate::core` never prints issues itself, so it can be used as a library.

use anyhow::Result;

mod args;
pub mod commands;
mod exit_status;
pub mod report;
mod run;

pub use args::*;
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    report::print(&result);

    Ok(ExitStatus::from_error_count(result.error_count))
}
