//! Dispatches to the appropriate command handler based on the parsed arguments.

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, build::build, init::init},
};
use anyhow::Result;

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Build(cmd)) => build(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
