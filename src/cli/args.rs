//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: Extract translations, merge them into the catalog, write the
//!   catalog, its diff against the baseline and the output index
//! - `init`: Initialize glean configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Directory to start looking for the config file from (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Output directory for the catalog and index (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Default, Parser)]
pub struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write a diff of the catalog against the baseline (overrides config file)
    #[arg(long)]
    pub diff: bool,

    /// Warn about values shared by several keys (overrides config file)
    #[arg(long)]
    pub duplicate_warnings: bool,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: BuildArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys and write the catalog, diff and index
    Build(BuildCommand),
    /// Initialize a new .gleanrc.json configuration file
    Init,
}
