//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `figma-tokens`.
#[derive(Debug, Parser)]
#[command(name = "figma-tokens", version, about = "Export Figma variables as design tokens")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the primitive and admin files and write the token JSON files.
    Generate {
        /// Directory the `tokens/` tree is written below.
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
        /// Replay a recorded session directory instead of calling Figma.
        #[arg(long, value_name = "DIR")]
        replay: Option<PathBuf>,
    },
}
