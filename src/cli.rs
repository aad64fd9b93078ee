// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::graph::PipelineName;

/// Command-line arguments for `assetpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetpipe",
    version,
    about = "Build, serve and watch front-end assets.",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Assetpipe.toml` in the current working directory. A missing
    /// file means "use the built-in defaults".
    #[arg(long, global = true, value_name = "PATH", default_value = "Assetpipe.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETPIPE_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate config, print the selected pipeline, but don't run anything.
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Clean, build, serve with live reload and watch for changes (default).
    Dev,
    /// Clean and build everything for release, then exit.
    Build,
}

impl CliArgs {
    /// Pipeline selected by the subcommand; `dev` when none is given.
    pub fn pipeline(&self) -> PipelineName {
        match self.command {
            Some(Command::Build) => PipelineName::Release,
            Some(Command::Dev) | None => PipelineName::Dev,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
