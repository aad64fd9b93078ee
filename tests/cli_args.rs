// tests/cli_args.rs

use clap::Parser;

use assetpipe::cli::{CliArgs, Command, LogLevel};
use assetpipe::graph::PipelineName;
use assetpipe::logging::{level_from_log_level, parse_level_str};

#[test]
fn no_subcommand_means_dev() {
    let args = CliArgs::try_parse_from(["assetpipe"]).unwrap();
    assert_eq!(args.command, None);
    assert_eq!(args.pipeline(), PipelineName::Dev);
    assert_eq!(args.config, "Assetpipe.toml");
    assert!(!args.dry_run);
}

#[test]
fn build_selects_release() {
    let args = CliArgs::try_parse_from(["assetpipe", "build", "--config", "site.toml"]).unwrap();
    assert_eq!(args.command, Some(Command::Build));
    assert_eq!(args.pipeline(), PipelineName::Release);
    assert_eq!(args.config, "site.toml");
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let args =
        CliArgs::try_parse_from(["assetpipe", "dev", "--dry-run", "--log-level", "debug"]).unwrap();
    assert!(args.dry_run);
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(CliArgs::try_parse_from(["assetpipe", "deploy"]).is_err());
}

#[test]
fn log_level_strings() {
    assert_eq!(parse_level_str(" Warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("TRACE"), Some(tracing::Level::TRACE));
    assert_eq!(parse_level_str("loud"), None);
    assert_eq!(level_from_log_level(LogLevel::Error), tracing::Level::ERROR);
}
