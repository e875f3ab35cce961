//! Privacy codelist engine CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use pce_cli::logging::{LogConfig, LogFormat, init_logging};
use pce_standards::RegistryConfig;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    load_cascade, load_registry, run_codes, run_coverage, run_export, run_impact, run_import,
    run_label, run_lists, run_search, run_suggest, run_validate,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = RegistryConfig::resolve(cli.data_dir.as_deref());
    match &cli.command {
        Command::Lists => {
            run_lists(&load_registry(&config)?);
        }
        Command::Codes(args) => run_codes(&load_registry(&config)?, args)?,
        Command::Validate(args) => {
            let all_valid = run_validate(&load_registry(&config)?, args)?;
            return Ok(if all_valid { 0 } else { 1 });
        }
        Command::Label(args) => run_label(&load_registry(&config)?, args)?,
        Command::Search(args) => run_search(&load_registry(&config)?, args)?,
        Command::Impact(args) => {
            let registry = load_registry(&config)?;
            run_impact(&load_cascade(&registry, &config)?, args);
        }
        Command::Suggest(args) => {
            let registry = load_registry(&config)?;
            run_suggest(&load_cascade(&registry, &config)?, args);
        }
        Command::Export(args) => run_export(&load_registry(&config)?, args)?,
        Command::Import(args) => run_import(args)?,
        Command::Coverage(args) => run_coverage(&load_registry(&config)?, args)?,
    }
    Ok(0)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_log_level_disables_env_filter() {
        let cli = Cli::parse_from(["pce", "--log-level", "debug", "lists"]);
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn parses_impact_arguments() {
        let cli = Cli::parse_from([
            "pce",
            "impact",
            "health-data",
            "--protection-level",
            "baseline",
            "--recipient",
            "internal",
            "--recipient",
            "third-country",
        ]);
        let Command::Impact(args) = cli.command else {
            panic!("expected impact");
        };
        assert_eq!(args.protection_level.as_deref(), Some("baseline"));
        assert_eq!(args.recipients, vec!["internal", "third-country"]);
    }

    #[test]
    fn validate_needs_a_code() {
        assert!(Cli::try_parse_from(["pce", "validate", "protection-levels"]).is_err());
    }
}
