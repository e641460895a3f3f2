//! Pagemark CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use pagemark_cli::logging::{LogConfig, LogFormat, init_logging};
use pagemark_cli::session::Session;
use pagemark_cli::settings::Settings;
use pagemark_core::CoreError;
use pagemark_storage::StorageError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            eprintln!("error: {error:#}");
            if let Some(hint) = suggestion(&error) {
                eprintln!("hint: {hint}");
            }
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let data_dir = settings.data_dir(cli.data_dir.as_deref());
    let assume_yes = cli.yes || settings.confirm.assume_yes;

    let mut session = Session::open(&data_dir)?;
    commands::run(cli.command, &mut session, assume_yes)
}

/// Storage problems carry a remediation hint for the user.
fn suggestion(error: &anyhow::Error) -> Option<String> {
    let storage = error.chain().find_map(|cause| {
        cause.downcast_ref::<StorageError>().or_else(|| {
            match cause.downcast_ref::<CoreError>() {
                Some(CoreError::Storage(inner)) => Some(inner),
                _ => None,
            }
        })
    })?;
    storage.suggestion()
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
