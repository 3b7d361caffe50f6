//! eventdesk CLI entry point.

use std::io;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::debug;

use eventdesk_cli::cli::{Cli, Command, ConfigAction};
use eventdesk_cli::config::AppConfig;
use eventdesk_cli::error::{CliError, CliResult};
use eventdesk_cli::{LoginMode, Menu};
use eventdesk_core::{EventDate, EventStore, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    // An explicit path must exist; the default one may be absent.
    let (config, config_path) = match cli.config {
        Some(ref path) => (AppConfig::load_from(path)?, path.clone()),
        None => (AppConfig::load()?, AppConfig::default_path()),
    };

    init_tracing(
        config
            .logging
            .tracing_config(cli.debug || config.debug, cli.log_format.map(Into::into)),
    )?;
    debug!(path = %config_path.display(), "Configuration loaded");

    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => eventdesk_cli::commands::config::dump(&config, &config_path),
            ConfigAction::Validate => eventdesk_cli::commands::config::validate(&config),
            ConfigAction::Path => eventdesk_cli::commands::config::path(&config_path),
        },
        None => run_menu(&cli, &config),
    }
}

fn run_menu(cli: &Cli, config: &AppConfig) -> CliResult<()> {
    let policy = config.slots.to_policy()?;
    let today = today()?;
    debug!(%today, "Starting menu");

    let login = if cli.admin {
        LoginMode::Immediate
    } else {
        LoginMode::Ask
    };
    let mut menu = Menu::new(
        io::stdin().lock(),
        io::stdout().lock(),
        EventStore::with_slot_policy(policy),
        config.admin.clone(),
        today,
    )
    .with_output_format(cli.output_format());
    menu.run(login)?;
    Ok(())
}

/// Today's local date.
fn today() -> CliResult<EventDate> {
    let now = Local::now().date_naive();
    EventDate::from_naive(now).ok_or(CliError::UnsupportedToday(now))
}
