//! meeple-pool CLI
//!
//! Pool the board game collections of several BoardGameGeek users, then
//! filter and sort the merged list to pick something to play.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;
mod table;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use meeple_pool_bgg::ClientSettings;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let settings = resolve_settings(&cli);
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Games {
            usernames,
            filter,
            json,
            limit,
        } => commands::games::run_games(
            &settings,
            &usernames,
            &filter.to_state(),
            json,
            limit,
            quiet,
        ),
        Commands::User { username, json } => {
            commands::user::run_user(&settings, &username, json, quiet)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show();
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Init { force } => commands::config::run_config_init(force),
        },
    };

    if let Err(e) = result {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stderr, |t| t.red()), e);
        std::process::exit(1);
    }
}

/// Loaded settings with command-line overrides applied.
fn resolve_settings(cli: &Cli) -> ClientSettings {
    let mut settings = ClientSettings::load();
    if let Some(url) = &cli.base_url {
        settings.base_url = url.clone();
    }
    if let Some(ms) = cli.interval_ms {
        settings.min_request_interval_ms = ms;
    }
    log::debug!("Using settings: {:?}", settings);
    settings
}
