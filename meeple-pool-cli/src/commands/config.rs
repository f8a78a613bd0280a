use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_pool_bgg::{ClientSettings, SettingSource};

use crate::CliError;

/// Show current settings and their sources.
pub(crate) fn run_config_show() {
    let path = meeple_pool_bgg::config_path();
    let settings = ClientSettings::load();
    let sources = ClientSettings::sources();

    log::info!(
        "{}",
        "meeple-pool Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let fields: [(&str, String, SettingSource); 5] = [
        ("base_url", settings.base_url.clone(), sources.base_url),
        (
            "min_request_interval_ms",
            settings.min_request_interval_ms.to_string(),
            sources.min_request_interval_ms,
        ),
        ("timeout_secs", settings.timeout_secs.to_string(), sources.timeout_secs),
        ("fresh_for_secs", settings.fresh_for_secs.to_string(), sources.fresh_for_secs),
        ("keep_for_secs", settings.keep_for_secs.to_string(), sources.keep_for_secs),
    ];

    for (name, value, source) in &fields {
        log::info!(
            "  {:<24} {} {}",
            name,
            value.if_supports_color(Stdout, |t| t.bold()),
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = meeple_pool_bgg::config_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}

/// Write the default settings to the config file.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    if let Some(path) = meeple_pool_bgg::config_path() {
        if path.exists() && !force {
            return Err(CliError::config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
    }

    let path = meeple_pool_bgg::save_to_file(&ClientSettings::default())?;
    log::info!(
        "{} Wrote default settings to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
