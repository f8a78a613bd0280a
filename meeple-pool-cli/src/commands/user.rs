use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_pool_bgg::{ClientSettings, GameShelf};

use crate::CliError;
use crate::commands::runtime;
use crate::spinner::spinner;

/// Run the user command: list one user's collection as the service reports it.
pub(crate) fn run_user(
    settings: &ClientSettings,
    username: &str,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let shelf = GameShelf::from_settings(settings)?;
    let rt = runtime()?;

    let pb = spinner(format!("Fetching collection for {}...", username.trim()), quiet);
    let result = rt.block_on(shelf.user_collection(username));
    pb.finish_and_clear();
    let items = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    log::info!(
        "{} {} owns {} games",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        username.trim().if_supports_color(Stdout, |t| t.bold()),
        items.len(),
    );
    log::info!("");

    for item in &items {
        let year = item
            .details
            .year_published
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        println!(
            "  {}{} {}",
            item.name.if_supports_color(Stdout, |t| t.bold()),
            year,
            format!("[{}]", item.id.as_deref().unwrap_or("?"))
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
