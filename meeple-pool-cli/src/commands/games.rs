use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_pool_bgg::{ClientSettings, GameShelf, normalize_usernames};
use meeple_pool_core::FilterState;

use crate::CliError;
use crate::commands::runtime;
use crate::spinner::spinner;
use crate::table;

/// Run the games command: pool, filter, sort and print.
pub(crate) fn run_games(
    settings: &ClientSettings,
    usernames: &[String],
    filter: &FilterState,
    json: bool,
    limit: Option<usize>,
    quiet: bool,
) -> Result<(), CliError> {
    let users = normalize_usernames(usernames);
    if users.is_empty() {
        log::warn!("No usernames given");
        return Ok(());
    }

    let shelf = GameShelf::from_settings(settings)?;
    let rt = runtime()?;

    let pb = spinner(format!("Fetching collections for {}...", users.join(", ")), quiet);
    let result = rt.block_on(shelf.collections(&users));
    pb.finish_and_clear();
    let games = result?;

    let mut shown = filter.apply(&games);
    let matching = shown.len();
    if let Some(limit) = limit {
        shown.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    log::info!(
        "{} {} games across {} users, {} matching (sorted by {} {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        games.len(),
        users.len(),
        matching,
        filter.sort_by,
        filter.sort_order,
    );
    log::info!("");

    if shown.is_empty() {
        log::info!("No games match the given filters.");
        return Ok(());
    }
    table::print_games(&shown);

    if shown.len() < matching {
        log::info!("");
        log::info!("... and {} more (raise --limit to see them)", matching - shown.len());
    }
    Ok(())
}
