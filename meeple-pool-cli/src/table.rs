//! Plain-text table of pooled games.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_pool_core::{GameData, GameDetails};

const NAME_WIDTH: usize = 40;
const NONE: &str = "-";

pub(crate) fn print_games(games: &[GameData]) {
    println!(
        "{}",
        format!(
            "{:<name$}  {:>7}  {:>9}  {:>6}  {:>6}  {:>6}  {}",
            "Name",
            "Players",
            "Time",
            "Weight",
            "Rating",
            "Rank",
            "Owners",
            name = NAME_WIDTH,
        )
        .if_supports_color(Stdout, |t| t.bold())
    );

    for game in games {
        let d = &game.details;
        let name = format!("{:<width$}", truncate(&game.name, NAME_WIDTH), width = NAME_WIDTH);
        let rating = format!("{:>6}", decimal(d.rating, 1));
        let rank = format!("{:>6}", d.rank.map_or(NONE.to_string(), |r| r.to_string()));

        println!(
            "{}  {:>7}  {:>9}  {:>6}  {}  {}  {}",
            name.if_supports_color(Stdout, |t| t.bold()),
            players(d),
            play_time(d),
            decimal(d.complexity, 2),
            rating.if_supports_color(Stdout, |t| t.green()),
            rank.if_supports_color(Stdout, |t| t.cyan()),
            game.owners.join(", ").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Cut `name` to at most `width` characters, marking the cut with `~`.
pub(crate) fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

pub(crate) fn players(d: &GameDetails) -> String {
    match (d.min_players, d.max_players) {
        (Some(min), Some(max)) if min == max => min.to_string(),
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        (Some(min), None) => format!("{}+", min),
        (None, Some(max)) => format!("<={}", max),
        (None, None) => NONE.to_string(),
    }
}

pub(crate) fn play_time(d: &GameDetails) -> String {
    match (d.min_play_time, d.max_play_time, d.playing_time) {
        (Some(min), Some(max), _) if min != max => format!("{}-{}m", min, max),
        (_, _, Some(time)) => format!("{}m", time),
        (Some(min), _, None) => format!("{}m", min),
        (None, Some(max), None) => format!("{}m", max),
        (None, None, None) => NONE.to_string(),
    }
}

fn decimal(value: Option<f64>, places: usize) -> String {
    value.map_or(NONE.to_string(), |v| format!("{:.*}", places, v))
}
