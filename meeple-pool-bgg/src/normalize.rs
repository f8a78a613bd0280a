//! Conversion of raw service records into [`NormalizedPartial`]s.

use meeple_pool_core::{GameDetails, NormalizedPartial, extract_name};

use crate::types::{RawCollectionRecord, RawCollectionStats, RawDetailRecord, RawRank};

/// Rank value the service uses for unranked games.
const NOT_RANKED: &str = "Not Ranked";

/// Normalize one collection item, owned by `username`.
pub fn normalize_collection_item(record: &RawCollectionRecord, username: &str) -> NormalizedPartial {
    let empty = RawCollectionStats::default();
    let stats = record.stats.as_ref().unwrap_or(&empty);

    NormalizedPartial {
        id: record.object_id.clone(),
        name: extract_name(&record.name),
        details: GameDetails {
            thumbnail: non_blank(record.thumbnail.as_deref()),
            image: non_blank(record.image.as_deref()),
            year_published: record.year_published.as_deref().and_then(parse_year),
            min_players: stats.min_players.as_deref().and_then(parse_count),
            max_players: stats.max_players.as_deref().and_then(parse_count),
            playing_time: stats.playing_time.as_deref().and_then(parse_count),
            min_play_time: stats.min_play_time.as_deref().and_then(parse_count),
            max_play_time: stats.max_play_time.as_deref().and_then(parse_count),
            complexity: None,
            rating: stats.average.as_deref().and_then(parse_decimal),
            rank: select_rank(&stats.ranks).and_then(rank_value),
            num_owned: stats.num_owned.as_deref().and_then(parse_count),
        },
        owners: vec![username.to_string()],
    }
}

/// Normalize one detail-lookup item. Detail lookups carry no ownership.
pub fn normalize_thing_item(record: &RawDetailRecord) -> NormalizedPartial {
    let ratings = record.statistics.as_ref();
    let count = |value: &Option<String>| value.as_deref().and_then(parse_count);

    NormalizedPartial {
        id: record.id.clone(),
        name: extract_name(&record.name),
        details: GameDetails {
            thumbnail: non_blank(record.thumbnail.as_deref()),
            image: non_blank(record.image.as_deref()),
            year_published: record.year_published.as_deref().and_then(parse_year),
            min_players: count(&record.min_players),
            max_players: count(&record.max_players),
            playing_time: count(&record.playing_time),
            min_play_time: count(&record.min_play_time),
            max_play_time: count(&record.max_play_time),
            complexity: ratings
                .and_then(|r| r.average_weight.as_deref())
                .and_then(parse_decimal),
            rating: ratings.and_then(|r| r.average.as_deref()).and_then(parse_decimal),
            rank: ratings.and_then(|r| select_rank(&r.ranks)).and_then(rank_value),
            num_owned: ratings.and_then(|r| r.owned.as_deref()).and_then(parse_count),
        },
        owners: Vec::new(),
    }
}

/// Pick the rank entry that best represents the overall board game rank.
///
/// Priority: the entry named `boardgame`, then any `subtype` entry, then one
/// whose friendly name mentions "board game", then the first entry.
pub fn select_rank(ranks: &[RawRank]) -> Option<&RawRank> {
    ranks
        .iter()
        .find(|r| r.name.as_deref() == Some("boardgame"))
        .or_else(|| ranks.iter().find(|r| r.rank_type.as_deref() == Some("subtype")))
        .or_else(|| {
            ranks.iter().find(|r| {
                r.friendly_name
                    .as_deref()
                    .is_some_and(|f| f.to_lowercase().contains("board game"))
            })
        })
        .or_else(|| ranks.first())
}

fn rank_value(rank: &RawRank) -> Option<u32> {
    rank.value
        .as_deref()
        .filter(|v| v.trim() != NOT_RANKED)
        .and_then(parse_count)
}

/// Parse the leading integer of `value`, ignoring any trailing text
/// (`"120 min"` and `"7.9"` both parse). Blank or non-numeric input is `None`.
pub fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Parse the leading decimal number of `value`. Blank, non-numeric or
/// non-finite input is `None`.
pub fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_count(value: &str) -> Option<u32> {
    parse_integer(value).and_then(|v| u32::try_from(v).ok())
}

fn parse_year(value: &str) -> Option<i32> {
    parse_integer(value).and_then(|v| i32::try_from(v).ok())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
