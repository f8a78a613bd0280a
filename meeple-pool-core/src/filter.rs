//! Declarative filtering and sorting over merged games.
//!
//! Everything here is pure: inputs are borrowed, outputs are new vectors.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::game::GameData;

/// Upper player bound assumed when a game does not state one.
const OPEN_MAX_PLAYERS: u32 = 999;

/// Play time assumed when a game states none, for the max-time predicate.
const OPEN_PLAY_TIME: u32 = 999;

/// Field to order games by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    Rating,
    Rank,
    Complexity,
    PlayingTime,
    Owners,
}

const ALL_SORT_KEYS: &[SortKey] = &[
    SortKey::Name,
    SortKey::Rating,
    SortKey::Rank,
    SortKey::Complexity,
    SortKey::PlayingTime,
    SortKey::Owners,
];

impl SortKey {
    /// Canonical lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Rank => "rank",
            Self::Complexity => "complexity",
            Self::PlayingTime => "playing-time",
            Self::Owners => "owners",
        }
    }

    pub fn all() -> &'static [SortKey] {
        ALL_SORT_KEYS
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`SortKey`].
#[derive(Debug, Clone)]
pub struct SortKeyParseError(pub String);

impl std::fmt::Display for SortKeyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sort key: '{}'", self.0)
    }
}

impl std::error::Error for SortKeyParseError {}

impl std::str::FromStr for SortKey {
    type Err = SortKeyParseError;

    /// Case-insensitive; `playingTime`, `playing-time` and `playing_time` all
    /// resolve to [`SortKey::PlayingTime`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        ALL_SORT_KEYS
            .iter()
            .copied()
            .find(|key| key.as_str().replace('-', "") == folded)
            .ok_or_else(|| SortKeyParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SortDirectionParseError(pub String);

impl std::fmt::Display for SortDirectionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sort direction: '{}' (expected asc or desc)", self.0)
    }
}

impl std::error::Error for SortDirectionParseError {}

impl std::str::FromStr for SortDirection {
    type Err = SortDirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(SortDirectionParseError(s.to_string())),
        }
    }
}

/// Caller-supplied filter predicates plus sort order.
///
/// Unset predicates impose no constraint. The default keeps every game and
/// sorts by name, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub player_count: Option<u32>,
    pub min_play_time: Option<u32>,
    pub max_play_time: Option<u32>,
    pub min_complexity: Option<f64>,
    pub max_complexity: Option<f64>,
    pub min_rating: Option<f64>,
    /// Case-insensitive substring matched against the game name.
    pub search: Option<String>,
    pub sort_by: SortKey,
    pub sort_order: SortDirection,
}

impl FilterState {
    /// Whether `game` satisfies every set predicate.
    pub fn matches(&self, game: &GameData) -> bool {
        let d = &game.details;

        if let Some(players) = self.player_count {
            let min = d.min_players.unwrap_or(0);
            let max = d.max_players.unwrap_or(OPEN_MAX_PLAYERS);
            if players < min || players > max {
                return false;
            }
        }

        if let Some(min_time) = self.min_play_time {
            let longest = d.max_play_time.or(d.playing_time).unwrap_or(0);
            if longest < min_time {
                return false;
            }
        }

        if let Some(max_time) = self.max_play_time {
            let shortest = d.min_play_time.or(d.playing_time).unwrap_or(OPEN_PLAY_TIME);
            if shortest > max_time {
                return false;
            }
        }

        let complexity = d.complexity.unwrap_or(0.0);
        if self.min_complexity.is_some_and(|min| complexity < min) {
            return false;
        }
        if self.max_complexity.is_some_and(|max| complexity > max) {
            return false;
        }

        if self
            .min_rating
            .is_some_and(|min| d.rating.unwrap_or(0.0) < min)
        {
            return false;
        }

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            if !game.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Filter then sort `games` according to this state.
    pub fn apply(&self, games: &[GameData]) -> Vec<GameData> {
        let filtered = filter_games(games, self);
        sort_games(&filtered, self.sort_by, self.sort_order)
    }
}

/// Keep the games that satisfy every predicate in `filters`, in input order.
pub fn filter_games(games: &[GameData], filters: &FilterState) -> Vec<GameData> {
    games
        .iter()
        .filter(|game| filters.matches(game))
        .cloned()
        .collect()
}

/// Return `games` ordered by `key`. The sort is stable, so ties keep their
/// input order.
///
/// Unranked games sort after every ranked game in both directions.
pub fn sort_games(games: &[GameData], key: SortKey, direction: SortDirection) -> Vec<GameData> {
    let mut sorted = games.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key, direction));
    sorted
}

fn compare(a: &GameData, b: &GameData, key: SortKey, direction: SortDirection) -> Ordering {
    let (da, db) = (&a.details, &b.details);
    match key {
        SortKey::Name => direction.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::Rating => direction.apply(cmp_f64(
            da.rating.unwrap_or(0.0),
            db.rating.unwrap_or(0.0),
        )),
        SortKey::Rank => match (da.rank, db.rank) {
            (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Complexity => direction.apply(cmp_f64(
            da.complexity.unwrap_or(0.0),
            db.complexity.unwrap_or(0.0),
        )),
        SortKey::PlayingTime => direction.apply(
            da.playing_time
                .unwrap_or(0)
                .cmp(&db.playing_time.unwrap_or(0)),
        ),
        SortKey::Owners => direction.apply(a.owners.len().cmp(&b.owners.len())),
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
