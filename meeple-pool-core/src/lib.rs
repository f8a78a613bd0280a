//! Domain types and pure transforms for pooled board-game collections.
//!
//! Nothing in this crate performs I/O: it merges normalized records into one
//! entry per catalog id and filters/sorts the merged list.

pub mod filter;
pub mod game;
pub mod merge;

pub use filter::{
    FilterState, SortDirection, SortDirectionParseError, SortKey, SortKeyParseError,
    filter_games, sort_games,
};
pub use game::{
    GameData, GameDetails, NameEntry, NormalizedPartial, RawName, UNKNOWN_NAME, coalesce,
    coalesce_name, extract_name, is_meaningful_name, union_owners,
};
pub use merge::{fold_detail, merge_game_data};
