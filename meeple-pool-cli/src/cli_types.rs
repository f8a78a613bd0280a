//! CLI type definitions: command enums and argument structs.

use clap::{Args, Parser, Subcommand};

use meeple_pool_core::{FilterState, SortDirection, SortKey};

#[derive(Parser)]
#[command(name = "meeple-pool")]
#[command(
    about = "Pool the board game collections of several BoardGameGeek users",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// XML API base URL (overrides config file and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Milliseconds between requests to the API (at least 1000)
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter and sort options for the pooled game list.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Only games that support this many players
    #[arg(short, long)]
    pub players: Option<u32>,

    /// Only games whose longest play time is at least this many minutes
    #[arg(long)]
    pub min_time: Option<u32>,

    /// Only games whose shortest play time is at most this many minutes
    #[arg(long)]
    pub max_time: Option<u32>,

    /// Minimum complexity (weight, 1-5)
    #[arg(long)]
    pub min_complexity: Option<f64>,

    /// Maximum complexity (weight, 1-5)
    #[arg(long)]
    pub max_complexity: Option<f64>,

    /// Minimum average rating (1-10)
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Case-insensitive text to look for in game names
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort key (name, rating, rank, complexity, playing-time, owners)
    #[arg(long, default_value_t = SortKey::Name)]
    pub sort: SortKey,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        FilterState {
            player_count: self.players,
            min_play_time: self.min_time,
            max_play_time: self.max_time,
            min_complexity: self.min_complexity,
            max_complexity: self.max_complexity,
            min_rating: self.min_rating,
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            sort_by: self.sort,
            sort_order: if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch, merge, filter and sort the games owned by one or more users
    Games {
        /// BoardGameGeek usernames (space or comma separated)
        #[arg(required = true, value_delimiter = ',')]
        usernames: Vec<String>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Show at most this many games
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List one user's collection without merging or detail lookups
    User {
        /// BoardGameGeek username
        username: String,

        /// Print the result as JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and where each value comes from
    Show,

    /// Print the config file path
    Path,

    /// Write the default settings to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
