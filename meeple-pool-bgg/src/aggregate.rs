//! Fetch several users' collections and merge them into one game list.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use meeple_pool_core::{GameData, NormalizedPartial, fold_detail, merge_game_data};

use crate::client::BggClient;
use crate::error::BggError;
use crate::normalize::{normalize_collection_item, normalize_thing_item};
use crate::transport::Transport;

/// Trim usernames, drop blank ones and de-duplicate, keeping first-seen order.
pub fn normalize_usernames<S: AsRef<str>>(usernames: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    usernames
        .iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .filter(|u| seen.insert(u.to_string()))
        .map(str::to_string)
        .collect()
}

/// Fetch and normalize one user's collection, without detail backfill.
pub async fn fetch_user_collection<T: Transport>(
    client: &BggClient<T>,
    username: &str,
) -> Result<Vec<NormalizedPartial>, BggError> {
    let items = client.fetch_collection(username).await?;
    Ok(items
        .iter()
        .map(|item| normalize_collection_item(item, username))
        .collect())
}

/// Fetch every user's collection, backfill missing complexity from detail
/// lookups, and merge duplicates across users.
///
/// Collection requests are issued concurrently and paced by the client's
/// rate limiter. Any failed fetch fails the whole call. An empty username
/// list returns immediately without touching the network.
pub async fn fetch_aggregated_collections<T: Transport, S: AsRef<str>>(
    client: &BggClient<T>,
    usernames: &[S],
) -> Result<Vec<GameData>, BggError> {
    let usernames = normalize_usernames(usernames);
    if usernames.is_empty() {
        return Ok(Vec::new());
    }

    let collections = try_join_all(
        usernames
            .iter()
            .map(|username| fetch_user_collection(client, username)),
    )
    .await?;

    let mut partials: Vec<NormalizedPartial> = collections.into_iter().flatten().collect();
    log::debug!(
        "Normalized {} collection items for {} users",
        partials.len(),
        usernames.len()
    );

    let missing = ids_missing_complexity(&partials);
    if !missing.is_empty() {
        log::debug!("Fetching details for {} games", missing.len());
        let details: HashMap<String, NormalizedPartial> = client
            .fetch_details(&missing)
            .await?
            .iter()
            .map(normalize_thing_item)
            .filter_map(|detail| detail.id.clone().map(|id| (id, detail)))
            .collect();

        for partial in &mut partials {
            let detail = partial.id.as_ref().and_then(|id| details.get(id));
            if let Some(detail) = detail {
                fold_detail(partial, detail.clone());
            }
        }
    }

    let games = merge_game_data(partials);
    log::debug!("Merged into {} distinct games", games.len());
    Ok(games)
}

/// Distinct ids, in first-seen order, of partials with no complexity value.
fn ids_missing_complexity(partials: &[NormalizedPartial]) -> Vec<String> {
    let mut seen = HashSet::new();
    partials
        .iter()
        .filter(|p| p.details.complexity.is_none())
        .filter_map(|p| p.id.as_deref())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
