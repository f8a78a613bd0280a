use std::collections::HashMap;

use crate::game::{GameData, NormalizedPartial, coalesce_name, union_owners};

/// Merge partials into one [`GameData`] per catalog id.
///
/// Partials are folded in input order. Partials without an id are dropped.
/// Output follows the order in which ids were first seen.
pub fn merge_game_data(partials: impl IntoIterator<Item = NormalizedPartial>) -> Vec<GameData> {
    let mut games: Vec<GameData> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut partial in partials {
        let Some(id) = partial.id.take().filter(|id| !id.is_empty()) else {
            continue;
        };

        match index.get(&id) {
            Some(&slot) => games[slot].absorb(partial),
            None => {
                index.insert(id.clone(), games.len());
                games.push(GameData::seed(id, partial));
            }
        }
    }

    games
}

/// Fold a detail-lookup partial into a collection partial for the same id.
///
/// Uses the same rules as [`merge_game_data`]; the collection partial's
/// owners are kept since detail lookups carry no ownership.
pub fn fold_detail(partial: &mut NormalizedPartial, detail: NormalizedPartial) {
    let NormalizedPartial {
        name,
        details,
        owners,
        ..
    } = detail;

    coalesce_name(&mut partial.name, name);
    partial.details.absorb(details);
    union_owners(&mut partial.owners, &owners);
}

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod tests;
