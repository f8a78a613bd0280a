use serde::{Deserialize, Serialize};

/// Placeholder used when a record carries no usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// One entry of a multi-valued name field (e.g. primary vs. alternate titles).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEntry {
    /// Name type tag, `"primary"` or `"alternate"` on the catalog service.
    pub kind: Option<String>,
    pub value: Option<String>,
}

impl NameEntry {
    pub fn new(kind: Option<&str>, value: Option<&str>) -> Self {
        Self {
            kind: kind.map(str::to_string),
            value: value.map(str::to_string),
        }
    }
}

/// A name field as it arrives from the catalog service.
///
/// Collection listings carry the name as element text, detail lookups carry
/// one or more `<name type=".." value=".."/>` elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawName {
    #[default]
    Missing,
    Text(String),
    Entries(Vec<NameEntry>),
}

/// Resolve a raw name field to a display name.
///
/// Plain text is used as-is. For name entries the one tagged `primary` wins,
/// then the first entry's value; anything else resolves to [`UNKNOWN_NAME`].
pub fn extract_name(name: &RawName) -> String {
    match name {
        RawName::Text(text) => text.clone(),
        RawName::Entries(entries) => entries
            .iter()
            .find(|e| e.kind.as_deref() == Some("primary"))
            .and_then(|e| non_empty(e.value.as_deref()))
            .or_else(|| entries.first().and_then(|e| non_empty(e.value.as_deref())))
            .unwrap_or(UNKNOWN_NAME)
            .to_string(),
        RawName::Missing => UNKNOWN_NAME.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Whether `name` carries real information (non-empty and not the placeholder).
pub fn is_meaningful_name(name: &str) -> bool {
    !name.trim().is_empty() && name != UNKNOWN_NAME
}

/// Overwrite `current` with `incoming` only when `incoming` is set.
pub fn coalesce<T>(current: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *current = incoming;
    }
}

/// Overwrite `current` with `incoming` only when `incoming` is a meaningful
/// name. An empty current name is always replaced, falling back to
/// [`UNKNOWN_NAME`] so a merged name is never empty.
pub fn coalesce_name(current: &mut String, incoming: String) {
    if is_meaningful_name(&incoming) {
        *current = incoming;
    } else if current.trim().is_empty() {
        *current = if incoming.trim().is_empty() {
            UNKNOWN_NAME.to_string()
        } else {
            incoming
        };
    }
}

/// Add every name in `incoming` to `owners` that is not already present,
/// keeping first-appearance order.
pub fn union_owners(owners: &mut Vec<String>, incoming: &[String]) {
    for name in incoming {
        if !owners.iter().any(|o| o == name) {
            owners.push(name.clone());
        }
    }
}

/// Per-game optional fields shared by partial and merged records.
///
/// Numeric values are `None` when the source was absent or not numeric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_players: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playing_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_play_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_play_time: Option<u32>,
    /// Average "weight" on the 1-5 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_owned: Option<u32>,
}

impl GameDetails {
    /// Fold `incoming` into `self`, field by field, keeping current values
    /// wherever `incoming` is unset.
    pub fn absorb(&mut self, incoming: GameDetails) {
        let GameDetails {
            thumbnail,
            image,
            year_published,
            min_players,
            max_players,
            playing_time,
            min_play_time,
            max_play_time,
            complexity,
            rating,
            rank,
            num_owned,
        } = incoming;

        coalesce(&mut self.thumbnail, thumbnail);
        coalesce(&mut self.image, image);
        coalesce(&mut self.year_published, year_published);
        coalesce(&mut self.min_players, min_players);
        coalesce(&mut self.max_players, max_players);
        coalesce(&mut self.playing_time, playing_time);
        coalesce(&mut self.min_play_time, min_play_time);
        coalesce(&mut self.max_play_time, max_play_time);
        coalesce(&mut self.complexity, complexity);
        coalesce(&mut self.rating, rating);
        coalesce(&mut self.rank, rank);
        coalesce(&mut self.num_owned, num_owned);
    }
}

/// A normalized record derived from exactly one source response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPartial {
    /// Catalog id; records without one are dropped during merge.
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub details: GameDetails,
    /// Usernames whose collection listed this game. Empty for detail lookups.
    pub owners: Vec<String>,
}

impl NormalizedPartial {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_owner(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        if !self.owners.contains(&username) {
            self.owners.push(username);
        }
        self
    }
}

/// A fully merged game, one per distinct catalog id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub details: GameDetails,
    pub owners: Vec<String>,
}

impl GameData {
    /// Seed a merged game from the first partial seen for its id.
    pub(crate) fn seed(id: String, partial: NormalizedPartial) -> Self {
        let mut name = String::new();
        coalesce_name(&mut name, partial.name);
        let mut owners = Vec::with_capacity(partial.owners.len());
        union_owners(&mut owners, &partial.owners);
        Self {
            id,
            name,
            details: partial.details,
            owners,
        }
    }

    /// Fold a later partial for the same id into this game.
    pub(crate) fn absorb(&mut self, partial: NormalizedPartial) {
        union_owners(&mut self.owners, &partial.owners);
        coalesce_name(&mut self.name, partial.name);
        self.details.absorb(partial.details);
    }
}
