use meeple_pool_core::{NameEntry, RawName};

use crate::xml::XmlNode;

/// One rank entry from a `<ranks>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRank {
    /// `subtype` or `family`.
    pub rank_type: Option<String>,
    /// Short rank name, e.g. `boardgame` or `strategygames`.
    pub name: Option<String>,
    pub friendly_name: Option<String>,
    /// Numeric string or the sentinel `Not Ranked`.
    pub value: Option<String>,
}

impl RawRank {
    fn from_node(node: &XmlNode) -> Self {
        Self {
            rank_type: owned(node.attr("type")),
            name: owned(node.attr("name")),
            friendly_name: owned(node.attr("friendlyname")),
            value: owned(node.attr("value")),
        }
    }
}

fn ranks_under(ratings: Option<&XmlNode>) -> Vec<RawRank> {
    ratings
        .and_then(|r| r.child("ranks"))
        .map(|ranks| ranks.children_named("rank").map(RawRank::from_node).collect())
        .unwrap_or_default()
}

/// Collection status flags (`<status own="1" .../>`), kept as the raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOwnership {
    pub own: Option<String>,
    pub prev_owned: Option<String>,
    pub for_trade: Option<String>,
    pub want: Option<String>,
    pub want_to_play: Option<String>,
    pub want_to_buy: Option<String>,
    pub wishlist: Option<String>,
    pub preordered: Option<String>,
    pub last_modified: Option<String>,
}

impl RawOwnership {
    fn from_node(node: &XmlNode) -> Self {
        Self {
            own: owned(node.attr("own")),
            prev_owned: owned(node.attr("prevowned")),
            for_trade: owned(node.attr("fortrade")),
            want: owned(node.attr("want")),
            want_to_play: owned(node.attr("wanttoplay")),
            want_to_buy: owned(node.attr("wanttobuy")),
            wishlist: owned(node.attr("wishlist")),
            preordered: owned(node.attr("preordered")),
            last_modified: owned(node.attr("lastmodified")),
        }
    }

    pub fn owns(&self) -> bool {
        self.own.as_deref() == Some("1")
    }
}

/// The `<stats>` block of a collection item. All values are raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCollectionStats {
    pub min_players: Option<String>,
    pub max_players: Option<String>,
    pub min_play_time: Option<String>,
    pub max_play_time: Option<String>,
    pub playing_time: Option<String>,
    pub num_owned: Option<String>,
    /// `<rating><average value=".."/></rating>`.
    pub average: Option<String>,
    pub ranks: Vec<RawRank>,
}

impl RawCollectionStats {
    fn from_node(node: &XmlNode) -> Self {
        let rating = node.child("rating");
        Self {
            min_players: owned(node.attr("minplayers")),
            max_players: owned(node.attr("maxplayers")),
            min_play_time: owned(node.attr("minplaytime")),
            max_play_time: owned(node.attr("maxplaytime")),
            playing_time: owned(node.attr("playingtime")),
            num_owned: owned(node.attr("numowned")),
            average: owned(rating.and_then(|r| r.child_value("average"))),
            ranks: ranks_under(rating),
        }
    }
}

/// One `<item>` from a user's collection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCollectionRecord {
    pub object_id: Option<String>,
    pub subtype: Option<String>,
    pub name: RawName,
    pub year_published: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub stats: Option<RawCollectionStats>,
    pub status: Option<RawOwnership>,
    pub num_plays: Option<String>,
}

impl RawCollectionRecord {
    pub fn from_node(item: &XmlNode) -> Self {
        Self {
            object_id: owned(item.attr("objectid")),
            subtype: owned(item.attr("subtype")),
            name: collection_name(item),
            year_published: owned(item.child_text("yearpublished")),
            image: owned(item.child_text("image")),
            thumbnail: owned(item.child_text("thumbnail")),
            stats: item.child("stats").map(RawCollectionStats::from_node),
            status: item.child("status").map(RawOwnership::from_node),
            num_plays: owned(item.child_text("numplays")),
        }
    }
}

/// `<name sortindex="1">Catan</name>`: the name is the element text.
fn collection_name(item: &XmlNode) -> RawName {
    match item.child("name") {
        Some(node) => match node.text.as_deref() {
            Some(text) => RawName::Text(text.to_string()),
            None => RawName::Entries(vec![name_entry(node)]),
        },
        None => RawName::Missing,
    }
}

/// `<statistics><ratings>` block of a detail lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDetailStats {
    pub average: Option<String>,
    pub owned: Option<String>,
    /// Average weight, the complexity score.
    pub average_weight: Option<String>,
    pub num_weights: Option<String>,
    pub ranks: Vec<RawRank>,
}

impl RawDetailStats {
    fn from_node(ratings: &XmlNode) -> Self {
        Self {
            average: owned(ratings.child_value("average")),
            owned: owned(ratings.child_value("owned")),
            average_weight: owned(ratings.child_value("averageweight")),
            num_weights: owned(ratings.child_value("numweights")),
            ranks: ranks_under(Some(ratings)),
        }
    }
}

/// One `<item>` from a batched thing lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDetailRecord {
    pub id: Option<String>,
    pub item_type: Option<String>,
    pub name: RawName,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub year_published: Option<String>,
    pub min_players: Option<String>,
    pub max_players: Option<String>,
    pub playing_time: Option<String>,
    pub min_play_time: Option<String>,
    pub max_play_time: Option<String>,
    pub min_age: Option<String>,
    pub statistics: Option<RawDetailStats>,
}

impl RawDetailRecord {
    pub fn from_node(item: &XmlNode) -> Self {
        let names: Vec<NameEntry> = item.children_named("name").map(name_entry).collect();
        Self {
            id: owned(item.attr("id")),
            item_type: owned(item.attr("type")),
            name: if names.is_empty() {
                RawName::Missing
            } else {
                RawName::Entries(names)
            },
            thumbnail: owned(item.child_text("thumbnail")),
            image: owned(item.child_text("image")),
            description: owned(item.child_text("description")),
            year_published: owned(item.child_value("yearpublished")),
            min_players: owned(item.child_value("minplayers")),
            max_players: owned(item.child_value("maxplayers")),
            playing_time: owned(item.child_value("playingtime")),
            min_play_time: owned(item.child_value("minplaytime")),
            max_play_time: owned(item.child_value("maxplaytime")),
            min_age: owned(item.child_value("minage")),
            statistics: item
                .descend(&["statistics", "ratings"])
                .map(RawDetailStats::from_node),
        }
    }
}

fn name_entry(node: &XmlNode) -> NameEntry {
    NameEntry::new(node.attr("type"), node.attr("value").or(node.text.as_deref()))
}

/// Items of an `<items>` document. Any other root (such as an `<errors>`
/// document) yields no items.
pub fn items(root: &XmlNode) -> impl Iterator<Item = &XmlNode> {
    let items = if root.name == "items" { Some(root) } else { None };
    items.into_iter().flat_map(|r| r.children_named("item"))
}

/// The first `<message>` of an error document, if `root` is one.
pub fn error_message(root: &XmlNode) -> Option<String> {
    match root.name.as_str() {
        "errors" => root
            .child("error")
            .and_then(|e| e.child_text("message"))
            .map(str::to_string)
            .or_else(|| Some("unspecified error".to_string())),
        "error" => Some(
            root.child_text("message")
                .or(root.attr("message"))
                .unwrap_or("unspecified error")
                .to_string(),
        ),
        _ => None,
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}
