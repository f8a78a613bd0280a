use meeple_pool_core::UNKNOWN_NAME;

use super::*;
use crate::types::{RawCollectionRecord, RawDetailRecord, items};
use crate::xml::parse_document;

fn rank(rank_type: &str, name: &str, friendly: &str, value: &str) -> RawRank {
    RawRank {
        rank_type: Some(rank_type.into()),
        name: Some(name.into()),
        friendly_name: Some(friendly.into()),
        value: Some(value.into()),
    }
}

fn first_collection_record(xml: &str) -> RawCollectionRecord {
    let root = parse_document(xml).unwrap();
    RawCollectionRecord::from_node(items(&root).next().unwrap())
}

fn first_detail_record(xml: &str) -> RawDetailRecord {
    let root = parse_document(xml).unwrap();
    RawDetailRecord::from_node(items(&root).next().unwrap())
}

#[test]
fn boardgame_rank_wins_over_family_ranks() {
    let ranks = vec![
        rank("family", "strategygames", "Strategy Game Rank", "12"),
        rank("subtype", "boardgame", "Board Game Rank", "5"),
    ];
    assert_eq!(select_rank(&ranks).and_then(|r| r.value.as_deref()), Some("5"));
}

#[test]
fn rank_fallbacks_in_priority_order() {
    let subtype = vec![
        rank("family", "familygames", "Family Game Rank", "40"),
        rank("subtype", "rpgitem", "RPG Item Rank", "7"),
    ];
    assert_eq!(select_rank(&subtype).and_then(|r| r.value.as_deref()), Some("7"));

    let friendly = vec![
        rank("family", "familygames", "Family Game Rank", "40"),
        rank("family", "other", "Overall Board Game Rank", "9"),
    ];
    assert_eq!(select_rank(&friendly).and_then(|r| r.value.as_deref()), Some("9"));

    let first_only = vec![rank("family", "familygames", "Family Game Rank", "40")];
    assert_eq!(select_rank(&first_only).and_then(|r| r.value.as_deref()), Some("40"));

    assert!(select_rank(&[]).is_none());
}

#[test]
fn collection_item_is_normalized() {
    let record = first_collection_record(
        r#"<items totalitems="1">
<item objecttype="thing" objectid="13" subtype="boardgame">
  <name sortindex="1">Catan</name>
  <yearpublished>1995</yearpublished>
  <image>https://example.test/13.jpg</image>
  <thumbnail>https://example.test/13_t.jpg</thumbnail>
  <stats minplayers="3" maxplayers="4" minplaytime="60" maxplaytime="120" playingtime="120" numowned="123456">
    <rating value="N/A">
      <average value="7.1"/>
      <ranks>
        <rank type="family" id="5497" name="strategygames" friendlyname="Strategy Game Rank" value="12"/>
        <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="5"/>
      </ranks>
    </rating>
  </stats>
  <status own="1"/>
</item>
</items>"#,
    );
    assert!(record.status.as_ref().is_some_and(|s| s.owns()));

    let partial = normalize_collection_item(&record, "alice");
    assert_eq!(partial.id.as_deref(), Some("13"));
    assert_eq!(partial.name, "Catan");
    assert_eq!(partial.owners, vec!["alice"]);
    let d = &partial.details;
    assert_eq!(d.year_published, Some(1995));
    assert_eq!(d.min_players, Some(3));
    assert_eq!(d.max_players, Some(4));
    assert_eq!(d.min_play_time, Some(60));
    assert_eq!(d.max_play_time, Some(120));
    assert_eq!(d.playing_time, Some(120));
    assert_eq!(d.num_owned, Some(123456));
    assert_eq!(d.rating, Some(7.1));
    assert_eq!(d.rank, Some(5));
    assert_eq!(d.complexity, None);
    assert_eq!(d.thumbnail.as_deref(), Some("https://example.test/13_t.jpg"));
}

#[test]
fn collection_item_without_stats_or_name() {
    let record = first_collection_record(r#"<items><item objectid="99"/></items>"#);
    let partial = normalize_collection_item(&record, "bob");
    assert_eq!(partial.name, UNKNOWN_NAME);
    assert_eq!(partial.details.min_players, None);
    assert_eq!(partial.details.rank, None);
    assert_eq!(partial.owners, vec!["bob"]);
}

#[test]
fn thing_item_is_normalized() {
    let record = first_detail_record(
        r#"<items>
<item type="boardgame" id="174430">
  <name type="alternate" sortindex="1" value="Gloomhaven (alt)"/>
  <name type="primary" sortindex="1" value="Gloomhaven"/>
  <description>Dungeon crawl.</description>
  <yearpublished value="2017"/>
  <minplayers value="1"/>
  <maxplayers value="4"/>
  <playingtime value="120"/>
  <minplaytime value="60"/>
  <maxplaytime value="120"/>
  <minage value="14"/>
  <statistics page="1">
    <ratings>
      <average value="8.6"/>
      <ranks>
        <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="3"/>
      </ranks>
      <owned value="90000"/>
      <averageweight value="3.91"/>
    </ratings>
  </statistics>
</item>
</items>"#,
    );
    assert_eq!(record.min_age.as_deref(), Some("14"));
    assert_eq!(record.description.as_deref(), Some("Dungeon crawl."));

    let partial = normalize_thing_item(&record);
    assert_eq!(partial.id.as_deref(), Some("174430"));
    assert_eq!(partial.name, "Gloomhaven");
    assert!(partial.owners.is_empty());
    let d = &partial.details;
    assert_eq!(d.complexity, Some(3.91));
    assert_eq!(d.rating, Some(8.6));
    assert_eq!(d.rank, Some(3));
    assert_eq!(d.num_owned, Some(90000));
    assert_eq!(d.year_published, Some(2017));
    assert_eq!(d.min_players, Some(1));
}

#[test]
fn not_ranked_thing_has_no_rank() {
    let record = first_detail_record(
        r#"<items><item type="boardgame" id="1">
<name type="primary" value="Obscure"/>
<statistics><ratings>
  <ranks><rank type="subtype" name="boardgame" friendlyname="Board Game Rank" value="Not Ranked"/></ranks>
</ratings></statistics>
</item></items>"#,
    );
    assert_eq!(normalize_thing_item(&record).details.rank, None);
}

#[test]
fn thing_without_primary_name_uses_first() {
    let record = first_detail_record(
        r#"<items><item id="2"><name type="alternate" value="Zweitname"/></item></items>"#,
    );
    assert_eq!(normalize_thing_item(&record).name, "Zweitname");

    let nameless = first_detail_record(r#"<items><item id="3"/></items>"#);
    assert_eq!(normalize_thing_item(&nameless).name, UNKNOWN_NAME);
}

#[test]
fn blank_and_non_numeric_values_become_none() {
    let record = first_collection_record(
        r#"<items><item objectid="5">
<name>Blank</name>
<thumbnail>   </thumbnail>
<stats minplayers="" maxplayers="many" playingtime="45 min">
  <rating><average value="N/A"/></rating>
</stats>
</item></items>"#,
    );
    let d = normalize_collection_item(&record, "carol").details;
    assert_eq!(d.thumbnail, None);
    assert_eq!(d.min_players, None);
    assert_eq!(d.max_players, None);
    assert_eq!(d.playing_time, Some(45));
    assert_eq!(d.rating, None);
}

#[test]
fn integer_parsing_takes_leading_digits() {
    assert_eq!(parse_integer("42"), Some(42));
    assert_eq!(parse_integer(" 120 min"), Some(120));
    assert_eq!(parse_integer("7.9"), Some(7));
    assert_eq!(parse_integer("-3"), Some(-3));
    assert_eq!(parse_integer(""), None);
    assert_eq!(parse_integer("N/A"), None);
    assert_eq!(parse_integer("-"), None);
}

#[test]
fn decimal_parsing_takes_leading_number() {
    assert_eq!(parse_decimal("3.91"), Some(3.91));
    assert_eq!(parse_decimal("2."), Some(2.0));
    assert_eq!(parse_decimal("7.5 stars"), Some(7.5));
    assert_eq!(parse_decimal("-0.5"), Some(-0.5));
    assert_eq!(parse_decimal("N/A"), None);
    assert_eq!(parse_decimal("."), None);
    assert_eq!(parse_decimal("   "), None);
}
