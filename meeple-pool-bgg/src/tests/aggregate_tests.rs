use std::sync::Arc;

use tokio::time::Duration;

use super::*;
use crate::rate_limit::RateLimiter;
use crate::test_support::{ScriptedTransport, collection_xml, test_settings, thing_xml};
use crate::transport::HttpResponse;

fn client(transport: &ScriptedTransport) -> BggClient<ScriptedTransport> {
    BggClient::with_transport(transport.clone(), &test_settings())
}

#[test]
fn usernames_are_trimmed_and_deduplicated() {
    let names = normalize_usernames(&[" alice", "bob ", "", "   ", "alice", "carol"]);
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    let owned = vec!["x".to_string(), " x ".to_string()];
    assert_eq!(normalize_usernames(&owned), vec!["x"]);
}

#[tokio::test(start_paused = true)]
async fn empty_username_list_makes_no_requests() {
    let transport = ScriptedTransport::new();
    let empty: [&str; 0] = [];
    assert!(fetch_aggregated_collections(&client(&transport), &empty).await.unwrap().is_empty());
    assert!(fetch_aggregated_collections(&client(&transport), &["", " "]).await.unwrap().is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn owners_are_united_across_users() {
    let transport = ScriptedTransport::new();
    transport.push_ok(
        "collection",
        collection_xml(&[("13", "Catan", Some("400")), ("822", "Carcassonne", Some("200"))]),
    );
    transport.push_ok("collection", collection_xml(&[("13", "Catan", Some("400"))]));
    transport.push_ok("thing", thing_xml(&[("13", "Catan", "2.3"), ("822", "Carcassonne", "1.9")]));

    let games = fetch_aggregated_collections(&client(&transport), &["alice", "bob"])
        .await
        .unwrap();

    assert_eq!(games.len(), 2);
    let catan = games.iter().find(|g| g.id == "13").unwrap();
    assert_eq!(catan.owners, vec!["alice", "bob"]);
    let carcassonne = games.iter().find(|g| g.id == "822").unwrap();
    assert_eq!(carcassonne.owners, vec!["alice"]);
}

#[tokio::test(start_paused = true)]
async fn missing_complexity_is_backfilled_from_details() {
    let transport = ScriptedTransport::new();
    transport.push_ok("collection", collection_xml(&[("13", "Catan", Some("400"))]));
    transport.push_ok("thing", thing_xml(&[("13", "Catan", "2.3")]));

    let games = fetch_aggregated_collections(&client(&transport), &["alice"])
        .await
        .unwrap();

    assert_eq!(games.len(), 1);
    let catan = &games[0];
    assert_eq!(catan.name, "Catan");
    assert_eq!(catan.details.complexity, Some(2.3));
    // Detail values win where present; "Not Ranked" leaves the collection rank.
    assert_eq!(catan.details.rating, Some(7.2));
    assert_eq!(catan.details.rank, Some(400));
    assert_eq!(catan.details.num_owned, Some(2000));
    assert_eq!(catan.owners, vec!["alice"]);
}

#[tokio::test(start_paused = true)]
async fn detail_ids_are_distinct_across_users() {
    let transport = ScriptedTransport::new();
    transport.push_ok("collection", collection_xml(&[("13", "Catan", None)]));
    transport.push_ok("collection", collection_xml(&[("13", "Catan", None), ("9", "El Grande", None)]));

    fetch_aggregated_collections(&client(&transport), &["alice", "bob"])
        .await
        .unwrap();

    let things = transport.requests_to("thing");
    assert_eq!(things.len(), 1);
    assert_eq!(things[0].param("id"), Some("13,9"));
}

#[tokio::test(start_paused = true)]
async fn games_without_details_keep_collection_values() {
    let transport = ScriptedTransport::new();
    transport.push_ok("collection", collection_xml(&[("13", "Catan", Some("400"))]));
    // Thing endpoint answers with an empty document.

    let games = fetch_aggregated_collections(&client(&transport), &["alice"])
        .await
        .unwrap();
    assert_eq!(games[0].details.complexity, None);
    assert_eq!(games[0].details.rank, Some(400));
}

#[tokio::test(start_paused = true)]
async fn unknown_user_contributes_nothing() {
    let transport = ScriptedTransport::new();
    transport.push_ok("collection", collection_xml(&[("13", "Catan", None)]));
    transport.push("collection", Ok(HttpResponse::new(404, "")));

    let games = fetch_aggregated_collections(&client(&transport), &["alice", "ghost"])
        .await
        .unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].owners, vec!["alice"]);
}

#[tokio::test(start_paused = true)]
async fn any_failed_collection_fails_the_whole_call() {
    let transport = ScriptedTransport::new();
    transport.push_ok("collection", collection_xml(&[("13", "Catan", None)]));
    transport.push("collection", Ok(HttpResponse::new(401, "")));

    let err = fetch_aggregated_collections(&client(&transport), &["alice", "bob"])
        .await
        .unwrap_err();
    assert!(matches!(err, BggError::Collection { .. }));
    assert!(transport.requests_to("thing").is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_detail_lookup_fails_the_whole_call() {
    let transport = ScriptedTransport::new();
    transport.push_ok("collection", collection_xml(&[("13", "Catan", None)]));
    transport.push("thing", Ok(HttpResponse::new(400, "")));

    let err = fetch_aggregated_collections(&client(&transport), &["alice"])
        .await
        .unwrap_err();
    assert!(matches!(err, BggError::Details { .. }));
}

#[tokio::test(start_paused = true)]
async fn concurrent_collection_requests_are_spaced() {
    let transport = ScriptedTransport::new();
    for _ in 0..4 {
        transport.push_ok("collection", collection_xml(&[("13", "Catan", None)]));
    }

    fetch_aggregated_collections(&client(&transport), &["a", "b", "c", "d"])
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    for pair in requests.windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_millis(1000));
    }
    let users: Vec<_> = requests[..4]
        .iter()
        .filter_map(|r| r.param("username"))
        .collect();
    assert_eq!(users, vec!["a", "b", "c", "d"]);
}

#[tokio::test(start_paused = true)]
async fn clients_sharing_a_limiter_share_its_pace() {
    let transport = ScriptedTransport::new();
    let limiter = Arc::new(RateLimiter::default());
    let first = client(&transport).with_limiter(limiter.clone());
    let second = client(&transport).with_limiter(limiter);

    let (a, b) = tokio::join!(
        first.fetch_collection("alice"),
        second.fetch_collection("bob")
    );
    a.unwrap();
    b.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].at - requests[0].at >= Duration::from_millis(1000));
}
