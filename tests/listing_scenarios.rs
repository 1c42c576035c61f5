// tests/listing_scenarios.rs
//! "Load more" behaviour of the post listing against a paged source.

mod common;

use common::InMemorySource;
use pretty_assertions::assert_eq;
use prismic_blog::{AppError, ListingState, PageSize, PostListing};
use std::sync::Arc;

fn uids(listing: &PostListing) -> Vec<String> {
    listing
        .current_items()
        .iter()
        .map(|post| post.id.to_string())
        .collect()
}

#[tokio::test]
async fn loads_every_page_in_source_order() {
    let source = Arc::new(InMemorySource::with_fixture_posts());
    let mut listing = PostListing::new(source.clone(), PageSize::new(2).unwrap());

    listing.load_first().await.unwrap();
    assert_eq!(
        uids(&listing),
        vec!["como-utilizar-hooks", "criando-um-app-cra-do-zero"]
    );
    assert_eq!(listing.state(), ListingState::Loaded { page: 1 });

    listing.load_next().await.unwrap();
    assert_eq!(
        uids(&listing),
        vec![
            "como-utilizar-hooks",
            "criando-um-app-cra-do-zero",
            "post-sem-autor",
            "rascunho-antigo"
        ]
    );
    assert!(!listing.has_more());
    assert_eq!(listing.state(), ListingState::Exhausted { page: 2 });
    assert!(matches!(
        listing.load_next().await,
        Err(AppError::AlreadyExhausted)
    ));

    let requests = source.requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![None, Some(InMemorySource::cursor_for(2, 2))]
    );
}

#[tokio::test]
async fn item_count_matches_pages_merged() {
    let source = Arc::new(InMemorySource::with_fixture_posts());
    let mut listing = PostListing::new(source, PageSize::new(1).unwrap());

    let mut merged = listing.load_first().await.unwrap().appended;
    assert_eq!(listing.current_items().len(), merged);

    while listing.has_more() {
        merged += listing.load_next().await.unwrap().appended;
        assert_eq!(listing.current_items().len(), merged);
    }

    assert_eq!(merged, 4);
    assert_eq!(listing.page_number(), Some(4));
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    let source = Arc::new(InMemorySource::with_fixture_posts());
    let cursor = InMemorySource::cursor_for(2, 2);
    source.fail_once(&cursor);
    let mut listing = PostListing::new(source.clone(), PageSize::new(2).unwrap());

    listing.load_first().await.unwrap();
    let before = listing.snapshot().cloned();

    assert!(listing.load_next().await.is_err());
    assert_eq!(listing.snapshot().cloned(), before);
    assert_eq!(listing.next_cursor().map(|c| c.as_str()), Some(cursor.as_str()));

    listing.load_next().await.unwrap();
    assert_eq!(listing.current_items().len(), 4);
}

#[tokio::test]
async fn listing_fields_default_to_empty_strings() {
    let source = Arc::new(InMemorySource::with_fixture_posts());
    let mut listing = PostListing::new(source, PageSize::maximum());
    listing.load_first().await.unwrap();

    let without_author = &listing.current_items()[2];
    assert_eq!(without_author.id.as_str(), "post-sem-autor");
    assert_eq!(without_author.subtitle, "");
    assert_eq!(without_author.author, "");

    let rich_title = &listing.current_items()[1];
    assert_eq!(rich_title.title, "Criando um app CRA do zero");
}

#[tokio::test]
async fn snapshot_serializes_cursor_verbatim() {
    let source = Arc::new(InMemorySource::with_fixture_posts());
    let mut listing = PostListing::new(source, PageSize::new(3).unwrap());
    listing.load_first().await.unwrap();

    let snapshot = serde_json::to_value(listing.snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["page_number"], 1);
    assert_eq!(
        snapshot["next_cursor"],
        InMemorySource::cursor_for(2, 3).as_str()
    );
    assert_eq!(snapshot["items"].as_array().unwrap().len(), 3);
}
