//! Integration tests for the scrub pipeline
//!
//! These tests point the scrubber at a wiremock server that serves the two
//! fixed page shapes (browse-category listings and item detail pages) and
//! exercise the full cache/force state machine end-to-end.

use ahscrub::config::Config;
use ahscrub::scrub::{FieldValue, ScrubOptions, Scrubber};
use std::collections::HashSet;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a config pointed at the mock server with an isolated cache dir
fn test_config(server: &MockServer, cache_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.origin = server.uri();
    config.scrub.cache_dir = cache_dir.path().to_string_lossy().into_owned();
    config
}

/// Builds a config whose origin is a closed port, so any network attempt
/// degrades records instead of succeeding
fn offline_config(cache_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.origin = "http://127.0.0.1:9".to_string();
    config.scrub.cache_dir = cache_dir.path().to_string_lossy().into_owned();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!("<html><body>{body}</body></html>"))
}

async fn mount_browse(server: &MockServer, hrefs: &[&str]) {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">category</a>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/browse"))
        .respond_with(html_page(&anchors))
        .mount(server)
        .await;
}

async fn mount_category(server: &MockServer, category: u32, item_ids: &[u32]) {
    let rows: String = item_ids
        .iter()
        .map(|id| format!(r#"<tr><td><a href="/item/{id}">item</a></td></tr>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/browse/{category}")))
        .respond_with(html_page(&format!(
            r#"<table class="stdlist"><tbody>{rows}</tbody></table>"#
        )))
        .mount(server)
        .await;
}

async fn mount_item(server: &MockServer, id: u32, name: &str, price: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/item/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><head><title>{name} - FFXIAH.com</title></head><body>
            <div><span>Price</span><div><span class="number-format">{price}</span></div></div>
            </body></html>"#
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fresh_scrub_discovers_and_fetches() {
    let server = MockServer::start().await;
    mount_browse(&server, &["/browse/1", "/browse/2"]).await;
    mount_category(&server, 1, &[100, 101]).await;
    mount_category(&server, 2, &[101, 102]).await;
    mount_item(&server, 100, "Bronze Sword", 140).await;
    mount_item(&server, 101, "Bronze Dagger", 120).await;
    mount_item(&server, 102, "Bronze Axe", 180).await;

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();

    let data = scrubber.scrub(ScrubOptions::default()).await.unwrap();

    // duplicate id across categories merged
    assert_eq!(data.len(), 3);
    assert_eq!(data[&100].name(), Some("Bronze Sword"));
    assert_eq!(data[&101].get("price"), Some(&FieldValue::Integer(120)));
    assert_eq!(data[&102].item_id(), 102);
}

#[tokio::test]
async fn test_second_scrub_uses_cache_without_network() {
    let server = MockServer::start().await;
    mount_browse(&server, &["/browse/1"]).await;
    mount_category(&server, 1, &[7]).await;
    mount_item(&server, 7, "Fire Crystal", 125).await;

    let cache_dir = TempDir::new().unwrap();
    let first = Scrubber::new(test_config(&server, &cache_dir))
        .unwrap()
        .scrub(ScrubOptions::default())
        .await
        .unwrap();

    // second run against a dead origin: must come entirely from cache
    let second = Scrubber::new(offline_config(&cache_dir))
        .unwrap()
        .scrub(ScrubOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second[&7].name(), Some("Fire Crystal"));
}

#[tokio::test]
async fn test_force_overwrites_existing_caches() {
    let server = MockServer::start().await;
    mount_browse(&server, &["/browse/1"]).await;
    mount_category(&server, 1, &[7]).await;
    mount_item(&server, 7, "Fire Crystal", 125).await;

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();
    scrubber.scrub(ScrubOptions::default()).await.unwrap();

    // the site changes; a plain rerun would return the stale cache
    server.reset().await;
    mount_browse(&server, &["/browse/1"]).await;
    mount_category(&server, 1, &[7, 8]).await;
    mount_item(&server, 7, "Fire Crystal", 999).await;
    mount_item(&server, 8, "Ice Crystal", 210).await;

    let forced = scrubber
        .scrub(ScrubOptions {
            force: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(forced.len(), 2);
    assert_eq!(forced[&7].get("price"), Some(&FieldValue::Integer(999)));

    // the overwritten artifacts now serve the new data
    let cached = Scrubber::new(offline_config(&cache_dir))
        .unwrap()
        .scrub(ScrubOptions::default())
        .await
        .unwrap();
    assert_eq!(cached, forced);
}

#[tokio::test]
async fn test_category_filter_boundary() {
    let server = MockServer::start().await;
    mount_browse(
        &server,
        &["/browse/0", "/browse/239", "/browse/240", "/browse/1000"],
    )
    .await;
    mount_category(&server, 0, &[1]).await;
    mount_category(&server, 239, &[2]).await;
    // categories at or above the ceiling must never be requested
    for filtered in [240, 1000] {
        Mock::given(method("GET"))
            .and(path(format!("/browse/{filtered}")))
            .respond_with(html_page(""))
            .expect(0)
            .mount(&server)
            .await;
    }
    mount_item(&server, 1, "A", 10).await;
    mount_item(&server, 2, "B", 20).await;

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();
    let data = scrubber.scrub(ScrubOptions::default()).await.unwrap();

    let ids: HashSet<u32> = data.keys().copied().collect();
    assert_eq!(ids, [1, 2].into_iter().collect());
}

#[tokio::test]
async fn test_explicit_ids_skip_discovery() {
    let server = MockServer::start().await;
    // no browse or category mocks: discovery would 404 and fail the run
    mount_item(&server, 42, "Mythril Ore", 800).await;

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();

    let data = scrubber
        .scrub(ScrubOptions {
            ids: Some([42].into_iter().collect()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(data.len(), 1);
    assert_eq!(data[&42].name(), Some("Mythril Ore"));
}

#[tokio::test]
async fn test_dead_item_page_degrades_to_minimal_record() {
    let server = MockServer::start().await;
    mount_item(&server, 1, "Alive", 5).await;
    // item 2 has no mock and 404s

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();

    let data = scrubber
        .scrub(ScrubOptions {
            ids: Some([1, 2].into_iter().collect()),
            ..Default::default()
        })
        .await
        .unwrap();

    // the dataset is exactly as large as the id set, failures included
    assert_eq!(data.len(), 2);
    assert_eq!(data[&1].name(), Some("Alive"));
    assert_eq!(data[&2].name(), None);
    assert_eq!(data[&2].get("name"), Some(&FieldValue::Absent));
    assert_eq!(data[&2].item_id(), 2);
}

#[tokio::test]
async fn test_fanout_equivalence() {
    let server = MockServer::start().await;
    let ids: Vec<u32> = (1..=20).collect();
    for id in &ids {
        mount_item(&server, *id, &format!("Item {id}"), (*id as i64) * 10).await;
    }
    let id_set: HashSet<u32> = ids.into_iter().collect();

    let sequential_dir = TempDir::new().unwrap();
    let sequential = Scrubber::new(test_config(&server, &sequential_dir))
        .unwrap()
        .scrub(ScrubOptions {
            workers: 1,
            ids: Some(id_set.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

    let pooled_dir = TempDir::new().unwrap();
    let pooled = Scrubber::new(test_config(&server, &pooled_dir))
        .unwrap()
        .scrub(ScrubOptions {
            workers: 8,
            ids: Some(id_set.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(sequential, pooled);
    assert_eq!(pooled.len(), id_set.len());
}

#[tokio::test]
async fn test_cached_ids_skip_discovery_but_fetch_data() {
    let server = MockServer::start().await;
    // discovery is impossible (no browse mock), but the id cache exists
    mount_item(&server, 9, "Wind Crystal", 90).await;

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();
    scrubber
        .cache()
        .save_ids(&[9].into_iter().collect())
        .unwrap();

    let data = scrubber.scrub(ScrubOptions::default()).await.unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[&9].name(), Some("Wind Crystal"));
}

#[tokio::test]
async fn test_malformed_category_page_contributes_nothing() {
    let server = MockServer::start().await;
    mount_browse(&server, &["/browse/1", "/browse/2"]).await;
    // category 1 has no listing table at all
    Mock::given(method("GET"))
        .and(path("/browse/1"))
        .respond_with(html_page("<p>maintenance</p>"))
        .mount(&server)
        .await;
    mount_category(&server, 2, &[3]).await;
    mount_item(&server, 3, "Survivor", 30).await;

    let cache_dir = TempDir::new().unwrap();
    let scrubber = Scrubber::new(test_config(&server, &cache_dir)).unwrap();
    let data = scrubber.scrub(ScrubOptions::default()).await.unwrap();

    assert_eq!(data.len(), 1);
    assert!(data.contains_key(&3));
}
