//! Cache gateway contract: deterministic key derivation and the typed
//! get/set layer over the opaque store.

use github_portfolio_service::cache::{cache_key, CacheGateway, CacheOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Payload {
    data: String,
    content_type: String,
}

#[test]
fn key_derivation_is_call_stable() {
    let a = cache_key("screenshot", &["x", "100", "50"]);
    let b = cache_key("screenshot", &["x", "100", "50"]);
    assert_eq!(a, b);
}

#[test]
fn key_derivation_is_parameter_order_sensitive() {
    // (url=x, width=100, height=50) vs (url=x, width=50, height=100)
    let a = cache_key("screenshot", &["x", "100", "50"]);
    let b = cache_key("screenshot", &["x", "50", "100"]);
    assert_ne!(a, b);
}

#[test]
fn namespaces_do_not_collide() {
    let a = cache_key("profile", &["octocat"]);
    let b = cache_key("contributions", &["octocat"]);
    assert_ne!(a, b);
    assert!(a.starts_with("profile:"));
    assert!(b.starts_with("contributions:"));
}

#[tokio::test]
async fn json_round_trip_through_the_gateway() {
    let cache = CacheGateway::in_memory();
    let key = cache_key("screenshot", &["https://example.com", "1280", "800"]);
    let value = Payload {
        data: "aGVsbG8=".to_string(),
        content_type: "image/png".to_string(),
    };

    assert!(cache.get_json::<Payload>(&key).await.is_none());

    let opts = CacheOptions::with_ttl(86400)
        .tag("screenshot")
        .tag("url:https://example.com");
    cache.set_json(&key, &value, &opts).await;

    assert_eq!(cache.get_json::<Payload>(&key).await, Some(value));
}

#[tokio::test]
async fn expired_entries_read_as_miss() {
    let cache = CacheGateway::in_memory();
    let key = cache_key("profile", &["octocat"]);
    cache
        .set_json(&key, &"snapshot".to_string(), &CacheOptions::with_ttl(0))
        .await;
    assert!(cache.get_json::<String>(&key).await.is_none());
}
