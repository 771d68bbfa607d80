// src/github/mod.rs
pub mod events;
pub mod profile;

use std::time::Duration;

/// Shared reqwest client shape for GitHub calls: identified user agent and
/// bounded connect/total timeouts so no upstream read can hang a request.
pub(crate) fn build_http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("github-portfolio-service/0.1 (+github.com/lumlich/github-portfolio-service)")
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("reqwest client")
}
