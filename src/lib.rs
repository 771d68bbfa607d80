// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod ai;
pub mod api;
pub mod cache;
pub mod config;
pub mod contributions;
pub mod error;
pub mod github;
pub mod metrics;
pub mod profile_service;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::cache::{cache_key, CacheGateway, CacheOptions, CacheStore, MemoryStore};
pub use crate::contributions::{build_calendar, ContributionCalendar, Window};
pub use crate::error::UpstreamError;
pub use crate::profile_service::{PortfolioProfile, ProfileService};

use std::sync::Arc;

use crate::ai::client::build_completion_client;
use crate::ai::generator::ContentGenerator;
use crate::config::ai::AiConfig;
use crate::config::github::GithubConfig;
use crate::github::events::GithubEventSource;
use crate::github::profile::GithubProfileSource;

/// Wire the full service from process config: real GitHub sources, the
/// configured completion client, and an in-process cache store.
///
/// All components are constructed once here and passed in explicitly; there
/// is no global client state.
pub fn build_service(github_cfg: &GithubConfig, ai_cfg: &AiConfig) -> ProfileService {
    let profiles = Arc::new(GithubProfileSource::new(github_cfg));
    let events = Arc::new(GithubEventSource::new(github_cfg));
    let generator = ContentGenerator::new(build_completion_client(ai_cfg), ai_cfg);
    ProfileService::new(
        profiles,
        events,
        generator,
        CacheGateway::in_memory(),
        github_cfg,
    )
}

/// Build the app router the way the binary does, from config on disk.
/// Integration tests call this to drive the real wiring in-process.
pub async fn app() -> anyhow::Result<axum::Router> {
    let github_cfg = GithubConfig::from_toml();
    let ai_cfg = AiConfig::load_or_disabled();
    let service = build_service(&github_cfg, &ai_cfg);
    Ok(create_router(AppState::new(Arc::new(service))))
}
