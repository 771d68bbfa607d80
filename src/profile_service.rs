//! Profile aggregation: one entry point that turns a login into a complete,
//! display-ready portfolio record.
//!
//! Fatal conditions (unknown identity, bad credentials, rate limit on a
//! required first call) surface as typed errors. Everything downstream of a
//! successful profile fetch is repaired locally; callers never see a
//! generation or extraction failure.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::ai::generator::ContentGenerator;
use crate::ai::{ContentOrigin, ProfileSummary, SeoMetadata};
use crate::cache::{cache_key, CacheGateway, CacheOptions};
use crate::config::github::GithubConfig;
use crate::contributions::{build_calendar, ContributionCalendar, Window};
use crate::error::Result;
use crate::github::events::{EventAggregator, EventSource};
use crate::github::profile::{ProfileFacts, ProfileSource};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("portfolio_cache_hits_total", "Cache hits by namespace.");
        describe_counter!("portfolio_cache_misses_total", "Cache misses by namespace.");
    });
}

/// The normalized result attached to a profile page. Content provenance is
/// reported so consumers can tell model copy from deterministic copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioProfile {
    pub facts: ProfileFacts,
    pub about: ProfileSummary,
    pub about_origin: ContentOrigin,
    pub seo: SeoMetadata,
    pub seo_origin: ContentOrigin,
}

pub struct ProfileService {
    profiles: Arc<dyn ProfileSource>,
    aggregator: EventAggregator,
    generator: ContentGenerator,
    cache: CacheGateway,
    profile_ttl_secs: u64,
    contributions_ttl_secs: u64,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        events: Arc<dyn EventSource>,
        generator: ContentGenerator,
        cache: CacheGateway,
        cfg: &GithubConfig,
    ) -> Self {
        Self {
            profiles,
            aggregator: EventAggregator::new(events).with_limits(cfg.per_page, cfg.max_pages),
            generator,
            cache,
            profile_ttl_secs: cfg.profile_ttl_secs,
            contributions_ttl_secs: cfg.contributions_ttl_secs,
        }
    }

    /// Profile facts plus both generated content pieces, cache-backed.
    ///
    /// The two generation calls run concurrently and fail independently; a
    /// broken summary never costs the SEO block its model answer, and vice
    /// versa.
    pub async fn portfolio_profile(&self, login: &str) -> Result<PortfolioProfile> {
        ensure_metrics_described();
        let key = cache_key("profile", &[login]);
        if let Some(hit) = self.cache.get_json::<PortfolioProfile>(&key).await {
            counter!("portfolio_cache_hits_total").increment(1);
            return Ok(hit);
        }
        counter!("portfolio_cache_misses_total").increment(1);

        let facts = self.profiles.fetch_profile(login).await?;

        let (about, seo) = tokio::join!(
            self.generator.profile_summary(&facts),
            self.generator.seo_metadata(&facts)
        );
        let (about, about_origin) = about;
        let (seo, seo_origin) = seo;

        let profile = PortfolioProfile {
            facts,
            about,
            about_origin,
            seo,
            seo_origin,
        };

        let opts = CacheOptions::with_ttl(self.profile_ttl_secs)
            .tag("profile")
            .tag(format!("user:{login}"));
        self.cache.set_json(&key, &profile, &opts).await;

        info!(
            login,
            about_origin = ?profile.about_origin,
            seo_origin = ?profile.seo_origin,
            "portfolio profile assembled"
        );
        Ok(profile)
    }

    /// Trailing-year activity calendar, cache-backed. Partial pagination
    /// failures have already been absorbed by the aggregator.
    pub async fn contribution_calendar(&self, login: &str) -> Result<ContributionCalendar> {
        ensure_metrics_described();
        let key = cache_key("contributions", &[login]);
        if let Some(hit) = self.cache.get_json::<ContributionCalendar>(&key).await {
            counter!("portfolio_cache_hits_total").increment(1);
            return Ok(hit);
        }
        counter!("portfolio_cache_misses_total").increment(1);

        let window = Window::trailing_year(chrono::Utc::now());
        let events = self.aggregator.fetch_events(login, &window).await?;
        let calendar = build_calendar(&events, &window);

        let opts = CacheOptions::with_ttl(self.contributions_ttl_secs)
            .tag("contributions")
            .tag(format!("user:{login}"));
        self.cache.set_json(&key, &calendar, &opts).await;

        Ok(calendar)
    }
}
