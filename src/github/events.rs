//! Public activity events: wire types, the source seam, and the bounded
//! paginated aggregator.
//!
//! The upstream gives no ordering guarantee across or within pages, so the
//! aggregator never assumes chronological order; it only filters to the
//! requested window and lets the calendar builder do the bucketing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::config::github::GithubConfig;
use crate::contributions::Window;
use crate::error::{Result, UpstreamError};
use crate::github::build_http_client;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "events_pages_fetched_total",
            "Event pages successfully fetched from the upstream."
        );
        describe_counter!(
            "events_partial_pages_total",
            "Aggregations that degraded to partial data after a page >= 2 failed."
        );
        describe_counter!(
            "events_kept_total",
            "Events retained after window filtering."
        );
    });
}

/// Closed set of public activity types. Everything the upstream may invent
/// later lands in `Other` and never counts toward contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    Create,
    Delete,
    Fork,
    Watch,
    Public,
    PullRequestReview,
    CommitComment,
    IssueComment,
    PullRequestReviewComment,
    Other,
}

impl EventKind {
    pub fn counts_as_contribution(&self) -> bool {
        !matches!(self, EventKind::Other)
    }

    fn as_wire(&self) -> &'static str {
        match self {
            EventKind::Push => "PushEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::Create => "CreateEvent",
            EventKind::Delete => "DeleteEvent",
            EventKind::Fork => "ForkEvent",
            EventKind::Watch => "WatchEvent",
            EventKind::Public => "PublicEvent",
            EventKind::PullRequestReview => "PullRequestReviewEvent",
            EventKind::CommitComment => "CommitCommentEvent",
            EventKind::IssueComment => "IssueCommentEvent",
            EventKind::PullRequestReviewComment => "PullRequestReviewCommentEvent",
            EventKind::Other => "OtherEvent",
        }
    }
}

impl From<String> for EventKind {
    fn from(wire: String) -> Self {
        match wire.as_str() {
            "PushEvent" => EventKind::Push,
            "PullRequestEvent" => EventKind::PullRequest,
            "IssuesEvent" => EventKind::Issues,
            "CreateEvent" => EventKind::Create,
            "DeleteEvent" => EventKind::Delete,
            "ForkEvent" => EventKind::Fork,
            "WatchEvent" => EventKind::Watch,
            "PublicEvent" => EventKind::Public,
            "PullRequestReviewEvent" => EventKind::PullRequestReview,
            "CommitCommentEvent" => EventKind::CommitComment,
            "IssueCommentEvent" => EventKind::IssueComment,
            "PullRequestReviewCommentEvent" => EventKind::PullRequestReviewComment,
            _ => EventKind::Other,
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_wire().to_string()
    }
}

/// Wire shape of one upstream event; produced per page fetch and discarded
/// after aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

/// Seam for the paginated events upstream. Tests provide stub pagers; the
/// real one talks to the GitHub REST API.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_page(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<RawEvent>>;
    fn name(&self) -> &'static str;
}

/// GitHub REST `/users/{login}/events/public` pager.
pub struct GithubEventSource {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubEventSource {
    pub fn new(cfg: &GithubConfig) -> Self {
        Self {
            http: build_http_client(cfg.request_timeout_secs),
            api_base: cfg.api_base.clone(),
            token: cfg.token.clone(),
        }
    }
}

#[async_trait]
impl EventSource for GithubEventSource {
    async fn fetch_page(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<RawEvent>> {
        let url = format!("{}/users/{}/events/public", self.api_base, login);
        let mut req = self
            .http
            .get(&url)
            .query(&[("page", page), ("per_page", per_page)])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(UpstreamError::from_transport)?;
        if !resp.status().is_success() {
            return Err(UpstreamError::from_status(resp.status()));
        }
        resp.json::<Vec<RawEvent>>()
            .await
            .map_err(UpstreamError::from_transport)
    }

    fn name(&self) -> &'static str {
        "github-events"
    }
}

/// Bounded, sequential pagination over an [`EventSource`], filtered to a
/// window.
///
/// A failure on page 1 is fatal; a failure on any later page means the data
/// is as complete as obtainable and the aggregation proceeds with what was
/// collected. Stop conditions: empty page, short page, or the page cap.
pub struct EventAggregator {
    source: Arc<dyn EventSource>,
    per_page: u32,
    max_pages: u32,
}

impl EventAggregator {
    pub const DEFAULT_PER_PAGE: u32 = 100;
    pub const DEFAULT_MAX_PAGES: u32 = 10;

    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            per_page: Self::DEFAULT_PER_PAGE,
            max_pages: Self::DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_limits(mut self, per_page: u32, max_pages: u32) -> Self {
        self.per_page = per_page.clamp(1, Self::DEFAULT_PER_PAGE);
        self.max_pages = max_pages.max(1);
        self
    }

    pub async fn fetch_events(&self, login: &str, window: &Window) -> Result<Vec<RawEvent>> {
        ensure_metrics_described();

        let mut collected: Vec<RawEvent> = Vec::new();
        for page in 1..=self.max_pages {
            match self.source.fetch_page(login, page, self.per_page).await {
                Ok(batch) => {
                    counter!("events_pages_fetched_total").increment(1);
                    let batch_len = batch.len();
                    collected.extend(
                        batch
                            .into_iter()
                            .filter(|e| window.contains(e.created_at)),
                    );
                    if batch_len == 0 || (batch_len as u32) < self.per_page {
                        break;
                    }
                }
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    // At least one page succeeded; degrade to best effort.
                    warn!(
                        login,
                        page,
                        source = self.source.name(),
                        error = %e,
                        "event page fetch failed, keeping partial history"
                    );
                    counter!("events_partial_pages_total").increment(1);
                    break;
                }
            }
        }

        counter!("events_kept_total").increment(collected.len() as u64);
        Ok(collected)
    }
}
