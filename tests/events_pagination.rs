//! Aggregator pagination semantics against a scripted event source.
//!
//! Covered (strict):
//! - short/empty page stops the loop
//! - page cap bounds the number of upstream calls
//! - a failure on page 1 is fatal and typed
//! - a failure on page >= 2 degrades to the data collected so far
//! - window filtering applies to every retained event

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use github_portfolio_service::contributions::Window;
use github_portfolio_service::error::{Result, UpstreamError};
use github_portfolio_service::github::events::{
    EventAggregator, EventKind, EventSource, RawEvent,
};

/// Per-page script: either a batch of events or a fresh error.
enum Page {
    Events(Vec<RawEvent>),
    NotFound,
    RateLimited,
    Unavailable,
}

struct ScriptedSource {
    pages: Vec<Page>,
    calls: AtomicU32,
}

impl ScriptedSource {
    fn new(pages: Vec<Page>) -> Arc<Self> {
        Arc::new(Self {
            pages,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn fetch_page(&self, _login: &str, page: u32, _per_page: u32) -> Result<Vec<RawEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get((page - 1) as usize) {
            Some(Page::Events(events)) => Ok(events.clone()),
            Some(Page::NotFound) => Err(UpstreamError::NotFound),
            Some(Page::RateLimited) => Err(UpstreamError::RateLimited),
            Some(Page::Unavailable) => Err(UpstreamError::Unavailable { status: 500 }),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("rfc3339 timestamp")
}

fn push_at(s: &str) -> RawEvent {
    RawEvent {
        created_at: ts(s),
        kind: EventKind::Push,
    }
}

fn window() -> Window {
    Window {
        start: ts("2025-01-01T00:00:00Z"),
        end: ts("2025-12-31T23:59:59Z"),
    }
}

/// A full page of `n` in-window events.
fn full_page(n: usize) -> Page {
    Page::Events(vec![push_at("2025-06-15T12:00:00Z"); n])
}

#[tokio::test]
async fn short_page_stops_pagination() {
    let source = ScriptedSource::new(vec![
        full_page(3),
        Page::Events(vec![push_at("2025-06-16T12:00:00Z")]),
    ]);
    let agg = EventAggregator::new(source.clone()).with_limits(3, 10);

    let events = agg.fetch_events("octocat", &window()).await.unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(source.calls(), 2, "short page must end the loop");
}

#[tokio::test]
async fn empty_first_page_yields_empty_result() {
    let source = ScriptedSource::new(vec![Page::Events(Vec::new())]);
    let agg = EventAggregator::new(source.clone()).with_limits(3, 10);

    let events = agg.fetch_events("octocat", &window()).await.unwrap();
    assert!(events.is_empty());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn page_cap_bounds_upstream_calls() {
    let source = ScriptedSource::new(vec![full_page(3), full_page(3), full_page(3), full_page(3)]);
    let agg = EventAggregator::new(source.clone()).with_limits(3, 2);

    let events = agg.fetch_events("octocat", &window()).await.unwrap();
    assert_eq!(events.len(), 6);
    assert_eq!(source.calls(), 2, "cap must stop the loop");
}

#[tokio::test]
async fn first_page_failure_is_fatal_and_typed() {
    for (page, expect_rate_limited) in [(Page::RateLimited, true), (Page::NotFound, false)] {
        let source = ScriptedSource::new(vec![page]);
        let agg = EventAggregator::new(source).with_limits(3, 10);

        let err = agg.fetch_events("octocat", &window()).await.unwrap_err();
        match err {
            UpstreamError::RateLimited => assert!(expect_rate_limited),
            UpstreamError::NotFound => assert!(!expect_rate_limited),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[tokio::test]
async fn later_page_failure_degrades_to_partial_data() {
    let source = ScriptedSource::new(vec![full_page(3), Page::Unavailable, full_page(3)]);
    let agg = EventAggregator::new(source.clone()).with_limits(3, 10);

    let events = agg.fetch_events("octocat", &window()).await.unwrap();
    assert_eq!(events.len(), 3, "keeps what page 1 collected");
    assert_eq!(source.calls(), 2, "stops after the failed page");
}

#[tokio::test]
async fn events_outside_window_are_dropped() {
    let source = ScriptedSource::new(vec![Page::Events(vec![
        push_at("2024-12-31T23:59:59Z"),
        push_at("2025-01-01T00:00:00Z"),
        push_at("2025-12-31T23:59:59Z"),
    ])]);
    let agg = EventAggregator::new(source).with_limits(100, 10);

    let events = agg.fetch_events("octocat", &window()).await.unwrap();
    assert_eq!(events.len(), 2, "window bounds are inclusive");
}
