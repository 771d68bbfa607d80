//! End-to-end calendar pipeline: aggregator -> builder -> cache, driven
//! through the service with scripted sources.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};

use github_portfolio_service::ai::client::DisabledClient;
use github_portfolio_service::ai::generator::ContentGenerator;
use github_portfolio_service::cache::CacheGateway;
use github_portfolio_service::config::ai::AiConfig;
use github_portfolio_service::config::github::GithubConfig;
use github_portfolio_service::error::Result;
use github_portfolio_service::github::events::{EventKind, EventSource, RawEvent};
use github_portfolio_service::github::profile::{ProfileFacts, ProfileSource};
use github_portfolio_service::ProfileService;

struct StubProfile;

#[async_trait]
impl ProfileSource for StubProfile {
    async fn fetch_profile(&self, login: &str) -> Result<ProfileFacts> {
        Ok(ProfileFacts {
            login: login.to_string(),
            name: None,
            bio: None,
            avatar_url: None,
            location: None,
            company: None,
            blog: None,
            email: None,
            followers: 0,
            following: 0,
            public_repos: 0,
            created_at: Utc::now(),
        })
    }
    fn name(&self) -> &'static str {
        "stub-profile"
    }
}

struct FixedEvents(Vec<RawEvent>);

#[async_trait]
impl EventSource for FixedEvents {
    async fn fetch_page(&self, _login: &str, page: u32, _per_page: u32) -> Result<Vec<RawEvent>> {
        // Single short page; the aggregator stops after it.
        if page == 1 {
            Ok(self.0.clone())
        } else {
            Ok(Vec::new())
        }
    }
    fn name(&self) -> &'static str {
        "fixed-events"
    }
}

fn service_with_events(events: Vec<RawEvent>) -> ProfileService {
    ProfileService::new(
        Arc::new(StubProfile),
        Arc::new(FixedEvents(events)),
        ContentGenerator::new(Arc::new(DisabledClient), &AiConfig::default()),
        CacheGateway::in_memory(),
        &GithubConfig::default(),
    )
}

#[tokio::test]
async fn zero_activity_identity_yields_all_zero_calendar() {
    let service = service_with_events(Vec::new());
    let calendar = service.contribution_calendar("quiet-user").await.unwrap();

    assert_eq!(calendar.total_contributions, 0);
    assert!(!calendar.weeks.is_empty());
    for week in &calendar.weeks {
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].date.weekday(), chrono::Weekday::Sun);
        assert_eq!(week.days[6].date.weekday(), chrono::Weekday::Sat);
        assert!(week.days.iter().all(|d| d.count == 0 && d.level == 0));
    }
}

#[tokio::test]
async fn recent_activity_is_counted_and_leveled() {
    // Three in-kind events yesterday plus one that never counts.
    let yesterday = Utc::now() - chrono::Duration::days(1);
    let mut events = vec![
        RawEvent {
            created_at: yesterday,
            kind: EventKind::Push,
        };
        3
    ];
    events.push(RawEvent {
        created_at: yesterday,
        kind: EventKind::Other,
    });

    let service = service_with_events(events);
    let calendar = service.contribution_calendar("octocat").await.unwrap();

    assert_eq!(calendar.total_contributions, 3);
    let day = calendar
        .weeks
        .iter()
        .flat_map(|w| w.days.iter())
        .find(|d| d.date == yesterday.date_naive())
        .expect("yesterday present in grid");
    assert_eq!(day.count, 3);
    assert_eq!(day.level, 2);
}

#[tokio::test]
async fn calendar_is_cached_per_login() {
    let service = service_with_events(Vec::new());
    let first = service.contribution_calendar("octocat").await.unwrap();
    let second = service.contribution_calendar("octocat").await.unwrap();
    // Same snapshot back, including identical week span.
    assert_eq!(first, second);
}
