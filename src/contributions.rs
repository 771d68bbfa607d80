//! # Contribution calendar
//! Pure bucketing of activity events into a GitHub-style year grid.
//!
//! Takes whatever events the aggregator collected and emits a complete,
//! Sunday-aligned calendar with a 0..=4 intensity level per day. Total
//! contributions count only days inside the requested window; the padding
//! days added for week alignment appear in the grid but not in the total.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::github::events::RawEvent;

/// Fixed time range over which activity is aggregated (typically the
/// trailing year). Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// The default portfolio window: one year back from `end`.
    pub fn trailing_year(end: DateTime<Utc>) -> Self {
        let start = end
            .checked_sub_months(Months::new(12))
            .unwrap_or(end - Duration::days(365));
        Self { start, end }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    /// Canonical `YYYY-MM-DD` day key (UTC date of the event timestamps).
    pub date: NaiveDate,
    pub count: u32,
    /// Intensity bucket 0..=4, a pure monotonic function of `count`.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionWeek {
    pub days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub weeks: Vec<ContributionWeek>,
}

/// Map a raw day count to its intensity level. Thresholds are fixed and
/// exact: 0, 1-2, 3-5, 6-10, >10.
pub fn level_for(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        _ => 4,
    }
}

/// Build the calendar for `window` from collected events. Pure and total: an
/// empty slice yields an all-zero grid.
///
/// The emitted span runs from the Sunday on/before `window.start` to the
/// Saturday on/after `window.end`, so every week holds exactly 7 days. Event
/// ordering does not matter; only the contribution kinds count.
pub fn build_calendar(events: &[RawEvent], window: &Window) -> ContributionCalendar {
    let mut by_day: std::collections::HashMap<NaiveDate, u32> = std::collections::HashMap::new();
    for event in events {
        if event.kind.counts_as_contribution() {
            *by_day.entry(event.created_at.date_naive()).or_insert(0) += 1;
        }
    }

    let window_start = window.start.date_naive();
    let window_end = window.end.date_naive();

    // Align the grid to whole Sunday..Saturday weeks.
    let first = window_start
        - Duration::days(window_start.weekday().num_days_from_sunday() as i64);
    let last = window_end
        + Duration::days(6 - window_end.weekday().num_days_from_sunday() as i64);

    let mut total: u32 = 0;
    let mut weeks = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        let mut days = Vec::with_capacity(7);
        for _ in 0..7 {
            let count = by_day.get(&cursor).copied().unwrap_or(0);
            if cursor >= window_start && cursor <= window_end {
                total += count;
            }
            days.push(ContributionDay {
                date: cursor,
                count,
                level: level_for(count),
            });
            cursor += Duration::days(1);
        }
        weeks.push(ContributionWeek { days });
    }

    ContributionCalendar {
        total_contributions: total,
        weeks,
    }
}
