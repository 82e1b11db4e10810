//! In-status duration accounting.
//!
//! Walks an item's status changes in time order and sums the whole days the
//! item held one status inside a reporting window. Every segment counts both
//! of its end days, so a status held for any part of a day counts as a day.

use chrono::{Duration, NaiveDateTime};

use super::changelog::StatusChangeEvent;
use super::window::ReportingWindow;

/// Whole days; never negative.
pub type DurationDays = u64;

/// Measures time spent in a single status, e.g. "In Progress".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalAccumulator {
    active_status: String,
}

impl IntervalAccumulator {
    pub fn new(active_status: impl Into<String>) -> Self {
        Self {
            active_status: active_status.into(),
        }
    }

    pub fn active_status(&self) -> &str {
        &self.active_status
    }

    /// Total days spent in the active status within `window`.
    ///
    /// `events` must be in chronological order. Events before the window only
    /// establish the status the item enters the window with. An item still in
    /// the active status after the last event is counted up to `now`, capped
    /// at the end of the window.
    pub fn compute(
        &self,
        events: &[StatusChangeEvent],
        window: &ReportingWindow,
        now: NaiveDateTime,
    ) -> DurationDays {
        let window_start = window.start_instant();
        let window_end = window.end_instant();

        let mut total: DurationDays = 0;
        let mut current_status: Option<&str> = None;
        let mut status_start: Option<NaiveDateTime> = None;

        for event in events.iter().filter(|e| e.is_status_change()) {
            if event.timestamp >= window_start && current_status == Some(self.active_status()) {
                if let Some(started) = status_start {
                    total += segment_days(
                        started.max(window_start),
                        event.timestamp.min(window_end),
                    );
                }
            }
            current_status = Some(event.to_value.as_str());
            status_start = Some(event.timestamp);
        }

        if current_status == Some(self.active_status()) {
            if let Some(started) = status_start {
                total += segment_days(started.max(window_start), now.min(window_end));
            }
        }

        total
    }
}

/// Free-function form of [`IntervalAccumulator::compute`].
pub fn compute(
    events: &[StatusChangeEvent],
    window: &ReportingWindow,
    active_status: &str,
    now: NaiveDateTime,
) -> DurationDays {
    IntervalAccumulator::new(active_status).compute(events, window, now)
}

/// Inclusive day count of `[from, to]`; zero when `to` precedes `from` by a
/// day or more.
fn segment_days(from: NaiveDateTime, to: NaiveDateTime) -> DurationDays {
    let days = floor_days(to - from) + 1;
    days.max(0) as DurationDays
}

/// Whole days in `delta`, rounded toward negative infinity.
fn floor_days(delta: Duration) -> i64 {
    let truncated = delta.num_days();
    if Duration::days(truncated) > delta {
        truncated - 1
    } else {
        truncated
    }
}
