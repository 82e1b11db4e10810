use chrono::NaiveDateTime;
use serde::Serialize;

use crate::activity::{DurationDays, IntervalAccumulator, ReportingWindow};
use crate::integrations::{ChangelogProvider, Issue};

/// Assignee label for issues nobody owns.
pub const UNASSIGNED: &str = "Unassigned";

/// One line of the ticket detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRow {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: String,
    pub story_points: f64,
    pub days_in_progress: DurationDays,
    pub comment_count: usize,
    pub last_modified: String,
    pub url: String,
}

/// Headline numbers across every ticket in the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketTotals {
    pub total_tickets: usize,
    pub total_story_points: f64,
    pub total_comments: usize,
    pub total_days_in_progress: DurationDays,
}

impl TicketTotals {
    pub fn from_rows(rows: &[TicketRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.total_tickets += 1;
            acc.total_story_points += row.story_points;
            acc.total_comments += row.comment_count;
            acc.total_days_in_progress += row.days_in_progress;
            acc
        })
    }
}

/// Build detail rows, fetching each issue's changelog.
///
/// An issue whose changelog cannot be fetched gets 0 days and a warning;
/// the other rows are unaffected.
pub fn build_ticket_rows(
    issues: &[Issue],
    changelogs: &dyn ChangelogProvider,
    accumulator: &IntervalAccumulator,
    window: &ReportingWindow,
    now: NaiveDateTime,
    base_url: &str,
    warnings: &mut Vec<String>,
) -> Vec<TicketRow> {
    issues
        .iter()
        .map(|issue| {
            let days_in_progress = match changelogs.fetch_changelog(&issue.key) {
                Ok(events) => accumulator.compute(&events, window, now),
                Err(e) => {
                    tracing::warn!(issue = %issue.key, "changelog unavailable: {e}");
                    warnings.push(format!(
                        "Failed to calculate days in progress for {}: {e}",
                        issue.key
                    ));
                    0
                }
            };

            TicketRow {
                key: issue.key.clone(),
                summary: issue.summary.clone(),
                status: issue.status.clone(),
                assignee: issue
                    .assignee
                    .as_ref()
                    .map(|a| a.display_name.clone())
                    .unwrap_or_else(|| UNASSIGNED.to_string()),
                story_points: issue.story_points,
                days_in_progress,
                comment_count: issue.comments.len(),
                last_modified: issue.updated.clone(),
                url: format!("{}/browse/{}", base_url.trim_end_matches('/'), issue.key),
            }
        })
        .collect()
}
