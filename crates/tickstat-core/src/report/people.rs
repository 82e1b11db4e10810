use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::tickets::{TicketRow, UNASSIGNED};
use crate::activity::DurationDays;
use crate::integrations::{EmailDirectory, Issue};

/// Per-person activity within the report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSummary {
    pub person: String,
    pub email: Option<String>,
    pub tickets_assigned: usize,
    pub comments_made: usize,
    pub days_in_progress: DurationDays,
    pub total_activity: usize,
}

/// Summarize assignees and commenters, sorted by name.
///
/// Anyone who is assigned a ticket or commented on one appears. Emails are
/// looked up only when `directory` is given; a failed lookup leaves the
/// email empty and adds a warning.
pub fn summarize_people(
    rows: &[TicketRow],
    issues: &[Issue],
    directory: Option<&dyn EmailDirectory>,
    warnings: &mut Vec<String>,
) -> Vec<PersonSummary> {
    let mut people: BTreeSet<&str> = rows
        .iter()
        .map(|r| r.assignee.as_str())
        .filter(|a| *a != UNASSIGNED)
        .collect();

    let mut comment_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for comment in issues.iter().flat_map(|i| &i.comments) {
        let name = comment.author.display_name.as_str();
        people.insert(name);
        *comment_counts.entry(name).or_default() += 1;
    }

    people
        .into_iter()
        .map(|person| {
            let assigned: Vec<&TicketRow> = rows.iter().filter(|r| r.assignee == person).collect();
            let tickets_assigned = assigned.len();
            let days_in_progress = assigned.iter().map(|r| r.days_in_progress).sum();
            let comments_made = comment_counts.get(person).copied().unwrap_or(0);

            let email = directory.and_then(|d| match d.lookup_email(person) {
                Ok(email) => email,
                Err(e) => {
                    tracing::warn!(%person, "email lookup failed: {e}");
                    warnings.push(format!("Failed to get email for user {person}: {e}"));
                    None
                }
            });

            PersonSummary {
                person: person.to_string(),
                email,
                tickets_assigned,
                comments_made,
                days_in_progress,
                total_activity: tickets_assigned + comments_made,
            }
        })
        .collect()
}
