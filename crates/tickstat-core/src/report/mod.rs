//! Ticket activity report.
//!
//! Folds fetched issues into detail rows, headline totals and a per-person
//! summary. Remote failures degrade single rows or emails and are collected
//! as warnings; they never abort the report.

mod people;
mod tickets;

pub use people::{summarize_people, PersonSummary};
pub use tickets::{build_ticket_rows, TicketRow, TicketTotals, UNASSIGNED};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::activity::{Clock, IntervalAccumulator, ReportingWindow};
use crate::integrations::{ChangelogProvider, EmailDirectory, Issue};

/// Collaborators and parameters for one report run.
pub struct ReportContext<'a> {
    pub window: ReportingWindow,
    pub accumulator: IntervalAccumulator,
    pub changelogs: &'a dyn ChangelogProvider,
    pub emails: Option<&'a dyn EmailDirectory>,
    pub clock: &'a dyn Clock,
    pub base_url: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub window: ReportingWindow,
    pub active_status: String,
    pub generated_at: NaiveDateTime,
    pub totals: TicketTotals,
    pub people: Vec<PersonSummary>,
    pub tickets: Vec<TicketRow>,
    pub warnings: Vec<String>,
}

impl ActivityReport {
    /// Build the report for `issues`. `warnings` carries problems found while
    /// fetching the issues themselves.
    pub fn build(ctx: &ReportContext<'_>, issues: &[Issue], mut warnings: Vec<String>) -> Self {
        // One instant for every open segment in this run.
        let now = ctx.clock.now();

        let tickets = build_ticket_rows(
            issues,
            ctx.changelogs,
            &ctx.accumulator,
            &ctx.window,
            now,
            ctx.base_url,
            &mut warnings,
        );
        let totals = TicketTotals::from_rows(&tickets);
        let people = summarize_people(&tickets, issues, ctx.emails, &mut warnings);

        Self {
            window: ctx.window,
            active_status: ctx.accumulator.active_status().to_string(),
            generated_at: now,
            totals,
            people,
            tickets,
            warnings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
