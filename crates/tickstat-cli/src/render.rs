//! Plain-text rendering of reports for the terminal.

use std::fmt::Write;

use tickstat_core::report::PersonSummary;
use tickstat_core::ActivityReport;

/// Widest bar in the activity chart, in characters.
const BAR_WIDTH: usize = 40;

/// Left-aligned table with a header rule.
pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

/// Grouped horizontal bars: tickets, comments and days per person.
pub fn activity_chart(people: &[PersonSummary]) -> String {
    let max = people
        .iter()
        .flat_map(|p| [p.tickets_assigned as u64, p.comments_made as u64, p.days_in_progress])
        .max()
        .unwrap_or(0);
    let label_width = people
        .iter()
        .map(|p| p.person.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for p in people {
        let series = [
            ("tickets", p.tickets_assigned as u64),
            ("comments", p.comments_made as u64),
            ("days", p.days_in_progress),
        ];
        for (i, (name, value)) in series.iter().enumerate() {
            let label = if i == 0 { p.person.as_str() } else { "" };
            let len = if max == 0 {
                0
            } else {
                (*value as usize * BAR_WIDTH).div_ceil(max as usize)
            };
            let _ = writeln!(
                out,
                "{label:<label_width$}  {name:<8} {} {value}",
                "#".repeat(len)
            );
        }
    }
    out
}

pub fn render_report(report: &ActivityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Ticket activity {} to {} (status: {})\n",
        report.window.start(),
        report.window.end(),
        report.active_status
    );

    if report.is_empty() {
        out.push_str("No tickets found for the selected date range.\n");
    } else {
        let totals = &report.totals;
        let _ = writeln!(out, "Total Tickets:           {}", totals.total_tickets);
        let _ = writeln!(
            out,
            "Total Story Points:      {}",
            format_points(totals.total_story_points)
        );
        let _ = writeln!(out, "Total Comments:          {}", totals.total_comments);
        let _ = writeln!(
            out,
            "Total Days In Progress:  {}",
            totals.total_days_in_progress
        );

        out.push_str("\nSummary by Person\n\n");
        let rows = report
            .people
            .iter()
            .map(|p| {
                vec![
                    p.person.clone(),
                    p.email.clone().unwrap_or_default(),
                    p.tickets_assigned.to_string(),
                    p.comments_made.to_string(),
                    p.days_in_progress.to_string(),
                    p.total_activity.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(
            &[
                "Person",
                "Email",
                "Tickets Assigned",
                "Comments Made",
                "Days In Progress",
                "Total Activity",
            ],
            rows,
        ));

        out.push_str("\nActivity by Person\n\n");
        out.push_str(&activity_chart(&report.people));

        out.push_str("\nTicket Details\n\n");
        let rows = report
            .tickets
            .iter()
            .map(|t| {
                vec![
                    t.key.clone(),
                    t.summary.clone(),
                    t.status.clone(),
                    t.assignee.clone(),
                    format_points(t.story_points),
                    t.days_in_progress.to_string(),
                    t.comment_count.to_string(),
                    t.last_modified.clone(),
                    t.url.clone(),
                ]
            })
            .collect();
        out.push_str(&table(
            &[
                "Key",
                "Summary",
                "Status",
                "Assignee",
                "Story Points",
                "Days in Progress",
                "Comment Count",
                "Last Modified",
                "URL",
            ],
            rows,
        ));
    }

    if !report.warnings.is_empty() {
        out.push_str("\nWarnings\n\n");
        for warning in &report.warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }
    out
}
