//! Output formatting utilities
//!
//! Text listings and HTML table fragments for the reports, plus the pretty
//! console summaries and a JSON formatter for machine use. All listings
//! arrive here already collation-sorted.

use crate::error::Result;
use crate::percent::Percent;
use crate::reconcile::{HousenumberTotals, MissingSet, StreetNumbers};
use crate::relation::Relation;
use crate::tabular::Table;
use crate::workspace::WorkspaceStats;
use serde::Serialize;

/// One row of the relation overview listing.
#[derive(Debug, Clone, Serialize)]
pub struct RelationOverview {
    pub name: String,
    /// House-number coverage, "N/A" when not tracked or not computed yet.
    pub housenumber_coverage: String,
    /// Street coverage, "N/A" when not tracked or not computed yet.
    pub street_coverage: String,
    /// When the cached map data was last refreshed, if ever.
    pub last_updated: Option<String>,
}

/// Plain-text missing-streets report: one street per line.
pub fn missing_streets_text(result: &MissingSet) -> String {
    result.todo.join("\n")
}

/// Plain-text missing-house-numbers report: one street per line with its
/// bracket-delimited groups. Streets with nothing missing are skipped by
/// this renderer, not by the reconciliation.
pub fn missing_housenumbers_text(relation: &Relation, results: &[StreetNumbers]) -> String {
    let mut lines = Vec::new();
    for result in results {
        if result.only_in_reference.is_empty() {
            continue;
        }
        let groups = relation.format_housenumber_groups(&result.street, &result.only_in_reference);
        lines.push(format!("{}\t[{}]", result.street, groups.join("], [")));
    }
    lines.join("\n")
}

/// HTML fragment for the missing-streets report: a one-column table with
/// a header row.
pub fn missing_streets_html(result: &MissingSet) -> String {
    let mut table = Table::new(vec![vec!["Street name".to_string()]]);
    for street in &result.todo {
        table.push(vec![street.clone()]);
    }
    html_table(&table)
}

/// HTML fragment for the missing-house-numbers report: street and its
/// bracket-delimited groups per row. Covered streets are skipped, as in
/// the text renderer.
pub fn missing_housenumbers_html(relation: &Relation, results: &[StreetNumbers]) -> String {
    let mut table = Table::new(vec![vec![
        "Street name".to_string(),
        "Missing house numbers".to_string(),
    ]]);
    for result in results {
        if result.only_in_reference.is_empty() {
            continue;
        }
        let groups = relation.format_housenumber_groups(&result.street, &result.only_in_reference);
        table.push(vec![
            result.street.clone(),
            format!("[{}]", groups.join("], [")),
        ]);
    }
    html_table(&table)
}

/// HTML table fragment from a table; the first row renders as a header.
pub fn html_table(table: &Table) -> String {
    let mut out = String::from("<table rules=\"all\" frame=\"border\" cellpadding=\"4\">");
    for (index, row) in table.rows().iter().enumerate() {
        let tag = if index == 0 { "th" } else { "td" };
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<{}>{}</{}>", tag, html_escape(cell), tag));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
    out
}

/// Escape a cell for HTML output.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Pretty printer for console output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the missing-streets report for one relation.
    pub fn print_missing_streets(relation: &str, result: &MissingSet, percent: Percent) {
        println!("🗺  {}: missing streets", relation);
        println!(
            "├─ Possibly missing: {} (existing: {}, ready: {}%)",
            result.todo.len(),
            result.done.len(),
            percent
        );
        if result.todo.is_empty() {
            println!("└─ ✅ Nothing to do");
            return;
        }
        println!("└─ Streets:");
        for (index, street) in result.todo.iter().enumerate() {
            let prefix = if index == result.todo.len() - 1 {
                "   └─"
            } else {
                "   ├─"
            };
            println!("{} {}", prefix, street);
        }
    }

    /// Print the missing-house-numbers report for one relation.
    pub fn print_missing_housenumbers(
        relation: &Relation,
        results: &[StreetNumbers],
        totals: &HousenumberTotals,
        percent: Percent,
    ) {
        println!("🗺  {}: missing house numbers", relation.name());
        println!(
            "├─ Possibly missing {} house numbers for {} streets",
            totals.todo_count, totals.todo_street_count
        );
        println!(
            "├─ Existing: {} (ready: {}%)",
            totals.done_count, percent
        );
        let ongoing: Vec<&StreetNumbers> = results
            .iter()
            .filter(|r| !r.only_in_reference.is_empty())
            .collect();
        if ongoing.is_empty() {
            println!("└─ ✅ Nothing to do");
            return;
        }
        println!("└─ Streets:");
        for (index, result) in ongoing.iter().enumerate() {
            let prefix = if index == ongoing.len() - 1 {
                "   └─"
            } else {
                "   ├─"
            };
            let groups = relation.format_housenumber_groups(&result.street, &result.only_in_reference);
            println!("{} {}: [{}]", prefix, result.street, groups.join("], ["));
        }
    }

    /// Print the relation overview listing.
    pub fn print_relation_list(rows: &[RelationOverview]) {
        if rows.is_empty() {
            println!("No relations matched.");
            return;
        }

        println!("🗺  Relations:");
        for (index, row) in rows.iter().enumerate() {
            let prefix = if index == rows.len() - 1 { "└─" } else { "├─" };
            let updated = row
                .last_updated
                .as_deref()
                .map(|date| format!(", updated {}", date))
                .unwrap_or_default();
            println!(
                "{} {} (house numbers: {}%, streets: {}%{})",
                prefix, row.name, row.housenumber_coverage, row.street_coverage, updated
            );
        }
    }

    /// Print workspace statistics.
    pub fn print_workspace_stats(stats: &WorkspaceStats) {
        println!("📊 Cached artifacts");
        println!("├─ Tables: {}", stats.table_count);
        println!("├─ Percent scalars: {}", stats.percent_count);
        println!("└─ Total size: {} bytes", stats.total_size);
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}
