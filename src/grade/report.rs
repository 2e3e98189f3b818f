#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use tabled::{
    Table,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::results::GradeReport;

/// Renders the grading overview table.
pub fn render_table(report: &GradeReport) -> String {
    let title = if report.assignment_name.is_empty() {
        String::from("Grading Overview")
    } else {
        format!("Grading Overview: {}", report.assignment_name)
    };

    Table::new(report.rows())
        .with(Panel::header(title))
        .with(Panel::footer(format!("Total: {:.2}/{:.2}", report.total(), report.out_of())))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(32).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Serializes the report as pretty-printed JSON.
pub fn render_json(report: &GradeReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Could not serialize the grade report to JSON")
}

/// Prints the overview table to stderr and, if asked, the JSON report to
/// stdout.
pub fn show_result(report: &GradeReport, json: bool) -> Result<()> {
    eprintln!("{}", render_table(report));
    if json {
        println!("{}", render_json(report)?);
    }
    Ok(())
}
