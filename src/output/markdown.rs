//! Markdown rendering of the structured report.

use crate::report::model::{Report, Section, Status, Table};
use crate::utils::error::OutputError;
use log::info;
use std::io::Write;
use std::path::Path;

fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Ok => "\u{2705}",
        Status::Warning => "\u{26a0}\u{fe0f}",
        Status::Critical => "\u{274c}",
    }
}

/// Render the whole report as a Markdown document.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("# Instruments Profiling Report\n\n");
    out.push_str(&format!("- **Trace:** {}\n", report.trace));
    out.push_str(&format!("- **Generated:** {}\n\n", report.generated_at));

    for section in &report.sections {
        render_section(&mut out, section);
    }

    if !report.export_failures.is_empty() {
        out.push_str("## Export Failures\n\n");
        out.push_str("The following data sources could not be exported; their sections are missing from this report.\n\n");
        for failure in &report.export_failures {
            out.push_str(&format!("- {}\n", failure));
        }
        out.push('\n');
    }

    if !report.dropped_rows.is_empty() {
        out.push_str("## Normalization Diagnostics\n\n");
        out.push_str(&format!(
            "{} row(s) were dropped during normalization.\n\n",
            report.dropped_rows.len()
        ));
        out.push_str("| Schema | Row | Reason |\n|---|---|---|\n");
        for drop in report.dropped_rows.iter().take(20) {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                drop.schema, drop.index, drop.reason
            ));
        }
        out.push('\n');
    }

    out
}

fn render_section(out: &mut String, section: &Section) {
    out.push_str(&format!("## {}\n\n", section.title));

    if let (Some(status), Some(text)) = (section.status, section.status_text.as_deref()) {
        out.push_str(&format!(
            "**Status:** {} {} - {}\n\n",
            status_marker(status),
            status.label(),
            text
        ));
    }

    for note in &section.notes {
        out.push_str(&format!("- **{}**\n", note.replacen(": ", ":** ", 1)));
    }
    if !section.notes.is_empty() {
        out.push('\n');
    }

    for table in &section.tables {
        render_table(out, table);
    }
}

fn render_table(out: &mut String, table: &Table) {
    if let Some(title) = &table.title {
        out.push_str(&format!("### {}\n\n", title));
    }
    out.push_str(&format!("| {} |\n", table.columns.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        table.columns.iter().map(|_| "---|").collect::<String>()
    ));
    for row in &table.rows {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out.push('\n');
}

/// Write the Markdown report to a file.
pub fn write_markdown(report: &Report, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    super::prepare_output_path(path)?;

    let rendered = render_markdown(report);
    let mut file = std::fs::File::create(path)?;
    file.write_all(rendered.as_bytes())?;

    info!("report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{Section, Status, Table};

    #[test]
    fn test_render_section_with_status_and_table() {
        let mut report = Report::new("demo.trace");
        let mut section = Section::new("Potential Hangs").with_status(Status::Ok, "No hangs detected");
        section.note("Total: 0");
        let mut table = Table::new(None, &["Time", "Duration (ms)"]);
        table.push_row(vec!["00:01.0".into(), "250.0".into()]);
        section.push_table(table);
        report.sections.push(section);

        let md = render_markdown(&report);
        assert!(md.contains("## Potential Hangs"));
        assert!(md.contains("OK - No hangs detected"));
        assert!(md.contains("| Time | Duration (ms) |"));
        assert!(md.contains("| 00:01.0 | 250.0 |"));
    }
}
