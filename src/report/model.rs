//! Structured report model.
//!
//! Every template family renders into the same shape: named sections
//! holding note lines and tables. The model is what gets serialized to
//! JSON and what the Markdown renderer walks; family builders never write
//! text formats directly.

use crate::parser::normalize::DroppedRow;
use serde::{Deserialize, Serialize};

/// Threshold-based classification attached to a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }
}

/// A named table of string cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: Option<&str>, columns: &[&str]) -> Self {
        Self {
            title: title.map(str::to_owned),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One logical report section for a template family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Key-value style note lines rendered before the tables
    pub notes: Vec<String>,
    pub tables: Vec<Table>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: None,
            status_text: None,
            notes: Vec::new(),
            tables: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: Status, text: impl Into<String>) -> Self {
        self.status = Some(status);
        self.status_text = Some(text.into());
        self
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.notes.push(line.into());
    }

    pub fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }
}

/// The full structured report for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version for compatibility checking
    pub version: String,

    /// Trace bundle this report was produced from
    pub trace: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// True when no schema contributed any usable record
    pub no_data: bool,

    pub sections: Vec<Section>,

    /// Rows dropped during normalization, retained for diagnostics
    pub dropped_rows: Vec<DroppedRow>,

    /// Schemas whose export failed outright; their sections are missing
    pub export_failures: Vec<String>,
}

impl Report {
    pub fn new(trace: impl Into<String>) -> Self {
        Self {
            version: crate::utils::config::REPORT_VERSION.to_string(),
            trace: trace.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            no_data: false,
            sections: Vec::new(),
            dropped_rows: Vec::new(),
            export_failures: Vec::new(),
        }
    }
}
