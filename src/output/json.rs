//! JSON report writer.
//!
//! Serializes the structured report with pretty formatting so the same
//! data that renders as Markdown can feed other tooling.

use crate::report::model::Report;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a report to a JSON file.
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report_json(report: &Report, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    super::prepare_output_path(path)?;

    let file = File::create(path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!("JSON report written to {}", path.display());
    Ok(())
}

/// Read a report back from a JSON file. Useful for validation and testing.
pub fn read_report(path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let path = path.as_ref();
    debug!("reading report from {}", path.display());

    let file = File::open(path).map_err(OutputError::WriteFailed)?;
    let report: Report = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "report loaded: version {}, {} sections",
        report.version,
        report.sections.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{Section, Status};

    #[test]
    fn test_write_and_read_report() {
        let mut report = Report::new("demo.trace");
        report
            .sections
            .push(Section::new("Memory Leaks").with_status(Status::Ok, "No memory leaks detected"));

        let file = tempfile::NamedTempFile::new().unwrap();
        write_report_json(&report, file.path()).unwrap();

        let loaded = read_report(file.path()).unwrap();
        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.trace, "demo.trace");
        assert_eq!(loaded.sections.len(), 1);
        assert_eq!(loaded.sections[0].status, Some(Status::Ok));
    }
}
