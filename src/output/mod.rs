//! Output writers: Markdown report, JSON report, collapsed stacks and
//! SVG flamegraphs.

pub mod collapsed;
pub mod flamegraph;
pub mod json;
pub mod markdown;

// Re-export main functions
pub use collapsed::{collapsed_lines, write_collapsed};
pub use flamegraph::write_flamegraph;
pub use json::{read_report, write_report_json};
pub use markdown::{render_markdown, write_markdown};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate that output path is writable and create parent directories.
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }
    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            debug!("creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }
    Ok(())
}
