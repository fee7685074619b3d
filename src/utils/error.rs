//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs.
//!
//! Two conditions are deliberately *not* errors: a schema absent from a
//! trace surfaces as `Ok(None)` from the export adapter, and a row that
//! fails normalization becomes a [`DroppedRow`](crate::parser::DroppedRow)
//! diagnostic instead of aborting its batch.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting data out of a trace bundle
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("trace bundle not found: {0}")]
    TraceNotFound(PathBuf),

    #[error("xctrace export failed: {0}")]
    ExportFailure(String),

    #[error("failed to launch export tool: {0}")]
    ToolUnavailable(#[from] std::io::Error),
}

/// Errors that can occur while reading the trace table of contents
#[derive(Error, Debug)]
pub enum TocError {
    #[error("malformed table of contents: {0}")]
    MalformedToc(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors that can occur during XML parsing of an exported schema
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("failed to render flamegraph: {0}")]
    FlamegraphFailed(String),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
