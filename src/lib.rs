//! xctrace Report
//!
//! Report generation and flamegraph export for Instruments `.trace`
//! recordings.
//!
//! This crate provides the core implementation for the
//! `xctrace-report` CLI tool. A run exports each data schema the trace
//! contains through `xctrace export`, normalizes the XML into canonical
//! records, aggregates call stacks, and assembles a structured report
//! rendered as Markdown or JSON, plus collapsed stacks and SVG
//! flamegraphs for the time profile.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install xctrace-report
//! xctrace-report --help
//! ```

pub mod aggregator;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod trace;
pub mod utils;
