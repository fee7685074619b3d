//! Trace bundle access: schema catalog discovery and data export.

pub mod export;
pub mod toc;

// Re-export main types
pub use export::{TraceExporter, TraceHandle, XctraceExporter};
pub use toc::{SchemaCatalog, SchemaDescriptor, SchemaKind};
