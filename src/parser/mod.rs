//! Export parsing and record normalization.
//!
//! This module handles:
//! - Building an element tree from exported XML (with ref resolution)
//! - Flattening rows into schema-tagged raw records
//! - Normalizing each schema's rows into canonical record types
//! - Collecting per-row drop diagnostics

pub mod normalize;
pub mod raw;
pub mod records;
pub mod xml;

// Re-export main types
pub use normalize::{normalize_batch, DroppedRow, Normalized};
pub use raw::{rows_from_xml, Cell, RawFrame, RawRecord};
pub use records::{
    AllocationStat, EnergySample, FrameRef, Hang, Hitch, LeakRecord, LibraryLoad, LifecyclePhase,
    StackSample, ViewUpdate,
};

/// Everything one recording normalized into, grouped by canonical type.
///
/// `None` means the schema was absent from the trace (its section is
/// skipped); `Some` with an empty vector means the schema was present but
/// recorded no qualifying activity (its section renders with zero counts).
#[derive(Debug, Default)]
pub struct TraceData {
    pub samples: Option<Vec<StackSample>>,
    pub view_updates: Option<Vec<ViewUpdate>>,
    pub hangs: Option<Vec<Hang>>,
    pub hitches: Option<Vec<Hitch>>,
    pub phases: Option<Vec<LifecyclePhase>>,
    pub library_loads: Option<Vec<LibraryLoad>>,
    pub leaks: Option<Vec<LeakRecord>>,
    pub allocations: Option<Vec<AllocationStat>>,
    pub energy: Option<Vec<EnergySample>>,
    /// Rows dropped during normalization, across all schemas
    pub dropped: Vec<DroppedRow>,
    /// Schemas whose export failed outright. A failure here never aborts
    /// sibling schemas; it is surfaced in the report diagnostics.
    pub export_failures: Vec<String>,
}

impl TraceData {
    /// True when no schema contributed a single usable record
    pub fn is_empty_recording(&self) -> bool {
        fn none_or_empty<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().map(|v| v.is_empty()).unwrap_or(true)
        }
        none_or_empty(&self.samples)
            && none_or_empty(&self.view_updates)
            && none_or_empty(&self.hangs)
            && none_or_empty(&self.hitches)
            && none_or_empty(&self.phases)
            && none_or_empty(&self.library_loads)
            && none_or_empty(&self.leaks)
            && none_or_empty(&self.allocations)
            && none_or_empty(&self.energy)
    }
}
