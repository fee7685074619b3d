//! Canonical record types produced by normalization.
//!
//! Every schema's raw rows map into exactly one of these types. They are
//! immutable once constructed and live only for the duration of a pipeline
//! run; the report layer consumes them read-only.

/// Identity of a stack frame for aggregation purposes.
///
/// Two frames with the same (symbol, binary) pair are the same aggregation
/// bucket regardless of stack depth or sample. Unresolved symbols pass
/// through as opaque strings; the pipeline never resolves symbols itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameRef {
    pub symbol: String,
    /// Owning binary/library name, empty when the export had none
    pub binary: String,
}

impl FrameRef {
    pub fn new(symbol: impl Into<String>, binary: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            binary: binary.into(),
        }
    }
}

/// One weighted call-stack sample, frames ordered root-to-leaf
#[derive(Debug, Clone, PartialEq)]
pub struct StackSample {
    /// Offset into the recording, milliseconds
    pub timestamp_ms: f64,
    /// Time contribution of this sample, milliseconds. Commonly uniform
    /// across a recording's sampling interval but not required to be.
    pub weight_ms: f64,
    pub frames: Vec<FrameRef>,
}

impl StackSample {
    /// Leaf frame (actively executing), if the sample has any frames
    pub fn leaf(&self) -> Option<&FrameRef> {
        self.frames.last()
    }
}

/// A single view body update (SwiftUI instrument)
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub start: String,
    pub duration_us: f64,
    pub description: String,
    /// Update / Layout / Render, when the export carried one
    pub category: String,
    pub severity: String,
    /// View type recovered from the update description, empty if unknown
    pub view_name: String,
}

/// A detected hang
#[derive(Debug, Clone, PartialEq)]
pub struct Hang {
    pub start: String,
    pub duration_ms: f64,
    pub hang_type: String,
    pub thread: String,
}

/// A detected animation hitch
#[derive(Debug, Clone, PartialEq)]
pub struct Hitch {
    pub start: String,
    pub duration_ms: f64,
    /// Hitches attributed to system processes are reported separately
    pub is_system: bool,
    pub description: String,
}

/// One phase of the app-launch life cycle
#[derive(Debug, Clone, PartialEq)]
pub struct LifecyclePhase {
    pub name: String,
    pub start_offset_ms: f64,
    pub duration_ms: f64,
    pub narrative: String,
}

/// A dynamic library load during launch
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryLoad {
    pub name: String,
    pub path: String,
    pub duration_ms: f64,
    pub start: String,
}

/// A single leaked allocation
#[derive(Debug, Clone, PartialEq)]
pub struct LeakRecord {
    pub address: String,
    pub size_bytes: u64,
    pub responsible_frame: FrameRef,
    /// Library the responsible frame belongs to
    pub library: String,
}

/// Per-category allocation statistics.
///
/// The allocations track exposes category aggregates rather than individual
/// allocation events; persistent bytes are what is still live at the end of
/// the recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationStat {
    pub category: String,
    pub persistent_bytes: u64,
    pub persistent_count: u64,
    pub total_bytes: u64,
    pub total_count: u64,
}

/// One energy sample over the recording window
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySample {
    pub time: String,
    pub timestamp_ms: f64,
    pub energy_impact: f64,
    pub cpu_pct: f64,
    pub gpu_pct: f64,
}
