//! Aggregation of stack samples into frame statistics and collapsed stacks.
//!
//! This module transforms normalized stack samples into:
//! - Per-frame self/total time accounting (for ranked hot-frame tables)
//! - Collapsed stack format (for flamegraph generation)

pub mod frame_stats;
pub mod stack_builder;

// Re-export main types and functions
pub use frame_stats::{aggregate_frames, FrameStats, FrameTable};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
