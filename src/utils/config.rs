//! Configuration and constants for the pipeline.

/// Current structured-report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Separator used in collapsed-stack lines ("a;b;c 12")
pub const COLLAPSED_SEPARATOR: char = ';';

/// Prefix for per-run intermediate export directories
pub const EXPORT_DIR_PREFIX: &str = "xctrace-report";

// Flat schema names as they appear in the trace table of contents.
// Schemas absent from a given recording are a normal condition, not an error.
pub const SCHEMA_TIME_PROFILE: &str = "time-profile";
pub const SCHEMA_SWIFTUI_UPDATES: &str = "swiftui-updates";
pub const SCHEMA_POTENTIAL_HANGS: &str = "potential-hangs";
pub const SCHEMA_HITCHES: &str = "hitches";
pub const SCHEMA_LIFE_CYCLE_PERIOD: &str = "life-cycle-period";
pub const SCHEMA_DYLD_LIBRARY_LOAD: &str = "dyld-library-load";
pub const SCHEMA_ENERGY_IMPACT: &str = "energy-impact";

// Leaks and Allocations are not exposed as flat schema tables; they only
// exist as nested track/detail trees and take a different export path.
pub const TRACK_LEAKS: &str = "Leaks";
pub const DETAIL_LEAKS: &str = "Leaks";
pub const TRACK_ALLOCATIONS: &str = "Allocations";
pub const DETAIL_ALLOCATION_STATISTICS: &str = "Statistics";

/// All flat schemas the report pipeline knows how to normalize
pub const KNOWN_FLAT_SCHEMAS: &[&str] = &[
    SCHEMA_TIME_PROFILE,
    SCHEMA_SWIFTUI_UPDATES,
    SCHEMA_POTENTIAL_HANGS,
    SCHEMA_HITCHES,
    SCHEMA_LIFE_CYCLE_PERIOD,
    SCHEMA_DYLD_LIBRARY_LOAD,
    SCHEMA_ENERGY_IMPACT,
];
