//! Numeric cut points for status classification and table sizing.
//!
//! The defaults are illustrative values, not fixed semantics; every field
//! is public and overridable, and the CLI exposes the launch and energy
//! cut points directly.

/// All tunable report parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Rows in the total-time and self-time hot frame tables
    pub top_frames: usize,
    /// Rows in the per-view update table
    pub top_views: usize,
    /// Rows in the UI framework frame table
    pub swiftui_top: usize,
    /// Slow view-update floor, microseconds
    pub slow_update_us: f64,

    /// Hang count above which the hang status escalates from warning to
    /// critical. Any hang at all is never silently OK.
    pub hang_critical_count: usize,
    /// App hitch count still classified as a warning rather than critical
    pub hitch_warning_max: usize,

    /// Launch time below this is "good", milliseconds
    pub launch_good_ms: f64,
    /// Launch time below this is "acceptable", milliseconds
    pub launch_acceptable_ms: f64,
    /// Launch time above this is called out as slow, milliseconds
    pub launch_slow_ms: f64,
    /// Library loads faster than this are noise and omitted, milliseconds
    pub library_load_floor_ms: f64,
    /// Rows in the slow-library table
    pub library_load_top: usize,

    /// Rows in each leak aggregate table
    pub leak_top: usize,
    /// Rows in the allocation category table
    pub allocation_top: usize,

    /// Mean energy impact below this is "low"
    pub energy_low_impact: f64,
    /// Mean energy impact above this is "high"
    pub energy_high_impact: f64,
    /// Per-sample impact qualifying as a high-impact period
    pub high_energy_impact: f64,
    /// Rows in the high-impact period table
    pub high_energy_top: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            top_frames: 10,
            top_views: 15,
            swiftui_top: 15,
            slow_update_us: 1_000.0,
            hang_critical_count: 3,
            hitch_warning_max: 5,
            launch_good_ms: 400.0,
            launch_acceptable_ms: 1_000.0,
            launch_slow_ms: 2_000.0,
            library_load_floor_ms: 1.0,
            library_load_top: 15,
            leak_top: 10,
            allocation_top: 15,
            energy_low_impact: 5.0,
            energy_high_impact: 10.0,
            high_energy_impact: 10.0,
            high_energy_top: 10,
        }
    }
}

impl Thresholds {
    pub fn with_top_frames(mut self, n: usize) -> Self {
        self.top_frames = n;
        self
    }

    pub fn with_launch_budget_ms(mut self, acceptable_ms: f64) -> Self {
        self.launch_acceptable_ms = acceptable_ms;
        self
    }

    pub fn with_energy_high_impact(mut self, impact: f64) -> Self {
        self.energy_high_impact = impact;
        self
    }
}
