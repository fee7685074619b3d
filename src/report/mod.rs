//! Report construction: per-family section builders and the assembled
//! structured report.
//!
//! Every family renderer is a pure function from canonical records plus
//! thresholds to sections; no family depends on another's state. Whatever
//! data survived normalization is what gets reported — missing data never
//! changes the shape of the sections that do render.

pub mod energy;
pub mod launch;
pub mod memory;
pub mod model;
pub mod thresholds;
pub mod time_profile;

pub use energy::DeviceClass;
pub use model::{Report, Section, Status, Table};
pub use thresholds::Thresholds;

use crate::aggregator::aggregate_frames;
use crate::parser::TraceData;
use log::info;

/// Shorten long symbol and description cells for table display
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Assemble the full report from one recording's normalized data.
///
/// Absent schemas (`None`) contribute no section; present-but-empty
/// schemas render with zero counts and an OK status where one applies.
pub fn build_report(
    trace_name: &str,
    data: &TraceData,
    device: DeviceClass,
    app_filter: Option<&str>,
    t: &Thresholds,
) -> Report {
    let mut report = Report::new(trace_name);
    report.dropped_rows = data.dropped.clone();
    report.export_failures = data.export_failures.clone();

    if data.is_empty_recording() {
        info!("recording contains no usable records");
        report.no_data = true;
        let mut section = Section::new("No Data");
        section.note("No data: insufficient interaction was recorded to produce a report.");
        report.sections.push(section);
        return report;
    }

    if let Some(phases) = &data.phases {
        if !phases.is_empty() {
            report.sections.push(launch::launch_section(phases, t));
        }
    }
    if let Some(loads) = &data.library_loads {
        if !loads.is_empty() {
            report.sections.push(launch::library_section(loads, t));
        }
    }

    if let Some(samples) = &data.samples {
        if !samples.is_empty() {
            let frames = aggregate_frames(samples);
            report
                .sections
                .push(time_profile::profile_section(samples, &frames, app_filter, t));
        }
    }

    if let Some(updates) = &data.view_updates {
        if !updates.is_empty() {
            report
                .sections
                .push(time_profile::view_updates_section(updates, t));
        }
    }

    // Hangs and hitches always render when their schema is present; a zero
    // count with an OK status is a result worth stating.
    if let Some(hangs) = &data.hangs {
        report.sections.push(time_profile::hang_section(hangs, t));
    }
    if let Some(hitches) = &data.hitches {
        report.sections.push(time_profile::hitch_section(hitches, t));
    }

    if let Some(leaks) = &data.leaks {
        report.sections.push(memory::leaks_section(leaks, t));
    }
    if let Some(allocations) = &data.allocations {
        if !allocations.is_empty() {
            report
                .sections
                .push(memory::allocations_section(allocations, t));
        }
    }

    if let Some(energy_samples) = &data.energy {
        if !energy_samples.is_empty() || device == DeviceClass::Simulator {
            report
                .sections
                .push(energy::energy_section(energy_samples, device, t));
        }
    }

    info!("report assembled: {} sections", report.sections.len());
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 10), "0123456789...");
    }

    #[test]
    fn test_empty_recording_report() {
        let data = TraceData::default();
        let report = build_report("t.trace", &data, DeviceClass::Physical, None, &Thresholds::default());
        assert!(report.no_data);
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].title, "No Data");
    }
}
