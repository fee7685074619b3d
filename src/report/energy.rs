//! Energy family section.
//!
//! Energy impact numbers from a simulated device reflect the host machine,
//! not the app; the section degrades to an explicit notice in that case
//! rather than printing misleading statistics.

use crate::parser::records::EnergySample;
use crate::report::model::{Section, Status, Table};
use crate::report::thresholds::Thresholds;
use std::cmp::Ordering;

/// Where the recording was taken. Supplied by the caller; the trace itself
/// does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    Physical,
    Simulator,
}

pub fn energy_section(
    samples: &[EnergySample],
    device: DeviceClass,
    t: &Thresholds,
) -> Section {
    let mut section = Section::new("Energy Usage");

    if device == DeviceClass::Simulator {
        section.note(
            "Energy statistics are not meaningful on a simulated device; \
             record on physical hardware for usable numbers.",
        );
        return section;
    }

    if samples.is_empty() {
        section.note("No energy samples recorded.");
        return section;
    }

    let n = samples.len() as f64;
    let mean = |f: fn(&EnergySample) -> f64| samples.iter().map(f).sum::<f64>() / n;
    let max = |f: fn(&EnergySample) -> f64| {
        samples
            .iter()
            .map(f)
            .fold(f64::NEG_INFINITY, f64::max)
    };

    let mean_impact = mean(|s| s.energy_impact);
    section.note(format!(
        "Energy Impact: {:.1} (max: {:.1})",
        mean_impact,
        max(|s| s.energy_impact)
    ));
    section.note(format!(
        "CPU Usage: {:.1}% (max: {:.1}%)",
        mean(|s| s.cpu_pct),
        max(|s| s.cpu_pct)
    ));
    section.note(format!(
        "GPU Usage: {:.1}% (max: {:.1}%)",
        mean(|s| s.gpu_pct),
        max(|s| s.gpu_pct)
    ));

    let mut section = if mean_impact < t.energy_low_impact {
        section.with_status(Status::Ok, "Low - good energy efficiency")
    } else if mean_impact < t.energy_high_impact {
        section.with_status(Status::Warning, "Moderate - some optimization may help")
    } else {
        section.with_status(Status::Critical, "High - significant energy drain")
    };

    let mut high: Vec<&EnergySample> = samples
        .iter()
        .filter(|s| s.energy_impact >= t.high_energy_impact)
        .collect();
    high.sort_by(|a, b| {
        b.energy_impact
            .partial_cmp(&a.energy_impact)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.time.cmp(&b.time))
    });
    high.truncate(t.high_energy_top);

    if !high.is_empty() {
        let mut table = Table::new(
            Some("High Energy Impact Periods"),
            &["Time", "Energy Impact", "CPU", "GPU"],
        );
        for sample in high {
            table.push_row(vec![
                sample.time.clone(),
                format!("{:.1}", sample.energy_impact),
                format!("{:.1}%", sample.cpu_pct),
                format!("{:.1}%", sample.gpu_pct),
            ]);
        }
        section.push_table(table);
    }

    section
}
