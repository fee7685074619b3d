//! App Launch family sections: lifecycle phases and library loading.

use crate::parser::records::{LibraryLoad, LifecyclePhase};
use crate::report::model::{Section, Status, Table};
use crate::report::thresholds::Thresholds;
use crate::report::truncate;
use std::cmp::Ordering;

/// Lifecycle phase breakdown with launch-time classification.
///
/// The reported total is always the sum of the phase durations; any
/// externally stated launch total is ignored so percentages add to 100.
pub fn launch_section(phases: &[LifecyclePhase], t: &Thresholds) -> Section {
    let mut section = Section::new("App Launch - Life Cycle Phases");

    let mut ordered: Vec<&LifecyclePhase> = phases.iter().collect();
    ordered.sort_by(|a, b| {
        a.start_offset_ms
            .partial_cmp(&b.start_offset_ms)
            .unwrap_or(Ordering::Equal)
    });

    let total_ms: f64 = ordered.iter().map(|p| p.duration_ms).sum();
    section.note(format!(
        "Total Launch Time: {:.2} ms ({:.2} s)",
        total_ms,
        total_ms / 1_000.0
    ));

    let mut table = Table::new(None, &["Phase", "Duration (ms)", "%", "Description"]);
    for phase in &ordered {
        let pct = if total_ms > 0.0 {
            phase.duration_ms / total_ms * 100.0
        } else {
            0.0
        };
        table.push_row(vec![
            phase.name.clone(),
            format!("{:.2}", phase.duration_ms),
            format!("{:.1}%", pct),
            truncate(&phase.narrative, 50),
        ]);
    }
    section.push_table(table);

    let section = if total_ms < t.launch_good_ms {
        section.with_status(
            Status::Ok,
            format!("Excellent - launches in under {:.0} ms", t.launch_good_ms),
        )
    } else if total_ms < t.launch_acceptable_ms {
        section.with_status(
            Status::Ok,
            format!("Good - launches in under {:.0} ms", t.launch_acceptable_ms),
        )
    } else if total_ms < t.launch_slow_ms {
        section.with_status(Status::Warning, "Acceptable - consider optimizing launch")
    } else {
        section.with_status(
            Status::Critical,
            format!("Slow - launch time {:.2} s needs optimization", total_ms / 1_000.0),
        )
    };

    section
}

/// Library loads ranked by duration, floored to suppress near-zero noise.
pub fn library_section(loads: &[LibraryLoad], t: &Thresholds) -> Section {
    let mut section = Section::new("App Launch - Library Loading");

    let total_ms: f64 = loads.iter().map(|l| l.duration_ms).sum();
    section.note(format!("Total Libraries: {}", loads.len()));
    section.note(format!("Total Load Time: {:.2} ms", total_ms));

    let mut slow: Vec<&LibraryLoad> = loads
        .iter()
        .filter(|l| l.duration_ms > t.library_load_floor_ms)
        .collect();
    slow.sort_by(|a, b| {
        b.duration_ms
            .partial_cmp(&a.duration_ms)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    slow.truncate(t.library_load_top);

    if !slow.is_empty() {
        let mut table = Table::new(
            Some(&format!(
                "Slowest Libraries (>{:.0} ms)",
                t.library_load_floor_ms
            )),
            &["Library", "Duration (ms)"],
        );
        for load in slow {
            table.push_row(vec![load.name.clone(), format!("{:.2}", load.duration_ms)]);
        }
        section.push_table(table);
    }

    section
}
