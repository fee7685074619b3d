//! Time Profiler / SwiftUI family sections.
//!
//! Hot-frame tables come from the aggregated frame table; view updates,
//! hangs and hitches render their own sections. Every builder here is a
//! pure function from canonical records plus thresholds to a section.

use crate::aggregator::{FrameStats, FrameTable};
use crate::parser::records::{FrameRef, Hang, Hitch, StackSample, ViewUpdate};
use crate::report::model::{Section, Status, Table};
use crate::report::thresholds::Thresholds;
use crate::report::truncate;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Summary plus ranked hot-frame tables.
pub fn profile_section(
    samples: &[StackSample],
    frames: &FrameTable,
    app_filter: Option<&str>,
    t: &Thresholds,
) -> Section {
    let mut section = Section::new("Time Profile");

    let total_ms: f64 = samples.iter().map(|s| s.weight_ms).sum();
    section.note(format!("Total Samples: {}", samples.len()));
    section.note(format!("Total Time: {:.2} ms", total_ms));

    section.push_table(frame_table(
        &format!("Hot Frames - Total Time (Top {})", t.top_frames),
        &frames.top_by_total(t.top_frames, None),
        |s| s.total_ms,
    ));
    section.push_table(frame_table(
        &format!("Hot Frames - Self Time (Top {})", t.top_frames),
        &frames.top_by_self(t.top_frames, None),
        |s| s.self_ms,
    ));

    let ui_frames = swiftui_frames(frames, t.swiftui_top);
    if !ui_frames.is_empty() {
        section.push_table(frame_table(
            "SwiftUI / AttributeGraph Frames",
            &ui_frames,
            |s| s.total_ms,
        ));
    }

    if let Some(app) = app_filter {
        let app_frames = frames.top_by_total(t.top_frames, Some(app));
        if !app_frames.is_empty() {
            section.push_table(frame_table(
                &format!("App Code ({})", app),
                &app_frames,
                |s| s.total_ms,
            ));
        }
    }

    section
}

/// Symbol keywords marking UI framework work
const UI_FRAME_KEYWORDS: &[&str] = &[
    "SwiftUI",
    "AG::",
    "View",
    "Layout",
    "DisplayList",
    "Attribute",
];

fn is_ui_frame(frame: &FrameRef) -> bool {
    UI_FRAME_KEYWORDS.iter().any(|kw| frame.symbol.contains(kw))
        || frame.binary.contains("SwiftUI")
}

/// UI framework frames drawn from the hottest total-time frames. Filtering
/// happens after aggregation, over the full totals, like the app filter.
fn swiftui_frames(frames: &FrameTable, n: usize) -> Vec<FrameStats> {
    let mut out: Vec<FrameStats> = frames
        .top_by_total(100, None)
        .into_iter()
        .filter(|s| is_ui_frame(&s.frame))
        .collect();
    out.truncate(n);
    out
}

fn frame_table(title: &str, stats: &[FrameStats], metric: impl Fn(&FrameStats) -> f64) -> Table {
    let mut table = Table::new(
        Some(title),
        &["Rank", "Function", "Samples", "Time (ms)", "Binary"],
    );
    for (rank, stat) in stats.iter().enumerate() {
        table.push_row(vec![
            (rank + 1).to_string(),
            truncate(&stat.frame.symbol, 60),
            stat.samples.to_string(),
            format!("{:.2}", metric(stat)),
            if stat.frame.binary.is_empty() {
                "-".to_string()
            } else {
                truncate(&stat.frame.binary, 20)
            },
        ]);
    }
    table
}

/// Per-view update statistics plus the slow-update list.
pub fn view_updates_section(updates: &[ViewUpdate], t: &Thresholds) -> Section {
    let mut section = Section::new("SwiftUI View Body Updates");
    section.note(format!("Total Updates: {}", updates.len()));

    // (count, total_us) grouped by view name
    let mut by_view: HashMap<&str, (u64, f64)> = HashMap::new();
    for update in updates {
        if update.view_name.is_empty() {
            continue;
        }
        let entry = by_view.entry(&update.view_name).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += update.duration_us;
    }

    let mut view_stats: Vec<(&str, u64, f64)> = by_view
        .into_iter()
        .map(|(name, (count, total))| (name, count, total))
        .collect();
    view_stats.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    view_stats.truncate(t.top_views);

    if !view_stats.is_empty() {
        let mut table = Table::new(
            Some("View Body Statistics"),
            &["View", "Count", "Avg (µs)", "Total (µs)"],
        );
        for (name, count, total) in &view_stats {
            table.push_row(vec![
                name.to_string(),
                count.to_string(),
                format!("{:.1}", total / *count as f64),
                format!("{:.1}", total),
            ]);
        }
        section.push_table(table);
    }

    let slow: Vec<&ViewUpdate> = updates
        .iter()
        .filter(|u| u.duration_us >= t.slow_update_us)
        .collect();
    if !slow.is_empty() {
        let mut table = Table::new(
            Some(&format!("Slow Updates (>{:.0} µs)", t.slow_update_us)),
            &["Time", "Duration (µs)", "Description", "Severity"],
        );
        for update in slow.iter().take(t.top_views) {
            table.push_row(vec![
                update.start.clone(),
                format!("{:.1}", update.duration_us),
                truncate(&update.description, 50),
                update.severity.clone(),
            ]);
        }
        section.push_table(table);
    }

    section
}

/// Hang counts with status. A recording with any hang is never OK.
pub fn hang_section(hangs: &[Hang], t: &Thresholds) -> Section {
    let mut section = Section::new("Potential Hangs");
    section.note(format!("Total: {}", hangs.len()));

    if hangs.is_empty() {
        return section.with_status(Status::Ok, "No hangs detected");
    }

    let status = if hangs.len() > t.hang_critical_count {
        Status::Critical
    } else {
        Status::Warning
    };
    let mut section =
        section.with_status(status, format!("{} hang(s) detected", hangs.len()));

    let mut table = Table::new(None, &["Time", "Duration (ms)", "Type", "Thread"]);
    for hang in hangs.iter().take(10) {
        table.push_row(vec![
            hang.start.clone(),
            format!("{:.1}", hang.duration_ms),
            hang.hang_type.clone(),
            truncate(&hang.thread, 30),
        ]);
    }
    section.push_table(table);
    section
}

/// Hitch counts with status; system hitches are counted but not blamed.
pub fn hitch_section(hitches: &[Hitch], t: &Thresholds) -> Section {
    let mut section = Section::new("Animation Hitches");

    let app_hitches: Vec<&Hitch> = hitches.iter().filter(|h| !h.is_system).collect();
    let system_count = hitches.len() - app_hitches.len();
    section.note(format!(
        "Total: {} (App: {}, System: {})",
        hitches.len(),
        app_hitches.len(),
        system_count
    ));

    let mut section = if app_hitches.is_empty() {
        section.with_status(Status::Ok, "No app hitches")
    } else if app_hitches.len() <= t.hitch_warning_max {
        section.with_status(Status::Warning, "Minor hitching")
    } else {
        section.with_status(
            Status::Critical,
            format!("{} app hitches detected", app_hitches.len()),
        )
    };

    if !app_hitches.is_empty() {
        let mut table = Table::new(Some("App Hitches"), &["Time", "Duration (ms)", "Description"]);
        for hitch in app_hitches.iter().take(10) {
            table.push_row(vec![
                hitch.start.clone(),
                format!("{:.1}", hitch.duration_ms),
                truncate(&hitch.description, 40),
            ]);
        }
        section.push_table(table);
    }

    section
}
