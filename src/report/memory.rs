//! Memory family sections: leaks and allocation statistics.

use crate::parser::records::{AllocationStat, LeakRecord};
use crate::report::model::{Section, Status, Table};
use crate::report::thresholds::Thresholds;
use crate::report::truncate;
use std::collections::HashMap;

/// Leak report: any leak at all flips the status.
pub fn leaks_section(leaks: &[LeakRecord], t: &Thresholds) -> Section {
    let mut section = Section::new("Memory Leaks");

    if leaks.is_empty() {
        return section.with_status(Status::Ok, "No memory leaks detected");
    }

    let total_bytes: u64 = leaks.iter().map(|l| l.size_bytes).sum();
    section.note(format!("Total Leaks: {}", leaks.len()));
    section.note(format!(
        "Total Leaked Memory: {:.2} KB ({} bytes)",
        total_bytes as f64 / 1024.0,
        total_bytes
    ));
    let mut section = section.with_status(Status::Critical, "Leaks detected");

    section.push_table(grouped_table(
        "Leaks by Library",
        "Library",
        leaks.iter().filter_map(|l| {
            (!l.library.is_empty()).then(|| (l.library.as_str(), l.size_bytes))
        }),
        t.leak_top,
    ));

    section.push_table(grouped_table(
        "Leaks by Responsible Frame",
        "Function",
        leaks.iter().filter_map(|l| {
            (!l.responsible_frame.symbol.is_empty())
                .then(|| (l.responsible_frame.symbol.as_str(), l.size_bytes))
        }),
        t.leak_top,
    ));

    let mut largest: Vec<&LeakRecord> = leaks.iter().collect();
    largest.sort_by(|a, b| {
        b.size_bytes
            .cmp(&a.size_bytes)
            .then_with(|| a.address.cmp(&b.address))
    });
    let mut table = Table::new(
        Some("Largest Leaks"),
        &["Address", "Size (bytes)", "Responsible Frame"],
    );
    for leak in largest.iter().take(t.leak_top) {
        table.push_row(vec![
            leak.address.clone(),
            leak.size_bytes.to_string(),
            truncate(&leak.responsible_frame.symbol, 40),
        ]);
    }
    section.push_table(table);

    section
}

/// Aggregate (count, bytes) by key, sorted descending by bytes.
fn grouped_table<'a>(
    title: &str,
    key_column: &str,
    items: impl Iterator<Item = (&'a str, u64)>,
    top_n: usize,
) -> Table {
    let mut grouped: HashMap<&str, (u64, u64)> = HashMap::new();
    for (key, bytes) in items {
        let entry = grouped.entry(key).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += bytes;
    }

    let mut rows: Vec<(&str, u64, u64)> = grouped
        .into_iter()
        .map(|(key, (count, bytes))| (key, count, bytes))
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));
    rows.truncate(top_n);

    let mut table = Table::new(Some(title), &[key_column, "Count", "Bytes"]);
    for (key, count, bytes) in rows {
        table.push_row(vec![
            truncate(key, 60),
            count.to_string(),
            bytes.to_string(),
        ]);
    }
    table
}

/// Allocation category statistics, ranked by persistent footprint.
pub fn allocations_section(stats: &[AllocationStat], t: &Thresholds) -> Section {
    let mut section = Section::new("Memory Allocations");

    let persistent: u64 = stats.iter().map(|s| s.persistent_bytes).sum();
    let total: u64 = stats.iter().map(|s| s.total_bytes).sum();
    section.note(format!("Persistent Memory: {:.2} MB", mb(persistent)));
    section.note(format!("Total Allocated: {:.2} MB", mb(total)));

    let mut ranked: Vec<&AllocationStat> = stats.iter().collect();
    ranked.sort_by(|a, b| {
        b.persistent_bytes
            .cmp(&a.persistent_bytes)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked.truncate(t.allocation_top);

    let mut table = Table::new(
        Some("Top Categories by Persistent Memory"),
        &["Category", "Persistent (MB)", "Count", "Total (MB)"],
    );
    for stat in ranked {
        table.push_row(vec![
            truncate(&stat.category, 50),
            format!("{:.2}", mb(stat.persistent_bytes)),
            stat.persistent_count.to_string(),
            format!("{:.2}", mb(stat.total_bytes)),
        ]);
    }
    section.push_table(table);

    section
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
