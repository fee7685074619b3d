//! Per-schema normalization of raw records into canonical types.
//!
//! Each mapping is a pure function from one [`RawRecord`] to one canonical
//! record, or a drop reason. A dropped row never aborts its batch; partial
//! symbolication or partially populated rows must not abort the run. Drops
//! are collected as [`DroppedRow`] diagnostics and surfaced in the report.
//!
//! Unit handling follows the export dialect: durations are integer
//! nanoseconds in element text with formatted-string fallbacks ("2.00 ms",
//! "1.2 s", "500 µs"), weights are formatted milliseconds, sizes are byte
//! counts with "1.5 MB"-style fallbacks, percentages are "42%" strings.

use crate::parser::raw::{Cell, RawRecord};
use crate::parser::records::{
    AllocationStat, EnergySample, FrameRef, Hang, Hitch, LeakRecord, LibraryLoad, LifecyclePhase,
    StackSample, ViewUpdate,
};
use log::warn;
use serde::{Deserialize, Serialize};

/// A row that failed normalization, with its origin retained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    pub schema: String,
    pub index: usize,
    pub reason: String,
}

/// Result of normalizing one schema's full row set
#[derive(Debug, Default)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub dropped: Vec<DroppedRow>,
}

/// Run a row mapping over a batch, collecting drops instead of failing.
pub fn normalize_batch<T>(
    rows: &[RawRecord],
    map: impl Fn(&RawRecord) -> Result<T, String>,
) -> Normalized<T> {
    let mut out = Normalized {
        records: Vec::with_capacity(rows.len()),
        dropped: Vec::new(),
    };
    for row in rows {
        match map(row) {
            Ok(record) => out.records.push(record),
            Err(reason) => {
                warn!("{} row {} dropped: {}", row.schema, row.index, reason);
                out.dropped.push(DroppedRow {
                    schema: row.schema.clone(),
                    index: row.index,
                    reason,
                });
            }
        }
    }
    out
}

/// Time-profile row -> stack sample.
///
/// Backtraces arrive leaf-first and are reversed to root-to-leaf here.
/// Frames whose symbol is a bare address pass through symbolication
/// unresolved and are skipped; a row with no usable frame is dropped.
pub fn stack_sample(row: &RawRecord) -> Result<StackSample, String> {
    let cell = row
        .cell("backtrace")
        .ok_or_else(|| "missing backtrace".to_string())?;

    let mut frames: Vec<FrameRef> = cell
        .frames
        .iter()
        .filter(|f| !f.symbol.starts_with("0x"))
        .map(|f| FrameRef::new(f.symbol.clone(), f.binary.clone().unwrap_or_default()))
        .collect();
    frames.reverse();

    if frames.is_empty() {
        return Err("no resolvable frames".to_string());
    }

    Ok(StackSample {
        timestamp_ms: row.cell("sample-time").map(ns_to_ms).unwrap_or(0.0),
        weight_ms: row.cell("weight").map(weight_ms).unwrap_or(1.0),
        frames,
    })
}

/// View-update row. Rows without a description carry nothing usable.
pub fn view_update(row: &RawRecord) -> Result<ViewUpdate, String> {
    let mut description = String::new();
    let mut category = String::new();
    for cell in row.cells_named("string") {
        let fmt = cell.fmt.as_deref().unwrap_or("");
        if matches!(fmt, "Update" | "Layout" | "Render") {
            category = fmt.to_string();
        } else if description.is_empty() && !fmt.is_empty() {
            description = fmt.to_string();
        }
    }
    if description.is_empty() {
        return Err("missing description".to_string());
    }

    Ok(ViewUpdate {
        start: display(row.cell("start-time")),
        duration_us: row.cell("duration").map(ns_to_ms).unwrap_or(0.0) * 1_000.0,
        view_name: extract_view_name(&description),
        severity: display(row.cell("event-concept")),
        category,
        description,
    })
}

/// Recover the view type from a `ViewBodyAccessor<...>` description.
fn extract_view_name(description: &str) -> String {
    const MARKER: &str = "ViewBodyAccessor<";
    if let Some(start) = description.find(MARKER) {
        let rest = &description[start + MARKER.len()..];
        if let Some(end) = rest.find('>') {
            return rest[..end].to_string();
        }
    }
    String::new()
}

pub fn hang(row: &RawRecord) -> Result<Hang, String> {
    let duration = row
        .cell("duration")
        .ok_or_else(|| "missing duration".to_string())?;
    Ok(Hang {
        start: display(row.cell("start-time")),
        duration_ms: ns_to_ms(duration),
        hang_type: display(row.cell("hang-type")),
        thread: display(row.cell("thread")),
    })
}

pub fn hitch(row: &RawRecord) -> Result<Hitch, String> {
    let duration = row
        .cell("duration")
        .ok_or_else(|| "missing duration".to_string())?;
    let is_system = row
        .cell("boolean")
        .and_then(|c| c.fmt.as_deref())
        .map(|f| f.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let description = row
        .cells_named("string")
        .filter_map(|c| c.fmt.as_deref())
        .find(|f| f.contains("Potential"))
        .unwrap_or_default()
        .to_string();

    Ok(Hitch {
        start: display(row.cell("start-time")),
        duration_ms: ns_to_ms(duration),
        is_system,
        description,
    })
}

pub fn lifecycle_phase(row: &RawRecord) -> Result<LifecyclePhase, String> {
    let name = row
        .cell("app-period")
        .map(display_cell)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing app-period".to_string())?;

    Ok(LifecyclePhase {
        name,
        start_offset_ms: row.cell("start-time").map(ns_to_ms).unwrap_or(0.0),
        duration_ms: row.cell("duration").map(ns_to_ms).unwrap_or(0.0),
        narrative: display(row.cell("narrative-text")),
    })
}

pub fn library_load(row: &RawRecord) -> Result<LibraryLoad, String> {
    let mut path = display(row.cell("file-path"));
    if path.is_empty() {
        // Older exports carry the path only as a plain string column.
        path = row
            .cells_named("string")
            .filter_map(|c| c.fmt.as_deref())
            .find(|f| f.contains('/') || f.contains(".dylib") || f.contains(".framework"))
            .unwrap_or_default()
            .to_string();
    }
    let name = path.rsplit('/').next().unwrap_or_default().to_string();
    if name.is_empty() {
        return Err("missing library path".to_string());
    }

    Ok(LibraryLoad {
        name,
        path,
        duration_ms: row.cell("duration").map(ns_to_ms).unwrap_or(0.0),
        start: display(row.cell("start-time")),
    })
}

pub fn leak(row: &RawRecord) -> Result<LeakRecord, String> {
    let address = row
        .cell("address")
        .map(display_cell)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing address".to_string())?;

    let symbol = row
        .cell("symbol")
        .map(|c| c.name.clone().or_else(|| c.fmt.clone()).unwrap_or_default())
        .unwrap_or_default();
    let library = row
        .cell("binary")
        .map(|c| c.name.clone().or_else(|| c.fmt.clone()).unwrap_or_default())
        .unwrap_or_default();

    Ok(LeakRecord {
        address,
        size_bytes: row.cell("size").map(bytes_value).unwrap_or(0),
        responsible_frame: FrameRef::new(symbol, library.clone()),
        library,
    })
}

pub fn allocation_stat(row: &RawRecord) -> Result<AllocationStat, String> {
    let category = row
        .cell("category")
        .map(display_cell)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing category".to_string())?;

    Ok(AllocationStat {
        category,
        persistent_bytes: row.cell("persistent-bytes").map(bytes_value).unwrap_or(0),
        persistent_count: row.cell("persistent-count").map(int_value).unwrap_or(0),
        total_bytes: row.cell("total-bytes").map(bytes_value).unwrap_or(0),
        total_count: row.cell("total-count").map(int_value).unwrap_or(0),
    })
}

pub fn energy_sample(row: &RawRecord) -> Result<EnergySample, String> {
    let impact = row
        .cell("energy-impact")
        .ok_or_else(|| "missing energy-impact".to_string())?;

    Ok(EnergySample {
        time: display(row.cell("sample-time")),
        timestamp_ms: row.cell("sample-time").map(ns_to_ms).unwrap_or(0.0),
        energy_impact: float_value(impact),
        cpu_pct: row.cell("cpu-usage").map(percent_value).unwrap_or(0.0),
        gpu_pct: row.cell("gpu-usage").map(percent_value).unwrap_or(0.0),
    })
}

// ---- cell value helpers ----

fn display(cell: Option<&Cell>) -> String {
    cell.map(display_cell).unwrap_or_default()
}

fn display_cell(cell: &Cell) -> String {
    cell.fmt
        .clone()
        .or_else(|| cell.text.clone())
        .unwrap_or_default()
}

/// Integer-nanosecond text, falling back to formatted duration strings.
fn ns_to_ms(cell: &Cell) -> f64 {
    if let Some(ns) = cell.text.as_deref().and_then(|t| t.parse::<i64>().ok()) {
        return ns as f64 / 1_000_000.0;
    }
    cell.fmt.as_deref().map(fmt_duration_ms).unwrap_or(0.0)
}

/// Parse "2.00 ms" / "1.2 s" / "500 µs" into milliseconds.
fn fmt_duration_ms(fmt: &str) -> f64 {
    let cleaned = fmt.replace(',', "");
    let parse = |suffix: &str, scale: f64| {
        cleaned
            .strip_suffix(suffix)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(|v| v * scale)
    };
    parse("ms", 1.0)
        .or_else(|| parse("µs", 0.001))
        .or_else(|| parse("us", 0.001))
        .or_else(|| parse("s", 1_000.0))
        .unwrap_or(0.0)
}

/// Sample weights arrive as formatted milliseconds ("1 ms").
fn weight_ms(cell: &Cell) -> f64 {
    let parsed = cell.fmt.as_deref().map(fmt_duration_ms).unwrap_or(0.0);
    if parsed > 0.0 {
        parsed
    } else {
        1.0
    }
}

/// Integer byte text, falling back to "1.50 MB"-style formatted sizes.
fn bytes_value(cell: &Cell) -> u64 {
    if let Some(n) = cell.text.as_deref().and_then(|t| t.parse::<u64>().ok()) {
        return n;
    }
    let fmt = match cell.fmt.as_deref() {
        Some(f) => f.to_ascii_lowercase().replace(',', ""),
        None => return 0,
    };
    let mut parts = fmt.split_whitespace();
    let value: f64 = match parts.next().and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => return 0,
    };
    let multiplier = match parts.next() {
        Some("kb") => 1024.0,
        Some("mb") => 1024.0 * 1024.0,
        Some("gb") => 1024.0 * 1024.0 * 1024.0,
        _ => 1.0,
    };
    (value * multiplier) as u64
}

fn int_value(cell: &Cell) -> u64 {
    cell.text
        .as_deref()
        .or(cell.fmt.as_deref())
        .map(|t| t.replace(',', ""))
        .and_then(|t| t.parse::<u64>().ok())
        .unwrap_or(0)
}

fn float_value(cell: &Cell) -> f64 {
    cell.fmt
        .as_deref()
        .or(cell.text.as_deref())
        .map(|t| t.replace(',', ""))
        .and_then(|t| t.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn percent_value(cell: &Cell) -> f64 {
    cell.fmt
        .as_deref()
        .or(cell.text.as_deref())
        .map(|t| t.replace('%', ""))
        .and_then(|t| t.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(column: &str, fmt: Option<&str>, text: Option<&str>) -> Cell {
        Cell {
            column: column.to_string(),
            fmt: fmt.map(str::to_owned),
            text: text.map(str::to_owned),
            ..Cell::default()
        }
    }

    #[test]
    fn test_fmt_duration_units() {
        assert_eq!(fmt_duration_ms("2.50 ms"), 2.5);
        assert_eq!(fmt_duration_ms("1.2 s"), 1200.0);
        assert_eq!(fmt_duration_ms("500 µs"), 0.5);
        assert_eq!(fmt_duration_ms("garbage"), 0.0);
    }

    #[test]
    fn test_ns_text_preferred_over_fmt() {
        let c = cell("duration", Some("9 ms"), Some("2000000"));
        assert_eq!(ns_to_ms(&c), 2.0);
    }

    #[test]
    fn test_bytes_fmt_fallback() {
        assert_eq!(bytes_value(&cell("size", None, Some("4096"))), 4096);
        assert_eq!(
            bytes_value(&cell("size", Some("1.50 MB"), None)),
            (1.5 * 1024.0 * 1024.0) as u64
        );
        assert_eq!(bytes_value(&cell("size", Some("2 KB"), None)), 2048);
    }

    #[test]
    fn test_extract_view_name() {
        let desc = "ViewBodyAccessor<ContentView> update";
        assert_eq!(extract_view_name(desc), "ContentView");
        assert_eq!(extract_view_name("no accessor here"), "");
    }

    #[test]
    fn test_weight_defaults_to_one_ms() {
        assert_eq!(weight_ms(&cell("weight", None, None)), 1.0);
        assert_eq!(weight_ms(&cell("weight", Some("3 ms"), None)), 3.0);
    }
}
