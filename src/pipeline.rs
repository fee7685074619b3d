//! End-to-end pipeline: catalog discovery, per-schema export,
//! normalization, aggregation and report assembly.
//!
//! All state for one run lives in an explicit [`RunContext`]; there is no
//! process-wide state, so concurrent runs only share the filesystem, and
//! the exporter already keeps those paths disjoint per run.

use crate::aggregator::{build_collapsed_stacks, CollapsedStack};
use crate::parser::{self, normalize, TraceData};
use crate::report::{build_report, DeviceClass, Report, Thresholds};
use crate::trace::{SchemaCatalog, SchemaKind, TraceExporter, TraceHandle};
use crate::utils::config::{
    DETAIL_ALLOCATION_STATISTICS, DETAIL_LEAKS, KNOWN_FLAT_SCHEMAS, SCHEMA_DYLD_LIBRARY_LOAD,
    SCHEMA_ENERGY_IMPACT, SCHEMA_HITCHES, SCHEMA_LIFE_CYCLE_PERIOD, SCHEMA_POTENTIAL_HANGS,
    SCHEMA_SWIFTUI_UPDATES, SCHEMA_TIME_PROFILE, TRACK_ALLOCATIONS, TRACK_LEAKS,
};
use crate::utils::error::TocError;
use log::{debug, error, info};

/// Everything one report run needs, threaded through all stages
#[derive(Debug)]
pub struct RunContext {
    pub trace: TraceHandle,
    pub device: DeviceClass,
    /// App binary name for the app-only hot-frame table
    pub app_filter: Option<String>,
    pub thresholds: Thresholds,
}

/// Discover the catalog and pull every known schema out of the trace.
///
/// A failing export is fatal for its own schema only: it is logged,
/// recorded in `export_failures`, and its siblings still export.
pub fn collect_trace_data(
    exporter: &dyn TraceExporter,
    ctx: &RunContext,
) -> Result<TraceData, TocError> {
    let toc_xml = exporter.export_toc(&ctx.trace)?;
    let catalog = SchemaCatalog::parse(&toc_xml)?;
    info!("{} data sources in catalog", catalog.descriptors.len());
    for descriptor in &catalog.descriptors {
        if descriptor.kind == SchemaKind::Flat
            && !KNOWN_FLAT_SCHEMAS.contains(&descriptor.name.as_str())
        {
            debug!("{}: unrecognized schema, skipping", descriptor.name);
        }
    }

    let mut data = TraceData::default();

    let mut flat = |schema: &str| -> Option<Vec<parser::RawRecord>> {
        if !catalog.has_flat(schema) {
            return None;
        }
        match exporter.export_schema(&ctx.trace, schema) {
            Ok(Some(xml)) => match parser::rows_from_xml(schema, &xml) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    error!("{}: export unreadable: {}", schema, e);
                    data.export_failures.push(format!("{}: {}", schema, e));
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("{}: export failed: {}", schema, e);
                data.export_failures.push(format!("{}: {}", schema, e));
                None
            }
        }
    };

    let samples = flat(SCHEMA_TIME_PROFILE);
    let updates = flat(SCHEMA_SWIFTUI_UPDATES);
    let hangs = flat(SCHEMA_POTENTIAL_HANGS);
    let hitches = flat(SCHEMA_HITCHES);
    let phases = flat(SCHEMA_LIFE_CYCLE_PERIOD);
    let loads = flat(SCHEMA_DYLD_LIBRARY_LOAD);
    let energy = flat(SCHEMA_ENERGY_IMPACT);

    let mut tracked = |track: &str, detail: &str| -> Option<Vec<parser::RawRecord>> {
        let descriptor = catalog.tracked(track, detail)?;
        match exporter.export_track_detail(&ctx.trace, track, detail) {
            Ok(Some(xml)) => match parser::rows_from_xml(&descriptor.name, &xml) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    error!("{}: export unreadable: {}", descriptor.name, e);
                    data.export_failures
                        .push(format!("{}: {}", descriptor.name, e));
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("{}: export failed: {}", descriptor.name, e);
                data.export_failures
                    .push(format!("{}: {}", descriptor.name, e));
                None
            }
        }
    };

    let leaks = tracked(TRACK_LEAKS, DETAIL_LEAKS);
    let allocations = tracked(TRACK_ALLOCATIONS, DETAIL_ALLOCATION_STATISTICS);

    data.samples = normalize_into(samples, normalize::stack_sample, &mut data.dropped);
    data.view_updates = normalize_into(updates, normalize::view_update, &mut data.dropped);
    data.hangs = normalize_into(hangs, normalize::hang, &mut data.dropped);
    data.hitches = normalize_into(hitches, normalize::hitch, &mut data.dropped);
    data.phases = normalize_into(phases, normalize::lifecycle_phase, &mut data.dropped);
    data.library_loads = normalize_into(loads, normalize::library_load, &mut data.dropped);
    data.leaks = normalize_into(leaks, normalize::leak, &mut data.dropped);
    data.allocations = normalize_into(allocations, normalize::allocation_stat, &mut data.dropped);
    data.energy = normalize_into(energy, normalize::energy_sample, &mut data.dropped);

    Ok(data)
}

fn normalize_into<T>(
    rows: Option<Vec<parser::RawRecord>>,
    map: impl Fn(&parser::RawRecord) -> Result<T, String>,
    dropped: &mut Vec<normalize::DroppedRow>,
) -> Option<Vec<T>> {
    rows.map(|rows| {
        let normalized = normalize::normalize_batch(&rows, map);
        dropped.extend(normalized.dropped);
        normalized.records
    })
}

/// Run the full pipeline: one trace in, one report plus collapsed stacks out.
pub fn run_report(
    exporter: &dyn TraceExporter,
    ctx: &RunContext,
) -> Result<(Report, Vec<CollapsedStack>), TocError> {
    let data = collect_trace_data(exporter, ctx)?;

    let collapsed = data
        .samples
        .as_deref()
        .map(build_collapsed_stacks)
        .unwrap_or_default();

    let report = build_report(
        &ctx.trace.path().display().to_string(),
        &data,
        ctx.device,
        ctx.app_filter.as_deref(),
        &ctx.thresholds,
    );

    Ok((report, collapsed))
}
