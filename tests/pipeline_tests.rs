use std::collections::HashMap;

use xctrace_report::pipeline::{collect_trace_data, run_report, RunContext};
use xctrace_report::report::{DeviceClass, Status, Thresholds};
use xctrace_report::trace::{TraceExporter, TraceHandle};
use xctrace_report::utils::error::ExportError;

/// Exporter backed by canned XML instead of the external tool.
struct FakeExporter {
    toc: String,
    /// Flat schema name -> export body; a missing key behaves as absent.
    schemas: HashMap<String, String>,
    /// "Track/Detail" -> export body
    tracked: HashMap<String, String>,
    /// Flat schemas whose export should fail outright
    failing: Vec<String>,
}

impl FakeExporter {
    fn new(toc: &str) -> Self {
        Self {
            toc: toc.to_string(),
            schemas: HashMap::new(),
            tracked: HashMap::new(),
            failing: Vec::new(),
        }
    }

    fn with_schema(mut self, name: &str, xml: &str) -> Self {
        self.schemas.insert(name.to_string(), xml.to_string());
        self
    }

    fn with_tracked(mut self, track: &str, detail: &str, xml: &str) -> Self {
        self.tracked
            .insert(format!("{}/{}", track, detail), xml.to_string());
        self
    }

    fn with_failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

impl TraceExporter for FakeExporter {
    fn export_toc(&self, _trace: &TraceHandle) -> Result<String, ExportError> {
        Ok(self.toc.clone())
    }

    fn export_schema(
        &self,
        _trace: &TraceHandle,
        schema: &str,
    ) -> Result<Option<String>, ExportError> {
        if self.failing.iter().any(|f| f == schema) {
            return Err(ExportError::ExportFailure("tool crashed".to_string()));
        }
        Ok(self.schemas.get(schema).cloned())
    }

    fn export_track_detail(
        &self,
        _trace: &TraceHandle,
        track: &str,
        detail: &str,
    ) -> Result<Option<String>, ExportError> {
        Ok(self.tracked.get(&format!("{}/{}", track, detail)).cloned())
    }
}

fn context() -> (tempfile::TempDir, RunContext) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = RunContext {
        trace: TraceHandle::new(dir.path()).unwrap(),
        device: DeviceClass::Physical,
        app_filter: None,
        thresholds: Thresholds::default(),
    };
    (dir, ctx)
}

const FULL_TOC: &str = r#"<trace-toc><run number="1">
    <data>
      <table schema="time-profile"/>
      <table schema="potential-hangs"/>
    </data>
    <tracks>
      <track name="Leaks"><details><detail name="Leaks"/></details></track>
    </tracks>
</run></trace-toc>"#;

const TIME_PROFILE_XML: &str = r#"<root>
    <row>
      <weight id="1" fmt="1 ms">1000000</weight>
      <backtrace id="2">
        <frame id="3" name="work" addr="0x1"><binary id="4" name="MyApp"/></frame>
        <frame id="5" name="main" addr="0x2"><binary ref="4"/></frame>
      </backtrace>
    </row>
    <row>
      <weight ref="1"/>
      <backtrace id="6">
        <frame id="7" name="idle" addr="0x3"><binary ref="4"/></frame>
        <frame ref="5"/>
      </backtrace>
    </row>
</root>"#;

const HANGS_XML: &str = r#"<root><row>
    <start-time id="1" fmt="00:05.000">5000000000</start-time>
    <duration id="2" fmt="400.00 ms">400000000</duration>
    <hang-type id="3" fmt="Hang"/>
</row></root>"#;

const LEAKS_XML: &str = r#"<root><row>
    <address id="1" fmt="0x6000"/>
    <size id="2">512</size>
    <symbol id="3" name="Cache.fill"/>
    <binary id="4" name="MyApp"/>
</row></root>"#;

#[test]
fn test_end_to_end_report() {
    let exporter = FakeExporter::new(FULL_TOC)
        .with_schema("time-profile", TIME_PROFILE_XML)
        .with_schema("potential-hangs", HANGS_XML)
        .with_tracked("Leaks", "Leaks", LEAKS_XML);
    let (_dir, ctx) = context();

    let (report, stacks) = run_report(&exporter, &ctx).unwrap();

    assert!(!report.no_data);
    assert!(report.export_failures.is_empty());

    let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Time Profile", "Potential Hangs", "Memory Leaks"]);

    let hangs = &report.sections[1];
    assert_eq!(hangs.status, Some(Status::Warning));

    let leaks = &report.sections[2];
    assert_eq!(leaks.status, Some(Status::Critical));

    // Two samples, two distinct root-to-leaf paths.
    assert_eq!(stacks.len(), 2);
    let lines: Vec<String> = stacks.iter().map(|s| s.to_line()).collect();
    assert!(lines.contains(&"main;work 1".to_string()));
    assert!(lines.contains(&"main;idle 1".to_string()));
}

#[test]
fn test_absent_schema_skips_section() {
    // Catalog lists hangs only; every other schema is absent.
    let toc = r#"<trace-toc><run number="1"><data>
        <table schema="potential-hangs"/>
    </data></run></trace-toc>"#;
    let exporter = FakeExporter::new(toc).with_schema("potential-hangs", HANGS_XML);
    let (_dir, ctx) = context();

    let data = collect_trace_data(&exporter, &ctx).unwrap();
    assert!(data.samples.is_none());
    assert!(data.leaks.is_none());
    assert_eq!(data.hangs.as_ref().unwrap().len(), 1);
    assert!(data.export_failures.is_empty());
}

#[test]
fn test_schema_in_catalog_but_export_empty() {
    // Present in the catalog, but the tool reports no matching elements.
    let toc = r#"<trace-toc><run number="1"><data>
        <table schema="potential-hangs"/>
    </data></run></trace-toc>"#;
    let exporter = FakeExporter::new(toc).with_schema("potential-hangs", "<root/>");
    let (_dir, ctx) = context();

    let data = collect_trace_data(&exporter, &ctx).unwrap();
    assert!(data.hangs.as_ref().unwrap().is_empty());
    assert!(data.is_empty_recording());
}

#[test]
fn test_empty_recording_report() {
    let exporter = FakeExporter::new("<trace-toc/>");
    let (_dir, ctx) = context();

    let (report, stacks) = run_report(&exporter, &ctx).unwrap();
    assert!(report.no_data);
    assert_eq!(report.sections[0].title, "No Data");
    assert!(stacks.is_empty());
}

#[test]
fn test_export_failure_isolated_to_its_schema() {
    let exporter = FakeExporter::new(FULL_TOC)
        .with_schema("potential-hangs", HANGS_XML)
        .with_failing("time-profile");
    let (_dir, ctx) = context();

    let data = collect_trace_data(&exporter, &ctx).unwrap();

    // The failed schema is recorded; its sibling still came through.
    assert!(data.samples.is_none());
    assert_eq!(data.export_failures.len(), 1);
    assert!(data.export_failures[0].starts_with("time-profile"));
    assert_eq!(data.hangs.as_ref().unwrap().len(), 1);

    let (report, _) = run_report(&exporter, &ctx).unwrap();
    assert_eq!(report.export_failures.len(), 1);
}

#[test]
fn test_malformed_rows_surface_as_diagnostics() {
    // Second hang row lacks a duration and is dropped, not fatal.
    let hangs = r#"<root>
        <row>
          <start-time fmt="00:01.000">1</start-time>
          <duration fmt="300.00 ms">300000000</duration>
        </row>
        <row><start-time fmt="00:02.000">2</start-time></row>
    </root>"#;
    let exporter = FakeExporter::new(FULL_TOC).with_schema("potential-hangs", hangs);
    let (_dir, ctx) = context();

    let (report, _) = run_report(&exporter, &ctx).unwrap();
    assert_eq!(report.dropped_rows.len(), 1);
    assert_eq!(report.dropped_rows[0].schema, "potential-hangs");
    assert_eq!(report.dropped_rows[0].index, 1);
}
