//! Export adapter over the external trace export tool.
//!
//! The pipeline never reads a trace bundle directly; it asks `xctrace
//! export` for one schema or track at a time and consumes the XML it
//! prints. [`TraceExporter`] is the seam between the pipeline and the
//! tool so tests can substitute canned XML.
//!
//! Contract: an empty or unmatched export is `Ok(None)` — recordings with
//! no qualifying activity are a valid, common outcome. Only a genuine tool
//! or I/O failure is an error, and such a failure aborts that schema alone,
//! never its siblings.

use crate::utils::config::EXPORT_DIR_PREFIX;
use crate::utils::error::ExportError;
use chrono::Local;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Opaque reference to a recorded trace bundle.
///
/// Immutable once produced; owned by the pipeline run and discarded with it.
#[derive(Debug, Clone)]
pub struct TraceHandle {
    path: PathBuf,
}

impl TraceHandle {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let path = path.into();
        if !path.exists() {
            return Err(ExportError::TraceNotFound(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Extraction interface the pipeline runs against
pub trait TraceExporter {
    /// Export the trace's table of contents as XML.
    fn export_toc(&self, trace: &TraceHandle) -> Result<String, ExportError>;

    /// Export one flat schema table under the trace's first run.
    /// `Ok(None)` means the schema is absent from this trace.
    fn export_schema(&self, trace: &TraceHandle, schema: &str)
        -> Result<Option<String>, ExportError>;

    /// Export one nested track/detail node (Leaks, Allocations).
    fn export_track_detail(
        &self,
        trace: &TraceHandle,
        track: &str,
        detail: &str,
    ) -> Result<Option<String>, ExportError>;
}

/// Production exporter shelling out to `xctrace export`.
///
/// Exported XML is mirrored into a per-run-unique directory so a failed run
/// can be inspected; the pipeline's correctness never depends on those
/// files surviving, and two concurrent runs never share a directory.
#[derive(Debug)]
pub struct XctraceExporter {
    run_dir: PathBuf,
}

impl XctraceExporter {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let run_dir = base_dir.as_ref().join(format!(
            "{}-{}-{}",
            EXPORT_DIR_PREFIX,
            stamp,
            std::process::id()
        ));
        Self { run_dir }
    }

    /// Directory holding this run's intermediate exports
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    fn run_export(
        &self,
        trace: &TraceHandle,
        extra_args: &[&str],
        artifact_name: &str,
    ) -> Result<Option<String>, ExportError> {
        let mut cmd = Command::new("xctrace");
        cmd.arg("export")
            .arg("--input")
            .arg(trace.path())
            .args(extra_args);
        debug!("running {:?}", cmd);

        let output = cmd.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if is_absent_schema(&stderr) {
                debug!("{}: schema absent from this trace", artifact_name);
                return Ok(None);
            }
            return Err(ExportError::ExportFailure(stderr));
        }

        let xml = String::from_utf8_lossy(&output.stdout).into_owned();
        self.keep_artifact(artifact_name, &xml);
        Ok(Some(xml))
    }

    /// Mirror exported XML to disk for inspection. Diagnostic only; a
    /// failure here is logged and swallowed.
    fn keep_artifact(&self, name: &str, xml: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.run_dir)
            .and_then(|_| std::fs::write(self.run_dir.join(name), xml))
        {
            warn!("could not keep export artifact {}: {}", name, e);
        }
    }
}

/// The export tool reports an unmatched XPath as a failure; that is the
/// absent-schema case, not an error. Only the XPath-unmatched phrasings
/// qualify; anything else (missing input file, tool crash) stays a failure.
fn is_absent_schema(stderr: &str) -> bool {
    let s = stderr.to_ascii_lowercase();
    s.contains("does not exist") || s.contains("no elements")
}

impl TraceExporter for XctraceExporter {
    fn export_toc(&self, trace: &TraceHandle) -> Result<String, ExportError> {
        info!("reading table of contents for {}", trace.path().display());
        self.run_export(trace, &["--toc"], "toc.xml")?
            .ok_or_else(|| {
                ExportError::ExportFailure("trace has no table of contents".to_string())
            })
    }

    fn export_schema(
        &self,
        trace: &TraceHandle,
        schema: &str,
    ) -> Result<Option<String>, ExportError> {
        let xpath = format!(r#"/trace-toc/run[1]/data/table[@schema="{}"]"#, schema);
        self.run_export(trace, &["--xpath", &xpath], &format!("{}.xml", schema))
    }

    fn export_track_detail(
        &self,
        trace: &TraceHandle,
        track: &str,
        detail: &str,
    ) -> Result<Option<String>, ExportError> {
        let xpath = format!(
            r#"/trace-toc/run[1]/tracks/track[@name="{}"]/details/detail[@name="{}"]"#,
            track, detail
        );
        self.run_export(
            trace,
            &["--xpath", &xpath],
            &format!("{}-{}.xml", track, detail),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_handle_missing_path() {
        let err = TraceHandle::new("/nonexistent/recording.trace").unwrap_err();
        assert!(matches!(err, ExportError::TraceNotFound(_)));
    }

    #[test]
    fn test_run_dirs_are_distinct_per_process_run() {
        let base = tempfile::tempdir().unwrap();
        let a = XctraceExporter::new(base.path());
        assert!(a
            .run_dir()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(EXPORT_DIR_PREFIX));
    }

    #[test]
    fn test_absent_schema_detection() {
        assert!(is_absent_schema("Requested XPath does not exist"));
        assert!(is_absent_schema("XPath matched no elements"));
        assert!(!is_absent_schema("permission denied"));
    }

    #[test]
    fn test_missing_input_is_a_failure_not_absence() {
        // A bundle vanishing mid-run must land in export failures, not be
        // mistaken for a schema that was never recorded.
        assert!(!is_absent_schema("Input file not found: /tmp/app.trace"));
    }
}
