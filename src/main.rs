//! xctrace Report CLI
//!
//! A profiling report tool for Instruments `.trace` recordings.
//! Generates Markdown/JSON reports, collapsed stacks and flamegraphs
//! from `xctrace export` output.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use xctrace_report::output::{
    collapsed_lines, write_collapsed, write_flamegraph, write_markdown, write_report_json,
};
use xctrace_report::pipeline::{collect_trace_data, run_report, RunContext};
use xctrace_report::report::{DeviceClass, Thresholds};
use xctrace_report::trace::{SchemaCatalog, SchemaKind, TraceExporter, TraceHandle, XctraceExporter};
use xctrace_report::utils::config::REPORT_VERSION;

/// xctrace Report - profiling reports for Instruments recordings
#[derive(Parser, Debug)]
#[command(name = "xctrace-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a profiling report from a trace recording
    Report {
        /// Path to the .trace bundle
        trace: PathBuf,

        /// Output path for the Markdown report
        #[arg(short, long, default_value = "report.md")]
        output: PathBuf,

        /// Output path for the JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for collapsed stacks (optional)
        #[arg(long)]
        collapsed: Option<PathBuf>,

        /// Output path for an SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// App binary name for the app-only hot frame table
        #[arg(short, long)]
        app: Option<String>,

        /// Device class the recording was taken on: physical or simulator
        #[arg(long, default_value = "physical")]
        device_class: String,

        /// Number of hot frames per ranking table
        #[arg(long, default_value = "10")]
        top_frames: usize,

        /// Launch time budget in milliseconds before a warning
        #[arg(long)]
        launch_budget_ms: Option<f64>,

        /// Mean energy impact above which the section turns critical
        #[arg(long)]
        energy_high_impact: Option<f64>,

        /// Directory for intermediate export artifacts
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Export collapsed stacks only, without building a report
    Collapse {
        /// Path to the .trace bundle
        trace: PathBuf,

        /// Output path for collapsed stacks; omit to print to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for intermediate export artifacts
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// List the data schemas a trace recording contains
    Toc {
        /// Path to the .trace bundle
        trace: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Report {
            trace,
            output,
            json,
            collapsed,
            flamegraph,
            app,
            device_class,
            top_frames,
            launch_budget_ms,
            energy_high_impact,
            export_dir,
        } => {
            let mut thresholds = Thresholds::default().with_top_frames(top_frames);
            if let Some(budget) = launch_budget_ms {
                thresholds = thresholds.with_launch_budget_ms(budget);
            }
            if let Some(impact) = energy_high_impact {
                thresholds = thresholds.with_energy_high_impact(impact);
            }

            let ctx = RunContext {
                trace: TraceHandle::new(&trace)?,
                device: parse_device(&device_class)?,
                app_filter: app,
                thresholds,
            };
            let exporter = exporter_for(export_dir);

            let (report, stacks) = run_report(&exporter, &ctx)?;

            write_markdown(&report, &output)?;
            println!("Report written to {}", output.display());

            if let Some(path) = json {
                write_report_json(&report, &path)?;
                println!("JSON report written to {}", path.display());
            }
            if let Some(path) = collapsed {
                if stacks.is_empty() {
                    println!("No call stack samples; skipping collapsed output");
                } else {
                    write_collapsed(&stacks, &path)?;
                    println!("Collapsed stacks written to {}", path.display());
                }
            }
            if let Some(path) = flamegraph {
                if stacks.is_empty() {
                    println!("No call stack samples; skipping flamegraph");
                } else {
                    let title = format!("Time Profile - {}", trace.display());
                    write_flamegraph(&stacks, &path, &title)?;
                    println!("Flamegraph written to {}", path.display());
                }
            }
        }

        Commands::Collapse {
            trace,
            output,
            export_dir,
        } => {
            let ctx = RunContext {
                trace: TraceHandle::new(&trace)?,
                device: DeviceClass::Physical,
                app_filter: None,
                thresholds: Thresholds::default(),
            };
            let exporter = exporter_for(export_dir);

            let data = collect_trace_data(&exporter, &ctx)?;
            let samples = match data.samples {
                Some(ref samples) if !samples.is_empty() => samples,
                _ => bail!("trace contains no call stack samples"),
            };

            let stacks = xctrace_report::aggregator::build_collapsed_stacks(samples);
            match output {
                Some(path) => {
                    write_collapsed(&stacks, &path)?;
                    println!("Collapsed stacks written to {}", path.display());
                }
                None => {
                    for line in collapsed_lines(&stacks) {
                        println!("{}", line);
                    }
                }
            }
        }

        Commands::Toc { trace } => {
            display_toc(trace)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

fn exporter_for(export_dir: Option<PathBuf>) -> XctraceExporter {
    XctraceExporter::new(export_dir.unwrap_or_else(std::env::temp_dir))
}

fn parse_device(value: &str) -> Result<DeviceClass> {
    match value.to_ascii_lowercase().as_str() {
        "physical" => Ok(DeviceClass::Physical),
        "simulator" => Ok(DeviceClass::Simulator),
        other => bail!("unknown device class '{}' (expected physical or simulator)", other),
    }
}

/// List discovered schemas for a trace
///
/// **Private** - internal command implementation
fn display_toc(trace: PathBuf) -> Result<()> {
    let handle = TraceHandle::new(&trace)?;
    let exporter = exporter_for(None);

    let toc_xml = exporter.export_toc(&handle)?;
    let catalog = SchemaCatalog::parse(&toc_xml)?;

    println!("Data sources in {}:", trace.display());
    for descriptor in &catalog.descriptors {
        match &descriptor.kind {
            SchemaKind::Flat => println!("  table   {}", descriptor.name),
            SchemaKind::Tracked { track, detail } => {
                println!("  track   {} / {}", track, detail)
            }
        }
    }
    if catalog.descriptors.is_empty() {
        println!("  (none)");
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("xctrace Report v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("A profiling report tool for Instruments trace recordings.");
}
