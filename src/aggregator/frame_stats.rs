//! Per-frame self/total time accounting over weighted stack samples.
//!
//! For each sample the frame list is deduplicated by (symbol, binary)
//! identity before total time is credited, so a function recursing within
//! one stack is counted once for that sample. Self time goes to the leaf
//! frame only. The conservation law: summed self time over all frames
//! equals the summed weight of the aggregated samples.

use crate::parser::records::{FrameRef, StackSample};
use log::debug;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Accumulated statistics for one frame identity
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub frame: FrameRef,
    /// Weight from every sample this frame appears in, once per sample
    pub total_ms: f64,
    /// Weight from samples where this frame is the leaf
    pub self_ms: f64,
    /// Number of distinct samples this frame appears in
    pub samples: u64,
}

impl FrameStats {
    fn new(frame: FrameRef) -> Self {
        Self {
            frame,
            total_ms: 0.0,
            self_ms: 0.0,
            samples: 0,
        }
    }
}

/// Aggregated frame table for one recording
#[derive(Debug, Default)]
pub struct FrameTable {
    stats: HashMap<FrameRef, FrameStats>,
    /// Summed weight of the samples that contributed (degenerate
    /// zero-frame samples contribute nothing)
    total_weight_ms: f64,
    sample_count: u64,
}

impl FrameTable {
    pub fn total_weight_ms(&self) -> f64 {
        self.total_weight_ms
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn get(&self, frame: &FrameRef) -> Option<&FrameStats> {
        self.stats.get(frame)
    }

    /// Top-N frames by total time, descending, ties broken by symbol name
    /// ascending so reordered input yields identical output.
    pub fn top_by_total(&self, n: usize, binary_filter: Option<&str>) -> Vec<FrameStats> {
        self.ranked(n, binary_filter, |s| s.total_ms)
    }

    /// Top-N frames by self time, same determinism rules.
    pub fn top_by_self(&self, n: usize, binary_filter: Option<&str>) -> Vec<FrameStats> {
        self.ranked(n, binary_filter, |s| s.self_ms)
    }

    fn ranked(
        &self,
        n: usize,
        binary_filter: Option<&str>,
        metric: impl Fn(&FrameStats) -> f64,
    ) -> Vec<FrameStats> {
        // Filtering happens strictly after aggregation: the stats already
        // reflect full app + system totals.
        let mut out: Vec<FrameStats> = self
            .stats
            .values()
            .filter(|s| matches_binary(&s.frame, binary_filter))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            metric(b)
                .partial_cmp(&metric(a))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.frame.symbol.cmp(&b.frame.symbol))
        });
        out.truncate(n);
        out
    }
}

fn matches_binary(frame: &FrameRef, filter: Option<&str>) -> bool {
    match filter {
        Some(name) => frame
            .binary
            .to_ascii_lowercase()
            .contains(&name.to_ascii_lowercase()),
        None => true,
    }
}

/// Fold an ordered sequence of samples into per-frame statistics.
pub fn aggregate_frames(samples: &[StackSample]) -> FrameTable {
    let mut table = FrameTable::default();

    for sample in samples {
        if sample.frames.is_empty() {
            continue;
        }
        table.sample_count += 1;
        table.total_weight_ms += sample.weight_ms;

        // Distinct frames of this sample, first (root-most) occurrence kept.
        let mut seen: HashSet<&FrameRef> = HashSet::with_capacity(sample.frames.len());
        for frame in &sample.frames {
            if seen.insert(frame) {
                let entry = table
                    .stats
                    .entry(frame.clone())
                    .or_insert_with(|| FrameStats::new(frame.clone()));
                entry.total_ms += sample.weight_ms;
                entry.samples += 1;
            }
        }

        if let Some(leaf) = sample.leaf() {
            if let Some(entry) = table.stats.get_mut(leaf) {
                entry.self_ms += sample.weight_ms;
            }
        }
    }

    debug!(
        "aggregated {} samples into {} frames ({:.2} ms)",
        table.sample_count,
        table.stats.len(),
        table.total_weight_ms
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(frames: &[(&str, &str)], weight: f64) -> StackSample {
        StackSample {
            timestamp_ms: 0.0,
            weight_ms: weight,
            frames: frames
                .iter()
                .map(|(s, b)| FrameRef::new(*s, *b))
                .collect(),
        }
    }

    #[test]
    fn test_leaf_gets_self_time() {
        let table = aggregate_frames(&[sample(&[("main", "App"), ("work", "App")], 2.0)]);
        let leaf = table.get(&FrameRef::new("work", "App")).unwrap();
        assert_eq!(leaf.self_ms, 2.0);
        assert_eq!(leaf.total_ms, 2.0);
        let root = table.get(&FrameRef::new("main", "App")).unwrap();
        assert_eq!(root.self_ms, 0.0);
        assert_eq!(root.total_ms, 2.0);
    }

    #[test]
    fn test_recursion_counts_once_per_sample() {
        let table = aggregate_frames(&[sample(
            &[("recurse", "App"), ("recurse", "App"), ("leafy", "App")],
            1.0,
        )]);
        let r = table.get(&FrameRef::new("recurse", "App")).unwrap();
        assert_eq!(r.total_ms, 1.0);
        assert_eq!(r.samples, 1);
    }

    #[test]
    fn test_same_symbol_different_binary_distinct() {
        let table = aggregate_frames(&[sample(&[("init", "libA"), ("init", "libB")], 1.0)]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_degenerate_sample_skipped() {
        let table = aggregate_frames(&[sample(&[], 5.0)]);
        assert!(table.is_empty());
        assert_eq!(table.total_weight_ms(), 0.0);
        assert_eq!(table.sample_count(), 0);
    }

    #[test]
    fn test_binary_filter_is_post_aggregation() {
        let table = aggregate_frames(&[
            sample(&[("main", "MyApp"), ("syscall", "libsystem")], 1.0),
            sample(&[("main", "MyApp"), ("render", "MyApp")], 1.0),
        ]);
        let app_only = table.top_by_total(10, Some("myapp"));
        assert_eq!(app_only.len(), 2);
        // totals still reflect full aggregation
        let main = app_only.iter().find(|s| s.frame.symbol == "main").unwrap();
        assert_eq!(main.total_ms, 2.0);
    }
}
