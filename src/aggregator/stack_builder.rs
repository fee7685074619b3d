//! Build collapsed stack format from normalized stack samples.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "root;child;leaf weight"
//!
//! One line per distinct root-to-leaf path, weights of identical paths
//! summed. Unlike the frame table, paths are built from the full,
//! non-deduplicated frame list so recursion stays visible in the graph.

use crate::parser::records::StackSample;
use crate::utils::config::COLLAPSED_SEPARATOR;
use log::debug;
use std::collections::HashMap;

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedStack {
    /// Stack trace as separator-joined symbols, root first
    pub stack: String,

    /// Summed weight of all samples sharing this path, milliseconds
    pub weight_ms: f64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight_ms: f64) -> Self {
        Self { stack, weight_ms }
    }

    /// Render as one flamegraph input line. Weights are rounded to whole
    /// milliseconds, which is what the downstream renderers consume.
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight_ms.round() as u64)
    }
}

/// Escape a symbol for use inside a collapsed path
fn escape_symbol(symbol: &str) -> String {
    symbol.replace(COLLAPSED_SEPARATOR, ":").replace(' ', "_")
}

/// Fold samples into collapsed stacks, one per distinct path.
///
/// Output order is weight-descending with a path tie-break; consumers treat
/// the lines as an unordered multiset, the sort just keeps runs comparable.
pub fn build_collapsed_stacks(samples: &[StackSample]) -> Vec<CollapsedStack> {
    debug!("building collapsed stacks from {} samples", samples.len());

    let mut stack_map: HashMap<String, f64> = HashMap::new();

    for sample in samples {
        if sample.frames.is_empty() {
            continue;
        }
        let path: Vec<String> = sample
            .frames
            .iter()
            .map(|f| escape_symbol(&f.symbol))
            .collect();
        let sep = COLLAPSED_SEPARATOR.to_string();
        *stack_map.entry(path.join(&sep)).or_insert(0.0) += sample.weight_ms;
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, weight)| CollapsedStack::new(stack, weight))
        .collect();

    stacks.sort_by(|a, b| {
        b.weight_ms
            .partial_cmp(&a.weight_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.stack.cmp(&b.stack))
    });

    debug!("built {} unique collapsed stacks", stacks.len());
    stacks
}
