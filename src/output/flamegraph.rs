//! SVG flamegraph rendering from collapsed stacks, via inferno.

use crate::aggregator::CollapsedStack;
use crate::utils::error::OutputError;
use inferno::flamegraph::{self, Options};
use log::info;
use std::path::Path;

/// Render collapsed stacks as an SVG flamegraph.
pub fn write_flamegraph(
    stacks: &[CollapsedStack],
    path: impl AsRef<Path>,
    title: &str,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    if stacks.is_empty() {
        return Err(OutputError::FlamegraphFailed("empty stack data".to_string()));
    }
    super::prepare_output_path(path)?;

    let lines = super::collapsed_lines(stacks);
    let mut options = Options::default();
    options.title = title.to_string();
    options.count_name = "ms".to_string();

    let file = std::fs::File::create(path)?;
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), file)
        .map_err(|e| OutputError::FlamegraphFailed(e.to_string()))?;

    info!("flamegraph written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stacks_rejected() {
        let err = write_flamegraph(&[], "unused.svg", "t").unwrap_err();
        assert!(matches!(err, OutputError::FlamegraphFailed(_)));
    }

    #[test]
    fn test_renders_svg() {
        let stacks = vec![
            CollapsedStack::new("main;render".to_string(), 5.0),
            CollapsedStack::new("main;layout".to_string(), 2.0),
        ];
        let file = tempfile::NamedTempFile::new().unwrap();
        write_flamegraph(&stacks, file.path(), "Time Profile").unwrap();

        let svg = std::fs::read_to_string(file.path()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Time Profile"));
    }
}
