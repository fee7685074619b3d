//! Collapsed-stack text output for third-party flamegraph renderers.
//!
//! One `frame;frame;...;frame weight` line per distinct root-to-leaf path.
//! Consumers treat the file as an unordered multiset of lines.

use crate::aggregator::CollapsedStack;
use crate::utils::error::OutputError;
use log::info;
use std::io::Write;
use std::path::Path;

/// Render collapsed stacks as flamegraph input lines.
pub fn collapsed_lines(stacks: &[CollapsedStack]) -> Vec<String> {
    stacks.iter().map(CollapsedStack::to_line).collect()
}

/// Write collapsed stacks to a text file.
pub fn write_collapsed(
    stacks: &[CollapsedStack],
    path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    super::prepare_output_path(path)?;

    let mut file = std::fs::File::create(path)?;
    for line in collapsed_lines(stacks) {
        writeln!(file, "{}", line)?;
    }

    info!(
        "collapsed stacks written to {} ({} paths)",
        path.display(),
        stacks.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_collapsed_roundtrip() {
        let stacks = vec![
            CollapsedStack::new("main;work".to_string(), 3.0),
            CollapsedStack::new("main;idle".to_string(), 1.0),
        ];
        let file = tempfile::NamedTempFile::new().unwrap();
        write_collapsed(&stacks, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "main;work 3\nmain;idle 1\n");
    }
}
