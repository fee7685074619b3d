//! Schema catalog reader.
//!
//! Parses a trace's table of contents to discover which data schemas and
//! tracks the recording actually contains. Most instruments expose flat
//! per-run schema tables; the memory families (Leaks, Allocations) exist
//! only as nested track/detail trees and need a different export path.
//! Absence of a schema is a normal condition, never an error.

use crate::parser::xml::Document;
use crate::utils::error::TocError;
use log::debug;

/// How a data source is exposed inside the trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// Flat per-run table, addressable by schema name
    Flat,
    /// Nested track/detail tree
    Tracked { track: String, detail: String },
}

/// One discovered data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: String,
    pub kind: SchemaKind,
}

/// The set of schemas present in one trace, discovered once and read-only
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    pub descriptors: Vec<SchemaDescriptor>,
}

impl SchemaCatalog {
    /// Parse the table-of-contents XML produced by the export tool.
    pub fn parse(toc_xml: &str) -> Result<Self, TocError> {
        let doc = Document::parse(toc_xml)
            .map_err(|e| TocError::MalformedToc(e.to_string()))?;

        let mut descriptors = Vec::new();

        // Flat schema tables: <table schema="time-profile"/>
        for table in doc.find_all_in_document("table") {
            if let Some(schema) = doc.node(table).attr("schema") {
                descriptors.push(SchemaDescriptor {
                    name: schema.to_string(),
                    kind: SchemaKind::Flat,
                });
            }
        }

        // Track/detail trees: <track name="Leaks"><details><detail name="Leaks"/>...
        for track in doc.find_all_in_document("track") {
            let track_name = match doc.node(track).attr("name") {
                Some(n) => n.to_string(),
                None => continue,
            };
            for detail in doc.find_all(track, "detail") {
                if let Some(detail_name) = doc.node(detail).attr("name") {
                    descriptors.push(SchemaDescriptor {
                        name: format!("{}-{}", track_name, detail_name),
                        kind: SchemaKind::Tracked {
                            track: track_name.clone(),
                            detail: detail_name.to_string(),
                        },
                    });
                }
            }
        }

        debug!("catalog: {} data sources discovered", descriptors.len());
        Ok(SchemaCatalog { descriptors })
    }

    /// Whether a flat schema with this name is present
    pub fn has_flat(&self, name: &str) -> bool {
        self.descriptors
            .iter()
            .any(|d| d.kind == SchemaKind::Flat && d.name == name)
    }

    /// Tracked descriptor for a (track, detail) pair, if present
    pub fn tracked(&self, track: &str, detail: &str) -> Option<&SchemaDescriptor> {
        self.descriptors.iter().find(|d| {
            matches!(&d.kind, SchemaKind::Tracked { track: t, detail: dt }
                if t == track && dt == detail)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = r#"<trace-toc>
      <run number="1">
        <data>
          <table schema="time-profile"/>
          <table schema="potential-hangs"/>
        </data>
        <tracks>
          <track name="Leaks"><details><detail name="Leaks"/></details></track>
          <track name="Allocations"><details><detail name="Statistics"/></details></track>
        </tracks>
      </run>
    </trace-toc>"#;

    #[test]
    fn test_flat_and_tracked_discovery() {
        let catalog = SchemaCatalog::parse(TOC).unwrap();
        assert!(catalog.has_flat("time-profile"));
        assert!(catalog.has_flat("potential-hangs"));
        assert!(!catalog.has_flat("energy-impact"));

        let leaks = catalog.tracked("Leaks", "Leaks").unwrap();
        assert_eq!(leaks.name, "Leaks-Leaks");
        assert!(catalog.tracked("Allocations", "Statistics").is_some());
        assert!(catalog.tracked("Allocations", "Events").is_none());
    }

    #[test]
    fn test_empty_toc_is_not_an_error() {
        let catalog = SchemaCatalog::parse("<trace-toc/>").unwrap();
        assert!(catalog.descriptors.is_empty());
    }
}
