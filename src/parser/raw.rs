//! Flattening of export XML rows into schema-tagged raw records.
//!
//! A [`RawRecord`] is the intermediate tabular form between the export
//! adapter and the normalizer: an ordered mapping of column name (element
//! tag) to cell value, with backtraces kept as structured frame lists.
//! Duplicate column names are allowed; lookups are first-wins, matching
//! how the export dialect nests columns.

use crate::parser::xml::{Document, NodeId};
use crate::utils::error::ParseError;
use log::debug;

/// A stack frame as it appears in an exported backtrace (leaf-first)
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub symbol: String,
    pub binary: Option<String>,
}

/// One column of a raw record
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Column name (the element tag, e.g. "weight", "duration")
    pub column: String,
    /// Human-formatted value from the `fmt` attribute ("2.00 ms", "14%")
    pub fmt: Option<String>,
    /// `name` attribute (symbol and binary columns use it)
    pub name: Option<String>,
    /// Raw element text (durations are integer nanoseconds here)
    pub text: Option<String>,
    /// Frames for backtrace columns, empty otherwise
    pub frames: Vec<RawFrame>,
}

/// An ordered, schema-tagged row extracted from an export document
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub schema: String,
    /// Row position within its export, retained for diagnostics
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl RawRecord {
    /// First cell with the given column name
    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column == column)
    }

    /// All cells with the given column name, in document order
    pub fn cells_named<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Cell> {
        self.cells.iter().filter(move |c| c.column == column)
    }
}

/// Parse an exported schema document into raw records, one per `<row>`.
pub fn rows_from_xml(schema: &str, xml: &str) -> Result<Vec<RawRecord>, ParseError> {
    let doc = Document::parse(xml)?;
    let records: Vec<RawRecord> = doc
        .rows()
        .into_iter()
        .enumerate()
        .map(|(index, row)| RawRecord {
            schema: schema.to_string(),
            index,
            cells: cells_from_row(&doc, row),
        })
        .collect();

    debug!("{}: extracted {} raw rows", schema, records.len());
    Ok(records)
}

fn cells_from_row(doc: &Document, row: NodeId) -> Vec<Cell> {
    let mut cells = Vec::new();
    collect_cells(doc, row, &mut cells);
    cells
}

fn collect_cells(doc: &Document, node: NodeId, out: &mut Vec<Cell>) {
    for &child in &doc.node(node).children {
        let resolved = doc.resolve(child);
        let elem = doc.node(resolved);

        if elem.tag == "backtrace" {
            out.push(Cell {
                column: "backtrace".to_string(),
                frames: frames_from_backtrace(doc, resolved),
                ..Cell::default()
            });
            continue;
        }

        out.push(Cell {
            column: elem.tag.clone(),
            fmt: elem.attr("fmt").map(str::to_owned),
            name: elem.attr("name").map(str::to_owned),
            text: elem.text.clone(),
            frames: Vec::new(),
        });

        // Descend through the raw child, not the resolved target, so a
        // ref placeholder does not pull in the original's nested columns.
        collect_cells(doc, child, out);
    }
}

fn frames_from_backtrace(doc: &Document, backtrace: NodeId) -> Vec<RawFrame> {
    doc.find_all(backtrace, "frame")
        .into_iter()
        .filter_map(|frame| {
            let resolved = doc.resolve(frame);
            let elem = doc.node(resolved);
            let symbol = elem.attr("name")?.to_string();

            let binary = doc.find_first(resolved, "binary").and_then(|b| {
                let b = doc.resolve(b);
                doc.node(b).attr("name").map(str::to_owned)
            });

            Some(RawFrame { symbol, binary })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_interned_weight() {
        let xml = r#"<trace-query-result><node>
            <row>
              <sample-time id="1" fmt="00:01.000">1000</sample-time>
              <weight id="2" fmt="2 ms">2000000</weight>
            </row>
            <row>
              <sample-time id="3" fmt="00:02.000">2000</sample-time>
              <weight ref="2"/>
            </row>
        </node></trace-query-result>"#;

        let rows = rows_from_xml("time-profile", xml).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cell("weight").unwrap().fmt.as_deref(), Some("2 ms"));
        assert_eq!(rows[1].schema, "time-profile");
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn test_backtrace_frames_with_ref_binary() {
        let xml = r#"<root><row>
            <backtrace id="b1">
              <frame name="leaf_fn" addr="0x1"><binary id="bin1" name="MyApp"/></frame>
              <frame name="main" addr="0x2"><binary ref="bin1"/></frame>
            </backtrace>
        </row></root>"#;

        let rows = rows_from_xml("time-profile", xml).unwrap();
        let frames = &rows[0].cell("backtrace").unwrap().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].symbol, "leaf_fn");
        assert_eq!(frames[0].binary.as_deref(), Some("MyApp"));
        assert_eq!(frames[1].binary.as_deref(), Some("MyApp"));
    }

    #[test]
    fn test_frame_without_name_is_skipped() {
        let xml = r#"<root><row><backtrace>
            <frame addr="0x1"/><frame name="kept" addr="0x2"/>
        </backtrace></row></root>"#;
        let rows = rows_from_xml("time-profile", xml).unwrap();
        let frames = &rows[0].cell("backtrace").unwrap().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].symbol, "kept");
    }
}
