//! Minimal DOM over xctrace export XML.
//!
//! xctrace interns repeated values: the first occurrence of an element
//! carries `id="N"` and every later occurrence is an empty element with
//! `ref="N"`. Every lookup in the normalizer therefore goes through
//! [`Document::resolve`], which follows one `ref` hop when the target id
//! is known and otherwise returns the node unchanged.
//!
//! Nodes live in an arena indexed by `NodeId`; the tree is read-only once
//! parsed.

use crate::utils::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Index of a node inside a [`Document`] arena
pub type NodeId = usize;

/// A single XML element: tag, attributes, concatenated text, children
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
}

impl Element {
    /// Attribute value by name, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parsed export document with the id cache used for ref resolution
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Element>,
    roots: Vec<NodeId>,
    ids: HashMap<String, NodeId>,
}

impl Document {
    /// Parse an exported XML document into an element tree.
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut doc = Document::default();
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let id = doc.push_element(&e, stack.last().copied());
                    stack.push(id);
                }
                Event::Empty(e) => {
                    doc.push_element(&e, stack.last().copied());
                }
                Event::Text(t) => {
                    if let Some(&top) = stack.last() {
                        let text = t.unescape()?.into_owned();
                        if !text.is_empty() {
                            match &mut doc.nodes[top].text {
                                Some(existing) => existing.push_str(&text),
                                slot => *slot = Some(text),
                            }
                        }
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(doc)
    }

    fn push_element(&mut self, e: &BytesStart<'_>, parent: Option<NodeId>) -> NodeId {
        let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let attrs: Vec<(String, String)> = e
            .attributes()
            .filter_map(|a| a.ok())
            .map(|a| {
                let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
                let value = a
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_default();
                (key, value)
            })
            .collect();

        let id = self.nodes.len();
        self.nodes.push(Element {
            tag,
            attrs,
            text: None,
            children: Vec::new(),
        });

        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        } else {
            self.roots.push(id);
        }

        if let Some(elem_id) = self.nodes[id].attr("id").map(str::to_owned) {
            self.ids.insert(elem_id, id);
        }

        id
    }

    /// Borrow a node by id
    pub fn node(&self, id: NodeId) -> &Element {
        &self.nodes[id]
    }

    /// Top-level elements of the document
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All elements with the given tag anywhere in the document.
    pub fn find_all_in_document(&self, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            if self.nodes[root].tag == tag {
                out.push(root);
            }
            self.collect(root, tag, &mut out);
        }
        out
    }

    /// Follow a `ref` attribute back to the interned original, when known.
    pub fn resolve(&self, id: NodeId) -> NodeId {
        match self.nodes[id].attr("ref") {
            Some(r) => self.ids.get(r).copied().unwrap_or(id),
            None => id,
        }
    }

    /// First descendant (depth-first, document order) with the given tag.
    ///
    /// The search walks the raw subtree; callers resolve the hit themselves
    /// so that a `ref` placeholder is still findable in place.
    pub fn find_first(&self, start: NodeId, tag: &str) -> Option<NodeId> {
        for &child in &self.nodes[start].children {
            if self.nodes[child].tag == tag {
                return Some(child);
            }
            if let Some(found) = self.find_first(child, tag) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given tag, depth-first document order.
    pub fn find_all(&self, start: NodeId, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect(start, tag, &mut out);
        out
    }

    fn collect(&self, start: NodeId, tag: &str, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[start].children {
            if self.nodes[child].tag == tag {
                out.push(child);
            }
            self.collect(child, tag, out);
        }
    }

    /// All `<row>` elements anywhere in the document.
    pub fn rows(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            if self.nodes[root].tag == "row" {
                out.push(root);
            }
            self.collect(root, "row", &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_resolution() {
        let xml = r#"<root>
            <row><weight id="1" fmt="2 ms">2000000</weight></row>
            <row><weight ref="1"/></row>
        </root>"#;
        let doc = Document::parse(xml).unwrap();
        let rows = doc.rows();
        assert_eq!(rows.len(), 2);

        let second = doc.find_first(rows[1], "weight").unwrap();
        let resolved = doc.resolve(second);
        assert_eq!(doc.node(resolved).attr("fmt"), Some("2 ms"));
        assert_eq!(doc.node(resolved).text.as_deref(), Some("2000000"));
    }

    #[test]
    fn test_unknown_ref_returns_node_unchanged() {
        let xml = r#"<root><row><weight ref="99"/></row></root>"#;
        let doc = Document::parse(xml).unwrap();
        let w = doc.find_first(doc.rows()[0], "weight").unwrap();
        assert_eq!(doc.resolve(w), w);
    }

    #[test]
    fn test_find_all_nested() {
        let xml = r#"<root><row><backtrace>
            <frame name="a"/><frame name="b"/>
        </backtrace></row></root>"#;
        let doc = Document::parse(xml).unwrap();
        let bt = doc.find_first(doc.rows()[0], "backtrace").unwrap();
        assert_eq!(doc.find_all(bt, "frame").len(), 2);
    }
}
