//! Markup trees for the inliner.
//!
//! The inliner only needs to find elements, read and rewrite two attributes,
//! and write the tree back out unchanged otherwise. This module provides a
//! small node tree for that and a [`MarkupParser`] capability that builds
//! it. Parsing either yields a whole [`Document`] or a [`Degraded`] value,
//! never a partial tree.
//!
//! Text and attribute values are kept in their escaped source form, so a
//! parse followed by [`Document::to_markup`] does not re-escape or unescape
//! anything the escaping boundary produced.

mod inliner;
mod xml;

pub use inliner::{inline, inline_with, Inlined};
pub use xml::XmlParser;

use crate::error::Degraded;

/// Builds a [`Document`] from markup text.
pub trait MarkupParser {
    /// Parses `markup`, or reports why it cannot be read as well-formed.
    fn parse(&self, markup: &str) -> Result<Document, Degraded>;
}

/// A parsed fragment or document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data in escaped form.
    Text(String),
    /// Doctype, comments and other markup written back verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attribute names and escaped values, in source order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// The escaped value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute from an already escaped value, keeping its position
    /// if present.
    pub fn set_attribute(&mut self, name: &str, escaped: impl Into<String>) {
        let escaped = escaped.into();
        match self
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, value)) => *value = escaped,
            None => self.attributes.push((name.to_string(), escaped)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).1)
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            if value.contains('"') {
                out.push_str(&value.replace('"', "&quot;"));
            } else {
                out.push_str(value);
            }
            out.push('"');
        }
        if self.self_closing && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_to(out),
            Node::Text(text) | Node::Raw(text) => out.push_str(text),
        }
    }
}

impl Document {
    /// Serializes the tree back to markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_to(&mut out);
        }
        out
    }

    /// Calls `f` on every element in document order, parents before children.
    pub fn for_each_element_mut<F: FnMut(&mut Element)>(&mut self, mut f: F) {
        fn walk<F: FnMut(&mut Element)>(nodes: &mut [Node], f: &mut F) {
            for node in nodes {
                if let Node::Element(element) = node {
                    f(element);
                    walk(&mut element.children, f);
                }
            }
        }
        walk(&mut self.nodes, &mut f);
    }

    /// Calls `f` on every element in document order.
    pub fn for_each_element<F: FnMut(&Element)>(&self, mut f: F) {
        fn walk<F: FnMut(&Element)>(nodes: &[Node], f: &mut F) {
            for node in nodes {
                if let Node::Element(element) = node {
                    f(element);
                    walk(&element.children, f);
                }
            }
        }
        walk(&self.nodes, &mut f);
    }
}
