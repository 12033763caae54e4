//! Strict markup backend on `quick-xml`.
//!
//! Templates emit XHTML-compatible markup (void elements self-closed, numeric
//! character references only), so a well-formedness check is a good proxy
//! for "the fragment is intact". Unclosed or mismatched tags, stray end tags
//! and malformed attributes all degrade.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{Document, Element, MarkupParser, Node};
use crate::error::Degraded;

/// A [`MarkupParser`] that requires well-formed markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

fn utf8(bytes: &[u8]) -> Result<String, Degraded> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Degraded::markup(format!("invalid utf-8: {}", e)))
}

fn element_from(start: &BytesStart<'_>, self_closing: bool) -> Result<Element, Degraded> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    element.self_closing = self_closing;
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| {
            Degraded::markup(format!("malformed attribute on <{}>: {}", element.name, e))
        })?;
        element
            .attributes
            .push((utf8(attr.key.as_ref())?, utf8(&attr.value)?));
    }
    Ok(element)
}

/// Appends a finished node to the innermost open element, or the root.
fn push_node(stack: &mut [Element], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

impl MarkupParser for XmlParser {
    fn parse(&self, markup: &str) -> Result<Document, Degraded> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;

        let mut root = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                Degraded::markup(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;
            match event {
                Event::Start(start) => stack.push(element_from(&start, false)?),
                Event::Empty(start) => {
                    let element = element_from(&start, true)?;
                    push_node(&mut stack, &mut root, Node::Element(element));
                }
                Event::End(end) => {
                    let name = utf8(end.name().as_ref())?;
                    let element = match stack.pop() {
                        Some(element) if element.name == name => element,
                        _ => return Err(Degraded::markup(format!("unexpected </{}>", name))),
                    };
                    push_node(&mut stack, &mut root, Node::Element(element));
                }
                Event::Text(text) => {
                    let text = utf8(&text)?;
                    push_node(&mut stack, &mut root, Node::Text(text));
                }
                Event::CData(data) => {
                    let raw = format!("<![CDATA[{}]]>", utf8(&data)?);
                    push_node(&mut stack, &mut root, Node::Raw(raw));
                }
                Event::Comment(comment) => {
                    let raw = format!("<!--{}-->", utf8(&comment)?);
                    push_node(&mut stack, &mut root, Node::Raw(raw));
                }
                Event::DocType(doctype) => {
                    let raw = format!("<!DOCTYPE {}>", utf8(&doctype)?.trim());
                    push_node(&mut stack, &mut root, Node::Raw(raw));
                }
                Event::Decl(decl) => {
                    let raw = format!("<?{}?>", utf8(&decl)?);
                    push_node(&mut stack, &mut root, Node::Raw(raw));
                }
                Event::PI(pi) => {
                    let raw = format!("<?{}?>", utf8(&pi)?);
                    push_node(&mut stack, &mut root, Node::Raw(raw));
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(Degraded::markup(format!("unclosed <{}>", open.name)));
        }
        Ok(Document { nodes: root })
    }
}
