//! Generic XML tree built from the service's response documents.
//!
//! Repeated elements always land in `children`, so a response holding one
//! `<item>` and one holding fifty look the same to callers.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::BggError;

/// One XML element with its attributes, text content and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Trimmed text content, `None` when the element has no text.
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// The `value` attribute of the first child with the given name, as used
    /// by `<minplayers value="2"/>`-style elements.
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.attr("value"))
    }

    /// Follow a path of child names from this node.
    pub fn descend(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }
}

/// Parse a complete XML document and return its root element.
pub fn parse_document(xml: &str) -> Result<XmlNode, BggError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                stack.push(element(e)?);
            }
            Event::Empty(ref e) => {
                let node = element(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                if let Some(top) = stack.last_mut() {
                    append_text(top, &text);
                }
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).to_string();
                if let Some(top) = stack.last_mut() {
                    append_text(top, &text);
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| BggError::malformed("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(BggError::malformed("document ended inside an element"));
    }
    root.ok_or_else(|| BggError::malformed("document has no root element"))
}

fn element(e: &BytesStart<'_>) -> Result<XmlNode, BggError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.trim().to_string();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn append_text(node: &mut XmlNode, text: &str) {
    if text.is_empty() {
        return;
    }
    match node.text.as_mut() {
        Some(existing) => existing.push_str(text),
        None => node.text = Some(text.to_string()),
    }
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), BggError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(BggError::malformed("document has more than one root element")),
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/xml_tests.rs"]
mod tests;
