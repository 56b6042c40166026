// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter Document Tree
//!
//! Reads the XML parameter document into a small owned element tree.
//! Only element names, nesting and text content are kept; attributes,
//! comments and processing instructions are dropped. The resolver needs
//! nothing else.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// One element of the parameter document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Element tag name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content directly inside this element, trimmed
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order
    #[inline]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child element with the given name
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first child with the given name, if that child exists
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.first_child(name).map(Element::text)
    }

    fn push_text(&mut self, text: &str) {
        if !self.text.is_empty() && !text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }
}

/// Parsed parameter document
#[derive(Debug, Clone, Default)]
pub struct ParamDocument {
    roots: Vec<Element>,
}

impl ParamDocument {
    /// Load and parse a parameter document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read parameter document");
        Self::parse_str(&content)
    }

    /// Parse a parameter document from a string
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut roots = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::Xml(format!("{} at byte {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    stack.push(Element::new(name));
                }
                Event::Empty(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    attach(&mut stack, &mut roots, Element::new(name));
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced closing tag".to_string()))?;
                    attach(&mut stack, &mut roots, element);
                }
                Event::Text(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(e.unescape()?.trim());
                    }
                }
                Event::CData(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(String::from_utf8_lossy(e).trim());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        Ok(Self { roots })
    }

    /// First top-level element with the given name
    pub fn root(&self, name: &str) -> Option<&Element> {
        self.roots.iter().find(|root| root.name == name)
    }

    /// All top-level elements
    pub fn roots(&self) -> &[Element] {
        &self.roots
    }
}

/// Attach a finished element to its parent, or to the document if it has none
fn attach(stack: &mut [Element], roots: &mut Vec<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => roots.push(element),
    }
}
