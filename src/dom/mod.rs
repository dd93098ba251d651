//! # DOM representation
//!
//! Components are persisted in the document as elements that carry a
//! `data-component` and a `data-props` attribute. This module contains a
//! small element tree, the `toDOM` output shape and the parse rules that
//! recognize component elements again.
mod parse;

pub use parse::{DomParser, ParseMatch, ParseRule, RuleTarget};

use indexmap::IndexMap;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::fmt;

/// The attribute holding the component name
pub const DATA_COMPONENT: &str = "data-component";
/// The attribute holding the JSON encoded props
pub const DATA_PROPS: &str = "data-props";

/// Inline style properties, in insertion order
pub type Style = IndexMap<String, String>;

/// A node in a DOM tree
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element(Element),
    Text(String),
}

/// A DOM element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub class_name: Option<String>,
    pub style: Style,
    pub children: Vec<DomNode>,
}

impl Element {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomNode::Element(e) => fmt::Display::fmt(e, f),
            DomNode::Text(t) => f.write_str(&escape(t, false)),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (k, v) in &self.attributes {
            write!(f, " {}=\"{}\"", k, escape(v, true))?;
        }
        if let Some(class) = &self.class_name {
            write!(f, " class=\"{}\"", escape(class, true))?;
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            write!(f, " style=\"{}\"", escape(&style.join("; "), true))?;
        }
        write!(f, ">")?;
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// The output of a node's `toDOM`
///
/// Serializes to the array form `["div", {"data-component": ..}, 0]` where the
/// trailing `0` marks the hole that receives the node's content.
#[derive(Debug, Clone, PartialEq)]
pub struct DomOutputSpec {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub hole: bool,
}

impl DomOutputSpec {
    /// Render into an element, placing `content` into the hole
    pub fn to_element(&self, content: Vec<DomNode>) -> Element {
        Element {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children: if self.hole { content } else { Vec::new() },
            ..Element::default()
        }
    }
}

impl Serialize for DomOutputSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(if self.hole { 3 } else { 2 }))?;
        seq.serialize_element(&self.tag)?;
        seq.serialize_element(&self.attributes)?;
        if self.hole {
            seq.serialize_element(&0)?;
        }
        seq.end()
    }
}
