//! # The document model
//!
//! This module follows the general JSON serialization of prosemirror nodes,
//! without fixing the set of node types: component nodes are only known once
//! the editor schema is built from the component descriptors.
pub mod de;
mod schema;

pub use schema::{EditorSchema, NodeTypeInfo};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The attributes of a node or mark
pub type Attrs = IndexMap<String, Value>;

/// The name of the attribute holding a component's props
pub const PROPS: &str = "props";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Fragment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(
        default,
        deserialize_with = "de::deserialize_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
}

pub type Fragment = Vec<Node>;

impl Mark {
    pub fn new<S: Into<String>>(mark_type: S, props: Value) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert(PROPS.to_owned(), props);
        Self {
            mark_type: mark_type.into(),
            attrs,
        }
    }

    pub fn props(&self) -> Option<&Value> {
        self.attrs.get(PROPS)
    }
}

impl Node {
    pub fn new<S: Into<String>>(node_type: S) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: Attrs::new(),
            content: Fragment::new(),
            marks: Vec::new(),
            text: None,
        }
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text")
        }
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.attrs.insert(PROPS.to_owned(), props);
        self
    }

    pub fn with_content(mut self, content: Fragment) -> Self {
        self.content = content;
        self
    }

    pub fn props(&self) -> Option<&Value> {
        self.attrs.get(PROPS)
    }

    /// The type names of the direct children
    pub fn child_types(&self) -> Vec<&str> {
        self.content.iter().map(|n| n.node_type.as_str()).collect()
    }

    /// The size of the content, in prosemirror positions
    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::node_size).sum()
    }

    /// The size of this node, in prosemirror positions.
    ///
    /// Text counts UTF-16 code units; every other node counts its content
    /// plus an opening and a closing token, except leaves which count 1.
    /// Nodes without content are treated as leaves, see
    /// [`EditorSchema::node_size`] for the schema-aware variant.
    pub fn node_size(&self) -> usize {
        match &self.text {
            Some(text) => text.encode_utf16().count(),
            None if self.content.is_empty() => 1,
            None => self.content_size() + 2,
        }
    }
}
