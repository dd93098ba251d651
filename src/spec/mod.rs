//! # Node and mark specifications
//!
//! These are the artifacts the editor engine builds its schema from: which
//! groups a node belongs to, what it may contain, its attribute defaults, and
//! how it is written to and read back from the DOM.

use crate::component::PropsFn;
use crate::dom::{DomOutputSpec, DomParser, Element, ParseRule, RuleTarget, Style};
use crate::dom::{DATA_COMPONENT, DATA_PROPS};
use crate::model::{Attrs, EditorSchema, Mark, Node, PROPS};
use crate::view::ViewSpec;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::ops::Not;

/// The default value of one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttrSpec {
    pub default: Value,
}

pub type AttrSpecs = IndexMap<String, AttrSpec>;

/// The command run by an insert menu entry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertCommand {
    InsertNode,
}

/// An entry in the editor's insert menu
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMenu {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub command: InsertCommand,
    pub for_toolbar: bool,
}

/// Which component kind a node spec was built from
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Block,
    Wrapper,
    Inline,
    Repeating,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(skip)]
    pub name: String,
    pub kind: NodeKind,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Not::not")]
    pub inline: bool,
    #[serde(skip_serializing_if = "Not::not")]
    pub defining: bool,
    pub attrs: AttrSpecs,
    #[serde(rename = "parseDOM")]
    pub parse_dom: Vec<ParseRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_menu: Option<InsertMenu>,
    #[serde(skip)]
    pub view: ViewSpec,
}

fn props_or_default<'a>(attrs: &'a Attrs, specs: &'a AttrSpecs) -> &'a Value {
    attrs
        .get(PROPS)
        .or_else(|| specs.get(PROPS).map(|a| &a.default))
        .unwrap_or(&Value::Null)
}

fn parse_with(rules: &[ParseRule], element: &Element) -> Option<Attrs> {
    rules.iter().find_map(|rule| {
        rule.get_attrs(element).map(|props| {
            let mut attrs = Attrs::new();
            attrs.insert(PROPS.to_owned(), props);
            attrs
        })
    })
}

impl NodeSpec {
    /// The element tag used for this node
    pub fn tag(&self) -> &'static str {
        if self.inline {
            "span"
        } else {
            "div"
        }
    }

    /// Whether the node has editable content.
    ///
    /// An empty content expression makes a leaf, which has no content hole.
    pub fn has_content(&self) -> bool {
        self.content.as_deref().map_or(false, |c| !c.trim().is_empty())
    }

    /// The stored props a new node starts with
    pub fn default_props(&self) -> Value {
        self.attrs
            .get(PROPS)
            .map(|a| a.default.clone())
            .unwrap_or(Value::Null)
    }

    /// The default attributes of a new node
    pub fn default_attrs(&self) -> Attrs {
        self.attrs
            .iter()
            .map(|(k, a)| (k.clone(), a.default.clone()))
            .collect()
    }

    /// A node of this type with the given (or default) props and no content
    pub fn create(&self, props: Option<Value>) -> Node {
        Node::new(self.name.clone()).with_props(props.unwrap_or_else(|| self.default_props()))
    }

    pub fn to_dom(&self, node: &Node) -> DomOutputSpec {
        let props = props_or_default(&node.attrs, &self.attrs);
        let mut attributes = IndexMap::new();
        attributes.insert(DATA_COMPONENT.to_owned(), self.name.clone());
        attributes.insert(DATA_PROPS.to_owned(), props.to_string());
        DomOutputSpec {
            tag: self.tag().to_owned(),
            attributes,
            hole: self.has_content(),
        }
    }

    /// The attributes of a DOM element that one of this node's rules accepts
    pub fn parse(&self, element: &Element) -> Option<Attrs> {
        parse_with(&self.parse_dom, element)
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSpec {
    #[serde(skip)]
    pub name: String,
    pub attrs: AttrSpecs,
    #[serde(skip)]
    pub tag: String,
    #[serde(skip)]
    pub class_name: PropsFn<Option<String>>,
    #[serde(skip)]
    pub style: PropsFn<Style>,
    #[serde(rename = "parseDOM")]
    pub parse_dom: Vec<ParseRule>,
}

impl fmt::Debug for MarkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkSpec")
            .field("name", &self.name)
            .field("attrs", &self.attrs)
            .field("tag", &self.tag)
            .field("parse_dom", &self.parse_dom)
            .finish()
    }
}

impl MarkSpec {
    /// A fresh element for a mark, carrying the derived class and style
    pub fn to_dom(&self, mark: &Mark) -> Element {
        let props = props_or_default(&mark.attrs, &self.attrs);
        let mut element = Element::new(self.tag.clone());
        element.set_attribute(DATA_COMPONENT, self.name.clone());
        element.set_attribute(DATA_PROPS, props.to_string());
        element.class_name = (self.class_name)(props).filter(|c| !c.is_empty());
        element.style = (self.style)(props);
        element
    }

    pub fn parse(&self, element: &Element) -> Option<Attrs> {
        parse_with(&self.parse_dom, element)
    }

    /// A mark of this type with default props
    pub fn create(&self) -> Mark {
        let props = self
            .attrs
            .get(PROPS)
            .map(|a| a.default.clone())
            .unwrap_or(Value::Null);
        Mark::new(self.name.clone(), props)
    }
}

/// Everything the adapter produces for one set of components
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditorSpecs {
    pub nodes: IndexMap<String, NodeSpec>,
    pub marks: IndexMap<String, MarkSpec>,
    /// The group each component name is known by in content expressions
    pub groups: IndexMap<String, String>,
}

impl EditorSpecs {
    /// A parser trying all node rules, then all mark rules
    pub fn parser(&self) -> DomParser {
        let mut parser = DomParser::default();
        for spec in self.nodes.values() {
            for rule in &spec.parse_dom {
                parser.add_rule(RuleTarget::Node, rule.clone());
            }
        }
        for spec in self.marks.values() {
            for rule in &spec.parse_dom {
                parser.add_rule(RuleTarget::Mark, rule.clone());
            }
        }
        parser
    }

    /// The editor schema made of the base nodes and these component nodes
    pub fn schema(&self) -> EditorSchema {
        EditorSchema::new(self)
    }

    /// The entries of the insert menu, in component order
    pub fn insert_menu(&self) -> impl Iterator<Item = (&str, &InsertMenu)> {
        self.nodes
            .iter()
            .filter_map(|(name, spec)| spec.insert_menu.as_ref().map(|m| (name.as_str(), m)))
    }
}
