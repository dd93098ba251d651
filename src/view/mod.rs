//! # Interactive node views
//!
//! Every component node is shown on the editor canvas as an interactive
//! widget. A component may bring its own [`NodeView`]; otherwise the default
//! view draws a frame with the component's label, an `Edit` button that opens
//! a form for the props, and the node's content.
//!
//! Views never touch the document. User actions are turned into
//! [`Transaction`]s that are handed to a [`Dispatch`] implementation, which
//! is the editor engine's business.
mod dialog;
mod render;

pub use dialog::EditDialog;
pub use render::{NodeViewContext, Outcome};

use crate::component::ComponentInfo;
use crate::fields::{FieldError, Fields};
use crate::model::Node;
use displaydoc::Display;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A single change proposed to the editor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum Transaction {
    /// Replace one attribute of the node at `pos`
    SetNodeAttribute { pos: usize, attr: String, value: Value },
    /// Delete the range `from..to`
    Delete { from: usize, to: usize },
    /// Select the node at `pos`
    SetNodeSelection { pos: usize },
    /// Insert `node` at `pos`
    Insert { pos: usize, node: Node },
}

/// Something that applies transactions to the document
pub trait Dispatch {
    fn dispatch(&mut self, tr: Transaction);
}

impl Dispatch for Vec<Transaction> {
    fn dispatch(&mut self, tr: Transaction) {
        self.push(tr);
    }
}

/// What a widget does when it is activated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Select the node
    Select,
    /// Open the edit form
    Edit,
    /// Append a child of the given type
    Insert { node_type: String },
    /// Replace the props
    Change { value: Value },
    /// Remove the node
    Remove,
}

/// A choice in an insert menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertItem {
    /// The component name to insert
    pub key: String,
    pub label: String,
}

/// The render output of a node view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    /// The element that carries `data-component` and `data-props`
    DataWrapper {
        tag: String,
        component: String,
        props: String,
        child: Box<Widget>,
    },
    /// A bordered box, highlighted while the node is selected
    Frame { selected: bool, children: Vec<Widget> },
    Toolbar { children: Vec<Widget> },
    Label { text: String, action: Option<Action> },
    Button { label: String, action: Action },
    /// A button that opens a menu; picking an item inserts that component
    Menu { label: String, items: Vec<InsertItem> },
    /// Where the node's own content is rendered
    Content,
    /// An inline component without a custom view
    Placeholder { component: String, selected: bool },
    Text { text: String },
    Group { children: Vec<Widget> },
}

impl Widget {
    fn children(&self) -> Vec<&Widget> {
        match self {
            Widget::DataWrapper { child, .. } => vec![child],
            Widget::Frame { children, .. }
            | Widget::Toolbar { children }
            | Widget::Group { children } => children.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Find the first widget, depth first, that satisfies `pred`
    pub fn find<P: Fn(&Widget) -> bool + Copy>(&self, pred: P) -> Option<&Widget> {
        if pred(self) {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(pred))
    }

    /// The button with the given label
    pub fn button(&self, label: &str) -> Option<&Action> {
        match self.find(|w| matches!(w, Widget::Button { label: l, .. } if l == label))? {
            Widget::Button { action, .. } => Some(action),
            _ => None,
        }
    }
}

/// The props handed to a custom node view
#[derive(Debug)]
pub struct NodeViewProps<'a> {
    /// The current, validated props
    pub value: &'a Value,
    pub is_selected: bool,
    /// The node's content, for components that have one
    pub content: Option<Widget>,
}

/// A custom interactive renderer for a component.
///
/// Buttons in the returned tree carry [`Action::Change`] and
/// [`Action::Remove`], which the editor turns into transactions.
pub trait NodeView: fmt::Debug + Send + Sync {
    fn render(&self, props: NodeViewProps<'_>) -> Widget;
}

/// A custom renderer for the content area of the default view
pub trait ContentView: fmt::Debug + Send + Sync {
    fn render(&self, value: &Value, content: Option<Widget>) -> Widget;
}

/// The view related part of a node spec
#[derive(Debug, Clone, Default)]
pub struct ViewSpec {
    pub label: String,
    pub schema: Fields,
    pub node_view: Option<Arc<dyn NodeView>>,
    pub content_view: Option<Arc<dyn ContentView>>,
    /// The components a repeating node can insert
    pub insert_items: Vec<InsertItem>,
}

impl ViewSpec {
    pub fn new(info: &ComponentInfo, insert_items: Vec<InsertItem>) -> Self {
        Self {
            label: info.label.clone(),
            schema: info.schema.clone(),
            node_view: info.node_view.clone(),
            content_view: info.content_view.clone(),
            insert_items,
        }
    }
}

/// Error when acting on a node view
#[derive(Debug, Error, Display, PartialEq)]
pub enum ViewError {
    /// Invalid props: {0}
    Field(#[from] FieldError),
    /// `{0}` cannot be inserted here
    NotInsertable(String),
    /// The form has no field `{0}`
    UnknownField(String),
}
