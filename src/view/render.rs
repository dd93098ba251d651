use super::{Action, Dispatch, EditDialog, InsertItem, NodeViewProps, Transaction, ViewError, Widget};
use crate::fields::{deserialize, to_serialized, FieldError};
use crate::model::{EditorSchema, Node, PROPS};
use crate::spec::{NodeKind, NodeSpec};
use log::*;
use serde_json::Value;

/// What performing an action led to
#[derive(Debug)]
pub enum Outcome {
    /// A transaction was handed to the dispatcher
    Dispatched,
    /// The edit form should be shown
    OpenDialog(EditDialog),
}

/// A component node at a position in the document, as seen by its view
#[derive(Debug, Clone, Copy)]
pub struct NodeViewContext<'a> {
    pub spec: &'a NodeSpec,
    pub schema: &'a EditorSchema,
    pub node: &'a Node,
    /// The position right before the node
    pub pos: usize,
    /// The node is selected, or lies completely within the selection
    pub is_selected: bool,
}

impl<'a> NodeViewContext<'a> {
    /// The stored props, validated against the component schema
    pub fn value(&self) -> Result<Value, FieldError> {
        let stored = self
            .node
            .props()
            .cloned()
            .unwrap_or_else(|| self.spec.default_props());
        deserialize(&stored, &self.spec.view.schema)
    }

    pub fn node_size(&self) -> usize {
        self.schema.node_size(self.node)
    }

    pub fn render(&self) -> Result<Widget, ViewError> {
        let value = self.value()?;
        let view = &self.spec.view;
        let content = if self.spec.has_content() {
            Some(Widget::Content)
        } else {
            None
        };
        let inner = match &view.node_view {
            Some(node_view) => node_view.render(NodeViewProps {
                value: &value,
                is_selected: self.is_selected,
                content,
            }),
            None if self.spec.inline => Widget::Placeholder {
                component: self.spec.name.clone(),
                selected: self.is_selected,
            },
            None => self.fallback(&value, content),
        };
        let props = self
            .node
            .props()
            .cloned()
            .unwrap_or_else(|| self.spec.default_props());
        Ok(Widget::DataWrapper {
            tag: self.spec.tag().to_owned(),
            component: self.spec.name.clone(),
            props: props.to_string(),
            child: Box::new(inner),
        })
    }

    fn fallback(&self, value: &Value, content: Option<Widget>) -> Widget {
        let view = &self.spec.view;
        let mut toolbar = vec![Widget::Label {
            text: view.label.clone(),
            action: Some(Action::Select),
        }];
        toolbar.extend(self.insert_affordance());
        if !view.schema.is_empty() {
            toolbar.push(Widget::Button {
                label: "Edit".to_owned(),
                action: Action::Edit,
            });
        }

        let mut children = vec![Widget::Toolbar { children: toolbar }];
        match &view.content_view {
            Some(content_view) => children.push(content_view.render(value, content)),
            None => children.extend(content),
        }
        Widget::Frame {
            selected: self.is_selected,
            children,
        }
    }

    /// The `Insert` control of a repeating node, while it can take more
    /// children
    fn insert_affordance(&self) -> Option<Widget> {
        if self.spec.kind != NodeKind::Repeating {
            return None;
        }
        self.schema.default_type_at_end(self.node)?;
        match self.spec.view.insert_items.as_slice() {
            [] => None,
            [only] => Some(Widget::Button {
                label: "Insert".to_owned(),
                action: Action::Insert {
                    node_type: only.key.clone(),
                },
            }),
            items => Some(Widget::Menu {
                label: "Insert".to_owned(),
                items: items.to_vec(),
            }),
        }
    }

    fn insert_item(&self, node_type: &str) -> Option<&InsertItem> {
        self.spec
            .view
            .insert_items
            .iter()
            .find(|item| item.key == node_type)
    }

    /// Replace the props of the node
    pub fn on_change(&self, value: &Value, dispatch: &mut dyn Dispatch) -> Result<(), FieldError> {
        let schema = &self.spec.view.schema;
        let value = deserialize(value, schema)?;
        dispatch.dispatch(Transaction::SetNodeAttribute {
            pos: self.pos,
            attr: PROPS.to_owned(),
            value: to_serialized(&value, schema),
        });
        Ok(())
    }

    /// Delete the node
    pub fn on_remove(&self, dispatch: &mut dyn Dispatch) {
        dispatch.dispatch(Transaction::Delete {
            from: self.pos,
            to: self.pos + self.node_size(),
        });
    }

    /// Append a default filled child of type `node_type`
    pub fn insert_child(&self, node_type: &str, dispatch: &mut dyn Dispatch) -> Result<(), ViewError> {
        let not_insertable = || ViewError::NotInsertable(node_type.to_owned());
        self.insert_item(node_type).ok_or_else(not_insertable)?;
        self.schema
            .default_type_at_end(self.node)
            .ok_or_else(not_insertable)?;
        let node = self
            .schema
            .create_and_fill(node_type)
            .ok_or_else(not_insertable)?;
        dispatch.dispatch(Transaction::Insert {
            pos: self.pos + self.node_size() - 1,
            node,
        });
        Ok(())
    }

    pub fn perform(&self, action: &Action, dispatch: &mut dyn Dispatch) -> Result<Outcome, ViewError> {
        debug!("{} at {}: {:?}", self.spec.name, self.pos, action);
        match action {
            Action::Select => {
                dispatch.dispatch(Transaction::SetNodeSelection { pos: self.pos });
            }
            Action::Edit => return Ok(Outcome::OpenDialog(EditDialog::open(self)?)),
            Action::Insert { node_type } => self.insert_child(node_type, dispatch)?,
            Action::Change { value } => self.on_change(value, dispatch)?,
            Action::Remove => self.on_remove(dispatch),
        }
        Ok(Outcome::Dispatched)
    }
}
