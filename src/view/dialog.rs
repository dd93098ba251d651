use super::{Dispatch, NodeViewContext, Transaction, ViewError};
use crate::fields::{deserialize, to_serialized, FieldError, Fields};
use crate::model::PROPS;
use log::*;
use serde_json::Value;

/// The modal form that edits the props of a component node.
///
/// Nothing reaches the document until [`EditDialog::save`]; a dismissed
/// dialog is simply dropped.
#[derive(Debug, Clone)]
pub struct EditDialog {
    pub heading: String,
    pos: usize,
    schema: Fields,
    draft: Value,
}

impl EditDialog {
    pub(super) fn open(ctx: &NodeViewContext<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            heading: format!("Edit {}", ctx.spec.view.label),
            pos: ctx.pos,
            schema: ctx.spec.view.schema.clone(),
            draft: ctx.value()?,
        })
    }

    /// The fields of the form
    pub fn fields(&self) -> &Fields {
        &self.schema
    }

    /// The value as currently edited
    pub fn value(&self) -> &Value {
        &self.draft
    }

    /// Change one top level field of the draft
    pub fn set_field(&mut self, key: &str, value: Value) -> Result<(), ViewError> {
        if !self.schema.contains_key(key) {
            return Err(ViewError::UnknownField(key.to_owned()));
        }
        let mut candidate = self.draft.clone();
        if let Some(map) = candidate.as_object_mut() {
            map.insert(key.to_owned(), value);
        }
        self.draft = deserialize(&candidate, &self.schema)?;
        Ok(())
    }

    /// Write the draft back to the node
    pub fn save(self, dispatch: &mut dyn Dispatch) -> Result<(), FieldError> {
        let value = deserialize(&self.draft, &self.schema)?;
        dispatch.dispatch(Transaction::SetNodeAttribute {
            pos: self.pos,
            attr: PROPS.to_owned(),
            value: to_serialized(&value, &self.schema),
        });
        Ok(())
    }

    /// Close the dialog without saving
    pub fn dismiss(self) {
        trace!("{} dismissed", self.heading);
    }
}
