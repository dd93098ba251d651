//! # Field schemas
//!
//! The part of the CMS field schema that the editor needs: every component
//! declares its `props` as an ordered set of fields. This module produces the
//! initial value for such a schema and converts values to and from the form
//! that is persisted in the `data-props` attribute.

use displaydoc::Display;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// The fields of an object schema, in declaration order
pub type Fields = IndexMap<String, Field>;

/// A single field in a component schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    /// The label shown in the edit form
    #[serde(default)]
    pub label: String,
    /// What kind of value this field holds
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// An option of a select field
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// The kind of a field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        #[serde(default)]
        default: String,
        #[serde(default)]
        multiline: bool,
    },
    Integer {
        #[serde(default)]
        default: i64,
    },
    Number {
        #[serde(default)]
        default: f64,
    },
    Checkbox {
        #[serde(default)]
        default: bool,
    },
    Select {
        options: Vec<SelectOption>,
        #[serde(default)]
        default: Option<String>,
    },
    Url,
    Object {
        fields: Fields,
    },
    Array {
        element: Box<Field>,
    },
}

/// Error when a value does not fit its schema
#[derive(Debug, Error, Display, PartialEq, Eq)]
pub enum FieldError {
    /// Expected {expected} at `{path}`
    TypeMismatch { path: String, expected: &'static str },
    /// `{value}` is not an option of the select field at `{path}`
    InvalidOption { path: String, value: String },
    /// The select field at `{path}` has no options
    NoOptions { path: String },
}

impl Field {
    pub fn new<S: Into<String>>(label: S, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    pub fn text<S: Into<String>>(label: S) -> Self {
        Self::new(
            label,
            FieldKind::Text {
                default: String::new(),
                multiline: false,
            },
        )
    }

    pub fn integer<S: Into<String>>(label: S, default: i64) -> Self {
        Self::new(label, FieldKind::Integer { default })
    }

    pub fn checkbox<S: Into<String>>(label: S, default: bool) -> Self {
        Self::new(label, FieldKind::Checkbox { default })
    }

    /// The value a freshly inserted component starts with
    pub fn initial_value(&self) -> Value {
        match &self.kind {
            FieldKind::Text { default, .. } => Value::String(default.clone()),
            FieldKind::Integer { default } => Value::from(*default),
            FieldKind::Number { default } => Value::from(*default),
            FieldKind::Checkbox { default } => Value::Bool(*default),
            FieldKind::Select { options, default } => {
                let value = default
                    .clone()
                    .or_else(|| options.first().map(|o| o.value.clone()))
                    .unwrap_or_default();
                Value::String(value)
            }
            FieldKind::Url => Value::Null,
            FieldKind::Object { fields } => initial_value(fields),
            FieldKind::Array { .. } => Value::Array(Vec::new()),
        }
    }

    fn check(&self, path: &str) -> Result<(), FieldError> {
        match &self.kind {
            FieldKind::Select { options, .. } if options.is_empty() => Err(FieldError::NoOptions {
                path: path.to_owned(),
            }),
            FieldKind::Select {
                options,
                default: Some(default),
            } if !options.iter().any(|o| &o.value == default) => Err(FieldError::InvalidOption {
                path: path.to_owned(),
                value: default.clone(),
            }),
            FieldKind::Object { fields } => check_at(path, fields),
            FieldKind::Array { element } => element.check(&format!("{}[]", path)),
            _ => Ok(()),
        }
    }

    fn serialize(&self, value: Option<&Value>) -> Value {
        let value = match value {
            Some(value) => value,
            None => return self.initial_value(),
        };
        match &self.kind {
            FieldKind::Object { fields } => to_serialized(value, fields),
            FieldKind::Array { element } => match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .map(|item| element.serialize(Some(item)))
                        .collect(),
                ),
                _ => Value::Array(Vec::new()),
            },
            _ => value.clone(),
        }
    }

    fn deserialize(&self, path: &str, value: Option<&Value>) -> Result<Value, FieldError> {
        let value = match value {
            Some(value) => value,
            None => return Ok(self.initial_value()),
        };
        let mismatch = |expected| FieldError::TypeMismatch {
            path: path.to_owned(),
            expected,
        };
        match &self.kind {
            FieldKind::Text { .. } if value.is_string() => Ok(value.clone()),
            FieldKind::Text { .. } => Err(mismatch("a string")),
            FieldKind::Integer { .. } if value.is_i64() || value.is_u64() => Ok(value.clone()),
            FieldKind::Integer { .. } => Err(mismatch("an integer")),
            FieldKind::Number { .. } if value.is_number() => Ok(value.clone()),
            FieldKind::Number { .. } => Err(mismatch("a number")),
            FieldKind::Checkbox { .. } if value.is_boolean() => Ok(value.clone()),
            FieldKind::Checkbox { .. } => Err(mismatch("a boolean")),
            FieldKind::Select { options, .. } => {
                let s = value.as_str().ok_or_else(|| mismatch("a string"))?;
                if options.iter().any(|o| o.value == s) {
                    Ok(value.clone())
                } else {
                    Err(FieldError::InvalidOption {
                        path: path.to_owned(),
                        value: s.to_owned(),
                    })
                }
            }
            FieldKind::Url if value.is_null() || value.is_string() => Ok(value.clone()),
            FieldKind::Url => Err(mismatch("a url or null")),
            FieldKind::Object { fields } => deserialize_at(path, value, fields),
            FieldKind::Array { element } => {
                let items = value.as_array().ok_or_else(|| mismatch("an array"))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| element.deserialize(&format!("{}[{}]", path, i), Some(item)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }
}

/// The initial value of the object schema made up of `fields`
pub fn initial_value(fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(key, field)| (key.clone(), field.initial_value()))
        .collect();
    Value::Object(map)
}

/// Convert a props value into the form stored in the document.
///
/// Only the keys of the schema survive, in schema order. Missing keys take
/// their initial value.
pub fn to_serialized(value: &Value, fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(key, field)| (key.clone(), field.serialize(value.get(key))))
        .collect();
    Value::Object(map)
}

/// Validate a stored props value against the schema.
pub fn deserialize(value: &Value, fields: &Fields) -> Result<Value, FieldError> {
    deserialize_at("", value, fields)
}

/// Check that the initial value of a schema is one the schema accepts.
///
/// Fails for select fields without options or with a default that is not
/// one of them.
pub fn check(fields: &Fields) -> Result<(), FieldError> {
    check_at("", fields)
}

fn check_at(path: &str, fields: &Fields) -> Result<(), FieldError> {
    fields
        .iter()
        .try_for_each(|(key, field)| field.check(&child_path(path, key)))
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{}.{}", path, key)
    }
}

fn deserialize_at(path: &str, value: &Value, fields: &Fields) -> Result<Value, FieldError> {
    let object = value.as_object().ok_or_else(|| FieldError::TypeMismatch {
        path: path.to_owned(),
        expected: "an object",
    })?;
    let mut map = Map::new();
    for (key, field) in fields {
        let value = object.get(key).filter(|v| !is_missing(field, v));
        let v = field.deserialize(&child_path(path, key), value)?;
        map.insert(key.clone(), v);
    }
    Ok(Value::Object(map))
}

// `null` only means "unset" for fields that cannot hold it
fn is_missing(field: &Field, value: &Value) -> bool {
    value.is_null() && field.kind != FieldKind::Url
}
