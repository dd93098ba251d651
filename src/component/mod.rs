//! # Content components
//!
//! A content component is the CMS's description of something that can be
//! placed into rich text: a block, a wrapper around other blocks, an inline
//! element, a repeating container of other components, or a mark.
mod derived;

pub use derived::{Derived, PropsFn};

use crate::dom::Style;
use crate::fields::{self, FieldError, Fields};
use crate::view::{ContentView, NodeView};
use derive_new::new;
use displaydoc::Display;
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Fields shared by all component kinds
#[derive(Debug, Clone, Deserialize, new)]
pub struct ComponentInfo {
    /// The name shown to editors
    pub label: String,
    /// The fields of the component's props
    #[serde(default)]
    #[new(default)]
    pub schema: Fields,
    #[serde(default)]
    #[new(default)]
    pub icon: Option<String>,
    #[serde(default)]
    #[new(default)]
    pub description: Option<String>,
    /// Only insertable in places that name the component explicitly
    #[serde(default, alias = "forSpecificLocations")]
    #[new(default)]
    pub for_specific_locations: bool,
    /// Replaces the whole interactive view of the node
    #[serde(skip)]
    #[new(default)]
    pub node_view: Option<Arc<dyn NodeView>>,
    /// Replaces the content area of the default view
    #[serde(skip)]
    #[new(default)]
    pub content_view: Option<Arc<dyn ContentView>>,
}

/// The upper bound on the children of a repeating component
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MaxChildren {
    Bounded(usize),
    Unbounded,
}

impl Default for MaxChildren {
    fn default() -> Self {
        MaxChildren::Unbounded
    }
}

impl MaxChildren {
    pub fn limit(self) -> Option<usize> {
        match self {
            MaxChildren::Bounded(n) => Some(n),
            MaxChildren::Unbounded => None,
        }
    }
}

impl<'de> Deserialize<'de> for MaxChildren {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Float(f64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(MaxChildren::Bounded(n as usize)),
            Raw::Float(f) if f.is_infinite() && f > 0.0 => Ok(MaxChildren::Unbounded),
            Raw::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(MaxChildren::Bounded(f as usize)),
            Raw::Float(f) => Err(de::Error::custom(format!("invalid child limit {}", f))),
            Raw::Str(s) => match s.as_str() {
                "Infinity" | "infinity" | "inf" => Ok(MaxChildren::Unbounded),
                _ => Err(de::Error::custom(format!("invalid child limit {:?}", s))),
            },
        }
    }
}

/// Cardinality bounds of a repeating component's children
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChildCount {
    #[serde(default)]
    pub min: usize,
    #[serde(default)]
    pub max: MaxChildren,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepeatingValidation {
    #[serde(default)]
    pub children: ChildCount,
}

/// A component whose content is a list of other components
#[derive(Debug, Clone, Deserialize, new)]
pub struct RepeatingComponent {
    #[serde(flatten)]
    pub info: ComponentInfo,
    /// The names of the components that may appear as children
    pub children: Vec<String>,
    #[serde(default)]
    #[new(default)]
    pub validation: RepeatingValidation,
}

/// Inline formatting applied to a run of text
#[derive(Debug, Clone, Deserialize, new)]
pub struct MarkComponent {
    #[serde(flatten)]
    pub info: ComponentInfo,
    /// The element to render, `span` when not set
    #[serde(default)]
    #[new(default)]
    pub tag: Option<String>,
    #[serde(default, alias = "className")]
    #[new(default)]
    pub class_name: Derived<Option<String>>,
    #[serde(default)]
    #[new(default)]
    pub style: Derived<Style>,
}

/// The description of one content component
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentDescriptor {
    Block(ComponentInfo),
    Wrapper(ComponentInfo),
    Inline(ComponentInfo),
    Repeating(RepeatingComponent),
    Mark(MarkComponent),
    /// A kind this version does not know about
    #[serde(other)]
    Unknown,
}

impl ComponentDescriptor {
    pub fn info(&self) -> Option<&ComponentInfo> {
        match self {
            Self::Block(info) | Self::Wrapper(info) | Self::Inline(info) => Some(info),
            Self::Repeating(r) => Some(&r.info),
            Self::Mark(m) => Some(&m.info),
            Self::Unknown => None,
        }
    }

    pub fn info_mut(&mut self) -> Option<&mut ComponentInfo> {
        match self {
            Self::Block(info) | Self::Wrapper(info) | Self::Inline(info) => Some(info),
            Self::Repeating(r) => Some(&mut r.info),
            Self::Mark(m) => Some(&mut m.info),
            Self::Unknown => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.info().map(|info| info.label.as_str())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Block(_) => "block",
            Self::Wrapper(_) => "wrapper",
            Self::Inline(_) => "inline",
            Self::Repeating(_) => "repeating",
            Self::Mark(_) => "mark",
            Self::Unknown => "unknown",
        }
    }

    /// Attach a custom interactive renderer
    pub fn with_node_view(mut self, view: Arc<dyn NodeView>) -> Self {
        if let Some(info) = self.info_mut() {
            info.node_view = Some(view);
        }
        self
    }

    /// Attach a custom renderer for the content area of the default view
    pub fn with_content_view(mut self, view: Arc<dyn ContentView>) -> Self {
        if let Some(info) = self.info_mut() {
            info.content_view = Some(view);
        }
        self
    }
}

/// Error in a set of component descriptors
#[derive(Debug, Error, Display, PartialEq, Eq)]
pub enum ComponentError {
    /// Component `{0}` has no children to repeat
    NoChildren(String),
    /// Component `{parent}` lists unknown child `{child}`
    UnknownChild { parent: String, child: String },
    /// Component `{parent}` lists `{child}`, which is a mark
    MarkChild { parent: String, child: String },
    /// Component `{0}` requires more children than it allows
    InvalidBounds(String),
    /// Component `{component}` has an invalid schema: {source}
    InvalidSchema {
        component: String,
        source: FieldError,
    },
}

/// The components of an editor, in declaration order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ComponentSet(IndexMap<String, ComponentDescriptor>);

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, component: ComponentDescriptor) {
        self.0.insert(name.into(), component);
    }

    pub fn with<S: Into<String>>(mut self, name: S, component: ComponentDescriptor) -> Self {
        self.insert(name, component);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentDescriptor)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the references between components.
    ///
    /// The adapter itself is lenient; this is for configuration authors who
    /// want mistakes reported instead of skipped.
    pub fn check(&self) -> Result<(), ComponentError> {
        for (name, component) in self.iter() {
            if let Some(info) = component.info() {
                fields::check(&info.schema).map_err(|source| ComponentError::InvalidSchema {
                    component: name.to_owned(),
                    source,
                })?;
            }
            let repeating = match component {
                ComponentDescriptor::Repeating(r) => r,
                _ => continue,
            };
            if repeating.children.is_empty() {
                return Err(ComponentError::NoChildren(name.to_owned()));
            }
            for child in &repeating.children {
                match self.get(child) {
                    None | Some(ComponentDescriptor::Unknown) => {
                        return Err(ComponentError::UnknownChild {
                            parent: name.to_owned(),
                            child: child.clone(),
                        })
                    }
                    Some(ComponentDescriptor::Mark(_)) => {
                        return Err(ComponentError::MarkChild {
                            parent: name.to_owned(),
                            child: child.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
            let bounds = &repeating.validation.children;
            if let Some(max) = bounds.max.limit() {
                if bounds.min > max {
                    return Err(ComponentError::InvalidBounds(name.to_owned()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_from_json() {
        let set: ComponentSet = serde_json::from_value(json!({
            "note": {
                "kind": "block",
                "label": "Note",
                "forSpecificLocations": true,
                "schema": { "title": { "kind": "text", "label": "Title" } }
            },
            "items": {
                "kind": "repeating",
                "label": "Items",
                "children": ["note"],
                "validation": { "children": { "min": 1, "max": "Infinity" } }
            },
            "future": { "kind": "carousel", "label": "Carousel" },
            "hl": { "kind": "mark", "label": "Highlight", "className": "hl" }
        }))
        .unwrap();

        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["note", "items", "future", "hl"]);

        let note = set.get("note").unwrap();
        assert_eq!(note.kind_name(), "block");
        assert!(note.info().unwrap().for_specific_locations);
        assert_eq!(note.info().unwrap().schema.len(), 1);

        match set.get("items").unwrap() {
            ComponentDescriptor::Repeating(r) => {
                assert_eq!(r.children, vec!["note"]);
                assert_eq!(r.validation.children.min, 1);
                assert_eq!(r.validation.children.max, MaxChildren::Unbounded);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(set.get("future"), Some(ComponentDescriptor::Unknown)));
        match set.get("hl").unwrap() {
            ComponentDescriptor::Mark(m) => {
                assert_eq!(m.class_name.resolve()(&json!({})), Some("hl".to_owned()))
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(set.check(), Ok(()));
    }

    #[test]
    fn test_max_children() {
        let parse = |v| serde_json::from_value::<MaxChildren>(v);
        assert_eq!(parse(json!(3)).unwrap(), MaxChildren::Bounded(3));
        assert_eq!(parse(json!(3.0)).unwrap(), MaxChildren::Bounded(3));
        assert_eq!(parse(json!("Infinity")).unwrap(), MaxChildren::Unbounded);
        assert!(parse(json!(-1)).is_err());
        assert!(parse(json!("lots")).is_err());
        assert_eq!(ChildCount::default().max, MaxChildren::Unbounded);
    }

    #[test]
    fn test_check() {
        let block = || ComponentDescriptor::Block(ComponentInfo::new("Block".into()));
        let repeating = |children: Vec<&str>, min, max| {
            let mut r = RepeatingComponent::new(
                ComponentInfo::new("List".into()),
                children.into_iter().map(String::from).collect(),
            );
            r.validation.children = ChildCount { min, max };
            ComponentDescriptor::Repeating(r)
        };

        let set = ComponentSet::new()
            .with("a", block())
            .with("list", repeating(vec!["a", "b"], 0, MaxChildren::Unbounded));
        assert_eq!(
            set.check(),
            Err(ComponentError::UnknownChild {
                parent: "list".into(),
                child: "b".into()
            })
        );

        let set = ComponentSet::new()
            .with("a", block())
            .with("list", repeating(vec!["a"], 4, MaxChildren::Bounded(2)));
        assert_eq!(set.check(), Err(ComponentError::InvalidBounds("list".into())));

        let set = ComponentSet::new().with("list", repeating(vec![], 0, MaxChildren::Unbounded));
        assert_eq!(set.check(), Err(ComponentError::NoChildren("list".into())));
    }

    #[test]
    fn test_check_schema() {
        let set: ComponentSet = serde_json::from_value(json!({
            "callout": {
                "kind": "block",
                "label": "Callout",
                "schema": {
                    "tone": {
                        "kind": "select",
                        "options": [{ "label": "Info", "value": "info" }],
                        "default": "loud"
                    }
                }
            }
        }))
        .unwrap();
        assert_eq!(
            set.check(),
            Err(ComponentError::InvalidSchema {
                component: "callout".into(),
                source: FieldError::InvalidOption {
                    path: "tone".into(),
                    value: "loud".into(),
                },
            })
        );

        let set: ComponentSet = serde_json::from_value(json!({
            "hl": {
                "kind": "mark",
                "label": "Highlight",
                "schema": { "color": { "kind": "select", "options": [] } }
            }
        }))
        .unwrap();
        assert_eq!(
            set.check(),
            Err(ComponentError::InvalidSchema {
                component: "hl".into(),
                source: FieldError::NoOptions {
                    path: "color".into(),
                },
            })
        );
    }
}
