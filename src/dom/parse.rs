use super::{Element, DATA_COMPONENT, DATA_PROPS};
use log::*;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// A rule that recognizes `tag[data-component="name"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRule {
    pub tag: String,
    pub component: String,
}

impl ParseRule {
    pub fn new<T: Into<String>, C: Into<String>>(tag: T, component: C) -> Self {
        Self {
            tag: tag.into(),
            component: component.into(),
        }
    }

    /// The CSS selector this rule stands for
    pub fn selector(&self) -> String {
        format!("{}[{}=\"{}\"]", self.tag, DATA_COMPONENT, self.component)
    }

    /// Whether the element is one of ours, regardless of its props
    pub fn matches(&self, element: &Element) -> bool {
        element.tag.eq_ignore_ascii_case(&self.tag)
            && element.get_attribute(DATA_COMPONENT) == Some(self.component.as_str())
    }

    /// The stored props of a matching element.
    ///
    /// Declines with `None` when the element does not match, or when
    /// `data-props` is absent, empty or not valid JSON.
    pub fn get_attrs(&self, element: &Element) -> Option<Value> {
        if !self.matches(element) {
            return None;
        }
        let props = element.get_attribute(DATA_PROPS).filter(|p| !p.is_empty())?;
        match serde_json::from_str(props) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Ignoring {} with invalid props: {}", self.selector(), e);
                None
            }
        }
    }
}

impl Serialize for ParseRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("tag", &self.selector())?;
        map.end()
    }
}

/// Whether a rule produces a node or a mark
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Node,
    Mark,
}

/// The result of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParseMatch {
    pub target: RuleTarget,
    pub component: String,
    pub props: Value,
}

/// All parse rules of an editor schema, tried in order
#[derive(Debug, Clone, Default)]
pub struct DomParser {
    rules: Vec<(RuleTarget, ParseRule)>,
}

impl DomParser {
    pub fn add_rule(&mut self, target: RuleTarget, rule: ParseRule) {
        self.rules.push((target, rule));
    }

    /// Find the first rule that accepts the element.
    ///
    /// `None` means the element is plain content.
    pub fn parse(&self, element: &Element) -> Option<ParseMatch> {
        self.rules.iter().find_map(|(target, rule)| {
            rule.get_attrs(element).map(|props| ParseMatch {
                target: *target,
                component: rule.component.clone(),
                props,
            })
        })
    }
}
