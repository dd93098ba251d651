//! # Component to node spec adapter
//!
//! Turns the content components of the CMS into the node and mark specs of
//! the editor. Every component gets a group name `component{i}` by its
//! position in the input, which is how repeating components refer to their
//! children in content expressions.

use crate::component::{ComponentDescriptor, ComponentInfo, ComponentSet, MarkComponent};
use crate::component::{MaxChildren, RepeatingComponent};
use crate::dom::ParseRule;
use crate::fields::{initial_value, to_serialized};
use crate::model::PROPS;
use crate::spec::{AttrSpec, AttrSpecs, EditorSpecs, InsertCommand, InsertMenu};
use crate::spec::{MarkSpec, NodeKind, NodeSpec};
use crate::util::Counter;
use crate::view::{InsertItem, ViewSpec};
use displaydoc::Display;
use indexmap::IndexMap;
use log::*;

/// Content of wrapper components
const BLOCK_CONTENT: &str = "block+";

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
/// component{0}
pub struct GroupName(u64);

impl From<u64> for GroupName {
    fn from(id: u64) -> GroupName {
        GroupName(id)
    }
}

/// The group name of every component, assigned in input order
#[derive(Debug, Clone)]
pub struct GroupIndex(IndexMap<String, GroupName>);

impl GroupIndex {
    pub fn new(components: &ComponentSet) -> Self {
        let mut next_id = Counter::<GroupName>::default();
        Self(
            components
                .names()
                .map(|name| (name.to_owned(), next_id.next()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<GroupName> {
        self.0.get(name).copied()
    }
}

/// Build all node and mark specs for a set of components
pub fn build(components: &ComponentSet) -> EditorSpecs {
    let groups = GroupIndex::new(components);
    let nodes = node_specs_with(components, &groups);
    let marks = mark_specs(components);
    debug!(
        "Built {} node specs and {} mark specs from {} components",
        nodes.len(),
        marks.len(),
        components.len()
    );
    EditorSpecs {
        nodes,
        marks,
        groups: groups
            .0
            .iter()
            .map(|(name, group)| (name.clone(), group.to_string()))
            .collect(),
    }
}

/// The node specs for all block, wrapper, inline and repeating components.
///
/// Components of other kinds are left out.
pub fn node_specs(components: &ComponentSet) -> IndexMap<String, NodeSpec> {
    node_specs_with(components, &GroupIndex::new(components))
}

fn node_specs_with(components: &ComponentSet, groups: &GroupIndex) -> IndexMap<String, NodeSpec> {
    components
        .iter()
        .filter_map(|(name, component)| {
            let spec = match component {
                ComponentDescriptor::Block(info) => {
                    block_spec(name, info, NodeKind::Block, None, groups)
                }
                ComponentDescriptor::Wrapper(info) => block_spec(
                    name,
                    info,
                    NodeKind::Wrapper,
                    Some(BLOCK_CONTENT.to_owned()),
                    groups,
                ),
                ComponentDescriptor::Inline(info) => inline_spec(name, info),
                ComponentDescriptor::Repeating(r) => repeating_spec(name, r, components, groups),
                ComponentDescriptor::Mark(_) => return None,
                ComponentDescriptor::Unknown => {
                    warn!(
                        "Component {:?} has an unknown kind and is left out of the editor",
                        name
                    );
                    return None;
                }
            };
            trace!("{} -> {:?} in {:?}", name, spec.kind, spec.group);
            Some((name.to_owned(), spec))
        })
        .collect()
}

/// The mark specs for all mark components
pub fn mark_specs(components: &ComponentSet) -> IndexMap<String, MarkSpec> {
    components
        .iter()
        .filter_map(|(name, component)| match component {
            ComponentDescriptor::Mark(mark) => Some((name.to_owned(), mark_spec(name, mark))),
            _ => None,
        })
        .collect()
}

fn props_attrs(info: &ComponentInfo) -> AttrSpecs {
    let default = to_serialized(&initial_value(&info.schema), &info.schema);
    let mut attrs = AttrSpecs::new();
    attrs.insert(PROPS.to_owned(), AttrSpec { default });
    attrs
}

fn insert_menu(info: &ComponentInfo) -> Option<InsertMenu> {
    if info.for_specific_locations {
        return None;
    }
    Some(InsertMenu {
        label: info.label.clone(),
        description: info.description.clone(),
        icon: info.icon.clone(),
        command: InsertCommand::InsertNode,
        for_toolbar: true,
    })
}

fn block_group(name: &str, info: &ComponentInfo, groups: &GroupIndex) -> String {
    let group = groups
        .get(name)
        .map(|g| g.to_string())
        .unwrap_or_default();
    if info.for_specific_locations {
        group
    } else {
        format!("block {}", group)
    }
}

fn block_spec(
    name: &str,
    info: &ComponentInfo,
    kind: NodeKind,
    content: Option<String>,
    groups: &GroupIndex,
) -> NodeSpec {
    NodeSpec {
        name: name.to_owned(),
        kind,
        group: block_group(name, info, groups),
        content,
        inline: false,
        defining: true,
        attrs: props_attrs(info),
        parse_dom: vec![ParseRule::new("div", name)],
        insert_menu: insert_menu(info),
        view: ViewSpec::new(info, Vec::new()),
    }
}

fn inline_spec(name: &str, info: &ComponentInfo) -> NodeSpec {
    NodeSpec {
        name: name.to_owned(),
        kind: NodeKind::Inline,
        group: "inline inline_component".to_owned(),
        content: None,
        inline: true,
        defining: false,
        attrs: props_attrs(info),
        parse_dom: vec![ParseRule::new("span", name)],
        insert_menu: insert_menu(info),
        view: ViewSpec::new(info, Vec::new()),
    }
}

/// The content expression `(componentA | componentB){min,max}`
fn repeating_content(
    name: &str,
    component: &RepeatingComponent,
    components: &ComponentSet,
    groups: &GroupIndex,
) -> (String, Vec<InsertItem>) {
    let mut alternatives = Vec::new();
    let mut items = Vec::new();
    for child in &component.children {
        let label = match components.get(child) {
            Some(ComponentDescriptor::Mark(_)) | Some(ComponentDescriptor::Unknown) | None => {
                warn!("Component {:?} cannot contain {:?}, skipping it", name, child);
                continue;
            }
            Some(other) => other.label().unwrap_or(child.as_str()).to_owned(),
        };
        if let Some(group) = groups.get(child) {
            alternatives.push(group.to_string());
            items.push(InsertItem {
                key: child.clone(),
                label,
            });
        }
    }
    if alternatives.is_empty() {
        warn!("Component {:?} has no children it can contain", name);
        return (String::new(), items);
    }

    let bounds = &component.validation.children;
    let max = match bounds.max {
        MaxChildren::Bounded(max) => max.to_string(),
        MaxChildren::Unbounded => String::new(),
    };
    let content = format!("({}){{{},{}}}", alternatives.join(" | "), bounds.min, max);
    (content, items)
}

fn repeating_spec(
    name: &str,
    component: &RepeatingComponent,
    components: &ComponentSet,
    groups: &GroupIndex,
) -> NodeSpec {
    let info = &component.info;
    let (content, items) = repeating_content(name, component, components, groups);
    NodeSpec {
        name: name.to_owned(),
        kind: NodeKind::Repeating,
        group: block_group(name, info, groups),
        content: Some(content),
        inline: false,
        defining: true,
        attrs: props_attrs(info),
        parse_dom: vec![ParseRule::new("div", name)],
        insert_menu: insert_menu(info),
        view: ViewSpec::new(info, items),
    }
}

fn mark_spec(name: &str, mark: &MarkComponent) -> MarkSpec {
    let tag = mark.tag.clone().unwrap_or_else(|| "span".to_owned());
    MarkSpec {
        name: name.to_owned(),
        attrs: props_attrs(&mark.info),
        parse_dom: vec![ParseRule::new(tag.clone(), name)],
        tag,
        class_name: mark.class_name.resolve(),
        style: mark.style.resolve(),
    }
}

#[cfg(test)]
mod tests;
