use super::{Attrs, Node};
use crate::content::{ContentExpr, TypeResolver};
use crate::spec::EditorSpecs;
use indexmap::IndexMap;
use log::*;

// Deep enough for any schema a component set produces
const MAX_FILL_DEPTH: usize = 16;

/// What the schema knows about one node type
#[derive(Debug, Clone)]
pub struct NodeTypeInfo {
    pub groups: Vec<String>,
    pub content: Option<ContentExpr>,
    pub inline: bool,
    pub attrs: Attrs,
}

impl NodeTypeInfo {
    fn base(group: &str, content: Option<&str>, inline: bool) -> Self {
        Self {
            groups: group.split_whitespace().map(str::to_owned).collect(),
            content: content.and_then(|c| c.parse().ok()),
            inline,
            attrs: Attrs::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.content.as_ref().map_or(true, ContentExpr::is_empty)
    }
}

/// The node types of an editor: the base nodes plus the component nodes
#[derive(Debug, Clone)]
pub struct EditorSchema {
    nodes: IndexMap<String, NodeTypeInfo>,
}

impl EditorSchema {
    pub fn new(specs: &EditorSpecs) -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert("doc".to_owned(), NodeTypeInfo::base("", Some("block+"), false));
        nodes.insert(
            "paragraph".to_owned(),
            NodeTypeInfo::base("block", Some("inline*"), false),
        );
        nodes.insert("text".to_owned(), NodeTypeInfo::base("inline", None, true));

        for (name, spec) in &specs.nodes {
            let content = match spec.content.as_deref().map(str::parse::<ContentExpr>) {
                None => None,
                Some(Ok(expr)) => Some(expr),
                Some(Err(e)) => {
                    error!("Invalid content expression for {}: {}", name, e);
                    continue;
                }
            };
            nodes.insert(
                name.clone(),
                NodeTypeInfo {
                    groups: spec.group.split_whitespace().map(str::to_owned).collect(),
                    content,
                    inline: spec.inline,
                    attrs: spec.default_attrs(),
                },
            );
        }
        Self { nodes }
    }

    pub fn node_type(&self, name: &str) -> Option<&NodeTypeInfo> {
        self.nodes.get(name)
    }

    /// The size of a node in prosemirror positions, using the schema to tell
    /// leaves from empty containers
    pub fn node_size(&self, node: &Node) -> usize {
        if let Some(text) = &node.text {
            return text.encode_utf16().count();
        }
        let leaf = self.node_type(&node.node_type).map_or(true, NodeTypeInfo::is_leaf);
        if leaf {
            1
        } else {
            node.content.iter().map(|n| self.node_size(n)).sum::<usize>() + 2
        }
    }

    /// Whether the children of `node` are valid for its type
    pub fn valid_content(&self, node: &Node) -> bool {
        match self.node_type(&node.node_type) {
            Some(info) => match &info.content {
                Some(expr) => expr.matches(&node.child_types(), self),
                None => node.content.is_empty(),
            },
            None => false,
        }
    }

    /// The type of node that can be appended to the content of `node`.
    ///
    /// `None` when the node is full or no allowed child can be created.
    pub fn default_type_at_end(&self, node: &Node) -> Option<String> {
        let expr = self.node_type(&node.node_type)?.content.as_ref()?;
        expr.default_type_after(&node.child_types(), self)
            .filter(|name| self.create_and_fill(name).is_some())
    }

    /// A node of type `name` with default attributes and the smallest valid
    /// content
    pub fn create_and_fill(&self, name: &str) -> Option<Node> {
        self.fill(name, 0)
    }

    fn fill(&self, name: &str, depth: usize) -> Option<Node> {
        if depth > MAX_FILL_DEPTH || name == "text" {
            return None;
        }
        let info = self.node_type(name)?;
        let mut node = Node::new(name);
        node.attrs = info.attrs.clone();
        if let Some(expr) = &info.content {
            for term in &expr.terms {
                for _ in 0..term.min {
                    let child = term
                        .choices
                        .iter()
                        .flat_map(|choice| self.members(choice))
                        .find_map(|member| self.fill(&member, depth + 1))?;
                    node.content.push(child);
                }
            }
        }
        Some(node)
    }
}

impl TypeResolver for EditorSchema {
    fn is_a(&self, node_type: &str, name: &str) -> bool {
        node_type == name
            || self
                .node_type(node_type)
                .map_or(false, |info| info.groups.iter().any(|g| g == name))
    }

    fn members(&self, name: &str) -> Vec<String> {
        if self.nodes.contains_key(name) {
            return vec![name.to_owned()];
        }
        self.nodes
            .iter()
            .filter(|(_, info)| info.groups.iter().any(|g| g == name))
            .map(|(n, _)| n.clone())
            .collect()
    }
}
