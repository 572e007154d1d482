//! Document tree arena
//!
//! The tree is an arena of nodes keyed by stable handles: a node's identity
//! never changes while positions are recomputed on demand, so block ids
//! survive arbitrary structural edits. Four node kinds compose the
//! document:
//!
//! - `Doc`: the root; its children are block containers
//! - `Container`: one logical block, holding exactly one content child and
//!   at most one group child
//! - `Group`: the nested children of a block; exists only while non-empty
//! - `Content`: the typed content of a block
//!
//! Position arithmetic follows a token scheme: every non-root node owns an
//! opening and a closing token, and inline text contributes one position
//! per character.

use std::collections::HashMap;

use uuid::Uuid;

use crate::errors::{BlockDocError, Result};
use crate::model::content::BlockContent;

/// Stable handle to a node in the arena; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Attributes carried by a block container
///
/// `depth` and `depth_change` are transient hints used only for cross-paste
/// depth adjustment; they are dropped when the block is projected to its
/// portable representation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerAttrs {
    /// Stable block id, unique within the document, never reused
    pub id: String,
    /// Free-form label; not required to be unique
    pub alias: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub depth: Option<i64>,
    pub depth_change: Option<i64>,
}

impl ContainerAttrs {
    /// Attrs for a fresh block with a generated id
    pub fn with_fresh_id() -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            ..Self::default()
        }
    }

    /// Attrs for a block with a caller-supplied id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Doc {
        children: Vec<NodeId>,
    },
    Container {
        attrs: ContainerAttrs,
        content: NodeId,
        group: Option<NodeId>,
    },
    Group {
        children: Vec<NodeId>,
    },
    Content(BlockContent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// The document tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty document
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                parent: None,
                kind: NodeKind::Doc {
                    children: Vec::new(),
                },
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub(crate) fn expect_node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| BlockDocError::internal(format!("node {} missing from arena", id)))
    }

    pub(crate) fn expect_node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| BlockDocError::internal(format!("node {} missing from arena", id)))
    }

    fn alloc(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node { parent, kind });
        id
    }

    /// Top-level block containers, in document order
    pub fn doc_children(&self) -> &[NodeId] {
        match &self.nodes[&self.root].kind {
            NodeKind::Doc { children } => children,
            _ => &[],
        }
    }

    /// Children of a doc or group node
    pub fn children_of(&self, id: NodeId) -> Result<&[NodeId]> {
        match &self.expect_node(id)?.kind {
            NodeKind::Doc { children } | NodeKind::Group { children } => Ok(children),
            _ => Err(BlockDocError::internal(format!(
                "node {} has no child list",
                id
            ))),
        }
    }

    /// The attrs, content node and optional group node of a container
    pub fn container_parts(&self, id: NodeId) -> Result<(&ContainerAttrs, NodeId, Option<NodeId>)> {
        match &self.expect_node(id)?.kind {
            NodeKind::Container {
                attrs,
                content,
                group,
            } => Ok((attrs, *content, *group)),
            _ => Err(BlockDocError::internal(format!(
                "node {} is not a container",
                id
            ))),
        }
    }

    pub fn container_attrs_mut(&mut self, id: NodeId) -> Result<&mut ContainerAttrs> {
        match &mut self.expect_node_mut(id)?.kind {
            NodeKind::Container { attrs, .. } => Ok(attrs),
            _ => Err(BlockDocError::internal(format!(
                "node {} is not a container",
                id
            ))),
        }
    }

    pub fn content(&self, id: NodeId) -> Result<&BlockContent> {
        match &self.expect_node(id)?.kind {
            NodeKind::Content(content) => Ok(content),
            _ => Err(BlockDocError::internal(format!(
                "node {} is not a content node",
                id
            ))),
        }
    }

    pub fn content_mut(&mut self, id: NodeId) -> Result<&mut BlockContent> {
        match &mut self.expect_node_mut(id)?.kind {
            NodeKind::Content(content) => Ok(content),
            _ => Err(BlockDocError::internal(format!(
                "node {} is not a content node",
                id
            ))),
        }
    }

    /// Swap a container's content node in place, preserving the container
    /// (and therefore its id and any group of children)
    pub fn replace_content(&mut self, container: NodeId, new_content: BlockContent) -> Result<()> {
        let (_, content_id, _) = self.container_parts(container)?;
        match &mut self.expect_node_mut(content_id)?.kind {
            NodeKind::Content(content) => {
                *content = new_content;
                Ok(())
            }
            _ => Err(BlockDocError::internal(format!(
                "container {} content child is not a content node",
                container
            ))),
        }
    }

    /// Create a detached container holding the given content
    pub fn new_container(&mut self, attrs: ContainerAttrs, content: BlockContent) -> NodeId {
        let content_id = self.alloc(None, NodeKind::Content(content));
        let container = self.alloc(
            None,
            NodeKind::Container {
                attrs,
                content: content_id,
                group: None,
            },
        );
        if let Some(node) = self.nodes.get_mut(&content_id) {
            node.parent = Some(container);
        }
        container
    }

    /// Give a container a group holding the given child containers
    ///
    /// No-op when `children` is empty: a group exists only while non-empty.
    pub fn attach_children(&mut self, container: NodeId, children: Vec<NodeId>) -> Result<()> {
        if children.is_empty() {
            return Ok(());
        }
        let group = self.alloc(
            Some(container),
            NodeKind::Group {
                children: children.clone(),
            },
        );
        for child in &children {
            self.expect_node_mut(*child)?.parent = Some(group);
        }
        match &mut self.expect_node_mut(container)?.kind {
            NodeKind::Container { group: slot, .. } => {
                *slot = Some(group);
                Ok(())
            }
            _ => Err(BlockDocError::internal(format!(
                "node {} is not a container",
                container
            ))),
        }
    }

    /// Splice containers into a doc or group child list at `index`
    pub fn insert_into(&mut self, parent: NodeId, index: usize, ids: &[NodeId]) -> Result<()> {
        for id in ids {
            self.expect_node_mut(*id)?.parent = Some(parent);
        }
        match &mut self.expect_node_mut(parent)?.kind {
            NodeKind::Doc { children } | NodeKind::Group { children } => {
                let index = index.min(children.len());
                children.splice(index..index, ids.iter().copied());
                Ok(())
            }
            _ => Err(BlockDocError::internal(format!(
                "node {} cannot hold block children",
                parent
            ))),
        }
    }

    /// The parent child-list holding `id`, and the index of `id` within it
    pub fn index_in_parent(&self, id: NodeId) -> Result<(NodeId, usize)> {
        let parent = self
            .expect_node(id)?
            .parent
            .ok_or_else(|| BlockDocError::internal(format!("node {} has no parent", id)))?;
        let children = self.children_of(parent)?;
        let index = children
            .iter()
            .position(|c| *c == id)
            .ok_or_else(|| BlockDocError::internal(format!("node {} not in parent list", id)))?;
        Ok((parent, index))
    }

    /// Detach a container from its parent and drop its whole subtree
    ///
    /// Does not prune a group emptied by the removal; callers run
    /// `prune_empty_groups` once their edit is fully spliced.
    pub fn remove_container(&mut self, id: NodeId) -> Result<()> {
        let (parent, index) = self.index_in_parent(id)?;
        match &mut self.expect_node_mut(parent)?.kind {
            NodeKind::Doc { children } | NodeKind::Group { children } => {
                children.remove(index);
            }
            _ => {
                return Err(BlockDocError::internal(format!(
                    "container {} parent is not doc or group",
                    id
                )))
            }
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                match node.kind {
                    NodeKind::Container { content, group, .. } => {
                        stack.push(content);
                        if let Some(group) = group {
                            stack.push(group);
                        }
                    }
                    NodeKind::Group { children } | NodeKind::Doc { children } => {
                        stack.extend(children);
                    }
                    NodeKind::Content(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Remove every empty group and clear the owning container's group slot
    pub fn prune_empty_groups(&mut self) -> Result<()> {
        let empty: Vec<NodeId> = self
            .nodes
            .iter()
            .filter_map(|(id, node)| match &node.kind {
                NodeKind::Group { children } if children.is_empty() => Some(*id),
                _ => None,
            })
            .collect();
        for group in empty {
            let owner = self.expect_node(group)?.parent;
            if let Some(owner) = owner {
                if let NodeKind::Container { group: slot, .. } =
                    &mut self.expect_node_mut(owner)?.kind
                {
                    *slot = None;
                }
            }
            self.nodes.remove(&group);
        }
        Ok(())
    }

    /// Find the container carrying the given block id
    pub fn find_block(&self, block_id: &str) -> Option<NodeId> {
        self.containers_in_document_order().into_iter().find(|id| {
            matches!(
                self.get(*id),
                Some(Node {
                    kind: NodeKind::Container { attrs, .. },
                    ..
                }) if attrs.id == block_id
            )
        })
    }

    /// All containers in document order (depth-first, parents before
    /// children)
    pub fn containers_in_document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.doc_children().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(Node {
                kind: NodeKind::Container {
                    group: Some(group), ..
                },
                ..
            }) = self.get(id)
            {
                if let Some(Node {
                    kind: NodeKind::Group { children },
                    ..
                }) = self.get(*group)
                {
                    stack.extend(children.iter().rev().copied());
                }
            }
        }
        out
    }

    /// Token size of a node (opening + interior + closing)
    pub fn node_size(&self, id: NodeId) -> u64 {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Doc { children }) => {
                children.iter().map(|c| self.node_size(*c)).sum()
            }
            Some(NodeKind::Container { content, group, .. }) => {
                let group_size = group.map(|g| self.node_size(g)).unwrap_or(0);
                2 + self.node_size(*content) + group_size
            }
            Some(NodeKind::Group { children }) => {
                2 + children.iter().map(|c| self.node_size(*c)).sum::<u64>()
            }
            Some(NodeKind::Content(content)) => 2 + content.inline_len(),
            None => 0,
        }
    }

    /// Total document length in positions
    pub fn doc_len(&self) -> u64 {
        self.node_size(self.root)
    }

    /// Absolute position of the opening token of `id`
    ///
    /// Recomputed on demand; bounds are never cached across edits.
    pub fn start_of(&self, id: NodeId) -> Result<u64> {
        if id == self.root {
            return Ok(0);
        }
        let node = self.expect_node(id)?;
        let parent = node
            .parent
            .ok_or_else(|| BlockDocError::internal(format!("node {} has no parent", id)))?;
        let parent_node = self.expect_node(parent)?;
        let (siblings, opening): (Vec<NodeId>, u64) = match &parent_node.kind {
            NodeKind::Doc { children } => (children.clone(), 0),
            NodeKind::Group { children } => (children.clone(), 1),
            NodeKind::Container { content, group, .. } => {
                let mut siblings = vec![*content];
                if let Some(group) = group {
                    siblings.push(*group);
                }
                (siblings, 1)
            }
            NodeKind::Content(_) => {
                return Err(BlockDocError::internal(format!(
                    "content node {} cannot have children",
                    parent
                )))
            }
        };
        let mut offset = self.start_of(parent)? + opening;
        for sibling in siblings {
            if sibling == id {
                return Ok(offset);
            }
            offset += self.node_size(sibling);
        }
        Err(BlockDocError::internal(format!(
            "node {} not reachable from its parent",
            id
        )))
    }
}
