use crate::error::StoreError;
use crate::model::{GraphNode, NodeData, NodeId};
use std::collections::HashMap;

/// Filter for `GraphStore::run_query`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    pub node_type: Option<String>,
    pub taxonomy: Option<String>,
    pub parent: Option<NodeId>,
}

impl NodeFilter {
    pub fn of_type(node_type: &str) -> Self {
        Self {
            node_type: Some(node_type.to_string()),
            ..Self::default()
        }
    }

    pub fn in_taxonomy(mut self, taxonomy: &str) -> Self {
        self.taxonomy = Some(taxonomy.to_string());
        self
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn matches(&self, node: &GraphNode) -> bool {
        if let Some(node_type) = &self.node_type {
            if node.node_type() != node_type {
                return false;
            }
        }
        if let Some(parent) = &self.parent {
            if node.parent.as_ref() != Some(parent) {
                return false;
            }
        }
        if let Some(taxonomy) = &self.taxonomy {
            let node_taxonomy = match &node.data {
                NodeData::Taxonomy(t) => Some(&t.key),
                NodeData::Term(t) => Some(&t.taxonomy),
                NodeData::ValueTerm(a) => Some(&a.taxonomy),
                NodeData::Content(_) | NodeData::ValueTerms => None,
            };
            if node_taxonomy != Some(taxonomy) {
                return false;
            }
        }
        true
    }
}

/// The host graph database, as seen by the plugin.
///
/// A node created earlier must be visible to any later `get_node` or
/// `run_query` in the same build.
pub trait GraphStore {
    /// Create or replace a node. Replacing keeps the existing children.
    fn create_node(&mut self, node: GraphNode) -> Result<(), StoreError>;

    fn get_node(&self, id: &NodeId) -> Result<Option<GraphNode>, StoreError>;

    fn run_query(&self, filter: &NodeFilter) -> Result<Vec<GraphNode>, StoreError>;

    fn create_parent_child_link(&mut self, parent: &NodeId, child: &NodeId)
        -> Result<(), StoreError>;
}

// In memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) nodes: HashMap<NodeId, GraphNode>,
    /// Creation order, so queries are deterministic
    pub(crate) order: Vec<NodeId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }
}

impl GraphStore for MemoryStore {
    fn create_node(&mut self, mut node: GraphNode) -> Result<(), StoreError> {
        let id = node.id;
        if let Some(old) = self.nodes.get(&id) {
            for child in &old.children {
                if !node.children.contains(child) {
                    node.children.push(*child);
                }
            }
        } else {
            self.order.push(id);
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    fn get_node(&self, id: &NodeId) -> Result<Option<GraphNode>, StoreError> {
        Ok(self.nodes.get(id).cloned())
    }

    fn run_query(&self, filter: &NodeFilter) -> Result<Vec<GraphNode>, StoreError> {
        Ok(self
            .all_nodes()
            .filter(|node| filter.matches(node))
            .cloned()
            .collect())
    }

    fn create_parent_child_link(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
    ) -> Result<(), StoreError> {
        if !self.nodes.contains_key(parent) {
            return Err(StoreError::ParentNotFound(*parent));
        }
        let child_node = self
            .nodes
            .get_mut(child)
            .ok_or(StoreError::NodeNotFound(*child))?;
        child_node.parent = Some(*parent);

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            if !parent_node.children.contains(child) {
                parent_node.children.push(*child);
            }
        }
        Ok(())
    }
}
