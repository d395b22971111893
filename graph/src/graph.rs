//! Core graph storage implementation.

use crate::index::{AdjacencyIndex, IndexKey, LabelIndex, PropertyIndex};
use layers_core::{
    CompiledArtifacts, Edge, EdgeId, GraphError, GraphId, GraphResult, Labels, Node, NodeId,
    Properties, PropertyValue,
};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Slot allocator for nodes and edges of one graph.
#[derive(Debug)]
struct IdAllocator {
    graph: GraphId,
    next_node_slot: u64,
    next_edge_slot: u64,
}

impl IdAllocator {
    fn new(graph: GraphId) -> Self {
        Self {
            graph,
            next_node_slot: 1,
            next_edge_slot: 1,
        }
    }

    fn alloc_node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.graph, self.next_node_slot);
        self.next_node_slot += 1;
        id
    }

    fn alloc_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::new(self.graph, self.next_edge_slot);
        self.next_edge_slot += 1;
        id
    }
}

/// A directed, labeled, in-memory multigraph.
#[derive(Debug)]
pub struct Graph {
    /// Identity used to reject handles of other graphs
    id: GraphId,
    /// Node storage, ordered by allocation
    nodes: BTreeMap<NodeId, Node>,
    /// Edge storage, ordered by allocation
    edges: BTreeMap<EdgeId, Edge>,
    id_alloc: IdAllocator,
    label_index: LabelIndex,
    prop_index: PropertyIndex,
    adj_index: AdjacencyIndex,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph with a fresh identity.
    pub fn new() -> Self {
        let id = GraphId::next();
        Self {
            id,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            id_alloc: IdAllocator::new(id),
            label_index: LabelIndex::new(),
            prop_index: PropertyIndex::new(),
            adj_index: AdjacencyIndex::new(),
        }
    }

    /// The identity of this graph.
    pub fn id(&self) -> GraphId {
        self.id
    }

    fn check_node(&self, id: NodeId) -> GraphResult<()> {
        if id.graph() != self.id {
            return Err(GraphError::ForeignNode {
                node: id,
                graph: self.id,
            });
        }
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }
        Ok(())
    }

    fn check_edge(&self, id: EdgeId) -> GraphResult<()> {
        if id.graph() != self.id {
            return Err(GraphError::ForeignEdge {
                edge: id,
                graph: self.id,
            });
        }
        if !self.edges.contains_key(&id) {
            return Err(GraphError::EdgeNotFound(id));
        }
        Ok(())
    }

    fn node_entry_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.check_node(id)?;
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    fn edge_entry_mut(&mut self, id: EdgeId) -> GraphResult<&mut Edge> {
        self.check_edge(id)?;
        self.edges.get_mut(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    // ==================== Node Operations ====================

    /// Create a new node with the given labels and properties.
    pub fn create_node<I, S>(&mut self, labels: I, properties: Properties) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.id_alloc.alloc_node_id();
        let labels: Labels = labels.into_iter().map(Into::into).collect();
        let node = Node::new(id, labels, properties);

        for label in &node.labels {
            self.label_index.insert(label, id);
        }
        for (name, value) in &node.properties {
            self.prop_index.insert(name, value, id);
        }

        self.nodes.insert(id, node);
        id
    }

    /// Get a node by handle.
    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.check_node(id)?;
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Returns true if the handle names a live node of this graph.
    pub fn contains_node(&self, id: NodeId) -> bool {
        id.graph() == self.id && self.nodes.contains_key(&id)
    }

    /// Remove a node. Every edge touching it is removed first.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<Node> {
        self.check_node(id)?;

        for edge_id in self.adj_index.edges_involving(id) {
            self.remove_edge(edge_id)?;
        }

        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        for label in &node.labels {
            self.label_index.remove(label, id);
        }
        for (name, value) in &node.properties {
            self.prop_index.remove(name, value, id);
        }
        Ok(node)
    }

    /// Add a label to a node. Returns false if the node already had it.
    pub fn add_label(&mut self, id: NodeId, label: &str) -> GraphResult<bool> {
        let node = self.node_entry_mut(id)?;
        let added = node.labels.insert(label.to_string());
        if added {
            self.label_index.insert(label, id);
        }
        Ok(added)
    }

    /// Remove a label from a node. Returns false if the node did not have it.
    pub fn remove_label(&mut self, id: NodeId, label: &str) -> GraphResult<bool> {
        let node = self.node_entry_mut(id)?;
        let removed = node.labels.remove(label);
        if removed {
            self.label_index.remove(label, id);
        }
        Ok(removed)
    }

    /// Set a property on a node, returning the previous value.
    pub fn set_node_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: PropertyValue,
    ) -> GraphResult<Option<PropertyValue>> {
        let node = self.node_entry_mut(id)?;
        let old = node.properties.insert(name.to_string(), value.clone());
        if let Some(old_value) = &old {
            self.prop_index.remove(name, old_value, id);
        }
        self.prop_index.insert(name, &value, id);
        Ok(old)
    }

    /// Remove a property from a node, returning the removed value.
    pub fn remove_node_property(
        &mut self,
        id: NodeId,
        name: &str,
    ) -> GraphResult<Option<PropertyValue>> {
        let node = self.node_entry_mut(id)?;
        let old = node.properties.remove(name);
        if let Some(old_value) = &old {
            self.prop_index.remove(name, old_value, id);
        }
        Ok(old)
    }

    /// Replace the whole property map of a node.
    pub fn set_node_properties(&mut self, id: NodeId, properties: Properties) -> GraphResult<()> {
        let node = self.node_entry_mut(id)?;
        let old = std::mem::replace(&mut node.properties, properties);
        for (name, value) in &old {
            self.prop_index.remove(name, value, id);
        }
        if let Some(node) = self.nodes.get(&id) {
            for (name, value) in &node.properties {
                self.prop_index.insert(name, value, id);
            }
        }
        Ok(())
    }

    /// Mutable access to the compiled artifacts of a node.
    pub fn node_compiled_mut(&mut self, id: NodeId) -> GraphResult<&mut CompiledArtifacts> {
        Ok(&mut self.node_entry_mut(id)?.compiled)
    }

    // ==================== Edge Operations ====================

    /// Create an edge between two nodes of this graph.
    pub fn create_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        label: &str,
        properties: Properties,
    ) -> GraphResult<EdgeId> {
        self.check_node(from)?;
        self.check_node(to)?;

        let id = self.id_alloc.alloc_edge_id();
        let edge = Edge::new(id, label, from, to, properties);
        self.adj_index.insert(id, from, to);
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Get an edge by handle.
    pub fn edge(&self, id: EdgeId) -> GraphResult<&Edge> {
        self.check_edge(id)?;
        self.edges.get(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// Remove an edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        self.check_edge(id)?;
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;
        self.adj_index.remove(id, edge.from, edge.to);
        Ok(edge)
    }

    /// Set a property on an edge, returning the previous value.
    pub fn set_edge_property(
        &mut self,
        id: EdgeId,
        name: &str,
        value: PropertyValue,
    ) -> GraphResult<Option<PropertyValue>> {
        let edge = self.edge_entry_mut(id)?;
        Ok(edge.properties.insert(name.to_string(), value))
    }

    /// Mutable access to the compiled artifacts of an edge.
    pub fn edge_compiled_mut(&mut self, id: EdgeId) -> GraphResult<&mut CompiledArtifacts> {
        Ok(&mut self.edge_entry_mut(id)?.compiled)
    }

    // ==================== Query Operations ====================

    /// Outgoing edges of a node in insertion order, optionally filtered by label.
    pub fn outgoing(&self, node: NodeId, label: Option<&str>) -> GraphResult<Vec<EdgeId>> {
        self.check_node(node)?;
        Ok(self.filter_by_label(self.adj_index.outgoing(node), label))
    }

    /// Incoming edges of a node in insertion order, optionally filtered by label.
    pub fn incoming(&self, node: NodeId, label: Option<&str>) -> GraphResult<Vec<EdgeId>> {
        self.check_node(node)?;
        Ok(self.filter_by_label(self.adj_index.incoming(node), label))
    }

    fn filter_by_label(&self, edges: &[EdgeId], label: Option<&str>) -> Vec<EdgeId> {
        edges
            .iter()
            .copied()
            .filter(|e| match (label, self.edges.get(e)) {
                (None, Some(_)) => true,
                (Some(l), Some(edge)) => edge.label == l,
                (_, None) => false,
            })
            .collect()
    }

    /// Targets of the outgoing edges of a node, optionally filtered by label.
    pub fn successors(&self, node: NodeId, label: Option<&str>) -> GraphResult<Vec<NodeId>> {
        let edges = self.outgoing(node, label)?;
        Ok(edges
            .iter()
            .filter_map(|e| self.edges.get(e).map(|edge| edge.to))
            .collect())
    }

    /// Nodes carrying a label, in allocation order.
    pub fn nodes_with_label(&self, label: &str) -> Vec<NodeId> {
        self.label_index.get(label).collect()
    }

    /// Maintain a property index for `name`, indexing the existing nodes.
    pub fn index_property(&mut self, name: &str) {
        if !self.prop_index.enable(name) {
            return;
        }
        for (id, node) in &self.nodes {
            if let Some(value) = node.properties.get(name) {
                self.prop_index.insert(name, value, *id);
            }
        }
    }

    /// Nodes whose property `name` shares an index key with `value`, in
    /// allocation order. Lists match element-wise and floats never match.
    /// Unindexed properties are scanned with the same keys.
    pub fn find_nodes(&self, name: &str, value: &PropertyValue) -> Vec<NodeId> {
        if self.prop_index.is_indexed(name) {
            return self.prop_index.find(name, value);
        }
        let wanted = IndexKey::keys_of(value);
        self.nodes
            .values()
            .filter(|node| {
                node.properties
                    .get(name)
                    .map(|v| IndexKey::keys_of(v).iter().any(|k| wanted.contains(k)))
                    .unwrap_or(false)
            })
            .map(|node| node.id)
            .collect()
    }

    // ==================== Subgraph Import ====================

    /// Copy every node reachable from `root` in `source` into this graph,
    /// together with the edges leaving the copied nodes.
    ///
    /// `node_map` maps source handles to handles of this graph. Nodes already
    /// present in the map are reused and their edges are not copied again, so
    /// repeated imports from the same source share nodes. Returns the handle
    /// of the copied root.
    pub fn import_subgraph(
        &mut self,
        source: &Graph,
        root: NodeId,
        node_map: &mut HashMap<NodeId, NodeId>,
    ) -> GraphResult<NodeId> {
        if source.id == self.id {
            return Err(GraphError::InvalidOperation(
                "cannot import a graph into itself".to_string(),
            ));
        }
        source.check_node(root)?;

        let mut copied: Vec<NodeId> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(src_id) = queue.pop_front() {
            if !seen.insert(src_id) {
                continue;
            }
            if !node_map.contains_key(&src_id) {
                let src = source.node(src_id)?;
                let new_id = self.create_node(src.labels.iter().cloned(), src.properties.clone());
                self.node_compiled_mut(new_id)?.extend_from(&src.compiled);
                node_map.insert(src_id, new_id);
                copied.push(src_id);
            }
            for succ in source.successors(src_id, None)? {
                queue.push_back(succ);
            }
        }

        for src_id in &copied {
            for edge_id in source.outgoing(*src_id, None)? {
                let edge = source.edge(edge_id)?;
                let (Some(&from), Some(&to)) = (node_map.get(&edge.from), node_map.get(&edge.to))
                else {
                    continue;
                };
                let new_edge = self.create_edge(from, to, &edge.label, edge.properties.clone())?;
                self.edge_compiled_mut(new_edge)?.extend_from(&edge.compiled);
            }
        }

        log::trace!(
            "imported {} nodes from {} into {}",
            copied.len(),
            source.id,
            self.id
        );
        node_map
            .get(&root)
            .copied()
            .ok_or(GraphError::NodeNotFound(root))
    }

    // ==================== Statistics ====================

    /// Get the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All node handles in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// All nodes in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// All edges in allocation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }
}
