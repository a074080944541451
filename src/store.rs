//! Graph store: owns the node and edge collections
//!
//! All structural mutation (add/move/delete/duplicate/connect/replace)
//! goes through this API so the uniqueness and cascade-delete invariants
//! stay centrally enforced. Nodes are kept in insertion order; that
//! order is also the pipeline's execution iteration order.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::GraphDocument;
use crate::error::{EditorError, Result};
use crate::library::NodeDescriptor;
use crate::types::{
    EdgeId, FileRef, NodeId, NodeKind, NodeSnapshot, NodeStatus, PipelineEdge, PipelineNode,
    Position,
};

/// Visual nudge applied to a duplicated node, in world units
pub const DUPLICATE_OFFSET: f64 = 30.0;

/// Partial update of a node's execution state
///
/// Used by the execution scheduler and the file-attach path; `None`
/// fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ExecutionUpdate {
    pub status: Option<NodeStatus>,
    pub output: Option<String>,
    pub log: Option<String>,
    pub file: Option<FileRef>,
}

/// Shared handle to a graph store for async consumers
pub type SharedGraphStore = Arc<RwLock<GraphStore>>;

/// The editor's node/edge collections and their mutation API
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<PipelineNode>,
    edges: Vec<PipelineEdge>,
}

fn fresh_node_id() -> NodeId {
    format!("node-{}", Uuid::new_v4())
}

fn fresh_edge_id() -> EdgeId {
    format!("edge-{}", Uuid::new_v4())
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the seeded demo pipeline: a four-node diamond
    pub fn demo_pipeline() -> Self {
        let mut store = Self::new();
        store.nodes = vec![
            demo_node("node-1", NodeKind::Input, "Sensory Input: Vision", 50.0, 150.0, "1024x1024x3 @ 60fps", "Initialized."),
            demo_node("node-2", NodeKind::Core, "Core: Fractal Cortex-A7", 400.0, 100.0, "Weights: 175B", "Awaiting input..."),
            demo_node("node-3", NodeKind::Core, "Core: Associative Memory", 400.0, 300.0, "Vector Store: 10T", "Awaiting input..."),
            demo_node("node-4", NodeKind::Output, "Output: Language Model", 750.0, 200.0, "GPT-5 Variant", "Ready."),
        ];
        store.edges = vec![
            demo_edge("e1-2", "node-1", "node-2"),
            demo_edge("e1-3", "node-1", "node-3"),
            demo_edge("e2-4", "node-2", "node-4"),
            demo_edge("e3-4", "node-3", "node-4"),
        ];
        store
    }

    /// Wrap this store in a shared handle
    pub fn into_shared(self) -> SharedGraphStore {
        Arc::new(RwLock::new(self))
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Create a node from a descriptor at a world position
    ///
    /// The node gets a freshly generated id and starts `Idle`.
    pub fn add_node(&mut self, descriptor: &NodeDescriptor, position: Position) -> NodeId {
        let id = fresh_node_id();
        self.nodes.push(PipelineNode {
            id: id.clone(),
            kind: descriptor.kind,
            label: descriptor.label.clone(),
            position,
            status: NodeStatus::Idle,
            output: descriptor.output.clone(),
            log: descriptor.log.clone(),
            file: None,
            generation: 0,
        });
        id
    }

    /// Translate a node by a world-space delta; no-op if the id is absent
    pub fn move_node(&mut self, id: &str, dx: f64, dy: f64) {
        if let Some(node) = self.node_mut(id) {
            node.position.x += dx;
            node.position.y += dy;
        }
    }

    /// Remove a node and every edge touching it; idempotent
    pub fn delete_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.from != id && e.to != id);
    }

    /// Clone a node under a new id, nudged by [`DUPLICATE_OFFSET`]
    ///
    /// The copy starts `Idle` with a log noting its origin. Returns the
    /// new id, or `None` if the original is absent.
    pub fn duplicate_node(&mut self, id: &str) -> Option<NodeId> {
        let original = self.node(id)?.clone();
        let new_id = fresh_node_id();
        self.nodes.push(PipelineNode {
            id: new_id.clone(),
            position: Position::new(
                original.position.x + DUPLICATE_OFFSET,
                original.position.y + DUPLICATE_OFFSET,
            ),
            status: NodeStatus::Idle,
            log: format!("Duplicated from {}", original.label),
            generation: 0,
            ..original
        });
        Some(new_id)
    }

    /// Create an edge between two node ids
    ///
    /// Endpoints are not checked: dangling, duplicate, and cyclic edges
    /// are structurally legal.
    pub fn connect(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> EdgeId {
        let id = fresh_edge_id();
        self.edges.push(PipelineEdge {
            id: id.clone(),
            from: from.into(),
            to: to.into(),
        });
        id
    }

    /// Merge a partial execution-state update into a node
    ///
    /// A status write bumps the node's generation stamp, invalidating
    /// any completion scheduled before it. No-op if the id is absent.
    pub fn apply_execution_update(&mut self, id: &str, update: ExecutionUpdate) {
        if let Some(node) = self.node_mut(id) {
            if let Some(status) = update.status {
                node.status = status;
                node.generation += 1;
            }
            if let Some(output) = update.output {
                node.output = output;
            }
            if let Some(log) = update.log {
                node.log = log;
            }
            if let Some(file) = update.file {
                node.file = Some(file);
            }
        }
    }

    /// Attach (or replace) a node's external file reference
    pub fn attach_file(&mut self, id: &str, file: FileRef) {
        self.apply_execution_update(
            id,
            ExecutionUpdate {
                file: Some(file),
                ..Default::default()
            },
        );
    }

    /// Atomically replace the node/edge collections from a document
    ///
    /// Validation runs before any mutation: a node with an empty id or
    /// an id that appears twice rejects the whole document and leaves
    /// the store untouched. Ids are never rewritten. Generation stamps
    /// reset, since they are session state.
    pub fn replace_all(&mut self, document: GraphDocument) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for node in &document.nodes {
            if node.id.is_empty() {
                return Err(EditorError::EmptyNodeId);
            }
            if !seen.insert(&node.id) {
                return Err(EditorError::DuplicateNodeId(node.id.clone()));
            }
        }

        let GraphDocument { mut nodes, edges } = document;
        for node in &mut nodes {
            node.generation = 0;
        }
        log::debug!("Replacing graph: {} nodes, {} edges", nodes.len(), edges.len());
        self.nodes = nodes;
        self.edges = edges;
        Ok(())
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut PipelineNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Whether a node with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// All nodes, in insertion (= pipeline iteration) order
    pub fn nodes(&self) -> impl Iterator<Item = &PipelineNode> {
        self.nodes.iter()
    }

    /// Node ids in iteration order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// All edges, including orphans
    pub fn edges(&self) -> impl Iterator<Item = &PipelineEdge> {
        self.edges.iter()
    }

    /// Edges whose both endpoints exist, i.e. the set a renderer should draw
    pub fn render_edges(&self) -> impl Iterator<Item = &PipelineEdge> {
        self.edges
            .iter()
            .filter(|e| self.contains(&e.from) && self.contains(&e.to))
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, orphans included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Read-only snapshot of one node for the host
    pub fn node_snapshot(&self, id: &str) -> Option<NodeSnapshot> {
        self.node(id).map(NodeSnapshot::from)
    }

    /// Read-only snapshots of every node, in iteration order
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.nodes.iter().map(NodeSnapshot::from).collect()
    }
}

fn demo_node(
    id: &str,
    kind: NodeKind,
    label: &str,
    x: f64,
    y: f64,
    output: &str,
    log: &str,
) -> PipelineNode {
    PipelineNode {
        id: id.to_string(),
        kind,
        label: label.to_string(),
        position: Position::new(x, y),
        status: NodeStatus::Idle,
        output: output.to_string(),
        log: log.to_string(),
        file: None,
        generation: 0,
    }
}

fn demo_edge(id: &str, from: &str, to: &str) -> PipelineEdge {
    PipelineEdge {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
    }
}
