//! Core types for pipeline graphs
//!
//! These types define the structure of the editor's graph: nodes with
//! execution state, directed edges, and canvas positions.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Sentinel output for a node that has not produced a result
pub const OUTPUT_NOT_RUN: &str = "N/A";

/// Default log line for a freshly created node
pub const LOG_INITIALIZED: &str = "Initialized.";

/// Categorization tag for a node
///
/// Purely presentational: execution treats every kind identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Input nodes (sensory feeds, file sources, etc.)
    Input,
    /// Core processing nodes
    Core,
    /// Output nodes (sinks, model heads, etc.)
    Output,
    /// User-dropped custom nodes
    Custom,
}

/// Execution status of a single node
///
/// `Running` is the only transient state: it is entered synchronously by
/// a run request and exited exactly once, either by the scheduled
/// completion or by an explicit stop/reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Not running; ready to be started
    Idle,
    /// Execution in flight
    Running,
    /// Last run completed successfully
    Success,
    /// Last run failed (a normal terminal status, not a fault)
    Error,
}

impl Default for NodeStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Overall status of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// No pipeline run in progress
    Idle,
    /// A pipeline run has been started and has not yet settled
    Running,
}

impl Default for PipelineStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Position on the canvas, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a position from world coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Reference to an externally supplied file attached to a node
///
/// The core only stores the reference; it never reads file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File name as reported by the host's picker
    pub name: String,
}

impl FileRef {
    /// Create a file reference from a host-supplied name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A node instance in the pipeline graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineNode {
    /// Unique instance ID, assigned at creation and never reused
    pub id: NodeId,
    /// Categorization tag
    pub kind: NodeKind,
    /// Display name
    pub label: String,
    /// Position in world coordinates
    pub position: Position,
    /// Current execution status
    #[serde(default)]
    pub status: NodeStatus,
    /// Last-produced textual result
    #[serde(default = "default_output")]
    pub output: String,
    /// Last human-readable execution note
    #[serde(default = "default_log")]
    pub log: String,
    /// Attached file reference, at most one; replacing overwrites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
    /// Session-local stamp bumped on every status write; lets an
    /// in-flight completion detect that the node was stopped or reset
    /// after it was scheduled. Never serialized.
    #[serde(skip)]
    pub generation: u64,
}

fn default_output() -> String {
    OUTPUT_NOT_RUN.to_string()
}

fn default_log() -> String {
    LOG_INITIALIZED.to_string()
}

/// A directed edge between two nodes
///
/// Endpoints are ids, not references: an edge whose endpoint was deleted
/// becomes an orphan that rendering and execution skip. Duplicate and
/// cyclic edges are structurally legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEdge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Source node ID
    pub from: NodeId,
    /// Target node ID
    pub to: NodeId,
}

/// Read-only per-node view exposed to the host for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub status: NodeStatus,
    pub output: String,
    pub log: String,
}

impl From<&PipelineNode> for NodeSnapshot {
    fn from(node: &PipelineNode) -> Self {
        Self {
            id: node.id.clone(),
            status: node.status,
            output: node.output.clone(),
            log: node.log.clone(),
        }
    }
}
