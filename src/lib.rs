//! Pipeline Canvas - interactive pipeline-graph editor core
//!
//! The model, interaction, and execution layer of a node-based pipeline
//! editor. The host provides a rectangular surface with pointer, wheel,
//! drag-drop, and context-menu events; this crate owns everything those
//! events mean:
//!
//! - Viewport pan/zoom with zoom-anchored-at-cursor math
//! - A graph store enforcing id uniqueness and cascade deletes
//! - A pointer state machine for dragging nodes and panning the canvas
//! - A simulated execution scheduler with staggered starts, randomized
//!   per-node outcomes, and stale-completion guards
//! - Export/import of the portable `{nodes, edges}` document
//!
//! Rendering stays on the host: it reads node/edge positions and
//! [`NodeSnapshot`] state, and subscribes to [`PipelineEvent`]s via an
//! [`EventSink`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pipeline_canvas::{NullEventSink, PipelineEditor, PointerButton, PointerTarget, Position};
//!
//! let mut editor = PipelineEditor::demo(Arc::new(NullEventSink));
//! editor.on_pointer_down(
//!     PointerTarget::Node("node-1".into()),
//!     PointerButton::Primary,
//!     Position::new(60.0, 160.0),
//! );
//! editor.on_pointer_move(Position::new(90.0, 160.0)).await;
//! editor.on_pointer_up();
//! editor.run_pipeline().await;
//! ```

pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod interaction;
pub mod library;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod viewport;

// Re-export key types
pub use document::GraphDocument;
pub use editor::{EditorSnapshot, PipelineEditor};
pub use error::{EditorError, Result};
pub use events::{EventSink, NullEventSink, PipelineEvent, VecEventSink};
pub use interaction::{
    ContextMenu, InteractionController, InteractionMode, PointerButton, PointerTarget,
};
pub use library::NodeDescriptor;
pub use scheduler::{ExecutionConfig, ExecutionScheduler};
pub use store::{ExecutionUpdate, GraphStore, SharedGraphStore};
pub use types::{
    EdgeId, FileRef, NodeId, NodeKind, NodeSnapshot, NodeStatus, PipelineEdge, PipelineNode,
    PipelineStatus, Position,
};
pub use viewport::ViewportTransform;
