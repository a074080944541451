//! Editor facade: one host-facing surface over the whole core
//!
//! Owns the shared store, viewport, interaction controller, and
//! scheduler, and exposes the event/command surface a host mounts
//! against. All store access goes through the shared lock, keeping the
//! single-writer discipline even though completions arrive on spawned
//! tasks.

use std::sync::Arc;

use serde::Serialize;

use crate::document::{self, GraphDocument};
use crate::error::Result;
use crate::events::EventSink;
use crate::interaction::{ContextMenu, InteractionController, InteractionMode, PointerButton, PointerTarget};
use crate::scheduler::{ExecutionConfig, ExecutionScheduler};
use crate::store::{GraphStore, SharedGraphStore};
use crate::types::{FileRef, NodeId, NodeSnapshot, PipelineStatus, Position};
use crate::viewport::ViewportTransform;

/// Combined read-only view for the host's render pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    /// Per-node status/output/log, in iteration order
    pub nodes: Vec<NodeSnapshot>,
    /// Overall pipeline status
    pub pipeline: PipelineStatus,
}

/// The pipeline-graph editor core
pub struct PipelineEditor {
    store: SharedGraphStore,
    viewport: ViewportTransform,
    interaction: InteractionController,
    scheduler: ExecutionScheduler,
}

impl PipelineEditor {
    /// Create an editor over a store
    pub fn new(store: GraphStore, config: ExecutionConfig, sink: Arc<dyn EventSink>) -> Self {
        let store = store.into_shared();
        let scheduler = ExecutionScheduler::new(Arc::clone(&store), config, sink);
        Self {
            store,
            viewport: ViewportTransform::new(),
            interaction: InteractionController::new(),
            scheduler,
        }
    }

    /// Create an editor seeded with the demo pipeline
    pub fn demo(sink: Arc<dyn EventSink>) -> Self {
        Self::new(GraphStore::demo_pipeline(), ExecutionConfig::default(), sink)
    }

    /// Shared handle to the store, for hosts that render directly
    pub fn store(&self) -> SharedGraphStore {
        Arc::clone(&self.store)
    }

    /// Current viewport transform
    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    /// Current interaction mode
    pub fn interaction_mode(&self) -> &InteractionMode {
        self.interaction.mode()
    }

    /// The open context menu, if any
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.interaction.context_menu()
    }

    // =========================================================================
    // Pointer surface
    // =========================================================================

    /// Pointer-down on the surface
    pub fn on_pointer_down(&mut self, target: PointerTarget, button: PointerButton, screen: Position) {
        self.interaction.pointer_down(target, button, screen, &self.viewport);
    }

    /// Pointer-move on the surface
    pub async fn on_pointer_move(&mut self, screen: Position) {
        let mut store = self.store.write().await;
        self.interaction.pointer_move(screen, &mut self.viewport, &mut store);
    }

    /// Pointer-up, delivered window-level
    pub fn on_pointer_up(&mut self) {
        self.interaction.pointer_up();
    }

    /// Wheel-zoom over the surface
    pub fn on_wheel(&mut self, screen: Position, delta_y: f64) {
        self.interaction.wheel(screen, delta_y, &mut self.viewport);
    }

    /// Context-menu trigger on a node
    pub fn on_context_menu(&mut self, node: impl Into<NodeId>, screen: Position) {
        self.interaction.open_context_menu(node, screen);
    }

    /// Context-menu "duplicate" action
    pub async fn context_menu_duplicate(&mut self) -> Option<NodeId> {
        let mut store = self.store.write().await;
        self.interaction.menu_duplicate(&mut store)
    }

    /// Context-menu "delete" action
    pub async fn context_menu_delete(&mut self) {
        let mut store = self.store.write().await;
        self.interaction.menu_delete(&mut store);
    }

    /// Drop of an external drag payload on the canvas
    pub async fn on_drop(&mut self, tag: Option<&str>, screen: Position) -> Option<NodeId> {
        let mut store = self.store.write().await;
        self.interaction.drop_payload(tag, screen, &self.viewport, &mut store)
    }

    /// Attach (or replace) a node's external file reference
    pub async fn attach_file(&self, node: &str, file: FileRef) {
        self.store.write().await.attach_file(node, file);
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run a single node
    pub async fn run_node(&self, node: &str) {
        self.scheduler.run_node(node).await;
    }

    /// Stop a single node
    pub async fn stop_node(&self, node: &str) {
        self.scheduler.stop_node(node).await;
    }

    /// Run the whole pipeline with staggered starts
    pub async fn run_pipeline(&self) {
        self.scheduler.run_pipeline().await;
    }

    /// Stop the pipeline and every node
    pub async fn stop_pipeline(&self) {
        self.scheduler.stop_pipeline().await;
    }

    /// Reset every node to its neutral state
    pub async fn reset_pipeline(&self) {
        self.scheduler.reset_pipeline().await;
    }

    // =========================================================================
    // Document + snapshots
    // =========================================================================

    /// Export the current graph as a document
    pub async fn export_document(&self) -> GraphDocument {
        document::export(&*self.store.read().await)
    }

    /// Export the current graph as a JSON payload
    pub async fn export_json(&self) -> Result<String> {
        document::to_json(&self.export_document().await)
    }

    /// Import a JSON payload, replacing the graph; all-or-nothing
    pub async fn import_json(&self, payload: &str) -> Result<()> {
        let mut store = self.store.write().await;
        document::import(&mut store, payload)
    }

    /// Read-only snapshot of one node for the host
    pub async fn node_snapshot(&self, node: &str) -> Option<NodeSnapshot> {
        self.store.read().await.node_snapshot(node)
    }

    /// Combined snapshot for the host's render pass
    pub async fn snapshot(&self) -> EditorSnapshot {
        let nodes = self.store.read().await.snapshot();
        EditorSnapshot {
            nodes,
            pipeline: self.scheduler.pipeline_status().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use crate::types::NodeStatus;
    use std::time::Duration;

    fn demo_editor() -> PipelineEditor {
        PipelineEditor::demo(Arc::new(NullEventSink))
    }

    #[test]
    fn test_drop_then_drag_lands_where_the_pointer_says() {
        tokio_test::block_on(async {
            let mut editor = demo_editor();

            // zoom out around the origin, then drop a node
            editor.on_wheel(Position::new(0.0, 0.0), 500.0);
            let scale = editor.viewport().scale;
            let id = editor
                .on_drop(Some("Core Logic"), Position::new(200.0, 120.0))
                .await
                .unwrap();

            let expected = editor.viewport().screen_to_world(Position::new(200.0, 120.0));
            let store = editor.store();
            assert_eq!(store.read().await.node(&id).unwrap().position, expected);

            // drag it by 50 screen pixels; world travel scales inversely
            editor.on_pointer_down(
                PointerTarget::Node(id.clone()),
                PointerButton::Primary,
                Position::new(200.0, 120.0),
            );
            editor.on_pointer_move(Position::new(250.0, 120.0)).await;
            editor.on_pointer_up();

            let moved = store.read().await.node(&id).unwrap().position;
            assert!((moved.x - (expected.x + 50.0 / scale)).abs() < 1e-9);
        });
    }

    #[tokio::test]
    async fn test_context_menu_actions_via_facade() {
        let mut editor = demo_editor();

        editor.on_context_menu("node-2", Position::new(10.0, 10.0));
        let copy = editor.context_menu_duplicate().await.unwrap();
        assert!(editor.context_menu().is_none());

        editor.on_context_menu(copy.clone(), Position::new(10.0, 10.0));
        editor.context_menu_delete().await;

        let store = editor.store();
        assert!(!store.read().await.contains(&copy));
        assert_eq!(store.read().await.node_count(), 4);
    }

    #[tokio::test]
    async fn test_export_import_round_trip_via_facade() {
        let editor = demo_editor();
        let json = editor.export_json().await.unwrap();

        let other = PipelineEditor::new(
            GraphStore::new(),
            ExecutionConfig::default(),
            Arc::new(NullEventSink),
        );
        other.import_json(&json).await.unwrap();

        let snapshot = other.snapshot().await;
        assert_eq!(snapshot.nodes.len(), 4);
        assert_eq!(snapshot.pipeline, PipelineStatus::Idle);
    }

    #[tokio::test]
    async fn test_import_failure_leaves_editor_usable() {
        let editor = demo_editor();
        assert!(editor.import_json("{\"nodes\": []}").await.is_err());
        assert_eq!(editor.snapshot().await.nodes.len(), 4);
    }

    #[tokio::test]
    async fn test_run_node_via_facade() {
        let editor = PipelineEditor::new(
            GraphStore::demo_pipeline(),
            ExecutionConfig {
                min_delay: Duration::from_millis(20),
                max_delay: Duration::from_millis(20),
                success_rate: 1.0,
                stagger: Duration::from_millis(5),
            },
            Arc::new(NullEventSink),
        );

        editor.run_node("node-1").await;
        assert_eq!(
            editor.node_snapshot("node-1").await.unwrap().status,
            NodeStatus::Running
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            editor.node_snapshot("node-1").await.unwrap().status,
            NodeStatus::Success
        );
    }

    #[tokio::test]
    async fn test_attach_file_via_facade() {
        let editor = demo_editor();
        editor.attach_file("node-1", FileRef::new("corpus.bin")).await;

        let store = editor.store();
        assert_eq!(
            store.read().await.node("node-1").unwrap().file,
            Some(FileRef::new("corpus.bin"))
        );
    }
}
