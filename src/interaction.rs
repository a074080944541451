//! Pointer interaction state machine
//!
//! Translates the host surface's raw pointer/wheel/drop events into
//! viewport and store operations. Input detection stays on the host
//! (which knows what was hit); this module is pure state mutation, so
//! every transition is testable without a widget toolkit.
//!
//! At any time exactly one of three modes is active: idle, dragging a
//! node, or panning the canvas. The host must deliver pointer-up from a
//! window-level listener: fast pointer travel can leave the canvas
//! before release.

use crate::library;
use crate::store::GraphStore;
use crate::types::{NodeId, Position};
use crate::viewport::ViewportTransform;

/// Pointer button reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Main button (usually left)
    Primary,
    /// Context-menu button (usually right)
    Secondary,
    /// Any other button
    Auxiliary,
}

/// What the pointer-down landed on, as hit-tested by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A node body
    Node(NodeId),
    /// Empty canvas background
    Canvas,
}

/// Active interaction mode; the variants are mutually exclusive
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode {
    /// No drag or pan in progress
    Idle,
    /// Dragging a node; `last` is the previous pointer screen position
    DraggingNode { id: NodeId, last: Position },
    /// Panning the canvas; `anchor = down_position - offset_at_down`
    Panning { anchor: Position },
}

/// An open context menu, anchored in screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    /// Node the menu actions apply to
    pub node: NodeId,
    /// Screen position the menu is anchored at
    pub anchor: Position,
}

/// The pointer-driven interaction controller
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: InteractionMode,
    context_menu: Option<ContextMenu>,
}

impl Default for InteractionMode {
    fn default() -> Self {
        Self::Idle
    }
}

impl InteractionController {
    /// Create a controller in the idle mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Current interaction mode
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// The open context menu, if any
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Handle pointer-down on the surface
    ///
    /// A node body starts a drag on any button. Empty canvas starts a
    /// pan on the primary button only. Any pointer-down closes an open
    /// context menu.
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        button: PointerButton,
        screen: Position,
        viewport: &ViewportTransform,
    ) {
        self.context_menu = None;
        match target {
            PointerTarget::Node(id) => {
                self.mode = InteractionMode::DraggingNode { id, last: screen };
            }
            PointerTarget::Canvas if button == PointerButton::Primary => {
                self.mode = InteractionMode::Panning {
                    anchor: Position::new(
                        screen.x - viewport.offset.x,
                        screen.y - viewport.offset.y,
                    ),
                };
            }
            PointerTarget::Canvas => {}
        }
    }

    /// Handle pointer-move on the surface
    ///
    /// Dragging converts the incremental screen delta since the last
    /// move into a world delta by dividing by the current scale, never
    /// re-deriving from the down position, so missed events cannot cause
    /// jumps larger than the true pointer travel. Panning re-anchors the
    /// offset absolutely.
    pub fn pointer_move(
        &mut self,
        screen: Position,
        viewport: &mut ViewportTransform,
        store: &mut GraphStore,
    ) {
        match &mut self.mode {
            InteractionMode::DraggingNode { id, last } => {
                let dx = (screen.x - last.x) / viewport.scale;
                let dy = (screen.y - last.y) / viewport.scale;
                let id = id.clone();
                *last = screen;
                // deleted mid-drag: silent no-op, the drag just ends on release
                store.move_node(&id, dx, dy);
            }
            InteractionMode::Panning { anchor } => {
                viewport.offset = Position::new(screen.x - anchor.x, screen.y - anchor.y);
            }
            InteractionMode::Idle => {}
        }
    }

    /// Handle pointer-up, delivered window-level by the host
    pub fn pointer_up(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    /// Handle a wheel event over the surface
    pub fn wheel(&self, screen: Position, delta_y: f64, viewport: &mut ViewportTransform) {
        viewport.zoom_at(screen, delta_y);
    }

    /// Open the context menu for a node at a screen anchor
    pub fn open_context_menu(&mut self, node: impl Into<NodeId>, anchor: Position) {
        self.context_menu = Some(ContextMenu {
            node: node.into(),
            anchor,
        });
    }

    /// Duplicate the context-menu target, closing the menu
    ///
    /// Returns the new node's id; `None` when no menu is open or the
    /// target vanished.
    pub fn menu_duplicate(&mut self, store: &mut GraphStore) -> Option<NodeId> {
        let menu = self.context_menu.take()?;
        store.duplicate_node(&menu.node)
    }

    /// Delete the context-menu target, closing the menu
    pub fn menu_delete(&mut self, store: &mut GraphStore) {
        if let Some(menu) = self.context_menu.take() {
            store.delete_node(&menu.node);
        }
    }

    /// Handle a drop of an external drag payload on the canvas
    ///
    /// The payload is a node-kind tag; its absence is a no-op. The drop
    /// point converts through the viewport so the node lands under the
    /// cursor in world space.
    pub fn drop_payload(
        &mut self,
        tag: Option<&str>,
        screen: Position,
        viewport: &ViewportTransform,
        store: &mut GraphStore,
    ) -> Option<NodeId> {
        let tag = tag.filter(|t| !t.is_empty())?;
        let world = viewport.screen_to_world(screen);
        Some(store.add_node(&library::descriptor_for_tag(tag), world))
    }
}
