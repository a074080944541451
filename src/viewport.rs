//! Viewport transform: pan offset + zoom scale
//!
//! Node positions are stored in world coordinates; the host surface
//! reports pointer events in screen coordinates. This module owns the
//! conversion between the two and the zoom-around-cursor math.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Lower zoom bound
pub const MIN_SCALE: f64 = 0.2;

/// Upper zoom bound
pub const MAX_SCALE: f64 = 2.0;

/// Scale change per unit of wheel delta
pub const WHEEL_SENSITIVITY: f64 = 0.001;

/// Pan/zoom state of the canvas
///
/// `offset` is the pan translation in screen pixels; `scale` is the zoom
/// factor, clamped to `[MIN_SCALE, MAX_SCALE]`. The transform is session
/// state: it is mutated only by the interaction controller and is never
/// part of the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    /// Pan translation in screen pixels
    pub offset: Position,
    /// Zoom factor
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            offset: Position::new(0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl ViewportTransform {
    /// Create the identity transform (no pan, 1:1 zoom)
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a world-coordinate point to screen coordinates
    pub fn world_to_screen(&self, world: Position) -> Position {
        Position::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    /// Convert a screen-coordinate point to world coordinates
    pub fn screen_to_world(&self, screen: Position) -> Position {
        Position::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Apply a wheel-zoom event anchored at `screen`
    ///
    /// The new scale is `clamp(scale - delta_y * WHEEL_SENSITIVITY)`,
    /// and the offset is recomputed so that the world point under the
    /// cursor stays under the cursor after rescaling.
    pub fn zoom_at(&mut self, screen: Position, delta_y: f64) {
        let new_scale = (self.scale - delta_y * WHEEL_SENSITIVITY).clamp(MIN_SCALE, MAX_SCALE);

        let ratio = 1.0 - new_scale / self.scale;
        self.offset.x += (screen.x - self.offset.x) * ratio;
        self.offset.y += (screen.y - self.offset.y) * ratio;
        self.scale = new_scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: Position, b: Position) {
        assert!(
            (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON,
            "expected {a:?} ~= {b:?}"
        );
    }

    #[test]
    fn test_world_screen_round_trip() {
        let transform = ViewportTransform {
            offset: Position::new(40.0, -25.0),
            scale: 1.5,
        };

        let world = Position::new(123.0, -456.0);
        let screen = transform.world_to_screen(world);
        assert_close(transform.screen_to_world(screen), world);
    }

    #[test]
    fn test_zoom_is_anchored_at_cursor() {
        let mut transform = ViewportTransform {
            offset: Position::new(17.0, 31.0),
            scale: 0.8,
        };
        let cursor = Position::new(250.0, 140.0);

        let world_before = transform.screen_to_world(cursor);
        transform.zoom_at(cursor, -120.0);
        let world_after = transform.screen_to_world(cursor);

        assert_close(world_before, world_after);
    }

    #[test]
    fn test_zoom_anchor_holds_across_repeated_events() {
        let mut transform = ViewportTransform::new();
        let cursor = Position::new(99.0, 77.0);
        let world = transform.screen_to_world(cursor);

        for delta in [-100.0, -100.0, 250.0, -40.0, 600.0] {
            transform.zoom_at(cursor, delta);
            assert_close(transform.screen_to_world(cursor), world);
        }
    }

    #[test]
    fn test_zoom_clamps_scale() {
        let mut transform = ViewportTransform::new();

        transform.zoom_at(Position::new(0.0, 0.0), -1e6);
        assert_eq!(transform.scale, MAX_SCALE);

        transform.zoom_at(Position::new(0.0, 0.0), 1e6);
        assert_eq!(transform.scale, MIN_SCALE);
    }

    #[test]
    fn test_zoom_at_clamp_boundary_keeps_offset() {
        let mut transform = ViewportTransform {
            offset: Position::new(12.0, -5.0),
            scale: MAX_SCALE,
        };

        // Already at the bound: scale is unchanged, so the offset must be too
        transform.zoom_at(Position::new(300.0, 200.0), -50.0);
        assert_eq!(transform.scale, MAX_SCALE);
        assert_close(transform.offset, Position::new(12.0, -5.0));
    }
}
