use glam::Vec2;

use crate::error::PlacementError;
use crate::library::TileDefinitionLibrary;
use crate::types::*;

/// Capability an entity implements to be collided against the tile grid.
///
/// Players, enemies and particles implement this independently; the grid
/// never needs to know the concrete type.
pub trait Collidable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);

    /// Entity-local collision box, offset from `position()`.
    fn collision_box(&self) -> Rect;

    fn can_collide(&self) -> bool {
        true
    }

    fn can_take_damage(&self) -> bool {
        false
    }

    /// Per-entity override of `GridConfig::collision_threshold`.
    fn collision_threshold(&self) -> Option<f32> {
        None
    }

    /// Called once per tile with confirmed sides. The default accepts the
    /// suggested position and velocity as-is.
    fn on_collision(&mut self, event: &CollisionEvent<'_>) {
        self.set_position(event.suggested_position);
        self.set_velocity(event.suggested_velocity);
    }

    fn take_damage(&mut self, _amount: f32) {}

    /// Collision box in world space.
    fn absolute_collision_box(&self) -> Rect {
        self.collision_box().translate(self.position())
    }

    // --- Motion helpers (y grows downward) ---------------------------------

    fn is_moving_left(&self) -> bool {
        self.velocity().x < 0.0
    }

    fn is_moving_right(&self) -> bool {
        self.velocity().x > 0.0
    }

    fn is_moving_up(&self) -> bool {
        self.velocity().y < 0.0
    }

    fn is_moving_down(&self) -> bool {
        self.velocity().y > 0.0
    }
}

/// Public API contract for the tile grid.
pub trait TileGridApi {
    /// Construct an empty grid of `width` x `height` tiles.
    fn new(library: TileDefinitionLibrary, width: u32, height: u32, cfg: GridConfig) -> Self
    where
        Self: Sized;

    // --- Loading -----------------------------------------------------------

    /// Insert or replace the tile at `coord`.
    fn place(&mut self, coord: GridCoord, id: &TileDefinitionId) -> Result<(), PlacementError>;

    // --- Queries -----------------------------------------------------------

    /// Tile placed at `coord`, if any.
    fn tile_at(&self, coord: GridCoord) -> Option<&Tile>;

    /// Tiles whose absolute collision box intersects `rect`, in row-major order.
    fn tiles_in_rect(&self, rect: Rect) -> Vec<&Tile>;

    /// Events `check_collision` would dispatch if the entity ignored every
    /// suggestion. Does not call back into the entity.
    fn contacts(&self, entity: &dyn Collidable) -> Vec<CollisionEvent<'_>>;

    // --- Per-step resolution -----------------------------------------------

    /// Resolve one entity against the grid, calling back into it.
    fn check_collision(&self, entity: &mut dyn Collidable);

    /// Resolve each entity in turn. Callers must not rely on the order.
    fn check_collisions(&self, entities: &mut [&mut dyn Collidable]);
}
