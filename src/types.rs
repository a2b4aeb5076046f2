use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Grid coordinate of a tile (column, row).
pub type GridCoord = (i32, i32);

/// One edge of an axis-aligned rectangle. Y grows downward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Resolution order; horizontal sides come first so they win corner ties.
    pub const ORDER: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// The facing side of the other box when two boxes touch along this side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    fn bit(self) -> u8 {
        match self {
            Side::Top => 1 << 0,
            Side::Bottom => 1 << 1,
            Side::Left => 1 << 2,
            Side::Right => 1 << 3,
        }
    }
}

/// Bitmask set of sides.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sides(u8);

impl Sides {
    pub const NONE: Sides = Sides(0);
    pub const ALL: Sides = Sides(0b1111);

    pub fn contains(self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn insert(&mut self, side: Side) {
        self.0 |= side.bit();
    }

    pub fn remove(&mut self, side: Side) {
        self.0 &= !side.bit();
    }

    pub fn with(mut self, side: Side) -> Self {
        self.insert(side);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate contained sides in resolution order.
    pub fn iter(self) -> impl Iterator<Item = Side> {
        Side::ORDER.into_iter().filter(move |s| self.contains(*s))
    }

    /// Mirror every side (Left <-> Right, Top <-> Bottom).
    pub fn opposite(self) -> Sides {
        self.iter().map(Side::opposite).collect()
    }
}

impl std::fmt::Debug for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Side> for Sides {
    fn from(side: Side) -> Self {
        Sides::NONE.with(side)
    }
}

impl FromIterator<Side> for Sides {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        let mut sides = Sides::NONE;
        for s in iter {
            sides.insert(s);
        }
        sides
    }
}

// Persisted as a plain list, e.g. `["Top", "Left"]`.
impl Serialize for Sides {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Sides {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<Side>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Same rectangle moved by `offset` (local -> absolute).
    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect { x: self.x + offset.x, y: self.y + offset.y, ..*self }
    }

    /// Inclusive test: boxes whose edges touch count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Strict overlap of the horizontal extents (positive shared width).
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Strict overlap of the vertical extents (positive shared height).
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }
}

/// Opaque key of a tile definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileDefinitionId(pub String);

impl From<&str> for TileDefinitionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for TileDefinitionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TileDefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable tile template shared by every placed tile that uses it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileDefinition {
    /// Visual reference resolved by the renderer.
    pub sprite_ref: String,
    /// Tile-local collision box.
    pub collision_box: Rect,
    /// Sides that block movement. Empty means passable.
    pub solid_sides: Sides,
    /// Damage dealt per check to entities overlapping the tile.
    pub damage: Option<f32>,
}

impl TileDefinition {
    /// Passable decoration with a full-tile box.
    pub fn passable(sprite_ref: impl Into<String>, size: Vec2) -> Self {
        Self {
            sprite_ref: sprite_ref.into(),
            collision_box: Rect::new(0.0, 0.0, size.x, size.y),
            solid_sides: Sides::NONE,
            damage: None,
        }
    }

    /// Full-tile box solid on every side.
    pub fn solid(sprite_ref: impl Into<String>, size: Vec2) -> Self {
        Self { solid_sides: Sides::ALL, ..Self::passable(sprite_ref, size) }
    }

    pub fn is_solid(&self) -> bool {
        !self.solid_sides.is_empty()
    }

    pub fn is_damaging(&self) -> bool {
        self.damage.is_some_and(|d| d > 0.0)
    }
}

/// A definition placed on the grid.
#[derive(Clone, Debug)]
pub struct Tile {
    pub definition_id: TileDefinitionId,
    pub definition: Arc<TileDefinition>,
    pub coord: GridCoord,
}

impl Tile {
    pub fn world_position(&self, tile_size: Vec2) -> Vec2 {
        Vec2::new(self.coord.0 as f32, self.coord.1 as f32) * tile_size
    }

    /// Collision box in world space.
    pub fn absolute_box(&self, tile_size: Vec2) -> Rect {
        self.definition.collision_box.translate(self.world_position(tile_size))
    }
}

/// How corrections from several tiles hit in one check are combined.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    /// Each tile is resolved against the entity's state as left by the
    /// previous callback; with the default callback the last tile wins.
    #[default]
    Sequential,
    /// All tiles are resolved against the state at the start of the check
    /// and the smallest displacement per axis is suggested to every callback.
    MinimalDisplacement,
}

/// Grid-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Tile width in pixels (must be positive).
    pub tile_width: f32,
    /// Tile height in pixels (must be positive).
    pub tile_height: f32,
    /// Maximum penetration, in pixels, still treated as an edge contact.
    pub collision_threshold: f32,
    pub resolution: ResolutionPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_width: 32.0,
            tile_height: 32.0,
            collision_threshold: 10.0,
            resolution: ResolutionPolicy::Sequential,
        }
    }
}

impl GridConfig {
    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }
}

/// Suggested correction handed to a collidable for one tile.
#[derive(Copy, Clone, Debug)]
pub struct CollisionEvent<'a> {
    pub tile: &'a Tile,
    /// The entity's own sides that touched the tile.
    pub sides: Sides,
    pub suggested_position: Vec2,
    pub suggested_velocity: Vec2,
}

/// Debug statistics for a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub width: u32,
    pub height: u32,
    pub tiles: usize,
    pub solid_tiles: usize,
    pub damaging_tiles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_bitmask() {
        let mut s = Sides::NONE;
        assert!(s.is_empty());
        s.insert(Side::Top);
        s.insert(Side::Right);
        assert!(s.contains(Side::Top));
        assert!(!s.contains(Side::Left));
        assert_eq!(s.len(), 2);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![Side::Right, Side::Top]);
        assert_eq!(s.opposite(), Sides::from(Side::Bottom).with(Side::Left));
        assert_eq!(Sides::ALL.len(), 4);
        let mut all = Sides::ALL;
        all.remove(Side::Left);
        all.remove(Side::Left);
        assert_eq!(all.len(), 3);
        assert!(!all.contains(Side::Left));
    }

    #[test]
    fn test_sides_debug_lists_members() {
        let s = Sides::from(Side::Top).with(Side::Left);
        assert_eq!(format!("{s:?}"), "{Left, Top}");
        assert_eq!(format!("{:?}", Sides::NONE), "{}");
    }

    #[test]
    fn test_sides_serde_as_list() {
        let s: Sides = serde_json::from_str(r#"["Left","Top","Left"]"#).unwrap();
        assert_eq!(s, Sides::from(Side::Left).with(Side::Top));
        let back = serde_json::to_string(&s).unwrap();
        assert_eq!(back, r#"["Left","Top"]"#);
    }

    #[test]
    fn test_rect_predicates() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&touching));
        assert!(!a.overlaps_x(&touching));
        assert!(a.overlaps_y(&touching));
        let apart = Rect::new(10.5, 0.0, 1.0, 1.0);
        assert!(!a.intersects(&apart));
        let moved = a.translate(Vec2::new(3.0, -2.0));
        assert_eq!(moved.min(), Vec2::new(3.0, -2.0));
        assert_eq!(moved.max(), Vec2::new(13.0, 8.0));
        assert!(!Rect::new(0.0, 0.0, 0.0, 5.0).has_area());
    }

    #[test]
    fn test_tile_absolute_box() {
        let def = Arc::new(TileDefinition {
            sprite_ref: "ledge".into(),
            collision_box: Rect::new(0.0, 8.0, 32.0, 8.0),
            solid_sides: Side::Top.into(),
            damage: None,
        });
        let tile = Tile { definition_id: "ledge".into(), definition: def, coord: (2, 5) };
        let b = tile.absolute_box(Vec2::splat(32.0));
        assert_eq!(b, Rect::new(64.0, 168.0, 32.0, 8.0));
    }

    #[test]
    fn test_grid_config_partial_document_keeps_defaults() {
        let cfg: GridConfig = serde_json::from_str(r#"{"collisionThreshold": 4.0}"#).unwrap();
        assert_eq!(cfg.collision_threshold, 4.0);
        assert_eq!(cfg.tile_width, 32.0);
        assert_eq!(cfg.resolution, ResolutionPolicy::Sequential);
    }
}
