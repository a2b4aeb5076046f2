use glam::Vec2;

use crate::types::*;

/// Correction computed for one entity against one tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// Entity sides that touched the tile.
    pub sides: Sides,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Contact {
    pub fn corrects_x(&self) -> bool {
        self.sides.contains(Side::Left) || self.sides.contains(Side::Right)
    }

    pub fn corrects_y(&self) -> bool {
        self.sides.contains(Side::Top) || self.sides.contains(Side::Bottom)
    }
}

/// Per-side tile collision tests.
pub struct Resolver;

impl Resolver {
    /// True if `velocity` moves toward the tile's `side` from outside.
    pub fn approaches(side: Side, velocity: Vec2) -> bool {
        match side {
            Side::Left => velocity.x > 0.0,
            Side::Right => velocity.x < 0.0,
            Side::Top => velocity.y > 0.0,
            Side::Bottom => velocity.y < 0.0,
        }
    }

    /// How far the entity's leading edge has passed the tile's `side` edge.
    /// Negative when the edge has not reached it yet.
    pub fn penetration(entity: &Rect, tile: &Rect, side: Side) -> f32 {
        match side {
            Side::Left => entity.right() - tile.left(),
            Side::Right => tile.right() - entity.left(),
            Side::Top => entity.bottom() - tile.top(),
            Side::Bottom => tile.bottom() - entity.top(),
        }
    }

    /// Full test for one tile side against an absolute entity box.
    pub fn side_confirmed(entity: &Rect, tile: &Rect, side: Side, velocity: Vec2, threshold: f32) -> bool {
        if !Self::approaches(side, velocity) {
            return false;
        }
        let depth = Self::penetration(entity, tile, side);
        if depth < 0.0 || depth > threshold {
            return false;
        }
        // Must share positive extent on the other axis; rules out diagonal touches.
        if side.is_horizontal() {
            entity.overlaps_y(tile)
        } else {
            entity.overlaps_x(tile)
        }
    }

    /// Position that puts the entity's edge exactly on the tile's `side` edge.
    pub fn aligned_position(local_box: &Rect, position: Vec2, tile: &Rect, side: Side) -> Vec2 {
        match side {
            Side::Left => Vec2::new(tile.left() - local_box.right(), position.y),
            Side::Right => Vec2::new(tile.right() - local_box.left(), position.y),
            Side::Top => Vec2::new(position.x, tile.top() - local_box.bottom()),
            Side::Bottom => Vec2::new(position.x, tile.bottom() - local_box.top()),
        }
    }

    /// Resolve an entity against one tile's solid sides in Left, Right, Top,
    /// Bottom order. Each confirmed side moves the working box before the
    /// next side is tested, so a corner hit resolves horizontally.
    pub fn resolve_tile(
        local_box: &Rect,
        position: Vec2,
        velocity: Vec2,
        tile: &Rect,
        solid_sides: Sides,
        threshold: f32,
    ) -> Option<Contact> {
        let mut pos = position;
        let mut vel = velocity;
        let mut sides = Sides::NONE;

        for side in solid_sides.iter() {
            let entity = local_box.translate(pos);
            if !Self::side_confirmed(&entity, tile, side, vel, threshold) {
                continue;
            }
            pos = Self::aligned_position(local_box, pos, tile, side);
            if side.is_horizontal() {
                vel.x = 0.0;
            } else {
                vel.y = 0.0;
            }
            sides.insert(side.opposite());
        }

        if sides.is_empty() {
            None
        } else {
            Some(Contact { sides, position: pos, velocity: vel })
        }
    }

    /// Combine several contacts computed from the same starting state,
    /// keeping the smallest displacement on each axis.
    pub fn merge_minimal(position: Vec2, velocity: Vec2, contacts: &[Contact]) -> (Vec2, Vec2) {
        let mut dx: Option<f32> = None;
        let mut dy: Option<f32> = None;
        for c in contacts {
            if c.corrects_x() {
                let d = c.position.x - position.x;
                if dx.is_none_or(|best| d.abs() < best.abs()) {
                    dx = Some(d);
                }
            }
            if c.corrects_y() {
                let d = c.position.y - position.y;
                if dy.is_none_or(|best| d.abs() < best.abs()) {
                    dy = Some(d);
                }
            }
        }
        let pos = position + Vec2::new(dx.unwrap_or(0.0), dy.unwrap_or(0.0));
        let vel = Vec2::new(
            if dx.is_some() { 0.0 } else { velocity.x },
            if dy.is_some() { 0.0 } else { velocity.y },
        );
        (pos, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: Rect = Rect { x: 64.0, y: 160.0, width: 32.0, height: 32.0 };
    const BOX: Rect = Rect { x: 0.0, y: 0.0, width: 16.0, height: 16.0 };

    #[test]
    fn test_penetration_per_side() {
        let e = Rect::new(60.0, 170.0, 16.0, 16.0);
        assert_eq!(Resolver::penetration(&e, &TILE, Side::Left), 12.0);
        assert_eq!(Resolver::penetration(&e, &TILE, Side::Right), 36.0);
        assert_eq!(Resolver::penetration(&e, &TILE, Side::Top), 26.0);
        assert_eq!(Resolver::penetration(&e, &TILE, Side::Bottom), 22.0);
    }

    #[test]
    fn test_approach_only() {
        assert!(Resolver::approaches(Side::Left, Vec2::new(1.0, 0.0)));
        assert!(!Resolver::approaches(Side::Left, Vec2::new(0.0, 5.0)));
        assert!(!Resolver::approaches(Side::Left, Vec2::new(-1.0, 0.0)));
        assert!(Resolver::approaches(Side::Bottom, Vec2::new(0.0, -3.0)));
        assert!(!Resolver::approaches(Side::Top, Vec2::new(0.0, -3.0)));
    }

    #[test]
    fn test_landing_on_top() {
        let c = Resolver::resolve_tile(&BOX, Vec2::new(80.0, 150.0), Vec2::new(3.0, 50.0), &TILE, Sides::ALL, 10.0)
            .unwrap();
        assert_eq!(c.sides, Sides::from(Side::Bottom));
        assert_eq!(c.position, Vec2::new(80.0, 144.0));
        assert_eq!(c.velocity, Vec2::new(3.0, 0.0));
        assert!(c.corrects_y() && !c.corrects_x());
    }

    #[test]
    fn test_threshold_boundary() {
        // Bottom edge exactly `threshold` past the top edge.
        let at = Resolver::resolve_tile(&BOX, Vec2::new(80.0, 154.0), Vec2::new(0.0, 1.0), &TILE, Sides::ALL, 10.0);
        assert!(at.is_some());
        let past = Resolver::resolve_tile(&BOX, Vec2::new(80.0, 155.0), Vec2::new(0.0, 1.0), &TILE, Sides::ALL, 10.0);
        assert!(past.is_none());
    }

    #[test]
    fn test_touching_counts_as_zero_penetration() {
        let c = Resolver::resolve_tile(&BOX, Vec2::new(80.0, 144.0), Vec2::new(0.0, 1.0), &TILE, Sides::ALL, 10.0)
            .unwrap();
        assert_eq!(c.position.y, 144.0);
    }

    #[test]
    fn test_diagonal_touch_rejected() {
        // Touches the tile only at its top-left corner.
        let e = Rect::new(48.0, 144.0, 16.0, 16.0);
        assert!(!Resolver::side_confirmed(&e, &TILE, Side::Top, Vec2::new(1.0, 1.0), 10.0));
        assert!(!Resolver::side_confirmed(&e, &TILE, Side::Left, Vec2::new(1.0, 1.0), 10.0));
        // Within threshold of the top edge but beside the tile horizontally.
        let beside = Rect::new(40.0, 150.0, 16.0, 16.0);
        assert!(!Resolver::side_confirmed(&beside, &TILE, Side::Top, Vec2::new(0.0, 1.0), 10.0));
    }

    #[test]
    fn test_corner_resolves_horizontal_first() {
        // 4px into the left side and 4px into the top, moving right and down.
        let c = Resolver::resolve_tile(&BOX, Vec2::new(52.0, 148.0), Vec2::new(2.0, 2.0), &TILE, Sides::ALL, 10.0)
            .unwrap();
        assert_eq!(c.sides, Sides::from(Side::Right));
        assert_eq!(c.position, Vec2::new(48.0, 148.0));
        assert_eq!(c.velocity, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_non_solid_side_ignored() {
        let c = Resolver::resolve_tile(
            &BOX,
            Vec2::new(80.0, 150.0),
            Vec2::new(0.0, 5.0),
            &TILE,
            Sides::from(Side::Left).with(Side::Bottom),
            10.0,
        );
        assert!(c.is_none());
    }

    #[test]
    fn test_offset_local_box_alignment() {
        let local = Rect::new(4.0, 2.0, 8.0, 20.0);
        let c = Resolver::resolve_tile(&local, Vec2::new(90.0, 170.0), Vec2::new(-4.0, 0.0), &TILE, Sides::ALL, 10.0)
            .unwrap();
        assert_eq!(c.sides, Sides::from(Side::Left));
        assert_eq!(local.translate(c.position).left(), TILE.right());
    }

    #[test]
    fn test_merge_minimal_keeps_smallest_per_axis() {
        let start = Vec2::new(10.0, 10.0);
        let vel = Vec2::new(5.0, 5.0);
        let a = Contact { sides: Side::Bottom.into(), position: Vec2::new(10.0, 4.0), velocity: Vec2::new(5.0, 0.0) };
        let b = Contact { sides: Side::Bottom.into(), position: Vec2::new(10.0, 8.0), velocity: Vec2::new(5.0, 0.0) };
        let (pos, v) = Resolver::merge_minimal(start, vel, &[a, b]);
        assert_eq!(pos, Vec2::new(10.0, 8.0));
        assert_eq!(v, Vec2::new(5.0, 0.0));
    }
}
