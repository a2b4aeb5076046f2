use glam::Vec2;

use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::api::{Collidable, TileGridApi};
use crate::error::PlacementError;
use crate::library::TileDefinitionLibrary;
use crate::resolve::{Contact, Resolver};
use crate::types::*;

/// Sparse tile grid hosting the collision resolver.
///
/// Mutated only while loading; every query takes `&self`.
pub struct TileGrid {
    pub cfg: GridConfig,
    library: TileDefinitionLibrary,
    width: u32,
    height: u32,

    // Grid coordinate -> placed tile. Missing keys are empty space.
    tiles: HashMap<GridCoord, Tile>,
}

impl TileGridApi for TileGrid {
    fn new(library: TileDefinitionLibrary, width: u32, height: u32, cfg: GridConfig) -> Self {
        Self {
            cfg,
            library,
            width,
            height,
            tiles: HashMap::new(),
        }
    }

    fn place(&mut self, coord: GridCoord, id: &TileDefinitionId) -> Result<(), PlacementError> {
        if !self.in_bounds(coord) {
            return Err(PlacementError::OutOfBounds { coord, width: self.width, height: self.height });
        }
        let definition = self
            .library
            .get_shared(id)
            .map_err(|_| PlacementError::MissingDefinition { coord, id: id.clone() })?
            .clone();
        let tile = Tile { definition_id: id.clone(), definition, coord };
        if let Some(old) = self.tiles.insert(coord, tile) {
            log::debug!("replaced tile `{}` at {:?} with `{}`", old.definition_id, coord, id);
        }
        Ok(())
    }

    fn tile_at(&self, coord: GridCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    fn tiles_in_rect(&self, rect: Rect) -> Vec<&Tile> {
        let ts = self.cfg.tile_size();
        self.candidates(rect)
            .filter(|t| t.absolute_box(ts).intersects(&rect))
            .collect()
    }

    fn contacts(&self, entity: &dyn Collidable) -> Vec<CollisionEvent<'_>> {
        if !entity.can_collide() {
            return Vec::new();
        }
        let position = entity.position();
        let velocity = entity.velocity();
        let threshold = self.threshold_for(entity);
        let (hits, _) = self.collect_hits(&entity.collision_box(), position, velocity, threshold);

        match self.cfg.resolution {
            ResolutionPolicy::Sequential => hits
                .into_iter()
                .map(|(tile, c)| CollisionEvent {
                    tile,
                    sides: c.sides,
                    suggested_position: c.position,
                    suggested_velocity: c.velocity,
                })
                .collect(),
            ResolutionPolicy::MinimalDisplacement => Self::merged_events(position, velocity, &hits),
        }
    }

    fn check_collision(&self, entity: &mut dyn Collidable) {
        if !entity.can_collide() {
            return;
        }
        match self.cfg.resolution {
            ResolutionPolicy::Sequential => self.check_sequential(entity),
            ResolutionPolicy::MinimalDisplacement => self.check_minimal(entity),
        }
    }

    fn check_collisions(&self, entities: &mut [&mut dyn Collidable]) {
        for entity in entities.iter_mut() {
            self.check_collision(&mut **entity);
        }
    }
}

impl TileGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn library(&self) -> &TileDefinitionLibrary {
        &self.library
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn in_bounds(&self, (x, y): GridCoord) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }

    /// World-space pixel to grid cell (may lie outside the grid).
    pub fn world_to_cell(&self, p: Vec2) -> GridCoord {
        ((p.x / self.cfg.tile_width).floor() as i32, (p.y / self.cfg.tile_height).floor() as i32)
    }

    /// Return debug stats for the current grid.
    pub fn debug_stats(&self) -> GridStats {
        let solid_tiles = self.tiles.values().filter(|t| t.definition.is_solid()).count();
        let damaging_tiles = self.tiles.values().filter(|t| t.definition.is_damaging()).count();
        GridStats {
            width: self.width,
            height: self.height,
            tiles: self.tiles.len(),
            solid_tiles,
            damaging_tiles,
        }
    }

    fn threshold_for(&self, entity: &dyn Collidable) -> f32 {
        entity.collision_threshold().unwrap_or(self.cfg.collision_threshold)
    }

    /// Cell range covered by `rect`, clamped to the grid. `None` if nothing remains.
    fn cell_range(&self, rect: Rect) -> Option<(RangeInclusive<i32>, RangeInclusive<i32>)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let max_x = i32::try_from(self.width - 1).unwrap_or(i32::MAX);
        let max_y = i32::try_from(self.height - 1).unwrap_or(i32::MAX);
        let (x0, y0) = self.world_to_cell(rect.min());
        let (x1, y1) = self.world_to_cell(rect.max());
        let (x0, x1) = (x0.max(0), x1.min(max_x));
        let (y0, y1) = (y0.max(0), y1.min(max_y));
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0..=x1, y0..=y1))
    }

    /// Placed tiles inside the narrowed range of `rect`, row-major.
    fn candidates(&self, rect: Rect) -> impl Iterator<Item = &Tile> + '_ {
        let range = self.cell_range(rect);
        range.into_iter().flat_map(move |(xs, ys)| {
            ys.flat_map(move |y| xs.clone().filter_map(move |x| self.tiles.get(&(x, y))))
        })
    }

    /// Resolve a fixed entity state against every candidate. Returns the
    /// contacts and the damaging tiles the entity overlaps.
    fn collect_hits(
        &self,
        local_box: &Rect,
        position: Vec2,
        velocity: Vec2,
        threshold: f32,
    ) -> (Vec<(&Tile, Contact)>, Vec<&Tile>) {
        let mut hits = Vec::new();
        let mut damaging = Vec::new();
        let abs = local_box.translate(position);
        if !abs.has_area() {
            return (hits, damaging);
        }
        let ts = self.cfg.tile_size();
        for tile in self.candidates(abs) {
            let tile_box = tile.absolute_box(ts);
            if !tile_box.intersects(&abs) {
                continue;
            }
            if tile.definition.is_damaging() {
                damaging.push(tile);
            }
            if !tile.definition.is_solid() {
                continue;
            }
            let solid = self.exposed_sides(tile);
            if let Some(c) = Resolver::resolve_tile(local_box, position, velocity, &tile_box, solid, threshold) {
                hits.push((tile, c));
            }
        }
        (hits, damaging)
    }

    fn merged_events<'a>(position: Vec2, velocity: Vec2, hits: &[(&'a Tile, Contact)]) -> Vec<CollisionEvent<'a>> {
        let contacts: Vec<Contact> = hits.iter().map(|(_, c)| *c).collect();
        let (pos, vel) = Resolver::merge_minimal(position, velocity, &contacts);
        hits.iter()
            .map(|&(tile, c)| CollisionEvent {
                tile,
                sides: c.sides,
                suggested_position: pos,
                suggested_velocity: vel,
            })
            .collect()
    }

    /// Each tile sees the entity as the previous callback left it.
    fn check_sequential(&self, entity: &mut dyn Collidable) {
        let start = entity.absolute_collision_box();
        if !start.has_area() {
            return;
        }
        let ts = self.cfg.tile_size();
        let threshold = self.threshold_for(entity);

        for tile in self.candidates(start) {
            let local_box = entity.collision_box();
            let position = entity.position();
            let abs = local_box.translate(position);
            let tile_box = tile.absolute_box(ts);
            if !tile_box.intersects(&abs) {
                continue;
            }
            let solid = self.exposed_sides(tile);
            if !solid.is_empty() {
                if let Some(c) =
                    Resolver::resolve_tile(&local_box, position, entity.velocity(), &tile_box, solid, threshold)
                {
                    let event = CollisionEvent {
                        tile,
                        sides: c.sides,
                        suggested_position: c.position,
                        suggested_velocity: c.velocity,
                    };
                    log::trace!("tile `{}` at {:?}: entity sides {:?}", tile.definition_id, tile.coord, c.sides);
                    entity.on_collision(&event);
                }
            }
            Self::apply_damage(entity, tile);
        }
    }

    /// All tiles resolved against the starting state; every callback gets the merged correction.
    fn check_minimal(&self, entity: &mut dyn Collidable) {
        let position = entity.position();
        let velocity = entity.velocity();
        let threshold = self.threshold_for(entity);
        let (hits, damaging) = self.collect_hits(&entity.collision_box(), position, velocity, threshold);

        for event in Self::merged_events(position, velocity, &hits) {
            log::trace!(
                "tile `{}` at {:?}: entity sides {:?} (merged)",
                event.tile.definition_id,
                event.tile.coord,
                event.sides
            );
            entity.on_collision(&event);
        }
        for tile in damaging {
            Self::apply_damage(entity, tile);
        }
    }

    /// Solid sides of `tile` that face open space. A side is internal, and
    /// dropped, when the neighbouring cell holds a tile solid on the facing side.
    fn exposed_sides(&self, tile: &Tile) -> Sides {
        let mut sides = tile.definition.solid_sides;
        let (x, y) = tile.coord;
        for side in tile.definition.solid_sides.iter() {
            let neighbour = match side {
                Side::Left => (x - 1, y),
                Side::Right => (x + 1, y),
                Side::Top => (x, y - 1),
                Side::Bottom => (x, y + 1),
            };
            let covered = self
                .tiles
                .get(&neighbour)
                .is_some_and(|n| n.definition.solid_sides.contains(side.opposite()));
            if covered {
                sides.remove(side);
            }
        }
        sides
    }

    fn apply_damage(entity: &mut dyn Collidable, tile: &Tile) {
        if !entity.can_take_damage() {
            return;
        }
        if let Some(amount) = tile.definition.damage.filter(|d| *d > 0.0) {
            entity.take_damage(amount);
        }
    }
}
