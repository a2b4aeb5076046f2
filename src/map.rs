//! Persisted tile library and tile map documents.
//!
//! Both documents are JSON:
//! - `TileLibraryDoc` - tile definitions (sprite, tile-local box, solid sides)
//! - `TileMapDoc` - grid extent and tile placements
//!
//! Loading is fail-fast: the first bad definition or placement aborts the
//! whole load and no partially filled grid is returned.

use serde::{Deserialize, Serialize};

use crate::api::TileGridApi;
use crate::error::LoadError;
use crate::grid::TileGrid;
use crate::library::TileDefinitionLibrary;
use crate::types::*;

/// One persisted tile definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileDefinitionDoc {
    pub id: TileDefinitionId,
    pub sprite_ref: String,
    pub collision_box: Rect,
    #[serde(default)]
    pub collision_sides: Sides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<f32>,
}

impl From<&TileDefinitionDoc> for TileDefinition {
    fn from(doc: &TileDefinitionDoc) -> Self {
        TileDefinition {
            sprite_ref: doc.sprite_ref.clone(),
            collision_box: doc.collision_box,
            solid_sides: doc.collision_sides,
            damage: doc.damage,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileLibraryDoc {
    #[serde(default)]
    pub definitions: Vec<TileDefinitionDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDoc {
    pub x: i32,
    pub y: i32,
    pub tile_definition_id: TileDefinitionId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileMapDoc {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub placements: Vec<PlacementDoc>,
}

pub fn parse_library(json: &str) -> Result<TileLibraryDoc, LoadError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_map(json: &str) -> Result<TileMapDoc, LoadError> {
    Ok(serde_json::from_str(json)?)
}

impl TileDefinitionLibrary {
    /// Build a library from its document, rejecting duplicate ids.
    pub fn from_doc(doc: &TileLibraryDoc) -> Result<Self, LoadError> {
        let mut library = TileDefinitionLibrary::new();
        for def in &doc.definitions {
            library.add(def.id.clone(), TileDefinition::from(def))?;
        }
        Ok(library)
    }
}

/// Build a grid from a map document. Any placement error aborts the load.
pub fn load_grid(
    library: TileDefinitionLibrary,
    map: &TileMapDoc,
    cfg: GridConfig,
) -> Result<TileGrid, LoadError> {
    let mut grid = TileGrid::new(library, map.width, map.height, cfg);
    for p in &map.placements {
        if let Err(e) = grid.place((p.x, p.y), &p.tile_definition_id) {
            log::warn!("aborting tile map load: {e}");
            return Err(e.into());
        }
    }
    log::debug!(
        "loaded {}x{} tile map: {} tiles, {} definitions",
        map.width,
        map.height,
        grid.len(),
        grid.library().len()
    );
    Ok(grid)
}

/// Parse both documents and build the grid.
pub fn load_level(library_json: &str, map_json: &str, cfg: GridConfig) -> Result<TileGrid, LoadError> {
    let library = TileDefinitionLibrary::from_doc(&parse_library(library_json)?)?;
    let map = parse_map(map_json)?;
    load_grid(library, &map, cfg)
}
