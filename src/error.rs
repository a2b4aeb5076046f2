use thiserror::Error;

use crate::types::{GridCoord, TileDefinitionId};

/// Errors raised by the tile definition library.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error("tile definition `{0}` is already registered")]
    DuplicateDefinition(TileDefinitionId),
    #[error("tile definition `{0}` is not registered")]
    MissingDefinition(TileDefinitionId),
}

/// Errors raised when placing a tile on the grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("grid coordinate ({}, {}) lies outside the {width}x{height} grid", .coord.0, .coord.1)]
    OutOfBounds { coord: GridCoord, width: u32, height: u32 },
    #[error("placement at ({}, {}) references unknown tile definition `{id}`", .coord.0, .coord.1)]
    MissingDefinition { coord: GridCoord, id: TileDefinitionId },
}

/// Errors that abort loading a tile library or tile map.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}
