//! tilebonk: tile-grid collision detection and resolution for 2D platformers

pub mod types;
pub mod error;
pub mod api;
pub mod library;
pub mod resolve;
pub mod grid;
pub mod map;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::{LibraryError, LoadError, PlacementError};
pub use crate::library::TileDefinitionLibrary;
pub use crate::grid::TileGrid;
pub use crate::map::{load_grid, load_level, parse_library, parse_map};
