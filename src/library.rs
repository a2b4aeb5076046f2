use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LibraryError;
use crate::types::{TileDefinition, TileDefinitionId};

/// Registry of tile definitions, filled once while loading and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct TileDefinitionLibrary {
    definitions: HashMap<TileDefinitionId, Arc<TileDefinition>>,
}

impl TileDefinitionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` under `id`. Fails if the id is already taken.
    pub fn add(
        &mut self,
        id: impl Into<TileDefinitionId>,
        definition: TileDefinition,
    ) -> Result<(), LibraryError> {
        let id = id.into();
        if self.definitions.contains_key(&id) {
            return Err(LibraryError::DuplicateDefinition(id));
        }
        self.definitions.insert(id, Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, id: &TileDefinitionId) -> Result<&TileDefinition, LibraryError> {
        self.get_shared(id).map(Arc::as_ref)
    }

    /// Shared handle used by placed tiles.
    pub fn get_shared(&self, id: &TileDefinitionId) -> Result<&Arc<TileDefinition>, LibraryError> {
        self.definitions
            .get(id)
            .ok_or_else(|| LibraryError::MissingDefinition(id.clone()))
    }

    pub fn contains(&self, id: &TileDefinitionId) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileDefinitionId, &TileDefinition)> {
        self.definitions.iter().map(|(id, def)| (id, def.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_add_and_get() {
        let mut lib = TileDefinitionLibrary::new();
        lib.add("brick", TileDefinition::solid("brick.png", Vec2::splat(32.0))).unwrap();
        let def = lib.get(&"brick".into()).unwrap();
        assert_eq!(def.sprite_ref, "brick.png");
        assert!(def.is_solid());
        assert_eq!(lib.len(), 1);
        assert!(lib.contains(&"brick".into()));
    }

    #[test]
    fn test_duplicate_rejected_and_original_kept() {
        let mut lib = TileDefinitionLibrary::new();
        lib.add("a", TileDefinition::solid("one.png", Vec2::splat(32.0))).unwrap();
        let err = lib
            .add("a", TileDefinition::passable("two.png", Vec2::splat(32.0)))
            .unwrap_err();
        assert_eq!(err, LibraryError::DuplicateDefinition("a".into()));
        assert_eq!(lib.get(&"a".into()).unwrap().sprite_ref, "one.png");
    }

    #[test]
    fn test_missing_definition() {
        let lib = TileDefinitionLibrary::new();
        assert!(lib.is_empty());
        assert_eq!(
            lib.get(&"ghost".into()).unwrap_err(),
            LibraryError::MissingDefinition("ghost".into())
        );
    }

    #[test]
    fn test_library_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<TileDefinitionLibrary>();
    }
}
