use super::Storage;
use crate::prelude::*;
use log::{debug, warn};
use rentcat_core::favorites::{FavoritesSet, FAVORITES_NAMESPACE};

/// Favorites set that writes itself to storage after every change.
#[derive(Debug)]
pub struct FavoritesStore<S: Storage> {
    set: FavoritesSet,
    storage: S,
}

impl<S: Storage> FavoritesStore<S> {
    /// Rehydrate from `storage`. Missing or corrupt data starts an empty set.
    pub fn load(storage: S) -> Self {
        let raw = storage.read(FAVORITES_NAMESPACE).unwrap_or_else(|err| {
            warn!("could not read favorites, starting empty: {}", err);
            None
        });
        let set = FavoritesSet::from_stored(raw.as_deref());
        debug!("loaded {} favorites", set.len());

        Self { set, storage }
    }

    /// Flip membership of `id` and persist. Returns whether `id` is now a favorite.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let now_favorite = self.set.toggle(id);
        self.persist()?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set.clear();
        self.persist()
    }

    pub fn ids(&self) -> Vec<String> {
        self.set.ids().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let data = self
            .set
            .to_stored()
            .map_err(|e| eyre!("Failed to serialize favorites: {}", e))?;
        self.storage.write(FAVORITES_NAMESPACE, &data)
    }
}
