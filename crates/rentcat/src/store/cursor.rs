use super::Storage;
use crate::prelude::*;
use log::warn;
use rentcat_core::cursor::{CatalogState, PageCursor, CATALOG_STATE_NAMESPACE};
use rentcat_core::filter::Filter;

/// Holds the page cursor and writes it to storage on every change.
///
/// The filters stored next to the cursor are an opaque memo for the caller: this
/// store never reads them to decide anything. Resetting the cursor when the active
/// filter changes is the caller's job.
#[derive(Debug)]
pub struct PageCursorStore<S: Storage> {
    state: CatalogState,
    storage: S,
}

impl<S: Storage> PageCursorStore<S> {
    /// Rehydrate from `storage`. Missing, corrupt, or unknown-version data starts at page 1.
    pub fn load(storage: S) -> Self {
        let raw = storage.read(CATALOG_STATE_NAMESPACE).unwrap_or_else(|err| {
            warn!("could not read catalog state, using defaults: {}", err);
            None
        });

        Self {
            state: CatalogState::from_stored(raw.as_deref()),
            storage,
        }
    }

    pub fn page(&self) -> u32 {
        self.state.page.get()
    }

    /// Move the cursor to page `n` (at least 1) and persist.
    pub fn set_page(&mut self, n: u32) -> Result<()> {
        self.state.page = PageCursor::new(n).map_err(|e| Error::InvalidInput(e.to_string()))?;
        self.persist()
    }

    /// Filters stored alongside the cursor by [`PageCursorStore::remember_filters`].
    pub fn remembered_filters(&self) -> &Filter {
        &self.state.filters
    }

    pub fn remember_filters(&mut self, filters: Filter) -> Result<()> {
        self.state.filters = filters;
        self.persist()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Back to page 1 with no remembered filters. The stored entry is dropped.
    pub fn reset(&mut self) -> Result<()> {
        self.state = CatalogState::default();
        self.storage.remove(CATALOG_STATE_NAMESPACE)
    }

    fn persist(&self) -> Result<()> {
        let data = self
            .state
            .to_stored()
            .map_err(|e| eyre!("Failed to serialize catalog state: {}", e))?;
        self.storage.write(CATALOG_STATE_NAMESPACE, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStorage;

    #[test]
    fn test_defaults_to_first_page() {
        let store = PageCursorStore::load(MemoryStorage::default());

        assert_eq!(store.page(), 1);
        assert!(store.remembered_filters().is_empty());
    }

    #[test]
    fn test_set_page_persists() {
        let storage = MemoryStorage::default();
        let mut store = PageCursorStore::load(storage.clone());

        store.set_page(4).unwrap();

        assert_eq!(store.page(), 4);
        assert_eq!(PageCursorStore::load(storage).page(), 4);
    }

    #[test]
    fn test_set_page_rejects_zero() {
        let storage = MemoryStorage::default();
        let mut store = PageCursorStore::load(storage.clone());
        store.set_page(2).unwrap();

        assert!(store.set_page(0).is_err());
        assert_eq!(store.page(), 2);
    }

    #[test]
    fn test_remembered_filters_survive_reload() {
        let storage = MemoryStorage::default();
        let mut store = PageCursorStore::load(storage.clone());
        let filter = Filter {
            brand: Some("Audi".to_string()),
            ..Default::default()
        };

        store.remember_filters(filter.clone()).unwrap();
        store.set_page(3).unwrap();

        let reloaded = PageCursorStore::load(storage);
        assert_eq!(reloaded.remembered_filters(), &filter);
        assert_eq!(reloaded.page(), 3);
    }

    #[test]
    fn test_corrupt_state_falls_back() {
        let storage = MemoryStorage::default();
        storage.set(CATALOG_STATE_NAMESPACE, "\u{0}\u{1}");

        let store = PageCursorStore::load(storage);

        assert_eq!(store.state(), &CatalogState::default());
    }

    #[test]
    fn test_reset() {
        let storage = MemoryStorage::default();
        let mut store = PageCursorStore::load(storage.clone());
        store.set_page(5).unwrap();
        store
            .remember_filters(Filter {
                rental_price: Some(40.0),
                ..Default::default()
            })
            .unwrap();

        store.reset().unwrap();

        let reloaded = PageCursorStore::load(storage);
        assert_eq!(reloaded.page(), 1);
        assert!(reloaded.remembered_filters().is_empty());
    }
}
