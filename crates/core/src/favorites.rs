//! Favorites set and its stored form.
//!
//! Stored as `{"state": {"ids": {"<car id>": true}}, "version": 0}`.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::persist::{read_envelope, write_envelope};

/// Storage namespace for the favorites set.
pub const FAVORITES_NAMESPACE: &str = "favorites-store";

/// Schema version written with the favorites set.
pub const FAVORITES_VERSION: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredFavorites {
    #[serde(default)]
    ids: BTreeMap<String, bool>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Serialize into the stored envelope.
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        let stored = StoredFavorites {
            ids: self.ids.iter().map(|id| (id.clone(), true)).collect(),
        };
        write_envelope(&stored, FAVORITES_VERSION)
    }

    /// Rehydrate from the stored envelope. Missing or corrupt data yields an empty set.
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(envelope) = raw.and_then(read_envelope) else {
            return Self::default();
        };

        match serde_json::from_value::<StoredFavorites>(envelope.state) {
            Ok(stored) => Self {
                ids: stored
                    .ids
                    .into_iter()
                    .filter(|(_, marked)| *marked)
                    .map(|(id, _)| id)
                    .collect(),
            },
            Err(err) => {
                warn!("ignoring unreadable favorites: {}", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = FavoritesSet::new();

        assert!(favorites.toggle("9582"));
        assert!(favorites.contains("9582"));

        assert!(!favorites.toggle("9582"));
        assert!(!favorites.contains("9582"));
    }

    #[test]
    fn test_toggle_twice_restores_prior_state() {
        let mut favorites = FavoritesSet::new();
        favorites.toggle("a");
        favorites.toggle("b");
        let before = favorites.clone();

        favorites.toggle("c");
        favorites.toggle("c");
        assert_eq!(favorites, before);

        favorites.toggle("a");
        favorites.toggle("a");
        assert_eq!(favorites, before);
    }

    #[test]
    fn test_clear() {
        let mut favorites = FavoritesSet::new();
        favorites.toggle("a");
        favorites.toggle("b");

        favorites.clear();

        assert!(favorites.is_empty());
        assert!(!favorites.contains("a"));
    }

    #[test]
    fn test_stored_shape() {
        let mut favorites = FavoritesSet::new();
        favorites.toggle("9582");

        let raw = favorites.to_stored().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["ids"]["9582"], true);
    }

    #[test]
    fn test_stored_round_trip() {
        let mut favorites = FavoritesSet::new();
        favorites.toggle("x");
        favorites.toggle("y");

        let raw = favorites.to_stored().unwrap();
        let restored = FavoritesSet::from_stored(Some(&raw));

        assert_eq!(restored, favorites);
        assert_eq!(restored.ids().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_from_stored_missing_or_corrupt() {
        assert!(FavoritesSet::from_stored(None).is_empty());
        assert!(FavoritesSet::from_stored(Some("garbage")).is_empty());
        assert!(FavoritesSet::from_stored(Some(r#"{"state":{"ids":[1,2]},"version":0}"#)).is_empty());
    }

    #[test]
    fn test_from_stored_skips_unmarked_ids() {
        let raw = r#"{"state":{"ids":{"a":true,"b":false}},"version":0}"#;
        let favorites = FavoritesSet::from_stored(Some(raw));

        assert!(favorites.contains("a"));
        assert!(!favorites.contains("b"));
        assert_eq!(favorites.len(), 1);
    }

    proptest! {
        #[test]
        fn test_toggle_twice_restores_any_set(
            initial in proptest::collection::btree_set("[0-9a-f]{1,4}", 0..8),
            id in "[0-9a-f]{1,4}",
        ) {
            let mut favorites = FavoritesSet::new();
            for existing in &initial {
                favorites.toggle(existing);
            }
            let before = favorites.clone();
            let was_favorite = initial.contains(&id);

            prop_assert_eq!(favorites.toggle(&id), !was_favorite);
            prop_assert_eq!(favorites.contains(&id), !was_favorite);

            prop_assert_eq!(favorites.toggle(&id), was_favorite);
            prop_assert_eq!(favorites.contains(&id), was_favorite);
            prop_assert_eq!(favorites, before);
        }
    }
}
