use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

use crate::model::FavoriteItem;

use super::{sort_favorites, FavoritesError, FavoritesRepository};

/// In-memory favorites storage for tests.
#[derive(Debug, Default)]
pub struct InMemoryFavoritesRepository {
    items: Mutex<HashMap<String, FavoriteItem>>,
}

impl InMemoryFavoritesRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, FavoriteItem>>, FavoritesError> {
        self.items
            .lock()
            .map_err(|_| FavoritesError::Storage(anyhow!("favorites store lock poisoned")))
    }
}

impl FavoritesRepository for InMemoryFavoritesRepository {
    fn get(&self, id: &str) -> Result<FavoriteItem, FavoritesError> {
        self.lock()?.get(id).cloned().ok_or(FavoritesError::NotFound)
    }

    fn upsert(&self, item: &FavoriteItem) -> Result<(), FavoritesError> {
        self.lock()?.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), FavoritesError> {
        self.lock()?.remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<FavoriteItem>, FavoritesError> {
        let mut out: Vec<FavoriteItem> = self.lock()?.values().cloned().collect();
        sort_favorites(&mut out);
        Ok(out)
    }
}
