use std::path::PathBuf;

use anyhow::Result;
use tsundoku_core::favorites::{sort_favorites, FavoritesError, FavoritesRepository};
use tsundoku_core::model::FavoriteItem;

use super::JsonFile;

/// Favorites persisted as one JSON document.
pub struct FileFavoritesRepository {
    file: JsonFile<FavoriteItem>,
}

impl FileFavoritesRepository {
    /// Opens or creates the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            file: JsonFile::open(path)?,
        })
    }
}

impl FavoritesRepository for FileFavoritesRepository {
    fn get(&self, id: &str) -> Result<FavoriteItem, FavoritesError> {
        self.file
            .read(|items| items.get(id).cloned())?
            .ok_or(FavoritesError::NotFound)
    }

    fn upsert(&self, item: &FavoriteItem) -> Result<(), FavoritesError> {
        self.file.update(|items| {
            items.insert(item.id.clone(), item.clone());
        })?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), FavoritesError> {
        self.file.update(|items| {
            items.remove(id);
        })?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<FavoriteItem>, FavoritesError> {
        let mut out = self
            .file
            .read(|items| items.values().cloned().collect::<Vec<_>>())?;
        sort_favorites(&mut out);
        Ok(out)
    }
}
