use crate::model::FavoriteItem;

use super::FavoritesError;

/// Persistence port for favorites, keyed by book id.
pub trait FavoritesRepository: Send + Sync {
    /// Fails with [`FavoritesError::NotFound`] if absent.
    fn get(&self, id: &str) -> Result<FavoriteItem, FavoritesError>;
    /// Insert or fully replace by id.
    fn upsert(&self, item: &FavoriteItem) -> Result<(), FavoritesError>;
    /// Removing an absent id is not an error.
    fn delete(&self, id: &str) -> Result<(), FavoritesError>;
    /// All favorites, oldest first (see [`sort_favorites`]).
    fn list(&self) -> Result<Vec<FavoriteItem>, FavoritesError>;
}

/// Orders by `added_at`, then id.
pub fn sort_favorites(items: &mut [FavoriteItem]) {
    items.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
}
