use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::model::{Book, FavoriteItem};

use super::{FavoritesError, FavoritesRepository};

/// Add/list/delete over the favorites repository.
pub struct FavoritesService {
    repo: Arc<dyn FavoritesRepository>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl FavoritesService {
    /// Service over `repo` using the wall clock.
    pub fn new(repo: Arc<dyn FavoritesRepository>) -> Self {
        Self {
            repo,
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fails with [`FavoritesError::AlreadyExists`] if the book is already a favorite.
    pub fn add(&self, book: Book) -> Result<FavoriteItem, FavoritesError> {
        if book.id.trim().is_empty() {
            return Err(FavoritesError::InvalidInput);
        }
        let _guard = self.lock()?;

        match self.repo.get(&book.id) {
            Ok(_) => return Err(FavoritesError::AlreadyExists),
            Err(FavoritesError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let item = FavoriteItem {
            id: book.id.clone(),
            book,
            added_at: self.clock.now(),
        };
        self.repo.upsert(&item)?;
        info!(id = %item.id, "favorite added");
        Ok(item)
    }

    /// All favorites, oldest first.
    pub fn list(&self) -> Result<Vec<FavoriteItem>, FavoritesError> {
        self.repo.list()
    }

    /// Fails with [`FavoritesError::NotFound`] if the id is not a favorite.
    pub fn delete(&self, id: &str) -> Result<(), FavoritesError> {
        if id.trim().is_empty() {
            return Err(FavoritesError::InvalidInput);
        }
        let _guard = self.lock()?;

        self.repo.get(id)?;
        self.repo.delete(id)?;
        info!(id, "favorite removed");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, FavoritesError> {
        self.write_lock
            .lock()
            .map_err(|_| FavoritesError::Storage(anyhow!("favorites write lock poisoned")))
    }
}
