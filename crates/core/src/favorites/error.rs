use thiserror::Error;

/// Failure kinds raised by the favorites service and its repositories.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// No favorite with the given id.
    #[error("favorite not found")]
    NotFound,
    /// The book is already a favorite.
    #[error("favorite already exists")]
    AlreadyExists,
    /// Missing book id.
    #[error("invalid input")]
    InvalidInput,
    /// Persistence failure; passed through untouched.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
