//! Flat favorites list keyed by book id.

mod error;
mod memory;
mod repository;
mod service;

pub use error::FavoritesError;
pub use memory::InMemoryFavoritesRepository;
pub use repository::{sort_favorites, FavoritesRepository};
pub use service::FavoritesService;
