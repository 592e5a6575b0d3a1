//! Daemon configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved daemon settings.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// HTTP listen address.
    pub listen: SocketAddr,
    /// Holds `tsundoku.json` and `favorites.json`.
    pub data_dir: PathBuf,

    /// Catalog endpoint; `None` uses the public Google Books API.
    pub books_base_url: Option<String>,
    /// Sent as `key` when set.
    pub books_api_key: Option<String>,
    /// Per-request timeout for catalog calls.
    pub books_timeout: Duration,
}

impl DaemonConfig {
    /// Reading queue data file.
    pub fn queue_path(&self) -> PathBuf {
        self.data_dir.join("tsundoku.json")
    }

    /// Favorites data file.
    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.join("favorites.json")
    }
}
