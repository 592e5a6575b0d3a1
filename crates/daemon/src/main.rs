#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Tsundoku daemon: reading queue, favorites and book search over HTTP.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tsundoku_core::books::BookService;
use tsundoku_core::favorites::FavoritesService;
use tsundoku_core::queue::QueueService;
use tsundoku_daemon::config::DaemonConfig;
use tsundoku_daemon::filestore::{FileFavoritesRepository, FileQueueRepository};
use tsundoku_daemon::googlebooks::GoogleBooksClient;
use tsundoku_daemon::http::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "tsundoku-daemon", version)]
struct Args {
    /// Listen address, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Directory for the JSON data files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Google Books volumes endpoint.
    #[arg(long, env = "BOOKS_BASE_URL")]
    books_base_url: Option<String>,

    /// Google Books API key.
    #[arg(long, env = "BOOKS_API_KEY", hide_env_values = true)]
    books_api_key: Option<String>,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    books_timeout_secs: u64,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

impl From<Args> for DaemonConfig {
    fn from(args: Args) -> Self {
        DaemonConfig {
            listen: args.listen,
            data_dir: args.data_dir,
            books_base_url: args.books_base_url,
            books_api_key: args.books_api_key,
            books_timeout: Duration::from_secs(args.books_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DaemonConfig::from(args);

    let queue_repo = FileQueueRepository::open(config.queue_path())
        .context("open tsundoku store")?;
    let favorites_repo = FileFavoritesRepository::open(config.favorites_path())
        .context("open favorites store")?;
    let client = GoogleBooksClient::new(
        config.books_base_url.as_deref(),
        config.books_api_key.clone(),
        config.books_timeout,
    )?;

    let state = AppState {
        queue: Arc::new(QueueService::new(Arc::new(queue_repo))),
        favorites: Arc::new(FavoritesService::new(Arc::new(favorites_repo))),
        books: Arc::new(BookService::new(client)),
    };
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;
    tracing::info!(
        listen = %config.listen,
        data_dir = %config.data_dir.display(),
        "daemon starting"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
    }
}
