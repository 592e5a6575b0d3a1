//! JSON file repositories.
//!
//! Each collection lives in one document, `{"items": {"<id>": <record>}}`.
//! Every call takes the store lock and re-reads the file, so a successful
//! write is visible to the next read and survives a restart. Writes go to a
//! temp file in the same directory and are renamed over the original.

mod favorites;
mod queue;

pub use favorites::FileFavoritesRepository;
pub use queue::FileQueueRepository;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const EMPTY_DOCUMENT: &[u8] = br#"{"items":{}}"#;

#[derive(Serialize)]
struct Document<T> {
    items: BTreeMap<String, T>,
}

/// On-disk form; a missing or `null` `items` reads as empty.
#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct StoredDocument<T> {
    #[serde(default)]
    items: Option<BTreeMap<String, T>>,
}

/// Lock-guarded JSON document holding records of type `T` keyed by id.
struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonFile<T> {
    /// Creates the parent directory and seeds an empty document if needed.
    fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            bail!("filestore path is required");
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create data dir {}", parent.display()))?;
        }
        if !path.exists() {
            fs::write(&path, EMPTY_DOCUMENT)
                .with_context(|| format!("seed {}", path.display()))?;
            tracing::info!(path = %path.display(), "created empty store");
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
            _records: PhantomData,
        })
    }

    fn read<R>(&self, f: impl FnOnce(&BTreeMap<String, T>) -> R) -> Result<R> {
        let _guard = self.guard()?;
        let doc = self.load()?;
        Ok(f(&doc.items))
    }

    fn update<R>(&self, f: impl FnOnce(&mut BTreeMap<String, T>) -> R) -> Result<R> {
        let _guard = self.guard()?;
        let mut doc = self.load()?;
        let out = f(&mut doc.items);
        self.persist(&doc)?;
        Ok(out)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| anyhow!("store lock poisoned: {}", self.path.display()))
    }

    fn load(&self) -> Result<Document<T>> {
        let bytes =
            fs::read(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document {
                items: BTreeMap::new(),
            });
        }
        let stored: StoredDocument<T> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Document {
            items: stored.items.unwrap_or_default(),
        })
    }

    fn persist(&self, doc: &Document<T>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, doc)
            .with_context(|| format!("encode {}", self.path.display()))?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}
