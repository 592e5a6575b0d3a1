use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::model::{AddParams, QueueItem, Status};

use super::{QueueError, QueueRepository};

/// Reading queue state machine.
///
/// ```text
/// stacked --pickup/start_reading--> reading --update_status--> done
///    ^                                                          |
///    +------------------------- restack -------------------------+
/// ```
///
/// Holds no domain state of its own. Each operation is a read-then-write over
/// the repository, so the whole sequence runs under `write_lock`.
pub struct QueueService {
    repo: Arc<dyn QueueRepository>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl QueueService {
    /// Service over `repo` using the wall clock.
    pub fn new(repo: Arc<dyn QueueRepository>) -> Self {
        Self {
            repo,
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the clock (tests pin time with [`ManualClock`](crate::ManualClock)).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Stacks a book. A book whose item is `done` starts over; any other
    /// existing item is a duplicate.
    pub fn add(&self, params: AddParams) -> Result<QueueItem, QueueError> {
        if params.book.id.trim().is_empty() {
            return Err(QueueError::InvalidInput);
        }
        let _guard = self.lock()?;

        match self.repo.get(&params.book.id) {
            Ok(existing) if existing.status != Status::Done => {
                return Err(QueueError::AlreadyExists);
            }
            Ok(_) | Err(QueueError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let now = self.clock.now();
        let item = QueueItem {
            id: params.book.id.clone(),
            book: params.book,
            note: params.note,
            priority: params.priority,
            status: Status::Stacked,
            added_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
        };
        self.repo.upsert(&item)?;
        info!(id = %item.id, status = %item.status, "tsundoku item stacked");
        Ok(item)
    }

    /// Items in queue order, optionally filtered by a raw status string.
    /// Blank or absent means no filter.
    pub fn list(&self, status: Option<&str>) -> Result<Vec<QueueItem>, QueueError> {
        let filter = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<Status>().map_err(|_| QueueError::InvalidStatus)?),
            None => None,
        };
        self.repo.list(filter)
    }

    /// Promotes the oldest stacked item to `reading`.
    pub fn pickup(&self) -> Result<QueueItem, QueueError> {
        let _guard = self.lock()?;
        self.ensure_no_reader()?;

        let item = self.repo.find_oldest_stacked()?;
        self.promote(item)
    }

    /// Promotes a specific stacked item to `reading`.
    pub fn start_reading(&self, id: &str) -> Result<QueueItem, QueueError> {
        let _guard = self.lock()?;
        self.ensure_no_reader()?;

        let item = self.repo.get(id)?;
        if item.status != Status::Stacked {
            return Err(QueueError::InvalidStatus);
        }
        self.promote(item)
    }

    /// Manual status override.
    ///
    /// `status` must be an exact wire name; padding is not stripped.
    /// Does not check for another reader: this is the correction path, and
    /// may leave more than one item in `reading`.
    pub fn update_status(&self, id: &str, status: &str) -> Result<QueueItem, QueueError> {
        let status: Status = status.parse().map_err(|_| QueueError::InvalidStatus)?;
        let _guard = self.lock()?;

        let mut item = self.repo.get(id)?;
        let now = self.clock.now();
        item.status = status;
        item.updated_at = now;
        match status {
            Status::Stacked => {
                item.started_at = None;
                item.completed_at = None;
            }
            Status::Reading => {
                if item.started_at.is_none() {
                    item.started_at = Some(now);
                }
            }
            Status::Done => {
                item.completed_at = Some(now);
            }
        }

        self.repo.upsert(&item)?;
        info!(id = %item.id, status = %item.status, "tsundoku status updated");
        Ok(item)
    }

    /// Moves a `done` item to the back of the stacked queue.
    pub fn restack(&self, id: &str) -> Result<QueueItem, QueueError> {
        let _guard = self.lock()?;

        let mut item = self.repo.get(id)?;
        if item.status != Status::Done {
            return Err(QueueError::InvalidStatus);
        }

        let at = self.restack_time()?;
        item.status = Status::Stacked;
        item.added_at = at;
        item.updated_at = at;
        item.started_at = None;
        item.completed_at = None;

        self.repo.upsert(&item)?;
        info!(id = %item.id, added_at = %item.added_at, "tsundoku item restacked");
        Ok(item)
    }

    /// `now`, bumped to 1ms past the newest stacked item when the clock has
    /// not moved beyond it.
    fn restack_time(&self) -> Result<DateTime<Utc>, QueueError> {
        let now = self.clock.now();
        match self.repo.find_newest_stacked() {
            Ok(newest) => {
                let candidate = newest.added_at + TimeDelta::milliseconds(1);
                Ok(if now > candidate { now } else { candidate })
            }
            Err(QueueError::NoStackedItems) => Ok(now),
            Err(e) => Err(e),
        }
    }

    fn ensure_no_reader(&self) -> Result<(), QueueError> {
        if self.repo.list(Some(Status::Reading))?.is_empty() {
            Ok(())
        } else {
            Err(QueueError::ReadingInProgress)
        }
    }

    fn promote(&self, mut item: QueueItem) -> Result<QueueItem, QueueError> {
        let now = self.clock.now();
        item.status = Status::Reading;
        item.updated_at = now;
        if item.started_at.is_none() {
            item.started_at = Some(now);
        }

        self.repo.upsert(&item)?;
        info!(id = %item.id, status = %item.status, "tsundoku item picked up");
        Ok(item)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, QueueError> {
        self.write_lock
            .lock()
            .map_err(|_| QueueError::Storage(anyhow!("queue write lock poisoned")))
    }
}
