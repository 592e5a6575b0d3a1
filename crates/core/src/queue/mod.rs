//! Reading queue ("tsundoku"): stacked books picked up one at a time.

mod error;
mod memory;
pub mod order;
mod repository;
mod service;

pub use error::QueueError;
pub use memory::InMemoryQueueRepository;
pub use repository::QueueRepository;
pub use service::QueueService;
