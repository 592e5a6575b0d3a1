#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and logic for the tsundoku book tracker: the reading queue
//! state machine, the favorites list and the catalog search port.

pub mod api;
pub mod books;
pub mod clock;
pub mod favorites;
pub mod model;
pub mod queue;

pub use clock::{Clock, ManualClock, SystemClock};
