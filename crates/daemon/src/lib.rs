#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! tsundoku daemon: JSON file storage, Google Books client and the HTTP API.

pub mod config;
pub mod filestore;
pub mod googlebooks;
pub mod http;
