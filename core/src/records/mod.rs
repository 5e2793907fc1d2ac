//! Guild boss records
//!
//! `RecordBook` is the authoritative list of spawn-tracking cards. It assigns
//! ids, enforces one pending card per (boss, channel), validates names and
//! channels on write, and persists to a JSON file.

mod book;
mod error;

pub use book::RecordBook;
pub use error::RecordError;
