//! Live status state

mod status_store;

#[cfg(test)]
mod store_tests;

pub use status_store::{StatusChange, StatusStore};
