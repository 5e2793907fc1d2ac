//! Boss records and board status
//!
//! This module provides:
//! - **BossRecord**: A spawn-tracking card as kept by the record book
//! - **BossStatusInfo**: One computed entry on the status board
//! - **PairKey**: Identity of a (boss, channel) combination

mod error;
mod record;
mod status;

pub use error::TimestampError;
pub use record::{BossRecord, PairKey, RecordStatus, format_timestamp, parse_timestamp};
pub use status::{BossStatus, BossStatusInfo};
