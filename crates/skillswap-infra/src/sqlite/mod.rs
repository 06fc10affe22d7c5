//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Every read hides soft-deleted rows.

pub mod exchange;
pub mod pool;
mod row;
pub mod skill;
pub mod user;
