//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (skillswap-infra) implements. The core crate never depends on any
//! specific storage technology.
//!
//! Soft-deleted rows (inactive, or with a deletion timestamp) are invisible
//! through every read method below.

pub mod exchange;
pub mod skill;

/// A limit/offset slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}
