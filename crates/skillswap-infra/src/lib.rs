//! Infrastructure layer for SkillSwap.
//!
//! Contains the SQLite implementations of the repository traits defined in
//! `skillswap-core`, plus configuration file loading.

pub mod config;
pub mod sqlite;
