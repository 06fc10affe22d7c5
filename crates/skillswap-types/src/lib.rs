//! Shared domain types for SkillSwap.
//!
//! Users list skills they can teach and propose bilateral trades. This crate
//! holds the records those trades are built from (Skill, ExchangeRequest,
//! Exchange), feed and pagination types, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

mod id;

pub mod category;
pub mod config;
pub mod error;
pub mod exchange;
pub mod feed;
pub mod skill;
pub mod user;
