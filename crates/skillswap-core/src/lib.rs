//! Business logic and repository trait definitions for SkillSwap.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the negotiation engine and feed ranker built on
//! them. It depends only on `skillswap-types` -- never on `skillswap-infra`
//! or any database/IO crate.

pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;
