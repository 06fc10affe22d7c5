//! Request extractors: caller identity and list query parameters.

pub mod identity;
pub mod query;
