//! REST API request handlers.

pub mod exchange;
pub mod skill;
