//! HTTP/REST API layer for SkillSwap.
//!
//! Axum-based REST API at `/api/v1/` with caller identity taken from the
//! `X-User-Id` header, envelope response format, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
