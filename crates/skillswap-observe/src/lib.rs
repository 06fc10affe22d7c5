//! Observability setup for SkillSwap.
//!
//! Installs the global tracing subscriber: a human-readable or JSON log
//! layer, optionally bridged to OpenTelemetry.

pub mod tracing_setup;
