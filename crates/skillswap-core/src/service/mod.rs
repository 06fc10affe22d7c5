//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations. Both
//! are stateless per call; all shared state lives in the store.

pub mod exchange;
pub mod feed;
