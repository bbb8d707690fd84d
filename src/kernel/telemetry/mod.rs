//! Sweep telemetry.
//!
//! # INVARIANT
//! Telemetry is a READ-ONLY side-effect layer. It is never consulted by the registry,
//! the threshold evaluator or the poll cycle's transitions.
//!
//! Events carry counts and failure kinds only, never attribute values.

pub mod event;
pub mod metrics;
pub mod recorder;
