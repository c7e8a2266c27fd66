//! Embedded assessment engine for a content site: data-driven scored tests,
//! a session state machine with debounced auto-advance, contact capture, and
//! result persistence.

pub mod assessments;
pub mod config;
pub mod error;
pub mod telemetry;
