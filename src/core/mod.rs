//! Core carousel logic: viewport policy, navigation engine, scheduling,
//! and the testimonial data source.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Time and
//! frames reach the engine only through the [`scheduler::Scheduler`] port.

pub mod engine;
pub mod scheduler;
pub mod testimonial;
pub mod transition;
pub mod viewport;
