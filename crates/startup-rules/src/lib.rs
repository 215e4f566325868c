//! Startup Rule Engine
//!
//! Counts qualifying application launches in durable storage and fires
//! registered callbacks at most once per process, based on how the launch
//! count compares to each rule's threshold. Typical uses: a welcome screen
//! on the first few launches, a review prompt once the user has returned
//! often enough.
//!
//! The engine is single-threaded by design. Construct it in the
//! application's composition root and call [`StartupRuleEngine::fire`] from
//! the single designated entry point.

mod engine;
mod rule;

pub use engine::{EngineConfig, EngineError, FireOutcome, StartupRuleEngine};
pub use rule::{Action, Comparison};
