//! refmerge core library.
//!
//! This crate merges two branches that each carry one refactoring command
//! (variable rename or method reorder) recorded against a shared baseline. It
//! provides the command model, the oracle contract used to break ties,
//! conflict resolution, command application, and plan/config loading.

pub mod command;
pub mod config;
pub mod conflict;
pub mod errors;
pub mod oracle;
pub mod plan;
pub mod session;

// Re-exports for convenience.
pub use command::Command;
pub use config::MergeConfig;
pub use conflict::{Applier, ConflictResolver};
pub use oracle::{Oracle, ScriptedOracle};
pub use plan::MergePlan;
pub use session::{MergeOutcome, MergeSession};
