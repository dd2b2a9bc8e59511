//! Conflict resolution and command application.
//!
//! The conflict subsystem is responsible for:
//! 1. **Resolution** -- reconciling one left and one right command, asking the
//!    oracle when the two cannot be combined automatically.
//! 2. **Application** -- folding the resolved command list over the baseline.

pub mod applier;
pub mod resolver;

pub use applier::Applier;
pub use resolver::{ConflictResolver, Resolution, ResolutionKind};
