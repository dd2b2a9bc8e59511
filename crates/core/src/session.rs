//! Merge sessions.
//!
//! A [`MergeSession`] holds a baseline text and the commands recorded on each
//! branch. [`MergeSession::merge`] runs one resolution episode: resolve the
//! branch pair, then apply the result to the baseline.

use tracing::{debug, info};

use crate::command::Command;
use crate::config::MethodLayout;
use crate::conflict::{Applier, ConflictResolver, Resolution};
use crate::errors::MergeError;
use crate::oracle::Oracle;

/// The result of a merge episode.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The resolved commands and the rule that produced them.
    pub resolution: Resolution,
    /// Baseline text with the resolved commands applied.
    pub merged: String,
}

impl MergeOutcome {
    /// The resolved commands, in application order.
    pub fn commands(&self) -> &[Command] {
        &self.resolution.commands
    }

    /// Unified diff from `baseline` to the merged text.
    pub fn unified_diff(&self, baseline: &str) -> String {
        diffy::create_patch(baseline, &self.merged).to_string()
    }
}

/// A baseline forked into a left and a right branch.
#[derive(Debug, Clone)]
pub struct MergeSession {
    baseline: String,
    left: Vec<Command>,
    right: Vec<Command>,
    applier: Applier,
}

impl MergeSession {
    /// Fork `baseline` into two empty branches.
    pub fn fork(baseline: impl Into<String>) -> Self {
        Self {
            baseline: baseline.into(),
            left: Vec::new(),
            right: Vec::new(),
            applier: Applier::default(),
        }
    }

    /// Use a non-default source layout for method moves.
    pub fn with_layout(mut self, layout: MethodLayout) -> Self {
        self.applier = Applier::new(layout);
        self
    }

    pub fn add_left(mut self, command: Command) -> Self {
        self.left.push(command);
        self
    }

    pub fn add_right(mut self, command: Command) -> Self {
        self.right.push(command);
        self
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Resolve the branch pair and apply the result to the baseline.
    pub fn merge<O: Oracle>(&self, oracle: &mut O) -> Result<MergeOutcome, MergeError> {
        let left = single("left", &self.left)?;
        let right = single("right", &self.right)?;

        info!(%left, %right, "merging branches");
        let resolution = ConflictResolver::resolve_detailed(oracle, left, right)?;
        let merged = self.applier.apply(&self.baseline, &resolution.commands)?;
        let changed = merged != self.baseline;
        debug!(changed, bytes = merged.len(), "merge applied");

        Ok(MergeOutcome { resolution, merged })
    }
}

fn single<'a>(side: &str, commands: &'a [Command]) -> Result<&'a Command, MergeError> {
    match commands {
        [command] => Ok(command),
        _ => Err(MergeError::BranchShape {
            side: side.to_string(),
            count: commands.len(),
        }),
    }
}
