//! Merge plan files.
//!
//! A plan names a baseline file and the command recorded on each branch:
//!
//! ```toml
//! baseline = "Ex_1.cs"
//!
//! [left]
//! kind = "rename"
//! class = "GeneralCase"
//! method = "Method"
//! variable = "variable"
//! new_name = "variable1"
//!
//! [right]
//! kind = "move_method"
//! class = "GeneralCase"
//! method = "MethodB"
//! move_up = true
//! ```
//!
//! Reading the baseline text itself is left to the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::{Command, CommandSpec};
use crate::errors::PlanError;
use crate::session::MergeSession;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlanFile {
    baseline: PathBuf,
    left: CommandSpec,
    right: CommandSpec,
}

/// A validated merge plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Path of the baseline source text.
    pub baseline: PathBuf,
    pub left: Command,
    pub right: Command,
}

impl MergePlan {
    /// Parse a plan from TOML. A relative baseline path is kept as written.
    pub fn from_toml_str(contents: &str) -> Result<Self, PlanError> {
        let file: PlanFile =
            toml::from_str(contents).map_err(|e| PlanError::ParseError(e.to_string()))?;

        let left = Command::try_from(file.left).map_err(|source| PlanError::InvalidCommand {
            side: "left".into(),
            source,
        })?;
        let right = Command::try_from(file.right).map_err(|source| PlanError::InvalidCommand {
            side: "right".into(),
            source,
        })?;

        Ok(Self {
            baseline: file.baseline,
            left,
            right,
        })
    }

    /// Load a plan file, resolving a relative baseline path against the
    /// directory containing the plan.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading merge plan");

        if !path.exists() {
            return Err(PlanError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut plan = Self::from_toml_str(&contents)?;

        if plan.baseline.is_relative() {
            if let Some(dir) = path.parent() {
                plan.baseline = dir.join(&plan.baseline);
            }
        }

        debug!(baseline = %plan.baseline.display(), left = %plan.left, right = %plan.right, "merge plan parsed");
        Ok(plan)
    }

    /// Fork `baseline_text` with this plan's commands.
    pub fn session(&self, baseline_text: impl Into<String>) -> MergeSession {
        MergeSession::fork(baseline_text)
            .add_left(self.left.clone())
            .add_right(self.right.clone())
    }
}
