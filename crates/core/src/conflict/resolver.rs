//! Pairwise conflict resolution.
//!
//! The [`ConflictResolver`] reconciles one left-branch command with one
//! right-branch command into zero, one, or two output commands. Conflicts are
//! only meaningful between two renames in the same method; everything else is
//! treated as independent and kept side by side.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::{Command, RenameCommand};
use crate::errors::MergeError;
use crate::oracle::{messages, Oracle};

/// How a branch pair was reconciled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    /// Edits at different sites; both kept verbatim.
    Independent,
    /// Identical edits; collapsed to one.
    Collapsed,
    /// Same variable renamed differently; the oracle picked the name.
    OracleChosen,
    /// Different variables renamed to the same name; the oracle named each.
    OracleSplit,
    /// A rename and a method move; both kept, rename first.
    CrossKind,
}

impl std::fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Independent => write!(f, "independent"),
            Self::Collapsed => write!(f, "collapsed"),
            Self::OracleChosen => write!(f, "oracle_chosen"),
            Self::OracleSplit => write!(f, "oracle_split"),
            Self::CrossKind => write!(f, "cross_kind"),
        }
    }
}

/// The agreed result for a branch pair, in application order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub kind: ResolutionKind,
    pub commands: Vec<Command>,
}

impl Resolution {
    fn new(kind: ResolutionKind, commands: Vec<Command>) -> Self {
        Self { kind, commands }
    }
}

/// Stateless conflict resolver.
pub struct ConflictResolver;

impl ConflictResolver {
    /// Resolve a branch pair to the ordered command list to apply.
    pub fn resolve<O: Oracle>(
        oracle: &mut O,
        left: &Command,
        right: &Command,
    ) -> Result<Vec<Command>, MergeError> {
        Self::resolve_detailed(oracle, left, right).map(|r| r.commands)
    }

    /// Resolve a branch pair, also reporting which rule applied.
    pub fn resolve_detailed<O: Oracle>(
        oracle: &mut O,
        left: &Command,
        right: &Command,
    ) -> Result<Resolution, MergeError> {
        debug!(%left, %right, "resolving branch pair");

        let resolution = match (left, right) {
            (Command::Rename(l), Command::Rename(r)) => Self::resolve_renames(oracle, l, r)?,
            (Command::Rename(_), Command::MoveMethod(_)) => {
                Resolution::new(ResolutionKind::CrossKind, vec![left.clone(), right.clone()])
            }
            (Command::MoveMethod(_), Command::Rename(_)) => {
                Resolution::new(ResolutionKind::CrossKind, vec![right.clone(), left.clone()])
            }
            (Command::MoveMethod(_), Command::MoveMethod(_)) => {
                return Err(MergeError::UnsupportedConflict {
                    left: left.kind().to_string(),
                    right: right.kind().to_string(),
                });
            }
        };

        info!(
            kind = %resolution.kind,
            commands = resolution.commands.len(),
            "branch pair resolved"
        );
        Ok(resolution)
    }

    fn resolve_renames<O: Oracle>(
        oracle: &mut O,
        left: &RenameCommand,
        right: &RenameCommand,
    ) -> Result<Resolution, MergeError> {
        let independent = || {
            Resolution::new(
                ResolutionKind::Independent,
                vec![Command::Rename(left.clone()), Command::Rename(right.clone())],
            )
        };

        if !left.same_method(right) {
            return Ok(independent());
        }

        if left.variable == right.variable {
            if left.new_name == right.new_name {
                return Ok(Resolution::new(
                    ResolutionKind::Collapsed,
                    vec![Command::Rename(left.clone())],
                ));
            }

            let question = messages::name_conflict(&left.new_name, &right.new_name);
            let chosen = oracle.ask(&question)?;
            info!(variable = %left.variable, %chosen, "oracle chose rename target");

            return Ok(Resolution::new(
                ResolutionKind::OracleChosen,
                vec![Command::Rename(left.with_new_name(chosen))],
            ));
        }

        if left.new_name != right.new_name {
            return Ok(independent());
        }

        let left_name = oracle.ask(&messages::variables_conflict(&left.variable, &left.new_name))?;
        let right_name =
            oracle.ask(&messages::variables_conflict(&right.variable, &right.new_name))?;

        if left_name == right_name {
            return Err(MergeError::AmbiguousResolution {
                left_variable: left.variable.clone(),
                right_variable: right.variable.clone(),
                name: left_name,
            });
        }

        info!(
            left_variable = %left.variable,
            %left_name,
            right_variable = %right.variable,
            %right_name,
            "oracle split colliding renames"
        );
        Ok(Resolution::new(
            ResolutionKind::OracleSplit,
            vec![
                Command::Rename(left.with_new_name(left_name)),
                Command::Rename(right.with_new_name(right_name)),
            ],
        ))
    }
}
