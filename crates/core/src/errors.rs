//! Error types for the refmerge core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

// ---------------------------------------------------------------------------
// Merge errors
// ---------------------------------------------------------------------------

/// Errors from conflict resolution and command application.
///
/// Every variant is terminal for the current merge episode.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The left/right command kinds have no resolution rule.
    #[error("unsupported conflict between {left} and {right}")]
    UnsupportedConflict {
        left: String,
        right: String,
    },

    /// Two distinct variables ended up with the same final name.
    #[error(
        "ambiguous resolution: '{left_variable}' and '{right_variable}' would both be renamed to '{name}'"
    )]
    AmbiguousResolution {
        left_variable: String,
        right_variable: String,
        name: String,
    },

    /// A command descriptor names a kind with no transformation rule.
    #[error("unsupported command kind '{0}'")]
    UnsupportedCommand(String),

    /// A command is missing a field its kind requires, or the field is empty.
    #[error("{kind} command has no value for required field '{field}'")]
    IncompleteCommand {
        kind: String,
        field: String,
    },

    /// The source text does not have the fixed two-method shape.
    #[error("source layout mismatch: expected {expected} lines, found {found}")]
    LayoutMismatch {
        expected: usize,
        found: usize,
    },

    /// The configured source layout cannot describe two methods.
    #[error("invalid source layout: {0}")]
    InvalidLayout(String),

    /// A branch carried a number of commands other than one.
    #[error("{side} branch must carry exactly one command, found {count}")]
    BranchShape {
        side: String,
        count: usize,
    },

    /// The oracle failed to produce an answer.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
}

// ---------------------------------------------------------------------------
// Oracle errors
// ---------------------------------------------------------------------------

/// Errors from oracle exchanges.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The resolver asked a question other than the next recorded one.
    #[error("unexpected question: expected '{expected}', asked '{asked}'")]
    UnexpectedQuestion {
        expected: String,
        asked: String,
    },

    /// The resolver asked a question after all exchanges were consumed.
    #[error("no recorded answer left for question '{question}'")]
    Exhausted {
        question: String,
    },

    /// The episode ended with recorded exchanges still pending.
    #[error("{remaining} recorded exchange(s) never asked, next: '{next}'")]
    Unconsumed {
        remaining: usize,
        next: String,
    },

    /// An interactive prompt could not be completed.
    #[error("prompt failed: {0}")]
    PromptFailed(String),

    /// An answers file could not be read or parsed.
    #[error("answers file error: {0}")]
    AnswersFile(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Plan errors
// ---------------------------------------------------------------------------

/// Errors from loading a merge plan file.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Plan file not found.
    #[error("merge plan not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("merge plan parse error: {0}")]
    ParseError(String),

    /// One of the branch commands could not be built.
    #[error("invalid {side} command: {source}")]
    InvalidCommand {
        side: String,
        #[source]
        source: MergeError,
    },

    /// Generic I/O error reading the plan file.
    #[error("merge plan I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
