//! Oracles used by the command-line tool.
//!
//! Without an answers file the operator is prompted for each question; with
//! one, the recorded exchanges are replayed and must be consumed exactly.

use console::{Style, Term};
use dialoguer::Input;
use tracing::debug;

use refmerge_core::errors::OracleError;
use refmerge_core::oracle::{Oracle, ScriptedOracle};

/// Asks the operator on the terminal.
#[derive(Default)]
pub struct PromptOracle {
    asked: usize,
}

impl PromptOracle {
    pub fn new() -> Self {
        Self { asked: 0 }
    }
}

impl Oracle for PromptOracle {
    fn ask(&mut self, question: &str) -> Result<String, OracleError> {
        if self.asked == 0 {
            // stdout may carry the merged text.
            let accent = Style::new().cyan().bold();
            eprintln!();
            eprintln!("{}", accent.apply_to("=== Rename conflict ==="));
            eprintln!("Each question shows two competing names as `left <-> right`.");
            eprintln!("Enter the name that should win.");
            eprintln!();
        }
        self.asked += 1;

        if !Term::stderr().is_term() {
            return Err(OracleError::PromptFailed(
                "no terminal attached; pass --answers to replay recorded answers".into(),
            ));
        }

        let answer: String = Input::new()
            .with_prompt(question)
            .interact_text()
            .map_err(|e| OracleError::PromptFailed(e.to_string()))?;

        debug!(question, answer = %answer, "operator answered");
        Ok(answer.trim().to_string())
    }
}

/// The oracle chosen for one CLI invocation.
pub enum CliOracle {
    Scripted(ScriptedOracle),
    Prompt(PromptOracle),
}

impl CliOracle {
    /// Check the episode-level exchange invariant (scripted answers only).
    pub fn finish(&self) -> Result<(), OracleError> {
        match self {
            Self::Scripted(oracle) => oracle.finish(),
            Self::Prompt(_) => Ok(()),
        }
    }
}

impl Oracle for CliOracle {
    fn ask(&mut self, question: &str) -> Result<String, OracleError> {
        match self {
            Self::Scripted(oracle) => oracle.ask(question),
            Self::Prompt(oracle) => oracle.ask(question),
        }
    }
}
