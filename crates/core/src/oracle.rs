//! The oracle: an external decision-maker consulted when the resolver cannot
//! break a tie on its own.
//!
//! Question strings are a protocol shared with whoever presents them, so they
//! are built only through [`messages`].

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::OracleError;

/// Synchronous question/answer contract.
pub trait Oracle {
    /// Ask a question and block until an answer is available.
    fn ask(&mut self, question: &str) -> Result<String, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn ask(&mut self, question: &str) -> Result<String, OracleError> {
        (**self).ask(question)
    }
}

// ---------------------------------------------------------------------------
// Question templates
// ---------------------------------------------------------------------------

pub mod messages {
    /// Both sides renamed the same variable to different names.
    pub fn name_conflict(left_name: &str, right_name: &str) -> String {
        format!("{} <-> {}", left_name, right_name)
    }

    /// Two different variables were renamed to the same name; asked once per side.
    pub fn variables_conflict(variable: &str, new_name: &str) -> String {
        format!("{} <-> {}", variable, new_name)
    }
}

// ---------------------------------------------------------------------------
// Scripted oracle
// ---------------------------------------------------------------------------

/// One recorded question and the answer to give for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
struct AnswersFile {
    #[serde(default)]
    exchange: Vec<Exchange>,
}

/// Replays pre-recorded exchanges in order.
///
/// Each `ask` must match the next recorded question exactly. Call
/// [`finish`](Self::finish) when the episode ends to check that nothing was
/// left unasked.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    pending: VecDeque<Exchange>,
    asked: usize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle that must never be consulted.
    pub fn not_asked() -> Self {
        Self::default()
    }

    /// Record the next expected question and its answer.
    pub fn expect(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.pending.push_back(Exchange {
            question: question.into(),
            answer: answer.into(),
        });
        self
    }

    pub fn from_exchanges(exchanges: impl IntoIterator<Item = Exchange>) -> Self {
        Self {
            pending: exchanges.into_iter().collect(),
            asked: 0,
        }
    }

    /// Parse an answers file of `[[exchange]]` tables.
    pub fn from_toml_str(contents: &str) -> Result<Self, OracleError> {
        let file: AnswersFile =
            toml::from_str(contents).map_err(|e| OracleError::AnswersFile(e.to_string()))?;
        Ok(Self::from_exchanges(file.exchange))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, OracleError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading scripted answers");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| OracleError::AnswersFile(format!("{}: {}", path.display(), e)))?;
        let oracle = Self::from_toml_str(&contents)?;

        debug!(exchanges = oracle.remaining(), "scripted answers loaded");
        Ok(oracle)
    }

    /// Number of exchanges not yet consumed.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Number of questions answered so far.
    pub fn asked(&self) -> usize {
        self.asked
    }

    /// Check that every recorded exchange was consumed.
    pub fn finish(&self) -> Result<(), OracleError> {
        match self.pending.front() {
            None => Ok(()),
            Some(next) => Err(OracleError::Unconsumed {
                remaining: self.pending.len(),
                next: next.question.clone(),
            }),
        }
    }
}

impl Oracle for ScriptedOracle {
    fn ask(&mut self, question: &str) -> Result<String, OracleError> {
        let Some(next) = self.pending.front() else {
            return Err(OracleError::Exhausted {
                question: question.to_string(),
            });
        };

        if next.question != question {
            return Err(OracleError::UnexpectedQuestion {
                expected: next.question.clone(),
                asked: question.to_string(),
            });
        }

        let exchange = self.pending.pop_front().ok_or_else(|| OracleError::Exhausted {
            question: question.to_string(),
        })?;
        self.asked += 1;
        debug!(question, answer = %exchange.answer, "scripted answer");
        Ok(exchange.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_templates() {
        assert_eq!(
            messages::name_conflict("variable1", "variable2"),
            "variable1 <-> variable2"
        );
        assert_eq!(
            messages::variables_conflict("tail", "variable1"),
            "tail <-> variable1"
        );
    }

    #[test]
    fn test_answers_in_order() {
        let mut oracle = ScriptedOracle::new().expect("a <-> b", "c").expect("d <-> e", "f");

        assert_eq!(oracle.ask("a <-> b").unwrap(), "c");
        assert_eq!(oracle.remaining(), 1);
        assert_eq!(oracle.ask("d <-> e").unwrap(), "f");
        assert_eq!(oracle.asked(), 2);
        oracle.finish().unwrap();
    }

    #[test]
    fn test_out_of_order_question() {
        let mut oracle = ScriptedOracle::new().expect("a <-> b", "c").expect("d <-> e", "f");

        let err = oracle.ask("d <-> e").unwrap_err();
        assert_eq!(
            err,
            OracleError::UnexpectedQuestion {
                expected: "a <-> b".into(),
                asked: "d <-> e".into(),
            }
        );
    }

    #[test]
    fn test_not_asked_rejects_any_question() {
        let mut oracle = ScriptedOracle::not_asked();
        oracle.finish().unwrap();

        let err = oracle.ask("x <-> y").unwrap_err();
        assert!(matches!(err, OracleError::Exhausted { .. }));
    }

    #[test]
    fn test_finish_reports_leftovers() {
        let mut oracle = ScriptedOracle::new().expect("a <-> b", "c").expect("d <-> e", "f");
        oracle.ask("a <-> b").unwrap();

        let err = oracle.finish().unwrap_err();
        assert_eq!(
            err,
            OracleError::Unconsumed {
                remaining: 1,
                next: "d <-> e".into(),
            }
        );
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
[[exchange]]
question = "variable <-> variable1"
answer = "variable1"

[[exchange]]
question = "tail <-> variable1"
answer = "tail2"
"#;
        let mut oracle = ScriptedOracle::from_toml_str(toml).unwrap();
        assert_eq!(oracle.remaining(), 2);
        assert_eq!(oracle.ask("variable <-> variable1").unwrap(), "variable1");
        assert_eq!(oracle.ask("tail <-> variable1").unwrap(), "tail2");
        oracle.finish().unwrap();
    }

    #[test]
    fn test_empty_answers_file() {
        let oracle = ScriptedOracle::from_toml_str("").unwrap();
        assert_eq!(oracle.remaining(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ScriptedOracle::load_from_file("/nonexistent/answers.toml");
        assert!(matches!(result, Err(OracleError::AnswersFile(_))));
    }
}
