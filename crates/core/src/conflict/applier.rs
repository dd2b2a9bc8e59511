//! Command application.
//!
//! The [`Applier`] folds an ordered command list over a source text, each
//! command transforming the output of the previous one. Both transformations
//! are textual stand-ins:
//!
//! - renames substitute every occurrence of the variable name, including
//!   inside unrelated identifiers that contain it;
//! - method moves assume the fixed two-method shape described by
//!   [`MethodLayout`] and swap the two bodies by position.

use tracing::{debug, warn};

use crate::command::{Command, MoveMethodCommand, RenameCommand};
use crate::config::MethodLayout;
use crate::errors::MergeError;

/// Applies resolved commands to source text.
#[derive(Debug, Clone, Default)]
pub struct Applier {
    layout: MethodLayout,
}

impl Applier {
    pub fn new(layout: MethodLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &MethodLayout {
        &self.layout
    }

    /// Apply `commands` left to right. Any failure discards all progress.
    pub fn apply(&self, text: &str, commands: &[Command]) -> Result<String, MergeError> {
        commands
            .iter()
            .try_fold(text.to_string(), |acc, command| self.apply_command(&acc, command))
    }

    /// Apply a single command.
    pub fn apply_command(&self, text: &str, command: &Command) -> Result<String, MergeError> {
        debug!(%command, "applying command");
        match command {
            Command::Rename(rename) => apply_rename(text, rename),
            Command::MoveMethod(mv) => self.apply_move(text, mv),
        }
    }

    fn apply_move(&self, text: &str, mv: &MoveMethodCommand) -> Result<String, MergeError> {
        let (body, trailing_newline) = match text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (text, false),
        };
        let lines: Vec<&str> = body.split('\n').collect();

        let layout = &self.layout;
        if layout.method_lines == 0 {
            return Err(MergeError::InvalidLayout(
                "a method must span at least one line".into(),
            ));
        }

        let expected = layout.total_lines();
        if lines.len() != expected {
            return Err(MergeError::LayoutMismatch {
                expected,
                found: lines.len(),
            });
        }

        let first_start = layout.first_method_start();
        let second_start = layout.second_method_start();
        let first = &lines[first_start..first_start + layout.method_lines];
        let second = &lines[second_start..second_start + layout.method_lines];

        let first_name = method_name(first[0]);
        let second_name = method_name(second[0]);

        if first_name != Some(mv.method.as_str()) && second_name != Some(mv.method.as_str()) {
            warn!(
                method = %mv.method,
                first = ?first_name,
                second = ?second_name,
                "method not found in either slot, leaving order unchanged"
            );
            return Ok(text.to_string());
        }

        if !mv.move_up || first_name == Some(mv.method.as_str()) {
            debug!(method = %mv.method, "method order unchanged");
            return Ok(text.to_string());
        }

        let mut out: Vec<&str> = Vec::with_capacity(lines.len());
        out.extend_from_slice(&lines[..first_start]);
        out.extend_from_slice(second);
        out.extend_from_slice(&lines[first_start + layout.method_lines..second_start]);
        out.extend_from_slice(first);
        out.extend_from_slice(&lines[second_start + layout.method_lines..]);

        let mut result = out.join("\n");
        if trailing_newline {
            result.push('\n');
        }
        Ok(result)
    }
}

fn apply_rename(text: &str, rename: &RenameCommand) -> Result<String, MergeError> {
    // An empty pattern matches between every character.
    for (field, value) in [("variable", &rename.variable), ("new_name", &rename.new_name)] {
        if value.is_empty() {
            return Err(MergeError::IncompleteCommand {
                kind: "rename".into(),
                field: field.into(),
            });
        }
    }
    Ok(text.replace(&rename.variable, &rename.new_name))
}

/// Extract the method name from a declaration line such as
/// `    public void MethodB()`.
fn method_name(declaration: &str) -> Option<&str> {
    let head = match declaration.find('(') {
        Some(idx) => &declaration[..idx],
        None => declaration,
    };
    head.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
using System;

public class GeneralCase
{
    public void MethodA()
    {
        var head = 1;
        Console.WriteLine(head);
    }

    public void MethodB()
    {
        var variable = 1;
        var tail = variable + 1;
    }
}
";

    const SWAPPED: &str = "\
using System;

public class GeneralCase
{
    public void MethodB()
    {
        var variable = 1;
        var tail = variable + 1;
    }

    public void MethodA()
    {
        var head = 1;
        Console.WriteLine(head);
    }
}
";

    #[test]
    fn test_method_name() {
        assert_eq!(method_name("    public void MethodB()"), Some("MethodB"));
        assert_eq!(method_name("static int Sum(int a, int b)"), Some("Sum"));
        assert_eq!(method_name("   "), None);
    }

    #[test]
    fn test_rename_replaces_every_occurrence() {
        let applier = Applier::default();
        let out = applier
            .apply_command(SOURCE, &Command::rename("GeneralCase", "MethodB", "variable", "v2"))
            .unwrap();
        assert_eq!(out.matches("v2").count(), 2);
        assert!(!out.contains("variable"));
    }

    #[test]
    fn test_rename_is_substring_based() {
        let applier = Applier::default();
        let out = applier
            .apply_command("head headline", &Command::rename("C", "M", "head", "top"))
            .unwrap();
        assert_eq!(out, "top topline");
    }

    #[test]
    fn test_move_second_method_up() {
        let applier = Applier::default();
        let out = applier
            .apply_command(SOURCE, &Command::move_method("GeneralCase", "MethodB", true))
            .unwrap();
        assert_eq!(out, SWAPPED);
    }

    #[test]
    fn test_move_first_method_up_is_noop() {
        let applier = Applier::default();
        let out = applier
            .apply_command(SOURCE, &Command::move_method("GeneralCase", "MethodA", true))
            .unwrap();
        assert_eq!(out, SOURCE);
    }

    #[test]
    fn test_move_without_up_flag_keeps_order() {
        let applier = Applier::default();
        let out = applier
            .apply_command(SOURCE, &Command::move_method("GeneralCase", "MethodB", false))
            .unwrap();
        assert_eq!(out, SOURCE);
    }

    #[test]
    fn test_move_unknown_method_keeps_order() {
        let applier = Applier::default();
        let out = applier
            .apply_command(SOURCE, &Command::move_method("GeneralCase", "MethodZ", true))
            .unwrap();
        assert_eq!(out, SOURCE);
    }

    #[test]
    fn test_move_preserves_missing_trailing_newline() {
        let applier = Applier::default();
        let source = SOURCE.trim_end_matches('\n');
        let out = applier
            .apply_command(source, &Command::move_method("GeneralCase", "MethodB", true))
            .unwrap();
        assert_eq!(out, SWAPPED.trim_end_matches('\n'));
    }

    #[test]
    fn test_move_preserves_crlf() {
        let applier = Applier::default();
        let source = SOURCE.replace('\n', "\r\n");
        let out = applier
            .apply_command(&source, &Command::move_method("GeneralCase", "MethodB", true))
            .unwrap();
        assert_eq!(out, SWAPPED.replace('\n', "\r\n"));
    }

    #[test]
    fn test_move_rejects_other_shapes() {
        let applier = Applier::default();
        let result =
            applier.apply_command("one\ntwo\n", &Command::move_method("C", "MethodB", true));
        assert!(matches!(
            result,
            Err(MergeError::LayoutMismatch {
                expected: 16,
                found: 2
            })
        ));
    }

    #[test]
    fn test_rename_rejects_empty_names() {
        let applier = Applier::default();
        let result = applier.apply_command("int a;", &Command::rename("C", "M", "", "z"));
        assert!(matches!(
            result,
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "variable"
        ));

        let result = applier.apply_command("int a;", &Command::rename("C", "M", "a", ""));
        assert!(matches!(
            result,
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "new_name"
        ));
    }

    #[test]
    fn test_zero_line_methods_rejected() {
        let layout = MethodLayout {
            header_lines: 1,
            method_lines: 0,
            separator_lines: 0,
            trailer_lines: 0,
        };
        let applier = Applier::new(layout);
        let result = applier.apply_command("class C", &Command::move_method("C", "A", true));
        assert!(matches!(result, Err(MergeError::InvalidLayout(_))));
    }

    #[test]
    fn test_custom_layout() {
        let layout = MethodLayout {
            header_lines: 1,
            method_lines: 1,
            separator_lines: 0,
            trailer_lines: 0,
        };
        let applier = Applier::new(layout);
        let out = applier
            .apply_command("class C\nvoid A()\nvoid B()", &Command::move_method("C", "B", true))
            .unwrap();
        assert_eq!(out, "class C\nvoid B()\nvoid A()");
    }

    #[test]
    fn test_apply_folds_in_order() {
        let applier = Applier::default();
        let commands = vec![
            Command::rename("C", "M", "a", "b"),
            Command::rename("C", "M", "b", "c"),
        ];
        assert_eq!(applier.apply("a", &commands).unwrap(), "c");

        let reversed: Vec<Command> = commands.into_iter().rev().collect();
        assert_eq!(applier.apply("a", &reversed).unwrap(), "b");
    }

    #[test]
    fn test_apply_failure_aborts() {
        let applier = Applier::default();
        let commands = vec![
            Command::rename("C", "M", "a", "b"),
            Command::move_method("C", "M", true),
        ];
        assert!(applier.apply("a", &commands).is_err());
    }

    #[test]
    fn test_apply_empty_sequence_is_identity() {
        let applier = Applier::default();
        assert_eq!(applier.apply(SOURCE, &[]).unwrap(), SOURCE);
    }
}
