//! Refactoring command descriptors.
//!
//! A [`Command`] is one refactoring operation recorded on a branch. Commands
//! are immutable once built; the resolver only ever allocates new ones.

use serde::{Deserialize, Serialize};

use crate::errors::MergeError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Rename a local variable inside a method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameCommand {
    /// Fully qualified name of the containing class.
    pub class_full_name: String,
    /// Name of the method that declares the variable.
    pub method: String,
    /// Current variable name.
    pub variable: String,
    /// Replacement name.
    pub new_name: String,
}

impl RenameCommand {
    /// Whether both renames live in the same (class, method).
    pub fn same_method(&self, other: &RenameCommand) -> bool {
        self.class_full_name == other.class_full_name && self.method == other.method
    }

    /// Whether both renames target the same (class, method, variable).
    pub fn same_site(&self, other: &RenameCommand) -> bool {
        self.same_method(other) && self.variable == other.variable
    }

    /// A copy of this rename with a different replacement name.
    pub fn with_new_name(&self, new_name: impl Into<String>) -> RenameCommand {
        RenameCommand {
            new_name: new_name.into(),
            ..self.clone()
        }
    }
}

/// Reorder a method within its containing class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveMethodCommand {
    /// Fully qualified name of the containing class.
    pub class_full_name: String,
    /// Name of the method to move.
    pub method: String,
    /// Move the method toward the top of the class.
    pub move_up: bool,
}

/// A refactoring operation carried by one branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Rename(RenameCommand),
    MoveMethod(MoveMethodCommand),
}

impl Command {
    pub fn rename(
        class_full_name: impl Into<String>,
        method: impl Into<String>,
        variable: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::Rename(RenameCommand {
            class_full_name: class_full_name.into(),
            method: method.into(),
            variable: variable.into(),
            new_name: new_name.into(),
        })
    }

    pub fn move_method(
        class_full_name: impl Into<String>,
        method: impl Into<String>,
        move_up: bool,
    ) -> Self {
        Self::MoveMethod(MoveMethodCommand {
            class_full_name: class_full_name.into(),
            method: method.into(),
            move_up,
        })
    }

    /// Short kind label, matching the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rename(_) => "rename",
            Self::MoveMethod(_) => "move_method",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rename(r) => write!(
                f,
                "rename {}.{}: {} -> {}",
                r.class_full_name, r.method, r.variable, r.new_name
            ),
            Self::MoveMethod(m) => write!(
                f,
                "move {}.{} {}",
                m.class_full_name,
                m.method,
                if m.move_up { "up" } else { "in place" }
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Untyped descriptors
// ---------------------------------------------------------------------------

/// A command as written in a plan file, before its kind is checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandSpec {
    pub kind: String,
    #[serde(rename = "class")]
    pub class_full_name: String,
    pub method: String,
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub move_up: Option<bool>,
}

impl TryFrom<CommandSpec> for Command {
    type Error = MergeError;

    fn try_from(spec: CommandSpec) -> Result<Self, Self::Error> {
        let missing = |field: &str| MergeError::IncompleteCommand {
            kind: spec.kind.clone(),
            field: field.to_string(),
        };
        let required = |value: Option<String>, field: &str| match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(missing(field)),
        };

        if !matches!(spec.kind.as_str(), "rename" | "move_method") {
            return Err(MergeError::UnsupportedCommand(spec.kind.clone()));
        }

        let class_full_name = required(Some(spec.class_full_name.clone()), "class")?;
        let method = required(Some(spec.method.clone()), "method")?;

        if spec.kind == "rename" {
            let variable = required(spec.variable.clone(), "variable")?;
            let new_name = required(spec.new_name.clone(), "new_name")?;
            Ok(Command::rename(class_full_name, method, variable, new_name))
        } else {
            let move_up = spec.move_up.ok_or_else(|| missing("move_up"))?;
            Ok(Command::move_method(class_full_name, method, move_up))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: &str) -> CommandSpec {
        CommandSpec {
            kind: kind.into(),
            class_full_name: "GeneralCase".into(),
            method: "MethodB".into(),
            variable: None,
            new_name: None,
            move_up: None,
        }
    }

    #[test]
    fn test_same_site_requires_all_three_fields() {
        let Command::Rename(a) = Command::rename("C", "M", "v", "v1") else {
            unreachable!()
        };
        let Command::Rename(b) = Command::rename("C", "M", "v", "v2") else {
            unreachable!()
        };
        let Command::Rename(c) = Command::rename("C", "M", "w", "v1") else {
            unreachable!()
        };
        let Command::Rename(d) = Command::rename("C", "Other", "v", "v1") else {
            unreachable!()
        };

        assert!(a.same_site(&b));
        assert!(a.same_method(&c));
        assert!(!a.same_site(&c));
        assert!(!a.same_method(&d));
    }

    #[test]
    fn test_kind_tag_in_json() {
        let json = serde_json::to_value(Command::move_method("C", "MethodB", true)).unwrap();
        assert_eq!(json["kind"], "move_method");
        assert_eq!(json["move_up"], true);
    }

    #[test]
    fn test_display() {
        let cmd = Command::rename("GeneralCase", "Method", "variable", "variable3");
        assert_eq!(
            cmd.to_string(),
            "rename GeneralCase.Method: variable -> variable3"
        );
    }

    #[test]
    fn test_spec_to_rename() {
        let mut s = spec("rename");
        s.variable = Some("tail".into());
        s.new_name = Some("tail1".into());

        let cmd = Command::try_from(s).unwrap();
        assert_eq!(cmd, Command::rename("GeneralCase", "MethodB", "tail", "tail1"));
    }

    #[test]
    fn test_spec_unknown_kind() {
        let result = Command::try_from(spec("extract_method"));
        assert!(matches!(result, Err(MergeError::UnsupportedCommand(k)) if k == "extract_method"));
    }

    #[test]
    fn test_spec_empty_fields_rejected() {
        let mut s = spec("rename");
        s.variable = Some(String::new());
        s.new_name = Some("z".into());
        assert!(matches!(
            Command::try_from(s),
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "variable"
        ));

        let mut s = spec("rename");
        s.variable = Some("a".into());
        s.new_name = Some(String::new());
        assert!(matches!(
            Command::try_from(s),
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "new_name"
        ));

        let mut s = spec("move_method");
        s.method = String::new();
        s.move_up = Some(true);
        assert!(matches!(
            Command::try_from(s),
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "method"
        ));

        let mut s = spec("move_method");
        s.class_full_name = String::new();
        s.move_up = Some(true);
        assert!(matches!(
            Command::try_from(s),
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "class"
        ));
    }

    #[test]
    fn test_spec_missing_field() {
        let mut s = spec("rename");
        s.variable = Some("tail".into());

        let result = Command::try_from(s);
        assert!(matches!(
            result,
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "new_name"
        ));

        let result = Command::try_from(spec("move_method"));
        assert!(matches!(
            result,
            Err(MergeError::IncompleteCommand { ref field, .. }) if field == "move_up"
        ));
    }
}
