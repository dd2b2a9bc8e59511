//! Shared styling utilities for CLI output.

use console::Style;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold, white).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// Colour a unified diff line by line.
pub fn diff(patch: &str) -> String {
    let added = Style::new().green();
    let removed = Style::new().red();
    let hunk = Style::new().cyan();

    patch
        .lines()
        .map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                header(line)
            } else if line.starts_with('+') {
                added.apply_to(line).to_string()
            } else if line.starts_with('-') {
                removed.apply_to(line).to_string()
            } else if line.starts_with("@@") {
                hunk.apply_to(line).to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
