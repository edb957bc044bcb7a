pub mod config;
mod prompt;

use camino::Utf8Path;

pub use prompt::*;

/// Format a path as a clickable hyperlink using OSC 8 escape sequences.
/// Supported by modern terminals like Windows Terminal, iTerm2, VS Code terminal, etc.
pub fn hyperlink_path(path: &Utf8Path) -> String {
    let absolute = path
        .canonicalize_utf8()
        .unwrap_or_else(|_| path.to_path_buf());
    let url = format!("file://{}", absolute.as_str().replace('\\', "/"));
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, path)
}

/// Truncates a string in the middle
pub fn truncate_middle(input: &str, max_len: usize) -> String {
    let len = input.chars().count();
    if len <= max_len {
        return input.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let keep = max_len - 3;
    let left = keep / 2;
    let right = keep - left;
    let left_str: String = input.chars().take(left).collect();
    let right_str: String = input.chars().skip(len - right).collect();
    format!("{}...{}", left_str, right_str)
}
