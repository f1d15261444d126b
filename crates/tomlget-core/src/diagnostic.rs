//! Location-annotated error text.
//!
//! Errors render through [`format_underline`] so that a failed extraction
//! points at the offending node in its source document:
//!
//! ```text
//! [error] bad cast to integer
//!  --> config.toml:3:8
//!   |
//! 3 | port = "8080"
//!   |        ^^^^^^ the actual type is string
//! ```
//!
//! Formatting never influences control flow; a node without a location simply
//! produces the one-line header.

use crate::value::Location;

/// Render `message` with an underlined excerpt of `location`, labelled `label`.
pub fn format_underline(message: &str, location: Option<&Location>, label: &str) -> String {
    let mut out = format!("[error] {message}");
    let Some(loc) = location else {
        return out;
    };

    let line_no = loc.line.to_string();
    let gutter = " ".repeat(line_no.len());
    let pad = " ".repeat(loc.column.saturating_sub(1));
    let carets = "^".repeat(loc.width.max(1));

    out.push_str(&format!("\n{gutter}--> {loc}"));
    out.push_str(&format!("\n{gutter} |"));
    out.push_str(&format!("\n{line_no} | {}", loc.line_text));
    out.push_str(&format!("\n{gutter} | {pad}{carets}"));
    if !label.is_empty() {
        out.push(' ');
        out.push_str(label);
    }
    out
}
