//! Small Markdown line helpers used while preparing field text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Whitespace in front of an abbreviation definition (`*[HTML]: ...`).
static ABBREVIATION_INDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]+(\*\[[^\]\n]+\]:)").expect("abbreviation pattern is valid")
});

/// Heading level of `line` (number of leading `#`, capped at 6), ignoring
/// leading whitespace. `None` when the line is not a heading.
pub fn heading_level(line: &str) -> Option<u8> {
    let hashes = line.trim_start().chars().take_while(|c| *c == '#').count();
    (hashes > 0).then(|| hashes.min(6) as u8)
}

/// Column alignment of a Markdown table delimiter cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// `---` or anything unrecognized.
    #[default]
    Left,
    /// `:-:`
    Center,
    /// `-:`
    Right,
}

impl Alignment {
    /// Value for an HTML `align` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Alignment requested by a table delimiter cell such as `:-:`.
pub fn alignment(cell: &str) -> Alignment {
    let cell = cell.trim();
    let is_dashes = |s: &str| !s.is_empty() && s.chars().all(|c| c == '-');

    if let Some(inner) = cell.strip_prefix(':').and_then(|s| s.strip_suffix(':'))
        && is_dashes(inner)
    {
        return Alignment::Center;
    }
    if let Some(inner) = cell.strip_suffix(':')
        && is_dashes(inner)
    {
        return Alignment::Right;
    }
    Alignment::Left
}

/// Drop leading whitespace and leading `&nbsp;` entities.
pub fn strip_leading_whitespace(text: &str) -> &str {
    let mut rest = text;
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix("&nbsp;") {
            Some(after) => rest = after,
            None => return trimmed,
        }
    }
}

/// Split on any character of `delimiters`, dropping empty pieces.
///
/// With no delimiters the whole text is returned as one piece.
pub fn split_on_any<'a>(text: &'a str, delimiters: &str) -> Vec<&'a str> {
    if delimiters.is_empty() {
        return if text.is_empty() { Vec::new() } else { vec![text] };
    }
    text.split(|c: char| delimiters.contains(c))
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Remove every whitespace character.
pub fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether two Markdown sources differ only in whitespace.
pub fn is_same_markdown(a: &str, b: &str) -> bool {
    let significant = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>();
    significant(a) == significant(b)
}

/// Unindent abbreviation definitions so the Markdown renderer sees them.
pub fn remove_whitespace_before_abbreviation_definition(text: &str) -> String {
    ABBREVIATION_INDENT.replace_all(text, "$1").into_owned()
}

/// Unindent definition-list items (`    : definition`).
///
/// Only lines with four or more leading spaces followed by `": "` change.
/// With `separate`, a blank line is inserted after an item when the next line
/// starts a new term.
pub fn remove_leading_whitespace_from_dd_element(text: &str, separate: bool) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());

    for (idx, line) in lines.iter().enumerate() {
        let Some(item) = unindented_dd(line) else {
            out.push_str(line);
            continue;
        };
        out.push_str(item);
        if separate
            && let Some(next) = lines.get(idx + 1)
            && !next.trim().is_empty()
            && unindented_dd(next).is_none()
            && !next.starts_with(": ")
        {
            out.push('\n');
        }
    }
    out
}

fn unindented_dd(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ');
    let indent = line.len() - rest.len();
    (indent >= 4 && rest.starts_with(": ")).then_some(rest)
}
