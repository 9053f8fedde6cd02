//! Pattern substitution restricted to allowed spans.

use regex::Regex;

use crate::scan::{ScanOptions, scan};
use crate::span::Span;
use crate::suppress::suppress;

/// Replace matches of `pattern` that lie entirely inside a live span of
/// `allowed`; every other byte of `text` is copied unchanged.
///
/// `replacement` follows [`regex::Captures::expand`] syntax, so `$1` and
/// `${name}` refer to capture groups and `$$` is a literal dollar.
pub fn replace_within(pattern: &Regex, replacement: &str, text: &str, allowed: &[Span]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let Some(found) = caps.get(0) else { continue };
        let range = found.range();
        if !allowed.iter().any(|span| span.encloses(&range)) {
            continue;
        }
        out.push_str(&text[last..range.start]);
        caps.expand(replacement, &mut out);
        last = range.end;
    }

    out.push_str(&text[last..]);
    out
}

/// Replace matches of `pattern` inside image targets (`![alt](target)`) that
/// do not touch fenced, indented, or inline code.
///
/// Link targets are left alone.
pub fn replace_in_image_targets(
    pattern: &Regex,
    replacement: &str,
    text: &str,
    options: &ScanOptions,
) -> String {
    let regions = scan(text, options);
    if regions.image_targets.is_empty() {
        return text.to_string();
    }

    let protected = regions.protected();
    let mut targets = regions.image_targets;
    suppress(&mut targets, &protected);
    let skipped = targets.iter().filter(|span| !span.is_live()).count();
    if skipped > 0 {
        log::debug!("{skipped} image target(s) overlap code and are left untouched");
    }

    replace_within(pattern, replacement, text, &targets)
}
