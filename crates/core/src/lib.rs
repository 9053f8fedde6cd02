#![deny(missing_docs)]
//! fieldmark core: span-aware Markdown scanning, selective replacement,
//! HTML escaping, and keybinding normalization.

/// Code fence detection utilities.
pub mod code_fence;
/// Scan diagnostics and source locations.
pub mod error;
/// HTML entity escaping.
pub mod escape;
/// Keybinding parsing and canonicalization.
pub mod keys;
/// Span-restricted pattern replacement.
pub mod replace;
/// Region scanning for code blocks, inline code, and link targets.
pub mod scan;
/// Byte spans with invalidatable boundaries.
pub mod span;
/// Interval suppression.
pub mod suppress;
/// Markdown line helpers.
pub mod text;

pub use code_fence::{
    FenceMarker, FencePhase, FenceState, LineParseOutcome, advance_fence_state,
};
pub use error::{ScanDiagnostics, ScanWarning, SourceLocation};
pub use escape::{create_anchor, escape_html};
pub use keys::{
    Key, KeyError, KeySpec, Modifier, Platform, check_user_keybindings, normalize_keybinding,
};
pub use replace::{replace_in_image_targets, replace_within};
pub use scan::{RegionKind, Regions, ScanOptions, scan, scan_with_diagnostics};
pub use span::{Span, SpanSet};
pub use suppress::{suppress, suppressed};
pub use text::{
    Alignment, alignment, heading_level, is_same_markdown, remove_leading_whitespace_from_dd_element,
    remove_whitespace, remove_whitespace_before_abbreviation_definition, split_on_any,
    strip_leading_whitespace,
};
