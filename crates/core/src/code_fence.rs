//! Code fence line tracking used by the region scanner.
//!
//! The fence marker is configurable (the host lets users pick something other
//! than triple backticks), so every check goes through a [`FenceMarker`].

/// Fence delimiter: a run of `ch` at least `len` characters long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMarker {
    /// Delimiter character.
    pub ch: char,
    /// Minimum run length for a line to open a fence.
    pub len: usize,
}

impl FenceMarker {
    /// Triple backtick.
    pub const BACKTICKS: FenceMarker = FenceMarker { ch: '`', len: 3 };

    /// Parse a marker string such as "```" or "~~~~".
    ///
    /// Returns `None` unless the string is a non-empty run of one character.
    pub fn parse(marker: &str) -> Option<Self> {
        let mut chars = marker.chars();
        let ch = chars.next()?;
        if ch.is_whitespace() || !chars.all(|c| c == ch) {
            return None;
        }
        Some(FenceMarker {
            ch,
            len: marker.chars().count(),
        })
    }
}

impl Default for FenceMarker {
    fn default() -> Self {
        Self::BACKTICKS
    }
}

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase and opening run length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Length of the opening run; a closer must be at least this long.
    pub length: usize,
}

/// Outcome of processing a single line for fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParseOutcome {
    /// State to carry into the next line.
    pub next_state: FenceState,
    /// The line closed the fence.
    pub closed: bool,
}

/// Advance fence state based on a single line of text.
pub fn advance_fence_state(line: &str, state: FenceState, marker: FenceMarker) -> LineParseOutcome {
    let line = line.trim_end_matches('\r');
    let (visual_indent, byte_offset) = leading_whitespace_info(line);
    let after_indent = &line[byte_offset..];

    let mut next_state = state;
    let mut closed = false;

    // 4+ columns of indentation is an indented code line, never a fence line.
    if visual_indent <= 3 {
        match state.phase {
            FencePhase::Outside => {
                if let Some(length) = marker_run_length(after_indent, marker.ch)
                    && length >= marker.len
                    && info_string_allowed(after_indent, marker.ch)
                {
                    next_state = FenceState {
                        phase: FencePhase::InsideFence,
                        length,
                    };
                }
            }
            FencePhase::InsideFence => {
                if is_closing_fence(after_indent, marker.ch)
                    && marker_run_length(after_indent, marker.ch)
                        .is_some_and(|length| length >= state.length)
                {
                    next_state = FenceState::default();
                    closed = true;
                }
            }
        }
    }

    LineParseOutcome { next_state, closed }
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Tabs expand to the next 4-column boundary.
pub(crate) fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => {
                col += 1;
                bytes += 1;
            }
            b'\t' => {
                col += 4 - (col % 4);
                bytes += 1;
            }
            _ => break,
        }
    }
    (col, bytes)
}

fn marker_run_length(after_indent: &str, ch: char) -> Option<usize> {
    let run = after_indent.chars().take_while(|c| *c == ch).count();
    (run > 0).then_some(run)
}

/// The info string after a backtick run may not contain backticks; such a
/// line is inline code, not a fence.
fn info_string_allowed(after_indent: &str, ch: char) -> bool {
    ch != '`' || !after_indent.trim_start_matches(ch).contains(ch)
}

/// A closing fence has only marker characters followed by optional whitespace.
fn is_closing_fence(after_indent: &str, ch: char) -> bool {
    let rest = after_indent.trim_start_matches(ch);
    rest.len() < after_indent.len() && rest.chars().all(char::is_whitespace)
}
