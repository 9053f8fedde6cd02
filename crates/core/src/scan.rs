//! Region scanner: locates code regions and link/image targets.
//!
//! A single pass over the lines finds fenced and indented code blocks. Inline
//! code is searched only in the prose between those blocks, so a backtick run
//! never pairs with one on the far side of a code block. Link and image
//! targets are found everywhere; deciding which of them sit inside code is
//! the suppressor's job.

use crate::code_fence::{
    FenceMarker, FencePhase, FenceState, advance_fence_state, leading_whitespace_info,
};
use crate::error::{ScanDiagnostics, ScanWarning, SourceLocation};
use crate::span::{Span, SpanSet};

/// Options for the region scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Fence delimiter for fenced code blocks.
    pub fence_marker: FenceMarker,
}

impl ScanOptions {
    /// Options with a custom fence marker string.
    ///
    /// Falls back to triple backticks when the marker is not a run of one
    /// character.
    pub fn with_fence_marker(marker: &str) -> Self {
        let fence_marker = FenceMarker::parse(marker).unwrap_or_else(|| {
            log::warn!("ignoring unusable fence marker {marker:?}, using ```");
            FenceMarker::default()
        });
        Self { fence_marker }
    }
}

/// Construct kinds the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Fenced code block, opening through closing line.
    FencedCode,
    /// Run of lines indented by four or more columns.
    IndentedCode,
    /// Backtick-delimited code span, delimiters included.
    InlineCode,
    /// Target of `[text](target)`.
    LinkTarget,
    /// Target of `![text](target)`.
    ImageTarget,
}

/// Spans found in one text body, one set per construct kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    /// Fenced code blocks.
    pub fenced_code: SpanSet,
    /// Indented code blocks.
    pub indented_code: SpanSet,
    /// Inline code spans.
    pub inline_code: SpanSet,
    /// Link targets (without the parentheses).
    pub link_targets: SpanSet,
    /// Image targets (without the parentheses).
    pub image_targets: SpanSet,
}

impl Regions {
    /// Spans of a single kind.
    pub fn spans(&self, kind: RegionKind) -> &[Span] {
        match kind {
            RegionKind::FencedCode => &self.fenced_code,
            RegionKind::IndentedCode => &self.indented_code,
            RegionKind::InlineCode => &self.inline_code,
            RegionKind::LinkTarget => &self.link_targets,
            RegionKind::ImageTarget => &self.image_targets,
        }
    }

    /// All code regions (fenced, indented, inline), ordered by start.
    pub fn protected(&self) -> SpanSet {
        let mut spans: SpanSet = self
            .fenced_code
            .iter()
            .chain(&self.indented_code)
            .chain(&self.inline_code)
            .copied()
            .collect();
        spans.sort_by_key(|span| span.start());
        spans
    }
}

/// Scan `text` for every construct kind.
pub fn scan(text: &str, options: &ScanOptions) -> Regions {
    scan_with_diagnostics(text, options).0
}

/// Scan `text`, also reporting unterminated fences and backtick runs.
pub fn scan_with_diagnostics(text: &str, options: &ScanOptions) -> (Regions, ScanDiagnostics) {
    let mut diagnostics = ScanDiagnostics::new();
    let lines = split_lines(text);

    let fenced_code = find_fenced_blocks(text, &lines, options.fence_marker, &mut diagnostics);
    let indented_code = find_indented_blocks(&lines, &fenced_code);

    let mut blocks: SpanSet = fenced_code.iter().chain(&indented_code).copied().collect();
    blocks.sort_by_key(|span| span.start());
    let inline_code = find_inline_code(text, &blocks, &mut diagnostics);

    let (link_targets, image_targets) = find_targets(text);

    (
        Regions {
            fenced_code,
            indented_code,
            inline_code,
            link_targets,
            image_targets,
        },
        diagnostics,
    )
}

/// One line of the body: byte offset of its first character and its content
/// without the trailing newline.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: usize,
    content: &'a str,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.start + self.content.len()
    }

    fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for piece in text.split_inclusive('\n') {
        lines.push(Line {
            start,
            content: piece.strip_suffix('\n').unwrap_or(piece),
        });
        start += piece.len();
    }
    lines
}

fn find_fenced_blocks(
    text: &str,
    lines: &[Line<'_>],
    marker: FenceMarker,
    diagnostics: &mut ScanDiagnostics,
) -> SpanSet {
    let mut spans = SpanSet::new();
    let mut idx = 0;

    while idx < lines.len() {
        let opener = advance_fence_state(lines[idx].content, FenceState::default(), marker);
        if !matches!(opener.next_state.phase, FencePhase::InsideFence) {
            idx += 1;
            continue;
        }

        let mut state = opener.next_state;
        let mut closer = None;
        for (offset, line) in lines[idx + 1..].iter().enumerate() {
            let outcome = advance_fence_state(line.content, state, marker);
            if outcome.closed {
                closer = Some(idx + 1 + offset);
                break;
            }
            state = outcome.next_state;
        }

        match closer {
            Some(close_idx) => {
                spans.push(Span::new(lines[idx].start, lines[close_idx].end()));
                idx = close_idx + 1;
            }
            None => {
                diagnostics.add_warning(ScanWarning::UnclosedCodeFence {
                    location: SourceLocation::from_offset(text, lines[idx].start),
                    marker: marker.ch,
                    context: lines[idx].content.trim_end_matches('\r').to_string(),
                });
                // Unterminated: the opener is ordinary text.
                idx += 1;
            }
        }
    }

    spans
}

fn is_indented_code_line(line: &Line<'_>) -> bool {
    !line.is_blank() && leading_whitespace_info(line.content).0 >= 4
}

fn find_indented_blocks(lines: &[Line<'_>], fenced: &[Span]) -> SpanSet {
    let inside_fence = |line: &Line<'_>| fenced.iter().any(|span| span.covers(line.start));

    let mut spans = SpanSet::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line = &lines[idx];
        let preceded_by_blank = idx == 0 || lines[idx - 1].is_blank();
        if !preceded_by_blank || inside_fence(line) || !is_indented_code_line(line) {
            idx += 1;
            continue;
        }

        let mut last = idx;
        while last + 1 < lines.len()
            && !inside_fence(&lines[last + 1])
            && is_indented_code_line(&lines[last + 1])
        {
            last += 1;
        }
        spans.push(Span::new(line.start, lines[last].end()));
        idx = last + 1;
    }
    spans
}

/// Find inline code spans in the gaps between block spans.
fn find_inline_code(text: &str, blocks: &[Span], diagnostics: &mut ScanDiagnostics) -> SpanSet {
    let mut spans = SpanSet::new();
    let mut gap_start = 0;
    for block in blocks {
        let Some(range) = block.range() else { continue };
        if range.start > gap_start {
            scan_backtick_runs(text, gap_start, range.start, &mut spans, diagnostics);
        }
        gap_start = gap_start.max(range.end);
    }
    if gap_start < text.len() {
        scan_backtick_runs(text, gap_start, text.len(), &mut spans, diagnostics);
    }
    spans
}

fn scan_backtick_runs(
    text: &str,
    from: usize,
    to: usize,
    spans: &mut SpanSet,
    diagnostics: &mut ScanDiagnostics,
) {
    let bytes = text.as_bytes();
    let run_len = |at: usize| bytes[at..to].iter().take_while(|b| **b == b'`').count();

    let mut idx = from;
    while idx < to {
        if bytes[idx] != b'`' {
            idx += 1;
            continue;
        }

        let open_len = run_len(idx);
        let mut search = idx + open_len;
        let mut close = None;
        while search < to {
            if bytes[search] == b'`' {
                let len = run_len(search);
                if len == open_len {
                    close = Some(search);
                    break;
                }
                search += len;
            } else {
                search += 1;
            }
        }

        match close {
            Some(close_idx) => {
                spans.push(Span::new(idx, close_idx + open_len));
                idx = close_idx + open_len;
            }
            None => {
                diagnostics.add_warning(ScanWarning::UnclosedInlineCode {
                    location: SourceLocation::from_offset(text, idx),
                    ticks: open_len,
                });
                idx += open_len;
            }
        }
    }
}

/// An unmatched `[` seen while looking for targets.
#[derive(Debug, Clone, Copy)]
struct Opener {
    image: bool,
}

/// Find `[text](target)` and `![text](target)` targets, left to right and
/// non-overlapping.
///
/// Each `]` closes the nearest unmatched `[`, so a stray bracket earlier in
/// the text does not swallow a later image. Escaped brackets are ignored.
/// The target stops at the first `)` not preceded by a backslash and never
/// crosses a line break.
fn find_targets(text: &str) -> (SpanSet, SpanSet) {
    let bytes = text.as_bytes();
    let escaped = |at: usize| at > 0 && bytes[at - 1] == b'\\';
    let mut links = SpanSet::new();
    let mut images = SpanSet::new();
    let mut openers: Vec<Opener> = Vec::new();

    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'[' if !escaped(idx) => {
                openers.push(Opener {
                    image: idx > 0 && bytes[idx - 1] == b'!',
                });
            }
            b']' if !escaped(idx) => {
                let Some(opener) = openers.pop() else {
                    idx += 1;
                    continue;
                };
                let target_start = idx + 2;
                if bytes.get(idx + 1) == Some(&b'(')
                    && let Some(target_end) = find_target_end(bytes, target_start)
                {
                    let span = Span::new(target_start, target_end);
                    if opener.image {
                        images.push(span);
                    } else {
                        links.push(span);
                        // Links do not nest: earlier link openers are spent.
                        openers.retain(|open| open.image);
                    }
                    idx = target_end + 1;
                    continue;
                }
            }
            _ => {}
        }
        idx += 1;
    }

    (links, images)
}

fn find_target_end(bytes: &[u8], start: usize) -> Option<usize> {
    for (offset, byte) in bytes[start..].iter().enumerate() {
        let at = start + offset;
        match byte {
            b'\n' => return None,
            b')' if bytes[at - 1] != b'\\' => return Some(at),
            _ => {}
        }
    }
    None
}
