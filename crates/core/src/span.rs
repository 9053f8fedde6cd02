//! Offset pairs with invalidatable boundaries.
//!
//! A [`Span`] describes a byte range inside a text body. Either boundary can
//! be invalidated by [`crate::suppress::suppress`] when it falls inside a
//! protected region; a span with both boundaries invalidated is fully
//! suppressed and takes no further part in replacement.

use std::fmt;
use std::ops::Range;

/// Byte range `[start, end)` whose boundaries can be invalidated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    start: Option<usize>,
    end: Option<usize>,
}

/// Spans in document order. Not required to be disjoint.
pub type SpanSet = Vec<Span>;

impl Span {
    /// Create a live span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span {start}..{end}");
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Create a span from raw boundaries, `None` meaning invalidated.
    pub const fn from_parts(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Start offset, `None` once invalidated.
    pub fn start(&self) -> Option<usize> {
        self.start
    }

    /// End offset, `None` once invalidated.
    pub fn end(&self) -> Option<usize> {
        self.end
    }

    /// Both boundaries are still valid.
    pub fn is_live(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both boundaries have been invalidated.
    pub fn is_suppressed(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// The byte range, if the span is live.
    pub fn range(&self) -> Option<Range<usize>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(start..end),
            _ => None,
        }
    }

    /// Invalidate the start boundary. Never undone.
    pub fn invalidate_start(&mut self) {
        self.start = None;
    }

    /// Invalidate the end boundary. Never undone.
    pub fn invalidate_end(&mut self) {
        self.end = None;
    }

    /// Whether `offset` lies inside this span, both ends inclusive.
    ///
    /// A span with one invalidated boundary only covers its remaining offset;
    /// a suppressed span covers nothing.
    pub fn covers(&self, offset: usize) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= offset && offset <= end,
            (Some(start), None) => offset == start,
            (None, Some(end)) => offset == end,
            (None, None) => false,
        }
    }

    /// Whether `range` lies entirely inside this live span.
    pub fn encloses(&self, range: &Range<usize>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= range.start && range.end <= end,
            _ => false,
        }
    }

    /// Slice of `text` covered by this span, if live and in bounds.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.range().and_then(|range| text.get(range))
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Renders as `[start,end]` with `-1` standing for an invalidated boundary.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |bound: Option<usize>| match bound {
            Some(value) => value.to_string(),
            None => "-1".to_string(),
        };
        write!(f, "[{},{}]", render(self.start), render(self.end))
    }
}
