/// Source location information for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolve a byte offset inside `text` into a line/column pair.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..floor_char_boundary(text, offset)];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Non-fatal findings from the region scanner.
///
/// Unterminated constructs are treated as ordinary text; the warning only
/// records that protection was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// Code fence opened but never closed
    UnclosedCodeFence {
        /// Source location where the fence started
        location: SourceLocation,
        /// Fence marker character
        marker: char,
        /// Opening line, for the message
        context: String,
    },
    /// Backtick run without a matching run of the same length
    UnclosedInlineCode {
        /// Source location of the opening run
        location: SourceLocation,
        /// Number of backticks in the opening run
        ticks: usize,
    },
}

impl ScanWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ScanWarning::UnclosedCodeFence { location, .. } => location,
            ScanWarning::UnclosedInlineCode { location, .. } => location,
        }
    }
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::UnclosedCodeFence {
                location,
                marker,
                context,
            } => {
                write!(
                    f,
                    "Unclosed code fence ({}): {}, near '{}'",
                    marker, location, context
                )
            }
            ScanWarning::UnclosedInlineCode { location, ticks } => {
                write!(f, "Unclosed inline code ({} backticks): {}", ticks, location)
            }
        }
    }
}

/// Collection of scan diagnostics
#[derive(Debug, Clone, Default)]
pub struct ScanDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ScanWarning>,
}

impl ScanDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
