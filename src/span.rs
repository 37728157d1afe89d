/// Position/ boundary `start..end` in the input.
///
/// Offsets are counted in code units of the [`crate::Reader`] the token originates from: bytes
/// for `&str` input, UTF-16 code units for `&[u16]` input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start position (inclusive) of the span.
    pub start: usize,
    /// End position (exclusive) of the span.
    pub end: usize,
}

impl Span {
    /// Construct a span from its bounds.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Whether the span covers no input at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Where a node came from in the source, attached to nodes when
/// [`crate::ParserOptions::location_info`] is enabled.
///
/// Lines and columns are 1-based. Columns count code units, like offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Offset of the first code unit.
    pub start_offset: usize,
    /// Offset one past the last code unit.
    pub end_offset: usize,
    /// Line of `start_offset`.
    pub start_line: usize,
    /// Column of `start_offset`.
    pub start_col: usize,
    /// Line of `end_offset`.
    pub end_line: usize,
    /// Column of `end_offset`.
    pub end_col: usize,
}

/// Offsets at which lines begin, recorded by the preprocessor as it moves forward.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl Default for LineIndex {
    fn default() -> Self {
        LineIndex {
            line_starts: vec![0],
        }
    }
}

impl LineIndex {
    /// Record that a new line begins at `offset`. Offsets already seen are ignored, so this is safe
    /// to call again after the preprocessor retreats and re-reads a newline.
    #[inline]
    pub(crate) fn add_line_start(&mut self, offset: usize) {
        if self.line_starts.last().map_or(true, |&last| offset > last) {
            self.line_starts.push(offset);
        }
    }

    /// 1-based `(line, column)` of `offset`.
    pub(crate) fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }

    pub(crate) fn resolve(&self, span: Span) -> SourceLocation {
        let (start_line, start_col) = self.line_col(span.start);
        let (end_line, end_col) = self.line_col(span.end);
        SourceLocation {
            start_offset: span.start,
            end_offset: span.end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_lookup() {
        let mut index = LineIndex::default();
        index.add_line_start(4);
        index.add_line_start(4);
        index.add_line_start(9);

        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(3), (1, 4));
        assert_eq!(index.line_col(4), (2, 1));
        assert_eq!(index.line_col(12), (3, 4));
    }
}
