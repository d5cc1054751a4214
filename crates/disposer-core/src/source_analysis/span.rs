// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every AST node and every bound operation carries a `Span` into the file it
//! came from. A compilation spans several files, so symbols additionally record
//! a [`Location`] pairing the span with its [`FileId`].

use std::fmt;
use std::ops::Range;

/// Largest source text, in bytes, whose offsets fit a [`Span`].
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

/// Converts a byte offset to a span offset, saturating at `u32::MAX`.
///
/// Texts longer than [`MAX_SOURCE_LEN`] are rejected before lexing, so
/// saturation only guards offsets that never reach a real span.
#[must_use]
pub fn offset_to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

/// A span of source code, represented as a byte offset range.
///
/// # Examples
///
/// ```
/// use disposer_core::source_analysis::Span;
///
/// let span = Span::new(0, 10);
/// assert_eq!(span.start(), 0);
/// assert_eq!(span.end(), 10);
/// assert_eq!(span.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the start byte offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Returns the end byte offset (exclusive).
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Converts to a `Range<usize>` for indexing into source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(offset_to_u32(range.start), offset_to_u32(range.end))
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

/// Index of a source file within a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    /// Pseudo-file holding the built-in core library declarations.
    pub const CORE_LIBRARY: Self = Self(u32::MAX);

    /// Creates a file id from its position in the compilation's file list.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "compilations over 4 billion files are not supported"
    )]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the position of the file in the compilation's file list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true for the built-in core library pseudo-file.
    #[must_use]
    pub const fn is_core_library(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core_library() {
            write!(f, "<core>")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// A span together with the file it points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub file: FileId,
    pub span: Span,
}

impl Location {
    #[must_use]
    pub const fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_past_u32_saturate() {
        assert_eq!(offset_to_u32(7), 7);
        assert_eq!(offset_to_u32(MAX_SOURCE_LEN), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        {
            let span = Span::from(MAX_SOURCE_LEN + 1..MAX_SOURCE_LEN + 10);
            assert_eq!(span, Span::new(u32::MAX, u32::MAX));
            assert_eq!(offset_to_u32(usize::MAX), u32::MAX);
        }
    }

    #[test]
    fn span_new_and_accessors() {
        let span = Span::new(5, 15);
        assert_eq!(span.start(), 5);
        assert_eq!(span.end(), 15);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
    }

    #[test]
    fn span_merge_covers_both() {
        let merged = Span::new(15, 20).merge(Span::new(5, 10));
        assert_eq!(merged, Span::new(5, 20));
    }

    #[test]
    fn span_from_usize_range() {
        let span: Span = (3usize..9usize).into();
        assert_eq!(span.as_range(), 3..9);
    }

    #[test]
    fn file_id_round_trips_index() {
        let id = FileId::from_index(7);
        assert_eq!(id.index(), 7);
        assert!(!id.is_core_library());
        assert!(FileId::CORE_LIBRARY.is_core_library());
        assert_eq!(FileId::CORE_LIBRARY.to_string(), "<core>");
    }

    #[test]
    fn locations_order_by_file_then_span() {
        let a = Location::new(FileId::from_index(0), Span::new(50, 60));
        let b = Location::new(FileId::from_index(1), Span::new(0, 4));
        let c = Location::new(FileId::from_index(1), Span::new(10, 14));
        let mut locations = vec![c, a, b];
        locations.sort();
        assert_eq!(locations, vec![a, b, c]);
    }
}
