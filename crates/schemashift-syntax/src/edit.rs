//! Byte-span splicing.
//!
//! Rewrites are collected as [`Edit`]s against the original text and applied
//! in one pass. Text between edits is copied through untouched.

use std::ops::Range;

/// Replace `start..end` of the source with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            replacement: replacement.into(),
        }
    }

    /// Zero-width insertion at `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at..at, text)
    }

    /// Removal of `range`.
    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range, String::new())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit {start}..{end} overlaps a previous edit ending at {previous_end}")]
    Overlap {
        start: usize,
        end: usize,
        previous_end: usize,
    },

    #[error("edit {start}..{end} is outside the source (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit boundary {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Apply `edits` to `source`.
///
/// Edits are sorted by position first. Two edits may touch (one ending where
/// the next starts) but not overlap.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, EditError> {
    edits.sort_by_key(|e| (e.start, e.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        if edit.start > edit.end || edit.end > source.len() {
            return Err(EditError::OutOfBounds {
                start: edit.start,
                end: edit.end,
                len: source.len(),
            });
        }
        if edit.start < cursor {
            return Err(EditError::Overlap {
                start: edit.start,
                end: edit.end,
                previous_end: cursor,
            });
        }
        for boundary in [edit.start, edit.end] {
            if !source.is_char_boundary(boundary) {
                return Err(EditError::NotCharBoundary(boundary));
            }
        }
        output.push_str(&source[cursor..edit.start]);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }
    output.push_str(&source[cursor..]);
    Ok(output)
}
