//! Input cursor
//!
//! A cursor is the text being matched plus a byte offset into it. Cursors are
//! `Copy` and never mutated; advancing produces a new one. Two cursors compare by
//! offset only.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'s> {
    text: &'s str,
    offset: usize,
}

impl<'s> Cursor<'s> {
    /// Cursor positioned at the start of `text`.
    pub fn new(text: &'s str) -> Self {
        Self { text, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole text this cursor walks over.
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Input not yet consumed.
    pub fn rest(&self) -> &'s str {
        &self.text[self.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.text.len()
    }

    pub fn next_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// A new cursor `width` bytes further. `width` must land on a char boundary.
    pub fn advance(self, width: usize) -> Self {
        let offset = self.offset + width;
        debug_assert!(
            self.text.is_char_boundary(offset),
            "cursor advanced into the middle of a character at offset {}",
            offset
        );
        Self {
            text: self.text,
            offset,
        }
    }

    /// Text between this cursor and a later one.
    pub fn slice_to(&self, later: &Cursor<'s>) -> &'s str {
        &self.text[self.offset..later.offset]
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for Cursor<'_> {}

impl PartialOrd for Cursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cursor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}
