//! Source ranges reported by the compiler collaborator.
//!
//! Ranges are pass-through metadata: the engine slices unit text with them
//! (method bodies, field initializers, Javadoc) but never reparses them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(offset, length)` byte range into the text of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SourceRange {
    /// Start byte offset (inclusive).
    pub offset: u32,
    /// Length in bytes.
    pub length: u32,
}

impl SourceRange {
    /// Create a new range.
    pub fn new(offset: u32, length: u32) -> Self {
        SourceRange { offset, length }
    }

    /// Create a range from half-open byte offsets.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn from_offsets(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "SourceRange start ({}) must be <= end ({})",
            start,
            end
        );
        SourceRange {
            offset: start as u32,
            length: (end - start) as u32,
        }
    }

    /// End byte offset (exclusive).
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.length)
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if this range contains another range entirely.
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.offset <= other.offset && other.end() <= self.end()
    }

    /// Slice `text` with this range.
    ///
    /// Returns `None` if the range is out of bounds or splits a UTF-8 sequence.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.offset as usize..self.end() as usize)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.offset, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_offsets() {
        let range = SourceRange::from_offsets(4, 10);
        assert_eq!(range.offset, 4);
        assert_eq!(range.length, 6);
        assert_eq!(range.end(), 10);
    }

    #[test]
    fn test_slice() {
        let text = "class Foo {}";
        assert_eq!(SourceRange::new(6, 3).slice(text), Some("Foo"));
        assert_eq!(SourceRange::new(6, 30).slice(text), None);
    }

    #[test]
    fn test_contains() {
        let outer = SourceRange::new(0, 20);
        assert!(outer.contains(&SourceRange::new(5, 5)));
        assert!(!outer.contains(&SourceRange::new(15, 10)));
    }

    #[test]
    fn test_display_and_serde() {
        let range = SourceRange::new(3, 7);
        assert_eq!(range.to_string(), "(3, 7)");
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"offset":3,"length":7}"#);
    }

    #[test]
    #[should_panic]
    fn test_inverted_offsets_panic() {
        let _ = SourceRange::from_offsets(10, 4);
    }
}
