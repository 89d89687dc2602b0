//! Locations, points and half-open ranges.
//!
//! Producers report positions as 1-based `(line, offset)` pairs. Everything
//! downstream of the store works with 0-based [`Point`]s and half-open
//! [`Range`]s, so conversion happens exactly once via [`location_to_point`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A 1-based `(line, offset)` position as reported by a compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-based)
    pub line: u32,
    /// Character offset within the line (1-based)
    pub offset: u32,
}

impl Location {
    /// Synthetic location used when a producer omits one.
    pub const ORIGIN: Location = Location { line: 1, offset: 1 };

    /// Create a new location.
    #[inline]
    pub const fn new(line: u32, offset: u32) -> Self {
        Self { line, offset }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// A 0-based `(row, column)` position.
///
/// Points order lexicographically: row first, then column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Row (0-based)
    pub row: u32,
    /// Column (0-based)
    pub column: u32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range `[start, end)` between two points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive start
    pub start: Point,
    /// Exclusive end
    pub end: Point,
}

impl Range {
    /// Create a range, swapping the endpoints if they are reversed.
    pub fn new(a: Point, b: Point) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Create a range from raw `(row, column)` coordinates.
    #[inline]
    pub fn from_coords(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            Point::new(start_row, start_col),
            Point::new(end_row, end_col),
        )
    }

    /// A zero-width range at `point`.
    #[inline]
    pub const fn empty_at(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// Whether the range covers no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start <= point < end`.
    ///
    /// An empty range contains no point, not even its own start.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        self.start <= point && point < self.end
    }

    /// Whether `other` lies entirely inside this range.
    #[inline]
    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Open intersection test: ranges that merely touch do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Range) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

/// Convert a 1-based location to a 0-based point.
#[inline]
pub fn location_to_point(loc: Location) -> Point {
    Point {
        row: loc.line.saturating_sub(1),
        column: loc.offset.saturating_sub(1),
    }
}

/// Convert a pair of 1-based locations to a range.
#[inline]
pub fn locations_to_range(start: Location, end: Location) -> Range {
    Range::new(location_to_point(start), location_to_point(end))
}

/// Convert a `(start, length)` character span over `text` into a range.
///
/// Offsets past the end of `text` are clamped to the end.
pub fn text_span_to_range(text: &str, start: usize, length: usize) -> Range {
    let start_point = char_offset_to_point(text, start);
    let end_point = char_offset_to_point(text, start.saturating_add(length));
    Range::new(start_point, end_point)
}

fn char_offset_to_point(text: &str, offset: usize) -> Point {
    let mut row = 0u32;
    let mut column = 0u32;

    for ch in text.chars().take(offset) {
        if ch == '\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
    }

    Point { row, column }
}
