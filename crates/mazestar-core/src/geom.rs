//! Geometry primitives: [`Cell`], [`Range`] and [`Dir`].
//!
//! Columns grow right, rows grow down. Everything here is a small `Copy`
//! value type; mazes and search state index into flat row-major storage
//! using these coordinates.

use std::fmt;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A grid position given as (column, row).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { col: 0, row: 0 };

    /// Create a new cell.
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Return a cell shifted by (dcol, drow).
    #[inline]
    pub const fn shift(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }

    /// The adjacent cell one step in direction `dir`.
    #[inline]
    pub const fn step(self, dir: Dir) -> Self {
        let (dc, dr) = dir.delta();
        self.shift(dc, dr)
    }

    /// The four cardinal neighbours, in [`Dir::ALL`] order (up, right, down,
    /// left).
    #[inline]
    pub fn neighbors_4(self) -> [Cell; 4] {
        Dir::ALL.map(|d| self.step(d))
    }

    /// Whether `other` shares an edge with `self`.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        (self.col - other.col).abs() + (self.row - other.row).abs() == 1
    }

    /// Direction leading from `self` to the adjacent cell `other`, if any.
    pub fn dir_to(self, other: Cell) -> Option<Dir> {
        Dir::ALL.into_iter().find(|&d| self.step(d) == other)
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-major: row first, then column, matching [`Range::iter`] order.
impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

// ---------------------------------------------------------------------------
// Dir
// ---------------------------------------------------------------------------

/// One of the four axis-aligned directions of a 4-connected grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    /// All directions in their canonical order.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    /// (column delta, row delta) of one step in this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Right => (1, 0),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
        }
    }

    /// The direction pointing back.
    #[inline]
    pub const fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }

    /// This direction's bit in a 4-bit passage mask.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Dir::Up => 0b0001,
            Dir::Right => 0b0010,
            Dir::Down => 0b0100,
            Dir::Left => 0b1000,
        }
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
///
/// All empty ranges are considered equal.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Cell,
    pub max: Cell,
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for Range {}

impl Range {
    /// Create a new range from two corners and auto-canonicalize so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(c0: i32, r0: i32, c1: i32, r1: i32) -> Self {
        Self {
            min: Cell::new(c0.min(c1), r0.min(r1)),
            max: Cell::new(c0.max(c1), r0.max(r1)),
        }
    }

    /// The range `[0, width) × [0, height)`.
    #[inline]
    pub fn sized(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width of the range (number of columns).
    #[inline]
    pub fn width(self) -> i32 {
        self.max.col - self.min.col
    }

    /// Height of the range (number of rows).
    #[inline]
    pub fn height(self) -> i32 {
        self.max.row - self.min.row
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.col >= self.max.col || self.min.row >= self.max.row
    }

    /// Whether `c` is inside the half-open range.
    #[inline]
    pub fn contains(self, c: Cell) -> bool {
        c.col >= self.min.col
            && c.col < self.max.col
            && c.row >= self.min.row
            && c.row < self.max.row
    }

    /// Flat row-major index of `c`, or `None` if outside the range.
    #[inline]
    pub fn index(self, c: Cell) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        let col = (c.col - self.min.col) as usize;
        let row = (c.row - self.min.row) as usize;
        Some(row * self.width() as usize + col)
    }

    /// Inverse of [`Range::index`]. `idx` must be below [`Range::len`].
    #[inline]
    pub fn cell(self, idx: usize) -> Cell {
        let w = self.width() as usize;
        Cell::new(
            (idx % w) as i32 + self.min.col,
            (idx / w) as i32 + self.min.row,
        )
    }

    /// Row-major iterator over every cell in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Range {
    type Item = Cell;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// RangeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the cells in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    cur: Cell,
}

impl Iterator for RangeIter {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Cell> {
        if self.cur.row >= self.range.max.row || self.range.is_empty() {
            return None;
        }
        let c = self.cur;
        self.cur.col += 1;
        if self.cur.col >= self.range.max.col {
            self.cur.col = self.range.min.col;
            self.cur.row += 1;
        }
        Some(c)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.row >= self.range.max.row {
            return (0, Some(0));
        }
        let w = self.range.width() as usize;
        let remaining_in_row = (self.range.max.col - self.cur.col) as usize;
        let remaining_rows = (self.range.max.row - self.cur.row - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for RangeIter {}
