//! Hand-authored mazes from text.
//!
//! A layout is a block of equal-width lines, one character per cell:
//!
//! | Rune | Meaning |
//! |---|---|
//! | `.` | open cell |
//! | `#` | blocked cell |
//! | `S` | start (open) |
//! | `G` | goal (open) |
//!
//! Horizontally or vertically adjacent open cells are joined by a passage;
//! blocked cells get none. Without an `S` or `G` the start and goal default
//! to the top-left and bottom-right corners.

use std::fmt;

use mazestar_core::{Cell, Dir};

use crate::maze::GridMaze;

/// The fixed demonstration maze: 8 × 8, start (0,0), goal (7,7).
const SAMPLE: &str = "\
S.......
.##.###.
........
.#.##.#.
........
.###.##.
........
.......G";

const RUNES: &str = ".#SG";

/// Errors that can occur when parsing a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout has no cells.
    Empty,
    /// Lines have inconsistent widths.
    InconsistentSize { line: usize, expected: usize, found: usize },
    /// A character outside the rune set was found.
    InvalidRune { ch: char, pos: Cell },
    /// `S` or `G` appears more than once.
    DuplicateEndpoint(char),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "layout: no cells"),
            Self::InconsistentSize {
                line,
                expected,
                found,
            } => write!(
                f,
                "layout: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "layout contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::DuplicateEndpoint(ch) => write!(f, "layout: more than one \u{201c}{ch}\u{201d}"),
        }
    }
}

impl std::error::Error for LayoutError {}

impl GridMaze {
    /// Parse a maze from a text layout (see the module docs for the runes).
    ///
    /// Surrounding whitespace on each line and blank lines are ignored.
    pub fn from_layout(text: &str) -> Result<GridMaze, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();

        let mut open = Vec::with_capacity(width * lines.len());
        let mut start = None;
        let mut goal = None;
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::InconsistentSize {
                    line: row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let pos = Cell::new(col as i32, row as i32);
                if !RUNES.contains(ch) {
                    return Err(LayoutError::InvalidRune { ch, pos });
                }
                let slot = match ch {
                    'S' => &mut start,
                    'G' => &mut goal,
                    _ => {
                        open.push(ch != '#');
                        continue;
                    }
                };
                if slot.replace(pos).is_some() {
                    return Err(LayoutError::DuplicateEndpoint(ch));
                }
                open.push(true);
            }
        }

        let mut maze = GridMaze::new(width as i32, lines.len() as i32);
        let bounds = maze.bounds();
        let is_open = |c: Cell| bounds.index(c).is_some_and(|i| open[i]);
        for c in bounds {
            if !is_open(c) {
                continue;
            }
            for dir in [Dir::Right, Dir::Down] {
                if is_open(c.step(dir)) {
                    maze.set_open(c, dir, true);
                }
            }
        }

        let start = start.unwrap_or(maze.start());
        let goal = goal.unwrap_or(maze.goal());
        maze.set_endpoints(start, goal);
        Ok(maze)
    }

    /// The built-in 8 × 8 sample maze, for deterministic demonstrations.
    pub fn sample() -> GridMaze {
        match Self::from_layout(SAMPLE) {
            Ok(maze) => maze,
            Err(err) => unreachable!("built-in sample layout is invalid: {err}"),
        }
    }
}
