//! The maze data model.
//!
//! A [`GridMaze`] is a `width × height` block of cells where each cell keeps
//! a 4-bit mask of open passages (one bit per [`Dir`]). Passages are always
//! stored on both sides: opening A→B also opens B→A.

use std::fmt;

use mazestar_core::{Cell, Dir, Range};
use mazestar_paths::{
    AstarPather, AstarSearch, FrameSink, Pather, SearchError, SearchResult, WeightedPather,
    bfs_map, manhattan, search,
};

/// A rectangular maze with designated start and goal cells.
///
/// Deserialized mazes go through [`GridMaze::from_passages`], so a loaded
/// maze upholds the same invariants as a generated one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridMaze"))]
pub struct GridMaze {
    width: i32,
    height: i32,
    passages: Vec<u8>,
    start: Cell,
    goal: Cell,
}

/// Unchecked wire form of [`GridMaze`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGridMaze {
    width: i32,
    height: i32,
    passages: Vec<u8>,
    start: Cell,
    goal: Cell,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridMaze> for GridMaze {
    type Error = MazeError;

    fn try_from(raw: RawGridMaze) -> Result<Self, MazeError> {
        GridMaze::from_passages(raw.width, raw.height, raw.passages, raw.start, raw.goal)
    }
}

/// Errors for passage data that does not describe a well-formed maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Negative width or height.
    NegativeSize { width: i32, height: i32 },
    /// One mask per cell was expected.
    MaskCount { expected: usize, found: usize },
    /// A mask uses bits outside the four direction bits.
    UnknownBits { cell: Cell, mask: u8 },
    /// A passage leads out of the grid.
    OffGrid { cell: Cell, dir: Dir },
    /// A passage is open on one side only.
    OneSided { cell: Cell, dir: Dir },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSize { width, height } => {
                write!(f, "maze: negative size {width}x{height}")
            }
            Self::MaskCount { expected, found } => {
                write!(f, "maze: {found} passage masks for {expected} cells")
            }
            Self::UnknownBits { cell, mask } => {
                write!(f, "maze: invalid passage mask {mask:#06b} at {cell}")
            }
            Self::OffGrid { cell, dir } => {
                write!(f, "maze: passage {dir:?} from {cell} leaves the grid")
            }
            Self::OneSided { cell, dir } => {
                write!(f, "maze: passage {dir:?} from {cell} is open on one side only")
            }
        }
    }
}

impl std::error::Error for MazeError {}

impl GridMaze {
    /// Create a maze with every wall closed. The start is the top-left cell
    /// and the goal the bottom-right one.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            passages: vec![0; Range::sized(width, height).len()],
            start: Cell::ZERO,
            goal: Cell::new(width - 1, height - 1),
        }
    }

    /// Build a maze from one passage mask per cell, row-major.
    ///
    /// Each mask holds [`Dir::bit`] flags. Every passage must stay inside
    /// the grid and be open from both sides. Endpoints are not checked here;
    /// [`GridMaze::solve`] rejects out-of-bounds ones.
    pub fn from_passages(
        width: i32,
        height: i32,
        passages: Vec<u8>,
        start: Cell,
        goal: Cell,
    ) -> Result<Self, MazeError> {
        if width < 0 || height < 0 {
            return Err(MazeError::NegativeSize { width, height });
        }
        let bounds = Range::sized(width, height);
        if passages.len() != bounds.len() {
            return Err(MazeError::MaskCount {
                expected: bounds.len(),
                found: passages.len(),
            });
        }
        for (i, &mask) in passages.iter().enumerate() {
            let cell = bounds.cell(i);
            if mask & !0b1111 != 0 {
                return Err(MazeError::UnknownBits { cell, mask });
            }
            for dir in Dir::ALL {
                if mask & dir.bit() == 0 {
                    continue;
                }
                let Some(j) = bounds.index(cell.step(dir)) else {
                    return Err(MazeError::OffGrid { cell, dir });
                };
                if passages[j] & dir.opposite().bit() == 0 {
                    return Err(MazeError::OneSided { cell, dir });
                }
            }
        }
        Ok(Self {
            width,
            height,
            passages,
            start,
            goal,
        })
    }

    /// Create a maze with every internal wall open.
    pub fn open(width: i32, height: i32) -> Self {
        let mut maze = Self::new(width, height);
        for c in maze.bounds() {
            maze.set_open(c, Dir::Right, true);
            maze.set_open(c, Dir::Down, true);
        }
        maze
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The range of cells in the maze.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::sized(self.width, self.height)
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Move the start and goal. Out-of-bounds endpoints are accepted here
    /// and rejected by [`GridMaze::solve`].
    pub fn set_endpoints(&mut self, start: Cell, goal: Cell) {
        self.start = start;
        self.goal = goal;
    }

    /// Whether the passage leaving `c` toward `dir` is open.
    #[inline]
    pub fn is_open(&self, c: Cell, dir: Dir) -> bool {
        self.bounds()
            .index(c)
            .is_some_and(|i| self.passages[i] & dir.bit() != 0)
    }

    /// Open or close the wall between `c` and its neighbour toward `dir`,
    /// on both sides.
    ///
    /// Returns `false` (and changes nothing) if either cell is outside the
    /// maze.
    pub fn set_open(&mut self, c: Cell, dir: Dir, open: bool) -> bool {
        let bounds = self.bounds();
        let (Some(a), Some(b)) = (bounds.index(c), bounds.index(c.step(dir))) else {
            return false;
        };
        if open {
            self.passages[a] |= dir.bit();
            self.passages[b] |= dir.opposite().bit();
        } else {
            self.passages[a] &= !dir.bit();
            self.passages[b] &= !dir.opposite().bit();
        }
        true
    }

    /// Whether `a` and `b` are adjacent and joined by an open passage.
    pub fn passable(&self, a: Cell, b: Cell) -> bool {
        a.dir_to(b).is_some_and(|d| self.is_open(a, d))
    }

    /// Number of open passages (each counted once).
    pub fn passage_count(&self) -> usize {
        let ends: u32 = self.passages.iter().map(|m| m.count_ones()).sum();
        (ends / 2) as usize
    }

    /// Whether the goal can be reached from the start.
    pub fn is_connected(&self) -> bool {
        bfs_map(self, self.bounds(), self.start)
            .at(self.goal)
            .is_some()
    }

    /// Search for a shortest path from start to goal.
    ///
    /// An unreachable goal is not an error: the result simply has no path.
    pub fn solve(&self, capture_frames: bool) -> Result<SearchResult, SearchError> {
        search(self, self.bounds(), self.start, self.goal, capture_frames)
    }

    /// Like [`GridMaze::solve`], streaming frames to `sink` instead of
    /// collecting them.
    pub fn solve_with<S: FrameSink>(&self, sink: &mut S) -> Result<SearchResult, SearchError> {
        Ok(AstarSearch::new(self, self.bounds(), self.start, self.goal)?.run(sink))
    }

    /// Build an A* run that the caller advances step by step.
    pub fn searcher(&self) -> Result<AstarSearch<'_, Self>, SearchError> {
        AstarSearch::new(self, self.bounds(), self.start, self.goal)
    }
}

impl Pather for GridMaze {
    fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>) {
        let Some(i) = self.bounds().index(c) else {
            return;
        };
        let mask = self.passages[i];
        for d in Dir::ALL {
            if mask & d.bit() != 0 {
                buf.push(c.step(d));
            }
        }
    }
}

impl WeightedPather for GridMaze {
    fn cost(&self, _from: Cell, _to: Cell) -> i32 {
        1
    }
}

impl AstarPather for GridMaze {
    fn estimate(&self, from: Cell, to: Cell) -> i32 {
        manhattan(from, to)
    }
}

/// ASCII drawing: `+` corners, `-`/`|` walls, `S`/`G` endpoints.
impl fmt::Display for GridMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let up = self.is_open(Cell::new(col, row), Dir::Up);
                f.write_str(if up { "+ " } else { "+-" })?;
            }
            f.write_str("+\n")?;
            for col in 0..self.width {
                let c = Cell::new(col, row);
                f.write_str(if self.is_open(c, Dir::Left) { " " } else { "|" })?;
                let mark = if c == self.start {
                    "S"
                } else if c == self.goal {
                    "G"
                } else {
                    " "
                };
                f.write_str(mark)?;
            }
            f.write_str("|\n")?;
        }
        for _ in 0..self.width {
            f.write_str("+-")?;
        }
        f.write_str("+\n")
    }
}
