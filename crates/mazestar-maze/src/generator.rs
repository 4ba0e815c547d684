//! Seeded maze generation.
//!
//! Mazes are carved with a randomized depth-first "recursive backtracker"
//! run on an explicit stack, which yields a spanning tree over all cells.
//! An optional braiding pass then opens extra walls to create loops.
//!
//! For a given [`GenConfig`] with a seed, the output is bit-identical across
//! runs: the RNG is seeded once and consumed in a fixed order (one direction
//! shuffle per carved cell, then one draw per blocked wall in row-major
//! order during braiding).

use std::fmt;

use log::debug;
use mazestar_core::{Cell, Dir};
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

use crate::maze::GridMaze;

/// Generation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenConfig {
    /// Columns; at least 2.
    pub width: i32,
    /// Rows; at least 2.
    pub height: i32,
    /// RNG seed. `None` draws a fresh seed per generated maze.
    pub seed: Option<u64>,
    /// Probability in \[0, 1\] of opening each wall left after carving.
    pub braid: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 15,
            seed: None,
            braid: 0.0,
        }
    }
}

impl GenConfig {
    /// Check the parameters without generating anything.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.width < 2 || self.height < 2 {
            return Err(GenError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.braid) {
            return Err(GenError::InvalidBraidFraction(self.braid));
        }
        Ok(())
    }
}

/// Errors reported for invalid generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenError {
    /// Width or height below 2.
    InvalidDimensions { width: i32, height: i32 },
    /// Braid fraction outside \[0, 1\] (or NaN).
    InvalidBraidFraction(f64),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "invalid maze dimensions {width}x{height}: both must be at least 2"
            ),
            Self::InvalidBraidFraction(v) => {
                write!(f, "invalid braid fraction {v}: must be within [0, 1]")
            }
        }
    }
}

impl std::error::Error for GenError {}

/// One level of the carving stack: a cell and the directions it has yet to
/// try, in shuffled order.
struct CarveFrame {
    cell: Cell,
    dirs: [Dir; 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(cell: Cell, rng: &mut R) -> Self {
        let mut dirs = Dir::ALL;
        // Fisher-Yates.
        for i in (1..dirs.len()).rev() {
            let j = rng.random_range(0..=i);
            dirs.swap(i, j);
        }
        Self {
            cell,
            dirs,
            next: 0,
        }
    }
}

/// Maze generator for a validated [`GenConfig`].
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    config: GenConfig,
}

impl MazeGenerator {
    /// Create a generator, rejecting invalid parameters.
    pub fn new(config: GenConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generate a maze from the configured seed.
    ///
    /// Without a seed, one is drawn from the thread RNG and logged at debug
    /// level so the maze can be reproduced.
    pub fn generate(&self) -> GridMaze {
        self.generate_seeded().0
    }

    /// Like [`MazeGenerator::generate`], also returning the seed that was
    /// used (the configured one, or the one drawn in its absence).
    pub fn generate_seeded(&self) -> (GridMaze, u64) {
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::rng().random();
                debug!("no maze seed configured, drew {seed}");
                seed
            }
        };
        let mut rng = StdRng::seed_from_u64(seed);
        (self.build(&mut rng, &seed.to_string()), seed)
    }

    /// Generate a maze drawing randomness from `rng`. The configured seed is
    /// ignored.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> GridMaze {
        self.build(rng, "caller rng")
    }

    fn build<R: Rng + ?Sized>(&self, rng: &mut R, source: &str) -> GridMaze {
        let mut maze = GridMaze::new(self.config.width, self.config.height);
        let depth = carve(&mut maze, rng);
        let braided = if self.config.braid > 0.0 {
            braid(&mut maze, self.config.braid, rng)
        } else {
            0
        };
        debug!(
            "generated {}x{} maze (seed {}): max carve depth {}, {} walls braided, {} passages",
            self.config.width,
            self.config.height,
            source,
            depth,
            braided,
            maze.passage_count()
        );
        maze
    }
}

/// Generate a `width × height` maze.
///
/// `seed: None` yields a non-reproducible maze. `braid` is the probability
/// of opening each wall that remains after the spanning tree is carved.
pub fn generate(
    width: i32,
    height: i32,
    seed: Option<u64>,
    braid: f64,
) -> Result<GridMaze, GenError> {
    let generator = MazeGenerator::new(GenConfig {
        width,
        height,
        seed,
        braid,
    })?;
    Ok(generator.generate())
}

/// Carve a spanning tree from (0, 0). Returns the deepest stack reached.
fn carve<R: Rng + ?Sized>(maze: &mut GridMaze, rng: &mut R) -> usize {
    let bounds = maze.bounds();
    let mut visited = vec![false; bounds.len()];
    let mut stack = Vec::new();

    visited[0] = true;
    stack.push(CarveFrame::new(Cell::ZERO, rng));
    let mut depth = stack.len();

    while let Some(top) = stack.last_mut() {
        if top.next == top.dirs.len() {
            stack.pop();
            continue;
        }
        let dir = top.dirs[top.next];
        top.next += 1;
        let cell = top.cell;
        let next = cell.step(dir);

        let Some(ni) = bounds.index(next) else {
            continue;
        };
        if visited[ni] {
            continue;
        }
        visited[ni] = true;
        maze.set_open(cell, dir, true);
        stack.push(CarveFrame::new(next, rng));
        depth = depth.max(stack.len());
    }

    depth
}

/// Open each closed internal wall with probability `fraction`. Walls are
/// visited row-major, right wall before bottom wall. Returns how many were
/// opened.
fn braid<R: Rng + ?Sized>(maze: &mut GridMaze, fraction: f64, rng: &mut R) -> usize {
    let bounds = maze.bounds();
    let mut opened = 0;
    for cell in bounds {
        for dir in [Dir::Right, Dir::Down] {
            if !bounds.contains(cell.step(dir)) || maze.is_open(cell, dir) {
                continue;
            }
            if rng.random_bool(fraction) {
                maze.set_open(cell, dir, true);
                opened += 1;
            }
        }
    }
    opened
}
