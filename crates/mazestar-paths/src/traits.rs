use mazestar_core::Cell;

/// Minimal pathfinding interface — provides neighbor enumeration.
pub trait Pather {
    /// Append passable neighbors of `c` into `buf`. The caller clears `buf`
    /// before calling. The order must be stable across calls: it decides
    /// the insertion order of equal-priority frontier entries.
    fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Cell, to: Cell) -> i32;
}

/// Full A* pather with an admissible heuristic.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of distance from `from` to `to`.
    /// Must never overestimate the true cost (admissible).
    fn estimate(&self, from: Cell, to: Cell) -> i32;
}
