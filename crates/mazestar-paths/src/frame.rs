//! Per-step snapshots of the A* working set.
//!
//! The engine knows nothing about rendering: it hands each [`SearchFrame`] to
//! a [`FrameSink`] and moves on. Collect frames into a `Vec`, stream them
//! elsewhere, or pass [`NoFrames`] to skip snapshot construction entirely.

use mazestar_core::Cell;

/// One open-set cell as seen at the time a frame was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontierEntry {
    pub cell: Cell,
    pub g: i32,
    pub h: i32,
    pub f: i32,
}

/// Snapshot taken once per evaluated cell.
///
/// `frontier` is in pop order (lowest `f`, then lowest `h`, then earliest
/// insertion). `closed` lists finalized cells in the order they were closed,
/// `current` included as its last element.
///
/// Each frame owns its own copy of the closed list, so a fully collected
/// frame sequence grows with the square of the step count. For large mazes
/// hand a streaming [`FrameSink`] to [`AstarSearch::run`] (or drive
/// [`AstarSearch::step`] directly) instead of collecting into a `Vec`; the
/// closed order is also recoverable from the `current` cells alone.
///
/// [`AstarSearch::run`]: crate::AstarSearch::run
/// [`AstarSearch::step`]: crate::AstarSearch::step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchFrame {
    pub step: usize,
    pub current: Cell,
    pub frontier: Vec<FrontierEntry>,
    pub closed: Vec<Cell>,
}

impl SearchFrame {
    /// Frontier entry for `cell`, if it was open when the frame was taken.
    pub fn frontier_entry(&self, cell: Cell) -> Option<&FrontierEntry> {
        self.frontier.iter().find(|e| e.cell == cell)
    }

    /// Whether `cell` had been closed when the frame was taken.
    pub fn is_closed(&self, cell: Cell) -> bool {
        self.closed.contains(&cell)
    }
}

/// Consumer of search frames.
pub trait FrameSink {
    /// Receive the frame for one evaluation step.
    fn record(&mut self, frame: SearchFrame);

    /// Whether frames should be built at all. Returning `false` lets the
    /// engine skip the snapshot work.
    fn enabled(&self) -> bool {
        true
    }
}

impl FrameSink for Vec<SearchFrame> {
    fn record(&mut self, frame: SearchFrame) {
        self.push(frame);
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn record(&mut self, frame: SearchFrame) {
        (**self).record(frame);
    }

    fn enabled(&self) -> bool {
        (**self).enabled()
    }
}

/// Sink that discards everything and disables capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrames;

impl FrameSink for NoFrames {
    fn record(&mut self, _frame: SearchFrame) {}

    fn enabled(&self) -> bool {
        false
    }
}
