//! Instrumented A* search.
//!
//! [`AstarSearch`] owns the whole working set of one run (node table, open
//! heap, closed order, counters) and advances one evaluation per
//! [`AstarSearch::step`]. Between steps the state is complete, so callers can
//! inspect it, stop early, or resume later.

use std::collections::BinaryHeap;

use log::{debug, trace};
use mazestar_core::{Cell, Range};

use crate::error::SearchError;
use crate::frame::{FrameSink, FrontierEntry, NoFrames, SearchFrame};
use crate::node::{Node, NodeRef, NodeState, Priority};
use crate::traits::AstarPather;

/// Aggregate counters of a search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Edge count of the returned path (0 when no path was found).
    pub path_length: usize,
    /// Cells ever inserted into the frontier, counted on first discovery.
    pub nodes_explored: usize,
    /// Cells popped and finalized.
    pub nodes_evaluated: usize,
    /// Largest number of distinct open cells observed.
    pub max_frontier: usize,
}

impl SearchStats {
    /// Path length divided by nodes explored; 0.0 if nothing was explored.
    pub fn efficiency(&self) -> f64 {
        if self.nodes_explored == 0 {
            return 0.0;
        }
        self.path_length as f64 / self.nodes_explored as f64
    }
}

/// Where a search run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Running,
    Found,
    NotFound,
}

/// Everything a finished run produces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Start-to-goal cells, both endpoints included; `None` if the goal is
    /// unreachable.
    pub path: Option<Vec<Cell>>,
    pub stats: SearchStats,
    /// Per-step frames; empty unless capture was requested.
    pub frames: Vec<SearchFrame>,
}

impl SearchResult {
    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// A* run in progress.
pub struct AstarSearch<'p, P> {
    pather: &'p P,
    range: Range,
    goal: Cell,
    goal_idx: usize,
    nodes: Vec<Node>,
    open: BinaryHeap<NodeRef>,
    open_len: usize,
    closed: Vec<Cell>,
    next_seq: u64,
    steps: usize,
    stats: SearchStats,
    status: SearchStatus,
    path: Option<Vec<Cell>>,
    nbuf: Vec<Cell>,
}

impl<'p, P: AstarPather> AstarSearch<'p, P> {
    /// Set up a search from `start` to `goal` over the cells of `range`.
    ///
    /// Fails with [`SearchError::InvalidEndpoints`] if either endpoint lies
    /// outside `range`; no search state is built in that case.
    pub fn new(
        pather: &'p P,
        range: Range,
        start: Cell,
        goal: Cell,
    ) -> Result<Self, SearchError> {
        let (Some(start_idx), Some(goal_idx)) = (range.index(start), range.index(goal)) else {
            return Err(SearchError::InvalidEndpoints {
                start,
                goal,
                bounds: range,
            });
        };

        let mut search = Self {
            pather,
            range,
            goal,
            goal_idx,
            nodes: vec![Node::default(); range.len()],
            open: BinaryHeap::new(),
            open_len: 0,
            closed: Vec::new(),
            next_seq: 0,
            steps: 0,
            stats: SearchStats::default(),
            status: SearchStatus::Running,
            path: None,
            nbuf: Vec::with_capacity(4),
        };

        let h = pather.estimate(start, goal);
        search.discover(start_idx, 0, h, usize::MAX);
        search.stats.max_frontier = search.open_len;
        Ok(search)
    }

    /// Run one evaluation: pop the best open cell, close it, relax its
    /// neighbours and report a frame to `sink`.
    ///
    /// Stale heap entries are discarded within the same call. Once a
    /// terminal status is reached, further calls do nothing and return it.
    pub fn step<S: FrameSink>(&mut self, sink: &mut S) -> SearchStatus {
        if self.status != SearchStatus::Running {
            return self.status;
        }

        let ci = loop {
            let Some(entry) = self.open.pop() else {
                self.finish(SearchStatus::NotFound);
                return self.status;
            };
            if self.is_live(&entry) {
                break entry.idx;
            }
            // Stale: closed already, or superseded by a cheaper entry.
        };

        let current = self.range.cell(ci);
        self.nodes[ci].state = NodeState::Closed;
        self.open_len -= 1;
        self.closed.push(current);
        self.stats.nodes_evaluated += 1;
        trace!(
            "step {}: closed {} g={} h={}",
            self.steps, current, self.nodes[ci].g, self.nodes[ci].h
        );

        if ci == self.goal_idx {
            let path = self.reconstruct(ci);
            self.stats.path_length = path.len() - 1;
            self.path = Some(path);
            self.emit(sink, current);
            self.finish(SearchStatus::Found);
            return self.status;
        }

        self.expand(ci, current);
        self.stats.max_frontier = self.stats.max_frontier.max(self.open_len);
        self.emit(sink, current);
        SearchStatus::Running
    }

    /// Drive the search to a terminal status, reporting every frame to
    /// `sink`.
    pub fn run<S: FrameSink>(mut self, sink: &mut S) -> SearchResult {
        while self.step(sink) == SearchStatus::Running {}
        self.into_result()
    }

    /// Consume the search and return what it has produced so far.
    ///
    /// Calling this before a terminal status yields `path: None` with the
    /// counters as they stand.
    pub fn into_result(self) -> SearchResult {
        SearchResult {
            path: self.path,
            stats: self.stats,
            frames: Vec::new(),
        }
    }

    /// Current status.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Counters as they stand.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Number of evaluations performed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of distinct open cells.
    pub fn frontier_len(&self) -> usize {
        self.open_len
    }

    /// Best known cost from the start to `c`, if `c` has been discovered.
    pub fn g_score(&self, c: Cell) -> Option<i32> {
        let node = &self.nodes[self.range.index(c)?];
        (node.state != NodeState::Unseen).then_some(node.g)
    }

    /// Whether `c` has been finalized.
    pub fn is_closed(&self, c: Cell) -> bool {
        self.range
            .index(c)
            .is_some_and(|i| self.nodes[i].state == NodeState::Closed)
    }

    /// Cells closed so far, in closing order.
    pub fn closed(&self) -> &[Cell] {
        &self.closed
    }

    /// The path, once the goal has been reached.
    pub fn path(&self) -> Option<&[Cell]> {
        self.path.as_deref()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn expand(&mut self, ci: usize, current: Cell) {
        let current_g = self.nodes[ci].g;
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        self.pather.neighbors(current, &mut nbuf);

        for &nc in nbuf.iter() {
            let Some(ni) = self.range.index(nc) else {
                continue;
            };
            let tentative_g = current_g + self.pather.cost(current, nc);
            let state = self.nodes[ni].state;
            match state {
                NodeState::Closed => continue,
                NodeState::Open if tentative_g >= self.nodes[ni].g => continue,
                NodeState::Open => {
                    let h = self.nodes[ni].h;
                    self.push(ni, tentative_g, h, ci);
                }
                NodeState::Unseen => {
                    let h = self.pather.estimate(nc, self.goal);
                    self.discover(ni, tentative_g, h, ci);
                }
            }
        }

        self.nbuf = nbuf;
    }

    /// First insertion of a cell into the open set.
    fn discover(&mut self, idx: usize, g: i32, h: i32, parent: usize) {
        self.stats.nodes_explored += 1;
        self.open_len += 1;
        self.push(idx, g, h, parent);
    }

    /// Record `g`/`h`/parent for `idx` and push a fresh heap entry.
    fn push(&mut self, idx: usize, g: i32, h: i32, parent: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let node = &mut self.nodes[idx];
        node.g = g;
        node.h = h;
        node.parent = parent;
        node.seq = seq;
        node.state = NodeState::Open;
        let key = Priority { f: node.f(), h, seq };
        self.open.push(NodeRef { idx, key });
    }

    /// Whether `entry` is the latest push for a cell that is still open.
    #[inline]
    fn is_live(&self, entry: &NodeRef) -> bool {
        let node = &self.nodes[entry.idx];
        node.state == NodeState::Open && node.seq == entry.key.seq
    }

    fn reconstruct(&self, goal_idx: usize) -> Vec<Cell> {
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.range.cell(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }

    fn emit<S: FrameSink>(&mut self, sink: &mut S, current: Cell) {
        let step = self.steps;
        self.steps += 1;
        if !sink.enabled() {
            return;
        }

        // Every open cell has exactly one live heap entry.
        let mut open: Vec<(Priority, FrontierEntry)> = self
            .open
            .iter()
            .filter(|entry| self.is_live(entry))
            .map(|entry| {
                let n = &self.nodes[entry.idx];
                let frontier = FrontierEntry {
                    cell: self.range.cell(entry.idx),
                    g: n.g,
                    h: n.h,
                    f: entry.key.f,
                };
                (entry.key, frontier)
            })
            .collect();
        open.sort_unstable_by_key(|(key, _)| *key);

        sink.record(SearchFrame {
            step,
            current,
            frontier: open.into_iter().map(|(_, e)| e).collect(),
            closed: self.closed.clone(),
        });
    }

    fn finish(&mut self, status: SearchStatus) {
        self.status = status;
        debug!(
            "A* {:?} to {} after {} steps: path {} explored {} evaluated {} max frontier {}",
            status,
            self.goal,
            self.steps,
            self.stats.path_length,
            self.stats.nodes_explored,
            self.stats.nodes_evaluated,
            self.stats.max_frontier
        );
    }
}

/// Run a complete search from `start` to `goal`.
///
/// With `capture_frames` the returned [`SearchResult::frames`] holds one
/// frame per evaluated cell; otherwise no snapshots are built.
pub fn search<P: AstarPather>(
    pather: &P,
    range: Range,
    start: Cell,
    goal: Cell,
    capture_frames: bool,
) -> Result<SearchResult, SearchError> {
    let search = AstarSearch::new(pather, range, start, goal)?;
    if !capture_frames {
        return Ok(search.run(&mut NoFrames));
    }
    let mut frames: Vec<SearchFrame> = Vec::new();
    let mut result = search.run(&mut frames);
    result.frames = frames;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfs::bfs_map;
    use crate::distance::manhattan;
    use crate::traits::{Pather, WeightedPather};
    use std::collections::HashSet;

    /// Open rectangle with a set of blocked cells.
    struct Field {
        range: Range,
        blocked: HashSet<Cell>,
    }

    impl Field {
        fn open(width: i32, height: i32) -> Self {
            Self {
                range: Range::sized(width, height),
                blocked: HashSet::new(),
            }
        }

        fn with_blocked(mut self, cells: &[(i32, i32)]) -> Self {
            self.blocked.extend(cells.iter().map(|&(c, r)| Cell::new(c, r)));
            self
        }
    }

    impl Pather for Field {
        fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>) {
            for n in c.neighbors_4() {
                if self.range.contains(n) && !self.blocked.contains(&n) {
                    buf.push(n);
                }
            }
        }
    }

    impl WeightedPather for Field {
        fn cost(&self, _from: Cell, _to: Cell) -> i32 {
            1
        }
    }

    impl AstarPather for Field {
        fn estimate(&self, from: Cell, to: Cell) -> i32 {
            manhattan(from, to)
        }
    }

    fn corner_search(field: &Field, capture: bool) -> SearchResult {
        let goal = Cell::new(field.range.width() - 1, field.range.height() - 1);
        search(field, field.range, Cell::ZERO, goal, capture).unwrap()
    }

    #[test]
    fn open_five_by_five_has_manhattan_length() {
        let field = Field::open(5, 5);
        let res = corner_search(&field, false);
        let path = res.path.as_ref().unwrap();
        assert_eq!(res.stats.path_length, 8);
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], Cell::ZERO);
        assert_eq!(path[8], Cell::new(4, 4));
        assert!(res.stats.nodes_evaluated <= 25);
        assert!(res.frames.is_empty());
    }

    #[test]
    fn lowest_h_tie_break_runs_straight_to_goal() {
        // Every cell on a monotone path has f = 8; preferring low h means
        // each pop is the newest step toward the goal, so only the path
        // itself is evaluated.
        let field = Field::open(5, 5);
        let res = corner_search(&field, false);
        assert_eq!(res.stats.nodes_evaluated, 9);
    }

    #[test]
    fn path_is_adjacent_and_passable() {
        let field = Field::open(7, 6).with_blocked(&[
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
            (3, 5),
            (3, 4),
            (3, 3),
            (5, 0),
            (5, 1),
            (5, 2),
        ]);
        let res = corner_search(&field, false);
        let path = res.path.unwrap();
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {}", pair[0], pair[1]);
            assert!(!field.blocked.contains(&pair[1]));
        }
        let bfs = bfs_map(&field, field.range, Cell::ZERO);
        assert_eq!(
            Some(res.stats.path_length as i32),
            bfs.at(Cell::new(6, 5))
        );
    }

    #[test]
    fn closed_g_scores_match_bfs() {
        let field = Field::open(8, 8).with_blocked(&[
            (2, 1),
            (2, 2),
            (2, 3),
            (2, 4),
            (5, 3),
            (5, 4),
            (5, 5),
            (5, 6),
            (5, 7),
        ]);
        let goal = Cell::new(7, 7);
        let mut s = AstarSearch::new(&field, field.range, Cell::ZERO, goal).unwrap();
        while s.step(&mut NoFrames) == SearchStatus::Running {}
        assert_eq!(s.status(), SearchStatus::Found);

        let bfs = bfs_map(&field, field.range, Cell::ZERO);
        for &c in s.closed() {
            assert_eq!(s.g_score(c), bfs.at(c), "g mismatch at {c}");
        }
        let unique: HashSet<_> = s.closed().iter().collect();
        assert_eq!(unique.len(), s.closed().len(), "a cell was closed twice");
        assert_eq!(s.g_score(goal), Some(s.stats().path_length as i32));
    }

    #[test]
    fn isolated_goal_is_not_found() {
        let field = Field::open(4, 4).with_blocked(&[(2, 3), (3, 2)]);
        let res = corner_search(&field, true);
        assert!(!res.is_found());
        assert_eq!(res.path, None);
        assert_eq!(res.stats.path_length, 0);
        // Everything except the goal and its two blockers gets evaluated.
        assert_eq!(res.stats.nodes_evaluated, 13);
        assert_eq!(res.frames.len(), 13);
        assert_eq!(res.stats.efficiency(), 0.0);
    }

    #[test]
    fn out_of_bounds_endpoints_fail_fast() {
        let field = Field::open(3, 3);
        let err = search(&field, field.range, Cell::ZERO, Cell::new(3, 0), false).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidEndpoints {
                start: Cell::ZERO,
                goal: Cell::new(3, 0),
                bounds: field.range,
            }
        );
        assert!(AstarSearch::new(&field, field.range, Cell::new(-1, 0), Cell::ZERO).is_err());
    }

    #[test]
    fn start_equals_goal() {
        let field = Field::open(3, 3);
        let res = search(&field, field.range, Cell::new(1, 1), Cell::new(1, 1), true).unwrap();
        assert_eq!(res.path, Some(vec![Cell::new(1, 1)]));
        assert_eq!(res.stats.path_length, 0);
        assert_eq!(res.stats.nodes_explored, 1);
        assert_eq!(res.stats.nodes_evaluated, 1);
        assert_eq!(res.frames.len(), 1);
    }

    #[test]
    fn explored_never_below_evaluated() {
        let field = Field::open(6, 6).with_blocked(&[(1, 1), (2, 2), (3, 3), (4, 1), (1, 4)]);
        let mut s = AstarSearch::new(&field, field.range, Cell::ZERO, Cell::new(5, 5)).unwrap();
        loop {
            let st = s.stats();
            assert!(st.nodes_explored >= st.nodes_evaluated);
            assert!(st.max_frontier >= s.frontier_len());
            if s.step(&mut NoFrames) != SearchStatus::Running {
                break;
            }
        }
    }

    #[test]
    fn frames_capture_post_update_frontier() {
        let field = Field::open(3, 3);
        let res = corner_search(&field, true);
        assert_eq!(res.frames.len(), res.stats.nodes_evaluated);

        let first = &res.frames[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.current, Cell::ZERO);
        assert_eq!(first.closed, vec![Cell::ZERO]);
        // (1,0) and (0,1) both have g=1 h=3; (1,0) was inserted first.
        let cells: Vec<_> = first.frontier.iter().map(|e| e.cell).collect();
        assert_eq!(cells, vec![Cell::new(1, 0), Cell::new(0, 1)]);
        assert_eq!(
            first.frontier[0],
            FrontierEntry {
                cell: Cell::new(1, 0),
                g: 1,
                h: 3,
                f: 4
            }
        );

        for (i, f) in res.frames.iter().enumerate() {
            assert_eq!(f.step, i);
            assert_eq!(f.closed.len(), i + 1);
            assert_eq!(f.closed.last(), Some(&f.current));
            assert!(f.frontier.iter().all(|e| !f.is_closed(e.cell)));
            assert!(f.frontier.windows(2).all(|w| (w[0].f, w[0].h) <= (w[1].f, w[1].h)));
        }
        let last = res.frames.last().unwrap();
        assert_eq!(last.current, Cell::new(2, 2));
    }

    #[test]
    fn frames_match_uncaptured_run() {
        let field = Field::open(6, 5).with_blocked(&[(2, 0), (2, 1), (2, 2), (4, 4), (4, 3)]);
        let with = corner_search(&field, true);
        let without = corner_search(&field, false);
        assert_eq!(with.path, without.path);
        assert_eq!(with.stats, without.stats);
        let order: Vec<Cell> = with.frames.iter().map(|f| f.current).collect();
        assert_eq!(&order, &with.frames.last().unwrap().closed);
    }

    /// 2x2 grid where entering (1,1) from (1,0) costs 5, so the goal is
    /// first reached expensively and then improved through (0,1).
    struct Detour;

    impl Pather for Detour {
        fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>) {
            let range = Range::sized(2, 2);
            buf.extend(c.neighbors_4().into_iter().filter(|&n| range.contains(n)));
        }
    }

    impl WeightedPather for Detour {
        fn cost(&self, from: Cell, to: Cell) -> i32 {
            if from == Cell::new(1, 0) && to == Cell::new(1, 1) {
                5
            } else {
                1
            }
        }
    }

    impl AstarPather for Detour {
        fn estimate(&self, _from: Cell, _to: Cell) -> i32 {
            0
        }
    }

    #[test]
    fn improved_cell_appears_once_in_frontier() {
        let goal = Cell::new(1, 1);
        let res = search(&Detour, Range::sized(2, 2), Cell::ZERO, goal, true).unwrap();
        assert_eq!(res.path, Some(vec![Cell::ZERO, Cell::new(0, 1), goal]));
        assert_eq!(res.stats.nodes_explored, 3);
        assert_eq!(res.stats.nodes_evaluated, 4);
        assert_eq!(res.frames.len(), 4);

        let before = &res.frames[1];
        assert_eq!(before.frontier_entry(goal).map(|e| e.g), Some(6));

        // The g=6 heap entry is still queued here but must not be reported.
        let after = &res.frames[2];
        assert_eq!(
            after.frontier,
            vec![FrontierEntry {
                cell: goal,
                g: 2,
                h: 0,
                f: 2
            }]
        );
        assert!(res.frames[3].frontier.is_empty());
    }

    #[test]
    fn stepping_can_pause_and_resume() {
        let field = Field::open(5, 5);
        let goal = Cell::new(4, 4);
        let mut s = AstarSearch::new(&field, field.range, Cell::ZERO, goal).unwrap();
        let mut frames: Vec<SearchFrame> = Vec::new();
        for _ in 0..3 {
            assert_eq!(s.step(&mut frames), SearchStatus::Running);
        }
        assert_eq!(s.steps(), 3);
        assert!(s.path().is_none());
        let partial = s.stats();

        let res = s.run(&mut frames);
        assert!(res.stats.nodes_evaluated > partial.nodes_evaluated);
        assert_eq!(frames.len(), res.stats.nodes_evaluated);
        assert_eq!(res.stats.path_length, 8);
    }

    #[test]
    fn terminal_status_is_sticky() {
        let field = Field::open(2, 2);
        let mut s = AstarSearch::new(&field, field.range, Cell::ZERO, Cell::new(1, 1)).unwrap();
        while s.step(&mut NoFrames) == SearchStatus::Running {}
        let stats = s.stats();
        assert_eq!(s.step(&mut NoFrames), SearchStatus::Found);
        assert_eq!(s.stats(), stats);
    }

    #[test]
    fn efficiency_is_path_over_explored() {
        let stats = SearchStats {
            path_length: 8,
            nodes_explored: 16,
            nodes_evaluated: 9,
            max_frontier: 7,
        };
        assert!((stats.efficiency() - 0.5).abs() < 1e-12);
        assert_eq!(SearchStats::default().efficiency(), 0.0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn result_round_trip() {
        let res = SearchResult {
            path: Some(vec![Cell::new(0, 0), Cell::new(1, 0)]),
            stats: SearchStats {
                path_length: 1,
                nodes_explored: 3,
                nodes_evaluated: 2,
                max_frontier: 2,
            },
            frames: Vec::new(),
        };
        let json = serde_json::to_string(&res).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(res, back);
    }
}
