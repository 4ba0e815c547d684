use std::collections::VecDeque;

use mazestar_core::{Cell, Range};

use crate::traits::Pather;

/// Sentinel value meaning "unreachable" in a [`DistanceMap`].
pub const UNREACHABLE: i32 = i32::MAX;

/// Unweighted step counts from a single source, produced by [`bfs_map`].
#[derive(Debug, Clone)]
pub struct DistanceMap {
    range: Range,
    dist: Vec<i32>,
    reached: usize,
}

impl DistanceMap {
    /// Distance from the source to `c`, or `None` if `c` is outside the
    /// range or was never reached.
    pub fn at(&self, c: Cell) -> Option<i32> {
        let d = self.dist[self.range.index(c)?];
        (d != UNREACHABLE).then_some(d)
    }

    /// Number of cells reached, the source included.
    pub fn reached(&self) -> usize {
        self.reached
    }

    /// The range the map covers.
    pub fn range(&self) -> Range {
        self.range
    }
}

/// Compute a breadth-first search distance map from `source`.
///
/// Each step has cost 1. A source outside `range` yields a map where
/// nothing is reachable.
pub fn bfs_map<P: Pather>(pather: &P, range: Range, source: Cell) -> DistanceMap {
    let mut map = DistanceMap {
        range,
        dist: vec![UNREACHABLE; range.len()],
        reached: 0,
    };
    let Some(si) = range.index(source) else {
        return map;
    };

    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut nbuf: Vec<Cell> = Vec::with_capacity(4);
    map.dist[si] = 0;
    map.reached = 1;
    queue.push_back(si);

    while let Some(ci) = queue.pop_front() {
        let current_dist = map.dist[ci];
        let cc = range.cell(ci);

        nbuf.clear();
        pather.neighbors(cc, &mut nbuf);

        for &nc in nbuf.iter() {
            let Some(ni) = range.index(nc) else {
                continue;
            };
            if map.dist[ni] != UNREACHABLE {
                continue;
            }
            map.dist[ni] = current_dist + 1;
            map.reached += 1;
            queue.push_back(ni);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open grid with one wall column at `col == 2`, except on the last row.
    struct Walled {
        range: Range,
    }

    impl Pather for Walled {
        fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>) {
            for n in c.neighbors_4() {
                let blocked = n.col == 2 && n.row != self.range.height() - 1;
                if self.range.contains(n) && !blocked {
                    buf.push(n);
                }
            }
        }
    }

    #[test]
    fn distances_detour_around_wall() {
        let range = Range::sized(5, 4);
        let map = bfs_map(&Walled { range }, range, Cell::new(0, 0));
        assert_eq!(map.at(Cell::new(0, 0)), Some(0));
        assert_eq!(map.at(Cell::new(1, 0)), Some(1));
        // Down three rows, across to column 3, back up three rows.
        assert_eq!(map.at(Cell::new(3, 0)), Some(3 + 3 + 3));
        assert_eq!(map.at(Cell::new(2, 0)), None);
        assert_eq!(map.reached(), 20 - 3);
    }

    #[test]
    fn source_outside_range_reaches_nothing() {
        let range = Range::sized(3, 3);
        let map = bfs_map(&Walled { range }, range, Cell::new(9, 9));
        assert_eq!(map.reached(), 0);
        assert_eq!(map.at(Cell::new(0, 0)), None);
        assert_eq!(map.at(Cell::new(9, 9)), None);
    }
}
