use mazestar_core::Cell;

/// Manhattan (L1) distance between two cells.
///
/// Admissible and consistent on unit-cost 4-connected grids: every step
/// changes exactly one coordinate by one.
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.col - b.col).abs() + (a.row - b.row).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric_and_zero_on_self() {
        let a = Cell::new(1, 4);
        let b = Cell::new(6, 2);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(manhattan(b, a), 7);
        assert_eq!(manhattan(a, a), 0);
    }

    #[test]
    fn manhattan_changes_by_one_per_step() {
        let goal = Cell::new(3, 3);
        let c = Cell::new(0, 1);
        for n in c.neighbors_4() {
            assert_eq!((manhattan(c, goal) - manhattan(n, goal)).abs(), 1);
        }
    }
}
