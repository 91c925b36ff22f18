//! Square unit grid and fusion reach
//!
//! Cells are stored row-major. Every lookup goes through `Coord`, which can
//! only be built in range, so a unit's `row`/`col` always match its cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::FUSION_REACH;

/// Search directions in priority order: N, S, W, E, NW, NE, SW, SE
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// An in-range grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

/// A leveled piece occupying one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub level: u32,
    pub row: usize,
    pub col: usize,
}

impl Unit {
    pub fn coord(&self) -> Coord {
        Coord {
            row: self.row,
            col: self.col,
        }
    }
}

/// Fixed-size square grid of optional units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Unit>>,
}

impl Grid {
    /// Create an empty grid with `size * size` cells
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Validate a signed position. Anything outside `[0, size)` is `None`.
    pub fn coord(&self, row: isize, col: isize) -> Option<Coord> {
        let in_range = |v: isize| v >= 0 && (v as usize) < self.size;
        if in_range(row) && in_range(col) {
            Some(Coord {
                row: row as usize,
                col: col as usize,
            })
        } else {
            None
        }
    }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        at.row * self.size + at.col
    }

    pub fn get(&self, at: Coord) -> Option<&Unit> {
        self.cells[self.index(at)].as_ref()
    }

    /// Put a new unit of `level` at `at`, replacing whatever was there
    pub(crate) fn place(&mut self, at: Coord, level: u32) -> Unit {
        let unit = Unit {
            level,
            row: at.row,
            col: at.col,
        };
        let idx = self.index(at);
        debug_assert!(self.cells[idx].is_none(), "cell {:?} already occupied", at);
        self.cells[idx] = Some(unit);
        unit
    }

    /// Remove and return the unit at `at`
    pub(crate) fn take(&mut self, at: Coord) -> Option<Unit> {
        let idx = self.index(at);
        self.cells[idx].take()
    }

    /// Destroy every unit, returning the cells that were occupied
    pub(crate) fn clear(&mut self) -> Vec<Coord> {
        let cleared = self.units().map(Unit::coord).collect();
        self.cells.iter_mut().for_each(|c| *c = None);
        cleared
    }

    /// All cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Option<&Unit>)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (
                Coord {
                    row: i / size,
                    col: i % size,
                },
                cell.as_ref(),
            )
        })
    }

    /// Occupied cells in row-major order
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.cells.iter().flatten()
    }

    pub fn unit_count(&self) -> usize {
        self.units().count()
    }

    /// First empty cell by (row, col) ascending
    pub fn find_empty_slot(&self) -> Option<Coord> {
        self.iter().find(|(_, cell)| cell.is_none()).map(|(at, _)| at)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// In-range cells reachable from `from`, in search order.
    /// Each direction yields step 1 before step 2.
    pub fn reach(&self, from: Coord) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS.iter().flat_map(move |&(dr, dc)| {
            (1..=FUSION_REACH).filter_map(move |step| {
                self.coord(
                    from.row as isize + dr * step,
                    from.col as isize + dc * step,
                )
            })
        })
    }

    /// First unit in reach of `from` with the same level
    pub fn find_fusion_partner(&self, from: Coord) -> Option<Coord> {
        let level = self.get(from)?.level;
        self.reach(from)
            .find(|&at| self.get(at).is_some_and(|n| n.level == level))
    }

    /// True if any unit could fuse right now
    pub fn has_valid_moves(&self) -> bool {
        self.units()
            .any(|u| self.find_fusion_partner(u.coord()).is_some())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.get(Coord { row, col }) {
                    Some(unit) => write!(f, "{:>2}", unit.level)?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    #[test]
    fn test_coord_bounds() {
        let grid = Grid::new(3);
        assert_eq!(grid.coord(0, 0), Some(at(0, 0)));
        assert_eq!(grid.coord(2, 2), Some(at(2, 2)));
        assert_eq!(grid.coord(-1, 0), None);
        assert_eq!(grid.coord(0, 3), None);
        assert_eq!(grid.coord(3, 3), None);
    }

    #[test]
    fn test_find_empty_slot_row_major() {
        let mut grid = Grid::new(3);
        assert_eq!(grid.find_empty_slot(), Some(at(0, 0)));

        grid.place(at(0, 0), 1);
        grid.place(at(0, 2), 1);
        assert_eq!(grid.find_empty_slot(), Some(at(0, 1)));

        grid.place(at(0, 1), 1);
        assert_eq!(grid.find_empty_slot(), Some(at(1, 0)));
    }

    #[test]
    fn test_full_grid_has_no_slot() {
        let mut grid = Grid::new(3);
        for row in 0..3 {
            for col in 0..3 {
                grid.place(at(row, col), 1);
            }
        }
        assert!(grid.is_full());
        assert_eq!(grid.find_empty_slot(), None);
    }

    #[test]
    fn test_reach_order_from_center() {
        let grid = Grid::new(3);
        let reach: Vec<Coord> = grid.reach(at(1, 1)).collect();
        // Only step 1 fits on a 3x3 grid from the center
        assert_eq!(
            reach,
            vec![
                at(0, 1),
                at(2, 1),
                at(1, 0),
                at(1, 2),
                at(0, 0),
                at(0, 2),
                at(2, 0),
                at(2, 2),
            ]
        );
    }

    #[test]
    fn test_reach_order_from_corner() {
        let grid = Grid::new(3);
        let reach: Vec<Coord> = grid.reach(at(0, 0)).collect();
        // S (1, 2), E (1, 2), SE (1, 2)
        assert_eq!(
            reach,
            vec![at(1, 0), at(2, 0), at(0, 1), at(0, 2), at(1, 1), at(2, 2)]
        );
    }

    #[test]
    fn test_partner_prefers_earlier_direction() {
        let mut grid = Grid::new(3);
        grid.place(at(1, 1), 2);
        // E at distance 1 and N at distance 1: N comes first
        grid.place(at(1, 2), 2);
        grid.place(at(0, 1), 2);
        assert_eq!(grid.find_fusion_partner(at(1, 1)), Some(at(0, 1)));
    }

    #[test]
    fn test_partner_step_one_before_step_two() {
        let mut grid = Grid::new(3);
        grid.place(at(0, 0), 3);
        grid.place(at(2, 0), 3);
        grid.place(at(1, 0), 3);
        assert_eq!(grid.find_fusion_partner(at(0, 0)), Some(at(1, 0)));
    }

    #[test]
    fn test_partner_distance_two_in_earlier_direction_wins() {
        let mut grid = Grid::new(3);
        grid.place(at(0, 0), 1);
        // S at distance 2 beats E at distance 1
        grid.place(at(2, 0), 1);
        grid.place(at(0, 1), 1);
        grid.place(at(1, 0), 5);
        assert_eq!(grid.find_fusion_partner(at(0, 0)), Some(at(2, 0)));
    }

    #[test]
    fn test_distance_two_skips_over_other_levels() {
        let mut grid = Grid::new(3);
        grid.place(at(0, 0), 4);
        grid.place(at(0, 1), 7);
        grid.place(at(0, 2), 4);
        assert_eq!(grid.find_fusion_partner(at(0, 0)), Some(at(0, 2)));
        assert!(grid.has_valid_moves());
    }

    #[test]
    fn test_knight_offsets_are_out_of_reach() {
        let mut grid = Grid::new(3);
        grid.place(at(0, 0), 1);
        grid.place(at(1, 2), 1);
        grid.place(at(2, 1), 1);
        assert_eq!(grid.find_fusion_partner(at(0, 0)), None);
    }

    #[test]
    fn test_has_valid_moves_distinct_levels() {
        let mut grid = Grid::new(3);
        let mut level = 1;
        for row in 0..3 {
            for col in 0..3 {
                grid.place(at(row, col), level);
                level += 1;
            }
        }
        assert!(!grid.has_valid_moves());
    }

    #[test]
    fn test_clear_reports_occupied_cells() {
        let mut grid = Grid::new(3);
        grid.place(at(2, 1), 1);
        grid.place(at(0, 2), 3);
        assert_eq!(grid.clear(), vec![at(0, 2), at(2, 1)]);
        assert_eq!(grid.unit_count(), 0);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(2);
        grid.place(at(0, 1), 3);
        grid.place(at(1, 0), 10);
        assert_eq!(grid.to_string(), " .  3\n10  .\n");
    }
}
