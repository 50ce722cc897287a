use glam::IVec2;

use crate::grid::Grid;

/// Whether every occupied cell in column `col` has support.
///
/// Scans from the bottom row up. The bottom row rests on the floor; any
/// other occupied cell with an empty cell directly below it is a floating
/// gap and makes the column unstable. A grain may only lock into a stable
/// column, so a collapsing stack keeps falling instead of freezing mid-air.
pub fn column_stable(grid: &Grid, col: i32) -> bool {
    let rows = grid.rows() as i32;
    if col < 0 || col as u32 >= grid.cols() || rows < 2 {
        return true;
    }
    (0..rows - 1).rev().all(|row| {
        let cell = IVec2::new(col, row);
        !grid.is_occupied(cell) || grid.is_occupied(cell + IVec2::Y)
    })
}
