//! Low cover scattered over open floor.

use super::grid::Grid;
use super::seed::RngStream;

/// Flags each open, ramp-free cell as cover with `probability`, in row-major order.
/// Returns the number of cover cells.
pub(super) fn sprinkle_cover(grid: &mut Grid, probability: f64, rng: &mut RngStream) -> usize {
    let mut placed = 0;
    for pos in grid.positions() {
        let Some(cell) = grid.get_mut(pos) else {
            continue;
        };
        if cell.solid || cell.has_ramp() {
            continue;
        }
        cell.cover = rng.chance(probability);
        placed += usize::from(cell.cover);
    }
    placed
}
