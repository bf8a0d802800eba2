//! Player spawn placement with a minimum Chebyshev separation.

use crate::types::Pos;

use super::grid::Grid;
use super::seed::RngStream;

pub const MIN_SPAWN_SEPARATION: u32 = 5;

/// Marks up to `desired` shuffled open cells as spawns, skipping any closer than
/// [`MIN_SPAWN_SEPARATION`] to a spawn already chosen. Spawn cells lose their cover.
/// Returns how many were placed.
pub(super) fn place_spawns(grid: &mut Grid, desired: usize, rng: &mut RngStream) -> usize {
    if desired == 0 {
        return 0;
    }
    let mut candidates = grid.open_positions();
    rng.shuffle(&mut candidates);

    let mut chosen: Vec<Pos> = Vec::with_capacity(desired);
    for pos in candidates {
        if chosen.len() >= desired {
            break;
        }
        if chosen.iter().any(|&other| other.chebyshev(pos) < MIN_SPAWN_SEPARATION) {
            continue;
        }
        chosen.push(pos);
    }

    for &pos in &chosen {
        if let Some(cell) = grid.get_mut(pos) {
            cell.spawn = true;
            cell.cover = false;
        }
    }
    chosen.len()
}

/// Share of the remaining spawn budget requested from one floor: an even split over the
/// floors still to be filled, capped by the floor's open cell count.
pub(super) fn floor_spawn_request(
    remaining: usize,
    floors_left: usize,
    open_cells: usize,
) -> usize {
    if floors_left == 0 {
        return 0;
    }
    remaining.div_ceil(floors_left).min(open_cells)
}
