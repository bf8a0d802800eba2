//! Room height offsets, corridor height interpolation, and ramp resolution.

use crate::types::{Direction4, Pos};

use super::config::Config;
use super::grid::Grid;
use super::model::Room;
use super::seed::RngStream;

const HEIGHT_EPSILON: f64 = 1e-9;

/// Gives each room a quantized height from `[elevation_min, elevation_max]` when its
/// `elevation_chance` gate passes, otherwise zero, and paints it onto the footprint.
pub(super) fn assign_room_elevations(
    grid: &mut Grid,
    rooms: &mut [Room],
    config: &Config,
    rng: &mut RngStream,
) {
    let span = config.elevation_max - config.elevation_min;
    let steps = (span / config.elevation_step + HEIGHT_EPSILON).floor().max(0.0) as i32;

    for room in rooms.iter_mut() {
        let raised = rng.next_f64() * 100.0 < config.elevation_chance;
        room.elevation = if raised {
            config.elevation_min + f64::from(rng.range_i32(0, steps)) * config.elevation_step
        } else {
            0.0
        };

        for y in room.y..=room.bottom() {
            for x in room.x..=room.right() {
                if let Some(cell) = grid.get_mut(Pos { y: y as i32, x: x as i32 }) {
                    cell.elevation = Some(room.elevation);
                }
            }
        }
    }
}

/// Heights for each cell of a corridor walk. Cells owned by a room keep the room's
/// height; the remaining cells are linearly interpolated from `start` to `end` between
/// the first and last of them.
pub(super) fn interpolate_corridor(grid: &Grid, walk: &[Pos], start: f64, end: f64) -> Vec<f64> {
    let owned: Vec<Option<f64>> = walk
        .iter()
        .map(|&pos| {
            grid.get(pos)
                .filter(|cell| cell.room_id.is_some())
                .map(|cell| cell.elevation.unwrap_or(0.0))
        })
        .collect();
    let first = owned.iter().position(Option::is_none);
    let last = owned.iter().rposition(Option::is_none);

    owned
        .iter()
        .enumerate()
        .map(|(index, room_height)| {
            if let Some(height) = room_height {
                return *height;
            }
            match (first, last) {
                (Some(first), Some(last)) if last > first => {
                    let t = (index - first) as f64 / (last - first) as f64;
                    start + (end - start) * t
                }
                _ => (start + end) * 0.5,
            }
        })
        .collect()
}

/// Records ramps along consecutive corridor cells whose heights differ. The ramp sits on
/// the lower cell and points at the higher one. A cell that already carries a ramp in
/// another direction keeps its first one.
pub(super) fn resolve_ramps(grid: &mut Grid, walks: &[Vec<Pos>]) {
    for walk in walks {
        for pair in walk.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(cell_a), Some(cell_b)) = (grid.get(a), grid.get(b)) else {
                continue;
            };
            if cell_a.solid || cell_b.solid || cell_a.room_id.is_some() || cell_b.room_id.is_some()
            {
                continue;
            }
            let height_a = cell_a.floor_height();
            let height_b = cell_b.floor_height();
            if (height_a - height_b).abs() <= HEIGHT_EPSILON {
                continue;
            }

            let (lower, higher) = if height_a < height_b { (a, b) } else { (b, a) };
            let rise = (height_a - height_b).abs();
            let Some(direction) = Direction4::between(lower, higher) else {
                continue;
            };
            let Some(cell) = grid.get_mut(lower) else {
                continue;
            };
            match cell.ramp_dir {
                Some(existing) if existing != direction => {}
                _ => {
                    cell.ramp_dir = Some(direction);
                    cell.ramp_rise = rise;
                }
            }
        }
    }
}

/// Gives every open cell without a height the base height of zero.
pub(super) fn finalize_elevations(grid: &mut Grid) {
    for pos in grid.positions() {
        if let Some(cell) = grid.get_mut(pos) {
            if !cell.solid && cell.elevation.is_none() {
                cell.elevation = Some(0.0);
            }
        }
    }
}

/// Removes ramps that no longer lead up to a neighbour exactly `ramp_rise` higher.
pub(super) fn prune_inconsistent_ramps(grid: &mut Grid) {
    let broken: Vec<Pos> = grid
        .positions()
        .filter(|&pos| {
            let Some(cell) = grid.get(pos) else {
                return false;
            };
            let Some(direction) = cell.ramp_dir else {
                return false;
            };
            let target = grid.get(pos.offset(direction));
            let consistent = !cell.solid
                && cell.ramp_rise > HEIGHT_EPSILON
                && target.is_some_and(|next| {
                    !next.solid
                        && (next.floor_height() - (cell.floor_height() + cell.ramp_rise)).abs()
                            <= HEIGHT_EPSILON
                });
            !consistent
        })
        .collect();

    for pos in broken {
        if let Some(cell) = grid.get_mut(pos) {
            cell.ramp_dir = None;
            cell.ramp_rise = 0.0;
        }
    }
}
