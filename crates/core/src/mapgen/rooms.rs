//! Random rectangular room placement with a guaranteed fallback room.

use tracing::debug;

use crate::types::Pos;

use super::config::Config;
use super::grid::Grid;
use super::model::Room;
use super::seed::RngStream;

const ATTEMPTS_PER_ROOM: usize = 12;
const MIN_ROOM_SIDE: usize = 3;
const ATRIUM_EXTRA_SCALE: f64 = 0.6;

/// Places up to `config.rooms` non-overlapping rooms. Position and shape bias draw from
/// `room_rng`; side lengths draw from `size_rng`. Always returns at least one room.
pub(super) fn carve_rooms(
    grid: &mut Grid,
    config: &Config,
    room_rng: &mut RngStream,
    size_rng: &mut RngStream,
) -> Vec<Room> {
    let mut rooms = Vec::with_capacity(config.rooms);
    let attempt_budget = config.rooms * ATTEMPTS_PER_ROOM;

    for _ in 0..attempt_budget {
        if rooms.len() >= config.rooms {
            break;
        }
        let (width_scale, height_scale) = shape_scales(config, room_rng);
        let room_width = sample_side(config, width_scale, grid.width(), size_rng);
        let room_height = sample_side(config, height_scale, grid.height(), size_rng);
        let x = room_rng.range_usize(1, grid.width() - room_width - 1);
        let y = room_rng.range_usize(1, grid.height() - room_height - 1);

        let candidate = Room::new(rooms.len() as u32, x, y, room_width, room_height);
        if !room_fits(grid, &rooms, &candidate) {
            continue;
        }
        paint_room(grid, &candidate);
        rooms.push(candidate);
    }

    if rooms.is_empty() {
        let fallback = fallback_room(grid.width(), grid.height());
        debug!(x = fallback.x, y = fallback.y, "room placement exhausted, carving fallback room");
        paint_room(grid, &fallback);
        rooms.push(fallback);
    }
    top_up_rooms(grid, config, &mut rooms);
    rooms
}

/// Packs minimum-size rooms in row-major order until the target count is met or no
/// position fits. Draws nothing from either stream.
fn top_up_rooms(grid: &mut Grid, config: &Config, rooms: &mut Vec<Room>) {
    let side_x = config.room_size_min.clamp(MIN_ROOM_SIDE, grid.width() - 2);
    let side_y = config.room_size_min.clamp(MIN_ROOM_SIDE, grid.height() - 2);
    let placed_randomly = rooms.len();

    for y in 1..grid.height() - side_y {
        for x in 1..grid.width() - side_x {
            if rooms.len() >= config.rooms {
                break;
            }
            let candidate = Room::new(rooms.len() as u32, x, y, side_x, side_y);
            if room_fits(grid, rooms, &candidate) {
                paint_room(grid, &candidate);
                rooms.push(candidate);
            }
        }
    }

    if rooms.len() > placed_randomly {
        debug!(added = rooms.len() - placed_randomly, "topped up rooms after random placement");
    }
}

/// Per-axis stretch factors: an optional long-room stretch on one axis, overridden by
/// an occasional atrium that scales both.
fn shape_scales(config: &Config, rng: &mut RngStream) -> (f64, f64) {
    let mut scales = (1.0, 1.0);
    if rng.chance(config.long_room_bias) {
        if rng.chance(0.5) {
            scales.0 = config.rectangularity;
        } else {
            scales.1 = config.rectangularity;
        }
    }
    if rng.chance(config.atrium_chance) {
        let scale = 1.0 + rng.next_f64() * ATRIUM_EXTRA_SCALE;
        scales = (scale, scale);
    }
    scales
}

fn sample_side(config: &Config, scale: f64, grid_side: usize, size_rng: &mut RngStream) -> usize {
    let interior = grid_side - 2;
    let upper = ((config.room_size_max as f64 * scale).round() as usize)
        .clamp(MIN_ROOM_SIDE, interior)
        .max(config.room_size_min.min(interior));
    let lower = config.room_size_min.clamp(MIN_ROOM_SIDE, upper);
    size_rng.range_usize(lower, upper)
}

/// The room plus a one-cell ring must lie in bounds and be entirely solid, and its ring
/// may not meet the ring of any placed room.
fn room_fits(grid: &Grid, placed: &[Room], room: &Room) -> bool {
    if placed.iter().any(|other| other.inflated_overlaps(room)) {
        return false;
    }
    let left = room.x as i32 - 1;
    let top = room.y as i32 - 1;
    let right = room.right() as i32 + 1;
    let bottom = room.bottom() as i32 + 1;
    (top..=bottom).all(|y| {
        (left..=right).all(|x| grid.get(Pos { y, x }).is_some_and(|cell| cell.solid))
    })
}

pub(super) fn paint_room(grid: &mut Grid, room: &Room) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            if let Some(cell) = grid.get_mut(Pos { y: y as i32, x: x as i32 }) {
                cell.solid = false;
                cell.room_id = Some(room.id);
            }
        }
    }
}

fn fallback_room(grid_width: usize, grid_height: usize) -> Room {
    let width = (grid_width / 3).clamp(MIN_ROOM_SIDE, grid_width - 2);
    let height = (grid_height / 3).clamp(MIN_ROOM_SIDE, grid_height - 2);
    let x = ((grid_width - width) / 2).max(1);
    let y = ((grid_height - height) / 2).max(1);
    Room::new(0, x, y, width, height)
}
