//! Room connector: greedy nearest-neighbour spanning corridors plus bonus loops.

use tracing::trace;

use crate::types::Pos;

use super::config::Config;
use super::corridors::{CorridorStyle, dedupe_path, stitch_diagonals};
use super::elevation::interpolate_corridor;
use super::grid::Grid;
use super::model::Room;
use super::seed::{RngStream, StreamLabels};

const LOOP_BUDGET_SCALE: f64 = 0.15;

/// A carved corridor. `walk` is the 4-connected centre line in carve order.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct Corridor {
    pub(super) from_room: u32,
    pub(super) to_room: u32,
    pub(super) style: CorridorStyle,
    pub(super) padding: u32,
    pub(super) walk: Vec<Pos>,
}

pub(super) struct ConnectContext<'a> {
    pub(super) grid: &'a mut Grid,
    pub(super) rooms: &'a [Room],
    pub(super) config: &'a Config,
    pub(super) labels: StreamLabels<'a>,
}

/// Links every room into one tree by repeatedly joining the closest (connected,
/// unconnected) pair of centres, then adds `round(rooms * loop_factor * 0.15)` random
/// loop corridors. Corridors are carved into the grid as they are produced.
pub(super) fn connect_rooms(
    context: &mut ConnectContext<'_>,
    rng: &mut RngStream,
) -> Vec<Corridor> {
    let room_count = context.rooms.len();
    if room_count < 2 {
        return Vec::new();
    }

    let mut corridors = Vec::with_capacity(room_count * 2);
    let mut connected = vec![0_usize];
    let mut remaining: Vec<usize> = (1..room_count).collect();

    while !remaining.is_empty() {
        let mut best: Option<(usize, usize, i64)> = None;
        for &source in &connected {
            for (slot, &target) in remaining.iter().enumerate() {
                let distance =
                    context.rooms[source].center.squared_distance(context.rooms[target].center);
                if best.is_none_or(|(_, _, best_distance)| distance < best_distance) {
                    best = Some((source, slot, distance));
                }
            }
        }
        let Some((source, slot, _)) = best else {
            break;
        };
        let target = remaining.remove(slot);
        let corridor_index = corridors.len();
        let corridor = carve_corridor(context, source, target, corridor_index, rng);
        trace_corridor(corridor_index, &corridor);
        corridors.push(corridor);
        connected.push(target);
    }

    let loop_budget =
        (room_count as f64 * context.config.loop_factor * LOOP_BUDGET_SCALE).round() as usize;
    for loop_index in 0..loop_budget {
        let a = rng.index(room_count);
        let b = rng.index(room_count);
        if a == b {
            continue;
        }
        let corridor_index = room_count - 1 + loop_index;
        let corridor = carve_corridor(context, a, b, corridor_index, rng);
        trace_corridor(corridor_index, &corridor);
        corridors.push(corridor);
    }

    corridors
}

fn trace_corridor(corridor_index: usize, corridor: &Corridor) {
    trace!(
        corridor_index,
        from = corridor.from_room,
        to = corridor.to_room,
        style = corridor.style.label(),
        padding = corridor.padding,
        cells = corridor.walk.len(),
        "carved corridor"
    );
}

fn pick_style(config: &Config, rng: &mut RngStream) -> CorridorStyle {
    if config.blend_style != config.corridor_style && rng.chance(config.corridor_blend) {
        config.blend_style
    } else {
        config.corridor_style
    }
}

/// Resolves the walk between two room centres, clamped to the interior, and carves it
/// with its padding footprint. Padding cells take the height of the walk cell they grew
/// from; walk cells are written last so they win over neighbouring padding.
fn carve_corridor(
    context: &mut ConnectContext<'_>,
    from_index: usize,
    to_index: usize,
    corridor_index: usize,
    rng: &mut RngStream,
) -> Corridor {
    let from = context.rooms[from_index];
    let to = context.rooms[to_index];
    let style = pick_style(context.config, rng);

    let raw = style.path(from.center, to.center, rng);
    let clamped =
        dedupe_path(raw.into_iter().map(|pos| context.grid.clamp_to_interior(pos)).collect());
    let walk = stitch_diagonals(&clamped);

    let config = context.config;
    let mut padding_rng =
        context.labels.padding(config.corridor_seed, from.center, to.center, corridor_index);
    let padding = padding_rng.range_i32(
        config.corridor_padding_min as i32,
        config.corridor_padding_max as i32,
    ) as u32;

    let heights = interpolate_corridor(context.grid, &walk, from.elevation, to.elevation);
    let footprint = padding_offsets(padding, config.carve_diagonals);
    for (&pos, &height) in walk.iter().zip(&heights) {
        for &(dx, dy) in &footprint {
            let cell_pos = Pos { y: pos.y + dy, x: pos.x + dx };
            if context.grid.in_interior(cell_pos) {
                open_corridor_cell(context.grid, cell_pos, height);
            }
        }
    }
    for (&pos, &height) in walk.iter().zip(&heights) {
        open_corridor_cell(context.grid, pos, height);
    }

    Corridor { from_room: from.id, to_room: to.id, style, padding, walk }
}

fn open_corridor_cell(grid: &mut Grid, pos: Pos, height: f64) {
    if let Some(cell) = grid.get_mut(pos) {
        cell.solid = false;
        if cell.room_id.is_none() {
            cell.elevation = Some(height);
        }
    }
}

/// `(dx, dy)` offsets of the padding footprint: a plus of arms `radius` long, or with
/// `diagonals` the full square of that radius so diagonal cells stay 4-connected.
fn padding_offsets(radius: u32, diagonals: bool) -> Vec<(i32, i32)> {
    let radius = radius as i32;
    let mut offsets = Vec::new();
    for step in 1..=radius {
        offsets.extend([(step, 0), (-step, 0), (0, step), (0, -step)]);
    }
    if diagonals {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx != 0 && dy != 0 {
                    offsets.push((dx, dy));
                }
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use super::*;
    use crate::mapgen::config::RawOptions;
    use crate::mapgen::rooms::paint_room;
    use crate::mapgen::seed::create_stream;

    fn rooms_on(grid: &mut Grid, rooms: &[Room]) {
        for room in rooms {
            paint_room(grid, room);
        }
    }

    fn connect(config: &Config, grid: &mut Grid, rooms: &[Room], label: &str) -> Vec<Corridor> {
        let labels = StreamLabels { root: label, level_index: 0 };
        let mut context = ConnectContext { grid, rooms, config, labels };
        connect_rooms(&mut context, &mut create_stream(label))
    }

    fn reachable(grid: &Grid, start: Pos) -> BTreeSet<Pos> {
        let mut open = VecDeque::from([start]);
        let mut seen = BTreeSet::from([start]);
        while let Some(pos) = open.pop_front() {
            for next in grid.neighbors4(pos) {
                if grid.is_open(next) && seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen
    }

    fn scattered_rooms() -> Vec<Room> {
        vec![
            Room::new(0, 2, 2, 4, 4),
            Room::new(1, 24, 3, 5, 4),
            Room::new(2, 4, 16, 6, 5),
            Room::new(3, 22, 15, 4, 6),
            Room::new(4, 13, 9, 4, 4),
        ]
    }

    #[test]
    fn single_room_needs_no_corridors() {
        let config = Config::default();
        let mut grid = Grid::new(8, 8);
        let rooms = [Room::new(0, 2, 2, 4, 4)];
        rooms_on(&mut grid, &rooms);
        let before = grid.clone();
        assert!(connect(&config, &mut grid, &rooms, "solo").is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn every_room_joins_one_component() {
        for style in CorridorStyle::ALL {
            let raw = RawOptions::new().with("corridorStyle", style.label());
            let config = Config::from_options(&raw);
            let mut grid = Grid::new(32, 24);
            let rooms = scattered_rooms();
            rooms_on(&mut grid, &rooms);
            connect(&config, &mut grid, &rooms, style.label());

            let component = reachable(&grid, rooms[0].center);
            for room in &rooms {
                assert!(component.contains(&room.center), "{style:?} left {room:?} isolated");
            }
            assert_eq!(component.len(), grid.open_positions().len());
        }
    }

    #[test]
    fn spanning_tree_links_nearest_pair_first() {
        let config = Config::from_options(&RawOptions::new().with("type", "CS2"));
        let mut grid = Grid::new(32, 24);
        let rooms = scattered_rooms();
        rooms_on(&mut grid, &rooms);
        let corridors = connect(&config, &mut grid, &rooms, "tree");

        let tree: Vec<(u32, u32)> =
            corridors.iter().take(rooms.len() - 1).map(|c| (c.from_room, c.to_room)).collect();
        assert_eq!(tree[0], (0, 4));
        let targets: BTreeSet<u32> = tree.iter().map(|&(_, to)| to).collect();
        assert_eq!(targets, BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn corridors_never_open_the_outer_ring() {
        let raw = RawOptions::new().with("type", "Quake").with("corridorPaddingMax", 4);
        let config = Config::from_options(&raw);
        let mut grid = Grid::new(32, 24);
        let rooms = scattered_rooms();
        rooms_on(&mut grid, &rooms);
        connect(&config, &mut grid, &rooms, "ring");
        for pos in grid.open_positions() {
            assert!(grid.in_interior(pos), "{pos:?} opened on the boundary");
        }
    }

    #[test]
    fn padding_is_stable_for_identical_corridors() {
        let config = Config::from_options(
            &RawOptions::new().with("corridorPaddingMin", 0).with("corridorPaddingMax", 3),
        );
        let rooms = scattered_rooms();
        let mut first = Grid::new(32, 24);
        let mut second = Grid::new(32, 24);
        rooms_on(&mut first, &rooms);
        rooms_on(&mut second, &rooms);
        let a = connect(&config, &mut first, &rooms, "pad");
        let b = connect(&config, &mut second, &rooms, "pad");
        assert_eq!(a, b);
        assert_eq!(first, second);
        assert!(a.iter().all(|corridor| corridor.padding <= 3));
    }

    #[test]
    fn room_cells_keep_their_own_height() {
        let config = Config::default();
        let mut grid = Grid::new(32, 24);
        let mut rooms = scattered_rooms();
        rooms[1].elevation = 2.0;
        rooms_on(&mut grid, &rooms);
        for pos in grid.open_positions() {
            let room_id = grid.get(pos).and_then(|cell| cell.room_id);
            let height = room_id.map(|id| rooms[id as usize].elevation);
            if let Some(cell) = grid.get_mut(pos) {
                cell.elevation = height;
            }
        }
        connect(&config, &mut grid, &rooms, "heights");
        for pos in grid.open_positions() {
            let cell = grid.get(pos).expect("in bounds");
            if let Some(id) = cell.room_id {
                assert_eq!(cell.elevation, Some(rooms[id as usize].elevation));
            } else {
                let height = cell.elevation.expect("corridor cells carry a height");
                assert!((0.0..=2.0).contains(&height));
            }
        }
    }

    #[test]
    fn padding_footprint_shapes() {
        assert_eq!(padding_offsets(0, true).len(), 0);
        assert_eq!(padding_offsets(1, false).len(), 4);
        assert_eq!(padding_offsets(1, true).len(), 8);
        assert_eq!(padding_offsets(2, true).len(), 24);
    }
}
