//! Per-level construction pipeline that composes the mapgen stages in order.

use tracing::debug;

use crate::types::Pos;

use super::super::config::Config;
use super::super::connect::{ConnectContext, connect_rooms};
use super::super::cover::sprinkle_cover;
use super::super::elevation::{assign_room_elevations, finalize_elevations, resolve_ramps};
use super::super::grid::Grid;
use super::super::model::Level;
use super::super::platforms::{PlatformContext, build_platforms};
use super::super::rooms::carve_rooms;
use super::super::seed::StreamLabels;

/// Builds one level from its own streams: rooms, room heights, corridors, ramps, cover,
/// then platforms. Spawns and symmetry are applied across all levels afterwards.
pub(super) fn build_level(config: &Config, level_index: usize) -> Level {
    let labels = StreamLabels { root: &config.seed, level_index };
    let mut grid = Grid::new(config.width, config.height);

    let mut rooms = carve_rooms(
        &mut grid,
        config,
        &mut labels.layout(),
        &mut labels.room_size(config.room_size_seed),
    );
    assign_room_elevations(&mut grid, &mut rooms, config, &mut labels.elevation());

    let corridors = connect_rooms(
        &mut ConnectContext { grid: &mut grid, rooms: &rooms, config, labels },
        &mut labels.corridor(config.corridor_seed),
    );
    let walks: Vec<Vec<Pos>> = corridors.into_iter().map(|corridor| corridor.walk).collect();
    finalize_elevations(&mut grid);
    resolve_ramps(&mut grid, &walks);

    let cover_cells =
        sprinkle_cover(&mut grid, config.cover_probability, &mut labels.cover(config.cover_seed));
    let platform_count = build_platforms(
        &mut PlatformContext {
            grid: &mut grid,
            target_platforms: config.platforms_per_floor,
            max_room_size: config.max_room_size,
            size_bias: config.platform_size_bias,
        },
        &mut labels.platform(config.platform_seed),
    );

    debug!(
        level = level_index,
        rooms = rooms.len(),
        corridors = walks.len(),
        cover_cells,
        platforms = platform_count,
        "built level"
    );

    Level {
        index: level_index,
        elevation: level_index as f64 * config.level_spacing(),
        width: config.width,
        height: config.height,
        grid,
        rooms,
        platform_count,
    }
}
