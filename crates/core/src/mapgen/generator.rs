//! High-level layout orchestration: independent levels, then symmetry, then spawns.

mod pipeline;

use tracing::debug;

use super::config::{Config, RawOptions};
use super::model::{Layout, Level};
use super::seed::StreamLabels;
use super::spawns::{floor_spawn_request, place_spawns};
use super::symmetry::apply_symmetry;

use pipeline::build_level;

pub struct LayoutGenerator {
    config: Config,
}

impl LayoutGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn from_options(raw: &RawOptions) -> Self {
        Self::new(Config::from_options(raw))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Total: every configuration yields a layout with `floors` levels.
    pub fn generate(&self) -> Layout {
        let config = &self.config;
        let mut levels: Vec<Level> =
            (0..config.floors).map(|level_index| build_level(config, level_index)).collect();

        apply_symmetry(&mut levels, config.symmetry);
        distribute_spawns(&mut levels, config);

        Layout {
            cell_size: config.cell_size,
            wall_height: config.wall_height,
            wall_thickness: config.wall_thickness,
            floor_thickness: config.floor_thickness,
            platform_thickness: config.platform_thickness,
            level_spacing: config.level_spacing(),
            levels,
        }
    }
}

/// Spends the global spawn budget floor by floor; a floor that undershoots its request
/// leaves the rest for the floors after it.
fn distribute_spawns(levels: &mut [Level], config: &Config) {
    let mut remaining = config.spawn_amount;
    let floor_count = levels.len();

    for (position, level) in levels.iter_mut().enumerate() {
        if remaining == 0 {
            break;
        }
        let open_cells = level.grid.open_positions().len();
        let request = floor_spawn_request(remaining, floor_count - position, open_cells);
        let labels = StreamLabels { root: &config.seed, level_index: level.index };
        let placed = place_spawns(&mut level.grid, request, &mut labels.spawn(config.spawn_seed));
        remaining = remaining.saturating_sub(placed);
        debug!(level = level.index, request, placed, remaining, "placed spawns");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::mapgen::spawns::MIN_SPAWN_SEPARATION;
    use crate::mapgen::symmetry::SymmetryMode;
    use crate::types::Pos;

    const MIRROR_KEYWORDS: [&str; 8] =
        ["x", "bottom", "y", "right", "xy", "topright", "bottomleft", "bottomright"];

    fn generate(raw: &RawOptions) -> Layout {
        LayoutGenerator::from_options(raw).generate()
    }

    fn open_cells_connected(level: &Level) -> bool {
        let open = level.grid.open_positions();
        let Some(&start) = open.first() else {
            return true;
        };
        let mut frontier = VecDeque::from([start]);
        let mut seen = BTreeSet::from([start]);
        while let Some(pos) = frontier.pop_front() {
            for next in level.grid.neighbors4(pos) {
                if level.grid.is_open(next) && seen.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        seen.len() == open.len()
    }

    fn assert_ramps_consistent(level: &Level) {
        for pos in level.grid.positions() {
            let Some(cell) = level.cell(pos) else {
                continue;
            };
            let Some(direction) = cell.ramp_dir else {
                continue;
            };
            assert!(cell.ramp_rise > 0.0, "flat ramp at {pos:?}");
            let next = level.cell(pos.offset(direction)).expect("ramp points inside the grid");
            assert!(!next.solid);
            let expected = cell.floor_height() + cell.ramp_rise;
            assert!(
                (next.floor_height() - expected).abs() < 1e-9,
                "ramp at {pos:?} rises to {expected} but neighbour sits at {}",
                next.floor_height()
            );
        }
    }

    fn assert_spawns_separated(level: &Level) {
        let spawns = level.spawn_positions();
        for (index, a) in spawns.iter().enumerate() {
            for b in &spawns[index + 1..] {
                assert!(a.chebyshev(*b) >= MIN_SPAWN_SEPARATION, "{a:?} and {b:?} too close");
            }
        }
    }

    #[test]
    fn same_options_produce_byte_identical_layouts() {
        let raw = RawOptions::new()
            .with("seed", "arena")
            .with("floors", 3)
            .with("platforms", 4)
            .with("spawnAmount", 8)
            .with("elevationChance", 60);
        let a = generate(&raw);
        let b = generate(&raw);
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_change_the_layout() {
        let a = generate(&RawOptions::new().with("seed", "alpha"));
        let b = generate(&RawOptions::new().with("seed", "beta"));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn levels_stack_by_wall_height() {
        let layout = generate(&RawOptions::new().with("floors", 3).with("wallHeight", 4));
        assert_eq!(layout.levels.len(), 3);
        for (index, level) in layout.levels.iter().enumerate() {
            assert_eq!(level.index, index);
            assert_eq!(level.elevation, index as f64 * 4.0);
        }
        assert_eq!(layout.level_spacing, 4.0);
    }

    #[test]
    fn spawn_budget_is_shared_across_floors() {
        let raw = RawOptions::new().with("floors", 3).with("spawnAmount", 9).with("seed", 77);
        let layout = generate(&raw);
        let total: usize = layout.levels.iter().map(|level| level.spawn_positions().len()).sum();
        assert!(total <= 9);
        assert!(total >= 3, "each floor has room for at least one spawn");
        for level in &layout.levels {
            assert_spawns_separated(level);
        }
    }

    #[test]
    fn platform_ids_match_platform_count() {
        let raw = RawOptions::new().with("platforms", 5).with("seed", "plat");
        let layout = generate(&raw);
        for level in &layout.levels {
            let ids: BTreeSet<u32> =
                level.grid.cells().iter().filter_map(|cell| cell.platform_id).collect();
            assert_eq!(ids.len(), level.platform_count);
            assert!(ids.iter().all(|&id| (id as usize) < level.platform_count));
        }
    }

    #[test]
    fn symmetric_layouts_mirror_solidity() {
        let raw = RawOptions::new().with("symmetry", "both").with("seed", "mirror");
        let layout = generate(&raw);
        let level = &layout.levels[0];
        let (w, h) = (level.width as i32, level.height as i32);
        for pos in level.grid.positions() {
            let mirrored = Pos { y: h - 1 - pos.y, x: w - 1 - pos.x };
            assert_eq!(level.grid.is_open(pos), level.grid.is_open(mirrored));
        }
        assert_ramps_consistent(level);
    }

    #[test]
    fn outer_ring_stays_solid() {
        for arena in ["Halo", "CS2", "Quake"] {
            let layout = generate(&RawOptions::new().with("type", arena).with("floors", 2));
            for level in &layout.levels {
                for pos in level.grid.open_positions() {
                    assert!(level.grid.in_interior(pos), "{arena} opened {pos:?}");
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn generated_levels_hold_layout_invariants(
            seed in 1_i32..=1000,
            arena in 0_usize..3,
            style in 0_usize..5,
            rooms in 1_i32..=24,
            width in 12_i32..=64,
            height in 12_i32..=48,
            elevation_chance in 0_i32..=100,
            spawn_amount in 0_i32..=12,
        ) {
            let raw = RawOptions::new()
                .with("seed", seed)
                .with("type", ["Halo", "CS2", "Quake"][arena])
                .with("corridorStyle", ["L", "Manhattan", "Bresenham", "Spiral", "Radial"][style])
                .with("rooms", rooms)
                .with("gridWidth", width)
                .with("gridHeight", height)
                .with("elevationChance", elevation_chance)
                .with("platforms", 2)
                .with("spawnAmount", spawn_amount);
            let layout = generate(&raw);
            prop_assert_eq!(layout.fingerprint(), generate(&raw).fingerprint());

            for level in &layout.levels {
                prop_assert!(!level.rooms.is_empty());
                prop_assert!(open_cells_connected(level), "seed={} disconnected", seed);
                for (index, a) in level.rooms.iter().enumerate() {
                    for b in &level.rooms[index + 1..] {
                        prop_assert!(!a.inflated_overlaps(b));
                    }
                }
                assert_ramps_consistent(level);
                assert_spawns_separated(level);
            }
        }

        #[test]
        fn mirroring_generated_levels_again_changes_nothing(
            seed in 1_i32..=1000,
            arena in 0_usize..3,
            mode in 0_usize..8,
            width in 12_i32..=48,
            height in 12_i32..=40,
        ) {
            let keyword = MIRROR_KEYWORDS[mode];
            let raw = RawOptions::new()
                .with("seed", seed)
                .with("type", ["Halo", "CS2", "Quake"][arena])
                .with("symmetry", keyword)
                .with("gridWidth", width)
                .with("gridHeight", height)
                .with("floors", 2);
            let mut layout = generate(&raw);
            let before = layout.clone();
            apply_symmetry(&mut layout.levels, SymmetryMode::from_keyword(keyword));
            prop_assert_eq!(layout, before);
        }
    }
}
