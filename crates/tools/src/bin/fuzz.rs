use std::collections::{BTreeSet, VecDeque};

use anyhow::{Result, ensure};
use arena_core::{
    LayoutGenerator, Level, MIN_SPAWN_SEPARATION, RawOptions, SymmetryMode, generate_layout,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const ARENA_TYPES: [&str; 3] = ["Halo", "Counter Strike 2", "Quake"];
const CORRIDOR_STYLES: [&str; 5] = ["L", "Manhattan", "Bresenham", "Spiral", "Radial"];
const SYMMETRY_MODES: [&str; 5] = ["None", "x", "y", "xy", "bottomright"];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    iterations: u32,
}

fn choose<'a>(rng: &mut ChaCha8Rng, slice: &[&'a str]) -> &'a str {
    slice[rng.next_u64() as usize % slice.len()]
}

fn between(rng: &mut ChaCha8Rng, min: i32, max: i32) -> i32 {
    min + (rng.next_u64() % (max - min + 1) as u64) as i32
}

fn random_options(rng: &mut ChaCha8Rng) -> RawOptions {
    RawOptions::new()
        .with("seed", between(rng, 1, 1000))
        .with("type", choose(rng, &ARENA_TYPES))
        .with("corridorStyle", choose(rng, &CORRIDOR_STYLES))
        .with("symmetry", choose(rng, &SYMMETRY_MODES))
        .with("gridWidth", between(rng, 8, 96))
        .with("gridHeight", between(rng, 8, 96))
        .with("floors", between(rng, 1, 4))
        .with("rooms", between(rng, 1, 40))
        .with("maxRoomSize", between(rng, 3, 24))
        .with("roomSizeMin", between(rng, 3, 12))
        .with("corridorPaddingMax", between(rng, 0, 4))
        .with("elevationChance", between(rng, 0, 100))
        .with("elevationStep", f64::from(between(rng, 1, 8)) * 0.25)
        .with("coverProbability", between(rng, 0, 60))
        .with("platforms", between(rng, 0, 8))
        .with("platformSizeBias", f64::from(between(rng, 1, 16)) * 0.25)
        .with("spawnAmount", between(rng, 0, 24))
}

fn open_cells_connected(level: &Level) -> bool {
    let open = level.grid.open_positions();
    let Some(&start) = open.first() else {
        return false;
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

fn check_level(level: &Level, mirrored: bool) -> Result<()> {
    ensure!(!level.rooms.is_empty(), "level {} has no rooms", level.index);
    if !mirrored {
        ensure!(open_cells_connected(level), "level {} is disconnected", level.index);
    }

    for (index, a) in level.rooms.iter().enumerate() {
        for b in &level.rooms[index + 1..] {
            ensure!(!a.inflated_overlaps(b), "rooms {} and {} touch", a.id, b.id);
        }
    }

    let spawns = level.spawn_positions();
    for (index, a) in spawns.iter().enumerate() {
        for b in &spawns[index + 1..] {
            ensure!(a.chebyshev(*b) >= MIN_SPAWN_SEPARATION, "spawns {a:?} and {b:?} too close");
        }
    }

    for pos in level.grid.positions() {
        let Some(cell) = level.cell(pos) else {
            continue;
        };
        let Some(direction) = cell.ramp_dir else {
            continue;
        };
        let next = level.cell(pos.offset(direction));
        let expected = cell.floor_height() + cell.ramp_rise;
        ensure!(
            cell.ramp_rise > 0.0
                && next.is_some_and(|next| (next.floor_height() - expected).abs() < 1e-9),
            "ramp at {pos:?} does not meet its neighbour"
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    info!(seed = args.seed, iterations = args.iterations, "starting layout fuzz");
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for iteration in 0..args.iterations {
        let options = random_options(&mut rng);
        let layout = generate_layout(&options);
        ensure!(
            layout.fingerprint() == generate_layout(&options).fingerprint(),
            "iteration {iteration}: generation is not deterministic for {options:?}"
        );

        let mirrored =
            LayoutGenerator::from_options(&options).config().symmetry != SymmetryMode::None;
        for level in &layout.levels {
            check_level(level, mirrored).map_err(|error| {
                error.context(format!("iteration {iteration} with options {options:?}"))
            })?;
        }
        debug!(iteration, fingerprint = layout.fingerprint(), "layout passed");
    }

    info!("fuzzing completed successfully");
    Ok(())
}
