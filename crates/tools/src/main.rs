use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arena_core::{Cell, Direction4, Layout, LayoutGenerator, Level, RawOptions, RawValue};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Option file to start from (`.toml` or `.json`)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Option override as `key=value`; may be repeated
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
    /// Print the generated layout as JSON instead of an ASCII map
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => RawOptions::new(),
    };
    for entry in &args.overrides {
        let (key, value) = parse_override(entry)?;
        options.set(key, value);
    }

    let generator = LayoutGenerator::from_options(&options);
    info!(seed = %generator.config().seed, floors = generator.config().floors, "generating layout");
    let layout = generator.generate();

    if args.json {
        let json =
            serde_json::to_string_pretty(&layout).context("Failed to serialize layout JSON")?;
        println!("{json}");
    } else {
        for level in &layout.levels {
            println!("level {} (elevation {})", level.index, level.elevation);
            println!("{}", render_level(level));
        }
        println!("{}", summary_line(&layout));
    }

    Ok(())
}

fn load_options(path: &Path) -> Result<RawOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("toml") => toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
        Some("json") => RawOptions::from_json(&text)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
        other => bail!("Unsupported config extension {other:?} for {}", path.display()),
    }
}

fn parse_override(entry: &str) -> Result<(&str, RawValue)> {
    let Some((key, value)) = entry.split_once('=') else {
        bail!("Override must look like key=value, got {entry:?}");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Override key is empty in {entry:?}");
    }
    Ok((key, RawValue::infer(value)))
}

fn cell_glyph(cell: &Cell) -> char {
    if cell.solid {
        return '#';
    }
    if cell.spawn {
        return 'S';
    }
    if let Some(direction) = cell.ramp_dir {
        return match direction {
            Direction4::North => '^',
            Direction4::East => '>',
            Direction4::South => 'v',
            Direction4::West => '<',
        };
    }
    if cell.platform_id.is_some() {
        return 'p';
    }
    if cell.cover {
        return 'c';
    }
    '.'
}

fn render_level(level: &Level) -> String {
    let width = level.grid.width();
    let mut out = String::with_capacity((width + 1) * level.grid.height());
    for (index, cell) in level.grid.cells().iter().enumerate() {
        if index > 0 && index % width == 0 {
            out.push('\n');
        }
        out.push(cell_glyph(cell));
    }
    out
}

fn summary_line(layout: &Layout) -> String {
    let rooms: usize = layout.levels.iter().map(|level| level.rooms.len()).sum();
    let platforms: usize = layout.levels.iter().map(|level| level.platform_count).sum();
    let spawns: usize = layout.levels.iter().map(|level| level.spawn_positions().len()).sum();
    let ramps: usize = layout
        .levels
        .iter()
        .map(|level| level.grid.cells().iter().filter(|cell| cell.has_ramp()).count())
        .sum();
    let levels = layout.levels.len();
    let fingerprint = layout.fingerprint();
    format!(
        "levels={levels} rooms={rooms} platforms={platforms} spawns={spawns} ramps={ramps} \
         fingerprint={fingerprint:016x}"
    )
}
