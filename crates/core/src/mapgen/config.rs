//! Raw option maps and their normalization into a clamped, fully resolved [`Config`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::corridors::CorridorStyle;
use super::profile::{ArenaType, StyleProfile, normalize_keyword};
use super::symmetry::SymmetryMode;

const DEFAULT_SEED: &str = "1";
const MAX_SEED_VALUE: i64 = 999_999;

/// A primitive option value as supplied by a caller, a config file, or a CLI flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Guesses the value type from free text (`true`, `12`, `Quake`).
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed {
            "true" => Self::Flag(true),
            "false" => Self::Flag(false),
            _ => trimmed
                .parse::<f64>()
                .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number),
        }
    }

    fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Flag(_) => None,
        };
        value.filter(|value| value.is_finite())
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Number(_) | Self::Flag(_) => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Mapping from option name to raw value. Names match case-insensitively and ignore
/// punctuation, so `gridWidth`, `grid_width` and `grid-width` are the same option.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOptions {
    values: BTreeMap<String, RawValue>,
}

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<RawValue>) {
        let wanted = normalize_keyword(key);
        self.values.retain(|existing, _| normalize_keyword(existing) != wanted);
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        let wanted = normalize_keyword(key);
        self.values
            .iter()
            .find_map(|(existing, value)| (normalize_keyword(existing) == wanted).then_some(value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn integer(&self, key: &str, default: i64, min: i64, max: i64) -> i64 {
        self.get(key)
            .and_then(RawValue::as_number)
            .map_or(default, |value| value.floor() as i64)
            .clamp(min, max)
    }

    fn real(&self, key: &str, default: f64, min: f64, max: f64) -> f64 {
        self.get(key).and_then(RawValue::as_number).unwrap_or(default).clamp(min, max)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RawValue::as_text)
    }

    fn seed(&self) -> String {
        match self.get("seed") {
            Some(RawValue::Number(value)) if value.is_finite() => {
                (value.floor() as i64).clamp(1, 1000).to_string()
            }
            Some(RawValue::Text(text)) if !text.trim().is_empty() => text.trim().to_string(),
            _ => DEFAULT_SEED.to_string(),
        }
    }

    fn sub_seed(&self, key: &str) -> u32 {
        self.integer(key, 1, 0, MAX_SEED_VALUE) as u32
    }
}

/// Fully resolved generation parameters. Built once per generation call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Config {
    pub seed: String,
    pub arena_type: ArenaType,
    pub profile: StyleProfile,
    pub width: usize,
    pub height: usize,
    pub cell_size: f64,
    pub floors: usize,
    pub rooms: usize,
    pub max_room_size: usize,
    pub room_size_min: usize,
    pub room_size_max: usize,
    pub room_size_seed: u32,
    pub corridor_style: CorridorStyle,
    pub blend_style: CorridorStyle,
    pub corridor_blend: f64,
    pub corridor_padding_min: u32,
    pub corridor_padding_max: u32,
    pub carve_diagonals: bool,
    pub corridor_seed: u32,
    pub loop_factor: f64,
    pub long_room_bias: f64,
    pub rectangularity: f64,
    pub atrium_chance: f64,
    pub elevation_min: f64,
    pub elevation_max: f64,
    pub elevation_step: f64,
    /// Percent chance, `0..=100`, that a room is raised off the base floor.
    pub elevation_chance: f64,
    /// Per-cell probability, `0..=1`.
    pub cover_probability: f64,
    pub cover_seed: u32,
    pub platforms_per_floor: usize,
    pub platform_size_bias: f64,
    pub platform_seed: u32,
    pub platform_thickness: f64,
    pub spawn_amount: usize,
    pub spawn_seed: u32,
    pub symmetry: SymmetryMode,
    pub wall_height: f64,
    pub wall_thickness: f64,
    pub floor_thickness: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_options(&RawOptions::default())
    }
}

impl Config {
    /// Clamps and resolves raw options. Never fails: bad or missing values fall back to
    /// their defaults.
    pub fn from_options(raw: &RawOptions) -> Self {
        let arena_type = raw.text("type").map(ArenaType::from_keyword).unwrap_or_default();
        let profile = arena_type.profile();

        let width = raw.integer("gridWidth", 32, 8, 96) as usize;
        let height = raw.integer("gridHeight", 24, 8, 96) as usize;
        let max_room_size =
            (raw.integer("maxRoomSize", 8, 3, 24) as usize).min(width - 2).min(height - 2);
        let room_size_max =
            (raw.integer("roomSizeMax", max_room_size as i64, 3, 24) as usize).min(max_room_size);
        let room_size_min = (raw.integer("roomSizeMin", 3, 3, 24) as usize).min(room_size_max);

        let base_rooms = raw.integer("rooms", 10, 1, 96) as f64;
        let rooms = ((base_rooms * profile.room_density).round() as i64).clamp(1, 96) as usize;
        let base_platforms = raw.integer("platforms", 0, 0, 20) as f64;
        let platforms_per_floor =
            ((base_platforms * profile.verticality).round() as i64).clamp(0, 20) as usize;

        let elevation_min = raw.real("elevationMin", 0.0, -16.0, 16.0);
        let elevation_max = raw.real("elevationMax", 2.0, -16.0, 16.0).max(elevation_min);
        let elevation_chance =
            (raw.real("elevationChance", 0.0, 0.0, 100.0) * profile.verticality).clamp(0.0, 100.0);

        let default_padding = i64::from(profile.corridor_padding);
        let corridor_padding_min = raw.integer("corridorPaddingMin", default_padding, 0, 4) as u32;
        let corridor_padding_max = (raw.integer("corridorPaddingMax", default_padding, 0, 4)
            as u32)
            .max(corridor_padding_min);
        let corridor_style = raw
            .text("corridorStyle")
            .and_then(CorridorStyle::from_keyword)
            .unwrap_or(profile.corridor_style);

        let cover_probability = (raw.real("coverProbability", 10.0, 0.0, 100.0)
            * 0.01
            * profile.cover_bias)
            .clamp(0.0, 1.0);

        Self {
            seed: raw.seed(),
            arena_type,
            profile,
            width,
            height,
            cell_size: raw.real("cellSize", 4.0, 1.0, 10.0),
            floors: raw.integer("floors", 1, 1, 8) as usize,
            rooms,
            max_room_size,
            room_size_min,
            room_size_max,
            room_size_seed: raw.sub_seed("roomSizeSeed"),
            corridor_style,
            blend_style: profile.blend_style,
            corridor_blend: profile.corridor_blend.clamp(0.0, 1.0),
            corridor_padding_min,
            corridor_padding_max,
            carve_diagonals: profile.carve_diagonals,
            corridor_seed: raw.sub_seed("corridorSeed"),
            loop_factor: profile.loop_factor.max(0.0),
            long_room_bias: profile.long_room_bias.clamp(0.0, 1.0),
            rectangularity: profile.rectangularity.max(1.0),
            atrium_chance: profile.atrium_chance.clamp(0.0, 1.0),
            elevation_min,
            elevation_max,
            elevation_step: raw.real("elevationStep", 0.5, 0.25, 8.0),
            elevation_chance,
            cover_probability,
            cover_seed: raw.sub_seed("coverSeed"),
            platforms_per_floor,
            platform_size_bias: raw.real("platformSizeBias", 1.0, 0.25, 4.0),
            platform_seed: raw.sub_seed("platformSeed"),
            platform_thickness: raw.real("platformThickness", 0.25, 0.25, 10.0),
            spawn_amount: raw.integer("spawnAmount", 0, 0, 64) as usize,
            spawn_seed: raw.sub_seed("spawnSeed"),
            symmetry: raw.text("symmetry").map(SymmetryMode::from_keyword).unwrap_or_default(),
            wall_height: raw.real("wallHeight", 3.0, 1.0, 16.0),
            wall_thickness: raw.real("wallThickness", 0.5, 0.1, 4.0),
            floor_thickness: raw.real("floorThickness", 0.25, 0.1, 4.0),
        }
    }

    /// Vertical distance between consecutive floors.
    pub fn level_spacing(&self) -> f64 {
        self.wall_height
    }
}
