//! Procedural arena layout generation split into coherent submodules.

pub mod config;
pub mod corridors;
pub mod model;
pub mod profile;
pub mod seed;
pub mod symmetry;

mod connect;
mod cover;
mod elevation;
mod generator;
mod grid;
mod platforms;
mod rooms;
mod spawns;

pub use config::{Config, RawOptions, RawValue};
pub use corridors::CorridorStyle;
pub use generator::LayoutGenerator;
pub use grid::Grid;
pub use model::{Cell, Layout, Level, Room};
pub use profile::{ArenaType, StyleProfile};
pub use seed::{RngStream, create_stream};
pub use spawns::MIN_SPAWN_SEPARATION;
pub use symmetry::{SymmetryMode, apply_symmetry};

/// Resolves `raw` into a [`Config`] and generates every level. Never fails.
pub fn generate_layout(raw: &RawOptions) -> Layout {
    LayoutGenerator::from_options(raw).generate()
}
