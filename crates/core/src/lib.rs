pub mod mapgen;
pub mod types;

pub use mapgen::{
    ArenaType, Cell, Config, CorridorStyle, Grid, Layout, LayoutGenerator, Level,
    MIN_SPAWN_SEPARATION, RawOptions, RawValue, RngStream, Room, StyleProfile, SymmetryMode,
    generate_layout,
};
pub use types::*;
