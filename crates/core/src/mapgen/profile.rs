//! Arena style profiles and the generation biases each one applies.

use serde::Serialize;

use super::corridors::CorridorStyle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ArenaType {
    #[default]
    Halo,
    CounterStrike2,
    Quake,
}

impl ArenaType {
    /// Resolves a user-facing type name, falling back to the default profile.
    pub fn from_keyword(raw: &str) -> Self {
        match normalize_keyword(raw).as_str() {
            "halo" => Self::Halo,
            "counterstrike2" | "cs2" | "counterstrike" => Self::CounterStrike2,
            "quake" => Self::Quake,
            _ => Self::default(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Halo => "Halo",
            Self::CounterStrike2 => "Counter Strike 2",
            Self::Quake => "Quake",
        }
    }

    pub fn profile(self) -> StyleProfile {
        match self {
            Self::Halo => StyleProfile {
                room_density: 1.0,
                verticality: 1.3,
                loop_factor: 1.2,
                cover_bias: 1.15,
                corridor_style: CorridorStyle::L,
                blend_style: CorridorStyle::Spiral,
                corridor_blend: 0.3,
                corridor_padding: 1,
                carve_diagonals: false,
                long_room_bias: 0.45,
                rectangularity: 1.25,
                atrium_chance: 0.0,
            },
            Self::CounterStrike2 => StyleProfile {
                room_density: 0.9,
                verticality: 0.75,
                loop_factor: 0.7,
                cover_bias: 1.45,
                corridor_style: CorridorStyle::Manhattan,
                blend_style: CorridorStyle::L,
                corridor_blend: 0.8,
                corridor_padding: 1,
                carve_diagonals: false,
                long_room_bias: 0.7,
                rectangularity: 1.6,
                atrium_chance: 0.0,
            },
            Self::Quake => StyleProfile {
                room_density: 1.25,
                verticality: 1.6,
                loop_factor: 1.5,
                cover_bias: 0.75,
                corridor_style: CorridorStyle::Bresenham,
                blend_style: CorridorStyle::Radial,
                corridor_blend: 0.7,
                corridor_padding: 2,
                carve_diagonals: true,
                long_room_bias: 0.35,
                rectangularity: 1.15,
                atrium_chance: 0.2,
            },
        }
    }
}

/// Multiplicative and categorical biases attached to an [`ArenaType`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StyleProfile {
    pub room_density: f64,
    pub verticality: f64,
    pub loop_factor: f64,
    pub cover_bias: f64,
    /// Default corridor style when the caller does not pick one.
    pub corridor_style: CorridorStyle,
    pub blend_style: CorridorStyle,
    pub corridor_blend: f64,
    pub corridor_padding: u32,
    pub carve_diagonals: bool,
    pub long_room_bias: f64,
    pub rectangularity: f64,
    pub atrium_chance: f64,
}

/// Lowercases and strips everything but ASCII alphanumerics.
pub(super) fn normalize_keyword(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase()).collect()
}
