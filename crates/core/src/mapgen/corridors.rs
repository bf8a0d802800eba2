//! Corridor path strategies producing grid-cell sequences between two points.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::Pos;

use super::profile::normalize_keyword;
use super::seed::RngStream;

const SPIRAL_WAYPOINT_STRIDE: usize = 3;
const SPIRAL_MAX_RADIUS: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CorridorStyle {
    L,
    Manhattan,
    Bresenham,
    Spiral,
    Radial,
}

impl CorridorStyle {
    pub const ALL: [Self; 5] =
        [Self::L, Self::Manhattan, Self::Bresenham, Self::Spiral, Self::Radial];

    pub fn from_keyword(raw: &str) -> Option<Self> {
        match normalize_keyword(raw).as_str() {
            "l" | "lshaped" => Some(Self::L),
            "manhattan" => Some(Self::Manhattan),
            "bresenham" | "line" => Some(Self::Bresenham),
            "spiral" => Some(Self::Spiral),
            "radial" | "hub" => Some(Self::Radial),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::Manhattan => "Manhattan",
            Self::Bresenham => "Bresenham",
            Self::Spiral => "Spiral",
            Self::Radial => "Radial",
        }
    }

    /// Cell sequence from `from` to `to`, both inclusive, with no two consecutive
    /// entries equal.
    pub fn path(self, from: Pos, to: Pos, rng: &mut RngStream) -> Vec<Pos> {
        match self {
            Self::L => l_path(from, to, rng),
            Self::Manhattan => manhattan_path(from, to, rng),
            Self::Bresenham => bresenham_path(from, to),
            Self::Spiral => spiral_path(from, to, rng),
            Self::Radial => radial_path(from, to, rng),
        }
    }
}

fn l_path(from: Pos, to: Pos, rng: &mut RngStream) -> Vec<Pos> {
    let mut path = vec![from];
    if rng.chance(0.5) {
        walk_axis(&mut path, true, from.x, to.x, from.y);
        walk_axis(&mut path, false, from.y, to.y, to.x);
    } else {
        walk_axis(&mut path, false, from.y, to.y, from.x);
        walk_axis(&mut path, true, from.x, to.x, to.y);
    }
    dedupe_path(path)
}

fn walk_axis(path: &mut Vec<Pos>, horizontal: bool, from_value: i32, to_value: i32, fixed: i32) {
    let step = (to_value - from_value).signum();
    if step == 0 {
        return;
    }
    let mut value = from_value;
    while value != to_value {
        value += step;
        path.push(if horizontal { Pos { y: fixed, x: value } } else { Pos { y: value, x: fixed } });
    }
}

fn manhattan_path(from: Pos, to: Pos, rng: &mut RngStream) -> Vec<Pos> {
    let mut path = vec![from];
    let mut current = from;
    while current != to {
        let dx = to.x - current.x;
        let dy = to.y - current.y;
        let take_horizontal = match dx.abs().cmp(&dy.abs()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => rng.chance(0.5),
        };
        if take_horizontal && dx != 0 {
            current.x += dx.signum();
        } else if dy != 0 {
            current.y += dy.signum();
        } else {
            current.x += dx.signum();
        }
        path.push(current);
    }
    path
}

fn bresenham_path(from: Pos, to: Pos) -> Vec<Pos> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;
    let mut current = from;
    let mut path = Vec::with_capacity((dx.max(dy) + 1) as usize);

    loop {
        path.push(current);
        if current == to {
            break;
        }
        let doubled = err * 2;
        if doubled > -dy {
            err -= dy;
            current.x += sx;
        }
        if doubled < dx {
            err += dx;
            current.y += sy;
        }
    }
    path
}

/// Manhattan walk with out-and-back sideways detours at every few cells. The detour
/// radius grows by one and flips side every second waypoint.
fn spiral_path(from: Pos, to: Pos, rng: &mut RngStream) -> Vec<Pos> {
    let base = manhattan_path(from, to, rng);
    let span = (to.x - from.x).abs().max((to.y - from.y).abs());
    let radius_cap = SPIRAL_MAX_RADIUS.min((span + 1) / 2);
    if radius_cap == 0 || base.len() < 3 {
        return base;
    }

    let mut path = Vec::with_capacity(base.len() * 2);
    let mut waypoint = 0_i32;
    for index in 0..base.len() {
        let point = base[index];
        path.push(point);
        let is_intermediate = index > 0 && index + 1 < base.len();
        if !is_intermediate || index % SPIRAL_WAYPOINT_STRIDE != 0 {
            continue;
        }

        let radius = (waypoint / 2 + 1).min(radius_cap);
        let side = if (waypoint / 2) % 2 == 0 { 1 } else { -1 };
        waypoint += 1;

        let previous = base[index - 1];
        let (px, py) = if previous.y == point.y { (0, side) } else { (side, 0) };
        for step in 1..=radius {
            path.push(Pos { y: point.y + py * step, x: point.x + px * step });
        }
        for step in (0..radius).rev() {
            path.push(Pos { y: point.y + py * step, x: point.x + px * step });
        }
    }
    dedupe_path(path)
}

fn radial_path(from: Pos, to: Pos, rng: &mut RngStream) -> Vec<Pos> {
    if from == to {
        return vec![from];
    }
    let midpoint = Pos { y: (from.y + to.y).div_euclid(2), x: (from.x + to.x).div_euclid(2) };
    let jitter_x = rng.range_i32(2, 4) * if rng.chance(0.5) { 1 } else { -1 };
    let jitter_y = rng.range_i32(2, 4) * if rng.chance(0.5) { 1 } else { -1 };
    let mut hub = Pos { y: midpoint.y + jitter_y, x: midpoint.x + jitter_x };
    if hub == from || hub == to {
        hub.x += 1;
    }
    if hub == from || hub == to {
        hub.y += 1;
    }

    let mut path = manhattan_path(from, hub, rng);
    path.extend(manhattan_path(hub, to, rng).into_iter().skip(1));
    dedupe_path(path)
}

/// Drops consecutive duplicates.
pub(super) fn dedupe_path(mut path: Vec<Pos>) -> Vec<Pos> {
    path.dedup();
    path
}

/// Replaces every diagonal step with a horizontal-first corner so the walk is
/// 4-connected.
pub(super) fn stitch_diagonals(path: &[Pos]) -> Vec<Pos> {
    let mut stitched = Vec::with_capacity(path.len() * 2);
    for (index, &point) in path.iter().enumerate() {
        if let Some(&previous) = index.checked_sub(1).and_then(|prior| path.get(prior)) {
            if previous.x != point.x && previous.y != point.y {
                stitched.push(Pos { y: previous.y, x: point.x });
            }
        }
        stitched.push(point);
    }
    stitched
}
