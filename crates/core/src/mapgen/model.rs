//! Public data model handed to geometry builders: cells, rooms, levels, and layouts.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Direction4, Pos};

use super::grid::Grid;

/// One grid unit. While `solid` is set every other attribute is meaningless.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Cell {
    pub solid: bool,
    pub cover: bool,
    pub ramp_dir: Option<Direction4>,
    pub ramp_rise: f64,
    pub platform_id: Option<u32>,
    pub room_id: Option<u32>,
    pub spawn: bool,
    pub elevation: Option<f64>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            solid: true,
            cover: false,
            ramp_dir: None,
            ramp_rise: 0.0,
            platform_id: None,
            room_id: None,
            spawn: false,
            elevation: None,
        }
    }
}

impl Cell {
    pub fn has_ramp(&self) -> bool {
        self.ramp_dir.is_some()
    }

    /// Resolved floor height offset, zero for solid cells.
    pub fn floor_height(&self) -> f64 {
        if self.solid { 0.0 } else { self.elevation.unwrap_or(0.0) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Room {
    pub id: u32,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub center: Pos,
    pub elevation: f64,
}

impl Room {
    pub fn new(id: u32, x: usize, y: usize, width: usize, height: usize) -> Self {
        let center = Pos { y: (y + height / 2) as i32, x: (x + width / 2) as i32 };
        Self { id, x, y, width, height, center, elevation: 0.0 }
    }

    pub fn right(&self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height - 1
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x as i32
            && pos.y >= self.y as i32
            && pos.x <= self.right() as i32
            && pos.y <= self.bottom() as i32
    }

    /// Whether the footprints grown by one ring overlap.
    pub fn inflated_overlaps(&self, other: &Self) -> bool {
        let (ax0, ay0) = (self.x as i64 - 1, self.y as i64 - 1);
        let (ax1, ay1) = (self.right() as i64 + 1, self.bottom() as i64 + 1);
        let (bx0, by0) = (other.x as i64 - 1, other.y as i64 - 1);
        let (bx1, by1) = (other.right() as i64 + 1, other.bottom() as i64 + 1);
        ax0 <= bx1 && ax1 >= bx0 && ay0 <= by1 && ay1 >= by0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Level {
    pub index: usize,
    pub elevation: f64,
    pub width: usize,
    pub height: usize,
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub platform_count: usize,
}

impl Level {
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.grid.get(pos)
    }

    pub fn spawn_positions(&self) -> Vec<Pos> {
        self.grid
            .positions()
            .filter(|&pos| self.cell(pos).is_some_and(|cell| !cell.solid && cell.spawn))
            .collect()
    }

    /// Walkable surface height at a point given in cell units (`x` across, `y` down),
    /// including the level offset and any ramp slope. `None` over solid or outside cells.
    pub fn standing_height(&self, x: f64, y: f64) -> Option<f64> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let pos = Pos { y: y.floor() as i32, x: x.floor() as i32 };
        let cell = self.cell(pos).filter(|cell| !cell.solid)?;
        let base = self.elevation + cell.floor_height();
        let Some(direction) = cell.ramp_dir else {
            return Some(base);
        };

        let fx = x - x.floor();
        let fy = y - y.floor();
        let progress = match direction {
            Direction4::East => fx,
            Direction4::West => 1.0 - fx,
            Direction4::South => fy,
            Direction4::North => 1.0 - fy,
        };
        Some(base + cell.ramp_rise * progress)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub cell_size: f64,
    pub wall_height: f64,
    pub wall_thickness: f64,
    pub floor_thickness: f64,
    pub platform_thickness: f64,
    pub level_spacing: f64,
    pub levels: Vec<Level>,
}

impl Layout {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for value in [
            self.cell_size,
            self.wall_height,
            self.wall_thickness,
            self.floor_thickness,
            self.platform_thickness,
            self.level_spacing,
        ] {
            bytes.extend(value.to_bits().to_le_bytes());
        }

        bytes.extend((self.levels.len() as u32).to_le_bytes());
        for level in &self.levels {
            bytes.extend((level.index as u32).to_le_bytes());
            bytes.extend(level.elevation.to_bits().to_le_bytes());
            bytes.extend((level.width as u32).to_le_bytes());
            bytes.extend((level.height as u32).to_le_bytes());
            bytes.extend((level.platform_count as u32).to_le_bytes());
            for cell in level.grid.cells() {
                push_cell_bytes(&mut bytes, cell);
            }
            bytes.extend((level.rooms.len() as u32).to_le_bytes());
            for room in &level.rooms {
                for value in [room.id as usize, room.x, room.y, room.width, room.height] {
                    bytes.extend((value as u32).to_le_bytes());
                }
                bytes.extend(room.elevation.to_bits().to_le_bytes());
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_cell_bytes(bytes: &mut Vec<u8>, cell: &Cell) {
    let flags = u8::from(cell.solid)
        | (u8::from(cell.cover) << 1)
        | (u8::from(cell.spawn) << 2)
        | (u8::from(cell.elevation.is_some()) << 3);
    bytes.push(flags);
    bytes.push(cell.ramp_dir.map_or(0xFF, Direction4::code));
    bytes.extend(cell.ramp_rise.to_bits().to_le_bytes());
    bytes.extend(cell.platform_id.unwrap_or(u32::MAX).to_le_bytes());
    bytes.extend(cell.room_id.unwrap_or(u32::MAX).to_le_bytes());
    bytes.extend(cell.elevation.unwrap_or(0.0).to_bits().to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_level() -> Level {
        let mut grid = Grid::new(6, 6);
        for y in 1..5 {
            for x in 1..5 {
                let cell = grid.get_mut(Pos { y, x }).expect("in bounds");
                cell.solid = false;
                cell.elevation = Some(0.0);
            }
        }
        Level {
            index: 1,
            elevation: 3.0,
            width: 6,
            height: 6,
            grid,
            rooms: Vec::new(),
            platform_count: 0,
        }
    }

    #[test]
    fn room_center_uses_floor_division() {
        let room = Room::new(0, 2, 3, 5, 4);
        assert_eq!(room.center, Pos::new(4, 5));
        assert!(room.contains(Pos::new(6, 6)));
        assert!(!room.contains(Pos::new(7, 6)));
    }

    #[test]
    fn inflated_overlap_rejects_touching_rooms() {
        let left = Room::new(0, 1, 1, 3, 3);
        let touching = Room::new(1, 5, 1, 3, 3);
        let apart = Room::new(2, 6, 1, 3, 3);
        assert!(left.inflated_overlaps(&touching));
        assert!(!left.inflated_overlaps(&apart));
    }

    #[test]
    fn standing_height_adds_level_offset_and_ramp_slope() {
        let mut level = flat_level();
        let ramp = level.grid.get_mut(Pos::new(2, 2)).expect("in bounds");
        ramp.ramp_dir = Some(Direction4::East);
        ramp.ramp_rise = 1.0;

        assert_eq!(level.standing_height(1.5, 1.5), Some(3.0));
        assert_eq!(level.standing_height(2.25, 2.5), Some(3.25));
        assert_eq!(level.standing_height(0.5, 0.5), None);
        assert_eq!(level.standing_height(-1.0, 2.0), None);
    }

    #[test]
    fn fingerprint_tracks_cell_changes() {
        let layout = Layout {
            cell_size: 4.0,
            wall_height: 3.0,
            wall_thickness: 0.5,
            floor_thickness: 0.25,
            platform_thickness: 0.25,
            level_spacing: 3.0,
            levels: vec![flat_level()],
        };
        let mut changed = layout.clone();
        if let Some(cell) = changed.levels[0].grid.get_mut(Pos::new(3, 3)) {
            cell.cover = true;
        }
        assert_eq!(layout.fingerprint(), layout.clone().fingerprint());
        assert_ne!(layout.fingerprint(), changed.fingerprint());
    }
}
