//! Mirror post-processing across one or both grid axes, keeping one half authoritative.

use serde::Serialize;

use crate::types::{Direction4, Pos};

use super::elevation::prune_inconsistent_ramps;
use super::grid::Grid;
use super::model::{Cell, Level};
use super::profile::normalize_keyword;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SymmetryMode {
    #[default]
    None,
    KeepTop,
    KeepBottom,
    KeepLeft,
    KeepRight,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowHalf {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnHalf {
    Left,
    Right,
}

impl SymmetryMode {
    /// Resolves a symmetry keyword; unknown values mean no mirroring.
    pub fn from_keyword(raw: &str) -> Self {
        match normalize_keyword(raw).as_str() {
            "x" | "horizontal" | "keeptop" | "top" => Self::KeepTop,
            "keepbottom" | "bottom" => Self::KeepBottom,
            "y" | "vertical" | "keepleft" | "left" => Self::KeepLeft,
            "keepright" | "right" => Self::KeepRight,
            "xy" | "both" | "topleft" | "keeptopleft" => Self::TopLeft,
            "topright" | "keeptopright" => Self::TopRight,
            "bottomleft" | "keepbottomleft" => Self::BottomLeft,
            "bottomright" | "keepbottomright" => Self::BottomRight,
            _ => Self::None,
        }
    }

    fn rows_kept(self) -> Option<RowHalf> {
        match self {
            Self::KeepTop | Self::TopLeft | Self::TopRight => Some(RowHalf::Top),
            Self::KeepBottom | Self::BottomLeft | Self::BottomRight => Some(RowHalf::Bottom),
            Self::None | Self::KeepLeft | Self::KeepRight => None,
        }
    }

    fn columns_kept(self) -> Option<ColumnHalf> {
        match self {
            Self::KeepLeft | Self::TopLeft | Self::BottomLeft => Some(ColumnHalf::Left),
            Self::KeepRight | Self::TopRight | Self::BottomRight => Some(ColumnHalf::Right),
            Self::None | Self::KeepTop | Self::KeepBottom => None,
        }
    }
}

pub fn apply_symmetry(levels: &mut [Level], mode: SymmetryMode) {
    if mode == SymmetryMode::None {
        return;
    }
    for level in levels {
        apply_to_grid(&mut level.grid, mode);
    }
}

pub(super) fn apply_to_grid(grid: &mut Grid, mode: SymmetryMode) {
    if let Some(keep) = mode.rows_kept() {
        mirror_rows(grid, keep);
    }
    if let Some(keep) = mode.columns_kept() {
        mirror_columns(grid, keep);
    }
    if mode != SymmetryMode::None {
        prune_inconsistent_ramps(grid);
    }
}

fn mirror_rows(grid: &mut Grid, keep: RowHalf) {
    let source = grid.clone();
    let last_row = source.height() as i32 - 1;
    for pos in source.positions() {
        let mirror_y = last_row - pos.y;
        let discarded = match keep {
            RowHalf::Top => pos.y > mirror_y,
            RowHalf::Bottom => pos.y < mirror_y,
        };
        if !discarded {
            continue;
        }
        let Some(&mirrored) = source.get(Pos { y: mirror_y, x: pos.x }) else {
            continue;
        };
        if let Some(cell) = grid.get_mut(pos) {
            *cell = reflect(mirrored, Direction4::flipped_vertically);
        }
    }
}

fn mirror_columns(grid: &mut Grid, keep: ColumnHalf) {
    let source = grid.clone();
    let last_column = source.width() as i32 - 1;
    for pos in source.positions() {
        let mirror_x = last_column - pos.x;
        let discarded = match keep {
            ColumnHalf::Left => pos.x > mirror_x,
            ColumnHalf::Right => pos.x < mirror_x,
        };
        if !discarded {
            continue;
        }
        let Some(&mirrored) = source.get(Pos { y: pos.y, x: mirror_x }) else {
            continue;
        };
        if let Some(cell) = grid.get_mut(pos) {
            *cell = reflect(mirrored, Direction4::flipped_horizontally);
        }
    }
}

fn reflect(mut cell: Cell, flip: fn(Direction4) -> Direction4) -> Cell {
    cell.ramp_dir = cell.ramp_dir.map(flip);
    cell
}
