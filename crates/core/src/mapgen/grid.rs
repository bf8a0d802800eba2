//! Row-major cell grid and the neighbourhood queries shared by every stage.

use serde::Serialize;

use crate::types::{Direction4, Pos};

use super::model::Cell;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Fully solid grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![Cell::default(); width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Inside the bounds and off the outer wall ring.
    pub fn in_interior(&self, pos: Pos) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && (pos.x as usize) + 1 < self.width
            && (pos.y as usize) + 1 < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.in_bounds(pos).then(|| &self.cells[self.index(pos)])
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        let index = self.index(pos);
        Some(&mut self.cells[index])
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.get(pos).is_some_and(|cell| !cell.solid)
    }

    /// Count of 4-neighbours that are solid or outside the grid.
    pub fn edge_score(&self, pos: Pos) -> u32 {
        Direction4::ALL.iter().filter(|&&direction| !self.is_open(pos.offset(direction))).count()
            as u32
    }

    pub fn neighbors4(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction4::ALL
            .into_iter()
            .map(move |direction| pos.offset(direction))
            .filter(|next| self.in_bounds(*next))
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }

    pub fn open_positions(&self) -> Vec<Pos> {
        self.positions().filter(|&pos| self.is_open(pos)).collect()
    }

    /// Clamps a position into the interior rectangle `[1, w-2] x [1, h-2]`.
    pub(super) fn clamp_to_interior(&self, pos: Pos) -> Pos {
        let max_x = (self.width as i32 - 2).max(1);
        let max_y = (self.height as i32 - 2).max(1);
        Pos { y: pos.y.clamp(1, max_y), x: pos.x.clamp(1, max_x) }
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}
