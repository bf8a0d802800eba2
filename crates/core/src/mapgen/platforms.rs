//! Raised platforms grown from wall-hugging seed cells inside rooms.

use std::cmp::Reverse;

use tracing::trace;

use crate::types::Pos;

use super::grid::Grid;
use super::seed::RngStream;

const ATTEMPTS_PER_PLATFORM: usize = 5;
const MIN_PLATFORM_CELLS: usize = 3;

pub(super) struct PlatformContext<'a> {
    pub(super) grid: &'a mut Grid,
    pub(super) target_platforms: usize,
    pub(super) max_room_size: usize,
    pub(super) size_bias: f64,
}

/// Grows up to `target_platforms` platforms and returns how many were kept. Platform ids
/// run `0..built`; a grown region below half its target size is rolled back.
pub(super) fn build_platforms(context: &mut PlatformContext<'_>, rng: &mut RngStream) -> usize {
    let mut built = 0;
    let attempt_budget = context.target_platforms * ATTEMPTS_PER_PLATFORM;

    for attempt in 0..attempt_budget {
        if built >= context.target_platforms {
            break;
        }
        let Some(seed) = pick_seed(context.grid, rng) else {
            break;
        };
        let target = platform_target_size(context, rng);
        let claimed = grow_platform(context.grid, seed, built as u32, target, rng);
        trace!(attempt, claimed, target, "platform attempt");
        if claimed > 0 {
            built += 1;
        }
    }
    built
}

fn claimable(grid: &Grid, pos: Pos) -> bool {
    grid.get(pos).is_some_and(|cell| !cell.solid && cell.platform_id.is_none())
}

/// Weighted pick over unclaimed room cells touching a wall, weight `edge_score + 1`;
/// falls back to any unclaimed open cell.
fn pick_seed(grid: &Grid, rng: &mut RngStream) -> Option<Pos> {
    let candidates: Vec<(Pos, u32)> = grid
        .positions()
        .filter(|&pos| {
            claimable(grid, pos) && grid.get(pos).is_some_and(|cell| cell.room_id.is_some())
        })
        .map(|pos| (pos, grid.edge_score(pos)))
        .filter(|&(_, edge)| edge >= 1)
        .collect();

    if candidates.is_empty() {
        let fallback: Vec<Pos> = grid.positions().filter(|&pos| claimable(grid, pos)).collect();
        if fallback.is_empty() {
            return None;
        }
        return Some(fallback[rng.index(fallback.len())]);
    }

    let total: u32 = candidates.iter().map(|&(_, edge)| edge + 1).sum();
    let mut threshold = rng.next_f64() * f64::from(total);
    for &(pos, edge) in &candidates {
        threshold -= f64::from(edge + 1);
        if threshold <= 0.0 {
            return Some(pos);
        }
    }
    candidates.last().map(|&(pos, _)| pos)
}

fn platform_target_size(context: &PlatformContext<'_>, rng: &mut RngStream) -> usize {
    let grid = &*context.grid;
    let area = grid.width() * grid.height();
    let max_room = context.max_room_size as f64;
    let min_cells = ((max_room * 0.35).round() as usize).max(MIN_PLATFORM_CELLS);
    let max_cells = ((max_room * 1.4).round() as usize).max(min_cells + 2);
    let raw = rng.range_f64(min_cells as f64, max_cells as f64) * context.size_bias;
    (raw.round() as usize).min(area / 4).max(MIN_PLATFORM_CELLS)
}

/// Randomised flood from `seed`: pops a uniformly random frontier entry, claims it if it
/// is an unclaimed room cell, and queues its claimable room neighbours by descending edge
/// score. Returns the claimed count, or zero after rolling back a region that came up
/// short.
fn grow_platform(
    grid: &mut Grid,
    seed: Pos,
    platform_id: u32,
    target: usize,
    rng: &mut RngStream,
) -> usize {
    let minimum = (target / 2).max(MIN_PLATFORM_CELLS);
    let mut frontier = vec![seed];
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut claimed: Vec<Pos> = Vec::with_capacity(target);

    while !frontier.is_empty() && claimed.len() < target {
        let current = frontier.remove(rng.index(frontier.len()));
        let Some(slot) = visit_slot(grid, current) else {
            continue;
        };
        if visited[slot] {
            continue;
        }
        visited[slot] = true;

        let Some(cell) = grid.get_mut(current) else {
            continue;
        };
        if cell.solid || cell.platform_id.is_some() || cell.room_id.is_none() {
            continue;
        }
        cell.platform_id = Some(platform_id);
        cell.cover = false;
        claimed.push(current);

        let mut neighbours: Vec<Pos> = grid
            .neighbors4(current)
            .filter(|&next| {
                claimable(grid, next) && grid.get(next).is_some_and(|cell| cell.room_id.is_some())
            })
            .collect();
        neighbours.sort_by_key(|&next| Reverse(grid.edge_score(next)));
        frontier.extend(neighbours);
    }

    if claimed.len() < minimum {
        for pos in claimed {
            if let Some(cell) = grid.get_mut(pos) {
                cell.platform_id = None;
            }
        }
        return 0;
    }
    claimed.len()
}

fn visit_slot(grid: &Grid, pos: Pos) -> Option<usize> {
    grid.in_bounds(pos).then(|| pos.y as usize * grid.width() + pos.x as usize)
}
