//! Deterministic seed labels and pseudo-random streams for layout generation.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::Pos;

const F64_UNIT: f64 = 1.0 / (1_u64 << 53) as f64;

/// Independent, repeatable stream of floats in `[0, 1)` keyed by a text label.
#[derive(Clone, Debug)]
pub struct RngStream {
    rng: ChaCha8Rng,
}

impl RngStream {
    pub fn from_label(label: &str) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(xxh3_64(label.as_bytes())) }
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 * F64_UNIT
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform integer in `min..=max`.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = f64::from(max - min + 1);
        (min + (self.next_f64() * span).floor() as i32).min(max)
    }

    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max);
        let span = (max - min + 1) as f64;
        min + ((self.next_f64() * span).floor() as usize).min(max - min)
    }

    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for upper in (1..items.len()).rev() {
            let swap_with = self.index(upper + 1);
            items.swap(upper, swap_with);
        }
    }
}

pub fn create_stream(label: &str) -> RngStream {
    RngStream::from_label(label)
}

/// Builds the per-level stream labels from the resolved seeds so every concern draws
/// from its own stream.
#[derive(Clone, Copy, Debug)]
pub(super) struct StreamLabels<'a> {
    pub(super) root: &'a str,
    pub(super) level_index: usize,
}

impl StreamLabels<'_> {
    pub(super) fn layout(&self) -> RngStream {
        create_stream(&format!("{}-L{}", self.root, self.level_index))
    }

    pub(super) fn room_size(&self, room_size_seed: u32) -> RngStream {
        create_stream(&format!("{}-size-{room_size_seed}-L{}", self.root, self.level_index))
    }

    pub(super) fn elevation(&self) -> RngStream {
        create_stream(&format!("{}-elevation-L{}", self.root, self.level_index))
    }

    pub(super) fn corridor(&self, corridor_seed: u32) -> RngStream {
        create_stream(&format!("{}-corridor-{corridor_seed}-L{}", self.root, self.level_index))
    }

    pub(super) fn padding(
        &self,
        corridor_seed: u32,
        from: Pos,
        to: Pos,
        corridor_index: usize,
    ) -> RngStream {
        create_stream(&format!(
            "{}-padding-{corridor_seed}-L{}-{}:{}-{}:{}-{corridor_index}",
            self.root, self.level_index, from.x, from.y, to.x, to.y
        ))
    }

    pub(super) fn cover(&self, cover_seed: u32) -> RngStream {
        create_stream(&format!("{}-cover-{}-{cover_seed}", self.root, self.level_index))
    }

    pub(super) fn platform(&self, platform_seed: u32) -> RngStream {
        create_stream(&format!("{}-platform-{platform_seed}-L{}", self.root, self.level_index))
    }

    pub(super) fn spawn(&self, spawn_seed: u32) -> RngStream {
        create_stream(&format!("{}-spawn-{spawn_seed}-L{}", self.root, self.level_index))
    }
}
