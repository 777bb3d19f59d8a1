//! Sliding window of live track blocks
//!
//! Blocks are generated ahead of the player and evicted from the back once
//! the window grows past [`MAX_LIVE_BLOCKS`]. Indices in the window are always
//! strictly ascending and contiguous.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::TrackRng;
use super::track::{Block, TrackCursor, generate_next};
use crate::consts::*;
use crate::horizontal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackWindow {
    blocks: VecDeque<Block>,
    cursor: TrackCursor,
    rng: TrackRng,
}

impl Default for TrackWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl TrackWindow {
    /// Empty window with a freshly seeded generator
    pub fn new(seed: u32) -> Self {
        Self {
            blocks: VecDeque::with_capacity(MAX_LIVE_BLOCKS + 1),
            cursor: TrackCursor::default(),
            rng: TrackRng::new(seed),
        }
    }

    /// Drop every block and restart generation from `seed`
    pub fn reset(&mut self, seed: u32) {
        self.blocks.clear();
        self.cursor = TrackCursor::default();
        self.rng = TrackRng::new(seed);
    }

    /// Append `count` blocks at the cursor
    pub fn seed_initial(&mut self, count: usize) {
        for _ in 0..count {
            self.push_next();
        }
    }

    fn push_next(&mut self) {
        let (block, next) = generate_next(&self.cursor, &mut self.rng);
        self.blocks.push_back(block);
        self.cursor = next;
    }

    /// Index of the first block whose center is within one block size of
    /// `pos` on the ground plane
    pub fn player_block(&self, pos: Vec3) -> Option<u64> {
        let limit = BLOCK_SIZE * BLOCK_SIZE;
        self.blocks
            .iter()
            .find(|b| horizontal(pos - b.center).length_squared() < limit)
            .map(|b| b.index)
    }

    /// Locate the player's block and extend the track [`BLOCKS_AHEAD`] past it.
    ///
    /// With no block under the player, generation still runs as though the
    /// player block were -1.
    pub fn ensure_generated_ahead(&mut self, player_pos: Vec3) -> Option<u64> {
        let player_block = self.player_block(player_pos);
        let target = match player_block {
            Some(index) => index + BLOCKS_AHEAD,
            None => BLOCKS_AHEAD.saturating_sub(1),
        };
        while self.cursor.next_index < target {
            self.push_next();
        }
        player_block
    }

    /// Trim blocks far behind the player; returns how many were dropped
    pub fn evict_stale(&mut self, player_block: Option<u64>) -> usize {
        let Some(player_block) = player_block else {
            return 0;
        };
        let mut evicted = 0;
        while self.blocks.len() > MAX_LIVE_BLOCKS {
            match self.blocks.front() {
                Some(front) if front.index + BLOCKS_BEHIND < player_block => {
                    self.blocks.pop_front();
                    evicted += 1;
                }
                _ => break,
            }
        }
        if evicted > 0 {
            log::debug!(
                "Evicted {} blocks behind block {} ({} live)",
                evicted,
                player_block,
                self.blocks.len()
            );
        }
        evicted
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.blocks.iter_mut()
    }

    /// Block by its generator index, if still live
    pub fn get(&self, index: u64) -> Option<&Block> {
        let front = self.blocks.front()?.index;
        let offset = usize::try_from(index.checked_sub(front)?).ok()?;
        self.blocks.get(offset)
    }

    pub fn get_mut(&mut self, index: u64) -> Option<&mut Block> {
        let front = self.blocks.front()?.index;
        let offset = usize::try_from(index.checked_sub(front)?).ok()?;
        self.blocks.get_mut(offset)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn cursor(&self) -> &TrackCursor {
        &self.cursor
    }

    /// Lowest live index
    pub fn first_index(&self) -> Option<u64> {
        self.blocks.front().map(|b| b.index)
    }

    pub fn last_index(&self) -> Option<u64> {
        self.blocks.back().map(|b| b.index)
    }
}
