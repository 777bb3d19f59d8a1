//! Game session state
//!
//! Everything one run needs lives in [`GameSession`]: the track window, the
//! player, and the run counters. It is mutated only through `&mut` by
//! [`tick`](super::tick::tick) and the animation hooks below.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, CollisionOutcome};
use super::player::Player;
use super::track::ObstacleKind;
use super::window::TrackWindow;
use crate::camera::CameraInput;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active run
    #[default]
    Playing,
    /// HP ran out; only a restart leaves this phase
    GameOver,
}

/// Gameplay events emitted by a tick (for audio/UI hooks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Restarted,
    WallContact { block_index: u64 },
    ObstacleHit { block_index: u64, kind: ObstacleKind },
    CoinCollected { block_index: u64, coin: usize },
    GameOver,
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub tuning: Tuning,
    pub window: TrackWindow,
    pub player: Player,
    pub hp: i32,
    pub coins: u32,
    /// Multiplier applied to the simulation step
    pub game_speed: f32,
    /// Unscaled seconds since the run started
    pub game_time: f32,
    pub phase: GamePhase,
    /// Ticks simulated since the run started
    pub ticks: u64,
    /// Block the player stood on last tick
    pub player_block: Option<u64>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameSession {
    pub fn new(tuning: Tuning) -> Self {
        let mut session = Self {
            window: TrackWindow::new(tuning.seed),
            player: Player::new(&tuning),
            hp: tuning.starting_hp,
            coins: 0,
            game_speed: 1.0,
            game_time: 0.0,
            phase: GamePhase::Playing,
            ticks: 0,
            player_block: None,
            tuning,
        };
        session.reset();
        session
    }

    /// Start a fresh run: reseed the track, rebuild the first blocks, respawn
    /// the player and clear the counters
    pub fn reset(&mut self) {
        self.window.reset(self.tuning.seed);
        self.window.seed_initial(INITIAL_BLOCKS);
        self.player = Player::new(&self.tuning);
        self.hp = self.tuning.starting_hp;
        self.coins = 0;
        self.game_speed = 1.0;
        self.game_time = 0.0;
        self.phase = GamePhase::Playing;
        self.ticks = 0;
        self.player_block = self.window.player_block(self.player.pos);
        log::info!(
            "New run with seed {} ({} blocks, hp {})",
            self.tuning.seed,
            self.window.len(),
            self.hp
        );
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Adopt the resolved player and latch everything it touched.
    ///
    /// Obstacles and coins already latched are skipped, so applying the same
    /// outcome twice changes nothing.
    pub fn apply_collision(&mut self, outcome: CollisionOutcome, events: &mut Vec<GameEvent>) {
        self.player = outcome.player;

        for event in outcome.events {
            match event {
                CollisionEvent::Wall { block_index, .. } => {
                    events.push(GameEvent::WallContact { block_index });
                }
                CollisionEvent::Obstacle {
                    block_index, kind, ..
                } => {
                    let Some(obstacle) = self
                        .window
                        .get_mut(block_index)
                        .and_then(|b| b.obstacle.as_mut())
                    else {
                        continue;
                    };
                    if obstacle.hit {
                        continue;
                    }
                    obstacle.hit = true;
                    self.hp -= 1;
                    events.push(GameEvent::ObstacleHit { block_index, kind });

                    if self.hp <= 0 && self.phase == GamePhase::Playing {
                        self.phase = GamePhase::GameOver;
                        events.push(GameEvent::GameOver);
                        log::info!(
                            "Game over at block {} after {:.1}s with {} coins",
                            block_index,
                            self.game_time,
                            self.coins
                        );
                    }
                }
                CollisionEvent::Coin { block_index, coin } => {
                    let Some(coin_ref) = self
                        .window
                        .get_mut(block_index)
                        .and_then(|b| b.coins.get_mut(coin))
                    else {
                        continue;
                    };
                    if coin_ref.collected {
                        continue;
                    }
                    coin_ref.collected = true;
                    self.coins += 1;
                    events.push(GameEvent::CoinCollected { block_index, coin });
                }
            }
        }
    }

    /// Advance the difficulty ramp by unscaled time
    pub fn advance_difficulty(&mut self, raw_dt: f32) {
        self.game_time += raw_dt;
        self.game_speed =
            (1.0 + self.game_time * self.tuning.speed_increase_rate).min(self.tuning.max_game_speed);
    }

    /// Spin uncollected coins (cosmetic)
    pub fn spin_coins(&mut self, dt: f32) {
        for block in self.window.blocks_mut() {
            for coin in block.coins.iter_mut().filter(|c| !c.collected) {
                coin.rotation += COIN_SPIN_SPEED * dt;
            }
        }
    }

    /// Feed the current slide pose's bones (root first)
    pub fn sample_root_bone(&mut self, bones: &[Mat4]) {
        self.player.sample_root_bone(bones);
    }

    /// Bone transforms to upload, with pending root drift cancelled
    pub fn bone_transforms(&self, bones: Vec<Mat4>) -> Vec<Mat4> {
        self.player.remove_root_motion(bones)
    }

    pub fn camera_input(&self) -> CameraInput {
        CameraInput::from_player(&self.player)
    }

    /// Model matrix for the player mesh: translate to `pos`, turn to heading,
    /// then scale
    pub fn player_model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.player.scale),
            Quat::from_rotation_y(self.player.yaw.to_radians()),
            self.player.pos,
        )
    }
}
