//! Per-frame simulation tick
//!
//! Advances a [`GameSession`] in a fixed order: restart, commands, player
//! integration, track generation and eviction, collision, then the
//! difficulty ramp.

use serde::{Deserialize, Serialize};

use super::autopilot;
use super::collision::detect;
use super::state::{GameEvent, GamePhase, GameSession};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub jump: bool,
    pub slide: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Horizontal pointer motion since the previous tick
    pub pointer_dx: f32,
    /// Start a new run (also leaves game over)
    pub restart: bool,
    /// Demo mode - the autopilot plays
    pub autopilot: bool,
}

/// Collects pointer motion between ticks; each tick takes what arrived since
/// the last one
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerAccumulator {
    dx: f32,
}

impl PointerAccumulator {
    pub fn add(&mut self, dx: f32) {
        self.dx += dx;
    }

    /// Drain the accumulated delta
    pub fn take(&mut self) -> f32 {
        std::mem::take(&mut self.dx)
    }
}

/// Advance the session by one frame of `raw_dt` seconds.
///
/// Gameplay runs at `raw_dt * game_speed`; the difficulty clock runs on
/// `raw_dt`. Returns what happened this tick.
pub fn tick(session: &mut GameSession, input: &TickInput, raw_dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.restart {
        session.reset();
        events.push(GameEvent::Restarted);
    }

    if session.phase == GamePhase::GameOver {
        return events;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot::steer(session, &mut input);
    }
    let input = &input;

    let player = &mut session.player;
    if input.jump {
        player.jump();
    }
    if input.slide {
        player.start_slide();
    }
    if input.turn_left {
        player.turn_left();
    }
    if input.turn_right {
        player.turn_right();
    }

    let dt = raw_dt * session.game_speed;
    player.integrate(dt, input.pointer_dx);

    let player_block = session.window.ensure_generated_ahead(session.player.pos);
    session.window.evict_stale(player_block);
    session.player_block = player_block;

    let outcome = detect(&session.player, &session.window);
    session.apply_collision(outcome, &mut events);
    session.spin_coins(dt);

    session.advance_difficulty(raw_dt);
    session.ticks += 1;

    events
}
