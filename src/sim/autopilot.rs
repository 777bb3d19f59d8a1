//! Demo-mode autopilot
//!
//! Fills in a [`TickInput`] from what lies ahead: take turns, jump walls,
//! slide under gates, and drift over to the next coin line (back to the
//! centerline when there is none).

use glam::Vec3;

use super::player::Player;
use super::state::GameSession;
use super::tick::TickInput;
use super::track::{Block, BlockKind, ObstacleKind};
use crate::consts::YAW_TOLERANCE;
use crate::wrap_degrees;

/// Seconds of (scaled) lead before a jump wall's near face
const JUMP_LEAD: f32 = 0.3;
/// Distance before a slide gate's near face to drop into a slide
const SLIDE_LEAD: f32 = 1.0;
/// Turn once the player is this close to the turn block's center
const TURN_WINDOW: f32 = 0.5;
/// Pointer delta per unit of lateral offset
const CENTERING_GAIN: f32 = 4.0;
/// Coins this far behind the player are no longer chased
const COIN_PASSED: f32 = 0.5;
const MAX_POINTER: f32 = 5.0;
/// Blocks past the current one scanned for obstacles
const LOOKAHEAD_BLOCKS: u64 = 2;

/// Overwrite `input`'s commands with the autopilot's choice for this tick
pub fn steer(session: &GameSession, input: &mut TickInput) {
    let player = &session.player;
    let Some(current) = session.window.player_block(player.pos) else {
        return;
    };
    let Some(block) = session.window.get(current) else {
        return;
    };

    let forward = player.forward();
    let along = (player.pos - block.center).dot(forward);

    if same_heading(player.yaw, block.yaw) && along >= -TURN_WINDOW {
        match block.kind {
            BlockKind::TurnLeft => input.turn_left = true,
            BlockKind::TurnRight => input.turn_right = true,
            BlockKind::Normal | BlockKind::TurnStraight => {}
        }
    }

    let right = player.right();
    let lateral = (player.pos - block.center).dot(right);
    let target = next_coin(session, current, forward)
        .map(|coin| (coin - block.center).dot(right))
        .unwrap_or(0.0);
    input.pointer_dx = ((target - lateral) * CENTERING_GAIN).clamp(-MAX_POINTER, MAX_POINTER);

    for index in current..=current + LOOKAHEAD_BLOCKS {
        let Some(ahead) = session.window.get(index) else {
            break;
        };
        if let Some((kind, gap)) = obstacle_gap(player, ahead, forward) {
            match kind {
                ObstacleKind::JumpWall => {
                    if gap <= session.tuning.forward_speed * JUMP_LEAD {
                        input.jump = true;
                    }
                }
                ObstacleKind::SlideGate => {
                    if gap <= SLIDE_LEAD {
                        input.slide = true;
                    }
                }
            }
            break;
        }
    }
}

/// Nearest uncollected coin not yet passed, on this block or the next one
/// along the same heading
fn next_coin(session: &GameSession, current: u64, forward: Vec3) -> Option<Vec3> {
    let player = &session.player;
    (current..=current + 1)
        .filter_map(|index| session.window.get(index))
        .filter(|b| same_heading(player.yaw, b.yaw))
        .flat_map(|b| b.coins.iter())
        .filter(|c| !c.collected)
        .map(|c| (c.pos, (c.pos - player.pos).dot(forward)))
        .filter(|(_, ahead)| *ahead > -COIN_PASSED)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(pos, _)| pos)
}

fn same_heading(a: f32, b: f32) -> bool {
    (wrap_degrees(a - b + 180.0) - 180.0).abs() < YAW_TOLERANCE
}

/// Distance from the front of the player's box to the near face of an unhit
/// obstacle straight ahead
fn obstacle_gap(player: &Player, block: &Block, forward: Vec3) -> Option<(ObstacleKind, f32)> {
    let obstacle = block.obstacle.filter(|o| !o.hit)?;
    let depth = obstacle.size.dot(forward.abs());
    let gap = (obstacle.center - player.pos).dot(forward) - depth * 0.5 - player.half_depth();
    (gap > 0.0).then_some((obstacle.kind, gap))
}
