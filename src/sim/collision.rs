//! Collision detection and response for the corridor
//!
//! Everything is an axis-aligned box. [`detect`] resolves wall and obstacle
//! penetration on a copy of the player and reports what was touched; latching
//! obstacle hits and coin pickups is left to the session so this pass stays a
//! pure function of (player, window).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::player::Player;
use super::track::{Obstacle, ObstacleKind};
use super::window::TrackWindow;
use crate::consts::{PASS_TOLERANCE, SEPARATION_EPSILON};

/// Something the player touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Pushed out of a wall
    Wall { block_index: u64, push: Vec3 },
    /// Blocked by an obstacle that had not been hit before
    Obstacle {
        block_index: u64,
        kind: ObstacleKind,
        push: Vec3,
    },
    /// Overlapped an uncollected coin
    Coin { block_index: u64, coin: usize },
}

/// Result of a collision pass
#[derive(Debug, Clone)]
pub struct CollisionOutcome {
    /// Player after push-out
    pub player: Player,
    /// Events in resolution order (walls and obstacles block by block, then
    /// coins)
    pub events: Vec<CollisionEvent>,
}

impl CollisionOutcome {
    pub fn obstacle_hits(&self) -> impl Iterator<Item = (u64, ObstacleKind)> + '_ {
        self.events.iter().filter_map(|c| match *c {
            CollisionEvent::Obstacle {
                block_index, kind, ..
            } => Some((block_index, kind)),
            _ => None,
        })
    }

    pub fn coins(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.events.iter().filter_map(|c| match *c {
            CollisionEvent::Coin { block_index, coin } => Some((block_index, coin)),
            _ => None,
        })
    }
}

/// Whether the player is clearing an obstacle the intended way
pub fn passes_obstacle(player: &Player, player_box: &Aabb, obstacle: &Obstacle) -> bool {
    let obstacle_box = obstacle.aabb();
    match obstacle.kind {
        ObstacleKind::SlideGate => {
            player.sliding() && player_box.max.y <= obstacle_box.min.y + PASS_TOLERANCE
        }
        ObstacleKind::JumpWall => {
            !player.on_ground && player.pos.y > obstacle_box.max.y + PASS_TOLERANCE
        }
    }
}

/// Push out along the smaller-overlap axis with a small bias so the boxes no
/// longer touch. Ties resolve along Z.
fn obstacle_push(player_box: &Aabb, obstacle_box: &Aabb) -> Vec3 {
    let dx = player_box.separation_x(obstacle_box);
    let dz = player_box.separation_z(obstacle_box);
    if dx.abs() < dz.abs() {
        Vec3::new(dx + SEPARATION_EPSILON.copysign(dx), 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, dz + SEPARATION_EPSILON.copysign(dz))
    }
}

/// Resolve the player against every live block
pub fn detect(player: &Player, window: &TrackWindow) -> CollisionOutcome {
    let mut player = player.clone();
    let mut events = Vec::new();

    for block in window.blocks() {
        for wall in block.walls() {
            let wall_box = wall.aabb();
            let player_box = player.aabb();
            if player_box.intersects(&wall_box) {
                let push = player_box.horizontal_push_out(&wall_box);
                player.pos += push;
                events.push(CollisionEvent::Wall {
                    block_index: block.index,
                    push,
                });
            }
        }

        let Some(obstacle) = block.obstacle.as_ref() else {
            continue;
        };
        if obstacle.hit {
            continue;
        }
        let obstacle_box = obstacle.aabb();
        let player_box = player.aabb();
        if !player_box.intersects(&obstacle_box) {
            continue;
        }
        if passes_obstacle(&player, &player_box, obstacle) {
            continue;
        }
        let push = obstacle_push(&player_box, &obstacle_box);
        player.pos += push;
        log::debug!(
            "Hit {:?} on block {} (push {:.3}, {:.3})",
            obstacle.kind,
            block.index,
            push.x,
            push.z
        );
        events.push(CollisionEvent::Obstacle {
            block_index: block.index,
            kind: obstacle.kind,
            push,
        });
    }

    let player_box = player.aabb();
    for block in window.blocks() {
        for (i, coin) in block.coins.iter().enumerate() {
            if !coin.collected && player_box.intersects(&coin.aabb()) {
                events.push(CollisionEvent::Coin {
                    block_index: block.index,
                    coin: i,
                });
            }
        }
    }

    CollisionOutcome { player, events }
}
