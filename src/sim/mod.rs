//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded track RNG only
//! - Stable iteration order (by block index)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod autopilot;
pub mod collision;
pub mod player;
pub mod rng;
pub mod state;
pub mod tick;
pub mod track;
pub mod window;

pub use aabb::Aabb;
pub use collision::{CollisionEvent, CollisionOutcome, detect};
pub use player::{AnimState, Player, RootMotion};
pub use rng::TrackRng;
pub use state::{GameEvent, GamePhase, GameSession};
pub use tick::{PointerAccumulator, TickInput, tick};
pub use track::{
    Block, BlockKind, Coin, Obstacle, ObstacleKind, TrackCursor, Wall, generate_next,
};
pub use window::TrackWindow;
