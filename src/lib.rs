//! Endless Runner - gameplay core for an infinite corridor runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track generation, player, collisions, session)
//! - `camera`: Chase-camera input derived from the player
//! - `tuning`: Data-driven player/difficulty balance
//! - `error`: Configuration errors

pub mod camera;
pub mod error;
pub mod sim;
pub mod tuning;

pub use camera::CameraInput;
pub use error::TuningError;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Seed the track RNG is reset to on every game (re)start
    pub const DEFAULT_SEED: u32 = 1_234_567;

    /// Track block footprint (square, world units)
    pub const BLOCK_SIZE: f32 = 5.0;
    pub const WALL_HEIGHT: f32 = 2.0;
    pub const WALL_THICKNESS: f32 = 0.5;
    /// Walls thinner than this on both horizontal axes are treated as absent
    pub const DEGENERATE_WALL: f32 = 0.1;

    /// Heading of the first block and of a freshly spawned player (degrees)
    pub const START_YAW: f32 = 180.0;

    /// Blocks generated at game start
    pub const INITIAL_BLOCKS: usize = 50;
    /// Generate until this many blocks exist past the player's block
    pub const BLOCKS_AHEAD: u64 = 50;
    /// Eviction only starts once the window holds more than this many blocks
    pub const MAX_LIVE_BLOCKS: usize = 60;
    /// Blocks kept behind the player's block
    pub const BLOCKS_BEHIND: u64 = 10;

    /// Every Nth block is a turn block
    pub const TURN_PERIOD: u64 = 20;
    /// Coins per coin-bearing block
    pub const COINS_PER_BLOCK: usize = 5;
    /// Spacing between coins along the block's forward axis
    pub const COIN_SPACING: f32 = 0.8;
    pub const COIN_HEIGHT: f32 = 1.0;
    /// Half-extent of the cube used to test coin pickup
    pub const COIN_RADIUS: f32 = 0.5;
    /// Cosmetic coin spin (radians/sec)
    pub const COIN_SPIN_SPEED: f32 = 2.0;

    /// Pass-through tolerance for slide gates and jump walls (1 cm)
    pub const PASS_TOLERANCE: f32 = 0.01;
    /// Extra push applied after an obstacle hit to guarantee separation
    pub const SEPARATION_EPSILON: f32 = 0.001;
    /// Heading comparisons (degrees)
    pub const YAW_TOLERANCE: f32 = 1.0;
}

/// Wrap a heading in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(mut yaw: f32) -> f32 {
    while yaw >= 360.0 {
        yaw -= 360.0;
    }
    while yaw < 0.0 {
        yaw += 360.0;
    }
    yaw
}

/// Unit forward direction on the ground plane for a heading in degrees.
///
/// Yaw 0 faces +Z, yaw 90 faces +X, yaw 180 (the start heading) faces -Z.
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    let rad = yaw.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}

/// Unit right direction: `forward × up`
#[inline]
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    forward_from_yaw(yaw).cross(Vec3::Y)
}

/// True when the heading runs along the world X axis (90° or 270°, ±1°)
#[inline]
pub fn is_x_facing(yaw: f32) -> bool {
    let folded = yaw % 180.0;
    (folded - 90.0).abs() < consts::YAW_TOLERANCE || (folded + 90.0).abs() < consts::YAW_TOLERANCE
}

/// True when the heading runs along the world Z axis (0° or 180°, ±1°)
#[inline]
pub fn is_z_facing(yaw: f32) -> bool {
    ((yaw + 360.0) % 180.0).abs() < consts::YAW_TOLERANCE
}

/// True when the heading is a whole multiple of 90°
#[inline]
pub fn is_axis_aligned(yaw: f32) -> bool {
    is_x_facing(yaw) || is_z_facing(yaw)
}

/// Drop the vertical component of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
