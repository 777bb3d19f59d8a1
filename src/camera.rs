//! Chase-camera input
//!
//! The core does not own a camera; it hands the renderer where the body is
//! and which way it faces. The offsets below are the game's chase framing, a
//! renderer is free to smooth toward them.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::forward_from_yaw;
use crate::sim::player::Player;

/// Distance the eye trails behind the player
pub const EYE_BACK: f32 = 6.5;
/// Eye height while running or jumping
pub const EYE_UP: f32 = 3.0;
/// Eye height while sliding
pub const EYE_UP_SLIDING: f32 = 2.0;
/// How far ahead of the player the camera aims
pub const LOOK_AHEAD: f32 = 4.0;
pub const LOOK_UP: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraInput {
    /// Visual body position (includes unbaked slide drift)
    pub focus: Vec3,
    /// Heading in degrees
    pub yaw: f32,
    pub sliding: bool,
}

impl CameraInput {
    pub fn from_player(player: &Player) -> Self {
        Self {
            focus: player.visual_position(),
            yaw: player.yaw,
            sliding: player.sliding(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Desired eye position
    pub fn eye(&self) -> Vec3 {
        let up = if self.sliding { EYE_UP_SLIDING } else { EYE_UP };
        self.focus - self.forward() * EYE_BACK + Vec3::Y * up
    }

    /// Point the camera looks at
    pub fn target(&self) -> Vec3 {
        self.focus + self.forward() * LOOK_AHEAD + Vec3::Y * LOOK_UP
    }

    /// Right-handed view matrix for the chase framing
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target(), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chase_offsets_at_start() {
        let camera = CameraInput::from_player(&Player::default());
        // Heading 180 runs toward -Z, so the eye sits on +Z
        assert!((camera.eye() - Vec3::new(0.0, 3.0, 6.5)).length() < 1e-4);
        assert!((camera.target() - Vec3::new(0.0, 1.2, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_eye_drops_while_sliding() {
        let mut player = Player::default();
        player.start_slide();
        let camera = CameraInput::from_player(&player);
        assert!(camera.sliding);
        assert!((camera.eye().y - EYE_UP_SLIDING).abs() < 1e-6);
    }

    #[test]
    fn test_view_looks_down_forward() {
        let camera = CameraInput::from_player(&Player::default());
        let view = camera.view();
        // Target ends up in front of the eye (-Z in view space)
        let target = view.transform_point3(camera.target());
        assert!(target.z < 0.0);
        assert!(target.x.abs() < 1e-4);
    }
}
