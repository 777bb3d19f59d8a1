//! Player kinematics
//!
//! Running / Jumping / Sliding state machine integrated once per tick. While
//! sliding, the slide animation's root bone drifts; that drift is tracked in
//! [`RootMotion`] so it is counted exactly once: as a visual offset (with the
//! bones cancelled) during the slide, then baked into `pos` when it ends.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::tuning::Tuning;
use crate::{consts::START_YAW, forward_from_yaw, horizontal, right_from_yaw, wrap_degrees};

/// Logical animation state, mirrored to the animation subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Running,
    Jumping,
    Sliding,
}

/// Root-bone drift accumulated during a slide
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RootMotion {
    /// No slide sample taken yet
    #[default]
    Idle,
    /// Drift observed since the slide's first sample, shown as a visual offset
    /// and cancelled out of the bone transforms
    Pending { start: Vec3, current: Vec3 },
    /// Drift folded into the player's position at slide end (world space).
    /// Kept as a record of the last bake until the next slide starts,
    /// so a renderer can blend the mesh across the jump in `pos`.
    Baked { offset: Vec3 },
}

impl RootMotion {
    /// Horizontal root drift in model space, zero unless pending
    pub fn local_delta(&self) -> Vec3 {
        match self {
            RootMotion::Pending { start, current } => horizontal(*current - *start),
            RootMotion::Idle | RootMotion::Baked { .. } => Vec3::ZERO,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RootMotion::Pending { .. })
    }

    /// World-space offset added to `pos` by the most recent bake
    pub fn baked_offset(&self) -> Option<Vec3> {
        match self {
            RootMotion::Baked { offset } => Some(*offset),
            RootMotion::Idle | RootMotion::Pending { .. } => None,
        }
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Only the vertical component is integrated; horizontal motion comes from
    /// heading and input each tick
    pub vel: Vec3,
    /// Heading in degrees
    pub yaw: f32,
    pub target_yaw: f32,
    pub on_ground: bool,
    pub state: AnimState,
    pub slide_timer: f32,
    pub root_motion: RootMotion,
    pub scale: f32,

    forward_speed: f32,
    lateral_speed: f32,
    pointer_sensitivity: f32,
    jump_speed: f32,
    gravity: f32,
    slide_duration: f32,
    half_width: f32,
    half_depth: f32,
    stand_height: f32,
    slide_height: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            yaw: START_YAW,
            target_yaw: START_YAW,
            on_ground: true,
            state: AnimState::Running,
            slide_timer: 0.0,
            root_motion: RootMotion::Idle,
            scale: tuning.player_scale,

            forward_speed: tuning.forward_speed,
            lateral_speed: tuning.lateral_speed,
            pointer_sensitivity: tuning.pointer_sensitivity,
            jump_speed: tuning.jump_speed,
            gravity: tuning.gravity,
            slide_duration: tuning.slide_duration,
            half_width: tuning.stand_half_width,
            half_depth: tuning.stand_half_depth,
            stand_height: tuning.stand_height,
            slide_height: tuning.slide_height,
        }
    }

    #[inline]
    pub fn sliding(&self) -> bool {
        self.state == AnimState::Sliding
    }

    /// Which clip the animation subsystem should be playing
    pub fn anim_state(&self) -> AnimState {
        self.state
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn right(&self) -> Vec3 {
        right_from_yaw(self.yaw)
    }

    pub fn half_width(&self) -> f32 {
        self.half_width * self.scale
    }

    pub fn half_depth(&self) -> f32 {
        self.half_depth * self.scale
    }

    /// Current box height (standing or sliding)
    pub fn height(&self) -> f32 {
        if self.sliding() {
            self.slide_height * self.scale
        } else {
            self.stand_height * self.scale
        }
    }

    pub fn turn_left(&mut self) {
        self.turn(90.0);
    }

    pub fn turn_right(&mut self) {
        self.turn(-90.0);
    }

    fn turn(&mut self, delta: f32) {
        if self.sliding() || !self.on_ground {
            return;
        }
        self.yaw = wrap_degrees(self.yaw + delta);
        self.target_yaw = self.yaw;
    }

    pub fn jump(&mut self) {
        if self.on_ground && !self.sliding() {
            self.on_ground = false;
            self.vel.y = self.jump_speed;
            self.state = AnimState::Jumping;
        }
    }

    pub fn start_slide(&mut self) {
        if self.on_ground && !self.sliding() {
            self.state = AnimState::Sliding;
            self.slide_timer = self.slide_duration;
            self.root_motion = RootMotion::Idle;
            log::debug!("Slide started at ({:.2}, {:.2})", self.pos.x, self.pos.z);
        }
    }

    /// Advance one tick. `pointer_dx` is the pointer motion accumulated since
    /// the previous tick.
    pub fn integrate(&mut self, dt: f32, pointer_dx: f32) {
        self.pos += self.forward() * self.forward_speed * dt;

        let lateral = pointer_dx * self.pointer_sensitivity * self.lateral_speed;
        self.pos += self.right() * lateral * dt;

        if self.sliding() {
            self.pos.y = 0.0;
            self.vel.y = 0.0;
        } else {
            if !self.on_ground {
                self.vel.y -= self.gravity * dt;
            }
            self.pos.y += self.vel.y * dt;
            if self.pos.y <= 0.0 {
                self.pos.y = 0.0;
                self.vel.y = 0.0;
                if !self.on_ground {
                    self.on_ground = true;
                    self.state = AnimState::Running;
                }
            }
        }

        if self.sliding() {
            self.slide_timer -= dt;
            if self.slide_timer <= 0.0 {
                self.bake_root_motion();
                self.state = AnimState::Running;
            }
        }
    }

    /// Record the root bone (bone 0) of the current pose while sliding
    pub fn sample_root_bone(&mut self, bones: &[Mat4]) {
        let Some(root) = bones.first() else {
            return;
        };
        if !self.sliding() {
            return;
        }
        let current = root.w_axis.truncate();
        self.root_motion = match self.root_motion {
            RootMotion::Pending { start, .. } => RootMotion::Pending { start, current },
            RootMotion::Idle | RootMotion::Baked { .. } => RootMotion::Pending {
                start: current,
                current,
            },
        };
    }

    /// World-space drift of the mesh relative to `pos` that has not been baked
    pub fn slide_offset(&self) -> Vec3 {
        let local = self.root_motion.local_delta() * self.scale;
        Quat::from_rotation_y(self.yaw.to_radians()) * local
    }

    /// Where the body actually is this tick (position plus unbaked drift)
    pub fn visual_position(&self) -> Vec3 {
        self.pos + self.slide_offset()
    }

    /// Strip pending root drift from bone transforms so the mesh is drawn at
    /// `visual_position` without moving twice
    pub fn remove_root_motion(&self, mut bones: Vec<Mat4>) -> Vec<Mat4> {
        if !self.sliding() || !self.root_motion.is_pending() || bones.is_empty() {
            return bones;
        }
        let cancel = Mat4::from_translation(-self.root_motion.local_delta());
        for bone in bones.iter_mut() {
            *bone = cancel * *bone;
        }
        bones
    }

    /// Fold the pending drift into `pos`
    fn bake_root_motion(&mut self) {
        if !self.root_motion.is_pending() {
            self.root_motion = RootMotion::Idle;
            return;
        }
        let offset = self.slide_offset();
        self.pos += offset;
        self.root_motion = RootMotion::Baked { offset };
        log::debug!(
            "Baked slide offset ({:.3}, {:.3}); pos now ({:.3}, {:.3})",
            offset.x,
            offset.z,
            self.pos.x,
            self.pos.z
        );
    }

    /// Collision box. Spans from the ground plane to the top of the body and
    /// follows the unbaked slide drift.
    pub fn aabb(&self) -> Aabb {
        let origin = if self.sliding() {
            self.visual_position()
        } else {
            self.pos
        };
        Aabb::new(
            Vec3::new(origin.x - self.half_width(), 0.0, origin.z - self.half_depth()),
            Vec3::new(
                origin.x + self.half_width(),
                origin.y + self.height(),
                origin.z + self.half_depth(),
            ),
        )
    }
}
