//! Data-driven player and difficulty balance
//!
//! Defaults reproduce the shipped feel; a JSON file can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SEED;
use crate::error::TuningError;

/// Player kinematics and difficulty ramp parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Track RNG seed applied on every reset
    pub seed: u32,
    /// Hit points at game start
    pub starting_hp: i32,

    // === Locomotion ===
    /// Constant forward speed (units/sec)
    pub forward_speed: f32,
    /// Lateral speed per unit of scaled pointer delta
    pub lateral_speed: f32,
    /// Pointer delta to lateral input scale
    pub pointer_sensitivity: f32,
    /// Initial upward velocity of a jump
    pub jump_speed: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Seconds a slide lasts
    pub slide_duration: f32,

    // === Body ===
    /// Uniform model scale; all box dimensions are multiplied by it
    pub player_scale: f32,
    pub stand_half_width: f32,
    pub stand_half_depth: f32,
    pub stand_height: f32,
    pub slide_height: f32,

    // === Difficulty ===
    /// Game speed gained per second of play
    pub speed_increase_rate: f32,
    /// Cap on the game speed multiplier
    pub max_game_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            starting_hp: 1,

            forward_speed: 6.0,
            lateral_speed: 50.0,
            pointer_sensitivity: 0.02,
            jump_speed: 5.0,
            gravity: 12.0,
            slide_duration: 1.5,

            player_scale: 1.0,
            stand_half_width: 0.35,
            stand_half_depth: 0.25,
            stand_height: 1.8,
            slide_height: 1.0,

            speed_increase_rate: 0.02,
            max_game_speed: 3.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a finite value greater than zero",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be finite and non-negative",
                })
            }
        }

        if self.starting_hp < 1 {
            return Err(TuningError::Invalid {
                field: "starting_hp",
                reason: "must be at least 1",
            });
        }
        positive("gravity", self.gravity)?;
        positive("jump_speed", self.jump_speed)?;
        positive("slide_duration", self.slide_duration)?;
        positive("player_scale", self.player_scale)?;
        positive("stand_half_width", self.stand_half_width)?;
        positive("stand_half_depth", self.stand_half_depth)?;
        positive("stand_height", self.stand_height)?;
        positive("slide_height", self.slide_height)?;
        if self.slide_height > self.stand_height {
            return Err(TuningError::Invalid {
                field: "slide_height",
                reason: "must not exceed stand_height",
            });
        }
        non_negative("forward_speed", self.forward_speed)?;
        non_negative("lateral_speed", self.lateral_speed)?;
        non_negative("pointer_sensitivity", self.pointer_sensitivity)?;
        if !self.max_game_speed.is_finite() || self.max_game_speed < 1.0 {
            return Err(TuningError::Invalid {
                field: "max_game_speed",
                reason: "must be at least 1.0",
            });
        }
        non_negative("speed_increase_rate", self.speed_increase_rate)?;
        Ok(())
    }
}
