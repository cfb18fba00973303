//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here. Defaults mirror
//! [`crate::consts`]; a JSON override only needs the keys it changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub move_speed: f32,
    pub turn_factor: f32,
    pub bound_x: f32,
    pub bound_z: f32,

    // === Run ===
    pub start_lives: u32,
    pub start_base_speed: f32,
    pub speed_per_level: f32,
    pub level_up_interval: f32,
    pub level_speed_scale: f32,
    pub collision_radius: f32,

    // === Spawning ===
    pub obstacle_interval_base_ms: f32,
    pub obstacle_interval_per_level_ms: f32,
    pub obstacle_interval_floor_ms: f32,
    pub extra_obstacle_chance_per_level: f32,
    pub collectible_interval_ms: f32,
    pub spawn_z: f32,
    pub spawn_half_width: f32,
    pub expiry_z: f32,

    // === Rewards ===
    pub unlock_kayak_score: u32,
    pub unlock_speedboat_score: u32,
    pub leaderboard_top: usize,
    pub level_banner_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: PLAYER_MOVE_SPEED,
            turn_factor: PLAYER_TURN_FACTOR,
            bound_x: PLAYER_BOUND_X,
            bound_z: PLAYER_BOUND_Z,

            start_lives: START_LIVES,
            start_base_speed: START_BASE_SPEED,
            speed_per_level: SPEED_PER_LEVEL,
            level_up_interval: LEVEL_UP_INTERVAL,
            level_speed_scale: LEVEL_SPEED_SCALE,
            collision_radius: COLLISION_RADIUS,

            obstacle_interval_base_ms: OBSTACLE_INTERVAL_BASE_MS,
            obstacle_interval_per_level_ms: OBSTACLE_INTERVAL_PER_LEVEL_MS,
            obstacle_interval_floor_ms: OBSTACLE_INTERVAL_FLOOR_MS,
            extra_obstacle_chance_per_level: EXTRA_OBSTACLE_CHANCE_PER_LEVEL,
            collectible_interval_ms: COLLECTIBLE_INTERVAL_MS,
            spawn_z: SPAWN_Z,
            spawn_half_width: SPAWN_HALF_WIDTH,
            expiry_z: EXPIRY_Z,

            unlock_kayak_score: 100,
            unlock_speedboat_score: 300,
            leaderboard_top: LEADERBOARD_TOP,
            level_banner_secs: LEVEL_BANNER_SECS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        fn positive(field: &'static str, value: f32) -> GameResult<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(GameError::InvalidTuning {
                    field,
                    reason: "must be positive and finite",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> GameResult<()> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(GameError::InvalidTuning {
                    field,
                    reason: "must be non-negative and finite",
                })
            }
        }

        positive("move_speed", self.move_speed)?;
        positive("bound_x", self.bound_x)?;
        positive("bound_z", self.bound_z)?;
        positive("level_up_interval", self.level_up_interval)?;
        positive("collision_radius", self.collision_radius)?;
        positive("obstacle_interval_floor_ms", self.obstacle_interval_floor_ms)?;
        positive("collectible_interval_ms", self.collectible_interval_ms)?;
        positive("spawn_half_width", self.spawn_half_width)?;
        positive("start_base_speed", self.start_base_speed)?;
        positive("obstacle_interval_base_ms", self.obstacle_interval_base_ms)?;
        non_negative("speed_per_level", self.speed_per_level)?;
        non_negative("level_speed_scale", self.level_speed_scale)?;
        non_negative("obstacle_interval_per_level_ms", self.obstacle_interval_per_level_ms)?;

        if !(0.0..=1.0).contains(&self.turn_factor) {
            return Err(GameError::InvalidTuning {
                field: "turn_factor",
                reason: "must be within [0, 1]",
            });
        }
        if self.obstacle_interval_floor_ms > self.obstacle_interval_base_ms {
            return Err(GameError::InvalidTuning {
                field: "obstacle_interval_floor_ms",
                reason: "must not exceed obstacle_interval_base_ms",
            });
        }
        if self.extra_obstacle_chance_per_level < 0.0 {
            return Err(GameError::InvalidTuning {
                field: "extra_obstacle_chance_per_level",
                reason: "must not be negative",
            });
        }
        if self.start_lives == 0 {
            return Err(GameError::InvalidTuning {
                field: "start_lives",
                reason: "a run needs at least one life",
            });
        }
        if self.spawn_z >= self.expiry_z {
            return Err(GameError::InvalidTuning {
                field: "spawn_z",
                reason: "must be upstream of expiry_z",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "start_lives": 5, "level_up_interval": 10.0 }"#)
            .expect("valid override");
        assert_eq!(tuning.start_lives, 5);
        assert_eq!(tuning.level_up_interval, 10.0);
        assert_eq!(tuning.collision_radius, COLLISION_RADIUS);
    }

    #[test]
    fn test_rejects_floor_above_base() {
        let err = Tuning::from_json(r#"{ "obstacle_interval_floor_ms": 500.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTuning {
                field: "obstacle_interval_floor_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_backward_drift() {
        for (json, field) in [
            (r#"{ "start_base_speed": -0.2 }"#, "start_base_speed"),
            (r#"{ "start_base_speed": 0.0 }"#, "start_base_speed"),
            (r#"{ "speed_per_level": -0.05 }"#, "speed_per_level"),
            (r#"{ "level_speed_scale": -0.15 }"#, "level_speed_scale"),
        ] {
            match Tuning::from_json(json) {
                Err(GameError::InvalidTuning { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{} accepted: {:?}", json, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_rejects_non_finite_base_interval() {
        let tuning = Tuning {
            obstacle_interval_base_ms: f32::INFINITY,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(GameError::InvalidTuning {
                field: "obstacle_interval_base_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_growth_is_allowed() {
        let tuning =
            Tuning::from_json(r#"{ "speed_per_level": 0.0, "level_speed_scale": 0.0 }"#).unwrap();
        assert_eq!(tuning.speed_per_level, 0.0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(GameError::TuningParse(_))
        ));
    }
}
