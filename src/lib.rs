//! River Run - side-scrolling river survival game
//!
//! Core modules:
//! - `sim`: Simulation (input, spawning, movement, collisions, progression)
//! - `session`: Idle / Running / GameOver state machine driving the sim each frame
//! - `scene`: Renderer collaborator interface
//! - `persistence`: Key-value storage backends
//! - `leaderboard` / `unlocks`: Durable run results
//! - `tuning`: Data-driven game balance
//! - `platform`: Clock and browser glue

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod unlocks;

pub use error::{GameError, GameResult};
pub use leaderboard::{Leaderboard, LeaderboardRecord};
pub use session::{GameSession, SessionPhase};
pub use settings::Settings;
pub use tuning::Tuning;
pub use unlocks::{Unlock, UnlockFlags};

/// Game configuration constants
pub mod consts {
    /// Reference tick length. Per-tick quantities below assume this cadence and
    /// are rescaled by real frame time.
    pub const REFERENCE_DT: f32 = 1.0 / 120.0;
    /// Longest frame the simulation will integrate in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player movement per reference tick
    pub const PLAYER_MOVE_SPEED: f32 = 0.2;
    /// Facing lerp factor per reference tick
    pub const PLAYER_TURN_FACTOR: f32 = 0.2;
    /// Lateral bound (x ∈ [-X, X])
    pub const PLAYER_BOUND_X: f32 = 20.0;
    /// Longitudinal bound (z ∈ [-Z, Z])
    pub const PLAYER_BOUND_Z: f32 = 49.0;

    /// Player/entity distance that counts as a hit
    pub const COLLISION_RADIUS: f32 = 1.5;

    pub const START_LIVES: u32 = 3;
    pub const START_BASE_SPEED: f32 = 0.2;
    /// baseSpeed gained per level-up
    pub const SPEED_PER_LEVEL: f32 = 0.02;
    /// Seconds between level-ups
    pub const LEVEL_UP_INTERVAL: f32 = 15.0;
    /// Extra movement scale per level above 1
    pub const LEVEL_SPEED_SCALE: f32 = 0.15;

    /// Obstacle cadence (ms) before level reduction
    pub const OBSTACLE_INTERVAL_BASE_MS: f32 = 300.0;
    pub const OBSTACLE_INTERVAL_PER_LEVEL_MS: f32 = 20.0;
    pub const OBSTACLE_INTERVAL_FLOOR_MS: f32 = 100.0;
    /// Extra obstacle probability per level (capped at 1)
    pub const EXTRA_OBSTACLE_CHANCE_PER_LEVEL: f32 = 0.1;
    pub const COLLECTIBLE_INTERVAL_MS: f32 = 1500.0;

    /// Spawn line, upstream of the player
    pub const SPAWN_Z: f32 = -100.0;
    /// Lateral half-width of the spawn line
    pub const SPAWN_HALF_WIDTH: f32 = 20.0;
    /// Entities past this z are behind the camera
    pub const EXPIRY_Z: f32 = 10.0;
    /// Water surface height
    pub const SURFACE_Y: f32 = 0.0;
    /// Collectible bob amplitude (cosmetic)
    pub const BOB_AMPLITUDE: f32 = 0.25;

    /// Records shown on the leaderboard
    pub const LEADERBOARD_TOP: usize = 5;
    /// Level-up banner lifetime (seconds)
    pub const LEVEL_BANNER_SECS: f32 = 2.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Convert a per-reference-tick lerp factor into one for `scale` reference ticks
#[inline]
pub fn scaled_lerp_factor(factor: f32, scale: f32) -> f32 {
    1.0 - (1.0 - factor).powf(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_lerp_factor_identity_at_one_tick() {
        assert!((scaled_lerp_factor(0.2, 1.0) - 0.2).abs() < 1e-6);
        // Two ticks compound
        assert!((scaled_lerp_factor(0.2, 2.0) - 0.36).abs() < 1e-6);
        assert_eq!(scaled_lerp_factor(0.2, 0.0), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(2.0, 2.0, 0.7), 2.0);
    }
}
