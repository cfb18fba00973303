//! Obstacle and collectible spawning
//!
//! Two independent cadences, both measured against the run's elapsed time:
//! obstacles every `obstacle_interval_ms(level)` (sometimes two at once) and
//! collectibles every `collectible_interval_ms`. At most one cadence tick of
//! each kind happens per frame.

use glam::Vec2;
use rand::Rng;

use super::catalog::{CollectibleKind, ObstacleKind};
use super::progression::{extra_obstacle_chance, obstacle_interval_ms};
use super::state::{EntityKind, EntityRegistry, MovingEntity};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnScheduler {
    /// Elapsed seconds of the last obstacle cadence tick
    last_obstacle_at: f32,
    /// Elapsed seconds of the last collectible cadence tick
    last_collectible_at: f32,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart both cadences at `now` (session start)
    pub fn reset(&mut self, now: f32) {
        self.last_obstacle_at = now;
        self.last_collectible_at = now;
    }

    /// Spawn whatever is due at `elapsed`. Returns the new entities.
    pub fn poll<R: Rng>(
        &mut self,
        elapsed: f32,
        level: u32,
        registry: &mut EntityRegistry,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Vec<MovingEntity> {
        let mut spawned = Vec::new();

        let obstacle_interval = obstacle_interval_ms(level, tuning) / 1000.0;
        if elapsed - self.last_obstacle_at >= obstacle_interval {
            self.last_obstacle_at = elapsed;
            spawned.push(spawn_obstacle(registry, rng, tuning));
            if rng.random_bool(extra_obstacle_chance(level, tuning)) {
                spawned.push(spawn_obstacle(registry, rng, tuning));
            }
        }

        let collectible_interval = tuning.collectible_interval_ms / 1000.0;
        if elapsed - self.last_collectible_at >= collectible_interval {
            self.last_collectible_at = elapsed;
            spawned.push(spawn_collectible(registry, rng, tuning));
        }

        for entity in &spawned {
            log::debug!(
                "Spawned {} #{} at x={:.1}",
                entity.kind.as_str(),
                entity.id.0,
                entity.pos.x
            );
        }
        spawned
    }
}

/// Random point on the spawn line
fn spawn_position<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec2 {
    let half = tuning.spawn_half_width;
    Vec2::new(rng.random_range(-half..half), tuning.spawn_z)
}

pub fn spawn_obstacle<R: Rng>(
    registry: &mut EntityRegistry,
    rng: &mut R,
    tuning: &Tuning,
) -> MovingEntity {
    let kind = ObstacleKind::sample(rng.random::<f32>());
    let pos = spawn_position(rng, tuning);
    let rotation = rng.random_range(0.0..std::f32::consts::TAU);
    let (min_scale, max_scale) = kind.scale_range();
    let scale = if max_scale > min_scale {
        rng.random_range(min_scale..max_scale)
    } else {
        min_scale
    };
    registry
        .insert(EntityKind::Obstacle(kind), pos, rotation, scale, 0.0)
        .clone()
}

pub fn spawn_collectible<R: Rng>(
    registry: &mut EntityRegistry,
    rng: &mut R,
    tuning: &Tuning,
) -> MovingEntity {
    let kind = CollectibleKind::sample(rng.random::<f32>());
    let pos = spawn_position(rng, tuning);
    let bob_phase = rng.random_range(0.0..std::f32::consts::TAU);
    registry
        .insert(EntityKind::Collectible(kind), pos, 0.0, 1.0, bob_phase)
        .clone()
}
