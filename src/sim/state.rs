//! Game state and core simulation types
//!
//! Positions live on the river plane: `Vec2::x` is lateral, `Vec2::y` is the
//! world z axis (upstream is negative). Height is fixed at the water surface.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{CollectibleKind, ObstacleKind};
use super::progression::LevelUpTimer;
use super::spawn::SpawnScheduler;
use crate::consts::BOB_AMPLITUDE;
use crate::tuning::Tuning;
use crate::unlocks::Unlock;

/// Stable identity shared with the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// The player's raft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Current heading (radians)
    pub facing: f32,
    /// Heading the player is turning toward
    pub target_facing: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            facing: 0.0,
            target_facing: 0.0,
        }
    }
}

/// What a moving entity is, with its catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Collectible(CollectibleKind),
}

impl EntityKind {
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EntityKind::Obstacle(kind) => kind.speed_multiplier(),
            EntityKind::Collectible(kind) => kind.speed_multiplier(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Obstacle(kind) => kind.as_str(),
            EntityKind::Collectible(kind) => kind.as_str(),
        }
    }
}

/// An obstacle or collectible drifting toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Yaw (cosmetic)
    pub rotation: f32,
    /// Uniform scale (cosmetic)
    pub scale: f32,
    /// Bob phase offset (cosmetic)
    pub bob_phase: f32,
}

impl MovingEntity {
    /// Vertical bob above the surface at `elapsed` seconds. Zero for obstacles.
    pub fn bob_offset(&self, elapsed: f32) -> f32 {
        match self.kind {
            EntityKind::Collectible(_) => (elapsed * 3.0 + self.bob_phase).sin() * BOB_AMPLITUDE,
            EntityKind::Obstacle(_) => 0.0,
        }
    }
}

/// Live obstacles and collectibles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    /// Sorted by id (spawn order)
    pub obstacles: Vec<MovingEntity>,
    /// Sorted by id (spawn order)
    pub collectibles: Vec<MovingEntity>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity, assigning its id. Returns a reference to the stored copy.
    pub fn insert(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        rotation: f32,
        scale: f32,
        bob_phase: f32,
    ) -> &MovingEntity {
        let entity = MovingEntity {
            id: self.next_entity_id(),
            kind,
            pos,
            rotation,
            scale,
            bob_phase,
        };
        let list = match kind {
            EntityKind::Obstacle(_) => &mut self.obstacles,
            EntityKind::Collectible(_) => &mut self.collectibles,
        };
        list.push(entity);
        &list[list.len() - 1]
    }

    pub fn get(&self, id: EntityId) -> Option<&MovingEntity> {
        self.iter().find(|e| e.id == id)
    }

    /// Remove by id. Returns the entity if it was live.
    pub fn remove(&mut self, id: EntityId) -> Option<MovingEntity> {
        for list in [&mut self.obstacles, &mut self.collectibles] {
            if let Some(idx) = list.iter().position(|e| e.id == id) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    /// Every live entity, obstacles first
    pub fn iter(&self) -> impl Iterator<Item = &MovingEntity> {
        self.obstacles.iter().chain(self.collectibles.iter())
    }

    pub fn len(&self) -> usize {
        self.obstacles.len() + self.collectibles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.collectibles.is_empty()
    }

    /// Remove everything, returning the ids that were live
    pub fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.iter().map(|e| e.id).collect();
        self.obstacles.clear();
        self.collectibles.clear();
        ids
    }
}

/// Progress of the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u32,
    pub lives: u32,
    /// Starts at 1
    pub level: u32,
    /// Seconds spent Running
    pub elapsed: f32,
    /// Base drift speed per reference tick
    pub base_speed: f32,
}

impl RunState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.start_lives,
            level: 1,
            elapsed: 0.0,
            base_speed: tuning.start_base_speed,
        }
    }

    /// Take `damage` lives, never going below zero. Returns lives left.
    pub fn lose_lives(&mut self, damage: u32) -> u32 {
        self.lives = self.lives.saturating_sub(damage);
        self.lives
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    /// Whole seconds, as recorded on the leaderboard
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed.max(0.0) as u32
    }
}

/// Everything the simulation mutates during a run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub player: Player,
    pub registry: EntityRegistry,
    pub run: RunState,
    pub spawner: SpawnScheduler,
    pub level_timer: LevelUpTimer,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::default(),
            registry: EntityRegistry::new(),
            run: RunState::new(tuning),
            spawner: SpawnScheduler::new(),
            level_timer: LevelUpTimer::new(),
        }
    }

    /// Fresh run: default progress, player centered, cadences and level timer
    /// restarted. The registry must already be empty. The RNG keeps its stream.
    pub fn reset_run(&mut self, tuning: &Tuning) {
        debug_assert!(self.registry.is_empty());
        self.player = Player::default();
        self.run = RunState::new(tuning);
        self.spawner.reset(0.0);
        self.level_timer.arm(0.0, tuning);
    }
}

/// Something that happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: EntityId, kind: EntityKind },
    /// Drifted past the player untouched
    Expired { id: EntityId },
    ObstacleHit { id: EntityId, kind: ObstacleKind, lives_left: u32 },
    Collected { id: EntityId, kind: CollectibleKind, points: u32 },
    LevelUp { level: u32 },
    GameOver { score: u32, level: u32, time: u32 },
    Unlocked(Unlock),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ids_are_unique_and_increasing() {
        let mut registry = EntityRegistry::new();
        let a = registry
            .insert(EntityKind::Obstacle(ObstacleKind::Rock), Vec2::ZERO, 0.0, 1.0, 0.0)
            .id;
        let b = registry
            .insert(
                EntityKind::Collectible(CollectibleKind::Clam),
                Vec2::ZERO,
                0.0,
                1.0,
                0.0,
            )
            .id;
        assert!(b > a);
        assert_eq!(registry.obstacles.len(), 1);
        assert_eq!(registry.collectibles.len(), 1);
    }

    #[test]
    fn test_registry_remove_is_exactly_once() {
        let mut registry = EntityRegistry::new();
        let id = registry
            .insert(EntityKind::Obstacle(ObstacleKind::Log), Vec2::ONE, 0.0, 1.0, 0.0)
            .id;
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lives_never_negative() {
        let mut run = RunState::new(&Tuning::default());
        assert_eq!(run.lose_lives(2), 1);
        assert_eq!(run.lose_lives(5), 0);
        assert!(run.is_dead());
    }

    #[test]
    fn test_obstacles_do_not_bob() {
        let mut registry = EntityRegistry::new();
        let rock = registry
            .insert(EntityKind::Obstacle(ObstacleKind::Rock), Vec2::ZERO, 0.0, 1.0, 1.0)
            .clone();
        assert_eq!(rock.bob_offset(3.3), 0.0);
    }
}
