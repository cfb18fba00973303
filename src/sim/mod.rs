//! Simulation module
//!
//! All gameplay logic lives here:
//! - Real delta time, scaled against a fixed reference tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod input;
pub mod movement;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use catalog::{CollectibleKind, ObstacleKind, pick_weighted};
pub use collision::resolve_collisions;
pub use input::{InputState, Key};
pub use progression::{LevelUpTimer, Notification};
pub use spawn::SpawnScheduler;
pub use state::{
    EntityId, EntityKind, EntityRegistry, GameEvent, GameState, MovingEntity, Player, RunState,
};
pub use tick::{TickReport, tick};
