//! Static entity catalogs
//!
//! Each obstacle and collectible type carries its gameplay metadata and a
//! selection weight. Table order matters: the sampler walks it front to back
//! and falls back to the first entry.

use serde::{Deserialize, Serialize};

/// Weighted discrete sampler.
///
/// Accumulates weights in table order and returns the first entry whose
/// cumulative weight meets or exceeds `draw`. If `draw` is beyond the total
/// weight, the first entry is returned. `None` only for an empty table.
pub fn pick_weighted<T: Copy>(table: &[(T, f32)], draw: f32) -> Option<T> {
    let mut cumulative = 0.0;
    for &(item, weight) in table {
        cumulative += weight;
        if cumulative >= draw {
            return Some(item);
        }
    }
    table.first().map(|&(item, _)| item)
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Log,
    Boat,
    Island,
    Shark,
}

impl ObstacleKind {
    /// Selection weights, in sampling order
    pub const TABLE: [(ObstacleKind, f32); 5] = [
        (ObstacleKind::Rock, 0.35),
        (ObstacleKind::Log, 0.25),
        (ObstacleKind::Boat, 0.2),
        (ObstacleKind::Island, 0.1),
        (ObstacleKind::Shark, 0.1),
    ];

    pub fn sample(draw: f32) -> Self {
        pick_weighted(&Self::TABLE, draw).unwrap_or(ObstacleKind::Rock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Rock => "rock",
            ObstacleKind::Log => "log",
            ObstacleKind::Boat => "boat",
            ObstacleKind::Island => "island",
            ObstacleKind::Shark => "shark",
        }
    }

    /// Obstacles drift with the current
    pub fn speed_multiplier(&self) -> f32 {
        1.0
    }

    /// Lives taken on contact
    pub fn damage(&self) -> u32 {
        1
    }

    /// Random scale range (cosmetic)
    pub fn scale_range(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Rock => (0.8, 1.4),
            ObstacleKind::Log => (0.9, 1.2),
            ObstacleKind::Boat => (1.0, 1.0),
            ObstacleKind::Island => (1.2, 1.8),
            ObstacleKind::Shark => (0.9, 1.1),
        }
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    Normal,
    Rainbow,
    Golden,
    Emerald,
    Diamond,
    Clam,
    Seahorse,
    Jellyfish,
    Starfish,
}

impl CollectibleKind {
    /// Selection weights, in sampling order
    pub const TABLE: [(CollectibleKind, f32); 9] = [
        (CollectibleKind::Normal, 0.40),
        (CollectibleKind::Rainbow, 0.15),
        (CollectibleKind::Golden, 0.10),
        (CollectibleKind::Emerald, 0.07),
        (CollectibleKind::Diamond, 0.05),
        (CollectibleKind::Clam, 0.08),
        (CollectibleKind::Seahorse, 0.06),
        (CollectibleKind::Jellyfish, 0.05),
        (CollectibleKind::Starfish, 0.04),
    ];

    pub fn sample(draw: f32) -> Self {
        pick_weighted(&Self::TABLE, draw).unwrap_or(CollectibleKind::Normal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectibleKind::Normal => "normal",
            CollectibleKind::Rainbow => "rainbow",
            CollectibleKind::Golden => "golden",
            CollectibleKind::Emerald => "emerald",
            CollectibleKind::Diamond => "diamond",
            CollectibleKind::Clam => "clam",
            CollectibleKind::Seahorse => "seahorse",
            CollectibleKind::Jellyfish => "jellyfish",
            CollectibleKind::Starfish => "starfish",
        }
    }

    /// Points awarded on pickup
    pub fn value(&self) -> u32 {
        match self {
            CollectibleKind::Normal => 1,
            CollectibleKind::Rainbow => 3,
            CollectibleKind::Golden => 5,
            CollectibleKind::Emerald => 7,
            CollectibleKind::Diamond => 10,
            CollectibleKind::Clam => 2,
            CollectibleKind::Seahorse => 4,
            CollectibleKind::Jellyfish => 3,
            CollectibleKind::Starfish => 2,
        }
    }

    /// Rarer pickups travel faster
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            CollectibleKind::Normal => 1.0,
            CollectibleKind::Rainbow => 1.1,
            CollectibleKind::Golden => 1.2,
            CollectibleKind::Emerald => 1.3,
            CollectibleKind::Diamond => 1.5,
            CollectibleKind::Clam => 0.9,
            CollectibleKind::Seahorse => 1.1,
            CollectibleKind::Jellyfish => 0.8,
            CollectibleKind::Starfish => 1.0,
        }
    }
}
