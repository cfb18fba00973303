//! Player/entity contact resolution
//!
//! Contact is a plain distance check on the river plane. Each entity inside
//! the radius is removed as it is resolved, so it can only count once.

use super::state::{EntityKind, EntityRegistry, GameEvent, Player, RunState};
use crate::tuning::Tuning;

/// Whether an entity at `pos` touches the player
#[inline]
pub fn in_contact(player: &Player, pos: glam::Vec2, radius: f32) -> bool {
    player.pos.distance(pos) < radius
}

/// Resolve every contact this tick.
///
/// Obstacles are checked first, in spawn order; each hit costs its damage in
/// lives. Once lives reach zero nothing further is resolved this tick, so the
/// caller sees the lethal hit as the last event.
pub fn resolve_collisions(
    player: &Player,
    registry: &mut EntityRegistry,
    run: &mut RunState,
    tuning: &Tuning,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let radius = tuning.collision_radius;

    let mut i = 0;
    while i < registry.obstacles.len() && !run.is_dead() {
        if !in_contact(player, registry.obstacles[i].pos, radius) {
            i += 1;
            continue;
        }
        let hit = registry.obstacles.remove(i);
        if let EntityKind::Obstacle(kind) = hit.kind {
            let lives_left = run.lose_lives(kind.damage());
            log::info!("Hit {} #{}, {} lives left", kind.as_str(), hit.id.0, lives_left);
            events.push(GameEvent::ObstacleHit {
                id: hit.id,
                kind,
                lives_left,
            });
        }
    }

    if run.is_dead() {
        return events;
    }

    let mut i = 0;
    while i < registry.collectibles.len() {
        if !in_contact(player, registry.collectibles[i].pos, radius) {
            i += 1;
            continue;
        }
        let item = registry.collectibles.remove(i);
        if let EntityKind::Collectible(kind) = item.kind {
            let points = kind.value();
            run.add_score(points);
            log::debug!("Collected {} #{} (+{})", kind.as_str(), item.id.0, points);
            events.push(GameEvent::Collected {
                id: item.id,
                kind,
                points,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{CollectibleKind, ObstacleKind};
    use glam::Vec2;

    fn setup() -> (Tuning, Player, EntityRegistry, RunState) {
        let tuning = Tuning::default();
        let run = RunState::new(&tuning);
        (tuning, Player::default(), EntityRegistry::new(), run)
    }

    #[test]
    fn test_obstacle_at_distance_one_costs_a_life() {
        let (tuning, player, mut registry, mut run) = setup();
        let id = registry
            .insert(EntityKind::Obstacle(ObstacleKind::Rock), Vec2::new(1.0, 0.0), 0.0, 1.0, 0.0)
            .id;

        let events = resolve_collisions(&player, &mut registry, &mut run, &tuning);
        assert_eq!(run.lives, 2);
        assert!(registry.get(id).is_none());
        assert_eq!(
            events,
            vec![GameEvent::ObstacleHit {
                id,
                kind: ObstacleKind::Rock,
                lives_left: 2
            }]
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let (tuning, player, mut registry, mut run) = setup();
        registry.insert(EntityKind::Obstacle(ObstacleKind::Rock), Vec2::new(1.5, 0.0), 0.0, 1.0, 0.0);
        registry.insert(EntityKind::Obstacle(ObstacleKind::Rock), Vec2::new(0.0, -1.6), 0.0, 1.0, 0.0);

        assert!(resolve_collisions(&player, &mut registry, &mut run, &tuning).is_empty());
        assert_eq!(registry.obstacles.len(), 2);
    }

    #[test]
    fn test_diamond_scores_ten() {
        let (tuning, player, mut registry, mut run) = setup();
        registry.insert(
            EntityKind::Collectible(CollectibleKind::Diamond),
            Vec2::new(0.5, 0.5),
            0.0,
            1.0,
            0.0,
        );

        resolve_collisions(&player, &mut registry, &mut run, &tuning);
        assert_eq!(run.score, 10);
        assert!(registry.collectibles.is_empty());
    }

    #[test]
    fn test_adjacent_hits_each_resolved_once() {
        let (tuning, player, mut registry, mut run) = setup();
        for x in [0.1, 0.2] {
            registry.insert(EntityKind::Obstacle(ObstacleKind::Log), Vec2::new(x, 0.0), 0.0, 1.0, 0.0);
        }
        for x in [0.3, 0.4, 5.0] {
            registry.insert(
                EntityKind::Collectible(CollectibleKind::Clam),
                Vec2::new(x, 0.0),
                0.0,
                1.0,
                0.0,
            );
        }

        let events = resolve_collisions(&player, &mut registry, &mut run, &tuning);
        assert_eq!(events.len(), 4);
        assert_eq!(run.lives, 1);
        assert_eq!(run.score, 4);
        assert!(registry.obstacles.is_empty());
        assert_eq!(registry.collectibles.len(), 1);

        // Nothing left in range
        assert!(resolve_collisions(&player, &mut registry, &mut run, &tuning).is_empty());
    }

    #[test]
    fn test_lethal_hit_stops_resolution() {
        let (tuning, player, mut registry, mut run) = setup();
        run.lives = 1;
        registry.insert(EntityKind::Obstacle(ObstacleKind::Shark), Vec2::ZERO, 0.0, 1.0, 0.0);
        registry.insert(EntityKind::Obstacle(ObstacleKind::Shark), Vec2::new(0.2, 0.0), 0.0, 1.0, 0.0);
        registry.insert(
            EntityKind::Collectible(CollectibleKind::Golden),
            Vec2::ZERO,
            0.0,
            1.0,
            0.0,
        );

        let events = resolve_collisions(&player, &mut registry, &mut run, &tuning);
        assert_eq!(events.len(), 1);
        assert_eq!(run.lives, 0);
        assert_eq!(run.score, 0);
        assert_eq!(registry.len(), 2);
    }
}
