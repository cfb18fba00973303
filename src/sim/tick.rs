//! Variable timestep simulation tick
//!
//! One call advances a Running game by one frame: level-ups, spawns, player
//! steering, drift and expiry, then contacts. Everything is derived from the
//! run's elapsed time, never from the tick count.

use super::collision::resolve_collisions;
use super::input::InputState;
use super::movement::{advance_entities, move_player};
use super::state::{EntityId, GameEvent, GameState, MovingEntity};
use crate::consts::REFERENCE_DT;
use crate::tuning::Tuning;

/// What a tick changed, for the session to mirror into the scene
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Entities created this tick
    pub spawned: Vec<MovingEntity>,
    /// Entities that left the registry (expired or consumed)
    pub removed: Vec<EntityId>,
    pub events: Vec<GameEvent>,
    /// Lives ran out this tick
    pub died: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &InputState, dt: f32, tuning: &Tuning) -> TickReport {
    let mut report = TickReport::default();

    // A finished run stays frozen
    if state.run.is_dead() {
        return report;
    }

    let scale = dt / REFERENCE_DT;
    state.run.elapsed += dt;

    for level in state.level_timer.poll(&mut state.run, tuning) {
        report.events.push(GameEvent::LevelUp { level });
    }

    let spawned = state.spawner.poll(
        state.run.elapsed,
        state.run.level,
        &mut state.registry,
        &mut state.rng,
        tuning,
    );
    for entity in &spawned {
        report.events.push(GameEvent::Spawned {
            id: entity.id,
            kind: entity.kind,
        });
    }
    report.spawned = spawned;

    move_player(&mut state.player, input, scale, tuning);

    for entity in advance_entities(&mut state.registry, &state.run, scale, tuning) {
        log::debug!("Expired {} #{}", entity.kind.as_str(), entity.id.0);
        report.removed.push(entity.id);
        report.events.push(GameEvent::Expired { id: entity.id });
    }

    for event in resolve_collisions(&state.player, &mut state.registry, &mut state.run, tuning) {
        if let GameEvent::ObstacleHit { id, .. } | GameEvent::Collected { id, .. } = event {
            report.removed.push(id);
        }
        report.events.push(event);
    }

    if state.run.is_dead() {
        state.level_timer.disarm();
        report.died = true;
    }

    debug_assert!(state.run.lives <= tuning.start_lives);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::ObstacleKind;
    use crate::sim::input::Key;
    use crate::sim::state::EntityKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn running_state(seed: u64, tuning: &Tuning) -> GameState {
        let mut state = GameState::new(seed, tuning);
        state.reset_run(tuning);
        state
    }

    #[test]
    fn test_elapsed_tracks_real_delta() {
        let tuning = Tuning::default();
        let mut state = running_state(1, &tuning);
        let input = InputState::new();
        tick(&mut state, &input, 0.016, &tuning);
        tick(&mut state, &input, 0.033, &tuning);
        assert!((state.run.elapsed - 0.049).abs() < 1e-6);
    }

    #[test]
    fn test_report_mirrors_spawns_and_removals() {
        let tuning = Tuning::default();
        let mut state = running_state(2, &tuning);
        let input = InputState::new();

        let mut live = std::collections::HashSet::new();
        for _ in 0..6000 {
            let report = tick(&mut state, &input, 1.0 / 120.0, &tuning);
            for e in &report.spawned {
                assert!(live.insert(e.id));
            }
            for id in &report.removed {
                // Removed exactly once, and only if it was live
                assert!(live.remove(id));
            }
            if report.died {
                break;
            }
        }
        let registry_ids: std::collections::HashSet<_> = state.registry.iter().map(|e| e.id).collect();
        assert_eq!(live, registry_ids);
    }

    #[test]
    fn test_lethal_hit_disarms_timer_same_tick() {
        let tuning = Tuning::default();
        let mut state = running_state(3, &tuning);
        state.run.lives = 1;
        state
            .registry
            .insert(EntityKind::Obstacle(ObstacleKind::Rock), Vec2::new(0.0, -0.5), 0.0, 1.0, 0.0);

        let report = tick(&mut state, &InputState::new(), 1.0 / 120.0, &tuning);
        assert!(report.died);
        assert_eq!(state.run.lives, 0);
        assert!(!state.level_timer.is_armed());

        // Frozen afterwards
        let elapsed = state.run.elapsed;
        let report = tick(&mut state, &InputState::new(), 1.0, &tuning);
        assert!(report.events.is_empty());
        assert_eq!(state.run.elapsed, elapsed);
    }

    #[test]
    fn test_player_steers() {
        let tuning = Tuning::default();
        let mut state = running_state(4, &tuning);
        let mut input = InputState::new();
        input.press(Key::Left);
        tick(&mut state, &input, REFERENCE_DT, &tuning);
        assert!((state.player.pos.x + tuning.move_speed).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_lives_and_score_stay_in_range(
            seed in any::<u64>(),
            frames in proptest::collection::vec((0u8..16, 0.001f32..0.05), 1..400),
        ) {
            let tuning = Tuning::default();
            let mut state = running_state(seed, &tuning);
            let mut input = InputState::new();
            let mut last_score = 0;

            for (keys, dt) in frames {
                input.clear();
                for (bit, key) in Key::ALL.into_iter().enumerate() {
                    if keys & (1 << bit) != 0 {
                        input.press(key);
                    }
                }
                let report = tick(&mut state, &input, dt, &tuning);
                prop_assert!(state.run.lives <= tuning.start_lives);
                prop_assert!(state.run.score >= last_score);
                prop_assert!(state.player.pos.x.abs() <= tuning.bound_x);
                prop_assert!(state.player.pos.y.abs() <= tuning.bound_z);
                if report.died {
                    prop_assert_eq!(state.run.lives, 0);
                }
                last_score = state.run.score;
            }
        }
    }
}
