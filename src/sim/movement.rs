//! Player steering and entity drift
//!
//! Speeds are per reference tick; `scale` is the frame length in reference
//! ticks (`dt / REFERENCE_DT`), so motion is frame-rate independent.

use super::input::InputState;
use super::progression::entity_speed;
use super::state::{EntityRegistry, MovingEntity, Player, RunState};
use crate::tuning::Tuning;
use crate::{lerp, scaled_lerp_factor};

/// Move the player from held keys, turn toward the last pressed heading,
/// then clamp to the playable area.
pub fn move_player(player: &mut Player, input: &InputState, scale: f32, tuning: &Tuning) {
    let step = tuning.move_speed * scale;
    for key in input.held() {
        let (dx, dz) = key.direction();
        player.pos.x += dx * step;
        player.pos.y += dz * step;
        player.target_facing = key.facing();
    }

    player.facing = lerp(
        player.facing,
        player.target_facing,
        scaled_lerp_factor(tuning.turn_factor, scale),
    );

    player.pos.x = player.pos.x.clamp(-tuning.bound_x, tuning.bound_x);
    player.pos.y = player.pos.y.clamp(-tuning.bound_z, tuning.bound_z);
}

/// Drift every entity downstream and pull out the ones that passed the camera
pub fn advance_entities(
    registry: &mut EntityRegistry,
    run: &RunState,
    scale: f32,
    tuning: &Tuning,
) -> Vec<MovingEntity> {
    for entity in registry
        .obstacles
        .iter_mut()
        .chain(registry.collectibles.iter_mut())
    {
        entity.pos.y += entity_speed(run, entity.kind.speed_multiplier(), tuning) * scale;
    }

    let mut expired = Vec::new();
    for list in [&mut registry.obstacles, &mut registry.collectibles] {
        let (gone, kept): (Vec<_>, Vec<_>) = list
            .drain(..)
            .partition(|e| e.pos.y > tuning.expiry_z);
        *list = kept;
        expired.extend(gone);
    }
    expired
}
