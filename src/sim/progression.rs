//! Level progression and difficulty curve
//!
//! A level-up fires every `level_up_interval` seconds of Running time. The
//! timer is polled from the tick with the run's elapsed time, so it can never
//! run between two halves of a tick, and a disarmed timer never fires.

use super::state::RunState;
use crate::tuning::Tuning;

/// Movement multiplier for `level`: `1 + (level - 1) * scale`
pub fn level_speed_factor(level: u32, tuning: &Tuning) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * tuning.level_speed_scale
}

/// Obstacle cadence for `level` in milliseconds
pub fn obstacle_interval_ms(level: u32, tuning: &Tuning) -> f32 {
    (tuning.obstacle_interval_base_ms - tuning.obstacle_interval_per_level_ms * level as f32)
        .max(tuning.obstacle_interval_floor_ms)
}

/// Probability of a second obstacle on an obstacle cadence tick
pub fn extra_obstacle_chance(level: u32, tuning: &Tuning) -> f64 {
    (level as f64 * tuning.extra_obstacle_chance_per_level as f64).clamp(0.0, 1.0)
}

/// Drift per reference tick for an entity with `multiplier` at the run's level
pub fn entity_speed(run: &RunState, multiplier: f32, tuning: &Tuning) -> f32 {
    run.base_speed * level_speed_factor(run.level, tuning) * multiplier
}

/// Recurring level-up trigger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelUpTimer {
    /// Elapsed time of the next level-up; `None` while disarmed
    next_at: Option<f32>,
}

impl LevelUpTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the first level-up one interval after `now`
    pub fn arm(&mut self, now: f32, tuning: &Tuning) {
        self.next_at = Some(now + tuning.level_up_interval);
    }

    pub fn disarm(&mut self) {
        self.next_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_at.is_some()
    }

    /// Apply every level-up due by `run.elapsed`. Returns the levels reached.
    pub fn poll(&mut self, run: &mut RunState, tuning: &Tuning) -> Vec<u32> {
        let mut reached = Vec::new();
        while let Some(at) = self.next_at {
            if run.elapsed < at {
                break;
            }
            run.level += 1;
            run.base_speed += tuning.speed_per_level;
            reached.push(run.level);
            log::info!("Level up: {} (base speed {:.2})", run.level, run.base_speed);
            self.next_at = Some(at + tuning.level_up_interval);
        }
        reached
    }
}

/// Transient banner (e.g. "Level 3!") that dismisses itself
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub remaining: f32,
}

impl Notification {
    pub fn new(text: impl Into<String>, duration: f32) -> Self {
        Self {
            text: text.into(),
            remaining: duration,
        }
    }

    /// Count down; returns false once the banner should be dismissed
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_obstacle_interval_curve() {
        let tuning = Tuning::default();
        assert_eq!(obstacle_interval_ms(1, &tuning), 280.0);
        assert_eq!(obstacle_interval_ms(5, &tuning), 200.0);
        assert_eq!(obstacle_interval_ms(10, &tuning), 100.0);
        // Floored
        assert_eq!(obstacle_interval_ms(40, &tuning), 100.0);
    }

    #[test]
    fn test_extra_obstacle_chance_caps_at_one() {
        let tuning = Tuning::default();
        assert!((extra_obstacle_chance(3, &tuning) - 0.3).abs() < 1e-6);
        assert_eq!(extra_obstacle_chance(12, &tuning), 1.0);
    }

    #[test]
    fn test_level_speed_factor() {
        let tuning = Tuning::default();
        assert_eq!(level_speed_factor(1, &tuning), 1.0);
        assert!((level_speed_factor(3, &tuning) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_two_level_ups_in_44_seconds() {
        let tuning = Tuning::default();
        let mut run = RunState::new(&tuning);
        let mut timer = LevelUpTimer::new();
        timer.arm(0.0, &tuning);

        let mut fired = Vec::new();
        let dt = 1.0 / 60.0;
        while run.elapsed < 44.0 {
            run.elapsed += dt;
            fired.extend(timer.poll(&mut run, &tuning));
        }

        assert_eq!(fired, vec![2, 3]);
        assert_eq!(run.level, 3);
        assert!((run.base_speed - 0.24).abs() < 1e-5);
    }

    #[test]
    fn test_disarmed_timer_never_fires() {
        let tuning = Tuning::default();
        let mut run = RunState::new(&tuning);
        let mut timer = LevelUpTimer::new();
        timer.arm(0.0, &tuning);
        timer.disarm();

        run.elapsed = 100.0;
        assert!(timer.poll(&mut run, &tuning).is_empty());
        assert_eq!(run.level, 1);
    }

    #[test]
    fn test_long_frame_catches_up() {
        let tuning = Tuning::default();
        let mut run = RunState::new(&tuning);
        let mut timer = LevelUpTimer::new();
        timer.arm(0.0, &tuning);
        run.elapsed = 31.0;
        assert_eq!(timer.poll(&mut run, &tuning), vec![2, 3]);
    }

    #[test]
    fn test_notification_dismisses() {
        let mut banner = Notification::new("Level 2!", 0.5);
        assert!(banner.tick(0.3));
        assert!(!banner.tick(0.3));
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotonic(l1 in 1u32..200, delta in 0u32..200) {
            let tuning = Tuning::default();
            let l2 = l1 + delta;
            prop_assert!(obstacle_interval_ms(l2, &tuning) <= obstacle_interval_ms(l1, &tuning));
            prop_assert!(level_speed_factor(l2, &tuning) >= level_speed_factor(l1, &tuning));
            prop_assert!(extra_obstacle_chance(l2, &tuning) >= extra_obstacle_chance(l1, &tuning));

            let mut run1 = RunState::new(&tuning);
            run1.level = l1;
            let mut run2 = run1.clone();
            run2.level = l2;
            prop_assert!(entity_speed(&run2, 1.3, &tuning) >= entity_speed(&run1, 1.3, &tuning));
        }
    }
}
