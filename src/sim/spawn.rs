//! Drop spawning
//!
//! One drop per cadence fire: weighted kind draw, uniform horizontal
//! position inside the visible margins, fall speed drawn from the base
//! range and scaled by the active difficulty multiplier.

use glam::Vec2;
use rand::Rng;

use super::state::{Drop, DropKind, GameEvent, GameState};
use crate::consts::*;

/// Create one falling drop and insert it into the live set
///
/// Never fails: an unmeasured play area falls back to the safe minimum
/// width instead of rejecting the spawn.
pub fn spawn_drop(state: &mut GameState) {
    let id = state.next_entity_id();

    let kind = if state.rng.random_bool(GOOD_DROP_CHANCE) {
        DropKind::Good
    } else {
        DropKind::Bad
    };

    let width = state.play_area.width.max(MIN_PLAY_WIDTH);
    let lo = SPAWN_MARGIN;
    let hi = (width - SPAWN_MARGIN).max(lo + 1.0);
    let x = state.rng.random_range(lo..hi);

    let speed = state.rng.random_range(FALL_SPEED_MIN..FALL_SPEED_MAX)
        * state.active_profile.speed_multiplier;

    state.push_event(GameEvent::DropSpawned {
        id,
        kind,
        x,
        y: DROP_START_Y,
    });
    state.drops.push(Drop {
        id,
        kind,
        pos: Vec2::new(x, DROP_START_Y),
        speed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;

    #[test]
    fn test_spawns_inside_margins_above_the_top() {
        let mut state = GameState::new(7);
        state.set_play_area(480.0, 480.0);
        for _ in 0..100 {
            spawn_drop(&mut state);
        }
        for drop in &state.drops {
            assert!(drop.pos.x >= SPAWN_MARGIN);
            assert!(drop.pos.x <= 480.0 - SPAWN_MARGIN);
            assert_eq!(drop.pos.y, DROP_START_Y);
            assert!(drop.speed > 0.0);
        }
    }

    #[test]
    fn test_speed_scales_with_difficulty() {
        let mut state = GameState::new(7);
        state.set_play_area(480.0, 480.0);
        state.active_profile = Difficulty::Hard.profile();
        let mult = state.active_profile.speed_multiplier;
        for _ in 0..100 {
            spawn_drop(&mut state);
        }
        for drop in &state.drops {
            assert!(drop.speed >= FALL_SPEED_MIN * mult);
            assert!(drop.speed < FALL_SPEED_MAX * mult);
        }
    }

    #[test]
    fn test_zero_width_play_area_still_spawns() {
        let mut state = GameState::new(7);
        // never measured - width/height substituted with safe minimums
        spawn_drop(&mut state);
        assert_eq!(state.drops.len(), 1);
        assert!(state.drops[0].pos.x >= SPAWN_MARGIN);
    }

    #[test]
    fn test_kind_draw_is_weighted_toward_good() {
        let mut state = GameState::new(42);
        state.set_play_area(480.0, 480.0);
        for _ in 0..1000 {
            spawn_drop(&mut state);
        }
        let good = state
            .drops
            .iter()
            .filter(|d| d.kind == DropKind::Good)
            .count();
        // 0.78 weight; allow generous slack for the fixed seed
        assert!(good > 700 && good < 860, "good count was {good}");
    }
}
