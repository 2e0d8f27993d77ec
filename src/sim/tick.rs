//! Per-frame simulation step and session state machine
//!
//! A single `tick` call advances everything periodic in a session: the
//! spawn cadence, the one-second countdown, and the motion & collision
//! step. Session transitions live here too, so both cadences are always
//! armed and cancelled together.

use super::collision::{catcher_box, drop_box};
use super::spawn::spawn_drop;
use super::state::{DropKind, GameEvent, GamePhase, GameState, Outcome};
use crate::consts::{EXIT_MARGIN, MIN_SPAWN_INTERVAL_MS};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target catcher center (pointer/touch/keyboard)
    pub target_x: Option<f32>,
    /// Start/stop toggle (the start button)
    pub toggle: bool,
    /// Drop the player clicked or tapped directly this frame
    pub collect: Option<u32>,
}

/// Advance the game by `dt` seconds
///
/// Outside of Running this only services the toggle; a stale frame fired
/// after a stop cannot touch session state.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.toggle {
        match state.phase {
            GamePhase::Running => stop(state),
            GamePhase::Idle | GamePhase::Ended => start(state),
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    if let Some(x) = input.target_x {
        state.set_catcher_x(x);
    }

    if let Some(id) = input.collect {
        collect(state, id, true);
    }

    for _ in 0..state.countdown.advance(dt) {
        if state.time_left > 0 {
            state.time_left -= 1;
            state.push_event(GameEvent::TimeChanged(state.time_left));
        }
        if state.time_left == 0 {
            end(state);
            return;
        }
    }

    for _ in 0..state.spawn_cadence.advance(dt) {
        spawn_drop(state);
    }

    motion_step(state, dt);
}

/// Begin a new session with the currently selected difficulty
///
/// Resets score and remaining time, clears the play area, arms both
/// cadences. The first drop spawns immediately so the area is never empty.
pub fn start(state: &mut GameState) {
    let profile = state.selected.profile();
    state.active_profile = profile;
    state.outcome = None;
    state.score = 0;
    state.time_left = profile.duration_secs;
    state.clear_drops();

    let interval_ms = profile.spawn_interval_ms.max(MIN_SPAWN_INTERVAL_MS);
    state.spawn_cadence.arm(interval_ms as f32 / 1000.0);
    state.countdown.arm(1.0);
    state.phase = GamePhase::Running;

    state.push_event(GameEvent::ScoreChanged(0));
    state.push_event(GameEvent::TimeChanged(state.time_left));
    state.push_event(GameEvent::PhaseChanged {
        phase: GamePhase::Running,
        outcome: None,
    });
    log::info!(
        "session started: {} (goal {})",
        state.selected.as_str(),
        profile.win_goal
    );

    spawn_drop(state);
}

/// Halt the session: cancel both cadences, clear the play area, go Idle
///
/// Safe to call repeatedly; a second call changes nothing.
pub fn stop(state: &mut GameState) {
    state.spawn_cadence.cancel();
    state.countdown.cancel();
    state.clear_drops();
    if state.phase == GamePhase::Running {
        state.phase = GamePhase::Idle;
        state.push_event(GameEvent::PhaseChanged {
            phase: GamePhase::Idle,
            outcome: None,
        });
        log::info!("session stopped at score {}", state.score);
    }
}

/// Countdown expiry: stop mechanics plus the win/lose outcome
pub fn end(state: &mut GameState) {
    state.spawn_cadence.cancel();
    state.countdown.cancel();
    state.clear_drops();

    let outcome = if state.score >= state.active_profile.win_goal {
        Outcome::Win
    } else {
        Outcome::Lose
    };
    state.outcome = Some(outcome);
    state.phase = GamePhase::Ended;
    state.push_event(GameEvent::PhaseChanged {
        phase: GamePhase::Ended,
        outcome: Some(outcome),
    });
    log::info!("session ended: {:?} at score {}", outcome, state.score);
}

/// Apply a collection; clicked drops reward and punish harder than drops
/// caught by overlap
fn collect(state: &mut GameState, id: u32, clicked: bool) {
    let Some(idx) = state.drops.iter().position(|d| d.id == id) else {
        return;
    };
    let drop = state.drops.remove(idx);
    match drop.kind {
        DropKind::Good => state.score += if clicked { 2 } else { 1 },
        DropKind::Bad => {
            state.score = state.score.saturating_sub(if clicked { 1 } else { 2 });
        }
    }
    state.push_event(GameEvent::DropCollected {
        id,
        kind: drop.kind,
        clicked,
    });
    state.push_event(GameEvent::ScoreChanged(state.score));
}

/// Advance every live drop, expire those past the exit margin, collect
/// those overlapping the catcher
fn motion_step(state: &mut GameState, dt: f32) {
    let floor = state.play_area.height + EXIT_MARGIN;
    let catcher = catcher_box(&state.catcher, &state.play_area);

    let mut expired = Vec::new();
    let mut caught = Vec::new();
    for drop in &mut state.drops {
        drop.pos.y += drop.speed * dt;
        if drop.pos.y > floor {
            // Missed good drops and avoided bad drops expire silently
            expired.push(drop.id);
        } else if drop_box(drop).overlaps(&catcher) {
            caught.push(drop.id);
        }
    }

    for id in expired {
        if let Some(idx) = state.drops.iter().position(|d| d.id == id) {
            state.drops.remove(idx);
            state.push_event(GameEvent::DropExpired { id });
        }
    }
    for id in caught {
        collect(state, id, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CATCHER_HEIGHT, DROP_HEIGHT};
    use crate::difficulty::Difficulty;
    use crate::sim::state::Drop;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// A Running state on the Normal profile with a 480x480 play area
    fn running_state() -> GameState {
        let mut state = GameState::new(12345);
        state.set_play_area(480.0, 480.0);
        tick(
            &mut state,
            &TickInput {
                toggle: true,
                ..Default::default()
            },
            0.0,
        );
        state
    }

    /// Insert a drop of the given kind hovering right above the catcher
    fn plant_drop(state: &mut GameState, kind: DropKind) -> u32 {
        let id = state.next_entity_id();
        let y = state.play_area.height - CATCHER_HEIGHT - DROP_HEIGHT;
        state.drops.push(Drop {
            id,
            kind,
            pos: Vec2::new(state.catcher.x, y - 1.0),
            speed: 120.0,
        });
        id
    }

    #[test]
    fn test_start_resets_and_spawns_immediately() {
        let mut state = running_state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 30);
        assert_eq!(state.drops.len(), 1);
        assert!(state.spawn_cadence.is_armed());
        assert!(state.countdown.is_armed());

        // Restart after an end wipes the previous session's numbers
        state.score = 77;
        end(&mut state);
        tick(
            &mut state,
            &TickInput {
                toggle: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 30);
        assert_eq!(state.drops.len(), 1);
    }

    #[test]
    fn test_toggle_while_running_stops() {
        let mut state = running_state();
        tick(
            &mut state,
            &TickInput {
                toggle: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.drops.is_empty());
        assert!(!state.spawn_cadence.is_armed());
        assert!(!state.countdown.is_armed());
    }

    #[test]
    fn test_one_interval_yields_two_drops() {
        // Normal profile: 700ms spawn interval. The immediate spawn plus
        // one interval-triggered spawn.
        let mut state = running_state();
        assert_eq!(state.drops.len(), 1);
        tick(&mut state, &TickInput::default(), 0.7);
        assert_eq!(state.drops.len(), 2);
    }

    #[test]
    fn test_good_drop_caught_by_overlap_scores_one() {
        let mut state = running_state();
        state.drops.clear();
        plant_drop(&mut state, DropKind::Good);
        state.spawn_cadence.cancel();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 1);
        assert!(state.drops.is_empty());
    }

    #[test]
    fn test_good_drop_clicked_scores_two() {
        let mut state = running_state();
        state.drops.clear();
        state.spawn_cadence.cancel();
        let id = state.next_entity_id();
        state.drops.push(Drop {
            id,
            kind: DropKind::Good,
            pos: Vec2::new(100.0, 50.0),
            speed: 30.0,
        });
        tick(
            &mut state,
            &TickInput {
                collect: Some(id),
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.score, 2);
        assert!(state.drops.is_empty());
    }

    #[test]
    fn test_bad_drop_caught_clamps_at_zero() {
        let mut state = running_state();
        state.drops.clear();
        state.spawn_cadence.cancel();
        state.score = 1;
        plant_drop(&mut state, DropKind::Bad);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 0);

        state.score = 5;
        plant_drop(&mut state, DropKind::Bad);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_bad_drop_clicked_costs_one() {
        let mut state = running_state();
        state.drops.clear();
        state.spawn_cadence.cancel();
        state.score = 5;
        let id = state.next_entity_id();
        state.drops.push(Drop {
            id,
            kind: DropKind::Bad,
            pos: Vec2::new(100.0, 50.0),
            speed: 30.0,
        });
        tick(
            &mut state,
            &TickInput {
                collect: Some(id),
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_expiry_past_margin_is_silent() {
        let mut state = running_state();
        state.drops.clear();
        state.spawn_cadence.cancel();
        state.score = 10;
        let id = state.next_entity_id();
        // Off to the side so it cannot touch the catcher on the way down
        state.drops.push(Drop {
            id,
            kind: DropKind::Good,
            pos: Vec2::new(20.0, state.play_area.height + EXIT_MARGIN),
            speed: 120.0,
        });
        state.drain_events();
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.drops.is_empty());
        assert_eq!(state.score, 10);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::DropExpired { id }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreChanged(_))));
    }

    #[test]
    fn test_countdown_expiry_ends_with_outcome() {
        let mut state = running_state();
        state.score = 250;
        tick(&mut state, &TickInput::default(), 30.0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.outcome, Some(Outcome::Win));
        assert_eq!(state.time_left, 0);
        assert!(state.drops.is_empty());

        // Lose side of the same goal (Normal: 200)
        let mut state = running_state();
        state.score = 150;
        tick(&mut state, &TickInput::default(), 30.0);
        assert_eq!(state.outcome, Some(Outcome::Lose));
    }

    #[test]
    fn test_stop_twice_matches_stop_once() {
        let mut state = running_state();
        stop(&mut state);
        let phase = state.phase;
        let drops = state.drops.len();
        let time_left = state.time_left;
        state.drain_events();

        stop(&mut state);
        assert_eq!(state.phase, phase);
        assert_eq!(state.drops.len(), drops);
        assert_eq!(state.time_left, time_left);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_stale_frame_after_stop_is_inert() {
        let mut state = running_state();
        stop(&mut state);
        let before = format!("{:?}", state.drops);
        tick(&mut state, &TickInput::default(), 5.0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(format!("{:?}", state.drops), before);
        assert_eq!(state.time_left, 30);
    }

    #[test]
    fn test_selection_change_only_applies_on_next_start() {
        let mut state = running_state();
        state.selected = Difficulty::Hard;
        tick(&mut state, &TickInput::default(), DT);
        // still the Normal session that was captured at start
        assert_eq!(state.active_profile.win_goal, 200);

        stop(&mut state);
        tick(
            &mut state,
            &TickInput {
                toggle: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(state.active_profile.win_goal, 400);
        assert_eq!(state.time_left, 20);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        a.set_play_area(480.0, 480.0);
        b.set_play_area(480.0, 480.0);

        let inputs = [
            TickInput {
                toggle: true,
                ..Default::default()
            },
            TickInput {
                target_x: Some(120.0),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                target_x: Some(300.0),
                ..Default::default()
            },
        ];
        for input in &inputs {
            tick(&mut a, input, 0.4);
            tick(&mut b, input, 0.4);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.drops.len(), b.drops.len());
        for (da, db) in a.drops.iter().zip(b.drops.iter()) {
            assert_eq!(da.id, db.id);
            assert_eq!(da.kind, db.kind);
            assert_eq!(da.pos, db.pos);
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A drop's vertical position never decreases while it lives
            #[test]
            fn drop_fall_is_monotone(dts in prop::collection::vec(0.0f32..0.25, 1..60)) {
                let mut state = running_state();
                let id = state.drops[0].id;
                let mut last_y = state.drops[0].pos.y;
                for dt in dts {
                    tick(&mut state, &TickInput::default(), dt);
                    match state.drops.iter().find(|d| d.id == id) {
                        Some(d) => {
                            prop_assert!(d.pos.y >= last_y);
                            last_y = d.pos.y;
                        }
                        None => break, // collected or expired
                    }
                }
            }

            /// Stopping always empties the registry, whatever happened before
            #[test]
            fn stop_always_clears(seed in 0u64..u64::MAX, dts in prop::collection::vec(0.0f32..1.0, 0..40)) {
                let mut state = GameState::new(seed);
                state.set_play_area(480.0, 480.0);
                tick(&mut state, &TickInput { toggle: true, ..Default::default() }, 0.0);
                for dt in dts {
                    tick(&mut state, &TickInput::default(), dt);
                }
                stop(&mut state);
                prop_assert!(state.drops.is_empty());
                prop_assert!(!state.spawn_cadence.is_armed());
                prop_assert!(!state.countdown.is_armed());
            }
        }
    }
}
