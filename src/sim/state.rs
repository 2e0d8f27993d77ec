//! Game state and core simulation types
//!
//! One `GameState` instance owns the score, the timers, and the live drop
//! set, so everything a session touches is cancelled and reset together.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::difficulty::{Difficulty, DifficultyProfile};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session in progress (initial state, or after a manual stop)
    Idle,
    /// Session in progress
    Running,
    /// Session ended by the countdown reaching zero
    Ended,
}

/// How a finished session came out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

/// The two kinds of falling drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Catching raises the score
    Good,
    /// Catching lowers the score
    Bad,
}

impl DropKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropKind::Good => "good",
            DropKind::Bad => "bad",
        }
    }
}

/// A falling drop entity
///
/// `pos.x` is the horizontal center, `pos.y` the top edge; `pos.y` only
/// ever increases while the drop is alive.
#[derive(Debug, Clone)]
pub struct Drop {
    pub id: u32,
    pub kind: DropKind,
    pub pos: Vec2,
    /// Fall speed in px/s
    pub speed: f32,
}

/// The player-controlled bucket
#[derive(Debug, Clone)]
pub struct Catcher {
    /// Horizontal center, clamped to the play area
    pub x: f32,
    pub half_width: f32,
}

/// Play-area dimensions in pixels
#[derive(Debug, Clone, Copy)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    /// Substitute safe minimums while the container is not yet measurable
    pub fn measured(width: f32, height: f32) -> Self {
        Self {
            width: if width > 0.0 { width } else { MIN_PLAY_WIDTH },
            height: if height > 0.0 { height } else { MIN_PLAY_HEIGHT },
        }
    }
}

/// A periodic timer as pure accumulator data
///
/// `advance` returns how many times the cadence fired during the elapsed
/// span. Cancelling an already-cancelled or never-armed cadence is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Cadence {
    period: f32,
    elapsed: f32,
    armed: bool,
}

impl Cadence {
    pub fn arm(&mut self, period_secs: f32) {
        self.period = period_secs;
        self.elapsed = 0.0;
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance by `dt` seconds, returning the number of fires
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.armed || self.period <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fires = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fires += 1;
        }
        fires
    }
}

/// Events emitted toward the rendering and display surfaces, drained once
/// per frame by the frontend
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    DropSpawned {
        id: u32,
        kind: DropKind,
        x: f32,
        y: f32,
    },
    DropCollected {
        id: u32,
        kind: DropKind,
        clicked: bool,
    },
    /// Fell past the exit margin without being caught - no score effect
    DropExpired { id: u32 },
    /// All live drops removed at once (session start/stop)
    DropsCleared,
    ScoreChanged(u32),
    TimeChanged(u32),
    PhaseChanged {
        phase: GamePhase,
        outcome: Option<Outcome>,
    },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Whole seconds remaining in the running session
    pub time_left: u32,
    /// Tier selected in the UI; takes effect on the next start
    pub selected: Difficulty,
    /// Profile captured at start - selection changes never retroactively
    /// alter a running session
    pub active_profile: DifficultyProfile,
    pub outcome: Option<Outcome>,
    /// Live drops, ordered by id
    pub drops: Vec<Drop>,
    pub catcher: Catcher,
    pub play_area: PlayArea,
    pub spawn_cadence: Cadence,
    pub countdown: Cadence,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh Idle state with the given seed
    pub fn new(seed: u64) -> Self {
        let selected = Difficulty::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            time_left: selected.profile().duration_secs,
            selected,
            active_profile: selected.profile(),
            outcome: None,
            drops: Vec::new(),
            catcher: Catcher {
                x: MIN_PLAY_WIDTH / 2.0,
                half_width: CATCHER_HALF_WIDTH,
            },
            play_area: PlayArea::measured(0.0, 0.0),
            spawn_cadence: Cadence::default(),
            countdown: Cadence::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the pending events for the rendering/display surfaces
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clamp and store the catcher center (input surface entry point)
    pub fn set_catcher_x(&mut self, x: f32) {
        let half = self.catcher.half_width;
        let max = (self.play_area.width - half).max(half);
        self.catcher.x = x.clamp(half, max);
    }

    pub fn set_catcher_half_width(&mut self, half: f32) {
        self.catcher.half_width = half.max(1.0);
        self.set_catcher_x(self.catcher.x);
    }

    /// Re-measure the play area; the catcher is re-clamped so it stays inside
    pub fn set_play_area(&mut self, width: f32, height: f32) {
        self.play_area = PlayArea::measured(width, height);
        self.set_catcher_x(self.catcher.x);
    }

    /// Remove every live drop, with no score effect
    pub fn clear_drops(&mut self) {
        if !self.drops.is_empty() {
            self.drops.clear();
            self.push_event(GameEvent::DropsCleared);
        }
    }
}
