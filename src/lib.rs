//! Bucketfall - catch the falling drops
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collision, session state)
//! - `difficulty`: Difficulty presets (session length, spawn cadence, speed, win goal)

pub mod difficulty;
pub mod sim;

pub use difficulty::{Difficulty, DifficultyProfile};

/// Game configuration constants
pub mod consts {
    /// Clamp on per-frame delta time so drops don't teleport after a
    /// background tab resume
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play-area fallback dimensions while the container is unmeasurable
    pub const MIN_PLAY_WIDTH: f32 = 320.0;
    pub const MIN_PLAY_HEIGHT: f32 = 480.0;

    /// Drop dimensions (matches the rendered element size)
    pub const DROP_WIDTH: f32 = 28.0;
    pub const DROP_HEIGHT: f32 = 36.0;

    /// Horizontal spawn margin keeping drops fully visible
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Drops start this far above the visible top edge
    pub const DROP_START_Y: f32 = -40.0;
    /// Drops past the play-area height plus this margin expire silently
    pub const EXIT_MARGIN: f32 = 40.0;

    /// Base fall speed range in px/s, scaled by the difficulty multiplier
    pub const FALL_SPEED_MIN: f32 = 24.0;
    pub const FALL_SPEED_MAX: f32 = 48.0;

    /// Probability that a spawned drop is good
    pub const GOOD_DROP_CHANCE: f64 = 0.78;

    /// Floor on the spawn cadence
    pub const MIN_SPAWN_INTERVAL_MS: u32 = 100;

    /// Catcher defaults - the real half-width is measured off the element
    pub const CATCHER_HALF_WIDTH: f32 = 45.0;
    pub const CATCHER_HEIGHT: f32 = 30.0;
    /// Catcher movement per arrow-key press (px)
    pub const KEY_STEP: f32 = 28.0;
}
