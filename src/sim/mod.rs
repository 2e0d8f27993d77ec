//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, catcher_box, drop_box};
pub use spawn::spawn_drop;
pub use state::{
    Cadence, Catcher, Drop, DropKind, GameEvent, GamePhase, GameState, Outcome, PlayArea,
};
pub use tick::{TickInput, end, start, stop, tick};
