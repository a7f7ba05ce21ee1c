//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only (the scheduler converts wall time to tick events)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{drop_caught, stone_hits_bucket};
pub use schedule::{Scheduler, TickEvent, TickKind};
pub use state::{
    Bucket, FallingObject, GameSession, Level, ObjectKind, Outcome, SessionEvent, Status,
};
pub use tick::apply_tick;
