//! Falling-object spawner
//!
//! All randomness flows through the session's seeded RNG: the clean/dirty
//! weighting, the level-2 stone roll and the horizontal placement. Two
//! sessions with the same seed spawn identical sequences.

use glam::Vec2;
use rand::Rng;

use crate::consts::{CLEAN_PROBABILITY, OBJECT_WIDTH, PLAY_AREA_WIDTH};

use super::state::{FallingObject, GameSession, ObjectKind, SessionEvent};

/// Spawn one drop: 70% clean, 30% dirty.
pub fn spawn_drop(session: &mut GameSession) -> SessionEvent {
    let kind = if session.rng.random_bool(CLEAN_PROBABILITY) {
        ObjectKind::CleanDrop
    } else {
        ObjectKind::DirtyDrop
    };
    spawn_object(session, kind)
}

/// Spawn one stone. Only called at level 2.
pub fn spawn_stone(session: &mut GameSession) -> SessionEvent {
    spawn_object(session, ObjectKind::Stone)
}

fn spawn_object(session: &mut GameSession, kind: ObjectKind) -> SessionEvent {
    let x = session
        .rng
        .random_range(0.0..=(PLAY_AREA_WIDTH - OBJECT_WIDTH));
    let id = session.next_entity_id();
    session.objects.push(FallingObject {
        id,
        kind,
        pos: Vec2::new(x, 0.0),
    });
    SessionEvent::ObjectSpawned { id, kind, x, y: 0.0 }
}
