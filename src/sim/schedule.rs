//! Tick scheduler
//!
//! Converts elapsed wall-clock time into discrete, tagged tick events for
//! the three independent timers: spawn (700 ms), fall (30 ms) and
//! countdown (1000 ms). Each emitted event carries the session generation
//! it was scheduled under; `apply_tick` drops events whose generation no
//! longer matches, so a timer that outlives its round can never mutate
//! retired state.

use crate::consts::{COUNTDOWN_INTERVAL_MS, FALL_INTERVAL_MS, SPAWN_INTERVAL_MS};

use super::state::GameSession;

/// Which periodic action a tick belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Create one drop (and maybe a stone at level 2)
    Spawn,
    /// Advance every live object and resolve the catch line
    Fall,
    /// Decrement the round countdown
    Countdown,
}

/// A scheduled tick, stamped with the generation it targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub kind: TickKind,
    pub generation: u32,
}

/// Cap on time fed into one advance, so a backgrounded tab does not replay
/// seconds of ticks in a burst when it wakes
const MAX_ELAPSED_MS: f64 = 250.0;

/// Accumulator-based scheduler for the three game timers
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    running: bool,
    generation: u32,
    spawn_acc: f64,
    fall_acc: f64,
    countdown_acc: f64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timers against the session's current generation
    pub fn start(&mut self, session: &GameSession) {
        self.running = true;
        self.generation = session.generation;
        self.spawn_acc = 0.0;
        self.fall_acc = 0.0;
        self.countdown_acc = 0.0;
    }

    /// Disarm all three timers
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Account for `elapsed_ms` of wall time and emit every tick that came
    /// due. Ticks of one kind are strictly ordered; ordering across kinds
    /// within a single call is unspecified by contract (here: fall, spawn,
    /// countdown).
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<TickEvent> {
        let mut ticks = Vec::new();
        if !self.running || elapsed_ms <= 0.0 {
            return ticks;
        }
        let elapsed = elapsed_ms.min(MAX_ELAPSED_MS);

        Self::drain(&mut self.fall_acc, elapsed, FALL_INTERVAL_MS, TickKind::Fall, self.generation, &mut ticks);
        Self::drain(&mut self.spawn_acc, elapsed, SPAWN_INTERVAL_MS, TickKind::Spawn, self.generation, &mut ticks);
        Self::drain(&mut self.countdown_acc, elapsed, COUNTDOWN_INTERVAL_MS, TickKind::Countdown, self.generation, &mut ticks);
        ticks
    }

    fn drain(
        acc: &mut f64,
        elapsed: f64,
        period: f64,
        kind: TickKind,
        generation: u32,
        out: &mut Vec<TickEvent>,
    ) {
        *acc += elapsed;
        while *acc >= period {
            *acc -= period;
            out.push(TickEvent { kind, generation });
        }
    }
}
