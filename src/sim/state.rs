//! Game session state and core simulation types
//!
//! A single [`GameSession`] owns everything mutable: score, countdown, level,
//! bucket, live falling objects and the seeded RNG. Lifecycle operations
//! bump the session generation so tick events scheduled against an older
//! round are dropped instead of mutating retired state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Before the first start, showing the start overlay
    Idle,
    /// Round in progress, timers running
    Playing,
    /// Round finished, end screen up
    Ended,
}

/// Difficulty/content level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    One,
    Two,
}

impl Level {
    /// Vertical step applied to every live object on a fall tick
    pub fn fall_step(self) -> f32 {
        match self {
            Level::One => FALL_STEP_LEVEL_ONE,
            Level::Two => FALL_STEP_LEVEL_TWO,
        }
    }

    /// Stones only exist at level 2
    pub fn spawns_stones(self) -> bool {
        self == Level::Two
    }
}

/// End-of-round category, the only signal the presenter needs to pick an
/// end-screen variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Level 1 cleared the score gate; level 2 is on offer
    Success,
    /// Level 1 missed the score gate
    Failure,
    /// Level 2 finished (any score)
    Completion,
}

/// Falling object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    CleanDrop,
    DirtyDrop,
    Stone,
}

impl ObjectKind {
    pub fn is_drop(self) -> bool {
        matches!(self, ObjectKind::CleanDrop | ObjectKind::DirtyDrop)
    }

    /// Score applied when a drop lands in the bucket (stones never score)
    pub fn score_delta(self) -> i32 {
        match self {
            ObjectKind::CleanDrop => CLEAN_DROP_SCORE,
            ObjectKind::DirtyDrop => DIRTY_DROP_SCORE,
            ObjectKind::Stone => 0,
        }
    }
}

/// A falling entity. `pos.x` is fixed at spawn; `pos.y` grows every fall
/// tick until the catch line removes it.
#[derive(Debug, Clone, Copy)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec2,
}

/// The player's bucket
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// Left edge offset within the play area
    pub position: f32,
    /// Current width, shrinks on stone hits
    pub width: f32,
}

impl Default for Bucket {
    fn default() -> Self {
        Self::centered()
    }
}

impl Bucket {
    /// Full-width bucket centered in the play area
    pub fn centered() -> Self {
        Self {
            position: (PLAY_AREA_WIDTH - BUCKET_ORIGINAL_WIDTH) / 2.0,
            width: BUCKET_ORIGINAL_WIDTH,
        }
    }

    /// Largest legal left-edge position for the current width
    pub fn max_position(&self) -> f32 {
        PLAY_AREA_WIDTH - self.width
    }

    /// Apply one stone hit. Returns true if the width actually changed.
    pub fn shrink(&mut self) -> bool {
        let new_width = (self.width * BUCKET_SHRINK_FACTOR)
            .floor()
            .max(BUCKET_MIN_WIDTH);
        let changed = new_width < self.width;
        self.width = new_width;
        changed
    }
}

/// State change notifications for the presentation adapter.
///
/// Emitted by lifecycle operations and tick application; the `present`
/// dispatcher maps them onto `Presenter` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    RoundStarted { level: Level },
    ScoreChanged(i32),
    TimeChanged(u32),
    BucketChanged { position: f32, width: f32 },
    /// Transient shake cue after a stone hit, purely cosmetic
    BucketShaken,
    ObjectSpawned { id: u32, kind: ObjectKind, x: f32, y: f32 },
    ObjectMoved { id: u32, kind: ObjectKind, x: f32, y: f32 },
    ObjectRemoved { id: u32 },
    RoundEnded { outcome: Outcome, score: i32 },
}

/// The sole mutable shared state of a running game
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Seed for reproducibility
    pub seed: u64,
    pub score: i32,
    /// Seconds left, counts down from 30
    pub time_remaining: u32,
    pub level: Level,
    pub status: Status,
    pub bucket: Bucket,
    /// Live falling objects, ordered by spawn (ascending id)
    pub objects: Vec<FallingObject>,
    /// Seeded RNG, sole source of randomness
    pub rng: Pcg32,
    /// Bumped on every transition; stale tick events are dropped against it
    pub generation: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameSession {
    /// Create an idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            time_remaining: ROUND_SECONDS,
            level: Level::One,
            status: Status::Idle,
            bucket: Bucket::centered(),
            objects: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// First start from the overlay. No-op unless Idle.
    pub fn start_game(&mut self) -> Vec<SessionEvent> {
        if self.status != Status::Idle {
            return Vec::new();
        }
        self.begin_round()
    }

    /// Reset to level 1 and play again. Valid from any status, and
    /// idempotent: two calls in a row land in the same reset state.
    pub fn restart(&mut self) -> Vec<SessionEvent> {
        self.level = Level::One;
        self.begin_round()
    }

    /// Move on to level 2. Only valid at the Ended moment of a level-1
    /// round that cleared the score gate; silent no-op otherwise.
    pub fn advance_level(&mut self) -> Vec<SessionEvent> {
        if self.status != Status::Ended
            || self.level != Level::One
            || self.score < LEVEL_UP_SCORE
        {
            return Vec::new();
        }
        self.level = Level::Two;
        self.begin_round()
    }

    /// Enter Playing: fresh score and countdown, full centered bucket, no
    /// live objects, new generation.
    fn begin_round(&mut self) -> Vec<SessionEvent> {
        let mut events = self.clear_objects();
        self.score = 0;
        self.time_remaining = ROUND_SECONDS;
        self.bucket = Bucket::centered();
        self.generation += 1;
        self.status = Status::Playing;

        log::info!("round started: level {:?}, generation {}", self.level, self.generation);

        events.push(SessionEvent::RoundStarted { level: self.level });
        events.push(SessionEvent::ScoreChanged(self.score));
        events.push(SessionEvent::TimeChanged(self.time_remaining));
        events.push(SessionEvent::BucketChanged {
            position: self.bucket.position,
            width: self.bucket.width,
        });
        events
    }

    /// Enter Ended: discard live objects, invalidate outstanding timers,
    /// report the outcome category.
    pub(crate) fn end_round(&mut self) -> Vec<SessionEvent> {
        let mut events = self.clear_objects();
        self.status = Status::Ended;
        self.generation += 1;

        let outcome = self.outcome();
        log::info!("round ended: level {:?}, score {}, outcome {:?}", self.level, self.score, outcome);

        events.push(SessionEvent::RoundEnded {
            outcome,
            score: self.score,
        });
        events
    }

    /// Outcome category for the current level and score
    pub fn outcome(&self) -> Outcome {
        match self.level {
            Level::Two => Outcome::Completion,
            Level::One if self.score >= LEVEL_UP_SCORE => Outcome::Success,
            Level::One => Outcome::Failure,
        }
    }

    /// Discrete keyboard move, left or right by a fixed step. No-op unless
    /// Playing.
    pub fn move_bucket_by(&mut self, delta: f32) -> Vec<SessionEvent> {
        if self.status != Status::Playing {
            return Vec::new();
        }
        self.set_bucket_position(self.bucket.position + delta)
    }

    /// Absolute pointer/touch move: center the bucket under `x`. No-op
    /// unless Playing.
    pub fn move_bucket_to(&mut self, x: f32) -> Vec<SessionEvent> {
        if self.status != Status::Playing {
            return Vec::new();
        }
        self.set_bucket_position(x - self.bucket.width / 2.0)
    }

    fn set_bucket_position(&mut self, position: f32) -> Vec<SessionEvent> {
        self.bucket.position = position.clamp(0.0, self.bucket.max_position());
        vec![SessionEvent::BucketChanged {
            position: self.bucket.position,
            width: self.bucket.width,
        }]
    }

    fn clear_objects(&mut self) -> Vec<SessionEvent> {
        self.objects
            .drain(..)
            .map(|o| SessionEvent::ObjectRemoved { id: o.id })
            .collect()
    }
}
