//! Drop Catch - a bucket-and-drops arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling physics, collision,
//!   scoring, level state machine)
//! - `presenter`: Presentation adapter seam consumed by the platform glue
//!
//! The simulation never touches the DOM; the wasm entry point in `main.rs`
//! drives it from timer callbacks and mirrors its events into the page.

pub mod presenter;
pub mod sim;

pub use presenter::{NullPresenter, Presenter, present};

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (logical pixels)
    pub const PLAY_AREA_WIDTH: f32 = 480.0;
    pub const PLAY_AREA_HEIGHT: f32 = 500.0;
    /// Falling objects are evaluated and removed at this height
    pub const CATCH_LINE_Y: f32 = PLAY_AREA_HEIGHT - 50.0;

    /// Bucket defaults
    pub const BUCKET_ORIGINAL_WIDTH: f32 = 80.0;
    pub const BUCKET_MIN_WIDTH: f32 = 40.0;
    /// Shrink applied per stone hit (floored, never below min width)
    pub const BUCKET_SHRINK_FACTOR: f32 = 0.85;

    /// Drops and stones share the same sprite width
    pub const OBJECT_WIDTH: f32 = 32.0;

    /// Drop catch test: |bucket.position - drop.x| must be strictly below this
    pub const CATCH_TOLERANCE: f32 = 50.0;

    /// Horizontal step for one keyboard move
    pub const KEY_STEP: f32 = 20.0;

    /// Timer periods (milliseconds)
    pub const SPAWN_INTERVAL_MS: f64 = 700.0;
    pub const FALL_INTERVAL_MS: f64 = 30.0;
    pub const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;

    /// Fall step per tick, by level
    pub const FALL_STEP_LEVEL_ONE: f32 = 5.0;
    pub const FALL_STEP_LEVEL_TWO: f32 = 8.0;

    /// Round length in seconds
    pub const ROUND_SECONDS: u32 = 30;

    /// Score deltas and the level-2 gate
    pub const CLEAN_DROP_SCORE: i32 = 10;
    pub const DIRTY_DROP_SCORE: i32 = -10;
    pub const LEVEL_UP_SCORE: i32 = 200;

    /// Spawn probabilities
    pub const CLEAN_PROBABILITY: f64 = 0.7;
    pub const STONE_PROBABILITY: f64 = 0.2;

    /// Cosmetic shake duration after a stone hit (milliseconds)
    pub const SHAKE_DURATION_MS: i32 = 400;
}
