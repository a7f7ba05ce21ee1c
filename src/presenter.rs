//! Presentation adapter seam
//!
//! The simulation reports what happened through [`SessionEvent`]s; a
//! [`Presenter`] owns how that looks. The wasm glue implements it over the
//! DOM; tests and the native headless demo use [`NullPresenter`].

use crate::sim::{ObjectKind, Outcome, SessionEvent};

/// Everything the page needs to mirror a game session
pub trait Presenter {
    fn render_score(&mut self, value: i32);
    fn render_time(&mut self, value: u32);
    fn render_bucket(&mut self, position: f32, width: f32);
    /// Create-or-update a falling object by id
    fn render_object(&mut self, id: u32, kind: ObjectKind, x: f32, y: f32);
    fn remove_object(&mut self, id: u32);
    /// Transient cue after a stone hit; fire-and-forget
    fn show_shake_feedback(&mut self);
    fn show_end_screen(&mut self, outcome: Outcome, score: i32);
    fn hide_end_screen(&mut self);
    fn show_start_overlay(&mut self);
    fn hide_start_overlay(&mut self);
    /// Called only on a Success outcome
    fn trigger_celebration_effect(&mut self);
}

/// Map session events onto presenter calls.
///
/// `RoundStarted` clears both overlays; `RoundEnded` picks the end screen
/// and fires the celebration effect on Success.
pub fn present(events: &[SessionEvent], presenter: &mut dyn Presenter) {
    for event in events {
        match *event {
            SessionEvent::RoundStarted { .. } => {
                presenter.hide_start_overlay();
                presenter.hide_end_screen();
            }
            SessionEvent::ScoreChanged(score) => presenter.render_score(score),
            SessionEvent::TimeChanged(time) => presenter.render_time(time),
            SessionEvent::BucketChanged { position, width } => {
                presenter.render_bucket(position, width);
            }
            SessionEvent::BucketShaken => presenter.show_shake_feedback(),
            SessionEvent::ObjectSpawned { id, kind, x, y }
            | SessionEvent::ObjectMoved { id, kind, x, y } => {
                presenter.render_object(id, kind, x, y);
            }
            SessionEvent::ObjectRemoved { id } => presenter.remove_object(id),
            SessionEvent::RoundEnded { outcome, score } => {
                presenter.show_end_screen(outcome, score);
                if outcome == Outcome::Success {
                    presenter.trigger_celebration_effect();
                }
            }
        }
    }
}

/// Presenter that discards everything; for headless runs and tests
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_score(&mut self, _value: i32) {}
    fn render_time(&mut self, _value: u32) {}
    fn render_bucket(&mut self, _position: f32, _width: f32) {}
    fn render_object(&mut self, _id: u32, _kind: ObjectKind, _x: f32, _y: f32) {}
    fn remove_object(&mut self, _id: u32) {}
    fn show_shake_feedback(&mut self) {}
    fn show_end_screen(&mut self, outcome: Outcome, score: i32) {
        log::debug!("end screen: {outcome:?}, score {score}");
    }
    fn hide_end_screen(&mut self) {}
    fn show_start_overlay(&mut self) {}
    fn hide_start_overlay(&mut self) {}
    fn trigger_celebration_effect(&mut self) {}
}
