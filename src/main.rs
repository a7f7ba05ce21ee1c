//! Drop Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! wasm build wires the DOM presenter, input listeners and buttons; the
//! native build runs a headless demo round through the same scheduler.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use drop_catch::consts::*;
    use drop_catch::presenter::{Presenter, present};
    use drop_catch::sim::{GameSession, ObjectKind, Outcome, Scheduler, SessionEvent, apply_tick};

    // The confetti library is loaded globally by the page; guard so a
    // missing script degrades to no effect instead of a JS error.
    #[wasm_bindgen(inline_js = "
        export function fire_confetti() {
            if (typeof confetti === 'function') {
                confetti({ particleCount: 100, spread: 70, origin: { y: 0.6 } });
            }
        }
    ")]
    extern "C" {
        fn fire_confetti();
    }

    /// DOM-backed presenter: score/time text, the bucket element, one div
    /// per falling object keyed by entity id, popup and overlay toggles.
    struct DomPresenter {
        document: Document,
        game_area: HtmlElement,
        bucket: HtmlElement,
        score_display: Element,
        time_display: Element,
        objects: HashMap<u32, HtmlElement>,
    }

    impl DomPresenter {
        fn new(document: Document) -> Self {
            let game_area: HtmlElement = document
                .get_element_by_id("game-area")
                .expect("no #game-area")
                .dyn_into()
                .expect("#game-area is not an element");
            let bucket: HtmlElement = document
                .get_element_by_id("bucket")
                .expect("no #bucket")
                .dyn_into()
                .expect("#bucket is not an element");
            let score_display = document.get_element_by_id("score").expect("no #score");
            let time_display = document.get_element_by_id("time").expect("no #time");
            Self {
                document,
                game_area,
                bucket,
                score_display,
                time_display,
                objects: HashMap::new(),
            }
        }

        /// Show or hide an optional element by id; missing ids are fine
        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let display = if visible { "block" } else { "none" };
                    let _ = el.style().set_property("display", display);
                }
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn object_class(kind: ObjectKind) -> &'static str {
            match kind {
                ObjectKind::CleanDrop => "drop clean",
                ObjectKind::DirtyDrop => "drop dirty",
                ObjectKind::Stone => "stone",
            }
        }
    }

    impl Presenter for DomPresenter {
        fn render_score(&mut self, value: i32) {
            self.score_display.set_text_content(Some(&value.to_string()));
        }

        fn render_time(&mut self, value: u32) {
            self.time_display.set_text_content(Some(&value.to_string()));
        }

        fn render_bucket(&mut self, position: f32, width: f32) {
            let style = self.bucket.style();
            let _ = style.set_property("left", &format!("{position}px"));
            let _ = style.set_property("width", &format!("{width}px"));
        }

        fn render_object(&mut self, id: u32, kind: ObjectKind, x: f32, y: f32) {
            let el = match self.objects.get(&id) {
                Some(el) => el.clone(),
                None => {
                    let el: HtmlElement = self
                        .document
                        .create_element("div")
                        .expect("create div")
                        .dyn_into()
                        .expect("div is an element");
                    el.set_class_name(Self::object_class(kind));
                    let _ = self.game_area.append_child(&el);
                    self.objects.insert(id, el.clone());
                    el
                }
            };
            let style = el.style();
            let _ = style.set_property("left", &format!("{x}px"));
            let _ = style.set_property("top", &format!("{y}px"));
        }

        fn remove_object(&mut self, id: u32) {
            if let Some(el) = self.objects.remove(&id) {
                el.remove();
            }
        }

        fn show_shake_feedback(&mut self) {
            let _ = self.bucket.class_list().add_1("bucket-shake");
            let bucket = self.bucket.clone();
            let closure = Closure::once(move || {
                let _ = bucket.class_list().remove_1("bucket-shake");
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    SHAKE_DURATION_MS,
                );
            }
            closure.forget();
        }

        fn show_end_screen(&mut self, outcome: Outcome, score: i32) {
            self.set_text("final-score", &score.to_string());
            self.set_visible("popup", true);
            // Variant widgets per outcome
            self.set_visible("popup-score", outcome != Outcome::Completion);
            self.set_visible("next-level-btn", outcome == Outcome::Success);
            self.set_visible("fail-message", outcome == Outcome::Failure);
            self.set_visible("restart-btn", outcome != Outcome::Completion);
            self.set_visible("completion-message", outcome == Outcome::Completion);
            self.set_visible("restart-btn-level2", outcome == Outcome::Completion);
        }

        fn hide_end_screen(&mut self) {
            self.set_visible("popup", false);
        }

        fn show_start_overlay(&mut self) {
            if let Some(el) = self.document.get_element_by_id("start-overlay") {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let _ = el.style().set_property("display", "flex");
                }
            }
        }

        fn hide_start_overlay(&mut self) {
            self.set_visible("start-overlay", false);
        }

        fn trigger_celebration_effect(&mut self) {
            fire_confetti();
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        scheduler: Scheduler,
        presenter: DomPresenter,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, presenter: DomPresenter) -> Self {
            Self {
                session: GameSession::new(seed),
                scheduler: Scheduler::new(),
                presenter,
                last_time: 0.0,
            }
        }

        /// Mirror events into the DOM and keep the scheduler in step with
        /// round transitions.
        fn apply(&mut self, events: Vec<SessionEvent>) {
            for event in &events {
                match event {
                    SessionEvent::RoundStarted { .. } => self.scheduler.start(&self.session),
                    SessionEvent::RoundEnded { .. } => self.scheduler.stop(),
                    _ => {}
                }
            }
            present(&events, &mut self.presenter);
        }

        /// One animation frame: feed elapsed time to the scheduler and
        /// apply every tick that came due.
        fn pump(&mut self, now: f64) {
            let elapsed = if self.last_time > 0.0 {
                now - self.last_time
            } else {
                0.0
            };
            self.last_time = now;

            for tick in self.scheduler.advance(elapsed) {
                let events = apply_tick(&mut self.session, tick);
                self.apply(events);
            }
        }

        /// Pointer x in page coordinates, converted to play-area space
        fn pointer_to_area_x(&self, client_x: f32) -> f32 {
            let area_left = self.presenter.game_area.get_bounding_client_rect().left() as f32;
            client_x - area_left
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drop Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let mut presenter = DomPresenter::new(document.clone());
        presenter.show_start_overlay();

        let game = Rc::new(RefCell::new(Game::new(seed, presenter)));
        log::info!("Game initialized with seed: {seed}");

        setup_input_handlers(game.clone());
        setup_buttons(&document, game.clone());

        request_animation_frame(game);

        log::info!("Drop Catch running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard: arrow keys move the bucket by a fixed step
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let events = match event.key().as_str() {
                    "ArrowLeft" => g.session.move_bucket_by(-KEY_STEP),
                    "ArrowRight" => g.session.move_bucket_by(KEY_STEP),
                    _ => return,
                };
                g.apply(events);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse: bucket centers under the pointer
        {
            let game = game.clone();
            let area = game.borrow().presenter.game_area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.pointer_to_area_x(event.client_x() as f32);
                let events = g.session.move_bucket_to(x);
                g.apply(events);
            });
            let _ = area
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: same as mouse, first touch point
        {
            let game = game.clone();
            let area = game.borrow().presenter.game_area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.pointer_to_area_x(touch.client_x() as f32);
                    let events = g.session.move_bucket_to(x);
                    g.apply(events);
                }
            });
            let _ = area
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Start button on the overlay
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let events = g.session.start_game();
                g.apply(events);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart buttons (level-1 popup and level-2 popup) reset to level 1
        for id in ["restart-btn", "restart-btn-level2"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    let events = g.session.restart();
                    g.apply(events);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Next-level button; the session guards eligibility
        if let Some(btn) = document.get_element_by_id("next-level-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let events = g.session.advance_level();
                g.apply(events);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().pump(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use drop_catch::presenter::{NullPresenter, present};
    use drop_catch::sim::{GameSession, Scheduler, SessionEvent, Status, apply_tick};
    use rand::Rng;

    env_logger::init();
    log::info!("Drop Catch (native) starting...");
    log::info!("Native mode is headless - build with trunk for the web version");

    // Run one unattended round so the full loop is exercised natively
    let seed: u64 = rand::rng().random();
    let mut session = GameSession::new(seed);
    let mut scheduler = Scheduler::new();
    let mut presenter = NullPresenter;

    let events = session.start_game();
    scheduler.start(&session);
    present(&events, &mut presenter);

    // Simulated 60 fps clock; the countdown ends the round after 30 ticks
    let mut frames = 0u32;
    while session.status == Status::Playing && frames < 10_000 {
        for tick in scheduler.advance(1000.0 / 60.0) {
            let events = apply_tick(&mut session, tick);
            if events
                .iter()
                .any(|e| matches!(e, SessionEvent::RoundEnded { .. }))
            {
                scheduler.stop();
            }
            present(&events, &mut presenter);
        }
        frames += 1;
    }

    log::info!(
        "demo round over: seed {}, outcome {:?}, score {}",
        seed,
        session.outcome(),
        session.score
    );
}
