//! Bucketfall entry point
//!
//! Wires the DOM rendering/display surfaces and the input events to the
//! simulation core, and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlElement, HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use bucketfall::consts::*;
    use bucketfall::difficulty::Difficulty;
    use bucketfall::sim::{DropKind, GameEvent, GamePhase, GameState, Outcome, TickInput, tick};

    /// Required DOM collaborators; missing any of them is fatal at startup
    struct Surfaces {
        container: HtmlElement,
        catcher: HtmlElement,
        score: Element,
        time: Element,
        status: Element,
        start_btn: Element,
        difficulty: HtmlSelectElement,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        last_time: f64,
        surfaces: Surfaces,
        drop_nodes: HashMap<u32, HtmlElement>,
    }

    impl Game {
        fn new(seed: u64, surfaces: Surfaces) -> Self {
            Self {
                state: GameState::new(seed),
                input: TickInput::default(),
                last_time: 0.0,
                surfaces,
                drop_nodes: HashMap::new(),
            }
        }

        /// Re-measure the play area and the catcher element
        fn measure(&mut self) {
            let w = self.surfaces.container.client_width() as f32;
            let h = self.surfaces.container.client_height() as f32;
            self.state.set_play_area(w, h);
            let half = (self.surfaces.catcher.client_width() as f32 / 2.0).max(1.0);
            self.state.set_catcher_half_width(half);
        }

        fn center_catcher(&mut self) {
            let mid = self.state.play_area.width / 2.0;
            self.state.set_catcher_x(mid);
        }

        /// Pointer client-x to play-area coordinates
        fn pointer_x(&self, client_x: f32) -> f32 {
            let rect = self.surfaces.container.get_bounding_client_rect();
            client_x - rect.left() as f32
        }

        /// Run one simulation step for this frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let input = self.input.clone();
            tick(&mut self.state, &input, dt.min(MAX_FRAME_DT));

            // Clear one-shot inputs after processing
            self.input.toggle = false;
            self.input.collect = None;
        }
    }

    /// Push the current drop and catcher positions into the DOM
    fn sync_positions(g: &Game) {
        for drop in &g.state.drops {
            if let Some(node) = g.drop_nodes.get(&drop.id) {
                let _ = node
                    .style()
                    .set_property("top", &format!("{}px", drop.pos.y));
            }
        }
        let _ = g
            .surfaces
            .catcher
            .style()
            .set_property("left", &format!("{}px", g.state.catcher.x));
    }

    /// Status line showing the selected mode and its goal
    fn show_mode_line(g: &Game) {
        let profile = g.state.selected.profile();
        let line = format!(
            "Mode: {} - Reach {} points to win.",
            g.state.selected.as_str(),
            profile.win_goal
        );
        g.surfaces.status.set_text_content(Some(&line));
        if g.state.phase != GamePhase::Running {
            g.surfaces
                .time
                .set_text_content(Some(&profile.duration_secs.to_string()));
        }
    }

    /// Create the element for a newly spawned drop
    fn spawn_drop_node(game: &Rc<RefCell<Game>>, id: u32, kind: DropKind, x: f32, y: f32) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Ok(el) = document.create_element("div") else {
            return;
        };
        el.set_class_name(&format!("drop {}", kind.as_str()));
        let Ok(node) = el.dyn_into::<HtmlElement>() else {
            return;
        };

        let style = node.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{}px", x - DROP_WIDTH / 2.0));
        let _ = style.set_property("top", &format!("{}px", y));

        // Tap a drop directly for the clicked bonus/penalty
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                game.borrow_mut().input.collect = Some(id);
            });
            let _ = node.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let mut g = game.borrow_mut();
        let _ = g.surfaces.container.append_child(&node);
        g.drop_nodes.insert(id, node);
    }

    /// Brief "pop" transition, then teardown
    fn retire_drop_node(node: HtmlElement) {
        node.set_class_name(&format!("{} pop", node.class_name()));
        let window = web_sys::window().unwrap();
        let el = node.clone();
        let closure = Closure::once(move || el.remove());
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            240,
        );
        closure.forget();
    }

    /// Apply the frame's drained events to the rendering/display surfaces
    fn apply_events(game: &Rc<RefCell<Game>>, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::DropSpawned { id, kind, x, y } => {
                    spawn_drop_node(game, id, kind, x, y);
                }
                GameEvent::DropCollected { id, .. } => {
                    if let Some(node) = game.borrow_mut().drop_nodes.remove(&id) {
                        retire_drop_node(node);
                    }
                }
                GameEvent::DropExpired { id } => {
                    if let Some(node) = game.borrow_mut().drop_nodes.remove(&id) {
                        node.remove();
                    }
                }
                GameEvent::DropsCleared => {
                    let mut g = game.borrow_mut();
                    for (_, node) in g.drop_nodes.drain() {
                        node.remove();
                    }
                }
                GameEvent::ScoreChanged(score) => {
                    let g = game.borrow();
                    g.surfaces
                        .score
                        .set_text_content(Some(&score.to_string()));
                }
                GameEvent::TimeChanged(secs) => {
                    let g = game.borrow();
                    g.surfaces.time.set_text_content(Some(&secs.to_string()));
                }
                GameEvent::PhaseChanged { phase, outcome } => {
                    let g = game.borrow();
                    match phase {
                        GamePhase::Running => {
                            g.surfaces.status.set_text_content(Some("Game running..."));
                            g.surfaces.start_btn.set_text_content(Some("Stop"));
                        }
                        GamePhase::Idle => {
                            g.surfaces.status.set_text_content(Some("Stopped"));
                            g.surfaces.start_btn.set_text_content(Some("Start Game"));
                        }
                        GamePhase::Ended => {
                            let goal = g.state.active_profile.win_goal;
                            let message = match outcome {
                                Some(Outcome::Win) => format!(
                                    "You Win! Score {} - {} required.",
                                    g.state.score, goal
                                ),
                                _ => {
                                    format!("Time's up. Score {}. Try again.", g.state.score)
                                }
                            };
                            g.surfaces.status.set_text_content(Some(&message));
                            g.surfaces.start_btn.set_text_content(Some("Start Game"));
                        }
                    }
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bucketfall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let Some(surfaces) = find_surfaces(&document) else {
            // Refuse to run with partial wiring; every later step assumes
            // the surfaces exist
            if let Some(el) = document.get_element_by_id("status") {
                el.set_text_content(Some("Error: missing game elements (see console)."));
            }
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, surfaces)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            g.measure();
            g.center_catcher();
            show_mode_line(&g);
            g.surfaces.score.set_text_content(Some("0"));
        }

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Bucketfall running!");
    }

    /// Look up every required DOM collaborator, logging each one missing
    fn find_surfaces(document: &Document) -> Option<Surfaces> {
        fn require(document: &Document, id: &str) -> Option<Element> {
            let el = document.get_element_by_id(id);
            if el.is_none() {
                log::error!("missing required #{id} element; check index.html");
            }
            el
        }

        let container = require(document, "play-area")?.dyn_into::<HtmlElement>().ok()?;
        let catcher = require(document, "catcher")?.dyn_into::<HtmlElement>().ok()?;
        let score = require(document, "score")?;
        let time = require(document, "time")?;
        let status = require(document, "status")?;
        let start_btn = require(document, "start-btn")?;
        let difficulty = require(document, "difficulty")?
            .dyn_into::<HtmlSelectElement>()
            .ok()?;

        Some(Surfaces {
            container,
            catcher,
            score,
            time,
            status,
            start_btn,
            difficulty,
        })
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let container = game.borrow().surfaces.container.clone();
        let start_btn = game.borrow().surfaces.start_btn.clone();
        let select = game.borrow().surfaces.difficulty.clone();

        // Mouse move steers the catcher
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.pointer_x(event.client_x() as f32);
                g.input.target_x = Some(x);
            });
            let _ = container
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.pointer_x(touch.client_x() as f32);
                    g.input.target_x = Some(x);
                }
            });
            let _ = container
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Arrow keys step the catcher
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase != GamePhase::Running {
                    return;
                }
                let x = g.state.catcher.x;
                match event.key().as_str() {
                    "ArrowLeft" => g.input.target_x = Some(x - KEY_STEP),
                    "ArrowRight" => g.input.target_x = Some(x + KEY_STEP),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start button toggles the session
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.toggle = true;
            });
            let _ = start_btn
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Difficulty selection takes effect on the next start but updates
        // the displayed expectations right away
        {
            let game = game.clone();
            let select_el = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.state.selected = Difficulty::from_name(&select_el.value());
                show_mode_line(&g);
            });
            let _ = select
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize re-measures the play area and re-centers the catcher
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.measure();
                g.center_catcher();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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
        let events = {
            let mut g = game.borrow_mut();
            g.update(time);
            g.state.drain_events()
        };
        apply_events(&game, &events);
        sync_positions(&game.borrow());

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bucketfall (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: one scripted session where the catcher chases the lowest
/// good drop each frame
#[cfg(not(target_arch = "wasm32"))]
fn demo_session() {
    use bucketfall::sim::{DropKind, GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(0xB0CA7);
    state.set_play_area(480.0, 480.0);

    tick(
        &mut state,
        &TickInput {
            toggle: true,
            ..Default::default()
        },
        0.0,
    );

    let dt = 1.0 / 60.0;
    while state.phase == GamePhase::Running {
        let target = state
            .drops
            .iter()
            .filter(|d| d.kind == DropKind::Good)
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|d| d.pos.x);

        let input = TickInput {
            target_x: target,
            ..Default::default()
        };
        tick(&mut state, &input, dt);
        state.drain_events();
    }

    println!(
        "final score: {} (goal {}, outcome {:?})",
        state.score,
        state.active_profile.win_goal,
        state.outcome
    );
}
