use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlImageElement, Node, PointerEvent, Window};

use yosegi_core::{DropOutcome, GameAction, Viewport, BOARD_SPEC};

use crate::app_core::{AppCore, AppSubscription, LoadState};
use crate::boot::{self, BootPhase};
use crate::error::ShellError;
use crate::input::{screen_to_canvas_coords, PointerKind, TouchScrollGuard};
use crate::puzzle_image::load_puzzle_image;
use crate::renderer::CanvasRenderer;

const CANVAS_ID: &str = "gameCanvas";
const RESTART_BUTTON_ID: &str = "restartButton";
const CHECK_BUTTON_ID: &str = "checkButton";
const SOLVED_MESSAGE: &str = "Puzzle solved!";
const UNSOLVED_MESSAGE: &str = "Not everything is in place yet.";

thread_local! {
    static CANVAS_APP: RefCell<Option<Rc<CanvasApp>>> = RefCell::new(None);
}

struct CanvasApp {
    core: Rc<AppCore>,
    window: Window,
    document: Document,
    renderer: CanvasRenderer,
    restart_button: Element,
    check_button: Element,
    image: RefCell<Option<HtmlImageElement>>,
    touch_guard: TouchScrollGuard,
    listeners: RefCell<Vec<EventListener>>,
    subscription: RefCell<Option<AppSubscription>>,
    frame_handle: RefCell<Option<AnimationFrame>>,
}

pub(crate) fn run() -> Result<(), ShellError> {
    boot::set_phase(BootPhase::Layout, "");
    let window = web_sys::window().ok_or(ShellError::NoWindow)?;
    let document = window.document().ok_or(ShellError::NoWindow)?;
    let canvas = find_element(&document, CANVAS_ID)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ShellError::MissingElement(CANVAS_ID))?;
    let restart_button = find_element(&document, RESTART_BUTTON_ID)?;
    let check_button = find_element(&document, CHECK_BUTTON_ID)?;

    let core = AppCore::new(BOARD_SPEC, read_viewport(&window));
    let app = Rc::new(CanvasApp {
        core: Rc::clone(&core),
        window,
        document,
        renderer: CanvasRenderer::new(canvas)?,
        restart_button,
        check_button,
        image: RefCell::new(None),
        touch_guard: TouchScrollGuard::new(),
        listeners: RefCell::new(Vec::new()),
        subscription: RefCell::new(None),
        frame_handle: RefCell::new(None),
    });
    *app.subscription.borrow_mut() = Some(core.subscribe(Rc::new({
        let app = Rc::clone(&app);
        move || app.queue_render()
    })));
    app.install_listeners();
    app.queue_render();
    app.start_image_load()?;
    CANVAS_APP.with(|slot| {
        *slot.borrow_mut() = Some(app);
    });
    Ok(())
}

fn find_element(document: &Document, id: &'static str) -> Result<Element, ShellError> {
    document
        .get_element_by_id(id)
        .ok_or(ShellError::MissingElement(id))
}

fn read_viewport(window: &Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    Viewport::new(width, height, window.device_pixel_ratio())
}

fn log_outcome(outcome: &DropOutcome) {
    match outcome {
        DropOutcome::Placed { tile, from, to } => {
            gloo::console::log!(format!("tile {tile} placed {from} -> {to}"));
        }
        DropOutcome::Rejected {
            tile,
            restored,
            blocked_by,
        } => {
            gloo::console::log!(format!(
                "tile {tile} blocked by {blocked_by}, back to {restored}"
            ));
        }
        DropOutcome::Cancelled { tile, restored } => {
            gloo::console::log!(format!("drag of {tile} cancelled, back to {restored}"));
        }
    }
}

impl CanvasApp {
    fn canvas(&self) -> &HtmlCanvasElement {
        self.renderer.canvas()
    }

    fn queue_render(self: &Rc<Self>) {
        if self.frame_handle.borrow().is_some() {
            return;
        }
        let app = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            app.frame_handle.borrow_mut().take();
            if let Err(err) = app.render() {
                gloo::console::error!(err);
            }
        });
        *self.frame_handle.borrow_mut() = Some(handle);
    }

    fn render(&self) -> Result<(), wasm_bindgen::JsValue> {
        let snapshot = self.core.snapshot();
        match &snapshot.load {
            LoadState::Failed(message) => self.renderer.draw_message(&snapshot.geometry, message),
            LoadState::Loading | LoadState::Ready => {
                let image = self.image.borrow();
                let image = image.as_ref().filter(|_| snapshot.load == LoadState::Ready);
                self.renderer
                    .render(&snapshot.geometry, &snapshot.scene, image)
            }
        }
    }

    fn start_image_load(self: &Rc<Self>) -> Result<(), ShellError> {
        let Some(puzzle) = self.core.choose_puzzle() else {
            let error = ShellError::ImageLoad("empty catalog".to_string());
            self.core.image_failed(error.to_string());
            return Err(error);
        };
        gloo::console::log!(format!("puzzle: {} ({})", puzzle.label, puzzle.src));
        boot::set_phase(BootPhase::LoadingImage, puzzle.label);
        let image = load_puzzle_image(
            puzzle.src,
            {
                let core = Rc::clone(&self.core);
                move |_, size| {
                    gloo::console::log!(format!("image ready {}x{}", size.width, size.height));
                    if size.is_empty() {
                        gloo::console::warn!("image reports an empty natural size");
                    }
                    core.image_loaded(size);
                    boot::ready();
                }
            },
            {
                let core = Rc::clone(&self.core);
                move |src| {
                    let error = ShellError::ImageLoad(src);
                    gloo::console::error!(error.to_string());
                    core.image_failed(error.to_string());
                    boot::fail(&error);
                }
            },
        )?;
        *self.image.borrow_mut() = Some(image);
        Ok(())
    }

    fn pointer_position(&self, event: &PointerEvent) -> Option<(f64, f64)> {
        let geometry = self.core.geometry();
        screen_to_canvas_coords(
            event.client_x() as f64,
            event.client_y() as f64,
            self.canvas(),
            geometry.width,
            geometry.height,
        )
    }

    fn on_pointer_down(&self, event: &PointerEvent) {
        let kind = PointerKind::from_pointer_type(&event.pointer_type());
        if !kind.accepts_button(event.button()) {
            return;
        }
        let Some((x, y)) = self.pointer_position(event) else {
            return;
        };
        let pointer_id = event.pointer_id();
        if self.core.begin_drag(x, y, Some(pointer_id)).is_none() {
            return;
        }
        event.prevent_default();
        let _ = self.canvas().set_pointer_capture(pointer_id);
    }

    fn on_pointer_move(&self, event: &PointerEvent) {
        if !self.core.is_dragging() {
            return;
        }
        let Some((x, y)) = self.pointer_position(event) else {
            return;
        };
        event.prevent_default();
        self.core.apply_action(GameAction::Move {
            x,
            y,
            pointer_id: Some(event.pointer_id()),
        });
    }

    fn on_pointer_up(&self, event: &PointerEvent) {
        let pointer_id = event.pointer_id();
        let Some(outcome) = self.core.drag_end(Some(pointer_id)) else {
            return;
        };
        log_outcome(&outcome);
        let canvas = self.canvas();
        if canvas.has_pointer_capture(pointer_id) {
            let _ = canvas.release_pointer_capture(pointer_id);
        }
    }

    /// `pointercancel` and `lostpointercapture` for the pointer that owns
    /// the drag both abandon it.
    fn on_pointer_lost(&self, event: &PointerEvent) {
        if self.core.active_pointer() != Some(event.pointer_id()) {
            return;
        }
        if let Some(outcome) = self.core.cancel_drag() {
            log_outcome(&outcome);
        }
    }

    fn on_resize(&self) {
        if let Some(outcome) = self.core.set_viewport(read_viewport(&self.window)) {
            log_outcome(&outcome);
        }
    }

    fn on_restart(&self) {
        if self.core.restart() {
            gloo::console::log!("board reshuffled");
        }
    }

    fn on_check(&self) {
        if self.core.load_state() != LoadState::Ready {
            return;
        }
        let solved = self.core.check();
        gloo::console::log!(format!("check: solved={solved}"));
        gloo::dialogs::alert(if solved { SOLVED_MESSAGE } else { UNSOLVED_MESSAGE });
    }

    fn target_in_canvas(&self, event: &Event) -> bool {
        let canvas: &Node = self.canvas().as_ref();
        event
            .target()
            .and_then(|target| target.dyn_into::<Node>().ok())
            .map(|node| canvas.contains(Some(&node)))
            .unwrap_or(false)
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        let active = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        };
        let passive = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: true,
        };
        let canvas = self.canvas().clone();

        let pointer_handlers: [(&'static str, fn(&CanvasApp, &PointerEvent)); 5] = [
            ("pointerdown", CanvasApp::on_pointer_down),
            ("pointermove", CanvasApp::on_pointer_move),
            ("pointerup", CanvasApp::on_pointer_up),
            ("pointercancel", CanvasApp::on_pointer_lost),
            ("lostpointercapture", CanvasApp::on_pointer_lost),
        ];
        for (name, handler) in pointer_handlers {
            let app = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &canvas,
                name,
                active,
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    handler(app.as_ref(), event);
                },
            ));
        }

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "touchstart",
            passive,
            move |_event: &Event| app.touch_guard.begin(),
        ));
        for name in ["touchend", "touchcancel"] {
            let app = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &self.document,
                name,
                passive,
                move |_event: &Event| app.touch_guard.end(),
            ));
        }
        if let Some(body) = self.document.body() {
            let app = Rc::clone(self);
            listeners.push(EventListener::new_with_options(
                &body,
                "touchmove",
                active,
                move |event: &Event| {
                    if app.touch_guard.should_block(app.target_in_canvas(event)) {
                        event.prevent_default();
                    }
                },
            ));
        }

        let app = Rc::clone(self);
        listeners.push(EventListener::new(&self.window, "resize", move |_event| {
            app.on_resize()
        }));
        let app = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.restart_button,
            "click",
            move |_event| app.on_restart(),
        ));
        let app = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.check_button,
            "click",
            move |_event| app.on_check(),
        ));

        *self.listeners.borrow_mut() = listeners;
    }
}
