use std::cell::Cell;

use web_sys::{DomRect, Element, HtmlCanvasElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Mouse,
    Touch,
    Pen,
    Unknown,
}

impl PointerKind {
    pub(crate) fn from_pointer_type(value: &str) -> Self {
        match value {
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Unknown,
        }
    }

    /// Mouse presses only start a drag with the main button.
    pub(crate) fn accepts_button(self, button: i16) -> bool {
        match self {
            PointerKind::Mouse => button == 0,
            _ => true,
        }
    }
}

/// Bounding box of an element in client (CSS viewport) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ClientBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&DomRect> for ClientBox {
    fn from(rect: &DomRect) -> Self {
        Self {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }
}

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for HtmlCanvasElement {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

impl HasClientRect for Element {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

/// Maps a client-space point onto the surface's logical coordinate space.
/// The element box is normally exactly the logical size; page zoom or CSS
/// scaling are absorbed by the ratio.
pub(crate) fn client_to_surface(
    client_x: f64,
    client_y: f64,
    bounds: ClientBox,
    logical_width: f64,
    logical_height: f64,
) -> Option<(f64, f64)> {
    if !(bounds.width > 0.0 && bounds.height > 0.0) {
        return None;
    }
    let x = (client_x - bounds.left) * logical_width / bounds.width;
    let y = (client_y - bounds.top) * logical_height / bounds.height;
    Some((x, y))
}

pub(crate) fn screen_to_canvas_coords(
    client_x: f64,
    client_y: f64,
    element: &impl HasClientRect,
    logical_width: f64,
    logical_height: f64,
) -> Option<(f64, f64)> {
    let rect = element.client_rect();
    client_to_surface(
        client_x,
        client_y,
        ClientBox::from(&rect),
        logical_width,
        logical_height,
    )
}

/// Tracks whether a touch sequence began on the canvas so page scrolling
/// can be suppressed until every finger lifts.
#[derive(Debug, Default)]
pub(crate) struct TouchScrollGuard {
    active: Cell<bool>,
}

impl TouchScrollGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&self) {
        self.active.set(true);
    }

    pub(crate) fn end(&self) {
        self.active.set(false);
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn should_block(&self, target_in_canvas: bool) -> bool {
        self.active.get() || target_in_canvas
    }
}
