use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlImageElement;

use yosegi_core::ImageSize;

type ReadyCallback = Box<dyn FnOnce(&HtmlImageElement, ImageSize)>;
type ErrorCallback = Box<dyn FnOnce(String)>;

struct LoadCallbacks {
    on_ready: Option<ReadyCallback>,
    on_error: Option<ErrorCallback>,
}

impl LoadCallbacks {
    /// Runs whichever outcome arrives first; later signals find nothing.
    fn settle_ready(&mut self, image: &HtmlImageElement) {
        self.on_error = None;
        let Some(on_ready) = self.on_ready.take() else {
            return;
        };
        let size = ImageSize::new(image.natural_width(), image.natural_height());
        on_ready(image, size);
    }

    fn settle_error(&mut self, src: &str) {
        self.on_ready = None;
        if let Some(on_error) = self.on_error.take() {
            on_error(src.to_string());
        }
    }
}

fn is_decoded(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0 && image.natural_height() > 0
}

/// Starts loading `src`. `on_ready` runs exactly once with the natural
/// size, whether the image arrives through `load` or was already complete
/// when the handlers were attached; `on_error` runs instead on failure.
pub(crate) fn load_puzzle_image<R, E>(
    src: &str,
    on_ready: R,
    on_error: E,
) -> Result<HtmlImageElement, JsValue>
where
    R: FnOnce(&HtmlImageElement, ImageSize) + 'static,
    E: FnOnce(String) + 'static,
{
    let image = HtmlImageElement::new()?;
    let callbacks = Rc::new(RefCell::new(LoadCallbacks {
        on_ready: Some(Box::new(on_ready)),
        on_error: Some(Box::new(on_error)),
    }));

    let onload = Closure::once({
        let callbacks = Rc::clone(&callbacks);
        let image = image.clone();
        move || callbacks.borrow_mut().settle_ready(&image)
    });
    let onerror = Closure::once({
        let callbacks = Rc::clone(&callbacks);
        let src = src.to_string();
        move || callbacks.borrow_mut().settle_error(&src)
    });
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    image.set_src(src);
    if is_decoded(&image) {
        callbacks.borrow_mut().settle_ready(&image);
    }
    Ok(image)
}
