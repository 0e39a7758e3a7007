use std::fmt;

/// Failures that stop the page from starting a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ShellError {
    NoWindow,
    MissingElement(&'static str),
    ImageLoad(String),
    Js(String),
}

impl ShellError {
    /// Short code shown by the boot overlay.
    pub(crate) fn code(&self) -> &'static str {
        match self {
            ShellError::NoWindow => "no_window",
            ShellError::MissingElement(_) => "missing_element",
            ShellError::ImageLoad(_) => "image_load",
            ShellError::Js(_) => "js_error",
        }
    }

    pub(crate) fn hint(&self) -> &'static str {
        match self {
            ShellError::NoWindow | ShellError::Js(_) => "Reload the page.",
            ShellError::MissingElement(_) => "The page markup is incomplete.",
            ShellError::ImageLoad(_) => "Check that the puzzle image is reachable.",
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::NoWindow => write!(f, "no browser window"),
            ShellError::MissingElement(id) => write!(f, "missing #{id} element"),
            ShellError::ImageLoad(src) => write!(f, "could not load image {src}"),
            ShellError::Js(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ShellError {}

impl From<wasm_bindgen::JsValue> for ShellError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ShellError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}
