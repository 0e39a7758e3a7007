#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod app_core;
mod boot;
#[cfg(target_arch = "wasm32")]
mod canvas_app;
mod error;
mod input;
#[cfg(target_arch = "wasm32")]
mod puzzle_image;
#[cfg(target_arch = "wasm32")]
mod renderer;

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        if let Err(error) = canvas_app::run() {
            gloo::console::error!(format!("startup failed: {error}"));
            boot::fail(&error);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("yosegi only runs in the browser; build for wasm32-unknown-unknown");
    }
}
