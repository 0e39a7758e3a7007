use crate::grid::{BoardSpec, GridPos};

pub const VIEWPORT_WIDTH_RATIO: f64 = 0.95;
pub const VIEWPORT_WIDTH_MAX: f64 = 1400.0;
pub const VIEWPORT_HEIGHT_RATIO: f64 = 0.78;
pub const VIEWPORT_HEIGHT_MAX: f64 = 1200.0;
pub const CELL_SIZE_MIN: f64 = 28.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Derived pixel layout of the board. All logical values are CSS pixels;
/// the backing buffer is `pixel_ratio` times larger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub cell: f64,
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: u32,
    pub buffer_width: u32,
    pub buffer_height: u32,
    pub zone_x: f64,
    pub zone_y: f64,
    pub zone_width: f64,
    pub zone_height: f64,
}

pub fn compute_geometry(spec: &BoardSpec, viewport: Viewport) -> Geometry {
    let cols = spec.cols.max(1) as f64;
    let rows = spec.rows.max(1) as f64;
    let max_width = (viewport.width.max(0.0) * VIEWPORT_WIDTH_RATIO).min(VIEWPORT_WIDTH_MAX);
    let max_height = (viewport.height.max(0.0) * VIEWPORT_HEIGHT_RATIO).min(VIEWPORT_HEIGHT_MAX);
    let cell = (max_width / cols).min(max_height / rows).floor().max(CELL_SIZE_MIN);
    let pixel_ratio = pixel_ratio_for(viewport.device_pixel_ratio);
    let width = cols * cell;
    let height = rows * cell;
    let zone_origin = spec.zone_origin();
    Geometry {
        cell,
        width,
        height,
        pixel_ratio,
        buffer_width: (width as u32).saturating_mul(pixel_ratio),
        buffer_height: (height as u32).saturating_mul(pixel_ratio),
        zone_x: zone_origin.gx as f64 * cell,
        zone_y: zone_origin.gy as f64 * cell,
        zone_width: spec.zone_cols as f64 * cell,
        zone_height: spec.zone_rows as f64 * cell,
    }
}

fn pixel_ratio_for(device_pixel_ratio: f64) -> u32 {
    if !device_pixel_ratio.is_finite() {
        return 1;
    }
    device_pixel_ratio.floor().max(1.0) as u32
}

impl Geometry {
    pub fn cell_origin(&self, pos: GridPos) -> (f64, f64) {
        (pos.gx as f64 * self.cell, pos.gy as f64 * self.cell)
    }

    /// Keeps a tile's top-left corner such that the whole tile stays on the
    /// board.
    pub fn clamp_tile_origin(&self, x: f64, y: f64) -> (f64, f64) {
        let max_x = (self.width - self.cell).max(0.0);
        let max_y = (self.height - self.cell).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    pub fn nearest_cell(&self, x: f64, y: f64) -> GridPos {
        GridPos::new(
            (x / self.cell).round() as i32,
            (y / self.cell).round() as i32,
        )
    }
}
