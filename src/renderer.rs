use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use yosegi_core::layout::Geometry;
use yosegi_core::scene::{
    RoundRect, Scene, TileSprite, DRAG_SHADOW_BLUR_RATIO, DRAG_SHADOW_COLOR, GRID_LINE_COLOR,
    GRID_LINE_WIDTH, TILE_BORDER_COLOR, TILE_BORDER_WIDTH, ZONE_LINE_WIDTH, ZONE_STROKE_COLOR,
};

const TILE_PLACEHOLDER_FILL: &str = "#e7e2d8";
const MESSAGE_FILL: &str = "#8a1f1f";
const MESSAGE_FONT: &str = "16px sans-serif";

/// Paints a `Scene` onto a 2D canvas. Each call redraws the whole frame.
pub(crate) struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        canvas.style().set_property("touch-action", "none")?;
        Ok(Self { canvas, ctx })
    }

    pub(crate) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Matches the CSS box to the logical size and the backing buffer to
    /// the device pixel ratio, then maps drawing units back to logical
    /// pixels.
    pub(crate) fn apply_geometry(&self, geometry: &Geometry) -> Result<(), JsValue> {
        if self.canvas.width() != geometry.buffer_width {
            self.canvas.set_width(geometry.buffer_width);
        }
        if self.canvas.height() != geometry.buffer_height {
            self.canvas.set_height(geometry.buffer_height);
        }
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", geometry.width))?;
        style.set_property("height", &format!("{}px", geometry.height))?;
        let ratio = geometry.pixel_ratio.max(1) as f64;
        self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
    }

    pub(crate) fn render(
        &self,
        geometry: &Geometry,
        scene: &Scene,
        image: Option<&HtmlImageElement>,
    ) -> Result<(), JsValue> {
        self.apply_geometry(geometry)?;
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, scene.width, scene.height);

        ctx.set_stroke_style_str(GRID_LINE_COLOR);
        ctx.set_line_width(GRID_LINE_WIDTH);
        ctx.begin_path();
        for line in &scene.grid_lines {
            ctx.move_to(line.x0, line.y0);
            ctx.line_to(line.x1, line.y1);
        }
        ctx.stroke();

        ctx.set_stroke_style_str(ZONE_STROKE_COLOR);
        ctx.set_line_width(ZONE_LINE_WIDTH);
        round_rect_path(ctx, &scene.zone);
        ctx.stroke();

        for sprite in &scene.tiles {
            self.draw_tile(sprite, image, geometry.cell)?;
        }
        Ok(())
    }

    fn draw_tile(
        &self,
        sprite: &TileSprite,
        image: Option<&HtmlImageElement>,
        cell: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        if sprite.dragging {
            ctx.set_shadow_color(DRAG_SHADOW_COLOR);
            ctx.set_shadow_blur(cell * DRAG_SHADOW_BLUR_RATIO);
            ctx.set_shadow_offset_y(cell * DRAG_SHADOW_BLUR_RATIO * 0.5);
        }
        ctx.set_fill_style_str(TILE_PLACEHOLDER_FILL);
        round_rect_path(ctx, &sprite.frame);
        ctx.fill();
        ctx.set_shadow_color("transparent");
        ctx.clip();
        let drawn = match (image, sprite.source) {
            (Some(image), Some(source)) => ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    image,
                    source.sx,
                    source.sy,
                    source.sw,
                    source.sh,
                    sprite.frame.x,
                    sprite.frame.y,
                    sprite.frame.width,
                    sprite.frame.height,
                ),
            _ => Ok(()),
        };
        ctx.restore();
        drawn?;

        ctx.set_stroke_style_str(TILE_BORDER_COLOR);
        ctx.set_line_width(TILE_BORDER_WIDTH);
        round_rect_path(ctx, &sprite.border);
        ctx.stroke();
        Ok(())
    }

    /// Replaces the board with a centered error line.
    pub(crate) fn draw_message(&self, geometry: &Geometry, message: &str) -> Result<(), JsValue> {
        self.apply_geometry(geometry)?;
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, geometry.width, geometry.height);
        ctx.set_fill_style_str(MESSAGE_FILL);
        ctx.set_font(MESSAGE_FONT);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text_with_max_width(
            message,
            geometry.width * 0.5,
            geometry.height * 0.5,
            geometry.width * 0.9,
        )
    }
}

fn round_rect_path(ctx: &CanvasRenderingContext2d, rect: &RoundRect) {
    let r = rect.effective_radius();
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + r);
    ctx.line_to(x + w, y + h - r);
    ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    ctx.line_to(x + r, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
}
