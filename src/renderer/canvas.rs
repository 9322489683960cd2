//! Canvas 2D backend (wasm only)

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;

const MENU_FONT: &str = "12px Arial";
const TEXT_COLOR: &str = "#000000";

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap the canvas' 2D context, `None` if the browser refuses one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, viewport: Vec2) {
        self.ctx.clear_rect(0.0, 0.0, viewport.x as f64, viewport.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_err()
        {
            log::warn!("arc rejected at {} r={}", center, radius);
        }
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        self.ctx.close_path();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn text(&mut self, origin: Vec2, text: &str) {
        self.ctx.set_font(MENU_FONT);
        self.ctx.set_fill_style_str(TEXT_COLOR);
        if self.ctx.fill_text(text, origin.x as f64, origin.y as f64).is_err() {
            log::warn!("fill_text rejected '{}' at {}", text, origin);
        }
    }

    fn stroke(&mut self, path: &[Vec2], width: f32, color: &str) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke();
    }
}
