//! Inline color swatch menu geometry
//!
//! Shared by the renderer (what to draw) and the controller (what a press hit).

use glam::Vec2;

use crate::sim::Ball;

pub const MENU_MIN_WIDTH: f32 = 100.0;
pub const MENU_HEIGHT: f32 = 50.0;
pub const MENU_PADDING: f32 = 10.0;
pub const SWATCH_SIZE: f32 = 20.0;
/// Swatch row offset from the menu top
pub const SWATCH_ROW_OFFSET: f32 = 30.0;
/// Title baseline offset from the menu top
pub const TITLE_OFFSET: f32 = 20.0;
pub const MENU_TITLE: &str = "Select Color";

/// Menu rectangle anchored above a ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwatchMenu {
    pub origin: Vec2,
    pub size: Vec2,
    pub swatches: usize,
}

impl SwatchMenu {
    /// Menu for `ball` with one swatch per palette entry
    pub fn anchored(ball: &Ball, swatches: usize) -> Self {
        let width = MENU_MIN_WIDTH.max(2.0 * MENU_PADDING + swatches as f32 * SWATCH_SIZE);
        let origin = Vec2::new(ball.pos.x - width / 2.0, ball.pos.y - ball.radius() - MENU_HEIGHT);
        Self {
            origin,
            size: Vec2::new(width, MENU_HEIGHT),
            swatches,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }

    pub fn title_origin(&self) -> Vec2 {
        self.origin + Vec2::new(MENU_PADDING, TITLE_OFFSET)
    }

    /// Top-left corner of swatch `index`
    pub fn swatch_origin(&self, index: usize) -> Vec2 {
        self.origin + Vec2::new(MENU_PADDING + index as f32 * SWATCH_SIZE, SWATCH_ROW_OFFSET)
    }

    /// Which swatch lies under `point`
    pub fn swatch_at(&self, point: Vec2) -> Option<usize> {
        (0..self.swatches).find(|&i| {
            let min = self.swatch_origin(i);
            let max = min + Vec2::splat(SWATCH_SIZE);
            point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
        })
    }
}
