//! Draw-command rendering
//!
//! The table never touches pixels. Each frame it issues a short list of draw
//! commands to a [`Surface`] supplied by the platform.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

use crate::interaction::{Controller, SwatchMenu, menu};
use crate::sim::World;

/// Colors for table chrome
pub mod colors {
    pub const MENU_BACKGROUND: &str = "#f1f1f1";
    pub const MENU_BORDER: &str = "#000000";
    pub const AIM_LINE: &str = "#333333";
}

/// Width of the aim line stroke
pub const AIM_LINE_WIDTH: f32 = 2.0;

/// A 2D drawing surface
pub trait Surface {
    /// Wipe the whole viewport
    fn clear(&mut self, viewport: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: &str);
    /// Menu text, drawn in the surface's default font and ink
    fn text(&mut self, origin: Vec2, text: &str);
    /// Polyline through `path`
    fn stroke(&mut self, path: &[Vec2], width: f32, color: &str);
}

/// Draw the table as it stands after this frame's ticks
///
/// Balls are drawn in enumeration order. The open swatch menu is drawn right
/// after its ball, and the aim line on top of everything.
pub fn draw_frame<S: Surface + ?Sized>(surface: &mut S, world: &World, controller: &Controller) {
    surface.clear(world.arena.size());

    let menu_ball = controller.menu_ball();
    for ball in world.balls() {
        surface.fill_circle(ball.pos, ball.radius(), &ball.color);

        if menu_ball == Some(ball.id) {
            let menu = SwatchMenu::anchored(ball, controller.palette().len());
            draw_menu(surface, &menu, controller.palette());
        }
    }

    if let Some(aim) = controller.aim() {
        if let Some(ball) = world.ball(aim.ball) {
            let pull = aim.pull();
            if pull != Vec2::ZERO {
                surface.stroke(&[ball.pos, ball.pos + pull], AIM_LINE_WIDTH, colors::AIM_LINE);
            }
        }
    }
}

fn draw_menu<S: Surface + ?Sized>(surface: &mut S, menu: &SwatchMenu, palette: &[String]) {
    surface.fill_rect(menu.origin, menu.size, colors::MENU_BACKGROUND);

    let o = menu.origin;
    let far = o + menu.size;
    let border = [o, Vec2::new(far.x, o.y), far, Vec2::new(o.x, far.y), o];
    surface.stroke(&border, 1.0, colors::MENU_BORDER);

    surface.text(menu.title_origin(), menu::MENU_TITLE);

    for (i, color) in palette.iter().enumerate() {
        surface.fill_rect(menu.swatch_origin(i), Vec2::splat(menu::SWATCH_SIZE), color);
    }
}
