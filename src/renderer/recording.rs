//! In-memory surface that records draw commands
//!
//! Used by tests and by the headless native binary.

use glam::Vec2;

use super::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Vec2),
    FillCircle { center: Vec2, radius: f32, color: String },
    FillRect { origin: Vec2, size: Vec2, color: String },
    Text { origin: Vec2, text: String },
    Stroke { path: Vec<Vec2>, width: f32, color: String },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    /// Number of `clear` calls seen, i.e. frames drawn
    frames: u64,
}

impl RecordingSurface {
    /// Commands since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Filled circles of the current frame as (center, radius, color)
    pub fn circles(&self) -> Vec<(Vec2, f32, String)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { center, radius, color } => Some((*center, *radius, color.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, viewport: Vec2) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(viewport));
        self.frames += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color: color.to_string(),
        });
    }

    fn text(&mut self, origin: Vec2, text: &str) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
        });
    }

    fn stroke(&mut self, path: &[Vec2], width: f32, color: &str) {
        self.commands.push(DrawCommand::Stroke {
            path: path.to_vec(),
            width,
            color: color.to_string(),
        });
    }
}
