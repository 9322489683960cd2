//! Start-of-round ball layouts
//!
//! The rack is a triangle of rows stacked upward from near the bottom rail,
//! row `i` holding `i + 1` balls. Colors come from a seeded RNG so a given
//! seed always racks the same table.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Arena, LayoutEntry};
use crate::consts::{PALETTE, RACK_BOTTOM_MARGIN, RACK_LAYERS, RACK_RADII};

/// Produces the balls for a new round
pub trait LayoutGenerator {
    fn generate(&mut self, arena: &Arena) -> Vec<LayoutEntry>;
}

/// Triangle rack
#[derive(Debug, Clone)]
pub struct RackLayout {
    pub layers: u32,
    /// Radius of ball `j` within a row cycles through this list
    pub radii: Vec<f32>,
    pub palette: Vec<String>,
    rng: Pcg32,
}

impl RackLayout {
    pub fn new(seed: u64) -> Self {
        Self {
            layers: RACK_LAYERS,
            radii: RACK_RADII.to_vec(),
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_radii(mut self, radii: Vec<f32>) -> Self {
        self.radii = radii;
        self
    }

    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    fn pick_color(&mut self) -> String {
        if self.palette.is_empty() {
            return "white".to_string();
        }
        let index = self.rng.random_range(0..self.palette.len());
        self.palette[index].clone()
    }
}

impl LayoutGenerator for RackLayout {
    fn generate(&mut self, arena: &Arena) -> Vec<LayoutEntry> {
        if self.radii.is_empty() {
            log::warn!("Rack has no radii configured, table stays empty");
            return Vec::new();
        }

        let max_radius = self.radii.iter().copied().fold(0.0_f32, f32::max);
        let start = Vec2::new(arena.width / 2.0, arena.height - RACK_BOTTOM_MARGIN);
        let row_spacing = 3.0_f32.sqrt() * max_radius;

        let mut entries = Vec::new();
        for i in 0..self.layers {
            for j in 0..=i {
                let radius = self.radii[j as usize % self.radii.len()];
                let pos = Vec2::new(
                    start.x - i as f32 * radius + j as f32 * max_radius * 2.0,
                    start.y - i as f32 * row_spacing,
                );
                let color = self.pick_color();
                entries.push(LayoutEntry { pos, radius, color });
            }
        }

        log::debug!("Racked {} balls in {} rows", entries.len(), self.layers);
        entries
    }
}

/// A fixed list of entries, handed out on every restart
#[derive(Debug, Clone, Default)]
pub struct FixedLayout(pub Vec<LayoutEntry>);

impl LayoutGenerator for FixedLayout {
    fn generate(&mut self, _arena: &Arena) -> Vec<LayoutEntry> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rack_is_triangular() {
        let mut rack = RackLayout::new(7);
        let entries = rack.generate(&Arena::new(900.0, 400.0));
        assert_eq!(entries.len(), 15);

        // Bottom row is a single ball centered above the bottom margin
        assert_eq!(entries[0].pos, Vec2::new(450.0, 350.0));
        assert_eq!(entries[0].radius, 15.0);
    }

    #[test]
    fn test_rack_radii_cycle_past_list_end() {
        let mut rack = RackLayout::new(7);
        let entries = rack.generate(&Arena::new(900.0, 400.0));

        // Last row has five balls, one more than the radius list
        let last_row = &entries[10..];
        let radii: Vec<_> = last_row.iter().map(|e| e.radius).collect();
        assert_eq!(radii, vec![15.0, 20.0, 25.0, 30.0, 15.0]);
        assert!(entries.iter().all(|e| e.pos.is_finite()));
    }

    #[test]
    fn test_rack_colors_are_seeded() {
        let arena = Arena::default();
        let a = RackLayout::new(42).generate(&arena);
        let b = RackLayout::new(42).generate(&arena);
        assert_eq!(a, b);
        assert!(a.iter().all(|e| PALETTE.contains(&e.color.as_str())));
    }

    #[test]
    fn test_rack_without_radii_is_empty() {
        let mut rack = RackLayout::new(1).with_radii(Vec::new());
        assert!(rack.generate(&Arena::default()).is_empty());
    }

    #[test]
    fn test_rack_with_empty_palette() {
        let mut rack = RackLayout::new(1).with_layers(2).with_palette(Vec::new());
        let entries = rack.generate(&Arena::default());
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.color == "white"));
    }
}
