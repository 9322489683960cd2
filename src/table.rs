//! A complete playable table
//!
//! Ties the world, the pointer controller, the layout generator and the frame
//! clock together behind the handful of calls a platform needs.

use crate::interaction::{Controller, Outcome, PointerEvent};
use crate::renderer::{Surface, draw_frame};
use crate::scheduler::FrameClock;
use crate::settings::Settings;
use crate::sim::{LayoutGenerator, RackLayout, SimParams, TickReport, World, tick};

pub struct Table {
    world: World,
    controller: Controller,
    params: SimParams,
    layout: Box<dyn LayoutGenerator>,
    clock: FrameClock,
}

impl Table {
    /// Table with a seeded triangle rack; empty until [`Table::restart`]
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let rack = RackLayout::new(settings.seed.unwrap_or(seed))
            .with_layers(settings.rack_layers)
            .with_radii(settings.rack_radii.clone())
            .with_palette(settings.palette.clone());
        Self::with_layout(settings, Box::new(rack))
    }

    pub fn with_layout(settings: &Settings, layout: Box<dyn LayoutGenerator>) -> Self {
        Self {
            world: World::new(settings.arena()),
            controller: Controller::new(settings.throw_time_constant, settings.palette.clone()),
            params: settings.sim_params(),
            layout,
            clock: FrameClock::new(settings.tick_rate_hz, settings.max_substeps),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Start a new round: drop any gesture and rack a fresh set of balls
    pub fn restart(&mut self) {
        self.controller.cancel(&mut self.world);
        let entries = self.layout.generate(&self.world.arena);
        self.world.restart(entries);
        self.clock.reset();
        log::info!("Round {} racked with {} balls", self.world.round(), self.world.len());
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Outcome {
        self.controller.handle(&mut self.world, event)
    }

    pub fn selected_color(&self) -> Option<&str> {
        self.controller.selected_color(&self.world)
    }

    /// Callback for the external color picker
    pub fn choose_color(&mut self, color: &str) -> Outcome {
        self.controller.choose_color(&mut self.world, color)
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) -> TickReport {
        tick(&mut self.world, &self.params)
    }

    /// Advance by `elapsed` seconds of wall time, then draw once
    ///
    /// Returns the number of ticks run.
    pub fn frame<S: Surface + ?Sized>(&mut self, elapsed: f32, surface: &mut S) -> u32 {
        let ticks = self.clock.advance(elapsed);
        for _ in 0..ticks {
            self.step();
        }
        draw_frame(surface, &self.world, &self.controller);
        ticks
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::sim::{FixedLayout, LayoutEntry};

    fn two_ball_table() -> Table {
        let layout = FixedLayout(vec![
            LayoutEntry {
                pos: Vec2::new(200.0, 200.0),
                radius: 20.0,
                color: "red".into(),
            },
            LayoutEntry {
                pos: Vec2::new(600.0, 200.0),
                radius: 20.0,
                color: "blue".into(),
            },
        ]);
        Table::with_layout(&Settings::default(), Box::new(layout))
    }

    #[test]
    fn test_table_starts_empty() {
        let mut table = Table::new(&Settings::default(), 1);
        assert!(table.world().is_empty());

        let mut surface = RecordingSurface::default();
        table.frame(1.0 / 60.0, &mut surface);
        assert_eq!(surface.commands().len(), 1);
    }

    #[test]
    fn test_restart_racks_fifteen() {
        let mut table = Table::new(&Settings::default(), 1);
        table.restart();
        let ids: Vec<_> = table.world().balls().iter().map(|b| b.id).collect();
        assert_eq!(ids, (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn test_throw_then_fly() {
        let mut table = two_ball_table();
        table.restart();

        table.pointer(PointerEvent::press(200.0, 200.0));
        table.pointer(PointerEvent::moved(250.0, 200.0));
        table.pointer(PointerEvent::release(250.0, 200.0));

        table.step();
        assert_eq!(table.world().ball(1).map(|b| b.pos), Some(Vec2::new(205.0, 200.0)));
    }

    #[test]
    fn test_restart_during_hold_cancels() {
        let mut table = two_ball_table();
        table.restart();
        table.pointer(PointerEvent::press(200.0, 200.0));
        assert_eq!(table.world().held(), Some(1));

        table.restart();
        assert_eq!(table.world().held(), None);
        assert_eq!(table.controller().selected(), None);
        assert_eq!(table.world().round(), 2);
    }

    #[test]
    fn test_color_picker_round_trip() {
        let mut table = two_ball_table();
        table.restart();
        assert_eq!(table.selected_color(), None);

        table.pointer(PointerEvent::double(600.0, 200.0));
        assert_eq!(table.selected_color(), Some("blue"));
        table.choose_color("yellow");
        assert_eq!(table.world().ball(2).map(|b| b.color.as_str()), Some("yellow"));
        assert_eq!(table.selected_color(), None);
    }

    #[test]
    fn test_color_picker_needs_a_selection() {
        let mut table = two_ball_table();
        table.restart();

        assert_eq!(table.choose_color("green"), Outcome::Ignored);
        assert!(table.world().balls().iter().all(|b| b.color != "green"));

        // The page picker stays visible while a ball is held, too
        table.pointer(PointerEvent::press(200.0, 200.0));
        assert_eq!(table.selected_color(), Some("red"));
        assert!(matches!(table.choose_color("green"), Outcome::ColorApplied { ball: 1, .. }));
        assert_eq!(table.world().held(), Some(1));
    }

    #[test]
    fn test_frame_runs_due_ticks() {
        let mut table = two_ball_table();
        table.restart();
        let mut surface = RecordingSurface::default();

        assert_eq!(table.frame(0.06, &mut surface), 3);
        assert_eq!(table.world().time_ticks, 3);
        assert_eq!(surface.circles().len(), 2);
    }
}
