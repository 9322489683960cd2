//! Billiards - colored discs bouncing around a rectangular table
//!
//! Core modules:
//! - `sim`: Simulation engine (integration, walls, ball-ball collisions)
//! - `interaction`: Pointer gestures (grab, aim, throw, color menu)
//! - `renderer`: Draw commands issued to an external 2D surface
//! - `scheduler`: Fixed-cadence frame clock and loop stop handle
//! - `table`: Composition of the above into one playable table
//! - `platform`: Browser bindings (wasm only)

pub mod interaction;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod table;

pub use settings::{CollisionModel, Settings};
pub use table::Table;

/// Table configuration constants
pub mod consts {
    /// Simulation ticks per second (velocities are expressed per tick)
    pub const TICK_RATE_HZ: f32 = 60.0;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap the clock will try to catch up on (seconds)
    pub const MAX_FRAME_GAP: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    /// Fraction of normal velocity kept after a wall bounce
    pub const WALL_RESTITUTION: f32 = 0.9;
    /// Spring-impulse gain applied to the overlap each tick
    pub const SPRING_STIFFNESS: f32 = 0.1;
    /// Ticks over which the drag displacement is converted to velocity
    pub const THROW_TIME_CONSTANT: f32 = 10.0;

    /// Rack defaults
    pub const RACK_LAYERS: u32 = 5;
    pub const RACK_BOTTOM_MARGIN: f32 = 50.0;
    pub const RACK_RADII: [f32; 4] = [15.0, 20.0, 25.0, 30.0];
    pub const PALETTE: [&str; 5] = ["red", "green", "blue", "yellow", "orange"];
}
