//! Simulation engine
//!
//! All physics lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Velocities are per tick, there is no variable dt
//! - Stable iteration order (by ball id)
//! - Only balls not held by the controller are integrated

pub mod collision;
pub mod layout;
pub mod state;
pub mod tick;

pub use collision::{Contact, Response, WallHits, detect, reflect_velocity, resolve_walls};
pub use layout::{FixedLayout, LayoutGenerator, RackLayout};
pub use state::{Arena, Ball, BallError, BallId, LayoutEntry, World};
pub use tick::{SimParams, TickReport, tick};
