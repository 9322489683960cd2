//! Collision detection and response for discs in a box
//!
//! Walls reflect the normal velocity component. Ball pairs are resolved one
//! pair at a time with either a velocity swap or a spring impulse.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Arena, Ball};

/// Which walls a ball touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    pub fn count(&self) -> u32 {
        self.left as u32 + self.right as u32 + self.top as u32 + self.bottom as u32
    }
}

/// Keep a ball inside the arena
///
/// A ball overlapping a wall is clamped back to touch it. Its velocity
/// component is negated and scaled by `restitution` only when it points into
/// that wall, so a ball already moving away is never pulled back.
pub fn resolve_walls(ball: &mut Ball, arena: &Arena, restitution: f32) -> WallHits {
    let r = ball.radius();
    let mut hits = WallHits::default();

    // An arena narrower than the ball pins it to the center on that axis
    let (min_x, max_x) = axis_bounds(r, arena.width);
    let (min_y, max_y) = axis_bounds(r, arena.height);

    if ball.pos.x < min_x {
        ball.pos.x = min_x;
        if ball.vel.x < 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
            hits.left = true;
        }
    } else if ball.pos.x > max_x {
        ball.pos.x = max_x;
        if ball.vel.x > 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
            hits.right = true;
        }
    }

    if ball.pos.y < min_y {
        ball.pos.y = min_y;
        if ball.vel.y < 0.0 {
            ball.vel.y = -ball.vel.y * restitution;
            hits.top = true;
        }
    } else if ball.pos.y > max_y {
        ball.pos.y = max_y;
        if ball.vel.y > 0.0 {
            ball.vel.y = -ball.vel.y * restitution;
            hits.bottom = true;
        }
    }

    hits
}

fn axis_bounds(radius: f32, extent: f32) -> (f32, f32) {
    if 2.0 * radius > extent {
        let mid = extent * 0.5;
        (mid, mid)
    } else {
        (radius, extent - radius)
    }
}

/// How two overlapping balls respond to each other
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// Exchange velocities, then push apart by half the overlap each
    VelocitySwap,
    /// Add a velocity kick proportional to the overlap, no direct push
    SpringImpulse { stiffness: f32 },
}

/// Geometry of an overlapping pair
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit vector from B toward A, `None` when centers coincide
    pub normal: Option<Vec2>,
    /// How far the discs interpenetrate
    pub overlap: f32,
}

/// Check whether two balls overlap
pub fn detect(a: &Ball, b: &Ball) -> Option<Contact> {
    let delta = a.pos - b.pos;
    let distance = delta.length();
    let sum = a.radius() + b.radius();

    if distance >= sum {
        return None;
    }

    let normal = if distance > f32::EPSILON {
        Some(delta / distance)
    } else {
        None
    };

    Some(Contact {
        normal,
        overlap: sum - distance,
    })
}

/// Resolve a pair of free balls
///
/// Whatever A receives, B receives the counterpart, so the pair's summed
/// velocity is unchanged by the swap and by the impulse.
pub fn resolve_pair(a: &mut Ball, b: &mut Ball, contact: &Contact, response: Response) {
    match response {
        Response::VelocitySwap => {
            std::mem::swap(&mut a.vel, &mut b.vel);
            // Coincident centers have no separating direction; skip the push
            if let Some(n) = contact.normal {
                let push = n * (contact.overlap * 0.5);
                a.pos += push;
                b.pos -= push;
            }
        }
        Response::SpringImpulse { stiffness } => {
            let n = contact.normal.unwrap_or(Vec2::X);
            let kick = n * (contact.overlap * 0.5 * stiffness);
            a.vel += kick;
            b.vel -= kick;
        }
    }
}

/// Resolve a free ball against a held one
///
/// The held ball belongs to the interaction controller, so only `free` is
/// touched. It takes the whole correction and bounces off the held disc.
/// `contact` must come from `detect(free, held)`.
pub fn resolve_against_held(free: &mut Ball, contact: &Contact, response: Response) {
    // Normal points from the held ball toward the free one
    let (n, coincident) = match contact.normal {
        Some(n) => (n, false),
        None => (Vec2::X, true),
    };

    match response {
        Response::VelocitySwap => {
            let approach = free.vel.dot(n);
            if approach < 0.0 {
                free.vel = reflect_velocity(free.vel, n);
            }
            if !coincident {
                free.pos += n * contact.overlap;
            }
        }
        Response::SpringImpulse { stiffness } => {
            free.vel += n * (contact.overlap * stiffness);
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
