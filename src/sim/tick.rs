//! Fixed-cadence simulation tick
//!
//! One tick integrates free balls, bounces them off the walls, resolves every
//! unordered ball pair once, then clamps pushed balls back inside the walls.
//! There is no iterative solver: clusters of three or more balls may keep a
//! little overlap until later ticks.

use serde::{Deserialize, Serialize};

use super::collision::{Response, detect, resolve_against_held, resolve_pair, resolve_walls};
use super::state::World;
use crate::consts::WALL_RESTITUTION;

/// Physics parameters for a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Fraction of normal velocity kept after a wall bounce, in [0, 1]
    pub restitution: f32,
    pub response: Response,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            restitution: WALL_RESTITUTION,
            response: Response::VelocitySwap,
        }
    }
}

impl SimParams {
    pub fn spring(stiffness: f32) -> Self {
        Self {
            response: Response::SpringImpulse { stiffness },
            ..Default::default()
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Wall reflections (a corner hit counts twice)
    pub wall_bounces: u32,
    /// Overlapping pairs resolved
    pub contacts: u32,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, params: &SimParams) -> TickReport {
    let mut report = TickReport::default();
    world.time_ticks += 1;

    if world.is_empty() {
        return report;
    }

    let arena = world.arena;
    let held = world.held();
    let balls = world.balls_mut();

    // Free flight
    for ball in balls.iter_mut() {
        if held == Some(ball.id) {
            continue;
        }
        ball.pos += ball.vel;
        report.wall_bounces += resolve_walls(ball, &arena, params.restitution).count();
    }

    // Pairwise, each unordered pair once in index order
    let n = balls.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = balls.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let a_held = held == Some(a.id);
            let b_held = held == Some(b.id);

            if a_held {
                if let Some(contact) = detect(b, a) {
                    resolve_against_held(b, &contact, params.response);
                    report.contacts += 1;
                }
            } else if b_held {
                if let Some(contact) = detect(a, b) {
                    resolve_against_held(a, &contact, params.response);
                    report.contacts += 1;
                }
            } else if let Some(contact) = detect(a, b) {
                resolve_pair(a, b, &contact, params.response);
                report.contacts += 1;
            }
        }
    }

    // A push can land a ball in a rail; the wall wins over the pair
    if report.contacts > 0 {
        for ball in balls.iter_mut() {
            if held != Some(ball.id) {
                report.wall_bounces += resolve_walls(ball, &arena, params.restitution).count();
            }
        }
    }

    if report.contacts > 0 || report.wall_bounces > 0 {
        log::trace!(
            "tick {}: {} wall bounces, {} contacts",
            world.time_ticks,
            report.wall_bounces,
            report.contacts
        );
    }

    report
}
