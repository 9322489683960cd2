//! Table state and core simulation types
//!
//! The ball collection is an indexed store. Everything outside the engine
//! refers to balls by [`BallId`] and mutates them through [`World`].

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable ball identity, unique within one round
pub type BallId = u32;

/// Reasons a ball cannot be constructed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallError {
    NonPositiveRadius(f32),
    NonFiniteRadius,
    NonFinitePosition,
}

impl fmt::Display for BallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallError::NonPositiveRadius(r) => write!(f, "ball radius must be positive, got {}", r),
            BallError::NonFiniteRadius => write!(f, "ball radius must be finite"),
            BallError::NonFinitePosition => write!(f, "ball position must be finite"),
        }
    }
}

impl std::error::Error for BallError {}

/// A ball entity
///
/// Only built through [`Ball::new`], so it is serialize-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    /// Arena units per tick
    pub vel: Vec2,
    radius: f32,
    pub color: String,
}

impl Ball {
    /// Create a resting ball, rejecting geometry the engine cannot handle
    pub fn new(id: BallId, pos: Vec2, radius: f32, color: impl Into<String>) -> Result<Self, BallError> {
        if !radius.is_finite() {
            return Err(BallError::NonFiniteRadius);
        }
        if radius <= 0.0 {
            return Err(BallError::NonPositiveRadius(radius));
        }
        if !pos.is_finite() {
            return Err(BallError::NonFinitePosition);
        }
        Ok(Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            color: color.into(),
        })
    }

    /// Radius is fixed for the ball's lifetime
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// True if `point` lies strictly inside the disc
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) < self.radius * self.radius
    }
}

/// Rectangular arena with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(crate::consts::ARENA_WIDTH, crate::consts::ARENA_HEIGHT)
    }
}

/// One ball as produced by a layout generator, before it gets an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
}

/// Authoritative table state
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub arena: Arena,
    /// Balls in enumeration order (sorted by id)
    balls: Vec<Ball>,
    /// The ball currently owned by the interaction controller
    held: Option<BallId>,
    /// Bumped on every restart so stale gestures can be detected
    round: u32,
    /// Simulation tick counter for the current round
    pub time_ticks: u64,
}

impl World {
    /// Create an empty world; nothing moves until the first restart
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            balls: Vec::new(),
            held: None,
            round: 0,
            time_ticks: 0,
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub(crate) fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn index_of(&self, id: BallId) -> Option<usize> {
        self.balls.iter().position(|b| b.id == id)
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.index_of(id).map(|i| &self.balls[i])
    }

    /// Mutable access by index
    pub fn ball_at_mut(&mut self, index: usize) -> Option<&mut Ball> {
        self.balls.get_mut(index)
    }

    /// Replace the whole collection in one step
    ///
    /// Entries are numbered `1..=N` in the order given, with zero velocity.
    /// Invalid entries are skipped, so N may be smaller than `entries.len()`.
    /// Any held ball is released.
    pub fn restart(&mut self, entries: Vec<LayoutEntry>) {
        let mut balls = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = balls.len() as BallId + 1;
            match Ball::new(id, entry.pos, entry.radius, entry.color) {
                Ok(ball) => balls.push(ball),
                Err(e) => log::warn!("Skipping layout entry: {}", e),
            }
        }

        self.balls = balls;
        self.held = None;
        self.round = self.round.wrapping_add(1);
        self.time_ticks = 0;
    }

    /// The ball currently held by the controller, if any
    pub fn held(&self) -> Option<BallId> {
        self.held
    }

    pub fn is_held(&self, id: BallId) -> bool {
        self.held == Some(id)
    }

    /// Take ownership of a ball away from free flight
    ///
    /// Fails if the ball does not exist or another ball is already held.
    pub fn hold(&mut self, id: BallId) -> bool {
        if self.held.is_some_and(|h| h != id) {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.balls[index].vel = Vec2::ZERO;
        self.held = Some(id);
        true
    }

    /// Hand a held ball back to free flight with the given velocity
    pub fn release(&mut self, id: BallId, velocity: Vec2) -> bool {
        if self.held != Some(id) {
            return false;
        }
        self.held = None;
        match self.index_of(id) {
            Some(index) => {
                self.balls[index].vel = if velocity.is_finite() { velocity } else { Vec2::ZERO };
                true
            }
            None => false,
        }
    }

    pub fn set_color(&mut self, id: BallId, color: impl Into<String>) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.balls[index].color = color.into();
                true
            }
            None => false,
        }
    }

    /// Sum of all velocities (equal-mass momentum)
    pub fn total_velocity(&self) -> Vec2 {
        self.balls.iter().map(|b| b.vel).sum()
    }
}
