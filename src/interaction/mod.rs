//! Pointer interaction: grab, aim, throw and recolor
//!
//! The controller is a small state machine driven by pointer events. While a
//! ball is held the world marks it as owned by the controller and the engine
//! leaves it alone; on release the pull-back vector becomes its velocity.

pub mod menu;

use glam::Vec2;

pub use menu::SwatchMenu;

use crate::consts::{PALETTE, THROW_TIME_CONSTANT};
use crate::sim::{BallId, World};

/// Kind of pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
    DoubleActivate,
}

/// A pointer sample in viewport-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, y),
        }
    }

    pub fn press(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Press, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn release(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Release, x, y)
    }

    pub fn double(x: f32, y: f32) -> Self {
        Self::new(PointerKind::DoubleActivate, x, y)
    }
}

/// Controller state
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    /// A ball is held; `pointer` is the latest sample
    Holding {
        ball: BallId,
        press: Vec2,
        pointer: Vec2,
        round: u32,
    },
    /// Swatch menu shown over a ball
    ColorMenu { ball: BallId, round: u32 },
}

/// What an event did, mostly for logging and tests
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ignored,
    Grabbed(BallId),
    Aimed(BallId),
    Thrown { ball: BallId, velocity: Vec2 },
    MenuOpened(BallId),
    MenuClosed(BallId),
    ColorApplied { ball: BallId, color: String },
}

/// The current pull-back, for drawing the aim line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub ball: BallId,
    pub press: Vec2,
    pub pointer: Vec2,
}

impl Aim {
    /// Displacement that will become velocity on release
    pub fn pull(&self) -> Vec2 {
        self.pointer - self.press
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    gesture: Gesture,
    time_constant: f32,
    palette: Vec<String>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(THROW_TIME_CONSTANT, PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl Controller {
    pub fn new(time_constant: f32, palette: Vec<String>) -> Self {
        let time_constant = if time_constant.is_finite() && time_constant > 0.0 {
            time_constant
        } else {
            log::warn!("Invalid throw time constant {}, using {}", time_constant, THROW_TIME_CONSTANT);
            THROW_TIME_CONSTANT
        };
        Self {
            gesture: Gesture::Idle,
            time_constant,
            palette,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn time_constant(&self) -> f32 {
        self.time_constant
    }

    /// Ball under the controller's attention (held or showing its menu)
    pub fn selected(&self) -> Option<BallId> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Holding { ball, .. } | Gesture::ColorMenu { ball, .. } => Some(ball),
        }
    }

    pub fn menu_ball(&self) -> Option<BallId> {
        match self.gesture {
            Gesture::ColorMenu { ball, .. } => Some(ball),
            _ => None,
        }
    }

    pub fn aim(&self) -> Option<Aim> {
        match self.gesture {
            Gesture::Holding {
                ball, press, pointer, ..
            } => Some(Aim { ball, press, pointer }),
            _ => None,
        }
    }

    /// Launch velocity for a pull-back
    pub fn launch_velocity(&self, press: Vec2, pointer: Vec2) -> Vec2 {
        (pointer - press) / self.time_constant
    }

    /// Process one pointer sample
    pub fn handle(&mut self, world: &mut World, event: PointerEvent) -> Outcome {
        if !event.pos.is_finite() {
            log::warn!("Ignoring {:?} with non-finite position", event.kind);
            return Outcome::Ignored;
        }
        self.sync(world);

        let outcome = match (event.kind, self.gesture.clone()) {
            (PointerKind::Press, Gesture::Idle) => self.try_grab(world, event.pos),
            (PointerKind::Press, Gesture::Holding { ball, .. }) => {
                // Release was lost (pointer left the surface); drop the ball where it is
                world.release(ball, Vec2::ZERO);
                self.gesture = Gesture::Idle;
                self.try_grab(world, event.pos)
            }
            (PointerKind::Press, Gesture::ColorMenu { ball, .. }) => self.press_in_menu(world, ball, event.pos),

            (PointerKind::Move, Gesture::Holding { ball, press, round, .. }) => {
                self.gesture = Gesture::Holding {
                    ball,
                    press,
                    pointer: event.pos,
                    round,
                };
                Outcome::Aimed(ball)
            }
            (PointerKind::Move, _) => Outcome::Ignored,

            (PointerKind::Release, Gesture::Holding { ball, press, .. }) => {
                let velocity = self.launch_velocity(press, event.pos);
                self.gesture = Gesture::Idle;
                if world.release(ball, velocity) {
                    Outcome::Thrown { ball, velocity }
                } else {
                    Outcome::Ignored
                }
            }
            (PointerKind::Release, _) => Outcome::Ignored,

            (PointerKind::DoubleActivate, Gesture::Holding { ball, .. }) => {
                world.release(ball, Vec2::ZERO);
                self.gesture = Gesture::Idle;
                self.open_menu(world, event.pos)
            }
            (PointerKind::DoubleActivate, _) => self.open_menu(world, event.pos),
        };

        if outcome != Outcome::Ignored {
            log::debug!("{:?} at {} -> {:?}", event.kind, event.pos, outcome);
        }
        outcome
    }

    /// Color of the selected ball, for the external picker
    pub fn selected_color<'w>(&self, world: &'w World) -> Option<&'w str> {
        self.selected()
            .and_then(|id| world.ball(id))
            .map(|b| b.color.as_str())
    }

    /// Apply a color chosen by the picker to the selected ball
    ///
    /// Closes the menu if one is open; a held ball stays held.
    pub fn choose_color(&mut self, world: &mut World, color: &str) -> Outcome {
        self.sync(world);
        let Some(ball) = self.selected() else {
            return Outcome::Ignored;
        };
        if !world.set_color(ball, color) {
            return Outcome::Ignored;
        }
        if matches!(self.gesture, Gesture::ColorMenu { .. }) {
            self.gesture = Gesture::Idle;
        }
        log::debug!("Ball {} recolored to {}", ball, color);
        Outcome::ColorApplied {
            ball,
            color: color.to_string(),
        }
    }

    /// Abandon the current gesture; a held ball is dropped at rest
    pub fn cancel(&mut self, world: &mut World) {
        if let Gesture::Holding { ball, round, .. } = self.gesture {
            if round == world.round() {
                world.release(ball, Vec2::ZERO);
            }
        }
        self.gesture = Gesture::Idle;
    }

    /// Forget gestures that refer to a previous round or a missing ball
    fn sync(&mut self, world: &World) {
        let stale = match self.gesture {
            Gesture::Idle => false,
            Gesture::Holding { ball, round, .. } => round != world.round() || !world.is_held(ball),
            Gesture::ColorMenu { ball, round } => round != world.round() || world.ball(ball).is_none(),
        };
        if stale {
            log::debug!("Dropping stale gesture {:?}", self.gesture);
            self.gesture = Gesture::Idle;
        }
    }

    fn try_grab(&mut self, world: &mut World, pos: Vec2) -> Outcome {
        let Some(ball) = pick(world, pos) else {
            return Outcome::Ignored;
        };
        if !world.hold(ball) {
            return Outcome::Ignored;
        }
        self.gesture = Gesture::Holding {
            ball,
            press: pos,
            pointer: pos,
            round: world.round(),
        };
        Outcome::Grabbed(ball)
    }

    fn press_in_menu(&mut self, world: &mut World, ball: BallId, pos: Vec2) -> Outcome {
        let menu = world
            .ball(ball)
            .map(|b| SwatchMenu::anchored(b, self.palette.len()));

        if let Some(menu) = menu {
            if let Some(index) = menu.swatch_at(pos) {
                let color = self.palette[index].clone();
                return self.choose_color(world, &color);
            }
            if menu.contains(pos) {
                // Title area or padding; keep the menu up
                return Outcome::Ignored;
            }
        }

        self.gesture = Gesture::Idle;
        match self.try_grab(world, pos) {
            Outcome::Ignored => Outcome::MenuClosed(ball),
            grabbed => grabbed,
        }
    }

    fn open_menu(&mut self, world: &World, pos: Vec2) -> Outcome {
        match pick(world, pos) {
            Some(ball) => {
                self.gesture = Gesture::ColorMenu {
                    ball,
                    round: world.round(),
                };
                Outcome::MenuOpened(ball)
            }
            None => match self.menu_ball() {
                Some(open) => {
                    self.gesture = Gesture::Idle;
                    Outcome::MenuClosed(open)
                }
                None => Outcome::Ignored,
            },
        }
    }
}

/// Ball under `pos`: the closest center wins, equal distances go to the lower id
pub fn pick(world: &World, pos: Vec2) -> Option<BallId> {
    let mut best: Option<(BallId, f32)> = None;
    for ball in world.balls() {
        if !ball.contains(pos) {
            continue;
        }
        let d = ball.pos.distance_squared(pos);
        match best {
            Some((id, best_d)) if d > best_d || (d == best_d && id < ball.id) => {}
            _ => best = Some((ball.id, d)),
        }
    }
    best.map(|(id, _)| id)
}
