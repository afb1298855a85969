//! Entity capability set and the pooled body variants
//!
//! Every game object exposes the same read-only surface to a renderer and the
//! same lifecycle hooks to the engine: `create` (re-)activates, `update`
//! advances physics once per tick, `destroy` retires it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{Bounds, Effect};
use super::pool::Poolable;
use crate::approach;
use crate::consts::*;

/// Where destroyed entities are parked: far outside any stage, so they can
/// never overlap a live body
pub const NEUTRAL_POSITION: Vec2 = Vec2::new(-10_000.0, -10_000.0);

/// Velocity eases toward `velocity_goal` by at most `friction` per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub velocity: Vec2,
    pub velocity_goal: Vec2,
    pub friction: f32,
}

impl Physics {
    pub fn new(velocity_goal: Vec2, friction: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            velocity_goal,
            friction,
        }
    }

    /// Advance velocity one tick and return it
    pub fn step(&mut self) -> Vec2 {
        self.velocity.x = approach(self.velocity_goal.x, self.velocity.x, self.friction);
        self.velocity.y = approach(self.velocity_goal.y, self.velocity.y, self.friction);
        self.velocity
    }
}

/// What a renderer may read from an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub position: Vec2,
    pub size: f32,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Hero,
    Enemy,
    Laser,
    Asteroid,
}

/// Drawing target supplied by the host; the core never draws on its own
pub trait Canvas {
    fn draw(&mut self, sprite: Sprite, surface: Surface);
}

/// Arguments for (re-)activating an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub position: Vec2,
    pub effect: Option<Effect>,
}

impl Spawn {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            effect: None,
        }
    }
}

/// Outcome of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Resting in the pool or already destroyed
    Idle,
    Moving,
    /// Left the stage past the player; counts against the run
    Escaped,
    /// Left the stage harmlessly
    Expired,
}

pub trait Entity {
    fn surface(&self) -> Surface;
    fn sprite(&self) -> Sprite;
    fn create(&mut self, spawn: Spawn);
    fn update(&mut self, bounds: &Bounds) -> Status;
    /// Idempotent: destroying twice leaves the same state as destroying once
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool {
        self.surface().destroyed
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let surface = self.surface();
        if !surface.destroyed {
            canvas.draw(self.sprite(), surface);
        }
    }
}

/// Pooled body variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Enemy,
    Laser,
    /// Decorative rock drifting up the stage; shatters enemies it touches
    Asteroid,
}

/// A circular moving body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    pub position: Vec2,
    pub size: f32,
    pub physics: Physics,
    pub destroyed: bool,
    pub active: bool,
    /// Spawned under a status effect (slowed, worth no points)
    pub effected: bool,
}

impl Body {
    fn resting(kind: BodyKind, size: f32, physics: Physics) -> Self {
        Self {
            kind,
            position: NEUTRAL_POSITION,
            size,
            physics,
            destroyed: true,
            active: false,
            effected: false,
        }
    }

    pub fn enemy() -> Self {
        Self::resting(
            BodyKind::Enemy,
            ENEMY_SIZE,
            Physics::new(Vec2::new(0.0, ENEMY_SPEED), ENEMY_FRICTION),
        )
    }

    pub fn laser() -> Self {
        Self::resting(
            BodyKind::Laser,
            LASER_SIZE,
            Physics::new(Vec2::new(0.0, -LASER_SPEED), LASER_SPEED),
        )
    }

    /// `drift` is the upward speed, typically 0.25..0.5
    pub fn asteroid(size: f32, drift: f32) -> Self {
        Self::resting(
            BodyKind::Asteroid,
            size,
            Physics::new(Vec2::new(0.0, -drift), drift),
        )
    }

    /// Only lasers earn points when they bring an enemy down
    pub fn is_projectile(&self) -> bool {
        self.kind == BodyKind::Laser
    }

    fn has_left(&self, bounds: &Bounds) -> Status {
        match self.kind {
            BodyKind::Enemy if self.position.y - self.size > bounds.height => Status::Escaped,
            BodyKind::Laser if self.position.y + self.size < 0.0 => Status::Expired,
            BodyKind::Asteroid if self.position.y < -self.size * 2.0 => Status::Expired,
            _ => Status::Moving,
        }
    }
}

impl Entity for Body {
    fn surface(&self) -> Surface {
        Surface {
            position: self.position,
            size: self.size,
            destroyed: self.destroyed,
        }
    }

    fn sprite(&self) -> Sprite {
        match self.kind {
            BodyKind::Enemy => Sprite::Enemy,
            BodyKind::Laser => Sprite::Laser,
            BodyKind::Asteroid => Sprite::Asteroid,
        }
    }

    fn create(&mut self, spawn: Spawn) {
        self.position = spawn.position;
        self.destroyed = false;
        self.active = true;

        match self.kind {
            BodyKind::Enemy => {
                self.effected = spawn.effect == Some(Effect::Ice);
                let speed = if self.effected {
                    ENEMY_SPEED * EFFECTED_SPEED_FACTOR
                } else {
                    ENEMY_SPEED
                };
                self.physics = Physics::new(Vec2::new(0.0, speed), ENEMY_FRICTION);
            }
            // Projectiles and rocks leave at full speed
            BodyKind::Laser | BodyKind::Asteroid => {
                self.effected = false;
                self.physics.velocity = self.physics.velocity_goal;
            }
        }
    }

    fn update(&mut self, bounds: &Bounds) -> Status {
        if self.destroyed {
            return Status::Idle;
        }

        let velocity = self.physics.step();
        self.position += velocity;

        let status = self.has_left(bounds);
        if status != Status::Moving {
            self.destroy();
        }
        status
    }

    fn destroy(&mut self) {
        self.position = NEUTRAL_POSITION;
        self.physics.velocity = Vec2::ZERO;
        self.destroyed = true;
        self.active = false;
    }
}

impl Poolable for Body {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
