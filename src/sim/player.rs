//! The hero ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, NEUTRAL_POSITION, Physics, Spawn, Sprite, Status, Surface};
use super::event::{Bounds, Effect};
use crate::consts::*;

/// Player dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dims {
    pub width: f32,
    pub height: f32,
}

/// The player's ship. `position` is the top-left corner of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub dims: Dims,
    pub physics: Physics,
    pub destroyed: bool,
    /// Fire shield: touching enemies explode instead of killing the hero
    pub fire_active: bool,
}

impl Player {
    /// Place a fresh ship centered near the bottom of the stage
    pub fn new(bounds: &Bounds) -> Self {
        let dims = Dims {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        };
        let mut player = Self {
            position: NEUTRAL_POSITION,
            dims,
            physics: Physics::new(Vec2::ZERO, PLAYER_FRICTION),
            destroyed: true,
            fire_active: false,
        };
        player.create(Spawn::at(Vec2::new(
            (bounds.width - dims.width) / 2.0,
            bounds.height - dims.height * 2.0,
        )));
        player
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.dims.width / 2.0, self.dims.height / 2.0)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.half_extents()
    }

    /// Where lasers leave the ship
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.position.x + self.dims.width / 2.0, self.position.y)
    }

    /// Set the desired direction of travel; each axis in -1..=1
    pub fn steer(&mut self, direction: Vec2) {
        self.physics.velocity_goal = direction.clamp(Vec2::NEG_ONE, Vec2::ONE) * PLAYER_SPEED;
    }

    /// React to an effect starting (`Some`) or ending (`None`)
    pub fn apply_effect(&mut self, effect: Option<Effect>) {
        self.fire_active = effect == Some(Effect::Fire);
    }
}

impl Entity for Player {
    fn surface(&self) -> Surface {
        Surface {
            position: self.position,
            size: self.dims.width.max(self.dims.height) / 2.0,
            destroyed: self.destroyed,
        }
    }

    fn sprite(&self) -> Sprite {
        Sprite::Hero
    }

    fn create(&mut self, spawn: Spawn) {
        self.position = spawn.position;
        self.physics.velocity = Vec2::ZERO;
        self.physics.velocity_goal = Vec2::ZERO;
        self.destroyed = false;
        self.apply_effect(spawn.effect);
    }

    fn update(&mut self, bounds: &Bounds) -> Status {
        if self.destroyed {
            return Status::Idle;
        }

        let velocity = self.physics.step();
        let max = Vec2::new(
            (bounds.width - self.dims.width).max(0.0),
            (bounds.height - self.dims.height).max(0.0),
        );
        self.position = (self.position + velocity).clamp(Vec2::ZERO, max);
        Status::Moving
    }

    fn destroy(&mut self) {
        self.position = NEUTRAL_POSITION;
        self.physics.velocity = Vec2::ZERO;
        self.destroyed = true;
    }
}
