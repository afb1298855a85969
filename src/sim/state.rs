//! Shared simulation context
//!
//! `World` is what every bus handler receives: the simulated clock, the seeded
//! RNG, the body pool, the hero and the engine session. Nothing in here is
//! global; two worlds never interfere.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::armory::Armory;
use super::engine::{Phase, Session};
use super::entity::{Body, BodyKind, Canvas, Entity, Status};
use super::event::Bounds;
use super::player::Player;
use super::pool::{Pool, PoolKind};
use crate::settings::Settings;

pub struct World {
    pub settings: Settings,
    /// Stage size; replaced by the `start` payload
    pub bounds: Bounds,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulated clock in milliseconds
    pub now_ms: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub pool: Pool<Body>,
    /// Installed by the `player-added` event
    pub player: Option<Player>,
    /// Created by `start`
    pub session: Option<Session>,
    pub armory: Armory,
}

impl World {
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed;
        Self {
            bounds: settings.bounds(),
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0,
            time_ticks: 0,
            pool: Pool::new(),
            player: None,
            session: None,
            armory: Armory::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map_or(Phase::Uninitialized, |session| session.phase)
    }

    /// Live (not destroyed) bodies of `kind`
    pub fn live(&self, kind: PoolKind) -> impl Iterator<Item = &Body> {
        self.pool.iter(kind).filter(|body| !body.destroyed)
    }

    pub fn live_enemies(&self) -> usize {
        self.live(PoolKind::Enemies).count()
    }

    /// Random x coordinate keeping a body of `size` fully on stage
    pub fn random_x(&mut self, size: f32) -> f32 {
        let max = (self.bounds.width - size).max(size);
        if max <= size {
            return size;
        }
        self.rng.random_range(size..max)
    }

    /// Advance every body and the hero one tick. Returns how many enemies
    /// slipped past the bottom of the stage.
    pub fn step_bodies(&mut self) -> u32 {
        let bounds = self.bounds;
        let mut escaped = 0;

        for kind in PoolKind::ALL {
            for body in self.pool.slice_mut(kind) {
                if body.update(&bounds) == Status::Escaped && body.kind == BodyKind::Enemy {
                    escaped += 1;
                }
            }
        }

        if let Some(player) = self.player.as_mut() {
            player.update(&bounds);
        }

        escaped
    }

    /// Hand every visible entity to the host's canvas
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for kind in PoolKind::ALL {
            for body in self.pool.slice(kind) {
                body.render(canvas);
            }
        }
        if let Some(player) = &self.player {
            player.render(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Spawn;
    use glam::Vec2;

    #[test]
    fn test_new_world_is_uninitialized() {
        let world = World::new(Settings::default());
        assert_eq!(world.phase(), Phase::Uninitialized);
        assert_eq!(world.now_ms, 0);
        assert!(world.player.is_none());
    }

    #[test]
    fn test_random_x_inside_stage() {
        let mut world = World::new(Settings::default());
        for _ in 0..100 {
            let x = world.random_x(12.0);
            assert!((12.0..world.bounds.width - 12.0).contains(&x));
        }
    }

    #[test]
    fn test_step_bodies_counts_escapes() {
        let mut world = World::new(Settings::default());
        let id = world.pool.register(PoolKind::Enemies, Body::enemy());
        let bottom = world.bounds.height;
        if let Some(enemy) = world.pool.get_mut(id) {
            enemy.create(Spawn::at(Vec2::new(100.0, bottom + 11.0)));
            enemy.physics.velocity.y = 2.0;
        }

        assert_eq!(world.step_bodies(), 1);
        assert_eq!(world.live_enemies(), 0);
        assert_eq!(world.step_bodies(), 0);
    }
}
