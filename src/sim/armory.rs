//! Projectile cache
//!
//! Owns the list of colliders (lasers and asteroids) and republishes it as
//! `laser-cache-updated` whenever it changes. The engine never reaches into
//! this list; it only keeps the latest published copy.

use glam::Vec2;
use rand::Rng;

use super::bus::EventBus;
use super::entity::{Body, Entity, Spawn};
use super::event::Event;
use super::pool::{EntityId, PoolKind};
use super::state::World;
use crate::consts::{ASTEROID_MAX_SIZE, ASTEROID_MIN_SIZE};

#[derive(Debug, Clone, Default)]
pub struct Armory {
    colliders: Vec<EntityId>,
}

impl Armory {
    pub fn colliders(&self) -> &[EntityId] {
        &self.colliders
    }

    fn track(&mut self, id: EntityId) {
        if !self.colliders.contains(&id) {
            self.colliders.push(id);
        }
    }
}

/// Fire a laser from the hero's nose. Does nothing without a live hero.
pub fn fire(bus: &EventBus<World>, world: &mut World) -> Option<EntityId> {
    let origin = world
        .player
        .as_ref()
        .filter(|player| !player.destroyed)?
        .nose();

    let id = recycle_or_register(world, PoolKind::Lasers, Body::laser);
    if let Some(laser) = world.pool.get_mut(id) {
        laser.create(Spawn::at(origin));
    }
    world.armory.track(id);

    bus.emit(
        world,
        Event::Shoot {
            x: origin.x,
            y: origin.y,
        },
    );
    publish(bus, world);
    Some(id)
}

/// Send a rock drifting up from below the stage at `x`
pub fn launch_asteroid(bus: &EventBus<World>, world: &mut World, x: f32) -> EntityId {
    let id = match world.pool.recycle(PoolKind::Asteroids) {
        Some(id) => id,
        None => {
            let size = world.rng.random_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE);
            let drift = world.rng.random_range(0.25..0.5);
            world
                .pool
                .register(PoolKind::Asteroids, Body::asteroid(size, drift))
        }
    };

    let bottom = world.bounds.height;
    if let Some(rock) = world.pool.get_mut(id) {
        let start = Vec2::new(x, bottom + rock.size);
        rock.create(Spawn::at(start));
    }
    world.armory.track(id);

    publish(bus, world);
    id
}

/// Drop destroyed colliders from the cache, publishing if anything changed
pub fn reap(bus: &EventBus<World>, world: &mut World) {
    let before = world.armory.colliders.len();
    let pool = &world.pool;
    world
        .armory
        .colliders
        .retain(|&id| pool.get(id).is_some_and(|body| !body.destroyed));

    if world.armory.colliders.len() != before {
        publish(bus, world);
    }
}

fn publish(bus: &EventBus<World>, world: &mut World) {
    let colliders = world.armory.colliders.clone();
    bus.emit(world, Event::LaserCacheUpdated(colliders));
}

fn recycle_or_register(world: &mut World, kind: PoolKind, make: fn() -> Body) -> EntityId {
    world
        .pool
        .recycle(kind)
        .unwrap_or_else(|| world.pool.register(kind, make()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::event::Topic;
    use crate::sim::player::Player;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn armed_world() -> World {
        let mut world = World::new(Settings::default());
        world.player = Some(Player::new(&world.bounds));
        world
    }

    #[test]
    fn test_fire_publishes_cache() {
        let bus: EventBus<World> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.on(Topic::LaserCacheUpdated, move |_, _, event| {
            if let Event::LaserCacheUpdated(ids) = event {
                sink.borrow_mut().push(ids.len());
            }
        });

        let mut world = armed_world();
        assert!(fire(&bus, &mut world).is_some());
        assert!(fire(&bus, &mut world).is_some());
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(world.pool.len(PoolKind::Lasers), 2);
    }

    #[test]
    fn test_fire_without_hero_is_noop() {
        let bus: EventBus<World> = EventBus::new();
        let mut world = World::new(Settings::default());
        assert_eq!(fire(&bus, &mut world), None);

        world.player = Some(Player::new(&world.bounds));
        if let Some(player) = world.player.as_mut() {
            player.destroy();
        }
        assert_eq!(fire(&bus, &mut world), None);
    }

    #[test]
    fn test_reap_recycles_lasers() {
        let bus: EventBus<World> = EventBus::new();
        let mut world = armed_world();
        let first = fire(&bus, &mut world);
        if let Some(laser) = first.and_then(|id| world.pool.get_mut(id)) {
            laser.destroy();
        }

        reap(&bus, &mut world);
        assert!(world.armory.colliders().is_empty());

        let second = fire(&bus, &mut world);
        assert_eq!(first, second);
        assert_eq!(world.pool.len(PoolKind::Lasers), 1);
    }

    #[test]
    fn test_asteroid_starts_below_stage() {
        let bus: EventBus<World> = EventBus::new();
        let mut world = World::new(Settings::default());
        let id = launch_asteroid(&bus, &mut world, 200.0);
        let rock = world.pool.get(id).map(|b| (b.position, b.size, b.destroyed));
        let (position, size, destroyed) = rock.unwrap_or_default();
        assert!(!destroyed);
        assert_eq!(position, Vec2::new(200.0, world.bounds.height + size));
        assert_eq!(world.armory.colliders(), &[id]);
    }
}
