//! Fixed timestep simulation tick
//!
//! Core loop step: advance the clock, let the `update` handlers run (spawning
//! and collisions), then move every body and report escapes.

use super::armory;
use super::bus::EventBus;
use super::event::Event;
use super::state::World;

/// Advance the world by one tick of `dt_ms` simulated milliseconds
pub fn tick(bus: &EventBus<World>, world: &mut World, dt_ms: u64) {
    world.now_ms += dt_ms;
    world.time_ticks += 1;

    bus.emit(world, Event::Update);

    let escaped = world.step_bodies();
    for _ in 0..escaped {
        bus.emit(world, Event::EnemyPassed);
    }

    armory::reap(bus, world);
}

/// Run `ticks` fixed steps using the configured timestep
pub fn run(bus: &EventBus<World>, world: &mut World, ticks: u64) {
    let dt_ms = world.settings.tick_ms;
    for _ in 0..ticks {
        tick(bus, world, dt_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::engine;
    use crate::sim::event::{SessionContext, Topic};
    use crate::sim::player::Player;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_tick_advances_clock() {
        let bus: EventBus<World> = EventBus::new();
        let mut world = World::new(Settings::default());
        tick(&bus, &mut world, 16);
        tick(&bus, &mut world, 16);
        assert_eq!(world.now_ms, 32);
        assert_eq!(world.time_ticks, 2);
    }

    #[test]
    fn test_tick_emits_update_once() {
        let bus: EventBus<World> = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        bus.on(Topic::Update, move |_, _, _| seen.set(seen.get() + 1));

        let mut world = World::new(Settings::default());
        run(&bus, &mut world, 5);
        assert_eq!(count.get(), 5);
        assert_eq!(world.now_ms, 5 * world.settings.tick_ms);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed spawn identical fields
        let run_session = || {
            let bus: EventBus<World> = EventBus::new();
            engine::bind(&bus);
            let mut world = World::new(Settings::default());
            let player = Player::new(&world.bounds);
            bus.emit(&mut world, Event::PlayerAdded(player));
            bus.emit(&mut world, Event::Start(SessionContext::default()));
            bus.emit(&mut world, Event::StartGame);
            for _ in 0..4 {
                tick(&bus, &mut world, 3000);
            }
            world
                .pool
                .slice(crate::sim::pool::PoolKind::Enemies)
                .iter()
                .map(|enemy| enemy.position)
                .collect::<Vec<_>>()
        };

        let first = run_session();
        assert!(!first.is_empty());
        assert_eq!(first, run_session());
    }
}
