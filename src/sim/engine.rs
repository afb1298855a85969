//! Engine loop controller
//!
//! Drives a play session entirely through the bus:
//!
//! - `start` builds a fresh [`Session`] and subscribes the per-tick handlers
//! - `start-game` opens the spawn gate
//! - every `update` spawns squadrons (rate limited), then resolves
//!   laser/enemy hits, then hero/enemy contact
//! - `enemy-passed` and a fatal contact both end the run with `game-over`
//!
//! Handlers never hold a borrow of the session across an emission; they read
//! what they need, emit, then look the session up again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bus::{EventBus, HandlerId};
use super::collision;
use super::entity::{Body, Entity, Spawn};
use super::event::{Bounds, Effect, Event, SessionContext, Topic};
use super::pool::{EntityId, PoolKind};
use super::state::World;
use super::wave::{Wave, WaveCursor, generate_wave};
use crate::consts::{CAUSE_OVERRUN, CAUSE_PLAYER_DEAD, ENEMY_SIZE};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No `start` seen yet
    Uninitialized,
    Running,
    /// Run ended; terminal until the next `start`
    GameOver,
}

/// Per-run engine state, created by `start`
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: Phase,
    pub bounds: Bounds,
    pub enemies_passed: u32,
    /// Completed waves (0-based index of the current wave)
    pub wave_count: u32,
    pub current_wave: Wave,
    pub waves: WaveCursor,
    pub last_spawn_ms: u64,
    pub current_effect: Option<Effect>,
    /// Latest published collider set
    pub colliders: Vec<EntityId>,
    spawner: Option<HandlerId>,
    player_check: Option<HandlerId>,
    subscriptions: Vec<(Topic, HandlerId)>,
}

impl Session {
    fn new(ctx: &SessionContext, first_wave: Wave, now_ms: u64) -> Self {
        Self {
            phase: Phase::Running,
            bounds: ctx.bounds,
            enemies_passed: 0,
            wave_count: 0,
            current_wave: first_wave,
            waves: WaveCursor::new(),
            last_spawn_ms: now_ms,
            current_effect: None,
            colliders: Vec::new(),
            spawner: None,
            player_check: None,
            subscriptions: Vec::new(),
        }
    }

    /// 1-based wave number as shown to the player
    pub fn wave_number(&self) -> u32 {
        self.wave_count + 1
    }

    pub fn is_spawning(&self) -> bool {
        self.spawner.is_some()
    }

    /// Remove every handler this session put on the bus
    fn unsubscribe_all(&mut self, bus: &EventBus<World>) {
        if let Some(id) = self.spawner.take() {
            bus.off(Topic::Update, id);
        }
        self.player_check = None;
        for (topic, id) in self.subscriptions.drain(..) {
            bus.off(topic, id);
        }
    }
}

/// Register the engine's permanent handlers (`player-added`, `start`)
pub fn bind(bus: &EventBus<World>) {
    bus.on(Topic::PlayerAdded, |_, world, event| {
        if let Event::PlayerAdded(player) = event {
            log::info!("player added at {:?}", player.position);
            world.player = Some(player.clone());
        }
    });
    bus.on(Topic::Start, |bus, world, event| {
        if let Event::Start(ctx) = event {
            start(bus, world, ctx);
        }
    });
}

/// Reset the session and subscribe the per-run handlers
fn start(bus: &EventBus<World>, world: &mut World, ctx: &SessionContext) {
    if let Some(mut old) = world.session.take() {
        log::info!("restarting session (was {:?})", old.phase);
        old.unsubscribe_all(bus);
    }
    for enemy in world.pool.slice_mut(PoolKind::Enemies) {
        enemy.destroy();
    }

    world.bounds = ctx.bounds;
    let first_wave = generate_wave(&mut world.rng, 0, world.settings.wave_length);
    let mut session = Session::new(ctx, first_wave, world.now_ms);

    let mut subscribe = |topic: Topic, id: HandlerId| session.subscriptions.push((topic, id));

    subscribe(Topic::Update, bus.on(Topic::Update, check_laser_collisions));
    let player_check = bus.on(Topic::Update, check_player_collisions);
    subscribe(Topic::Update, player_check);
    subscribe(
        Topic::LaserCacheUpdated,
        bus.on(Topic::LaserCacheUpdated, |_, world, event| {
            if let (Some(session), Event::LaserCacheUpdated(ids)) = (world.session.as_mut(), event)
            {
                session.colliders = ids.clone();
            }
        }),
    );
    subscribe(
        Topic::Activate,
        bus.on(Topic::Activate, |_, world, event| {
            if let Event::Activate(effect) = event {
                set_effect(world, Some(*effect));
            }
        }),
    );
    subscribe(
        Topic::Deactivate,
        bus.on(Topic::Deactivate, |_, world, _| set_effect(world, None)),
    );
    subscribe(Topic::StartGame, bus.on(Topic::StartGame, open_spawn_gate));
    subscribe(
        Topic::StartGame,
        bus.on(Topic::StartGame, |bus, world, _| {
            let duration = world.settings.message_duration_ms;
            bus.emit(world, Event::message("Wave 1", duration));
        }),
    );
    subscribe(Topic::EnemyPassed, bus.on(Topic::EnemyPassed, passed_enemy));
    subscribe(Topic::GameOver, bus.on(Topic::GameOver, game_over));
    subscribe(
        Topic::NewWave,
        bus.on(Topic::NewWave, |_, world, _| {
            if let Some(session) = world.session.as_mut() {
                session.waves.rewind();
            }
        }),
    );

    session.player_check = Some(player_check);
    log::info!(
        "session started: {}x{} stage, {} squadrons per wave",
        ctx.bounds.width,
        ctx.bounds.height,
        session.current_wave.len()
    );
    world.session = Some(session);
}

fn set_effect(world: &mut World, effect: Option<Effect>) {
    if let Some(session) = world.session.as_mut() {
        log::debug!("effect {:?} -> {:?}", session.current_effect, effect);
        session.current_effect = effect;
    }
    if let Some(player) = world.player.as_mut() {
        player.apply_effect(effect);
    }
}

/// `start-game`: begin spawning on every tick
fn open_spawn_gate(bus: &EventBus<World>, world: &mut World, _: &Event) {
    let Some(session) = world.session.as_mut() else {
        return;
    };
    if session.phase != Phase::Running || session.spawner.is_some() {
        return;
    }
    session.spawner = Some(bus.on(Topic::Update, create_enemies));
    log::info!("spawning enabled");
}

enum Next {
    Squadron(u32),
    /// Current wave exhausted; carries the 1-based number of the new one
    Wave(u32),
}

/// `update`: spawn the next squadron once the cooldown has elapsed
fn create_enemies(bus: &EventBus<World>, world: &mut World, _: &Event) {
    let now = world.now_ms;
    let cooldown = world.settings.spawn_cooldown_ms;
    let wave_length = world.settings.wave_length;

    let next = {
        let Some(session) = world.session.as_mut() else {
            return;
        };
        let elapsed = now.saturating_sub(session.last_spawn_ms);
        if session.phase != Phase::Running || elapsed < cooldown {
            return;
        }

        match session.waves.next_squadron(&session.current_wave) {
            Some(squadron) => Next::Squadron(squadron),
            None => {
                session.wave_count += 1;
                session.current_wave =
                    generate_wave(&mut world.rng, session.wave_count, wave_length);
                Next::Wave(session.wave_number())
            }
        }
    };

    let squadron = match next {
        Next::Squadron(squadron) => squadron,
        Next::Wave(number) => {
            log::info!("wave {} begins", number);
            let duration = world.settings.message_duration_ms;
            bus.emit(world, Event::NewWave(number));
            bus.emit(world, Event::message(format!("Wave {}", number), duration));

            // The new-wave handler rewound the cursor
            let Some(session) = world.session.as_mut() else {
                return;
            };
            session.waves.next_squadron(&session.current_wave).unwrap_or(0)
        }
    };

    let Some(effect) = world.session.as_ref().map(|session| session.current_effect) else {
        return;
    };

    if effect == Some(Effect::Air) {
        log::debug!("squadron of {} grounded by air", squadron);
    } else {
        for _ in 0..squadron {
            spawn_enemy(world, effect);
        }
        log::debug!("spawned squadron of {}", squadron);
    }

    if let Some(session) = world.session.as_mut() {
        session.last_spawn_ms = now;
    }
}

/// Recycle or allocate one enemy and drop it in at the top of the stage
fn spawn_enemy(world: &mut World, effect: Option<Effect>) -> EntityId {
    let id = match world.pool.recycle(PoolKind::Enemies) {
        Some(id) => id,
        None => world.pool.register(PoolKind::Enemies, Body::enemy()),
    };

    let x = world.random_x(ENEMY_SIZE);
    if let Some(enemy) = world.pool.get_mut(id) {
        enemy.create(Spawn {
            position: Vec2::new(x, -enemy.size),
            effect,
        });
    }
    id
}

/// `update`: lasers and asteroids against enemies
fn check_laser_collisions(bus: &EventBus<World>, world: &mut World, _: &Event) {
    let Some(session) = world.session.as_ref() else {
        return;
    };
    let hits = collision::resolve_laser_hits(&mut world.pool, &session.colliders);

    for hit in hits {
        bus.emit(
            world,
            Event::Kaboom {
                x: hit.point.x,
                y: hit.point.y,
            },
        );
        if hit.scores {
            bus.emit(world, Event::EnemyDown);
        }
    }
}

/// `update`: hero against enemies. Unsubscribes itself when the hero dies.
fn check_player_collisions(bus: &EventBus<World>, world: &mut World, _: &Event) {
    let Some(player) = world.player.as_ref() else {
        return;
    };
    let contact = collision::resolve_player_contact(player, &mut world.pool);

    for point in contact.explosions {
        bus.emit(
            world,
            Event::Kaboom {
                x: point.x,
                y: point.y,
            },
        );
    }

    if !contact.fatal {
        return;
    }

    if let Some(player) = world.player.as_mut() {
        player.destroy();
    }
    if let Some(id) = world.session.as_mut().and_then(|s| s.player_check.take()) {
        bus.off(Topic::Update, id);
    }
    bus.emit(world, Event::GameOver(CAUSE_PLAYER_DEAD.to_string()));
}

/// `enemy-passed`: count escapes, ending the run exactly at the limit
fn passed_enemy(bus: &EventBus<World>, world: &mut World, _: &Event) {
    let limit = world.settings.overrun_limit;
    let Some(session) = world.session.as_mut() else {
        return;
    };
    session.enemies_passed += 1;
    log::debug!("enemy passed ({}/{})", session.enemies_passed, limit);

    if session.enemies_passed == limit {
        bus.emit(world, Event::GameOver(CAUSE_OVERRUN.to_string()));
    }
}

/// `game-over`: clear the field and stop spawning
fn game_over(bus: &EventBus<World>, world: &mut World, event: &Event) {
    if let Event::GameOver(cause) = event {
        log::info!("game over: {}", cause);
    }

    for enemy in world.pool.slice_mut(PoolKind::Enemies) {
        enemy.destroy();
    }

    if let Some(session) = world.session.as_mut() {
        if let Some(id) = session.spawner.take() {
            bus.off(Topic::Update, id);
        }
        session.phase = Phase::GameOver;
    }
}
