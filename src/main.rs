//! Starvent entry point
//!
//! Runs a headless session flown by a simple autopilot and prints the final
//! scoreboard as JSON.
//!
//! Usage: `starvent [SETTINGS] [--max-ticks N]`

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use starvent::sim::{
    Canvas, Effect, Event, EventBus, Phase, Player, PoolKind, SessionContext, Sprite, Surface,
    Topic, World, armory, engine, tick,
};
use starvent::{Scoreboard, Settings};

/// About ten simulated minutes at the default timestep
const DEFAULT_MAX_TICKS: u64 = 37_500;
const FIRE_EVERY_TICKS: u64 = 10;
const ASTEROID_EVERY_TICKS: u64 = 500;
/// Effects rotate on this period and stay up for `EFFECT_TICKS`
const EFFECT_PERIOD_TICKS: u64 = 2000;
const EFFECT_TICKS: u64 = 400;
const EFFECTS: [Effect; 3] = [Effect::Ice, Effect::Fire, Effect::Air];

#[derive(Parser, Debug)]
#[command(name = "starvent")]
#[command(about = "Headless wave shooter session flown by an autopilot")]
struct Cli {
    /// JSON settings file; defaults are used when omitted or unreadable
    settings: Option<PathBuf>,
    /// Stop after this many ticks if the run has not ended
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u64,
}

/// Counts what a renderer would draw
#[derive(Debug, Default)]
struct SpriteTally {
    heroes: usize,
    enemies: usize,
    projectiles: usize,
}

impl Canvas for SpriteTally {
    fn draw(&mut self, sprite: Sprite, _surface: Surface) {
        match sprite {
            Sprite::Hero => self.heroes += 1,
            Sprite::Enemy => self.enemies += 1,
            Sprite::Laser | Sprite::Asteroid => self.projectiles += 1,
        }
    }
}

/// Horizontal steering toward the lowest enemy on the field
fn steer(world: &mut World) {
    let Some(hero_x) = world.player.as_ref().map(|p| p.center().x) else {
        return;
    };
    let target = world
        .live(PoolKind::Enemies)
        .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
        .map(|enemy| enemy.position.x);

    let direction = match target {
        Some(x) if x > hero_x + 4.0 => 1.0,
        Some(x) if x < hero_x - 4.0 => -1.0,
        _ => 0.0,
    };
    if let Some(player) = world.player.as_mut() {
        player.steer(Vec2::new(direction, 0.0));
    }
}

fn schedule_effects(bus: &EventBus<World>, world: &mut World, ticks: u64) {
    let phase = ticks % EFFECT_PERIOD_TICKS;
    if phase == EFFECT_PERIOD_TICKS - EFFECT_TICKS {
        let index = (ticks / EFFECT_PERIOD_TICKS) as usize % EFFECTS.len();
        log::info!("effect {} up", EFFECTS[index].as_str());
        bus.emit(world, Event::Activate(EFFECTS[index]));
    } else if phase == 0 && ticks > 0 {
        bus.emit(world, Event::Deactivate);
    }
}

fn main() {
    env_logger::init();
    log::info!("Starvent (headless) starting...");

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load(path).unwrap_or_else(|err| {
            log::warn!("{}; using default settings", err);
            Settings::default()
        }),
        None => Settings::default(),
    };
    let max_ticks = cli.max_ticks;

    let bus: EventBus<World> = EventBus::new();
    engine::bind(&bus);
    let scoreboard = Scoreboard::attach(&bus);
    bus.on(Topic::Message, |_, _, event| {
        if let Event::Message { text, .. } = event {
            log::info!("[banner] {}", text);
        }
    });

    let mut world = World::new(settings);
    log::info!("seed {:#x}, up to {} ticks", world.seed, max_ticks);
    let player = Player::new(&world.bounds);
    let ctx = SessionContext {
        bounds: world.bounds,
    };
    bus.emit(&mut world, Event::PlayerAdded(player));
    bus.emit(&mut world, Event::Start(ctx));
    bus.emit(&mut world, Event::StartGame);

    let dt_ms = world.settings.tick_ms;
    for ticks in 0..max_ticks {
        steer(&mut world);
        if ticks % FIRE_EVERY_TICKS == 0 {
            armory::fire(&bus, &mut world);
        }
        if ticks % ASTEROID_EVERY_TICKS == ASTEROID_EVERY_TICKS / 2 {
            let x = world.random_x(starvent::consts::ASTEROID_MAX_SIZE);
            armory::launch_asteroid(&bus, &mut world, x);
        }
        schedule_effects(&bus, &mut world, ticks);

        tick(&bus, &mut world, dt_ms);

        if world.phase() == Phase::GameOver {
            break;
        }
    }

    let mut tally = SpriteTally::default();
    world.render(&mut tally);
    log::info!(
        "stopped after {} ticks ({} ms simulated); on screen: {:?}",
        world.time_ticks,
        world.now_ms,
        tally
    );

    match scoreboard.borrow().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("cannot serialize scoreboard: {}", err),
    }
}
