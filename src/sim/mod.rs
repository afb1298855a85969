//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only, simulated clock
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering, audio or input dependencies
//!
//! Components talk to each other only through the [`EventBus`].

pub mod armory;
pub mod bus;
pub mod collision;
pub mod engine;
pub mod entity;
pub mod event;
pub mod player;
pub mod pool;
pub mod state;
pub mod tick;
pub mod wave;

pub use bus::{EventBus, HandlerId};
pub use collision::{LaserHit, PlayerContact, circle_box_contact, circles_overlap};
pub use engine::{Phase, Session};
pub use entity::{Body, BodyKind, Canvas, Entity, NEUTRAL_POSITION, Physics, Spawn, Sprite, Surface};
pub use event::{Bounds, Effect, Event, SessionContext, Topic};
pub use player::Player;
pub use pool::{EntityId, Pool, PoolKind, Poolable};
pub use state::World;
pub use tick::{run, tick};
pub use wave::{Wave, WaveCursor, generate_wave};
