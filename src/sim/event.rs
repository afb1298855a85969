//! Closed set of bus topics and their payloads

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::pool::EntityId;

/// Modifier that alters spawn or behavior rules while active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Grounds every enemy spawn while active
    Air,
    /// Player's fire shield: enemies touching the hero explode instead
    Fire,
    /// Enemies spawn slowed and no longer count toward the score
    Ice,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Air => "air",
            Effect::Fire => "fire",
            Effect::Ice => "ice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "air" => Some(Effect::Air),
            "fire" => Some(Effect::Fire),
            "ice" => Some(Effect::Ice),
            _ => None,
        }
    }
}

/// Stage bounds captured when a session starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: crate::consts::STAGE_WIDTH,
            height: crate::consts::STAGE_HEIGHT,
        }
    }
}

/// Payload of the `start` event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionContext {
    pub bounds: Bounds,
}

/// Topic names, one per [`Event`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Update,
    Start,
    StartGame,
    PlayerAdded,
    Activate,
    Deactivate,
    EnemyPassed,
    LaserCacheUpdated,
    EnemyDown,
    Kaboom,
    GameOver,
    Message,
    NewWave,
    Shoot,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Update => "update",
            Topic::Start => "start",
            Topic::StartGame => "start-game",
            Topic::PlayerAdded => "player-added",
            Topic::Activate => "activate",
            Topic::Deactivate => "deactivate",
            Topic::EnemyPassed => "enemy-passed",
            Topic::LaserCacheUpdated => "laser-cache-updated",
            Topic::EnemyDown => "enemy-down",
            Topic::Kaboom => "kaboom",
            Topic::GameOver => "game-over",
            Topic::Message => "message",
            Topic::NewWave => "new-wave",
            Topic::Shoot => "shoot",
        }
    }
}

/// An event and its payload
#[derive(Debug, Clone)]
pub enum Event {
    /// One simulation tick
    Update,
    Start(SessionContext),
    /// Leaves the menu; enemies only spawn after this
    StartGame,
    PlayerAdded(Player),
    Activate(Effect),
    Deactivate,
    EnemyPassed,
    /// Replaces the engine's collider set wholesale
    LaserCacheUpdated(Vec<EntityId>),
    EnemyDown,
    Kaboom { x: f32, y: f32 },
    GameOver(String),
    Message { text: String, duration_ms: u64 },
    /// 1-based number of the wave that just began
    NewWave(u32),
    Shoot { x: f32, y: f32 },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Update => Topic::Update,
            Event::Start(_) => Topic::Start,
            Event::StartGame => Topic::StartGame,
            Event::PlayerAdded(_) => Topic::PlayerAdded,
            Event::Activate(_) => Topic::Activate,
            Event::Deactivate => Topic::Deactivate,
            Event::EnemyPassed => Topic::EnemyPassed,
            Event::LaserCacheUpdated(_) => Topic::LaserCacheUpdated,
            Event::EnemyDown => Topic::EnemyDown,
            Event::Kaboom { .. } => Topic::Kaboom,
            Event::GameOver(_) => Topic::GameOver,
            Event::Message { .. } => Topic::Message,
            Event::NewWave(_) => Topic::NewWave,
            Event::Shoot { .. } => Topic::Shoot,
        }
    }

    pub fn message(text: impl Into<String>, duration_ms: u64) -> Self {
        Event::Message {
            text: text.into(),
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_parse() {
        assert_eq!(Effect::parse("AIR"), Some(Effect::Air));
        assert_eq!(Effect::parse("ice"), Some(Effect::Ice));
        assert_eq!(Effect::parse("lava"), None);
    }

    #[test]
    fn test_event_topic() {
        assert_eq!(Event::Kaboom { x: 1.0, y: 2.0 }.topic(), Topic::Kaboom);
        assert_eq!(Event::message("Wave 1", 2000).topic().as_str(), "message");
    }
}
