//! Score tracking
//!
//! A bus collaborator: counts kills from `enemy-down`, follows the wave number
//! and remembers why the run ended. It never touches the simulation.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::sim::{Event, EventBus, Topic};

/// Points awarded per scoring kill
pub const POINTS_PER_KILL: u64 = 100;

/// Run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    /// Scoring kills
    pub kills: u32,
    /// Every explosion, scoring or not
    pub explosions: u32,
    /// Highest 1-based wave reached
    pub wave: u32,
    pub shots: u32,
    /// Game-over cause, once the run has ended
    pub cause: Option<String>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a fresh scoreboard to `bus`. Works with any context type
    /// since it only reads payloads.
    pub fn attach<C: 'static>(bus: &EventBus<C>) -> Rc<RefCell<Self>> {
        let board = Rc::new(RefCell::new(Self::new()));
        for topic in [
            Topic::StartGame,
            Topic::EnemyDown,
            Topic::Kaboom,
            Topic::NewWave,
            Topic::Shoot,
            Topic::GameOver,
        ] {
            let board = board.clone();
            bus.on(topic, move |_, _, event| board.borrow_mut().record(event));
        }
        board
    }

    pub fn record(&mut self, event: &Event) {
        match event {
            Event::StartGame => {
                *self = Self::new();
                self.wave = 1;
            }
            Event::EnemyDown => {
                self.kills += 1;
                self.score += POINTS_PER_KILL;
            }
            Event::Kaboom { .. } => self.explosions += 1,
            Event::NewWave(number) => self.wave = self.wave.max(*number),
            Event::Shoot { .. } => self.shots += 1,
            Event::GameOver(cause) => {
                if self.cause.is_none() {
                    log::info!("final score {} (wave {})", self.score, self.wave);
                    self.cause = Some(cause.clone());
                }
            }
            _ => {}
        }
    }

    pub fn is_over(&self) -> bool {
        self.cause.is_some()
    }

    /// Hit ratio of lasers fired, 0 when nothing was fired
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.kills as f32 / self.shots as f32
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kills_and_waves() {
        let mut board = Scoreboard::new();
        board.record(&Event::StartGame);
        board.record(&Event::EnemyDown);
        board.record(&Event::EnemyDown);
        board.record(&Event::NewWave(2));
        board.record(&Event::NewWave(1));

        assert_eq!(board.kills, 2);
        assert_eq!(board.score, 2 * POINTS_PER_KILL);
        assert_eq!(board.wave, 2);
    }

    #[test]
    fn test_first_cause_wins() {
        let mut board = Scoreboard::new();
        board.record(&Event::GameOver("first".into()));
        board.record(&Event::GameOver("second".into()));
        assert_eq!(board.cause.as_deref(), Some("first"));
        assert!(board.is_over());
    }

    #[test]
    fn test_attach_listens_on_bus() {
        let bus: EventBus<()> = EventBus::new();
        let board = Scoreboard::attach(&bus);
        bus.emit(&mut (), Event::Shoot { x: 0.0, y: 0.0 });
        bus.emit(&mut (), Event::Shoot { x: 0.0, y: 0.0 });
        bus.emit(&mut (), Event::EnemyDown);
        bus.emit(&mut (), Event::Kaboom { x: 1.0, y: 1.0 });

        let board = board.borrow();
        assert_eq!(board.shots, 2);
        assert_eq!(board.explosions, 1);
        assert_eq!(board.accuracy(), 0.5);
    }

    #[test]
    fn test_summary_serializes() {
        let board = Scoreboard {
            score: 300,
            kills: 3,
            cause: Some("done".into()),
            ..Default::default()
        };
        let json = board.to_json().expect("serializes");
        assert!(json.contains("\"score\": 300"));
    }
}
