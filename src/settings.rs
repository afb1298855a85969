//! Engine settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Bounds;

/// Why a settings file could not be used
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read settings: {err}"),
            Self::Parse(err) => write!(f, "malformed settings: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed (waves and spawn positions)
    pub seed: u64,

    // === Stage ===
    pub stage_width: f32,
    pub stage_height: f32,

    // === Pacing ===
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    /// Minimum gap between squadrons
    pub spawn_cooldown_ms: u64,
    /// Squadrons per wave
    pub wave_length: usize,
    /// Escaped enemies that end the run
    pub overrun_limit: u32,
    /// How long wave banners are shown
    pub message_duration_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            stage_width: STAGE_WIDTH,
            stage_height: STAGE_HEIGHT,
            tick_ms: TICK_MS,
            spawn_cooldown_ms: SPAWN_COOLDOWN_MS,
            wave_length: WAVE_LENGTH,
            overrun_limit: OVERRUN_LIMIT,
            message_duration_ms: MESSAGE_DURATION_MS,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.stage_width > 0.0 && self.stage_height > 0.0) {
            return Err(SettingsError::Invalid {
                field: "stage_width/stage_height",
                reason: "stage must have a positive size",
            });
        }
        if self.tick_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_ms",
                reason: "must be at least 1",
            });
        }
        if self.wave_length == 0 {
            return Err(SettingsError::Invalid {
                field: "wave_length",
                reason: "a wave needs at least one squadron",
            });
        }
        if self.overrun_limit == 0 {
            return Err(SettingsError::Invalid {
                field: "overrun_limit",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            width: self.stage_width,
            height: self.stage_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = Settings::default();
        assert_eq!(settings.spawn_cooldown_ms, 3000);
        assert_eq!(settings.wave_length, 30);
        assert_eq!(settings.overrun_limit, 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "overrun_limit": 3 }"#);
        let settings = settings.expect("valid settings");
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.overrun_limit, 3);
        assert_eq!(settings.wave_length, WAVE_LENGTH);
    }

    #[test]
    fn test_round_trip_through_json() {
        let original = Settings {
            seed: 99,
            ..Default::default()
        };
        let json = original.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), original);
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "wave_length": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "wave_length",
                ..
            }
        ));
        assert!(err.to_string().contains("wave_length"));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
