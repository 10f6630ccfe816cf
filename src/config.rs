//! Race configuration
//!
//! Supplied once at race setup and never mutated while racing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_WIND_SPEED, MIN_WIND_SPEED};

/// Most opponents a course supports (start slots are laid out in a line)
pub const MAX_OPPONENTS: usize = 12;
/// Lap count bounds offered by the setup screen
pub const MIN_LAPS: u32 = 1;
pub const MAX_LAPS: u32 = 10;

/// When the race as a whole is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FinishPolicy {
    /// Race ends as soon as the player finishes; everyone else is DNF
    PlayerFinishes,
    /// Race ends once every boat has finished (or the time limit hits)
    #[default]
    AllFinish,
}

impl FinishPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishPolicy::PlayerFinishes => "player",
            FinishPolicy::AllFinish => "all",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "player" | "player-finishes" => Some(FinishPolicy::PlayerFinishes),
            "all" | "all-finish" => Some(FinishPolicy::AllFinish),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid race config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lap count {0} outside 1..=10")]
    InvalidLaps(u32),
    #[error("course needs at least one buoy")]
    NoBuoys,
    #[error("{0} opponents requested, at most 12 supported")]
    TooManyOpponents(usize),
    #[error("time limit must be positive and finite, got {0}")]
    InvalidTimeLimit(f32),
    #[error("wind speed {0} outside 6..=14")]
    InvalidWindSpeed(f32),
}

/// Race setup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Laps to complete
    pub laps: u32,
    /// Course buoys per lap
    pub num_buoys: usize,
    /// AI opponents
    pub num_opponents: usize,
    pub num_islands: usize,
    pub finish_policy: FinishPolicy,
    /// Let wind speed and direction wander during the race
    pub wind_drift: bool,
    /// Starting wind direction; random when unset
    pub wind_direction: Option<f32>,
    pub wind_speed: f32,
    /// Countdown before the start (seconds)
    pub countdown_secs: f32,
    /// Race clock limit; boats still racing are DNF (seconds)
    pub time_limit_secs: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            laps: 3,
            num_buoys: 8,
            num_opponents: 3,
            num_islands: 5,
            finish_policy: FinishPolicy::AllFinish,
            wind_drift: true,
            wind_direction: None,
            wind_speed: crate::consts::DEFAULT_WIND_SPEED,
            countdown_secs: 3.0,
            time_limit_secs: 900.0,
        }
    }
}

impl RaceConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_LAPS..=MAX_LAPS).contains(&self.laps) {
            return Err(ConfigError::InvalidLaps(self.laps));
        }
        if self.num_buoys == 0 {
            return Err(ConfigError::NoBuoys);
        }
        if self.num_opponents > MAX_OPPONENTS {
            return Err(ConfigError::TooManyOpponents(self.num_opponents));
        }
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            return Err(ConfigError::InvalidTimeLimit(self.time_limit_secs));
        }
        if !(MIN_WIND_SPEED..=MAX_WIND_SPEED).contains(&self.wind_speed) {
            return Err(ConfigError::InvalidWindSpeed(self.wind_speed));
        }
        Ok(())
    }

    /// Setup-screen lap stepper (clamped)
    pub fn adjust_laps(&mut self, delta: i32) {
        let laps = (self.laps as i32 + delta).clamp(MIN_LAPS as i32, MAX_LAPS as i32);
        self.laps = laps as u32;
    }

    /// Total boats on the water, player included
    pub fn fleet_size(&self) -> usize {
        self.num_opponents + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RaceConfig::default().validate().is_ok());
        assert_eq!(RaceConfig::default().fleet_size(), 4);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RaceConfig::from_json(r#"{ "laps": 1, "finish_policy": "PlayerFinishes" }"#)
            .expect("valid config");
        assert_eq!(config.laps, 1);
        assert_eq!(config.finish_policy, FinishPolicy::PlayerFinishes);
        assert_eq!(config.num_buoys, 8);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            RaceConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RaceConfig::from_json(r#"{ "laps": 0 }"#),
            Err(ConfigError::InvalidLaps(0))
        ));
        assert!(matches!(
            RaceConfig::from_json(r#"{ "num_buoys": 0 }"#),
            Err(ConfigError::NoBuoys)
        ));
        assert!(matches!(
            RaceConfig::from_json(r#"{ "num_opponents": 40 }"#),
            Err(ConfigError::TooManyOpponents(40))
        ));
        assert!(matches!(
            RaceConfig::from_json(r#"{ "time_limit_secs": -1.0 }"#),
            Err(ConfigError::InvalidTimeLimit(_))
        ));
    }

    #[test]
    fn test_wind_speed_must_fit_drift_range() {
        // Drift keeps speed inside 6..=14, so a start outside it would jump
        for speed in ["0.0", "5.9", "14.5", "20.0"] {
            let json = format!(r#"{{ "wind_speed": {} }}"#, speed);
            assert!(matches!(
                RaceConfig::from_json(&json),
                Err(ConfigError::InvalidWindSpeed(_))
            ));
        }
        for speed in ["6.0", "14.0"] {
            let json = format!(r#"{{ "wind_speed": {} }}"#, speed);
            assert!(RaceConfig::from_json(&json).is_ok());
        }
    }

    #[test]
    fn test_adjust_laps_clamps() {
        let mut config = RaceConfig::default();
        config.adjust_laps(-10);
        assert_eq!(config.laps, MIN_LAPS);
        config.adjust_laps(50);
        assert_eq!(config.laps, MAX_LAPS);
    }

    #[test]
    fn test_finish_policy_str() {
        for policy in [FinishPolicy::PlayerFinishes, FinishPolicy::AllFinish] {
            assert_eq!(FinishPolicy::from_str(policy.as_str()), Some(policy));
        }
        assert_eq!(FinishPolicy::from_str("nobody"), None);
    }
}
