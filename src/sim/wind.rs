//! Global wind model

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RaceConfig;
use crate::consts::*;
use crate::normalize_angle;

/// Wind over the whole course
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Direction the wind blows FROM (degrees)
    pub direction: f32,
    pub speed: f32,
    /// Time accumulated toward the next drift update
    #[serde(skip)]
    pub drift_timer: f32,
}

impl Wind {
    pub fn new(direction: f32, speed: f32) -> Self {
        Self {
            direction: normalize_angle(direction),
            speed: speed.max(0.0),
            drift_timer: 0.0,
        }
    }

    /// Starting wind for a race: configured direction or a random one
    pub fn from_config(config: &RaceConfig, rng: &mut impl Rng) -> Self {
        let direction = match config.wind_direction {
            Some(dir) => dir,
            None => rng.random_range(0.0..360.0),
        };
        Self::new(direction, config.wind_speed)
    }

    /// Slow random wander of speed and direction
    pub fn drift(&mut self, dt: f32, rng: &mut impl Rng) {
        self.drift_timer += dt;
        while self.drift_timer >= WIND_UPDATE_INTERVAL {
            self.drift_timer -= WIND_UPDATE_INTERVAL;

            let max_speed_change = WIND_SPEED_CHANGE_RATE * WIND_UPDATE_INTERVAL;
            let max_dir_change = WIND_DIR_CHANGE_RATE * WIND_UPDATE_INTERVAL;
            let speed_change = rng.random_range(-max_speed_change..=max_speed_change);
            let dir_change = rng.random_range(-max_dir_change..=max_dir_change);

            self.speed = (self.speed + speed_change).clamp(MIN_WIND_SPEED, MAX_WIND_SPEED);
            self.direction = normalize_angle(self.direction + dir_change);
        }
    }

    /// Swing the wind to a new random direction (speed unchanged)
    pub fn randomize_direction(&mut self, rng: &mut impl Rng) {
        self.direction = normalize_angle(rng.random_range(0.0..360.0));
        log::info!("Wind shifted to {:.0}°", self.direction);
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_WIND_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_drift_waits_for_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut wind = Wind::new(45.0, 10.0);
        wind.drift(WIND_UPDATE_INTERVAL * 0.5, &mut rng);
        assert_eq!(wind.direction, 45.0);
        assert_eq!(wind.speed, 10.0);
    }

    #[test]
    fn test_drift_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut wind = Wind::new(350.0, MAX_WIND_SPEED);
        let mut last_dir = wind.direction;
        for _ in 0..2000 {
            wind.drift(0.1, &mut rng);
            assert!((MIN_WIND_SPEED..=MAX_WIND_SPEED).contains(&wind.speed));
            assert!((0.0..360.0).contains(&wind.direction));
            let step = crate::angle_difference(wind.direction, last_dir).abs();
            assert!(step <= WIND_DIR_CHANGE_RATE * WIND_UPDATE_INTERVAL + 1e-3);
            last_dir = wind.direction;
        }
    }

    #[test]
    fn test_from_config_uses_fixed_direction() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = RaceConfig {
            wind_direction: Some(-90.0),
            wind_speed: 8.0,
            ..Default::default()
        };
        let wind = Wind::from_config(&config, &mut rng);
        assert_eq!(wind.direction, 270.0);
        assert_eq!(wind.speed, 8.0);
    }

    #[test]
    fn test_randomize_direction_in_range() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut wind = Wind::default();
        for _ in 0..50 {
            wind.randomize_direction(&mut rng);
            assert!((0.0..360.0).contains(&wind.direction));
            assert_eq!(wind.speed, DEFAULT_WIND_SPEED);
        }
    }
}
