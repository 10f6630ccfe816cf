//! Sailing physics
//!
//! Drive comes from the wind angle on the boat and how well the sail is
//! trimmed for it. Speed is limited by a superlinear drag term.

use glam::Vec2;
use rand::Rng;

use super::state::{SailTrim, Vessel, WakeParticle};
use super::wind::Wind;
use crate::consts::*;
use crate::{angle_difference, deg_to_rad, heading_vector, lerp, normalize_angle};

/// Best sail angle for a given wind angle relative to the bow
///
/// Returns 0 inside the no-sail zone.
pub fn optimal_sail_trim(wind_rel: f32) -> f32 {
    if wind_rel.abs() < MIN_SAILING_ANGLE {
        return 0.0;
    }
    angle_difference(wind_rel + 180.0, 90.0).clamp(-MAX_SAIL_ANGLE_REL, MAX_SAIL_ANGLE_REL)
}

/// How well a sail angle matches the optimal one, 0-1
pub fn trim_effectiveness(sail_angle: f32, optimal: f32) -> f32 {
    let trim_diff = angle_difference(sail_angle, optimal);
    ((deg_to_rad(trim_diff).cos() + 1.0) / 2.0).powi(2)
}

/// Drive multiplier for the point of sail; a beam reach is best
pub fn point_of_sail_effectiveness(wind_rel: f32) -> f32 {
    let reach_diff = (wind_rel.abs() - 90.0).abs();
    deg_to_rad(reach_diff).cos().max(0.1)
}

/// Fraction of full rudder authority at a given speed
pub fn turn_effectiveness(speed: f32) -> f32 {
    let speed_component =
        (1.0 - MIN_TURN_EFFECTIVENESS) * (speed / (MAX_BOAT_SPEED * 0.7)).min(1.0);
    MIN_TURN_EFFECTIVENESS + speed_component
}

impl Vessel {
    /// Apply a held sail trim command for one frame
    pub fn trim_sail(&mut self, trim: SailTrim, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.sail_angle = (self.sail_angle + trim.sign() * SAIL_TRIM_SPEED * dt * REFERENCE_HZ)
            .clamp(-MAX_SAIL_ANGLE_REL, MAX_SAIL_ANGLE_REL);
    }

    /// Advance the boat by `dt` seconds under the given wind
    pub fn step(&mut self, wind: &Wind, dt: f32, rng: &mut impl Rng) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let turn = self.rudder.sign() * BOAT_TURN_SPEED * turn_effectiveness(self.speed);
        self.heading = normalize_angle(self.heading + turn * dt * REFERENCE_HZ);

        let wind_rel = angle_difference(wind.direction, self.heading);

        // Sail can't set past where the wind pushes it
        let natural =
            angle_difference(180.0, wind_rel).clamp(-MAX_SAIL_ANGLE_REL, MAX_SAIL_ANGLE_REL);
        self.visual_sail_angle = if natural < 0.0 {
            natural.max(self.sail_angle)
        } else {
            natural.min(self.sail_angle)
        };

        let mut force = 0.0;
        self.wind_effectiveness = 0.0;
        self.optimal_sail_trim = 0.0;
        if wind_rel.abs() >= MIN_SAILING_ANGLE {
            self.optimal_sail_trim = optimal_sail_trim(wind_rel);
            let trim_eff = trim_effectiveness(self.sail_angle, self.optimal_sail_trim);
            self.wind_effectiveness = (trim_eff * point_of_sail_effectiveness(wind_rel)).max(0.0);
            force = (wind.speed * BOAT_ACCEL_FACTOR * self.wind_effectiveness).max(0.0);
        }

        self.speed += force * dt;
        let mut drag_factor = 1.0 - BOAT_DRAG;
        if self.on_sandbar {
            drag_factor *= SANDBAR_DRAG_MULTIPLIER;
        }
        self.speed -= self.speed.max(0.0).powf(1.8) * drag_factor * dt;
        if force < 0.01 && self.speed > 0.0 {
            self.speed -= NO_POWER_DECEL * dt;
        }
        self.speed = self.speed.clamp(0.0, MAX_BOAT_SPEED);

        self.pos += heading_vector(self.heading) * self.speed * dt * DISTANCE_SCALE;

        let sail_wind = angle_difference(wind.direction, self.heading + self.sail_angle).abs();
        let target_heel = -deg_to_rad(sail_wind).sin() * self.wind_effectiveness * MAX_HEEL;
        self.heel = lerp(self.heel, target_heel, HEEL_SMOOTHING);

        self.update_wake(dt, rng);
    }

    fn update_wake(&mut self, dt: f32, rng: &mut impl Rng) {
        self.time_since_last_wake += dt;
        if self.speed > WAKE_MIN_SPEED
            && self.time_since_last_wake >= WAKE_SPAWN_INTERVAL
            && self.wake.len() < MAX_WAKE_PARTICLES
        {
            let stern = self.pos + heading_vector(self.heading) * WAKE_STERN_OFFSET;
            let jitter = Vec2::new(
                rng.random_range(-WAKE_JITTER..WAKE_JITTER),
                rng.random_range(-WAKE_JITTER..WAKE_JITTER),
            );
            self.wake.push(WakeParticle::new(stern + jitter));
            self.time_since_last_wake = 0.0;
        }

        for particle in &mut self.wake {
            particle.life -= dt;
        }
        self.wake.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Rudder;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn boat(heading: f32) -> Vessel {
        let mut v = Vessel::new(0, "test");
        v.heading = heading;
        v
    }

    #[test]
    fn test_no_force_in_irons() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 10.0);
        // Wind 30° off the bow
        let mut v = boat(30.0);
        v.sail_angle = 20.0;
        v.step(&wind, DT, &mut rng);
        assert_eq!(v.wind_effectiveness, 0.0);
        assert_eq!(v.optimal_sail_trim, 0.0);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn test_trim_effectiveness_at_optimal() {
        let optimal = optimal_sail_trim(90.0);
        assert!((trim_effectiveness(optimal, optimal) - 1.0).abs() < 1e-6);
        let optimal = optimal_sail_trim(-90.0);
        assert!((trim_effectiveness(optimal, optimal) - 1.0).abs() < 1e-6);
        assert!(trim_effectiveness(optimal + 60.0, optimal) < 0.6);
    }

    #[test]
    fn test_beam_reach_is_full_power() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 10.0);
        let mut v = boat(90.0);
        v.step(&wind, DT, &mut rng);
        assert!((v.wind_effectiveness - 1.0).abs() < 1e-5);
        assert!(v.speed > 0.0);
        // Heel eases toward full lean, one smoothing step per tick
        assert!((v.heel + MAX_HEEL * HEEL_SMOOTHING).abs() < 1e-4, "heel {}", v.heel);
        v.step(&wind, DT, &mut rng);
        assert!(v.heel < -MAX_HEEL * HEEL_SMOOTHING && v.heel > -MAX_HEEL);
    }

    #[test]
    fn test_steady_state_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 10.0);
        let mut v = boat(90.0);
        for _ in 0..(60 * 120) {
            v.step(&wind, DT, &mut rng);
        }
        // force 1.0 balances drag 0.05 * s^1.8
        let expected = (1.0f32 / (1.0 - BOAT_DRAG)).powf(1.0 / 1.8);
        assert!(expected < MAX_BOAT_SPEED);
        assert!((v.speed - expected).abs() < 0.05, "speed {} vs {}", v.speed, expected);
        // Kept heading, moved along +Y
        assert!(v.pos.y > 1000.0);
        assert!(v.pos.x.abs() < 1e-2);
    }

    /// Degrees turned with the rudder held right for one second at a fixed speed
    fn turn_in_one_second(speed: f32, rng: &mut Pcg32) -> f32 {
        let wind = Wind::new(0.0, 0.0);
        let mut v = boat(90.0);
        v.rudder = Rudder::Right;
        let mut turned = 0.0;
        for _ in 0..60 {
            v.speed = speed;
            let before = v.heading;
            v.step(&wind, DT, rng);
            turned += angle_difference(v.heading, before);
        }
        turned
    }

    #[test]
    fn test_turning_depends_on_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 0.0);

        let stopped = turn_in_one_second(0.0, &mut rng);
        let full = turn_in_one_second(MAX_BOAT_SPEED * 0.7, &mut rng);
        let half = turn_in_one_second(MAX_BOAT_SPEED * 0.35, &mut rng);
        let flat_out = turn_in_one_second(MAX_BOAT_SPEED, &mut rng);

        // 60 ticks at 1.5°/tick full authority
        assert!((stopped - 90.0 * MIN_TURN_EFFECTIVENESS).abs() < 1e-2, "{}", stopped);
        assert!((full - 90.0).abs() < 1e-2, "{}", full);
        assert!(stopped < half && half < full);
        // Authority saturates at 70% of top speed
        assert!((flat_out - full).abs() < 1e-3);

        let mut left = boat(90.0);
        left.rudder = Rudder::Left;
        left.step(&wind, DT, &mut rng);
        assert!(left.heading < 90.0);
    }

    #[test]
    fn test_sandbar_slows_boat() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 10.0);
        let mut clear = boat(90.0);
        clear.speed = 4.0;
        let mut grounded = clear.clone();
        grounded.on_sandbar = true;
        clear.step(&wind, DT, &mut rng);
        grounded.step(&wind, DT, &mut rng);
        assert!(grounded.speed < clear.speed);
    }

    #[test]
    fn test_invalid_dt_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 10.0);
        let mut v = boat(90.0);
        v.speed = 2.0;
        v.rudder = Rudder::Right;
        for dt in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            v.step(&wind, dt, &mut rng);
            v.trim_sail(SailTrim::Increase, dt);
        }
        assert_eq!(v.heading, 90.0);
        assert_eq!(v.speed, 2.0);
        assert_eq!(v.pos, Vec2::ZERO);
        assert_eq!(v.sail_angle, 0.0);
    }

    #[test]
    fn test_trim_sail_clamps() {
        let mut v = boat(0.0);
        v.trim_sail(SailTrim::Increase, DT);
        assert!((v.sail_angle - SAIL_TRIM_SPEED).abs() < 1e-4);
        for _ in 0..500 {
            v.trim_sail(SailTrim::Increase, DT);
        }
        assert_eq!(v.sail_angle, MAX_SAIL_ANGLE_REL);
        for _ in 0..500 {
            v.trim_sail(SailTrim::Decrease, DT);
        }
        assert_eq!(v.sail_angle, -MAX_SAIL_ANGLE_REL);
    }

    #[test]
    fn test_wake_spawns_and_expires() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 0.0);
        let mut v = boat(0.0);
        v.speed = 3.0;
        v.step(&wind, WAKE_SPAWN_INTERVAL, &mut rng);
        assert_eq!(v.wake.len(), 1);
        let p = v.wake[0].pos;
        // Behind the boat (heading 0 means stern is -X)
        assert!(p.x < v.pos.x);

        v.speed = 0.0;
        for _ in 0..40 {
            v.speed = 0.0;
            v.step(&wind, 0.1, &mut rng);
        }
        assert!(v.wake.is_empty());
    }

    #[test]
    fn test_wake_population_is_capped() {
        let mut rng = Pcg32::seed_from_u64(1);
        let wind = Wind::new(0.0, 0.0);
        let mut v = boat(0.0);
        v.wake = vec![WakeParticle::new(Vec2::ZERO); MAX_WAKE_PARTICLES];
        v.speed = 3.0;
        v.time_since_last_wake = WAKE_SPAWN_INTERVAL;
        v.step(&wind, DT, &mut rng);
        assert_eq!(v.wake.len(), MAX_WAKE_PARTICLES);
        // No spawn, so the interval timer keeps running
        assert!(v.time_since_last_wake > WAKE_SPAWN_INTERVAL);

        // Room again once one particle expires
        v.wake[0].life = 0.0;
        v.step(&wind, DT, &mut rng);
        assert_eq!(v.wake.len(), MAX_WAKE_PARTICLES - 1);
        v.step(&wind, DT, &mut rng);
        assert_eq!(v.wake.len(), MAX_WAKE_PARTICLES);
        assert_eq!(v.time_since_last_wake, 0.0);
    }

    proptest! {
        #[test]
        fn speed_stays_bounded(
            commands in prop::collection::vec((-1i32..=1, -1i32..=1, 0.001f32..0.1), 1..300),
            wind_dir in 0.0f32..360.0,
            wind_speed in 0.0f32..20.0,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let wind = Wind::new(wind_dir, wind_speed);
            let mut v = boat(90.0);
            for (rudder, trim, dt) in commands {
                v.rudder = Rudder::from_sign(rudder);
                v.trim_sail(SailTrim::from_sign(trim), dt);
                v.step(&wind, dt, &mut rng);
                prop_assert!(v.speed >= 0.0 && v.speed <= MAX_BOAT_SPEED);
                prop_assert!((0.0..360.0).contains(&v.heading));
                prop_assert!(v.sail_angle.abs() <= MAX_SAIL_ANGLE_REL);
                prop_assert!(v.wake.len() <= MAX_WAKE_PARTICLES);
            }
        }
    }
}
