//! Dinghy Race - sailing race simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sailing physics, AI skippers, collisions, race progress)
//! - `config`: Race setup (laps, course size, opponents, finish policy)
//! - `series`: Multi-race series scoring
//! - `platform`: Browser bindings (wasm32 only)

pub mod config;
pub mod platform;
pub mod series;
pub mod sim;

pub use config::{ConfigError, FinishPolicy, RaceConfig};
pub use series::SeriesStandings;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Largest frame delta the tick accepts (seconds); longer frames are clamped
    pub const MAX_DT: f32 = 0.1;
    /// Reference tick rate the turn/trim constants are tuned against
    pub const REFERENCE_HZ: f32 = 60.0;

    /// Boat handling
    pub const BOAT_TURN_SPEED: f32 = 1.5;
    pub const BOAT_ACCEL_FACTOR: f32 = 0.1;
    pub const BOAT_DRAG: f32 = 0.95;
    pub const MAX_BOAT_SPEED: f32 = 6.0;
    /// Turn authority of a stationary boat (fraction of full rudder)
    pub const MIN_TURN_EFFECTIVENESS: f32 = 0.3;
    /// Degrees per reference tick while the trim command is held
    pub const SAIL_TRIM_SPEED: f32 = 1.5;
    pub const MAX_SAIL_ANGLE_REL: f32 = 90.0;
    /// No-sail zone half-angle either side of the wind (degrees)
    pub const MIN_SAILING_ANGLE: f32 = 45.0;
    /// Extra deceleration when the sail produces no drive
    pub const NO_POWER_DECEL: f32 = 0.1;
    pub const SANDBAR_DRAG_MULTIPLIER: f32 = 10.0;
    /// World units travelled per unit of speed per second
    pub const DISTANCE_SCALE: f32 = 40.0;
    pub const BOAT_COLLISION_RADIUS: f32 = 18.0;
    /// Maximum heel angle (degrees)
    pub const MAX_HEEL: f32 = 30.0;
    /// Per-tick easing factor toward the target heel
    pub const HEEL_SMOOTHING: f32 = 0.1;

    /// Wake
    pub const MAX_WAKE_PARTICLES: usize = 100;
    pub const WAKE_SPAWN_INTERVAL: f32 = 0.1;
    pub const WAKE_LIFETIME: f32 = 2.0;
    pub const WAKE_MIN_SPEED: f32 = 0.5;
    pub const WAKE_STERN_OFFSET: f32 = -20.0;
    pub const WAKE_JITTER: f32 = 3.0;

    /// Wind
    pub const DEFAULT_WIND_SPEED: f32 = 10.0;
    pub const MIN_WIND_SPEED: f32 = 6.0;
    pub const MAX_WIND_SPEED: f32 = 14.0;
    /// Max wind speed change per second of drift
    pub const WIND_SPEED_CHANGE_RATE: f32 = 0.2;
    /// Max wind direction change (degrees) per second of drift
    pub const WIND_DIR_CHANGE_RATE: f32 = 0.6;
    /// Seconds between wind drift updates
    pub const WIND_UPDATE_INTERVAL: f32 = 1.0;

    /// Collisions
    pub const BOAT_RESTITUTION: f32 = 0.5;
    /// Speed kept after a boat-boat impulse
    pub const COLLISION_ENERGY_RETAIN: f32 = 0.95;
    /// Speed kept after hitting an island
    pub const ISLAND_SPEED_RETAIN: f32 = 0.8;

    /// Course
    pub const BUOY_RADIUS: f32 = 10.0;
    pub const BUOY_ROUNDING_RADIUS: f32 = 50.0;
    pub const MIN_OBJ_SEPARATION: f32 = 150.0;
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Radians to degrees
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed rotation (degrees) taking `b` onto `a`, in (-180, 180]
#[inline]
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let diff = normalize_angle(a - b);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Squared distance between two points
#[inline]
pub fn distance_squared(p1: Vec2, p2: Vec2) -> f32 {
    (p1 - p2).length_squared()
}

/// Unit vector for a heading in degrees (0 = +X, 90 = +Y)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    let rad = deg_to_rad(heading);
    Vec2::new(rad.cos(), rad.sin())
}

/// Compass bearing from one point to another, in [0, 360)
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_angle(rad_to_deg(d.y.atan2(d.x)))
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(725.0), 5.0);
        assert!(normalize_angle(-1e-7) < 360.0);
    }

    #[test]
    fn test_angle_difference() {
        assert_eq!(angle_difference(10.0, 350.0), 20.0);
        assert_eq!(angle_difference(350.0, 10.0), -20.0);
        assert_eq!(angle_difference(0.0, 90.0), -90.0);
        // The 180 edge always resolves to +180
        assert_eq!(angle_difference(180.0, 0.0), 180.0);
        assert_eq!(angle_difference(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_heading_vector_and_bearing() {
        let v = heading_vector(90.0);
        assert!(v.x.abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6);
        assert!((bearing(Vec2::ZERO, Vec2::new(0.0, 10.0)) - 90.0).abs() < 1e-4);
        assert!((bearing(Vec2::ZERO, Vec2::new(-10.0, 0.0)) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(-30.0, 0.0, 0.5), -15.0);
    }

    #[test]
    fn test_distance_squared() {
        assert_eq!(distance_squared(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0)), 25.0);
    }

    proptest! {
        #[test]
        fn normalize_is_in_range_and_idempotent(h in -1.0e5f32..1.0e5) {
            let n = normalize_angle(h);
            prop_assert!((0.0..360.0).contains(&n));
            prop_assert_eq!(normalize_angle(n), n);
        }

        #[test]
        fn angle_difference_is_in_range(a in -1.0e4f32..1.0e4, b in -1.0e4f32..1.0e4) {
            let d = angle_difference(a, b);
            prop_assert!(d > -180.0 && d <= 180.0);
            prop_assert_eq!(angle_difference(a, a), 0.0);
        }

        #[test]
        fn angle_difference_is_antisymmetric(a in 0.0f32..360.0, b in 0.0f32..360.0) {
            let ab = angle_difference(a, b);
            let ba = angle_difference(b, a);
            if ab.abs() < 179.9 {
                prop_assert!((ab + ba).abs() < 1e-3);
            }
        }
    }
}
