//! AI skippers
//!
//! Each AI boat carries a pilot that turns the race situation into helm
//! commands: sail straight for the next mark, beat upwind on alternating
//! tacks, steer clear of islands, and recover when stuck head to wind.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::is_on_collision_course;
use super::physics::optimal_sail_trim;
use super::state::{Island, Rudder, Vessel};
use super::wind::Wind;
use crate::consts::*;
use crate::{angle_difference, bearing, normalize_angle};

/// Below this speed a boat pointing into the wind is stuck
pub const IN_IRONS_SPEED: f32 = 1.0;
/// Extra clearance past the no-sail zone before leaving irons recovery
pub const IN_IRONS_EXIT_MARGIN: f32 = 10.0;
/// Heading error tolerated before the pilot puts the rudder over
pub const STEERING_DEADBAND: f32 = 5.0;
/// Worst-case trim error for a pilot with no trim skill (degrees)
pub const MAX_TRIM_ERROR: f32 = 7.5;

/// Personality of an AI skipper, fixed for the life of the boat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiTraits {
    /// 0-1: shorter avoidance and quicker tacks
    pub aggressiveness: f32,
    /// 0-1: how close to the wind the pilot dares to point
    pub tacking_skill: f32,
    /// 0-1: how accurately the sail is set
    pub sail_trim_skill: f32,
    /// Persistent steering bias (degrees)
    pub heading_error: f32,
}

impl AiTraits {
    /// Draw a random personality
    pub fn roll(rng: &mut impl Rng) -> Self {
        Self {
            aggressiveness: rng.random_range(0.0..=1.0),
            tacking_skill: rng.random_range(0.4..=1.0),
            sail_trim_skill: rng.random_range(0.4..=1.0),
            heading_error: rng.random_range(-5.0..=5.0),
        }
    }

    /// Flawless skipper, used for the player's autopilot
    pub fn neutral() -> Self {
        Self {
            aggressiveness: 0.5,
            tacking_skill: 1.0,
            sail_trim_skill: 1.0,
            heading_error: 0.0,
        }
    }

    /// Off-the-wind angle sailed when beating
    pub fn tack_angle(&self) -> f32 {
        MIN_SAILING_ANGLE + 5.0 + (1.0 - self.tacking_skill) * 15.0
    }

    /// Minimum time between tacks
    pub fn tack_cooldown(&self) -> f32 {
        4.0 + (1.0 - self.aggressiveness) * 2.0
    }

    /// How long an avoidance turn is held
    pub fn avoid_duration(&self) -> f32 {
        2.5 - self.aggressiveness
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tack {
    /// Heading = wind + tack angle
    Port,
    /// Heading = wind - tack angle
    Starboard,
}

impl Tack {
    pub fn other(self) -> Self {
        match self {
            Tack::Port => Tack::Starboard,
            Tack::Starboard => Tack::Port,
        }
    }

    pub fn heading(self, wind_direction: f32, tack_angle: f32) -> f32 {
        match self {
            Tack::Port => normalize_angle(wind_direction + tack_angle),
            Tack::Starboard => normalize_angle(wind_direction - tack_angle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiState {
    /// Heading straight for the target
    Sailing,
    /// Beating toward an upwind target
    Tacking { tack: Tack },
    /// Committed turn away from an island
    Avoiding { turn: Rudder, time_left: f32 },
    /// Stuck head to wind, bearing away
    InIrons { turn: Rudder },
}

/// Commands for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmCommand {
    pub rudder: Rudder,
    pub sail_angle: f32,
}

impl HelmCommand {
    pub fn apply(&self, vessel: &mut Vessel) {
        vessel.rudder = self.rudder;
        vessel.sail_angle = self.sail_angle.clamp(-MAX_SAIL_ANGLE_REL, MAX_SAIL_ANGLE_REL);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPilot {
    pub traits: AiTraits,
    pub state: AiState,
    /// Seconds until another tack is allowed
    pub tack_cooldown: f32,
}

impl AiPilot {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self::with_traits(AiTraits::roll(rng))
    }

    pub fn with_traits(traits: AiTraits) -> Self {
        Self {
            traits,
            state: AiState::Sailing,
            tack_cooldown: 0.0,
        }
    }

    /// Forget transient state between races
    pub fn reset(&mut self) {
        self.state = AiState::Sailing;
        self.tack_cooldown = 0.0;
    }

    /// Decide rudder and sail for this tick
    ///
    /// Returns `None` when there is nothing to sail to; the boat keeps its
    /// previous commands.
    pub fn steer(
        &mut self,
        vessel: &Vessel,
        target: Option<Vec2>,
        wind: &Wind,
        islands: &[Island],
        dt: f32,
        rng: &mut impl Rng,
    ) -> Option<HelmCommand> {
        let target = target?;
        self.tack_cooldown = (self.tack_cooldown - dt.max(0.0)).max(0.0);

        let wind_rel = angle_difference(wind.direction, vessel.heading);
        let off_wind = wind_rel.abs();

        // Irons recovery overrides everything else
        if let AiState::InIrons { turn } = self.state {
            if off_wind < MIN_SAILING_ANGLE + IN_IRONS_EXIT_MARGIN {
                return Some(HelmCommand {
                    rudder: turn,
                    sail_angle: MAX_SAIL_ANGLE_REL.copysign(-wind_rel),
                });
            }
            // Stay on the tack we fell off onto until we have way on
            let tack = if angle_difference(vessel.heading, wind.direction) > 0.0 {
                Tack::Port
            } else {
                Tack::Starboard
            };
            log::debug!("Boat {} out of irons on {:?}", vessel.id, tack);
            self.state = AiState::Tacking { tack };
            self.tack_cooldown = self.traits.tack_cooldown();
        } else if off_wind < MIN_SAILING_ANGLE && vessel.speed < IN_IRONS_SPEED {
            let turn = if wind_rel > 0.0 { Rudder::Left } else { Rudder::Right };
            log::debug!("Boat {} in irons, bearing away {:?}", vessel.id, turn);
            self.state = AiState::InIrons { turn };
            return Some(HelmCommand {
                rudder: turn,
                sail_angle: MAX_SAIL_ANGLE_REL.copysign(-wind_rel),
            });
        }

        let sail_angle = self.trim(wind_rel, rng);

        if let AiState::Avoiding { turn, time_left } = self.state {
            let time_left = time_left - dt.max(0.0);
            if time_left > 0.0 {
                self.state = AiState::Avoiding { turn, time_left };
                return Some(HelmCommand { rudder: turn, sail_angle });
            }
            self.state = AiState::Sailing;
        }

        if let Some(island) = self.threat(vessel, islands) {
            let island_rel = angle_difference(bearing(vessel.pos, island.pos), vessel.heading);
            let turn = if island_rel > 0.0 { Rudder::Left } else { Rudder::Right };
            log::debug!("Boat {} avoiding island at {:?}", vessel.id, island.pos);
            self.state = AiState::Avoiding {
                turn,
                time_left: self.traits.avoid_duration(),
            };
            return Some(HelmCommand { rudder: turn, sail_angle });
        }

        let mut desired = normalize_angle(
            self.desired_heading(vessel.pos, target, wind) + self.traits.heading_error,
        );
        // Never aim into the no-sail zone, deadband included
        let desired_off_wind = angle_difference(desired, wind.direction);
        let closest = MIN_SAILING_ANGLE + STEERING_DEADBAND;
        if desired_off_wind.abs() < closest {
            desired = normalize_angle(wind.direction + closest.copysign(desired_off_wind));
        }
        let error = angle_difference(desired, vessel.heading);
        let rudder = if error.abs() > STEERING_DEADBAND {
            if error > 0.0 { Rudder::Right } else { Rudder::Left }
        } else {
            Rudder::Center
        };

        Some(HelmCommand { rudder, sail_angle })
    }

    /// First island the boat will hit on its current course
    fn threat<'a>(&self, vessel: &Vessel, islands: &'a [Island]) -> Option<&'a Island> {
        let lookahead = 4.0 / (vessel.speed + 1.0) + 1.0;
        islands.iter().find(|island| {
            is_on_collision_course(vessel, island.pos, island.collision_radius, lookahead)
        })
    }

    /// Heading toward the target, or the current tack's heading when the
    /// target is upwind
    fn desired_heading(&mut self, pos: Vec2, target: Vec2, wind: &Wind) -> f32 {
        let to_target = bearing(pos, target);
        let target_off_wind = angle_difference(to_target, wind.direction);

        if target_off_wind.abs() >= MIN_SAILING_ANGLE {
            self.state = AiState::Sailing;
            return to_target;
        }

        let tack_angle = self.traits.tack_angle();
        let tack = match self.state {
            AiState::Tacking { tack } => {
                let crossed = match tack {
                    Tack::Port => target_off_wind < 0.0,
                    Tack::Starboard => target_off_wind > 0.0,
                };
                if crossed && self.tack_cooldown <= 0.0 {
                    self.tack_cooldown = self.traits.tack_cooldown();
                    tack.other()
                } else {
                    tack
                }
            }
            _ => {
                let off_target = |tack: Tack| {
                    angle_difference(tack.heading(wind.direction, tack_angle), to_target).abs()
                };
                let port = off_target(Tack::Port);
                let starboard = off_target(Tack::Starboard);
                if port < starboard { Tack::Port } else { Tack::Starboard }
            }
        };
        if self.state != (AiState::Tacking { tack }) {
            log::debug!("Tacking onto {:?}", tack);
        }
        self.state = AiState::Tacking { tack };
        tack.heading(wind.direction, tack_angle)
    }

    fn trim(&self, wind_rel: f32, rng: &mut impl Rng) -> f32 {
        let spread = (1.0 - self.traits.sail_trim_skill).max(0.0) * MAX_TRIM_ERROR;
        let error = if spread > 0.0 {
            rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        (optimal_sail_trim(wind_rel) + error).clamp(-MAX_SAIL_ANGLE_REL, MAX_SAIL_ANGLE_REL)
    }
}
