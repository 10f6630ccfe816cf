//! Race state and core simulation types
//!
//! Everything a renderer or HUD reads lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{AiPilot, AiTraits};
use super::course::Course;
use super::wind::Wind;
use crate::config::RaceConfig;
use crate::consts::*;

/// Rudder command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rudder {
    /// Heading decreases
    Left,
    #[default]
    Center,
    /// Heading increases
    Right,
}

impl Rudder {
    pub fn sign(self) -> f32 {
        match self {
            Rudder::Left => -1.0,
            Rudder::Center => 0.0,
            Rudder::Right => 1.0,
        }
    }

    /// Map a -1/0/1 style input (anything else is clamped by sign)
    pub fn from_sign(value: i32) -> Self {
        match value.signum() {
            -1 => Rudder::Left,
            1 => Rudder::Right,
            _ => Rudder::Center,
        }
    }
}

/// Sail trim command (player sheet control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SailTrim {
    Decrease,
    #[default]
    Hold,
    Increase,
}

impl SailTrim {
    pub fn sign(self) -> f32 {
        match self {
            SailTrim::Decrease => -1.0,
            SailTrim::Hold => 0.0,
            SailTrim::Increase => 1.0,
        }
    }

    pub fn from_sign(value: i32) -> Self {
        match value.signum() {
            -1 => SailTrim::Decrease,
            1 => SailTrim::Increase,
            _ => SailTrim::Hold,
        }
    }
}

/// A single wake particle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WakeParticle {
    pub pos: Vec2,
    /// Seconds left before it disappears
    pub life: f32,
}

impl WakeParticle {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, life: WAKE_LIFETIME }
    }

    /// Remaining life as a 0-1 fraction (for size/alpha fading)
    pub fn fade(&self) -> f32 {
        (self.life / WAKE_LIFETIME).clamp(0.0, 1.0)
    }
}

/// Per-boat race progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceProgress {
    /// 1-based lap currently being sailed
    pub current_lap: u32,
    /// Index into the course buoys of the next mark to round
    pub next_buoy: usize,
    pub is_finished: bool,
    /// Race clock value when this boat started (seconds)
    pub race_start_time: f32,
    pub lap_start_time: f32,
    /// Elapsed race time at the finish
    pub finish_time: Option<f32>,
    pub lap_times: Vec<f32>,
}

impl Default for RaceProgress {
    fn default() -> Self {
        Self {
            current_lap: 1,
            next_buoy: 0,
            is_finished: false,
            race_start_time: 0.0,
            lap_start_time: 0.0,
            finish_time: None,
            lap_times: Vec::new(),
        }
    }
}

/// A boat on the water (player or AI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    pub id: u32,
    pub name: String,
    pub pos: Vec2,
    /// Degrees, [0, 360)
    pub heading: f32,
    pub speed: f32,
    pub rudder: Rudder,
    /// Commanded sail angle relative to the centerline (degrees)
    pub sail_angle: f32,
    /// Sail angle as it actually sets against the wind
    pub visual_sail_angle: f32,
    /// Best trim for the current heading (0 when in the no-sail zone)
    pub optimal_sail_trim: f32,
    /// 0-1 drive efficiency of the current heading and trim
    pub wind_effectiveness: f32,
    /// Heel angle (degrees), visual only
    pub heel: f32,
    pub on_sandbar: bool,
    pub collision_radius: f32,
    pub wake: Vec<WakeParticle>,
    pub time_since_last_wake: f32,
    pub progress: RaceProgress,
}

impl Vessel {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pos: Vec2::ZERO,
            heading: 90.0,
            speed: 0.0,
            rudder: Rudder::Center,
            sail_angle: 0.0,
            visual_sail_angle: 0.0,
            optimal_sail_trim: 0.0,
            wind_effectiveness: 0.0,
            heel: 0.0,
            on_sandbar: false,
            collision_radius: BOAT_COLLISION_RADIUS,
            wake: Vec::with_capacity(MAX_WAKE_PARTICLES),
            time_since_last_wake: 0.0,
            progress: RaceProgress::default(),
        }
    }

    /// Place the boat at a start slot, clearing motion and race progress
    pub fn reset(&mut self, start: Vec2, heading: f32) {
        self.pos = start;
        self.heading = crate::normalize_angle(heading);
        self.speed = 0.0;
        self.rudder = Rudder::Center;
        self.sail_angle = 0.0;
        self.visual_sail_angle = 0.0;
        self.optimal_sail_trim = 0.0;
        self.wind_effectiveness = 0.0;
        self.heel = 0.0;
        self.on_sandbar = false;
        self.wake.clear();
        self.time_since_last_wake = 0.0;
        self.progress = RaceProgress::default();
    }

    /// Velocity in world units per second
    pub fn velocity(&self) -> Vec2 {
        crate::heading_vector(self.heading) * self.speed * DISTANCE_SCALE
    }
}

/// A course mark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buoy {
    pub pos: Vec2,
    /// Course order
    pub index: usize,
    /// Reserved for start/finish line marks drawn by the HUD; course
    /// generation only lays out rounding marks
    pub is_gate: bool,
    /// Already rounded by the player this lap (HUD coloring)
    pub is_passed: bool,
}

impl Buoy {
    pub fn new(pos: Vec2, index: usize) -> Self {
        Self {
            pos,
            index,
            is_gate: false,
            is_passed: false,
        }
    }
}

/// Solid obstacle: boats bounce off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Island {
    pub pos: Vec2,
    pub size: f32,
    pub collision_radius: f32,
}

impl Island {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            collision_radius: size / 2.0,
        }
    }
}

/// Shallow patch: boats slow down while over it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sandbar {
    pub pos: Vec2,
    pub size: f32,
    pub collision_radius: f32,
}

impl Sandbar {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            collision_radius: size / 2.0,
        }
    }
}

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Boats on the start line, waiting for the start signal
    PreRace,
    /// Start sequence running
    Countdown { remaining: f32 },
    Racing,
    Finished,
}

/// Things that happened during a tick (for HUD and audio)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    RaceStarted,
    BuoyRounded { vessel: u32, buoy: usize },
    LapCompleted { vessel: u32, lap: u32, lap_time: f32 },
    Finished { vessel: u32, time: f32 },
    BoatCollision { a: u32, b: u32 },
    RaceOver,
}

/// A boat plus, for AI entrants, the skipper steering it
#[derive(Debug, Clone, Serialize)]
pub struct Competitor {
    pub vessel: Vessel,
    pub pilot: Option<AiPilot>,
}

/// Index of the player's boat in `RaceWorld::competitors`
pub const PLAYER_INDEX: usize = 0;

/// Complete race state, owned by the caller and threaded through every tick
#[derive(Debug, Clone, Serialize)]
pub struct RaceWorld {
    pub seed: u64,
    pub config: RaceConfig,
    pub phase: RacePhase,
    /// Seconds since the start gun
    pub race_time: f32,
    pub wind: Wind,
    pub course: Course,
    /// Player first, then AI boats
    pub competitors: Vec<Competitor>,
    /// Events since the caller last drained them
    pub events: Vec<RaceEvent>,
    /// Races sailed on this world (0 for the first)
    pub race_number: u32,
    /// Steers the player's boat when autopilot is engaged
    pub autopilot: AiPilot,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl RaceWorld {
    /// Generate a course and fleet for the given seed
    pub fn new(config: RaceConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let course = Course::generate(&config, &mut rng);
        let wind = Wind::from_config(&config, &mut rng);

        let mut competitors = Vec::with_capacity(config.fleet_size());
        competitors.push(Competitor {
            vessel: Vessel::new(0, "Player"),
            pilot: None,
        });
        for i in 0..config.num_opponents {
            let id = i as u32 + 1;
            competitors.push(Competitor {
                vessel: Vessel::new(id, format!("AI {}", id)),
                pilot: Some(AiPilot::new(&mut rng)),
            });
        }

        let mut world = Self {
            seed,
            config,
            phase: RacePhase::PreRace,
            race_time: 0.0,
            wind,
            course,
            competitors,
            events: Vec::new(),
            race_number: 0,
            autopilot: AiPilot::with_traits(AiTraits::neutral()),
            rng,
        };
        world.place_on_start_line();
        log::info!(
            "Race world ready: seed={}, {} boats, {} buoys, {} islands",
            seed,
            world.competitors.len(),
            world.course.buoys.len(),
            world.course.islands.len()
        );
        world
    }

    /// Put every boat back on its start slot and clear progress
    fn place_on_start_line(&mut self) {
        for (i, competitor) in self.competitors.iter_mut().enumerate() {
            let slot = self.course.start_slots.get(i).copied().unwrap_or(Vec2::ZERO);
            competitor.vessel.reset(slot, 90.0);
            if let Some(pilot) = competitor.pilot.as_mut() {
                pilot.reset();
            }
        }
        for buoy in &mut self.course.buoys {
            buoy.is_passed = false;
        }
        self.autopilot.reset();
    }

    /// Set up another race with the same fleet. AI skippers keep their traits.
    pub fn reset_for_next_race(&mut self, regenerate_course: bool) {
        if regenerate_course {
            self.course = Course::generate(&self.config, &mut self.rng);
        }
        self.wind = Wind::from_config(&self.config, &mut self.rng);
        self.phase = RacePhase::PreRace;
        self.race_time = 0.0;
        self.events.clear();
        self.race_number += 1;
        self.place_on_start_line();
    }

    pub fn player(&self) -> &Vessel {
        &self.competitors[PLAYER_INDEX].vessel
    }

    pub fn vessels(&self) -> impl Iterator<Item = &Vessel> {
        self.competitors.iter().map(|c| &c.vessel)
    }

    /// Hand accumulated events to the caller
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.phase == RacePhase::Finished
    }
}
