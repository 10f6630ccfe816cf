//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta, clamped per tick
//! - Seeded RNG only (owned by the world)
//! - Stable iteration order (player first, then AI by id)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod course;
pub mod physics;
pub mod race;
pub mod state;
pub mod tick;
pub mod wind;

pub use ai::{AiPilot, AiState, AiTraits, HelmCommand, Tack};
pub use collision::{is_on_collision_course, resolve_boat_pair, resolve_island};
pub use course::Course;
pub use race::{RaceResult, race_complete, standings};
pub use state::{
    Buoy, Competitor, Island, PLAYER_INDEX, RaceEvent, RacePhase, RaceProgress, RaceWorld, Rudder,
    SailTrim, Sandbar, Vessel, WakeParticle,
};
pub use tick::{TickInput, tick};
pub use wind::Wind;
