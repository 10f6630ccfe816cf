//! Seeded course layout
//!
//! Islands are scattered over the race area with sandbars around them,
//! buoys ring the start at varying range and are sorted by angle so the
//! course circles the start line.

use std::cmp::Ordering;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Buoy, Island, Sandbar};
use crate::config::RaceConfig;
use crate::consts::*;
use crate::distance_squared;

/// Islands are placed within +/- this many units of the origin on each axis
pub const ISLAND_SPREAD: f32 = 1000.0;
pub const MIN_ISLAND_SIZE: f32 = 150.0;
pub const MAX_ISLAND_SIZE: f32 = 250.0;
/// Open water kept around the start line
pub const START_CLEARANCE: f32 = 120.0;
pub const MIN_SANDBAR_SIZE: f32 = 50.0;
pub const MAX_SANDBAR_SIZE: f32 = 100.0;
pub const MIN_BUOY_RANGE: f32 = 600.0;
pub const MAX_BUOY_RANGE: f32 = 1400.0;
/// Spacing between AI start slots along -X
pub const START_SLOT_SPACING: f32 = 80.0;
/// Placement attempts allowed per requested object
const ATTEMPTS_PER_OBJECT: usize = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    /// In rounding order
    pub buoys: Vec<Buoy>,
    pub islands: Vec<Island>,
    pub sandbars: Vec<Sandbar>,
    /// One per boat, player first
    pub start_slots: Vec<Vec2>,
}

impl Course {
    pub fn generate(config: &RaceConfig, rng: &mut impl Rng) -> Self {
        let start_slots = start_slots(config.num_opponents, rng);
        let islands = place_islands(config.num_islands, &start_slots, rng);
        let sandbars = place_sandbars(&islands, rng);
        let buoys = place_buoys(config.num_buoys, &islands, rng);

        log::debug!(
            "Course: {} buoys, {} islands, {} sandbars",
            buoys.len(),
            islands.len(),
            sandbars.len()
        );
        Self {
            buoys,
            islands,
            sandbars,
            start_slots,
        }
    }

    /// Next mark for a boat, if any
    pub fn target(&self, next_buoy: usize) -> Option<Vec2> {
        self.buoys.get(next_buoy).map(|b| b.pos)
    }
}

/// Player at the origin, AI boats staggered behind it on alternating sides
fn start_slots(num_opponents: usize, rng: &mut impl Rng) -> Vec<Vec2> {
    let mut slots = Vec::with_capacity(num_opponents + 1);
    slots.push(Vec2::ZERO);
    for i in 0..num_opponents {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let x = -START_SLOT_SPACING * (i + 1) as f32;
        let y = START_SLOT_SPACING * side * rng.random_range(0.5..=1.0);
        slots.push(Vec2::new(x, y));
    }
    slots
}

fn place_islands(count: usize, start_slots: &[Vec2], rng: &mut impl Rng) -> Vec<Island> {
    let mut islands: Vec<Island> = Vec::with_capacity(count);
    let max_attempts = count * ATTEMPTS_PER_OBJECT;
    let mut attempts = 0;

    while islands.len() < count && attempts < max_attempts {
        attempts += 1;
        let pos = Vec2::new(
            rng.random_range(-ISLAND_SPREAD..=ISLAND_SPREAD),
            rng.random_range(-ISLAND_SPREAD..=ISLAND_SPREAD),
        );
        let island = Island::new(pos, rng.random_range(MIN_ISLAND_SIZE..=MAX_ISLAND_SIZE));

        let blocks_start = start_slots.iter().any(|slot| {
            let reach = island.collision_radius + BOAT_COLLISION_RADIUS + START_CLEARANCE;
            distance_squared(*slot, pos) < reach * reach
        });
        if blocks_start {
            continue;
        }
        let overlaps = islands.iter().any(|other| {
            let reach = island.collision_radius + other.collision_radius;
            distance_squared(other.pos, pos) < reach * reach
        });
        if overlaps {
            continue;
        }
        islands.push(island);
    }

    if islands.len() < count {
        log::warn!("Could only place {}/{} islands", islands.len(), count);
    }
    islands
}

/// 2-4 sandbars ringing each island
fn place_sandbars(islands: &[Island], rng: &mut impl Rng) -> Vec<Sandbar> {
    let mut sandbars = Vec::new();
    for island in islands {
        let count = rng.random_range(2..=4);
        for _ in 0..count {
            let angle = rng.random_range(0.0..TAU);
            let distance = island.size / 2.0 + rng.random_range(50.0..=150.0);
            let pos = island.pos + Vec2::new(angle.cos(), angle.sin()) * distance;
            sandbars.push(Sandbar::new(
                pos,
                rng.random_range(MIN_SANDBAR_SIZE..=MAX_SANDBAR_SIZE),
            ));
        }
    }
    sandbars
}

fn place_buoys(count: usize, islands: &[Island], rng: &mut impl Rng) -> Vec<Buoy> {
    let mut placed: Vec<(f32, Vec2)> = Vec::with_capacity(count);
    let max_attempts = count * ATTEMPTS_PER_OBJECT;
    let mut attempts = 0;

    while placed.len() < count && attempts < max_attempts {
        attempts += 1;
        let angle = rng.random_range(0.0..TAU);
        let distance = rng.random_range(MIN_BUOY_RANGE..=MAX_BUOY_RANGE);
        let pos = Vec2::new(angle.cos(), angle.sin()) * distance;

        let near_island = islands.iter().any(|island| {
            let reach = island.collision_radius + BUOY_RADIUS + MIN_OBJ_SEPARATION;
            distance_squared(island.pos, pos) < reach * reach
        });
        if near_island {
            continue;
        }
        let min_sq = MIN_OBJ_SEPARATION * MIN_OBJ_SEPARATION;
        let near_buoy = placed
            .iter()
            .any(|(_, other)| distance_squared(*other, pos) < min_sq);
        if near_buoy {
            continue;
        }
        placed.push((angle, pos));
    }

    if placed.len() < count {
        log::warn!("Could only place {}/{} buoys", placed.len(), count);
    }
    if placed.is_empty() && count > 0 {
        log::warn!("Adding fallback buoy");
        let angle = rng.random_range(0.0..TAU);
        placed.push((angle, Vec2::new(angle.cos(), angle.sin()) * MIN_BUOY_RANGE));
    }

    placed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    placed
        .into_iter()
        .enumerate()
        .map(|(i, (_, pos))| Buoy::new(pos, i))
        .collect()
}
