//! Collision detection and response
//!
//! Boats, islands and sandbars are all circles. Boat-boat contacts exchange
//! an equal-mass impulse that never adds energy; islands are solid walls;
//! sandbars only flag the boat so the physics step can add drag.

use glam::Vec2;

use super::state::{Competitor, Island, Sandbar, Vessel};
use crate::consts::*;
use crate::heading_vector;

/// Separate two overlapping boats and exchange momentum
///
/// Returns true when the boats were touching.
pub fn resolve_boat_pair(a: &mut Vessel, b: &mut Vessel) -> bool {
    let delta = b.pos - a.pos;
    let dist_sq = delta.length_squared();
    let min_dist = a.collision_radius + b.collision_radius;
    if dist_sq >= min_dist * min_dist {
        return false;
    }

    // Stacked boats have no direction between them; pick +X
    let (normal, overlap) = if dist_sq <= f32::EPSILON {
        (Vec2::X, min_dist)
    } else {
        let dist = dist_sq.sqrt();
        (delta / dist, min_dist - dist)
    };

    a.pos -= normal * (overlap * 0.5);
    b.pos += normal * (overlap * 0.5);

    let va = a.velocity();
    let vb = b.velocity();
    let closing = (vb - va).dot(normal);
    if closing < 0.0 {
        let impulse = -(1.0 + BOAT_RESTITUTION) * closing / 2.0;
        a.speed = speed_along_heading(a.heading, va - normal * impulse);
        b.speed = speed_along_heading(b.heading, vb + normal * impulse);
    }
    true
}

/// Boats can't slide sideways: keep only the component along the bow
fn speed_along_heading(heading: f32, velocity: Vec2) -> f32 {
    let forward = velocity.dot(heading_vector(heading)) / DISTANCE_SCALE;
    (forward.max(0.0) * COLLISION_ENERGY_RETAIN).min(MAX_BOAT_SPEED)
}

/// Push a boat out of an island. Returns true on contact.
pub fn resolve_island(vessel: &mut Vessel, island: &Island) -> bool {
    let delta = vessel.pos - island.pos;
    let dist_sq = delta.length_squared();
    let min_dist = vessel.collision_radius + island.collision_radius;
    if dist_sq >= min_dist * min_dist {
        return false;
    }

    let normal = if dist_sq <= f32::EPSILON {
        Vec2::X
    } else {
        delta / dist_sq.sqrt()
    };
    vessel.pos = island.pos + normal * min_dist;
    vessel.speed *= ISLAND_SPEED_RETAIN;
    true
}

/// Flag whether the boat is currently over any sandbar
pub fn update_sandbar_contact(vessel: &mut Vessel, sandbars: &[Sandbar]) {
    vessel.on_sandbar = sandbars.iter().any(|bar| {
        let reach = vessel.collision_radius + bar.collision_radius;
        crate::distance_squared(vessel.pos, bar.pos) < reach * reach
    });
}

/// Will the boat pass within reach of an obstacle in the next `lookahead` seconds?
///
/// Checks the whole swept path, not just its end point.
pub fn is_on_collision_course(
    vessel: &Vessel,
    obstacle_pos: Vec2,
    obstacle_radius: f32,
    lookahead: f32,
) -> bool {
    let start = vessel.pos;
    let end = start + vessel.velocity() * lookahead;
    let path = end - start;
    let len_sq = path.length_squared();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((obstacle_pos - start).dot(path) / len_sq).clamp(0.0, 1.0)
    };
    let closest = start + path * t;
    let reach = obstacle_radius + vessel.collision_radius;
    crate::distance_squared(closest, obstacle_pos) < reach * reach
}

/// Run every collision check for one tick
///
/// Returns the ids of boat pairs that touched.
pub fn resolve_all(
    competitors: &mut [Competitor],
    islands: &[Island],
    sandbars: &[Sandbar],
) -> Vec<(u32, u32)> {
    let mut contacts = Vec::new();

    for i in 0..competitors.len() {
        let (head, tail) = competitors.split_at_mut(i + 1);
        let a = &mut head[i].vessel;
        for other in tail.iter_mut() {
            if resolve_boat_pair(a, &mut other.vessel) {
                contacts.push((a.id, other.vessel.id));
            }
        }
    }

    for competitor in competitors.iter_mut() {
        let vessel = &mut competitor.vessel;
        for island in islands {
            if resolve_island(vessel, island) {
                log::trace!("Boat {} hit island at {:?}", vessel.id, island.pos);
            }
        }
        update_sandbar_contact(vessel, sandbars);
    }

    contacts
}
