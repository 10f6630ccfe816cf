//! Race progress: buoy rounding, laps, finishing and standings

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::state::{Buoy, Competitor, RaceEvent, RaceWorld, Vessel};
use crate::config::FinishPolicy;
use crate::consts::BUOY_ROUNDING_RADIUS;
use crate::distance_squared;

/// Final (or current) placing of one boat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub vessel_id: u32,
    pub name: String,
    /// 1-based
    pub place: usize,
    /// None = did not finish
    pub finish_time: Option<f32>,
    pub laps_completed: u32,
    pub next_buoy: usize,
    pub best_lap: Option<f32>,
}

impl RaceResult {
    pub fn is_dnf(&self) -> bool {
        self.finish_time.is_none()
    }
}

/// Check whether the boat has rounded its next buoy and advance its progress
///
/// `is_player` controls whether buoys get marked as passed for the HUD.
pub fn update_progress(
    vessel: &mut Vessel,
    is_player: bool,
    buoys: &mut [Buoy],
    laps: u32,
    race_time: f32,
    events: &mut Vec<RaceEvent>,
) {
    let progress = &mut vessel.progress;
    if progress.is_finished || buoys.is_empty() {
        return;
    }
    let Some(buoy) = buoys.get_mut(progress.next_buoy) else {
        progress.next_buoy = 0;
        return;
    };
    if distance_squared(vessel.pos, buoy.pos) >= BUOY_ROUNDING_RADIUS * BUOY_ROUNDING_RADIUS {
        return;
    }

    if is_player {
        buoy.is_passed = true;
    }
    let rounded = progress.next_buoy;
    events.push(RaceEvent::BuoyRounded {
        vessel: vessel.id,
        buoy: rounded,
    });
    log::debug!("Boat {} rounded buoy {}", vessel.id, rounded);

    progress.next_buoy += 1;
    if progress.next_buoy < buoys.len() {
        return;
    }

    let lap_time = race_time - progress.lap_start_time;
    progress.lap_times.push(lap_time);
    events.push(RaceEvent::LapCompleted {
        vessel: vessel.id,
        lap: progress.current_lap,
        lap_time,
    });
    progress.current_lap += 1;

    if progress.current_lap > laps {
        progress.is_finished = true;
        let time = race_time - progress.race_start_time;
        progress.finish_time = Some(time);
        progress.next_buoy = buoys.len();
        events.push(RaceEvent::Finished {
            vessel: vessel.id,
            time,
        });
        log::info!("{} finished in {:.2}s", vessel.name, time);
    } else {
        progress.next_buoy = 0;
        progress.lap_start_time = race_time;
        if is_player {
            for buoy in buoys.iter_mut() {
                buoy.is_passed = false;
            }
        }
        log::debug!("{} starting lap {}", vessel.name, progress.current_lap);
    }
}

/// Whether the race as a whole is done under the given policy
pub fn race_complete(competitors: &[Competitor], policy: FinishPolicy) -> bool {
    match policy {
        FinishPolicy::PlayerFinishes => competitors
            .first()
            .is_some_and(|c| c.vessel.progress.is_finished),
        FinishPolicy::AllFinish => competitors.iter().all(|c| c.vessel.progress.is_finished),
    }
}

/// Order the fleet: finishers by time, then the rest by how far round the
/// course they are
pub fn standings(competitors: &[Competitor], buoys: &[Buoy]) -> Vec<RaceResult> {
    let mut order: Vec<&Vessel> = competitors.iter().map(|c| &c.vessel).collect();
    order.sort_by(|a, b| compare_progress(a, b, buoys));

    order
        .into_iter()
        .enumerate()
        .map(|(i, v)| RaceResult {
            vessel_id: v.id,
            name: v.name.clone(),
            place: i + 1,
            finish_time: v.progress.finish_time,
            laps_completed: v.progress.lap_times.len() as u32,
            next_buoy: v.progress.next_buoy,
            best_lap: v
                .progress
                .lap_times
                .iter()
                .copied()
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal)),
        })
        .collect()
}

impl RaceWorld {
    /// Current order of the fleet
    pub fn standings(&self) -> Vec<RaceResult> {
        standings(&self.competitors, &self.course.buoys)
    }
}

fn compare_progress(a: &Vessel, b: &Vessel, buoys: &[Buoy]) -> Ordering {
    match (a.progress.finish_time, b.progress.finish_time) {
        (Some(ta), Some(tb)) => ta.partial_cmp(&tb).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b
            .progress
            .current_lap
            .cmp(&a.progress.current_lap)
            .then(b.progress.next_buoy.cmp(&a.progress.next_buoy))
            .then_with(|| {
                // Same leg: closer to the mark is ahead
                let da = distance_to_next(a, buoys);
                let db = distance_to_next(b, buoys);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            }),
    }
}

fn distance_to_next(vessel: &Vessel, buoys: &[Buoy]) -> f32 {
    buoys
        .get(vessel.progress.next_buoy)
        .map(|b| distance_squared(vessel.pos, b.pos))
        .unwrap_or(0.0)
}
