//! Race series scoring
//!
//! Low-point system: a boat scores its finishing place in every race, DNF
//! scores one more than the number of entrants. Lowest total leads.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sim::RaceResult;

/// One boat's series record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub vessel_id: u32,
    pub name: String,
    /// Total points (lower is better)
    pub points: u32,
    /// Points scored in each race, oldest first
    pub race_points: Vec<u32>,
    pub wins: u32,
}

impl SeriesEntry {
    fn new(vessel_id: u32, name: &str) -> Self {
        Self {
            vessel_id,
            name: name.to_string(),
            points: 0,
            race_points: Vec::new(),
            wins: 0,
        }
    }
}

/// Points for a single race result
pub fn points_for(result: &RaceResult, entrants: usize) -> u32 {
    if result.is_dnf() {
        entrants as u32 + 1
    } else {
        result.place as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeriesStandings {
    pub entries: Vec<SeriesEntry>,
    pub races: u32,
}

impl SeriesStandings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one race. Boats seen for the first time join the series.
    pub fn record_race(&mut self, results: &[RaceResult]) {
        let entrants = results.len();
        for result in results {
            let points = points_for(result, entrants);
            let index = match self
                .entries
                .iter()
                .position(|e| e.vessel_id == result.vessel_id)
            {
                Some(i) => i,
                None => {
                    let mut entry = SeriesEntry::new(result.vessel_id, &result.name);
                    // Late joiners are scored DNF for the races they missed
                    for _ in 0..self.races {
                        entry.race_points.push(entrants as u32 + 1);
                        entry.points += entrants as u32 + 1;
                    }
                    self.entries.push(entry);
                    self.entries.len() - 1
                }
            };
            let entry = &mut self.entries[index];
            entry.points += points;
            entry.race_points.push(points);
            if result.place == 1 && !result.is_dnf() {
                entry.wins += 1;
            }
        }
        // Boats that sat this race out score DNF so every entry has one
        // score per race
        let missed = entrants as u32 + 1;
        let races = self.races as usize + 1;
        for entry in &mut self.entries {
            if entry.race_points.len() < races {
                entry.race_points.push(missed);
                entry.points += missed;
            }
        }
        self.races += 1;
        if let Some(leader) = self.leader() {
            log::info!(
                "Series after race {}: {} leads on {} pts",
                self.races,
                leader.name,
                leader.points
            );
        }
    }

    /// Entries ordered best first
    pub fn leaderboard(&self) -> Vec<&SeriesEntry> {
        let mut board: Vec<&SeriesEntry> = self.entries.iter().collect();
        board.sort_by(|a, b| compare_entries(a, b));
        board
    }

    pub fn leader(&self) -> Option<&SeriesEntry> {
        self.leaderboard().into_iter().next()
    }

    /// 1-indexed series position of a boat
    pub fn rank_of(&self, vessel_id: u32) -> Option<usize> {
        self.leaderboard()
            .iter()
            .position(|e| e.vessel_id == vessel_id)
            .map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fewer points first; ties go to the better result in the latest race,
/// then the one before, and so on
fn compare_entries(a: &SeriesEntry, b: &SeriesEntry) -> Ordering {
    a.points.cmp(&b.points).then_with(|| {
        a.race_points
            .iter()
            .rev()
            .zip(b.race_points.iter().rev())
            .map(|(pa, pb)| pa.cmp(pb))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
    .then(a.vessel_id.cmp(&b.vessel_id))
}
