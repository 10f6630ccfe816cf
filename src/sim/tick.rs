//! Race tick
//!
//! Advances the whole race by one frame: start sequence, AI helms,
//! boat physics, collisions, then race progress.

use super::collision::resolve_all;
use super::race::{race_complete, update_progress};
use super::state::{PLAYER_INDEX, RaceEvent, RacePhase, RaceWorld, Rudder, SailTrim};
use super::wind::Wind;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub rudder: Rudder,
    pub trim: SailTrim,
    /// Start the countdown (start button / space)
    pub start: bool,
    /// Idle/demo mode - AI sails the player's boat
    pub autopilot: bool,
    /// Swing the wind to a random direction
    pub randomize_wind: bool,
    /// Replace the wind outright
    pub wind: Option<Wind>,
}

/// Advance the race by `dt` seconds
///
/// Frames longer than `MAX_DT` are clamped; non-finite or non-positive
/// deltas are ignored.
pub fn tick(world: &mut RaceWorld, input: &TickInput, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let dt = dt.min(MAX_DT);

    if let Some(wind) = input.wind {
        world.wind = Wind::new(wind.direction, wind.speed);
    }
    if input.randomize_wind {
        world.wind.randomize_direction(&mut world.rng);
    }

    match world.phase {
        RacePhase::PreRace => {
            if input.start {
                if world.config.countdown_secs > 0.0 {
                    log::info!("Countdown started");
                    world.phase = RacePhase::Countdown {
                        remaining: world.config.countdown_secs,
                    };
                } else {
                    start_race(world);
                }
            }
            return;
        }
        RacePhase::Countdown { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                start_race(world);
            } else {
                world.phase = RacePhase::Countdown { remaining };
            }
            return;
        }
        RacePhase::Finished => return,
        RacePhase::Racing => {}
    }

    world.race_time += dt;

    let RaceWorld {
        config,
        wind,
        course,
        competitors,
        events,
        autopilot,
        rng,
        race_time,
        ..
    } = world;

    if config.wind_drift {
        wind.drift(dt, rng);
    }

    // Helm: player input (or autopilot), then AI skippers
    for (i, competitor) in competitors.iter_mut().enumerate() {
        let vessel = &mut competitor.vessel;
        let target = if vessel.progress.is_finished {
            None
        } else {
            course.target(vessel.progress.next_buoy)
        };

        let command = match competitor.pilot.as_mut() {
            Some(pilot) => pilot.steer(vessel, target, wind, &course.islands, dt, rng),
            None if i == PLAYER_INDEX && input.autopilot => {
                autopilot.steer(vessel, target, wind, &course.islands, dt, rng)
            }
            None => {
                vessel.rudder = input.rudder;
                vessel.trim_sail(input.trim, dt);
                None
            }
        };
        if let Some(command) = command {
            command.apply(vessel);
        }
    }

    for competitor in competitors.iter_mut() {
        competitor.vessel.step(wind, dt, rng);
    }

    for (a, b) in resolve_all(competitors, &course.islands, &course.sandbars) {
        events.push(RaceEvent::BoatCollision { a, b });
    }

    for (i, competitor) in competitors.iter_mut().enumerate() {
        update_progress(
            &mut competitor.vessel,
            i == PLAYER_INDEX,
            &mut course.buoys,
            config.laps,
            *race_time,
            events,
        );
    }

    if race_complete(competitors, config.finish_policy) {
        finish_race(world);
    } else if world.race_time >= world.config.time_limit_secs {
        log::info!("Time limit reached at {:.1}s", world.race_time);
        finish_race(world);
    }
}

fn start_race(world: &mut RaceWorld) {
    world.phase = RacePhase::Racing;
    world.race_time = 0.0;
    for competitor in &mut world.competitors {
        competitor.vessel.progress.race_start_time = 0.0;
        competitor.vessel.progress.lap_start_time = 0.0;
    }
    world.events.push(RaceEvent::RaceStarted);
    log::info!("Race {} started", world.race_number + 1);
}

fn finish_race(world: &mut RaceWorld) {
    world.phase = RacePhase::Finished;
    world.events.push(RaceEvent::RaceOver);
    if let Some(winner) = world.standings().first() {
        match winner.finish_time {
            Some(time) => log::info!("Race over: {} wins in {:.2}s", winner.name, time),
            None => log::info!("Race over: no finishers"),
        }
    }
}
