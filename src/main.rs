//! Dinghy Race entry point
//!
//! Native: runs a headless series with every boat on autopilot and prints
//! the results. Usage: `dinghy-race [seed] [races] [config.json]`
//! (set `RUST_LOG=info` to follow the races).
//! On wasm32 the library's `WasmRace` binding is the entry point.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use dinghy_race::consts::MAX_DT;
    use dinghy_race::sim::{RaceWorld, TickInput, tick};
    use dinghy_race::{RaceConfig, SeriesStandings};

    const DEFAULT_SEED: u64 = 2024;
    const DEFAULT_RACES: u32 = 3;

    struct Args {
        seed: u64,
        races: u32,
        config: RaceConfig,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse().map_err(|_| format!("invalid seed: {}", s))?,
            None => DEFAULT_SEED,
        };
        let races = match args.next() {
            Some(s) => s.parse().map_err(|_| format!("invalid race count: {}", s))?,
            None => DEFAULT_RACES,
        };
        let config = match args.next() {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {}: {}", path, e))?;
                RaceConfig::from_json(&json).map_err(|e| e.to_string())?
            }
            None => RaceConfig::default(),
        };
        Ok(Args {
            seed,
            races,
            config,
        })
    }

    pub fn run() -> i32 {
        env_logger::init();
        log::info!("Dinghy Race (native) starting...");

        let args = match parse_args() {
            Ok(args) => args,
            Err(e) => {
                log::error!("{}", e);
                eprintln!("usage: dinghy-race [seed] [races] [config.json]");
                return 2;
            }
        };

        let mut world = RaceWorld::new(args.config, args.seed);
        let mut series = SeriesStandings::new();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let start = TickInput {
            start: true,
            ..input.clone()
        };

        for race in 0..args.races {
            if race > 0 {
                world.reset_for_next_race(true);
            }
            tick(&mut world, &start, MAX_DT);
            while !world.is_over() {
                tick(&mut world, &input, MAX_DT);
                world.events.clear();
            }

            let results = world.standings();
            println!(
                "\nRace {} (wind {:.0}° at {:.1})",
                race + 1,
                world.wind.direction,
                world.wind.speed
            );
            for r in &results {
                match r.finish_time {
                    Some(t) => println!("  {:>2}. {:<10} {:>8.2}s", r.place, r.name, t),
                    None => println!("  {:>2}. {:<10}      DNF", r.place, r.name),
                }
            }
            series.record_race(&results);
        }

        println!("\nSeries after {} races", series.races);
        for (i, entry) in series.leaderboard().iter().enumerate() {
            println!(
                "  {:>2}. {:<10} {:>3} pts  ({} wins)",
                i + 1,
                entry.name,
                entry.points,
                entry.wins
            );
        }
        0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    std::process::exit(native::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start function
}
