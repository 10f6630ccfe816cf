//! Platform abstraction layer
//!
//! `RaceSession` turns frame-level host input (plain integers and flags) into
//! tick inputs and serializes race state for a front end. On wasm32 it is
//! exported to JavaScript as `WasmRace`.

use crate::config::{ConfigError, RaceConfig};
use crate::sim::{RaceEvent, RaceWorld, Rudder, SailTrim, TickInput, tick};

/// One race world plus the one-shot commands queued for its next tick
#[derive(Debug, Clone)]
pub struct RaceSession {
    world: RaceWorld,
    autopilot: bool,
    start_requested: bool,
    wind_shift_requested: bool,
}

impl RaceSession {
    /// Build a session from a JSON config; an empty string means defaults
    pub fn new(seed: u64, config_json: &str) -> Result<Self, ConfigError> {
        let config = if config_json.trim().is_empty() {
            RaceConfig::default()
        } else {
            RaceConfig::from_json(config_json)?
        };
        Ok(Self {
            world: RaceWorld::new(config, seed),
            autopilot: false,
            start_requested: false,
            wind_shift_requested: false,
        })
    }

    pub fn world(&self) -> &RaceWorld {
        &self.world
    }

    pub fn start(&mut self) {
        self.start_requested = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot: {}", enabled);
        }
        self.autopilot = enabled;
    }

    pub fn randomize_wind(&mut self) {
        self.wind_shift_requested = true;
    }

    /// Advance one frame. `rudder` and `trim` are -1/0/1.
    pub fn tick(&mut self, dt: f32, rudder: i32, trim: i32) {
        let input = TickInput {
            rudder: Rudder::from_sign(rudder),
            trim: SailTrim::from_sign(trim),
            start: std::mem::take(&mut self.start_requested),
            autopilot: self.autopilot,
            randomize_wind: std::mem::take(&mut self.wind_shift_requested),
            wind: None,
        };
        tick(&mut self.world, &input, dt);
    }

    /// Reset for another race on the same fleet
    pub fn next_race(&mut self, new_course: bool) {
        self.world.reset_for_next_race(new_course);
    }

    /// Full race state as JSON
    pub fn snapshot_json(&self) -> String {
        match serde_json::to_string(&self.world) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                String::from("{}")
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        self.world.drain_events()
    }

    pub fn drain_events_json(&mut self) -> String {
        let events = self.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| String::from("[]"))
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use super::RaceSession;

    /// Install panic hook and console logger
    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
        // Fails only if the host page already installed a logger
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Dinghy Race core loaded");
    }

    #[wasm_bindgen]
    pub struct WasmRace {
        session: RaceSession,
    }

    #[wasm_bindgen]
    impl WasmRace {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u64, config_json: &str) -> Result<WasmRace, JsError> {
            let session = RaceSession::new(seed, config_json)?;
            Ok(WasmRace { session })
        }

        pub fn start(&mut self) {
            self.session.start();
        }

        pub fn tick(&mut self, dt: f32, rudder: i32, trim: i32) {
            self.session.tick(dt, rudder, trim);
        }

        pub fn set_autopilot(&mut self, enabled: bool) {
            self.session.set_autopilot(enabled);
        }

        pub fn randomize_wind(&mut self) {
            self.session.randomize_wind();
        }

        pub fn next_race(&mut self, new_course: bool) {
            self.session.next_race(new_course);
        }

        pub fn snapshot(&self) -> String {
            self.session.snapshot_json()
        }

        pub fn drain_events(&mut self) -> String {
            self.session.drain_events_json()
        }
    }
}
