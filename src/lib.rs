mod accounts;
mod console;
pub mod error;
pub mod league;
pub mod matchday;
pub mod persistence;
pub mod progression;
pub mod simulation;
pub mod squad;
pub mod types;

use error::GameError;
use simulation::{RosterKind, Simulation};
use types::*;
use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}

fn js_error(err: GameError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn parse_config(config_json: &str) -> Result<GameConfig, JsValue> {
    serde_json::from_str(config_json)
        .map_err(|e| js_sys::Error::new(&format!("Config parse error: {}", e)).into())
}

fn roster_kind(kind: &str) -> Result<RosterKind, JsValue> {
    kind.parse().map_err(js_error)
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct GameEngine {
    sim: Simulation,
}

#[wasm_bindgen]
impl GameEngine {
    /// Create a new game with the default league
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> GameEngine {
        let mut sim = Simulation::new(GameConfig::default(), seed);
        sim.init_default_clubs();
        GameEngine { sim }
    }

    /// Create with custom config
    pub fn new_with_config(seed: u64, config_json: &str) -> Result<GameEngine, JsValue> {
        let mut sim = Simulation::new(parse_config(config_json)?, seed);
        sim.init_default_clubs();
        Ok(GameEngine { sim })
    }

    /// Register a manager; returns the assigned club name
    pub fn register(&mut self, email: &str, password: &str) -> Result<String, JsValue> {
        self.sim.register(email, password).map_err(js_error)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<(), JsValue> {
        self.sim.authenticate(email, password).map_err(js_error)
    }

    /// Managed club with its squad
    pub fn get_club(&self, user: &str) -> Result<String, JsValue> {
        let club = self.sim.club_of(user).map_err(js_error)?;
        Ok(club.to_dict().to_string())
    }

    /// `kind` is "squad" or "academy"
    pub fn get_roster(&self, user: &str, kind: &str) -> Result<String, JsValue> {
        let roster = self.sim.roster(user, roster_kind(kind)?).map_err(js_error)?;
        let players: Vec<_> = roster.iter().map(PlayerRecord::display).collect();
        Ok(serde_json::Value::from(players).to_string())
    }

    pub fn get_tactics(&self, user: &str) -> Result<String, JsValue> {
        let tactics = self.sim.tactics(user).map_err(js_error)?;
        Ok(tactics.to_dict().to_string())
    }

    pub fn set_tactics(&mut self, user: &str, formation: &str, style: &str) -> Result<(), JsValue> {
        let style: Style = style.parse().map_err(js_error)?;
        self.sim.set_tactics(user, formation, style).map_err(js_error)
    }

    /// Play a league match; returns the match report JSON
    pub fn simulate(&mut self, user: &str) -> Result<String, JsValue> {
        let report = self.sim.simulate_match(user).map_err(js_error)?;
        Ok(serde_json::to_string(&report).unwrap_or_default())
    }

    /// Play an academy game; returns goals and events JSON
    pub fn play_youth_match(&mut self, user: &str) -> Result<String, JsValue> {
        let result = self.sim.play_youth_match(user).map_err(js_error)?;
        Ok(serde_json::to_string(&result).unwrap_or_default())
    }

    /// Spend credits; `false` when the player could not afford it
    pub fn train(
        &mut self,
        user: &str,
        kind: &str,
        name: &str,
        attribute: &str,
        amount: u32,
    ) -> Result<bool, JsValue> {
        let kind = roster_kind(kind)?;
        let attribute: Attribute = attribute.parse().map_err(js_error)?;
        self.sim
            .train(user, kind, name, attribute, amount)
            .map_err(js_error)
    }

    /// Award credits for an action; returns the amount awarded
    pub fn earn(&mut self, user: &str, kind: &str, name: &str, action: &str) -> Result<u32, JsValue> {
        let kind = roster_kind(kind)?;
        self.sim.earn(user, kind, name, action).map_err(js_error)
    }

    /// Roster as a JSON save document
    pub fn save(&self, user: &str, kind: &str) -> Result<String, JsValue> {
        self.sim.save(user, roster_kind(kind)?).map_err(js_error)
    }

    /// Restore a roster from a save document; returns players restored
    pub fn load(&mut self, user: &str, kind: &str, json: &str) -> Result<usize, JsValue> {
        let kind = roster_kind(kind)?;
        self.sim.load(user, kind, json).map_err(js_error)
    }

    /// Ranked league table as JSON
    pub fn get_table(&self) -> String {
        let rows: Vec<_> = self
            .sim
            .standings()
            .iter()
            .enumerate()
            .map(|(i, standing)| {
                let mut row = standing.to_dict();
                row["rank"] = serde_json::json!(i + 1);
                row
            })
            .collect();
        serde_json::to_string(&rows).unwrap_or_default()
    }

    /// Most recent match reports, newest first
    pub fn get_results(&self, limit: usize) -> String {
        let recent: Vec<_> = self.sim.results.iter().rev().take(limit).collect();
        serde_json::to_string(&recent).unwrap_or_default()
    }

    /// Get current game state as JSON
    pub fn get_state(&self) -> String {
        self.sim.get_state_json()
    }

    pub fn get_matchday(&self) -> u64 {
        self.sim.matchday
    }

    /// Update game config
    pub fn update_config(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.sim.update_config(parse_config(config_json)?);
        Ok(())
    }

    /// Get default config as JSON
    pub fn get_default_config() -> String {
        serde_json::to_string(&GameConfig::default()).unwrap_or_default()
    }
}
