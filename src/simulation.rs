use crate::accounts::Accounts;
use crate::error::{GameError, GameResult};
use crate::league::{LeagueStanding, LeagueTable};
use crate::matchday::{MatchEngine, MatchReport, MatchdayResult};
use crate::persistence;
use crate::progression;
use crate::squad;
use crate::types::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Which of a manager's rosters an action targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterKind {
    /// The 20-man senior squad of the managed club
    Squad,
    /// The youth academy prospects
    Academy,
}

impl RosterKind {
    /// Name of the save document for `user`
    fn save_key(&self, user: &str) -> String {
        match self {
            RosterKind::Academy => user.to_string(),
            RosterKind::Squad => format!("{}_squad", user),
        }
    }
}

impl FromStr for RosterKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squad" => Ok(RosterKind::Squad),
            "academy" | "youth" => Ok(RosterKind::Academy),
            _ => Err(GameError::UnknownRoster(s.to_string())),
        }
    }
}

/// Main game state and controller
#[derive(Serialize, Deserialize)]
pub struct Simulation {
    /// Matchdays played across all managers
    pub matchday: u64,
    /// Every club in the league; squads are filled when a manager signs up
    pub clubs: Vec<ClubRecord>,
    /// Tactics per club name
    pub tactics: HashMap<String, TacticsRecord>,
    pub table: LeagueTable,
    /// Academy prospects per manager
    pub academies: HashMap<String, Vec<PlayerRecord>>,
    /// Completed matches, oldest first
    pub results: Vec<MatchReport>,
    pub config: GameConfig,
    accounts: Accounts,
    /// Random number generator seed
    rng_seed: u64,
    /// Streams handed out so far
    rng_draws: u64,
}

impl Simulation {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            matchday: 0,
            clubs: Vec::new(),
            tactics: HashMap::new(),
            table: LeagueTable::default(),
            academies: HashMap::new(),
            results: Vec::new(),
            config,
            accounts: Accounts::default(),
            rng_seed: seed,
            rng_draws: 0,
        }
    }

    /// Add the configured clubs with empty squads and zeroed standings
    pub fn init_default_clubs(&mut self) {
        for seed in &self.config.clubs {
            if self.clubs.iter().any(|c| c.name == seed.name) {
                continue;
            }
            self.clubs.push(ClubRecord::new(&seed.name, seed.rating));
            self.table.add_club(&seed.name);
        }
    }

    /// Fresh reproducible stream for the next action
    fn next_rng(&mut self) -> StdRng {
        let rng = StdRng::seed_from_u64(self.rng_seed.wrapping_add(self.rng_draws));
        self.rng_draws += 1;
        rng
    }

    /// Sign up a manager and hand them a free club, a squad and an academy
    pub fn register(&mut self, email: &str, password: &str) -> GameResult<String> {
        if self.accounts.contains(email) {
            return Err(GameError::DuplicateRegistration(email.to_string()));
        }

        let mut rng = self.next_rng();
        let taken: Vec<&str> = self.accounts.managed_clubs().collect();
        let free: Vec<usize> = self
            .clubs
            .iter()
            .enumerate()
            .filter(|(_, c)| !taken.contains(&c.name.as_str()))
            .map(|(i, _)| i)
            .collect();
        let idx = *free.choose(&mut rng).ok_or(GameError::ClubUnavailable)?;

        let club_name = self.clubs[idx].name.clone();
        self.clubs[idx].squad = squad::generate_squad(&club_name, &self.config, &mut rng);
        self.tactics
            .insert(club_name.clone(), TacticsRecord::default());
        self.academies.insert(
            email.to_string(),
            squad::generate_youth_roster(&self.config, &mut rng),
        );
        self.accounts.register(email, password, &club_name, &mut rng)?;

        log::info!("{} now manages {}", email, club_name);
        Ok(club_name)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> GameResult<()> {
        self.accounts.authenticate(email, password)
    }

    /// Club managed by `user`
    pub fn club_of(&self, user: &str) -> GameResult<&ClubRecord> {
        let name = self
            .accounts
            .club_of(user)
            .ok_or_else(|| GameError::UnknownManager(user.to_string()))?;
        self.clubs
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| GameError::UnknownManager(user.to_string()))
    }

    fn club_index(&self, user: &str) -> GameResult<usize> {
        let name = self
            .accounts
            .club_of(user)
            .ok_or_else(|| GameError::UnknownManager(user.to_string()))?;
        self.clubs
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| GameError::UnknownManager(user.to_string()))
    }

    pub fn roster(&self, user: &str, kind: RosterKind) -> GameResult<&[PlayerRecord]> {
        match kind {
            RosterKind::Squad => Ok(self.club_of(user)?.squad.as_slice()),
            RosterKind::Academy => self
                .academies
                .get(user)
                .map(Vec::as_slice)
                .ok_or_else(|| GameError::UnknownManager(user.to_string())),
        }
    }

    fn roster_mut(&mut self, user: &str, kind: RosterKind) -> GameResult<&mut Vec<PlayerRecord>> {
        match kind {
            RosterKind::Squad => {
                let idx = self.club_index(user)?;
                Ok(&mut self.clubs[idx].squad)
            }
            RosterKind::Academy => self
                .academies
                .get_mut(user)
                .ok_or_else(|| GameError::UnknownManager(user.to_string())),
        }
    }

    pub fn tactics(&self, user: &str) -> GameResult<TacticsRecord> {
        let club = self.club_of(user)?;
        Ok(self.tactics.get(&club.name).cloned().unwrap_or_default())
    }

    pub fn set_tactics(&mut self, user: &str, formation: &str, style: Style) -> GameResult<()> {
        let club = self.club_of(user)?.name.clone();
        log::debug!("{} switches to {} ({:?})", club, formation, style);
        self.tactics.insert(
            club,
            TacticsRecord {
                formation: formation.to_string(),
                style,
            },
        );
        Ok(())
    }

    /// Play the manager's next league match against a random club.
    ///
    /// The squad gets its weekly recovery tick first, then the result goes
    /// into the table for both sides.
    pub fn simulate_match(&mut self, user: &str) -> GameResult<MatchReport> {
        let idx = self.club_index(user)?;
        let style = self.tactics(user)?.style;
        let mut rng = self.next_rng();

        let home = self.clubs[idx].name.clone();
        let opponents: Vec<&str> = self
            .clubs
            .iter()
            .filter(|c| c.name != home)
            .map(|c| c.name.as_str())
            .collect();
        let away = opponents
            .choose(&mut rng)
            .map(|name| name.to_string())
            .ok_or(GameError::NoOpponent)?;

        let engine = MatchEngine::new(&self.config);
        let players = &mut self.clubs[idx].squad;
        progression::recover_squad(players, &self.config);
        let result = engine.simulate(players, style, &mut rng);
        let away_goals = engine.opponent_goals(&mut rng);

        let report = MatchReport::new(&home, &away, result, away_goals);
        self.table
            .record_fixture(&home, report.home_goals, &away, report.away_goals);
        self.matchday += 1;

        log::info!(
            "matchday {}: {} {} - {} {}",
            self.matchday,
            home,
            report.home_goals,
            report.away_goals,
            away
        );
        self.results.push(report.clone());
        Ok(report)
    }

    /// Academy game: every fit prospect gets a tick, no tactics, no table
    pub fn play_youth_match(&mut self, user: &str) -> GameResult<MatchdayResult> {
        let mut rng = self.next_rng();
        let academy = self
            .academies
            .get_mut(user)
            .ok_or_else(|| GameError::UnknownManager(user.to_string()))?;

        progression::recover_squad(academy, &self.config);
        let result = MatchEngine::new(&self.config).simulate(academy, Style::Balanced, &mut rng);
        Ok(result)
    }

    /// Spend credits for every player called `name`; `Ok(false)` when nobody
    /// could afford it
    pub fn train(
        &mut self,
        user: &str,
        kind: RosterKind,
        name: &str,
        attribute: Attribute,
        amount: u32,
    ) -> GameResult<bool> {
        let roster = self.roster_mut(user, kind)?;
        let mut trained = false;
        for player in roster.iter_mut().filter(|p| p.name == name) {
            trained |= progression::apply_credits(player, attribute, amount);
        }
        Ok(trained)
    }

    /// Award credits for `action` to every player called `name`
    pub fn earn(&mut self, user: &str, kind: RosterKind, name: &str, action: &str) -> GameResult<u32> {
        let award = self.config.reward_for(action);
        let roster = self.roster_mut(user, kind)?;
        for player in roster.iter_mut().filter(|p| p.name == name) {
            progression::earn_credits(player, award as i64);
        }
        Ok(award)
    }

    pub fn save(&self, user: &str, kind: RosterKind) -> GameResult<String> {
        persistence::save_roster(self.roster(user, kind)?)
    }

    pub fn load(&mut self, user: &str, kind: RosterKind, json: &str) -> GameResult<usize> {
        persistence::load_roster(self.roster_mut(user, kind)?, json)
    }

    /// Write `save_<user>.json` (or `save_<user>_squad.json`) into `dir`
    pub fn save_to_dir(&self, dir: &Path, user: &str, kind: RosterKind) -> GameResult<()> {
        let path = persistence::save_path(dir, &kind.save_key(user));
        persistence::save_to_file(self.roster(user, kind)?, &path)
    }

    pub fn load_from_dir(&mut self, dir: &Path, user: &str, kind: RosterKind) -> GameResult<usize> {
        let path = persistence::save_path(dir, &kind.save_key(user));
        persistence::load_from_file(self.roster_mut(user, kind)?, &path)
    }

    pub fn standings(&self) -> Vec<&LeagueStanding> {
        self.table.ranked_view()
    }

    /// Get current state as JSON
    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&SimulationState {
            matchday: self.matchday,
            total_clubs: self.clubs.len(),
            managed_clubs: self.accounts.managed_clubs().count(),
            table: self.standings().into_iter().map(LeagueStanding::to_dict).collect(),
            config: self.config.clone(),
        })
        .unwrap_or_default()
    }

    /// Update config parameter
    pub fn update_config(&mut self, config: GameConfig) {
        self.config = config;
    }
}

#[derive(Serialize, Deserialize)]
pub struct SimulationState {
    pub matchday: u64,
    pub total_clubs: usize,
    pub managed_clubs: usize,
    pub table: Vec<serde_json::Value>,
    pub config: GameConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "elias@singabola.sg";

    fn create_test_simulation() -> Simulation {
        let mut sim = Simulation::new(GameConfig::default(), 42);
        sim.init_default_clubs();
        sim.register(USER, "lion-heart").unwrap();
        sim
    }

    #[test]
    fn test_register_assigns_club_and_rosters() {
        let sim = create_test_simulation();
        let club = sim.club_of(USER).unwrap();
        assert_eq!(club.squad.len(), SQUAD_SIZE);
        assert!(club.squad.iter().all(|p| p.club == club.name));
        assert_eq!(sim.roster(USER, RosterKind::Academy).unwrap().len(), 3);
        assert_eq!(sim.tactics(USER).unwrap(), TacticsRecord::default());
        assert!(sim.authenticate(USER, "lion-heart").is_ok());
        assert!(sim.authenticate(USER, "wrong").is_err());
    }

    #[test]
    fn test_duplicate_and_exhausted_registration() {
        let mut sim = create_test_simulation();
        assert!(matches!(
            sim.register(USER, "again"),
            Err(GameError::DuplicateRegistration(_))
        ));

        for i in 1..sim.clubs.len() {
            sim.register(&format!("manager{}@singabola.sg", i), "pw").unwrap();
        }
        assert!(matches!(
            sim.register("late@singabola.sg", "pw"),
            Err(GameError::ClubUnavailable)
        ));

        let mut managed: Vec<_> = sim.accounts.managed_clubs().collect();
        managed.sort();
        managed.dedup();
        assert_eq!(managed.len(), sim.clubs.len());
    }

    #[test]
    fn test_unknown_manager() {
        let mut sim = create_test_simulation();
        assert!(matches!(
            sim.simulate_match("ghost@singabola.sg"),
            Err(GameError::UnknownManager(_))
        ));
    }

    #[test]
    fn test_simulate_match_updates_table() {
        let mut sim = create_test_simulation();
        sim.set_tactics(USER, "4-3-3", Style::Attacking).unwrap();
        let home = sim.club_of(USER).unwrap().name.clone();

        for _ in 0..10 {
            let report = sim.simulate_match(USER).unwrap();
            assert_eq!(report.home, home);
            assert_ne!(report.away, home);
            assert!(report.away_goals <= 3);
            assert_eq!(
                report.commentary.last().unwrap(),
                &format!(
                    "Full Time: {} {} - {} {}",
                    home, report.home_goals, report.away_goals, report.away
                )
            );
        }

        assert_eq!(sim.matchday, 10);
        assert_eq!(sim.results.len(), 10);
        let row = sim.table.standing(&home).unwrap();
        assert_eq!(row.played, 10);
        assert_eq!(row.points, 3 * row.won + row.drawn);
        let scored: u32 = sim.results.iter().map(|r| r.home_goals).sum();
        assert_eq!(row.goals_for, scored);

        let total_played: u32 = sim.standings().iter().map(|r| r.played).sum();
        assert_eq!(total_played, 20);

        for player in &sim.club_of(USER).unwrap().squad {
            assert!(player.injured || player.injury_weeks == 0);
        }
    }

    #[test]
    fn test_no_opponent() {
        let config = GameConfig {
            clubs: vec![GameConfig::default().clubs[0].clone()],
            ..GameConfig::default()
        };
        let mut sim = Simulation::new(config, 1);
        sim.init_default_clubs();
        sim.register(USER, "pw").unwrap();
        assert!(matches!(sim.simulate_match(USER), Err(GameError::NoOpponent)));
    }

    #[test]
    fn test_train_and_earn_academy() {
        let mut sim = create_test_simulation();
        let name = "Marcus Tan";

        assert!(!sim
            .train(USER, RosterKind::Academy, name, Attribute::Shooting, 5)
            .unwrap());

        assert_eq!(sim.earn(USER, RosterKind::Academy, name, "credits_interview").unwrap(), 20);
        assert_eq!(sim.earn(USER, RosterKind::Academy, name, "juggling").unwrap(), 0);
        assert!(sim
            .train(USER, RosterKind::Academy, name, Attribute::Shooting, 5)
            .unwrap());

        let marcus = sim
            .roster(USER, RosterKind::Academy)
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .unwrap();
        assert_eq!(marcus.credits, 15);
        assert_eq!(marcus.training_sessions, 1);
    }

    #[test]
    fn test_youth_match_counts_appearances() {
        let mut sim = create_test_simulation();
        for _ in 0..5 {
            sim.play_youth_match(USER).unwrap();
        }
        let academy = sim.roster(USER, RosterKind::Academy).unwrap();
        assert!(academy.iter().all(|p| p.matches_played <= 5));
        assert!(academy.iter().any(|p| p.matches_played > 0));
        assert!(academy.iter().all(|p| p.injured || p.injury_weeks == 0));
        assert_eq!(sim.matchday, 0);
    }

    #[test]
    fn test_save_and_load_academy() {
        let mut sim = create_test_simulation();
        sim.earn(USER, RosterKind::Academy, "Zul Azri", "school").unwrap();
        let saved = sim.save(USER, RosterKind::Academy).unwrap();
        let before: Vec<_> = sim
            .roster(USER, RosterKind::Academy)
            .unwrap()
            .iter()
            .map(PlayerRecord::display)
            .collect();

        sim.earn(USER, RosterKind::Academy, "Zul Azri", "interview").unwrap();
        sim.play_youth_match(USER).unwrap();
        assert_eq!(sim.load(USER, RosterKind::Academy, &saved).unwrap(), 3);

        let after: Vec<_> = sim
            .roster(USER, RosterKind::Academy)
            .unwrap()
            .iter()
            .map(PlayerRecord::display)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_squad_save_file_round_trip() {
        let mut sim = create_test_simulation();
        let dir = std::env::temp_dir().join(format!("singabola-sim-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        sim.save_to_dir(&dir, USER, RosterKind::Squad).unwrap();
        let saved = sim.roster(USER, RosterKind::Squad).unwrap().to_vec();
        sim.simulate_match(USER).unwrap();
        assert_eq!(sim.load_from_dir(&dir, USER, RosterKind::Squad).unwrap(), SQUAD_SIZE);
        assert_eq!(sim.roster(USER, RosterKind::Squad).unwrap(), saved.as_slice());

        // nothing saved for the academy yet
        assert_eq!(sim.load_from_dir(&dir, USER, RosterKind::Academy).unwrap(), 0);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_file_stays_in_dir_for_odd_names() {
        let mut sim = create_test_simulation();
        let user = "x/../../../escaped";
        sim.register(user, "pw").unwrap();
        let dir = std::env::temp_dir()
            .join(format!("singabola-odd-{}", std::process::id()))
            .join("saves");
        std::fs::create_dir_all(&dir).unwrap();

        sim.save_to_dir(&dir, user, RosterKind::Academy).unwrap();
        let files: Vec<_> = std::fs::read_dir(&dir).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(files, vec![dir.join("save_x_.._.._.._escaped.json")]);
        assert_eq!(sim.load_from_dir(&dir, user, RosterKind::Academy).unwrap(), 3);

        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_snapshot_resumes_same_season() {
        let mut live = create_test_simulation();
        live.simulate_match(USER).unwrap();

        let snapshot = serde_json::to_string(&live).unwrap();
        let mut restored: Simulation = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(restored.matchday, live.matchday);
        restored.authenticate(USER, "lion-heart").unwrap();

        let a = live.simulate_match(USER).unwrap();
        let b = restored.simulate_match(USER).unwrap();
        assert_eq!(a.commentary, b.commentary);
        assert_eq!(live.standings(), restored.standings());
    }

    #[test]
    fn test_roster_kind_parse() {
        assert_eq!("squad".parse::<RosterKind>().unwrap(), RosterKind::Squad);
        assert_eq!("Youth".parse::<RosterKind>().unwrap(), RosterKind::Academy);
        assert!("reserves".parse::<RosterKind>().is_err());
        assert_eq!(RosterKind::Academy.save_key("a@b.sg"), "a@b.sg");
        assert_eq!(RosterKind::Squad.save_key("a@b.sg"), "a@b.sg_squad");
    }

    #[test]
    fn test_same_seed_same_season() {
        let mut a = create_test_simulation();
        let mut b = create_test_simulation();
        for _ in 0..5 {
            let ra = a.simulate_match(USER).unwrap();
            let rb = b.simulate_match(USER).unwrap();
            assert_eq!(ra.commentary, rb.commentary);
        }
    }
}
