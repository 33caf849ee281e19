use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Every generated club squad has exactly this many players.
pub const SQUAD_SIZE: usize = 20;
/// Upper bound for ratings, stats and fitness.
pub const ATTRIBUTE_MAX: u32 = 100;

/// Squad role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
    #[serde(rename = "SUB")]
    Substitute,
}

impl Position {
    /// Positions drawn from when a squad is not built from a template
    pub const OUTFIELD_AND_KEEPER: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
            Position::Substitute => "SUB",
        }
    }

    /// Midfielders and forwards get a shot at goal on matchday
    pub fn is_attacking(&self) -> bool {
        matches!(self, Position::Midfielder | Position::Forward)
    }

    /// `GK, DEF x4, MID x3, FWD x2, SUB`
    pub fn default_template() -> Vec<Position> {
        let mut template = vec![Position::Goalkeeper];
        template.extend([Position::Defender; 4]);
        template.extend([Position::Midfielder; 3]);
        template.extend([Position::Forward; 2]);
        template.push(Position::Substitute);
        template
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Club-wide playing style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Attacking,
    #[default]
    Balanced,
    Defensive,
}

impl Style {
    /// Applied to every eligible player's scoring chance
    pub fn multiplier(&self) -> f64 {
        match self {
            Style::Attacking => 1.2,
            Style::Balanced => 1.0,
            Style::Defensive => 0.8,
        }
    }
}

impl FromStr for Style {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attacking" => Ok(Style::Attacking),
            "balanced" => Ok(Style::Balanced),
            "defensive" => Ok(Style::Defensive),
            _ => Err(GameError::UnknownStyle(s.to_string())),
        }
    }
}

/// Something credits can be spent on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Speed,
    Passing,
    Shooting,
    Stamina,
    Rating,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Speed => "speed",
            Attribute::Passing => "passing",
            Attribute::Shooting => "shooting",
            Attribute::Stamina => "stamina",
            Attribute::Rating => "rating",
        }
    }
}

impl FromStr for Attribute {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "speed" => Ok(Attribute::Speed),
            "passing" => Ok(Attribute::Passing),
            "shooting" => Ok(Attribute::Shooting),
            "stamina" => Ok(Attribute::Stamina),
            "rating" => Ok(Attribute::Rating),
            _ => Err(GameError::UnknownAttribute(s.to_string())),
        }
    }
}

/// The four trainable stats of an academy prospect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub speed: u32,
    pub passing: u32,
    pub shooting: u32,
    pub stamina: u32,
}

impl Stats {
    pub fn get_mut(&mut self, attribute: Attribute) -> Option<&mut u32> {
        match attribute {
            Attribute::Speed => Some(&mut self.speed),
            Attribute::Passing => Some(&mut self.passing),
            Attribute::Shooting => Some(&mut self.shooting),
            Attribute::Stamina => Some(&mut self.stamina),
            Attribute::Rating => None,
        }
    }

    /// Rounded mean of the four stats
    pub fn overall(&self) -> u32 {
        let sum = [self.speed, self.passing, self.shooting, self.stamina]
            .iter()
            .fold(2u64, |acc, &v| acc + v as u64);
        (sum / 4) as u32
    }

    fn clamp_to(&mut self, max: u32) {
        for value in [&mut self.speed, &mut self.passing, &mut self.shooting, &mut self.stamina] {
            *value = (*value).min(max);
        }
    }
}

/// How a player's ability is tracked.
///
/// Senior squads carry one scalar rating; academy prospects carry four
/// stats. Both serialize flat into the player object, as `"rating": n` or
/// `"stats": {...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    Rating { rating: u32 },
    Attributes { stats: Stats },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionModel {
    #[default]
    Rating,
    Attributes,
}

impl Profile {
    pub fn model(&self) -> ProgressionModel {
        match self {
            Profile::Rating { .. } => ProgressionModel::Rating,
            Profile::Attributes { .. } => ProgressionModel::Attributes,
        }
    }

    /// Mutable slot for `attribute`, if this profile tracks it
    pub fn slot_mut(&mut self, attribute: Attribute) -> Option<&mut u32> {
        match (self, attribute) {
            (Profile::Rating { rating }, Attribute::Rating) => Some(rating),
            (Profile::Rating { .. }, _) => None,
            (Profile::Attributes { stats }, attribute) => stats.get_mut(attribute),
        }
    }
}

/// A single player, senior or academy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub club: String,
    pub position: Position,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub credits: u32,
    #[serde(default = "full_fitness")]
    pub fitness: u32,
    #[serde(default)]
    pub training_sessions: u32,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub injured: bool,
    #[serde(default)]
    pub injury_weeks: u32,
}

fn full_fitness() -> u32 {
    ATTRIBUTE_MAX
}

impl PlayerRecord {
    pub fn new(name: &str, club: &str, position: Position, profile: Profile) -> Self {
        Self {
            name: name.to_string(),
            club: club.to_string(),
            position,
            profile,
            credits: 0,
            fitness: ATTRIBUTE_MAX,
            training_sessions: 0,
            matches_played: 0,
            goals_scored: 0,
            injured: false,
            injury_weeks: 0,
        }
    }

    pub fn rated(name: &str, club: &str, position: Position, rating: u32) -> Self {
        Self::new(name, club, position, Profile::Rating { rating })
    }

    pub fn prospect(name: &str, club: &str, position: Position, stats: Stats) -> Self {
        Self::new(name, club, position, Profile::Attributes { stats })
    }

    pub fn is_available(&self) -> bool {
        !self.injured
    }

    /// Whether this player gets a scoring tick on matchday
    pub fn takes_shots(&self) -> bool {
        match self.profile {
            Profile::Rating { .. } => self.position.is_attacking(),
            Profile::Attributes { .. } => true,
        }
    }

    /// Chance of scoring in a single tick under `style`
    pub fn scoring_probability(&self, style: Style, config: &GameConfig) -> f64 {
        let base = match &self.profile {
            Profile::Rating { rating } => *rating as f64 / config.rating_normaliser,
            Profile::Attributes { stats } => stats.shooting as f64 / config.shooting_normaliser,
        };
        base * style.multiplier()
    }

    /// Rule player out for `weeks`; zero weeks leaves them fit
    pub fn injure(&mut self, weeks: u32) {
        self.injury_weeks = weeks;
        self.injured = weeks > 0;
    }

    /// Pull a record read from outside back inside the game's bounds.
    ///
    /// Ratings, stats and fitness are capped at [`ATTRIBUTE_MAX`], and a
    /// player with no injury weeks left is fit while a fit player carries none.
    pub fn normalise(&mut self) {
        match &mut self.profile {
            Profile::Rating { rating } => *rating = (*rating).min(ATTRIBUTE_MAX),
            Profile::Attributes { stats } => stats.clamp_to(ATTRIBUTE_MAX),
        }
        self.fitness = self.fitness.min(ATTRIBUTE_MAX);
        if self.injured {
            self.injure(self.injury_weeks);
        } else {
            self.injury_weeks = 0;
        }
    }

    /// Scalar rating, derived from stats for prospects
    pub fn overall(&self) -> u32 {
        match &self.profile {
            Profile::Rating { rating } => *rating,
            Profile::Attributes { stats } => stats.overall(),
        }
    }

    /// Read-only projection for the front end
    pub fn display(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A club and the squad it owns
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClubRecord {
    pub name: String,
    /// Static strength used for AI clubs
    pub rating: u32,
    pub squad: Vec<PlayerRecord>,
}

impl ClubRecord {
    pub fn new(name: &str, rating: u32) -> Self {
        Self {
            name: name.to_string(),
            rating,
            squad: Vec::new(),
        }
    }

    pub fn available_players(&self) -> usize {
        self.squad.iter().filter(|p| p.is_available()).count()
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "rating": self.rating,
            "squad_size": self.squad.len(),
            "available": self.available_players(),
            "squad": self.squad.iter().map(PlayerRecord::display).collect::<Vec<_>>(),
        })
    }
}

/// Formation label and style chosen by a manager
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticsRecord {
    /// Free text, not checked against the squad
    pub formation: String,
    pub style: Style,
}

impl Default for TacticsRecord {
    fn default() -> Self {
        Self {
            formation: "4-4-2".to_string(),
            style: Style::Balanced,
        }
    }
}

impl TacticsRecord {
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "formation": self.formation,
            "style": self.style,
            "multiplier": self.style.multiplier(),
        })
    }
}

/// Club entry in the default league
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClubSeed {
    pub name: String,
    pub rating: u32,
}

impl ClubSeed {
    fn new(name: &str, rating: u32) -> Self {
        Self {
            name: name.to_string(),
            rating,
        }
    }
}

/// How squad positions are handed out
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionScheme {
    /// Cycle through the template until the squad is full
    Template(Vec<Position>),
    /// Uniform over GK/DEF/MID/FWD
    Uniform,
}

/// First and last names combined at random
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamePool {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

impl Default for NamePool {
    fn default() -> Self {
        let first = [
            "Zul", "Irfan", "Marcus", "Hariss", "Safuwan", "Ikhsan", "Faris", "Shawal",
            "Hassan", "Ryhan", "Adam", "Daniel", "Jacob", "Gabriel",
        ];
        let last = [
            "Tan", "Lim", "Rahman", "Latif", "Azri", "Baharudin", "Ramli", "Sunny",
            "Fandi", "Lee", "Ong", "Nasir", "Mahler", "Goh",
        ];
        Self {
            first_names: first.iter().map(|s| s.to_string()).collect(),
            last_names: last.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Game configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Clubs in the league, each with a static base rating
    pub clubs: Vec<ClubSeed>,
    /// Ability model for generated club squads
    pub squad_model: ProgressionModel,
    /// Inclusive rating range for rated players
    pub rating_range: (u32, u32),
    /// Inclusive range for each of the four prospect stats
    pub stat_range: (u32, u32),
    pub position_scheme: PositionScheme,
    /// `None` falls back to "Player NNN" names
    pub name_pool: Option<NamePool>,
    /// Fixed names of the academy intake handed to every new manager
    pub youth_names: Vec<String>,

    /// Divides a 0-100 rating into a scoring chance
    pub rating_normaliser: f64,
    /// Divides a 0-100 shooting stat into a scoring chance
    pub shooting_normaliser: f64,
    /// Chance per tick of a non-scoring player getting hurt
    pub injury_chance: f64,
    /// Inclusive injury length in weeks
    pub injury_weeks: (u32, u32),
    /// Opponent goals are uniform in `0..=opponent_max_goals`
    pub opponent_max_goals: u32,

    /// Fitness lost by every player who takes part in a match
    pub match_fatigue: u32,
    /// Fitness regained on each recovery tick
    pub fitness_recovery: u32,

    /// Credits awarded per action
    pub credit_rewards: BTreeMap<String, u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let clubs = vec![
            ClubSeed::new("Albirex Phoenix", 78),
            ClubSeed::new("Lion City Kings", 76),
            ClubSeed::new("Tampines Thunder", 75),
            ClubSeed::new("Hougang Hunters", 72),
            ClubSeed::new("Geylang Griffins", 70),
            ClubSeed::new("Balestier Bengals", 68),
            ClubSeed::new("Young Serpents", 66),
            ClubSeed::new("Tanjong Tigers", 65),
            ClubSeed::new("Brunei Hornets", 67),
        ];

        let mut credit_rewards = BTreeMap::new();
        credit_rewards.insert("school".to_string(), 10);
        credit_rewards.insert("women".to_string(), 15);
        credit_rewards.insert("interview".to_string(), 20);

        Self {
            clubs,
            squad_model: ProgressionModel::Rating,
            rating_range: (60, 85),
            stat_range: (40, 60),
            position_scheme: PositionScheme::Template(Position::default_template()),
            name_pool: Some(NamePool::default()),
            youth_names: vec![
                "Zul Azri".to_string(),
                "Irfan Latif".to_string(),
                "Marcus Tan".to_string(),
            ],
            rating_normaliser: 200.0,
            shooting_normaliser: 100.0,
            injury_chance: 0.05,
            injury_weeks: (1, 3),
            opponent_max_goals: 3,
            match_fatigue: 10,
            fitness_recovery: 10,
            credit_rewards,
        }
    }
}

impl GameConfig {
    /// Credits for `action`; the `credits_` form prefix is optional and
    /// unknown actions earn nothing
    pub fn reward_for(&self, action: &str) -> u32 {
        let key = action.strip_prefix("credits_").unwrap_or(action);
        self.credit_rewards.get(key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_layout() {
        let template = Position::default_template();
        assert_eq!(template.len(), 11);
        assert_eq!(template[0], Position::Goalkeeper);
        assert_eq!(template.iter().filter(|p| **p == Position::Defender).count(), 4);
        assert_eq!(template[10], Position::Substitute);
    }

    #[test]
    fn test_style_multipliers() {
        assert_eq!(Style::Attacking.multiplier(), 1.2);
        assert_eq!(Style::Balanced.multiplier(), 1.0);
        assert_eq!(Style::Defensive.multiplier(), 0.8);
        assert_eq!("Attacking".parse::<Style>().unwrap(), Style::Attacking);
        assert!("Park the bus".parse::<Style>().is_err());
    }

    #[test]
    fn test_reward_lookup() {
        let config = GameConfig::default();
        assert_eq!(config.reward_for("school"), 10);
        assert_eq!(config.reward_for("credits_women"), 15);
        assert_eq!(config.reward_for("credits_interview"), 20);
        assert_eq!(config.reward_for("lottery"), 0);
    }

    #[test]
    fn test_scoring_probability_per_model() {
        let config = GameConfig::default();
        let striker = PlayerRecord::rated("A", "Club", Position::Forward, 85);
        let p = striker.scoring_probability(Style::Attacking, &config);
        assert!((p - 0.51).abs() < 1e-9);

        let stats = Stats { speed: 50, passing: 50, shooting: 40, stamina: 50 };
        let prospect = PlayerRecord::prospect("B", "Club", Position::Defender, stats);
        assert!((prospect.scoring_probability(Style::Balanced, &config) - 0.4).abs() < 1e-9);
        assert!(prospect.takes_shots());

        let keeper = PlayerRecord::rated("C", "Club", Position::Goalkeeper, 80);
        assert!(!keeper.takes_shots());
    }

    #[test]
    fn test_player_serializes_flat() {
        let player = PlayerRecord::rated("Player 123", "Young Serpents", Position::Midfielder, 70);
        let value = player.display();
        assert_eq!(value["rating"], 70);
        assert_eq!(value["position"], "MID");
        assert!(value.get("profile").is_none());

        let back: PlayerRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, player);
    }

    #[test]
    fn test_prospect_deserializes_from_stats() {
        let json = r#"{
            "name": "Zul Azri", "club": "Tanjong Tigers", "position": "FWD",
            "stats": {"speed": 41, "passing": 52, "shooting": 60, "stamina": 48},
            "credits": 5, "training_sessions": 1, "matches_played": 2,
            "goals_scored": 1, "injured": true, "injury_weeks": 2
        }"#;
        let player: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(player.profile.model(), ProgressionModel::Attributes);
        assert_eq!(player.fitness, ATTRIBUTE_MAX);
        assert!(player.injured);
        assert_eq!(player.injury_weeks, 2);
    }

    #[test]
    fn test_injure_keeps_flag_consistent() {
        let mut player = PlayerRecord::rated("A", "Club", Position::Forward, 70);
        player.injure(0);
        assert!(!player.injured);
        player.injure(2);
        assert!(player.injured);
        assert_eq!(player.injury_weeks, 2);
    }

    #[test]
    fn test_normalise_restores_bounds() {
        let mut fit = PlayerRecord::rated("A", "Club", Position::Forward, 250);
        fit.fitness = u32::MAX;
        fit.injury_weeks = 3;
        fit.normalise();
        assert_eq!(fit.overall(), ATTRIBUTE_MAX);
        assert_eq!(fit.fitness, ATTRIBUTE_MAX);
        assert!(!fit.injured);
        assert_eq!(fit.injury_weeks, 0);

        let stats = Stats { speed: 400, passing: 50, shooting: 101, stamina: 0 };
        let mut hurt = PlayerRecord::prospect("B", "Club", Position::Defender, stats);
        hurt.injured = true;
        hurt.normalise();
        assert!(!hurt.injured);
        match hurt.profile {
            Profile::Attributes { stats } => {
                assert_eq!((stats.speed, stats.shooting), (ATTRIBUTE_MAX, ATTRIBUTE_MAX))
            }
            _ => panic!("expected prospect"),
        }

        let mut out = PlayerRecord::rated("C", "Club", Position::Midfielder, 70);
        out.injure(2);
        out.normalise();
        assert!(out.injured);
        assert_eq!(out.injury_weeks, 2);
    }

    #[test]
    fn test_stats_overall_large_values() {
        let stats = Stats { speed: u32::MAX, passing: u32::MAX, shooting: u32::MAX, stamina: u32::MAX };
        assert_eq!(stats.overall(), u32::MAX);
    }
}
