use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something worth a line of commentary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    Scored { player: String },
    Injured { player: String, weeks: u32 },
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvent::Scored { player } => write!(f, "GOAL! {} scores!", player),
            MatchEvent::Injured { player, weeks } => {
                let unit = if *weeks == 1 { "week" } else { "weeks" };
                write!(f, "{} is injured and will miss {} {}.", player, weeks, unit)
            }
        }
    }
}

/// What one side's squad produced in a match
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchdayResult {
    pub goals: u32,
    pub events: Vec<MatchEvent>,
}

/// Full match summary handed back to the caller
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchReport {
    pub home: String,
    pub away: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub events: Vec<MatchEvent>,
    pub commentary: Vec<String>,
}

impl MatchReport {
    pub fn new(home: &str, away: &str, result: MatchdayResult, away_goals: u32) -> Self {
        let mut commentary: Vec<String> = result.events.iter().map(|e| e.to_string()).collect();
        commentary.push(format!(
            "Full Time: {} {} - {} {}",
            home, result.goals, away_goals, away
        ));

        Self {
            home: home.to_string(),
            away: away.to_string(),
            home_goals: result.goals,
            away_goals,
            events: result.events,
            commentary,
        }
    }
}

/// The match engine
pub struct MatchEngine<'a> {
    config: &'a GameConfig,
}

impl<'a> MatchEngine<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    /// Play one tick per eligible player, in squad order.
    ///
    /// Scoring and injury use independent draws; a player who scores is
    /// never injured in the same tick.
    pub fn simulate(
        &self,
        squad: &mut [PlayerRecord],
        style: Style,
        rng: &mut impl Rng,
    ) -> MatchdayResult {
        let mut result = MatchdayResult::default();

        for player in squad.iter_mut() {
            if !player.is_available() || !player.takes_shots() {
                continue;
            }

            player.matches_played += 1;
            player.fitness = player.fitness.saturating_sub(self.config.match_fatigue);

            let p = player.scoring_probability(style, self.config);
            let r: f64 = rng.gen();
            if r < p {
                player.goals_scored += 1;
                result.goals += 1;
                log::debug!("{} scored (p={:.3})", player.name, p);
                result.events.push(MatchEvent::Scored {
                    player: player.name.clone(),
                });
                continue;
            }

            if rng.gen_bool(self.config.injury_chance.clamp(0.0, 1.0)) {
                let (lo, hi) = self.config.injury_weeks;
                let weeks = rng.gen_range(lo.min(hi)..=lo.max(hi)).max(1);
                player.injure(weeks);
                log::debug!("{} injured for {} weeks", player.name, weeks);
                result.events.push(MatchEvent::Injured {
                    player: player.name.clone(),
                    weeks,
                });
            }
        }

        result
    }

    /// Placeholder for the unmodelled opposition: uniform goals
    pub fn opponent_goals(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(0..=self.config.opponent_max_goals)
    }
}
