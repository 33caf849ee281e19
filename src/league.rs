use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One club's season record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStanding {
    pub club: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl LeagueStanding {
    pub fn new(club: &str) -> Self {
        Self {
            club: club.to_string(),
            ..Default::default()
        }
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    /// Fold one result into the row
    pub fn record(&mut self, goals_for: u32, goals_against: u32) {
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => {
                self.won += 1;
                self.points += 3;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += 1;
            }
            Ordering::Less => self.lost += 1,
        }
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "club": self.club,
            "P": self.played,
            "W": self.won,
            "D": self.drawn,
            "L": self.lost,
            "GF": self.goals_for,
            "GA": self.goals_against,
            "GD": self.goal_difference(),
            "Pts": self.points,
        })
    }
}

/// Standings for every club, in the order clubs joined
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LeagueTable {
    rows: Vec<LeagueStanding>,
}

impl LeagueTable {
    pub fn new<'a>(clubs: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rows: clubs.into_iter().map(LeagueStanding::new).collect(),
        }
    }

    pub fn standing(&self, club: &str) -> Option<&LeagueStanding> {
        self.rows.iter().find(|r| r.club == club)
    }

    /// Add a zeroed row unless `club` already has one
    pub fn add_club(&mut self, club: &str) {
        if self.standing(club).is_none() {
            self.rows.push(LeagueStanding::new(club));
        }
    }

    /// Record a result for `club`, adding a fresh row if it has none
    pub fn record_result(&mut self, club: &str, goals_for: u32, goals_against: u32) {
        self.add_club(club);
        if let Some(row) = self.rows.iter_mut().find(|r| r.club == club) {
            row.record(goals_for, goals_against);
        }
    }

    /// Record both sides of a fixture
    pub fn record_fixture(&mut self, home: &str, home_goals: u32, away: &str, away_goals: u32) {
        self.record_result(home, home_goals, away_goals);
        self.record_result(away, away_goals, home_goals);
    }

    /// Points, then goal difference, then club name
    pub fn ranked_view(&self) -> Vec<&LeagueStanding> {
        let mut ranked: Vec<&LeagueStanding> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
                .then_with(|| a.club.cmp(&b.club))
        });
        ranked
    }
}
