//! Result types shared by both probability models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which probability model produced an estimate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Bounded linear-ratio heuristic (the "Poisson Lab" formula).
    #[default]
    Heuristic,
    /// Independent Poisson goals summed over a score matrix.
    ScoreMatrix,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "score_matrix" | "poisson" => Ok(Self::ScoreMatrix),
            _ => Err(format!("Invalid model: {s}")),
        }
    }
}

/// Home / draw / away split as integer percentages summing to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    pub home: u8,
    pub draw: u8,
    pub away: u8,
}

impl OutcomeDistribution {
    /// Round home and away fractions to whole percentages; draw takes the rest.
    ///
    /// If rounding pushes home + away past 100 the excess comes off the
    /// larger side, so draw never goes negative.
    pub fn from_fractions(home: f64, away: f64) -> Self {
        let mut home = to_pct(home);
        let mut away = to_pct(away);

        let excess = (home + away).saturating_sub(100);
        if excess > 0 {
            if home >= away {
                home -= excess;
            } else {
                away -= excess;
            }
        }

        Self {
            home: home as u8,
            draw: (100 - home - away) as u8,
            away: away as u8,
        }
    }

    pub fn total(&self) -> u32 {
        self.home as u32 + self.draw as u32 + self.away as u32
    }
}

fn to_pct(fraction: f64) -> u32 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

/// A final score, rendered as `"home-away"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home: u32,
    pub away: u32,
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Full output of a match-outcome estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEstimate {
    pub model: ModelKind,
    pub distribution: OutcomeDistribution,
    /// Raw expected-goals proxies before rounding.
    pub home_expectancy: f64,
    pub away_expectancy: f64,
    pub expected_home_goals: u32,
    pub expected_away_goals: u32,
    /// Probability (percent) of more than 2.5 total goals.
    pub over25: u8,
    pub under25: u8,
    pub predicted_score: ScoreLine,
}

/// Round a non-negative expectancy to whole goals (saturating at `u32::MAX`).
pub(crate) fn round_goals(expectancy: f64) -> u32 {
    expectancy.round() as u32
}
