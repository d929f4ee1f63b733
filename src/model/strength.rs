//! Team strength parameters and the home/away pairing built from them.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Relative goal-scoring (`attack`) and goal-conceding (`defense`) propensity.
///
/// Values are unbounded above; callers may clamp for display but the model
/// accepts any finite, non-negative number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub attack: f64,
    pub defense: f64,
}

impl TeamStrength {
    pub fn new(attack: f64, defense: f64) -> Result<Self> {
        Ok(Self {
            attack: check_strength("attack", attack)?,
            defense: check_strength("defense", defense)?,
        })
    }
}

/// A home side against an away side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchUp {
    pub home: TeamStrength,
    pub away: TeamStrength,
}

impl MatchUp {
    /// Validate the four raw parameters and pair them up.
    pub fn from_params(
        home_attack: f64,
        home_defense: f64,
        away_attack: f64,
        away_defense: f64,
    ) -> Result<Self> {
        let match_up = Self {
            home: TeamStrength {
                attack: check_strength("home_attack", home_attack)?,
                defense: check_strength("home_defense", home_defense)?,
            },
            away: TeamStrength {
                attack: check_strength("away_attack", away_attack)?,
                defense: check_strength("away_defense", away_defense)?,
            },
        };
        // Finite inputs can still overflow once multiplied.
        if !match_up.total_expectancy().is_finite() {
            return Err(LabError::invalid(
                "strengths",
                "attack * opposing defense overflows",
            ));
        }
        Ok(match_up)
    }

    /// Home expected-goals proxy: home attack against away defense.
    pub fn home_expectancy(&self) -> f64 {
        self.home.attack * self.away.defense
    }

    /// Away expected-goals proxy: away attack against home defense.
    pub fn away_expectancy(&self) -> f64 {
        self.away.attack * self.home.defense
    }

    pub fn total_expectancy(&self) -> f64 {
        self.home_expectancy() + self.away_expectancy()
    }

    /// Re-check a match-up whose fields were set directly.
    pub(crate) fn validated(self) -> Result<Self> {
        Self::from_params(
            self.home.attack,
            self.home.defense,
            self.away.attack,
            self.away.defense,
        )
    }
}

fn check_strength(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(LabError::invalid(field, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(LabError::invalid(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(value)
}
