//! Outcome probability estimator ("Poisson Lab" heuristic).
//!
//! Despite the name this is not a Poisson fit. Each side's win share is its
//! share of the combined expected goals, compressed into a band:
//!
//! ```text
//! raw_home = share_home * 0.75 + 0.10
//! raw_away = share_away * 0.75 + 0.10
//! raw_draw = 1 - raw_home - raw_away
//! ```
//!
//! so neither side leaves [10%, 85%] and about 5% stays reserved for the
//! draw. Over 2.5 goals is a two-bucket lookup on total expectancy.

use tracing::{debug, warn};

use super::distribution::{round_goals, MatchEstimate, ModelKind, OutcomeDistribution, ScoreLine};
use super::strength::MatchUp;
use crate::error::Result;

/// Scale applied to each side's expected-goals share.
pub const SHARE_SCALE: f64 = 0.75;
/// Minimum win probability for either side.
pub const SHARE_FLOOR: f64 = 0.10;
/// Total expectancy above which the over 2.5 bucket is used.
pub const OVER_LINE: f64 = 2.5;
pub const OVER25_HIGH: u8 = 65;
pub const OVER25_LOW: u8 = 45;

/// Estimate the outcome distribution from four raw strength parameters.
pub fn estimate(
    home_attack: f64,
    home_defense: f64,
    away_attack: f64,
    away_defense: f64,
) -> Result<MatchEstimate> {
    let match_up = MatchUp::from_params(home_attack, home_defense, away_attack, away_defense)?;
    Ok(heuristic(&match_up))
}

/// Heuristic estimate for a match-up built elsewhere. Fields may have been set
/// directly, so they are checked again.
pub fn estimate_match(match_up: &MatchUp) -> Result<MatchEstimate> {
    Ok(heuristic(&match_up.validated()?))
}

fn heuristic(match_up: &MatchUp) -> MatchEstimate {
    let home_exp = match_up.home_expectancy();
    let away_exp = match_up.away_expectancy();
    let total = home_exp + away_exp;

    let (home_share, away_share) = if total > 0.0 {
        (home_exp / total, away_exp / total)
    } else {
        warn!("Zero combined expectancy, splitting shares evenly");
        (0.5, 0.5)
    };

    let mut raw_home = home_share * SHARE_SCALE + SHARE_FLOOR;
    let mut raw_away = away_share * SHARE_SCALE + SHARE_FLOOR;
    let raw_draw = 1.0 - raw_home - raw_away;

    // Only reachable if the band constants are retuned past 1.0 combined.
    if raw_draw < 0.0 {
        let sides = raw_home + raw_away;
        raw_home /= sides;
        raw_away /= sides;
    }

    let distribution = OutcomeDistribution::from_fractions(raw_home, raw_away);
    let over25 = if total > OVER_LINE { OVER25_HIGH } else { OVER25_LOW };

    let expected_home_goals = round_goals(home_exp);
    let expected_away_goals = round_goals(away_exp);

    debug!(
        home_exp,
        away_exp,
        raw_home,
        raw_away,
        raw_draw,
        home = distribution.home,
        draw = distribution.draw,
        away = distribution.away,
        "Heuristic estimate"
    );

    MatchEstimate {
        model: ModelKind::Heuristic,
        distribution,
        home_expectancy: home_exp,
        away_expectancy: away_exp,
        expected_home_goals,
        expected_away_goals,
        over25,
        under25: 100 - over25,
        predicted_score: ScoreLine {
            home: expected_home_goals,
            away: expected_away_goals,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lab_fixture() {
        // home_exp = 1.85 * 1.10 = 2.035, away_exp = 2.10 * 0.95 = 1.995
        // raw_home = 2.035 / 4.03 * 0.75 + 0.10 = 0.47872 -> 48
        // raw_away = 1.995 / 4.03 * 0.75 + 0.10 = 0.47128 -> 47
        // draw = 100 - 48 - 47 = 5
        let e = estimate(1.85, 0.95, 2.10, 1.10).unwrap();
        assert_eq!(e.distribution, OutcomeDistribution { home: 48, draw: 5, away: 47 });
        assert_eq!(e.expected_home_goals, 2);
        assert_eq!(e.expected_away_goals, 2);
        assert_eq!(e.predicted_score.to_string(), "2-2");
        assert_eq!(e.over25, 65);
        assert_eq!(e.under25, 35);
        assert_eq!(e.model, ModelKind::Heuristic);
    }

    #[test]
    fn low_scoring_uses_under_bucket() {
        // home_exp = 1.0 * 1.0 = 1.0, away_exp = 1.0 * 1.0 = 1.0, total 2.0 <= 2.5
        let e = estimate(1.0, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(e.over25, 45);
        assert_eq!(e.under25, 55);
    }

    #[test]
    fn total_exactly_on_line_is_under() {
        // 1.25 + 1.25 = 2.5, not strictly greater
        let e = estimate(1.25, 1.0, 1.25, 1.0).unwrap();
        assert_eq!(e.over25, 45);
    }

    #[test]
    fn one_sided_match_hits_band_edges() {
        // away_exp = 0 -> home share 1.0 -> 0.85, away share 0.0 -> 0.10
        let e = estimate(5.0, 0.0, 0.0, 5.0).unwrap();
        assert_eq!(e.distribution, OutcomeDistribution { home: 85, draw: 5, away: 10 });
        assert_eq!(e.predicted_score.to_string(), "25-0");
    }

    #[test]
    fn zero_strengths_do_not_divide_by_zero() {
        let e = estimate(0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(e.distribution.total(), 100);
        assert_eq!(e.distribution.home, e.distribution.away);
        assert!(e.distribution.draw > 0);
        assert_eq!(e.predicted_score.to_string(), "0-0");
    }

    #[test]
    fn estimate_match_checks_direct_field_writes() {
        let mut m = MatchUp::from_params(1.0, 1.0, 1.0, 1.0).unwrap();
        m.home.defense = f64::NAN;
        let err = estimate_match(&m).unwrap_err();
        assert_eq!(err.field(), "home_defense");

        m.home.defense = 1.0;
        assert_eq!(estimate_match(&m).unwrap(), estimate(1.0, 1.0, 1.0, 1.0).unwrap());
    }

    #[test]
    fn invalid_strength_is_rejected() {
        assert!(estimate(-1.0, 1.0, 1.0, 1.0).is_err());
        assert!(estimate(1.0, f64::NAN, 1.0, 1.0).is_err());
    }
}
