//! Poisson score-matrix model.
//!
//! Treats the two expectancies as independent Poisson rates and sums the
//! joint probability of every scoreline up to a per-match goal cap. The cap
//! is `max_goals` or `ceil(λ + 10·√λ)` for the larger rate, whichever is
//! higher, so high-scoring fixtures keep their shape. Tail mass beyond the
//! cap is folded into the last bucket so each marginal sums to 1.

use tracing::debug;

use super::distribution::{round_goals, MatchEstimate, ModelKind, OutcomeDistribution, ScoreLine};
use super::strength::MatchUp;
use crate::error::{LabError, Result};

pub const DEFAULT_MAX_GOALS: u32 = 10;

/// Largest per-side rate the matrix accepts. Bounds the matrix at 343x343
/// and keeps `e^-λ` well clear of underflow.
pub const MAX_RATE: f64 = 200.0;

/// Estimate the outcome distribution from the full score matrix.
pub fn estimate_score_matrix(match_up: &MatchUp, max_goals: u32) -> Result<MatchEstimate> {
    let match_up = match_up.validated()?;
    if max_goals == 0 {
        return Err(LabError::invalid("max_goals", "must be at least 1"));
    }

    let lambda_home = match_up.home_expectancy();
    let lambda_away = match_up.away_expectancy();
    let lambda_max = lambda_home.max(lambda_away);
    if lambda_max > MAX_RATE {
        return Err(LabError::invalid(
            "strengths",
            format!("expectancy {lambda_max} exceeds the score-matrix limit of {MAX_RATE}"),
        ));
    }

    let cap = goal_cap(lambda_max, max_goals);
    let pmf_h = poisson_pmf(lambda_home, cap);
    let pmf_a = poisson_pmf(lambda_away, cap);

    let mut p_home = 0.0;
    let mut p_draw = 0.0;
    let mut p_away = 0.0;
    let mut p_over = 0.0;
    let mut best = (ScoreLine { home: 0, away: 0 }, -1.0_f64);

    for (i, p_i) in pmf_h.iter().enumerate() {
        for (j, p_j) in pmf_a.iter().enumerate() {
            let p = p_i * p_j;
            if i > j {
                p_home += p;
            } else if i < j {
                p_away += p;
            } else {
                p_draw += p;
            }
            if i + j > 2 {
                p_over += p;
            }
            if is_better_score(i, j, p, &best) {
                best = (
                    ScoreLine {
                        home: i as u32,
                        away: j as u32,
                    },
                    p,
                );
            }
        }
    }

    // Guard against tiny float drift.
    let sum = p_home + p_draw + p_away;
    let (p_home, p_away) = if sum > 0.0 {
        (p_home / sum, p_away / sum)
    } else {
        (1.0 / 3.0, 1.0 / 3.0)
    };

    let distribution = OutcomeDistribution::from_fractions(p_home, p_away);
    let over25 = (p_over * 100.0).round().clamp(0.0, 100.0) as u8;

    debug!(
        lambda_home,
        lambda_away,
        goal_cap = cap,
        p_home,
        p_away,
        p_over,
        "Score-matrix estimate"
    );

    Ok(MatchEstimate {
        model: ModelKind::ScoreMatrix,
        distribution,
        home_expectancy: lambda_home,
        away_expectancy: lambda_away,
        expected_home_goals: round_goals(lambda_home),
        expected_away_goals: round_goals(lambda_away),
        over25,
        under25: 100 - over25,
        predicted_score: best.0,
    })
}

/// Goals per side to enumerate: at least `max_goals`, widened to ten standard
/// deviations above the larger rate.
fn goal_cap(lambda_max: f64, max_goals: u32) -> u32 {
    let spread = (lambda_max + 10.0 * lambda_max.sqrt()).ceil() as u32;
    max_goals.max(spread)
}

/// Strictly more likely wins; on a tie prefer fewer total goals, then fewer home goals.
fn is_better_score(i: usize, j: usize, p: f64, best: &(ScoreLine, f64)) -> bool {
    let (line, best_p) = best;
    if p > *best_p {
        return true;
    }
    if p < *best_p {
        return false;
    }
    let total = i + j;
    let best_total = (line.home + line.away) as usize;
    total < best_total || (total == best_total && i < line.home as usize)
}

/// Poisson PMF over `0..=max_k` with the tail folded into the last bucket.
pub(crate) fn poisson_pmf(lambda: f64, max_k: u32) -> Vec<f64> {
    let max_k = max_k as usize;
    let mut out = vec![0.0; max_k + 1];
    let lambda = lambda.max(0.0);

    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }

    let sum: f64 = out.iter().sum();
    if sum < 1.0 {
        out[max_k] += 1.0 - sum;
    }
    out
}
