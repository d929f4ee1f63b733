//! Match-outcome probability models.

pub mod distribution;
pub mod estimator;
pub mod score_matrix;
pub mod strength;

pub use distribution::{MatchEstimate, ModelKind, OutcomeDistribution, ScoreLine};
pub use estimator::estimate;
pub use score_matrix::{estimate_score_matrix, DEFAULT_MAX_GOALS};
pub use strength::{MatchUp, TeamStrength};

use crate::error::Result;

/// Run the selected model. `max_goals` only applies to the score matrix.
pub fn estimate_with(kind: ModelKind, match_up: &MatchUp, max_goals: u32) -> Result<MatchEstimate> {
    match kind {
        ModelKind::Heuristic => estimator::estimate_match(match_up),
        ModelKind::ScoreMatrix => estimate_score_matrix(match_up, max_goals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_tags_the_model() {
        let m = MatchUp::from_params(1.85, 0.95, 2.10, 1.10).unwrap();
        let h = estimate_with(ModelKind::Heuristic, &m, DEFAULT_MAX_GOALS).unwrap();
        let s = estimate_with(ModelKind::ScoreMatrix, &m, DEFAULT_MAX_GOALS).unwrap();
        assert_eq!(h.model, ModelKind::Heuristic);
        assert_eq!(s.model, ModelKind::ScoreMatrix);
        assert_eq!(h.home_expectancy, s.home_expectancy);
    }

    #[test]
    fn heuristic_ignores_goal_cap() {
        let m = MatchUp::from_params(1.0, 1.0, 1.0, 1.0).unwrap();
        assert!(estimate_with(ModelKind::Heuristic, &m, 0).is_ok());
        assert!(estimate_with(ModelKind::ScoreMatrix, &m, 0).is_err());
    }
}
