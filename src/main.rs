//! odds-lab runner
//!
//! Evaluates one fixture through the configured probability model and splits
//! a stake across one odds book, then prints both results as JSON.
//!
//! Everything is driven by environment variables (see `config.rs`):
//! - MODEL, MAX_GOALS
//! - HOME_ATTACK, HOME_DEFENSE, AWAY_ATTACK, AWAY_DEFENSE
//! - ARB_ODDS, ARB_STAKE
//! - LOG_LEVEL, LOG_JSON

use tracing::{error, info};

use odds_lab::arbitrage::allocate;
use odds_lab::config::Settings;
use odds_lab::model::{estimate_with, MatchUp};

fn main() -> anyhow::Result<()> {
    // Load configuration.
    let settings = Settings::from_env();

    // Initialize logging.
    init_logging(&settings);

    info!(model = ?settings.model, "Configuration loaded");

    // Validate settings.
    if let Err(errors) = settings.validate() {
        for e in &errors {
            error!(error = %e, "Configuration error");
        }
        anyhow::bail!("Configuration validation failed");
    }

    // =========================================================================
    // Outcome probabilities
    // =========================================================================
    let match_up = MatchUp::from_params(
        settings.home_attack,
        settings.home_defense,
        settings.away_attack,
        settings.away_defense,
    )?;
    let estimate = estimate_with(settings.model, &match_up, settings.max_goals)?;
    info!(
        home = estimate.distribution.home,
        draw = estimate.distribution.draw,
        away = estimate.distribution.away,
        over25 = estimate.over25,
        score = %estimate.predicted_score,
        "Match estimate"
    );

    // =========================================================================
    // Stake allocation
    // =========================================================================
    let allocation = allocate(&settings.arb_odds, settings.arb_stake)?;
    for (leg, rounded) in allocation.legs.iter().zip(allocation.rounded_stakes(2)) {
        info!(
            outcome = %leg.outcome,
            odds = %leg.odds,
            stake = %rounded,
            payout = %leg.payout.round_dp(2),
            "Stake leg"
        );
    }
    info!(
        implied_prob_sum = %allocation.implied_prob_sum.round_dp(4),
        roi_percent = %allocation.roi_percent.round_dp(2),
        is_arbitrage = allocation.is_arbitrage,
        profit = %allocation.guaranteed_profit.round_dp(2),
        "Allocation"
    );

    let report = serde_json::json!({
        "estimate": estimate,
        "allocation": allocation,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn init_logging(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    // Logs go to stderr so stdout stays clean JSON.
    if settings.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
