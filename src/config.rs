//! Configuration management.
//!
//! Loads settings from environment variables and .env file.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::arbitrage::allocator::MAX_STAKE;
use crate::arbitrage::odds::MAX_ODDS;
use crate::model::{ModelKind, DEFAULT_MAX_GOALS};

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Settings {
    // Model
    pub model: ModelKind,
    pub max_goals: u32,

    // Fixture strengths
    pub home_attack: f64,
    pub home_defense: f64,
    pub away_attack: f64,
    pub away_defense: f64,

    // Arbitrage book
    pub arb_odds: Vec<Decimal>,
    pub arb_stake: Decimal,

    // Logging
    pub log_level: String,
    pub log_json: bool,

    // Values that failed to parse, reported by `validate`.
    parse_errors: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables (and .env file).
    pub fn from_env() -> Self {
        // Try to load .env file (ignore if not found).
        let _ = dotenvy::dotenv();

        let mut parse_errors = Vec::new();

        let model = match env_str("MODEL", "heuristic").parse::<ModelKind>() {
            Ok(model) => model,
            Err(e) => {
                parse_errors.push(format!("MODEL: {e}"));
                ModelKind::Heuristic
            }
        };

        let arb_odds = match parse_decimal_csv(&env_str("ARB_ODDS", "2.55,3.40,3.10")) {
            Ok(odds) => odds,
            Err(e) => {
                parse_errors.push(format!("ARB_ODDS: {e}"));
                Vec::new()
            }
        };

        Self {
            model,
            max_goals: env_parsed("MAX_GOALS", DEFAULT_MAX_GOALS, &mut parse_errors),

            home_attack: env_parsed("HOME_ATTACK", 1.85, &mut parse_errors),
            home_defense: env_parsed("HOME_DEFENSE", 0.95, &mut parse_errors),
            away_attack: env_parsed("AWAY_ATTACK", 2.10, &mut parse_errors),
            away_defense: env_parsed("AWAY_DEFENSE", 1.10, &mut parse_errors),

            arb_odds,
            arb_stake: env_parsed("ARB_STAKE", Decimal::new(1000, 0), &mut parse_errors),

            log_level: env_str("LOG_LEVEL", "info"),
            log_json: env_bool("LOG_JSON", false),

            parse_errors,
        }
    }

    /// Validate configuration for critical requirements.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = self.parse_errors.clone();

        for (key, value) in [
            ("HOME_ATTACK", self.home_attack),
            ("HOME_DEFENSE", self.home_defense),
            ("AWAY_ATTACK", self.away_attack),
            ("AWAY_DEFENSE", self.away_defense),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{key} must be a finite, non-negative number"));
            }
        }

        if self.model == ModelKind::ScoreMatrix && self.max_goals == 0 {
            errors.push("MAX_GOALS must be at least 1".to_string());
        }

        if self.arb_odds.len() < 2 {
            errors.push("ARB_ODDS needs at least 2 comma-separated prices".to_string());
        }
        if self.arb_odds.iter().any(|o| *o <= Decimal::ONE) {
            errors.push("ARB_ODDS prices must all be greater than 1.0".to_string());
        }
        if self.arb_odds.iter().any(|o| *o > MAX_ODDS) {
            errors.push(format!("ARB_ODDS prices must be at most {MAX_ODDS}"));
        }
        if self.arb_stake <= Decimal::ZERO {
            errors.push("ARB_STAKE must be positive".to_string());
        }
        if self.arb_stake > MAX_STAKE {
            errors.push(format!("ARB_STAKE must be at most {MAX_STAKE}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ModelKind::Heuristic,
            max_goals: DEFAULT_MAX_GOALS,
            home_attack: 1.85,
            home_defense: 0.95,
            away_attack: 2.10,
            away_defense: 1.10,
            arb_odds: vec![Decimal::new(255, 2), Decimal::new(340, 2), Decimal::new(310, 2)],
            arb_stake: Decimal::new(1000, 0),
            log_level: "info".to_string(),
            log_json: false,
            parse_errors: Vec::new(),
        }
    }
}

/// Split a comma-separated list of decimal prices, skipping blanks.
pub fn parse_decimal_csv(raw: &str) -> Result<Vec<Decimal>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Decimal::from_str(s).map_err(|_| format!("not a decimal: {s}")))
        .collect()
}

// =============================================================================
// Environment helpers
// =============================================================================

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

/// Parse `key` if set. A value that does not parse is recorded in `errors`
/// and the default is used in its place.
fn env_parsed<T: FromStr>(key: &str, default: T, errors: &mut Vec<String>) -> T {
    parse_or_record(key, std::env::var(key).ok(), default, errors)
}

fn parse_or_record<T: FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
    errors: &mut Vec<String>,
) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            errors.push(format!("{key}: cannot parse {raw:?}"));
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_csv_trims_and_skips_blanks() {
        let odds = parse_decimal_csv(" 2.55, 3.40 ,,3.10 ").unwrap();
        assert_eq!(odds, vec![dec!(2.55), dec!(3.40), dec!(3.10)]);
        assert!(parse_decimal_csv("2.0,abc").is_err());
    }

    #[test]
    fn malformed_numbers_are_recorded() {
        let mut errors = Vec::new();
        let attack: f64 = parse_or_record("HOME_ATTACK", Some("1.5x".into()), 1.85, &mut errors);
        let goals: u32 = parse_or_record("MAX_GOALS", Some("-3".into()), 10, &mut errors);
        let stake: Decimal = parse_or_record("ARB_STAKE", Some("1,000".into()), dec!(1000), &mut errors);
        assert_eq!((attack, goals, stake), (1.85, 10, dec!(1000)));
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("HOME_ATTACK"));
        assert!(errors[2].starts_with("ARB_STAKE"));
    }

    #[test]
    fn unset_and_padded_numbers_parse_cleanly() {
        let mut errors = Vec::new();
        let attack: f64 = parse_or_record("HOME_ATTACK", None, 1.85, &mut errors);
        let stake: Decimal = parse_or_record("ARB_STAKE", Some(" 250.50 ".into()), dec!(1000), &mut errors);
        assert_eq!(attack, 1.85);
        assert_eq!(stake, dec!(250.50));
        assert!(errors.is_empty());
    }

    #[test]
    fn parse_errors_fail_validation() {
        let settings = Settings {
            parse_errors: vec!["MAX_GOALS: cannot parse \"ten\"".to_string()],
            ..Settings::default()
        };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors, vec!["MAX_GOALS: cannot parse \"ten\"".to_string()]);
    }

    #[test]
    fn defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn validate_collects_every_problem() {
        let settings = Settings {
            home_attack: -1.0,
            arb_odds: vec![dec!(0.9)],
            arb_stake: Decimal::ZERO,
            ..Settings::default()
        };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("HOME_ATTACK"));
    }
}
