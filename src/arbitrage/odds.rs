//! Decimal odds quotes and the book they form for one event.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Largest accepted price. Keeps `1/o` and `stake * o` well inside Decimal range.
pub const MAX_ODDS: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// A bookmaker's decimal price on one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub outcome: String,
    pub bookmaker: String,
    pub odds: Decimal,
}

impl OddsQuote {
    pub fn new(outcome: impl Into<String>, bookmaker: impl Into<String>, odds: Decimal) -> Result<Self> {
        check_odds("odds", odds)?;
        Ok(Self {
            outcome: outcome.into(),
            bookmaker: bookmaker.into(),
            odds,
        })
    }

    /// Break-even probability implied by the price: `1 / odds`.
    pub fn implied_probability(&self) -> Decimal {
        Decimal::ONE / self.odds
    }
}

/// Quotes on mutually exclusive outcomes of a single event.
///
/// Deserialization goes through [`OddsBook::new`], so a book always holds
/// validated prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OddsQuote>", into = "Vec<OddsQuote>")]
pub struct OddsBook {
    quotes: Vec<OddsQuote>,
}

impl OddsBook {
    pub const MIN_OUTCOMES: usize = 2;

    pub fn new(quotes: Vec<OddsQuote>) -> Result<Self> {
        if quotes.len() < Self::MIN_OUTCOMES {
            return Err(LabError::invalid(
                "odds",
                format!(
                    "at least {} outcomes required, got {}",
                    Self::MIN_OUTCOMES,
                    quotes.len()
                ),
            ));
        }
        for (i, quote) in quotes.iter().enumerate() {
            check_odds(&format!("odds[{i}]"), quote.odds)?;
        }
        Ok(Self { quotes })
    }

    /// Build an unlabelled book from bare prices.
    pub fn from_odds(odds: &[Decimal]) -> Result<Self> {
        let quotes = odds
            .iter()
            .enumerate()
            .map(|(i, &odds)| OddsQuote {
                outcome: format!("outcome {}", i + 1),
                bookmaker: String::new(),
                odds,
            })
            .collect();
        Self::new(quotes)
    }

    pub fn quotes(&self) -> &[OddsQuote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// `Σ 1/o_i` across the book.
    pub fn implied_prob_sum(&self) -> Decimal {
        self.quotes.iter().map(OddsQuote::implied_probability).sum()
    }

    /// Bookmaker overround: `Σ 1/o_i − 1`. Negative when the book is an arb.
    pub fn margin(&self) -> Decimal {
        self.implied_prob_sum() - Decimal::ONE
    }

    pub fn is_arbitrage(&self) -> bool {
        self.implied_prob_sum() < Decimal::ONE
    }
}

impl TryFrom<Vec<OddsQuote>> for OddsBook {
    type Error = LabError;

    fn try_from(quotes: Vec<OddsQuote>) -> Result<Self> {
        Self::new(quotes)
    }
}

impl From<OddsBook> for Vec<OddsQuote> {
    fn from(book: OddsBook) -> Self {
        book.quotes
    }
}

fn check_odds(field: &str, odds: Decimal) -> Result<()> {
    if odds <= Decimal::ONE {
        return Err(LabError::invalid(
            field,
            format!("must be greater than 1.0, got {odds}"),
        ));
    }
    if odds > MAX_ODDS {
        return Err(LabError::invalid(
            field,
            format!("must be at most {MAX_ODDS}, got {odds}"),
        ));
    }
    Ok(())
}
