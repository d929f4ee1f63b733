//! Equal-payout stake allocation across an odds book.
//!
//! For a total stake S and prices o_1..o_n:
//!     P      = Σ 1/o_i
//!     s_i    = S * (1/o_i) / P
//!     payout = s_i * o_i = S / P          (same for every i)
//!     ROI    = (1/P − 1) * 100
//!
//! The last leg takes S − Σ_{i<n} s_i so the stakes always sum to S.
//!
//! Odds are capped at `MAX_ODDS` and the stake at `MAX_STAKE`, which bounds
//! every payout by S / P <= 1e15 * 1e6 and keeps all arithmetic in range.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::odds::OddsBook;
use crate::error::{LabError, Result};

/// Working precision for individual stakes before the closing leg.
const STAKE_DP: u32 = 12;

/// Largest accepted total stake (one quadrillion).
pub const MAX_STAKE: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// One outcome's share of the total stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLeg {
    pub outcome: String,
    pub bookmaker: String,
    pub odds: Decimal,
    pub implied_probability: Decimal,
    pub stake: Decimal,
    /// Return if this outcome lands: `stake * odds`.
    pub payout: Decimal,
}

/// Result of splitting a stake across a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeAllocation {
    pub total_stake: Decimal,
    pub legs: Vec<StakeLeg>,
    pub implied_prob_sum: Decimal,
    pub roi_percent: Decimal,
    pub is_arbitrage: bool,
    /// Smallest leg payout; what is returned whichever outcome lands.
    pub guaranteed_payout: Decimal,
    /// `guaranteed_payout − total_stake`. Negative when there is no arb.
    pub guaranteed_profit: Decimal,
}

impl StakeAllocation {
    pub fn stakes(&self) -> Vec<Decimal> {
        self.legs.iter().map(|l| l.stake).collect()
    }

    /// Stakes rounded to `dp` places for display, never negative and still
    /// summing exactly to the total.
    ///
    /// Each stake is truncated, then the leftover is handed out one unit at a
    /// time to the legs with the largest truncated remainders (ties go to the
    /// earlier leg). Any sub-unit residue from a total with more than `dp`
    /// places lands on the last leg.
    pub fn rounded_stakes(&self, dp: u32) -> Vec<Decimal> {
        let unit = Decimal::new(1, dp);
        let mut out: Vec<Decimal> = self
            .legs
            .iter()
            .map(|l| l.stake.round_dp_with_strategy(dp, RoundingStrategy::ToZero))
            .collect();

        let mut order: Vec<usize> = (0..out.len()).collect();
        order.sort_by(|&a, &b| {
            let rem_a = self.legs[a].stake - out[a];
            let rem_b = self.legs[b].stake - out[b];
            rem_b.cmp(&rem_a)
        });

        // Each truncation loses less than one unit, so one pass is enough.
        let mut leftover = self.total_stake - out.iter().copied().sum::<Decimal>();
        for &i in &order {
            if leftover < unit {
                break;
            }
            out[i] += unit;
            leftover -= unit;
        }
        if let Some(last) = out.last_mut() {
            *last += leftover;
        }
        out
    }
}

/// Split `total_stake` across bare decimal odds.
pub fn allocate(odds: &[Decimal], total_stake: Decimal) -> Result<StakeAllocation> {
    check_stake(total_stake)?;
    let book = OddsBook::from_odds(odds)?;
    Ok(split(&book, total_stake))
}

/// Split `total_stake` across a labelled book.
pub fn allocate_book(book: &OddsBook, total_stake: Decimal) -> Result<StakeAllocation> {
    check_stake(total_stake)?;
    Ok(split(book, total_stake))
}

fn split(book: &OddsBook, total_stake: Decimal) -> StakeAllocation {
    let implied_prob_sum = book.implied_prob_sum();

    let stakes = close_to_total(
        book.quotes()
            .iter()
            .map(|q| (total_stake * q.implied_probability() / implied_prob_sum).round_dp(STAKE_DP)),
        total_stake,
    );

    let legs: Vec<StakeLeg> = book
        .quotes()
        .iter()
        .zip(stakes)
        .map(|(q, stake)| StakeLeg {
            outcome: q.outcome.clone(),
            bookmaker: q.bookmaker.clone(),
            odds: q.odds,
            implied_probability: q.implied_probability(),
            stake,
            payout: stake * q.odds,
        })
        .collect();

    let roi_percent = (Decimal::ONE / implied_prob_sum - Decimal::ONE) * Decimal::ONE_HUNDRED;
    let is_arbitrage = implied_prob_sum < Decimal::ONE;
    let guaranteed_payout = legs
        .iter()
        .map(|l| l.payout)
        .min()
        .unwrap_or(Decimal::ZERO);

    debug!(
        outcomes = legs.len(),
        implied_prob_sum = %implied_prob_sum,
        roi_percent = %roi_percent,
        is_arbitrage,
        "Stake allocation"
    );

    StakeAllocation {
        total_stake,
        legs,
        implied_prob_sum,
        roi_percent,
        is_arbitrage,
        guaranteed_payout,
        guaranteed_profit: guaranteed_payout - total_stake,
    }
}

/// Keep every stake but the last, then give the last whatever closes the gap to `total`.
fn close_to_total(stakes: impl Iterator<Item = Decimal>, total: Decimal) -> Vec<Decimal> {
    let mut out: Vec<Decimal> = stakes.collect();
    if let Some((last, rest)) = out.split_last_mut() {
        let placed: Decimal = rest.iter().copied().sum();
        *last = total - placed;
    }
    out
}

fn check_stake(total_stake: Decimal) -> Result<()> {
    if total_stake <= Decimal::ZERO {
        return Err(LabError::invalid(
            "total_stake",
            format!("must be positive, got {total_stake}"),
        ));
    }
    if total_stake > MAX_STAKE {
        return Err(LabError::invalid(
            "total_stake",
            format!("must be at most {MAX_STAKE}, got {total_stake}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn even_two_way_arb() {
        // 1/2.10 + 1/2.10 = 0.952381 -> arb
        // stakes = 50 / 50, payout = 105, profit = 5, ROI = 5%
        let a = allocate(&[dec!(2.10), dec!(2.10)], dec!(100)).unwrap();
        assert!(a.is_arbitrage);
        assert_eq!(a.stakes(), vec![dec!(50), dec!(50)]);
        assert_eq!(a.guaranteed_payout, dec!(105));
        assert_eq!(a.guaranteed_profit, dec!(5));
        assert_eq!(a.roi_percent.round_dp(6), dec!(5));
    }

    #[test]
    fn closing_leg_makes_stakes_sum_exactly() {
        let a = allocate(&[dec!(3.0), dec!(3.0), dec!(3.0)], dec!(100)).unwrap();
        let sum: Decimal = a.stakes().into_iter().sum();
        assert_eq!(sum, dec!(100));
    }

    #[test]
    fn rounded_stakes_still_sum_to_total() {
        // 100 / 3 truncates to 33.33 each; the spare cent goes to the last leg,
        // whose closing stake 33.333333333334 has the largest remainder
        let a = allocate(&[dec!(3.0), dec!(3.0), dec!(3.0)], dec!(100)).unwrap();
        let rounded = a.rounded_stakes(2);
        assert_eq!(rounded, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
    }

    #[test]
    fn rounded_stakes_never_go_negative() {
        // 0.03 over five legs is 0.006 each: truncate to 0.00, then hand the
        // three spare cents to the first three legs (equal remainders).
        let a = allocate(&[dec!(5.0); 5], dec!(0.03)).unwrap();
        let rounded = a.rounded_stakes(2);
        assert_eq!(
            rounded,
            vec![dec!(0.01), dec!(0.01), dec!(0.01), dec!(0), dec!(0)]
        );
        assert!(rounded.iter().all(|s| *s >= Decimal::ZERO));
    }

    #[test]
    fn stake_above_cap_is_rejected() {
        assert!(allocate(&[dec!(2.10), dec!(2.10)], MAX_STAKE).is_ok());
        let err = allocate(&[dec!(2.10), dec!(2.10)], Decimal::MAX).unwrap_err();
        assert_eq!(err.field(), "total_stake");
    }

    #[test]
    fn rejects_non_positive_stake() {
        let err = allocate(&[dec!(2.0), dec!(2.0)], Decimal::ZERO).unwrap_err();
        assert_eq!(err.field(), "total_stake");
        assert!(allocate(&[dec!(2.0), dec!(2.0)], dec!(-5)).is_err());
    }

    #[test]
    fn allocate_book_keeps_labels() {
        use crate::arbitrage::odds::OddsQuote;

        let book = OddsBook::new(vec![
            OddsQuote::new("Over 2.5", "Betfair", dec!(1.95)).unwrap(),
            OddsQuote::new("Under 2.5", "DraftKings", dec!(2.15)).unwrap(),
        ])
        .unwrap();
        let a = allocate_book(&book, dec!(1000)).unwrap();
        assert_eq!(a.legs[0].outcome, "Over 2.5");
        assert_eq!(a.legs[1].bookmaker, "DraftKings");
        // 1/1.95 + 1/2.15 = 0.977937 -> ROI ~= 2.2561%
        assert!(a.is_arbitrage);
        assert_eq!(a.roi_percent.round_dp(4), dec!(2.2561));
    }
}
