//! Arbitrage detection and equal-payout stake allocation.

pub mod allocator;
pub mod odds;

pub use allocator::{allocate, allocate_book, StakeAllocation, StakeLeg};
pub use odds::{OddsBook, OddsQuote};
