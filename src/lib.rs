//! Library entrypoint for odds-lab.
//!
//! Two independent, pure components:
//! - [`model`]: match-outcome probabilities from team attack/defense strengths
//! - [`arbitrage`]: equal-payout stake allocation across a book of decimal odds

pub mod arbitrage;
pub mod config;
pub mod error;
pub mod model;

pub use error::{LabError, Result};
