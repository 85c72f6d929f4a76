#![no_std]

mod error;
mod pair;
mod params;

pub use error::*;
pub use pair::*;
pub use params::*;

/// Liquidity permanently locked on a pair's first deposit
pub const MINIMUM_LIQUIDITY: u128 = 1_000;

/// Lower bound on the stable invariant of a first deposit
pub const MINIMUM_K: u128 = 10_000_000_000;

/// Decimal precision the stable curve normalises every token to (1e18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Denominator for basis-point quantities (fees and split ratios)
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Largest accepted split ratio (100% to the first leg)
pub const MAX_SPLIT_RATIO: u32 = BPS_DENOMINATOR;

/// Default swap fee for stable pairs (0.05%)
pub const STABLE_FEE_BPS: u32 = 5;

/// Default swap fee for volatile pairs (0.3%)
pub const VOLATILE_FEE_BPS: u32 = 30;

/// Upper bound on a configurable pair fee (3%)
pub const MAX_FEE_BPS: u32 = 300;
