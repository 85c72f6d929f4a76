use soroban_sdk::{contracttype, Address};

/// Curve a pair prices its reserves with
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurveType {
    /// x * y = k
    Volatile,
    /// x^3 * y + x * y^3 = k, on decimal-normalised reserves
    Stable,
}

impl CurveType {
    pub fn from_stable(stable: bool) -> Self {
        if stable {
            CurveType::Stable
        } else {
            CurveType::Volatile
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, CurveType::Stable)
    }
}

/// Lifecycle of a pair. Seeded is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairStatus {
    Empty,
    Seeded,
}

/// Immutable pair identity - stored in Persistent storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairInfo {
    /// Lower-ordered token address
    pub token0: Address,
    /// Higher-ordered token address
    pub token1: Address,
    pub stable: bool,
    pub decimals0: u32,
    pub decimals1: u32,
}

impl PairInfo {
    pub fn curve(&self) -> CurveType {
        CurveType::from_stable(self.stable)
    }

    /// Whether `token` is token0 of this pair. None if it is not in the pair.
    pub fn is_token0(&self, token: &Address) -> Option<bool> {
        if *token == self.token0 {
            Some(true)
        } else if *token == self.token1 {
            Some(false)
        } else {
            None
        }
    }
}

/// Mutable pair accounting - stored in Persistent storage
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PairState {
    pub reserve0: i128,
    pub reserve1: i128,
    /// Liquidity shares outstanding, including the locked minimum
    pub total_supply: i128,
    /// Ledger timestamp of the last reserve update
    pub block_timestamp_last: u64,
}

impl PairState {
    pub fn status(&self) -> PairStatus {
        if self.total_supply > 0 {
            PairStatus::Seeded
        } else {
            PairStatus::Empty
        }
    }

    /// Reserves ordered as (reserve of `token`, reserve of the other token)
    pub fn oriented(&self, token_is_0: bool) -> (i128, i128) {
        if token_is_0 {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }
}

/// Outcome of a liquidity deposit
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MintResult {
    pub liquidity: i128,
    pub amount_a: i128,
    pub amount_b: i128,
}

impl MintResult {
    /// Swap the (a, b) orientation
    pub fn flipped(self) -> Self {
        MintResult {
            liquidity: self.liquidity,
            amount_a: self.amount_b,
            amount_b: self.amount_a,
        }
    }
}
