use soroban_sdk::{contracttype, Address};

use crate::MintResult;

/// Parameters for a router liquidity deposit
#[contracttype]
#[derive(Clone, Debug)]
pub struct AddLiquidityParams {
    pub token_a: Address,
    pub token_b: Address,
    pub stable: bool,
    pub amount_a_desired: i128,
    pub amount_b_desired: i128,
    pub amount_a_min: i128,
    pub amount_b_min: i128,
    /// Receiver of the minted liquidity
    pub to: Address,
    pub deadline: u64,
}

/// Single-hop swap route
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Route {
    pub from: Address,
    pub to: Address,
    pub stable: bool,
}

/// Outcome of a liquidity manager deposit, one result per pool
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SplitMintResult {
    /// base/bridge pool
    pub pool_a: MintResult,
    /// quote/bridge pool
    pub pool_b: MintResult,
}
