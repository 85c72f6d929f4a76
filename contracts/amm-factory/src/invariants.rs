// ============================================================================
// PAIR INVARIANTS
// ============================================================================
//
// Properties every pair must satisfy after each mint or swap. The pair
// module re-checks them before persisting state and fails with
// DegenerateState if any is violated.
//
// 1. RESERVE INVARIANTS
//    - Reserves never go negative
//
// 2. SUPPLY INVARIANTS
//    - Supply is zero exactly when both reserves are zero
//    - A seeded pair always keeps the locked minimum liquidity
//
// 3. CURVE INVARIANTS
//    - A swap never decreases the curve invariant k
//
// ============================================================================

use amm_types::{PairState, MINIMUM_LIQUIDITY};
use soroban_sdk::U256;

/// Invariant: reserves are non-negative
///
/// Property:
///   reserve0 >= 0 && reserve1 >= 0
pub fn reserves_non_negative(state: &PairState) -> bool {
    state.reserve0 >= 0 && state.reserve1 >= 0
}

/// Invariant: liquidity supply exists exactly when reserves exist
///
/// Property:
///   total_supply == 0  <=>  reserve0 == 0 && reserve1 == 0
pub fn supply_backed_by_reserves(state: &PairState) -> bool {
    let empty_reserves = state.reserve0 == 0 && state.reserve1 == 0;
    (state.total_supply == 0) == empty_reserves
}

/// Invariant: the first-deposit lock is never released
///
/// Property:
///   total_supply == 0 || total_supply >= MINIMUM_LIQUIDITY
pub fn minimum_liquidity_locked(state: &PairState) -> bool {
    state.total_supply == 0 || state.total_supply >= MINIMUM_LIQUIDITY as i128
}

/// All state invariants at once
pub fn pair_state_consistent(state: &PairState) -> bool {
    reserves_non_negative(state)
        && supply_backed_by_reserves(state)
        && minimum_liquidity_locked(state)
}

/// Invariant: k does not decrease across a swap
///
/// Property:
///   k_after >= k_before
pub fn k_non_decreasing(k_before: &U256, k_after: &U256) -> bool {
    k_after >= k_before
}
