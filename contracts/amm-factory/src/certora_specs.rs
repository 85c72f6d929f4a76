// ============================================================================
// CERTORA SUNBEAM FORMAL VERIFICATION SPECIFICATIONS
// ============================================================================
//
// Rules over the invariant engine used by every pair.
//
// KEY INVARIANTS:
// 1. Split portions always add back up to the deposit
// 2. Halving never loses a unit
// 3. Later deposits never mint more than their proportional share
// 4. Swaps never pay out a whole reserve
//
// USAGE:
// - Certora build: cargo build --features certora -p amm-factory
// - Verification: certoraSorobanProver amm_factory.conf
//
// ============================================================================

use amm_math::{get_amount_out, halve, liquidity_for_deposit, split_amount, TokenAmount};
use amm_types::{CurveType, MAX_SPLIT_RATIO};
use cvlr::asserts::{cvlr_assert, cvlr_assume, cvlr_satisfy};
use cvlr_soroban_derive::rule;
use soroban_sdk::Env;

/// RULE: Sanity check - a volatile quote is reachable
#[rule]
pub fn sanity_volatile_quote(env: Env, amount_in: u128, reserve_in: u128, reserve_out: u128) {
    cvlr_assume!(amount_in > 0 && reserve_in > 0 && reserve_out > 0);
    cvlr_assume!(reserve_in <= u64::MAX as u128 && reserve_out <= u64::MAX as u128);
    let _ = get_amount_out(
        &env,
        CurveType::Volatile,
        amount_in,
        TokenAmount::new(reserve_in, 7),
        TokenAmount::new(reserve_out, 7),
        30,
    );
    cvlr_satisfy!(true);
}

/// RULE: portion_a + portion_b == amount
#[rule]
pub fn split_conserves_amount(amount: i128, ratio: u32) {
    cvlr_assume!(amount > 0);
    cvlr_assume!(ratio <= MAX_SPLIT_RATIO);
    if let Ok((portion_a, portion_b)) = split_amount(amount, ratio) {
        cvlr_assert!(portion_a >= 0 && portion_b >= 0);
        cvlr_assert!(portion_a + portion_b == amount);
    }
}

/// RULE: both halves add back up and differ by at most one
#[rule]
pub fn halve_conserves_amount(amount: i128) {
    cvlr_assume!(amount >= 0);
    let (low, high) = halve(amount);
    cvlr_assert!(low + high == amount);
    cvlr_assert!(high - low <= 1);
}

/// RULE: a volatile swap output is strictly below the output reserve
#[rule]
pub fn volatile_output_below_reserve(env: Env, amount_in: u128, reserve_in: u128, reserve_out: u128) {
    cvlr_assume!(amount_in > 0 && reserve_in > 0 && reserve_out > 0);
    cvlr_assume!(amount_in <= u64::MAX as u128);
    cvlr_assume!(reserve_in <= u64::MAX as u128 && reserve_out <= u64::MAX as u128);

    if let Ok(out) = get_amount_out(
        &env,
        CurveType::Volatile,
        amount_in,
        TokenAmount::new(reserve_in, 7),
        TokenAmount::new(reserve_out, 7),
        30,
    ) {
        cvlr_assert!(out < reserve_out);
    }
}

/// RULE: a later deposit mints at most amount0 * supply / reserve0
#[rule]
pub fn deposit_liquidity_proportional(
    env: Env,
    reserve0: u128,
    reserve1: u128,
    total_supply: u128,
    amount0: u128,
    amount1: u128,
) {
    cvlr_assume!(reserve0 > 0 && reserve1 > 0 && total_supply > 0);
    cvlr_assume!(reserve0 <= u64::MAX as u128 && reserve1 <= u64::MAX as u128);
    cvlr_assume!(total_supply <= u64::MAX as u128);
    cvlr_assume!(amount0 <= u64::MAX as u128 && amount1 <= u64::MAX as u128);

    if let Ok(liquidity) = liquidity_for_deposit(
        &env,
        CurveType::Volatile,
        TokenAmount::new(reserve0, 7),
        TokenAmount::new(reserve1, 7),
        total_supply,
        amount0,
        amount1,
    ) {
        cvlr_assert!(liquidity * reserve0 <= amount0 * total_supply);
        cvlr_assert!(liquidity * reserve1 <= amount1 * total_supply);
    }
}
