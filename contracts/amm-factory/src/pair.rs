use crate::invariants::{k_non_decreasing, pair_state_consistent};
use crate::storage::{
    get_balance, get_fee, get_pair_info, get_pair_state, get_token_reserves, set_balance,
    set_pair_state, set_token_reserves,
};
use amm_math::{fee_amount, get_amount_out, k, to_amount, to_magnitude, TokenAmount};
use amm_types::{AmmError, MintResult, PairInfo, PairState, PairStatus, MINIMUM_LIQUIDITY};
use soroban_sdk::{log, token, Address, Env, Symbol};

/// Mint liquidity for whatever has been deposited into the pair since the
/// last settlement
///
/// The deposit on each side is the factory's token balance minus the
/// reserves already accounted to pairs. Returns amounts in token0/token1
/// order.
pub fn mint(env: &Env, pair: u32, to: &Address) -> Result<MintResult, AmmError> {
    let info = get_pair_info(env, pair)?;
    let mut state = get_pair_state(env, pair);

    let amount0 = unsettled_balance(env, &info.token0)?;
    let amount1 = unsettled_balance(env, &info.token1)?;

    let (reserve0, reserve1) = reserve_amounts(&info, &state)?;
    let liquidity = amm_math::liquidity_for_deposit(
        env,
        info.curve(),
        reserve0,
        reserve1,
        to_magnitude(state.total_supply)?,
        to_magnitude(amount0)?,
        to_magnitude(amount1)?,
    )?;
    let liquidity = to_amount(liquidity)?;

    if state.status() == PairStatus::Empty {
        // Locked forever: counted in the supply, credited to nobody
        state.total_supply = MINIMUM_LIQUIDITY as i128;
    }
    state.total_supply = checked_add(state.total_supply, liquidity)?;
    state.reserve0 = checked_add(state.reserve0, amount0)?;
    state.reserve1 = checked_add(state.reserve1, amount1)?;
    state.block_timestamp_last = env.ledger().timestamp();

    if !pair_state_consistent(&state) {
        return Err(AmmError::DegenerateState);
    }

    set_pair_state(env, pair, &state);
    settle(env, &info.token0, amount0)?;
    settle(env, &info.token1, amount1)?;

    let balance = get_balance(env, pair, to);
    set_balance(env, pair, to, checked_add(balance, liquidity)?);

    env.events().publish(
        (Symbol::new(env, "mint"), pair),
        (amount0, amount1, to.clone()),
    );
    log!(env, "pair mint", pair, amount0, amount1, liquidity);

    Ok(MintResult {
        liquidity,
        amount_a: amount0,
        amount_b: amount1,
    })
}

/// Swap whatever has been deposited of `token_in` for the other token of
/// the pair, paying the output to `to`
pub fn swap(env: &Env, pair: u32, token_in: &Address, to: &Address) -> Result<i128, AmmError> {
    let info = get_pair_info(env, pair)?;
    let zero_for_one = info.is_token0(token_in).ok_or(AmmError::InvalidToken)?;
    let mut state = get_pair_state(env, pair);

    let amount_in = unsettled_balance(env, token_in)?;
    if amount_in == 0 {
        return Err(AmmError::ZeroInput);
    }

    let (reserve_in, reserve_out) = oriented_reserves(&info, &state, zero_for_one)?;
    let token_out = if zero_for_one {
        info.token1.clone()
    } else {
        info.token0.clone()
    };

    let curve = info.curve();
    let fee_bps = get_fee(env, info.stable);
    let amount_in_magnitude = to_magnitude(amount_in)?;
    let amount_out = get_amount_out(env, curve, amount_in_magnitude, reserve_in, reserve_out, fee_bps)?;

    if amount_out == 0 {
        return Err(AmmError::InsufficientOutput);
    }
    if amount_out >= reserve_out.amount {
        return Err(AmmError::InsufficientLiquidity);
    }

    // The fee stays in the pair but is excluded from the invariant check
    let fee = fee_amount(env, amount_in_magnitude, fee_bps);
    let k_before = k(env, curve, reserve_in, reserve_out);
    let k_after = k(
        env,
        curve,
        reserve_in.with_amount(reserve_in.amount + amount_in_magnitude - fee),
        reserve_out.with_amount(reserve_out.amount - amount_out),
    );
    if !k_non_decreasing(&k_before, &k_after) {
        return Err(AmmError::DegenerateState);
    }

    let amount_out = to_amount(amount_out)?;
    if zero_for_one {
        state.reserve0 = checked_add(state.reserve0, amount_in)?;
        state.reserve1 -= amount_out;
    } else {
        state.reserve1 = checked_add(state.reserve1, amount_in)?;
        state.reserve0 -= amount_out;
    }
    state.block_timestamp_last = env.ledger().timestamp();

    if !pair_state_consistent(&state) {
        return Err(AmmError::DegenerateState);
    }

    set_pair_state(env, pair, &state);
    settle(env, token_in, amount_in)?;
    settle(env, &token_out, -amount_out)?;

    token::Client::new(env, &token_out).transfer(&env.current_contract_address(), to, &amount_out);

    env.events().publish(
        (Symbol::new(env, "swap"), pair),
        (token_in.clone(), amount_in, amount_out, to.clone()),
    );
    log!(env, "pair swap", pair, amount_in, amount_out);

    Ok(amount_out)
}

/// Quote an exact-input swap against the pair's current reserves
pub fn quote_amount_out(
    env: &Env,
    pair: u32,
    token_in: &Address,
    amount_in: i128,
) -> Result<i128, AmmError> {
    let info = get_pair_info(env, pair)?;
    let zero_for_one = info.is_token0(token_in).ok_or(AmmError::InvalidToken)?;
    let state = get_pair_state(env, pair);

    let (reserve_in, reserve_out) = oriented_reserves(&info, &state, zero_for_one)?;
    let amount_out = get_amount_out(
        env,
        info.curve(),
        to_magnitude(amount_in)?,
        reserve_in,
        reserve_out,
        get_fee(env, info.stable),
    )?;
    to_amount(amount_out)
}

/// Tokens held by the factory but not yet accounted to any pair
fn unsettled_balance(env: &Env, token: &Address) -> Result<i128, AmmError> {
    let balance = token::Client::new(env, token).balance(&env.current_contract_address());
    let unsettled = balance - get_token_reserves(env, token);
    if unsettled < 0 {
        return Err(AmmError::DegenerateState);
    }
    Ok(unsettled)
}

/// Move `delta` of `token` into (or out of) the accounted reserve total
fn settle(env: &Env, token: &Address, delta: i128) -> Result<(), AmmError> {
    let reserves = checked_add(get_token_reserves(env, token), delta)?;
    if reserves < 0 {
        return Err(AmmError::DegenerateState);
    }
    set_token_reserves(env, token, reserves);
    Ok(())
}

fn reserve_amounts(info: &PairInfo, state: &PairState) -> Result<(TokenAmount, TokenAmount), AmmError> {
    Ok((
        TokenAmount::new(to_magnitude(state.reserve0)?, info.decimals0),
        TokenAmount::new(to_magnitude(state.reserve1)?, info.decimals1),
    ))
}

fn oriented_reserves(
    info: &PairInfo,
    state: &PairState,
    zero_for_one: bool,
) -> Result<(TokenAmount, TokenAmount), AmmError> {
    let (reserve0, reserve1) = reserve_amounts(info, state)?;
    if zero_for_one {
        Ok((reserve0, reserve1))
    } else {
        Ok((reserve1, reserve0))
    }
}

fn checked_add(a: i128, b: i128) -> Result<i128, AmmError> {
    a.checked_add(b).ok_or(AmmError::DegenerateState)
}
