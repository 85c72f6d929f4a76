use crate::curve_math::{k, TokenAmount};
use crate::full_math::{mul_div, sqrt_product};
use amm_types::{AmmError, CurveType, MINIMUM_K, MINIMUM_LIQUIDITY};
use soroban_sdk::{Env, U256};

/// Amount of token B worth `amount_a` of token A at the current reserve ratio
/// amount_b = amount_a * reserve_b / reserve_a
pub fn quote(env: &Env, amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128, AmmError> {
    if amount_a == 0 {
        return Err(AmmError::ZeroInput);
    }
    if reserve_a == 0 || reserve_b == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(mul_div(env, amount_a, reserve_b, reserve_a))
}

/// Amounts to actually deposit so the deposit keeps the pair's price ratio
///
/// An empty pair takes the desired amounts as-is. Otherwise the side whose
/// counterpart fits inside its desired amount is used in full and the
/// counterpart is derived from the reserves. Either side landing below its
/// minimum fails the whole deposit.
pub fn optimal_amounts(
    env: &Env,
    reserve_a: u128,
    reserve_b: u128,
    amount_a_desired: u128,
    amount_b_desired: u128,
    amount_a_min: u128,
    amount_b_min: u128,
) -> Result<(u128, u128), AmmError> {
    let (amount_a, amount_b) = if reserve_a == 0 && reserve_b == 0 {
        (amount_a_desired, amount_b_desired)
    } else {
        let amount_b_optimal = quote(env, amount_a_desired, reserve_a, reserve_b)?;
        if amount_b_optimal <= amount_b_desired {
            (amount_a_desired, amount_b_optimal)
        } else {
            let amount_a_optimal = quote(env, amount_b_desired, reserve_b, reserve_a)?;
            if amount_a_optimal > amount_a_desired {
                return Err(AmmError::DegenerateState);
            }
            (amount_a_optimal, amount_b_desired)
        }
    };

    if amount_a < amount_a_min || amount_b < amount_b_min {
        return Err(AmmError::InsufficientOutput);
    }

    Ok((amount_a, amount_b))
}

/// Liquidity shares to mint for a deposit of (amount0, amount1)
///
/// First deposit: sqrt(amount0 * amount1) - MINIMUM_LIQUIDITY; the caller is
/// expected to add MINIMUM_LIQUIDITY to the supply without crediting anyone.
/// Stable pairs must also clear MINIMUM_K.
///
/// Later deposits: min(amount0 * supply / reserve0, amount1 * supply / reserve1)
pub fn liquidity_for_deposit(
    env: &Env,
    curve: CurveType,
    reserve0: TokenAmount,
    reserve1: TokenAmount,
    total_supply: u128,
    amount0: u128,
    amount1: u128,
) -> Result<u128, AmmError> {
    if amount0 == 0 && amount1 == 0 {
        return Err(AmmError::ZeroInput);
    }

    if total_supply == 0 {
        if reserve0.amount != 0 || reserve1.amount != 0 {
            return Err(AmmError::DegenerateState);
        }
        if amount0 == 0 || amount1 == 0 {
            return Err(AmmError::ZeroInput);
        }

        if curve.is_stable() {
            let deposit_k = k(
                env,
                curve,
                reserve0.with_amount(amount0),
                reserve1.with_amount(amount1),
            );
            if deposit_k <= U256::from_u128(env, MINIMUM_K) {
                return Err(AmmError::InsufficientLiquidity);
            }
        }

        let root = sqrt_product(env, amount0, amount1);
        if root <= MINIMUM_LIQUIDITY {
            return Err(AmmError::InsufficientLiquidity);
        }
        return Ok(root - MINIMUM_LIQUIDITY);
    }

    if reserve0.amount == 0 || reserve1.amount == 0 {
        return Err(AmmError::DegenerateState);
    }

    let liquidity0 = mul_div(env, amount0, total_supply, reserve0.amount);
    let liquidity1 = mul_div(env, amount1, total_supply, reserve1.amount);
    let liquidity = liquidity0.min(liquidity1);

    if liquidity == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(liquidity)
}
