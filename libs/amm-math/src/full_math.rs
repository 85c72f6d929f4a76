use amm_types::AmmError;
use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));

    u128_from_u256(env, &result)
}

/// Integer square root of a * b, rounded down
pub fn sqrt_product(env: &Env, a: u128, b: u128) -> u128 {
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    if let Some(value) = product.to_u128() {
        return isqrt(value);
    }

    // sqrt of a 256-bit value always fits in u128, so Newton's method
    // can start from u128::MAX and descend monotonically.
    let two = U256::from_u32(env, 2);
    let mut x = U256::from_u128(env, u128::MAX);
    loop {
        let y = x.add(&product.div(&x)).div(&two);
        if y >= x {
            break;
        }
        x = y;
    }
    u128_from_u256(env, &x)
}

/// Integer square root, rounded down
pub fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }
    let mut x = value;
    // ceil(value / 2) without overflowing
    let mut y = value / 2 + value % 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

/// Convert U256 to u128, panics if overflow
pub fn u128_from_u256(env: &Env, value: &U256) -> u128 {
    let max_u128 = U256::from_u128(env, u128::MAX);
    if value.gt(&max_u128) {
        panic!("U256 overflow when converting to u128");
    }
    value.to_u128().unwrap()
}

/// Token amount to engine magnitude; negative amounts are rejected
pub fn to_magnitude(amount: i128) -> Result<u128, AmmError> {
    if amount < 0 {
        return Err(AmmError::InvalidAmount);
    }
    Ok(amount as u128)
}

/// Engine magnitude back to a token amount
pub fn to_amount(magnitude: u128) -> Result<i128, AmmError> {
    i128::try_from(magnitude).map_err(|_| AmmError::DegenerateState)
}
