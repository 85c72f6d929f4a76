use amm_types::{AmmError, BPS_DENOMINATOR, MAX_SPLIT_RATIO};
use soroban_fixed_point_math::FixedPoint;

/// Divide `amount` between two legs by a parts-per-ten-thousand ratio
///
/// portion_a = floor(amount * split_ratio / 10000)
/// portion_b = amount - portion_a
///
/// The second leg is derived by subtraction so the two portions always add
/// back up to `amount` exactly.
pub fn split_amount(amount: i128, split_ratio: u32) -> Result<(i128, i128), AmmError> {
    if amount == 0 {
        return Err(AmmError::ZeroInput);
    }
    if amount < 0 {
        return Err(AmmError::InvalidAmount);
    }
    if split_ratio > MAX_SPLIT_RATIO {
        return Err(AmmError::InvalidRatio);
    }

    let portion_a = amount
        .fixed_mul_floor(split_ratio as i128, BPS_DENOMINATOR as i128)
        .ok_or(AmmError::InvalidAmount)?;
    Ok((portion_a, amount - portion_a))
}

/// Halve an amount: (floor(amount / 2), remainder)
pub fn halve(amount: i128) -> (i128, i128) {
    let half = amount / 2;
    (half, amount - half)
}
