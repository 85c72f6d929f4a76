use crate::full_math::{mul_div, u128_from_u256};
use amm_types::{AmmError, CurveType, BPS_DENOMINATOR, PRECISION};
use soroban_sdk::{Env, U256};

/// Maximum Newton iterations when solving the stable curve
const MAX_STABLE_ITERATIONS: u32 = 255;

/// A raw token amount together with the decimals of its token
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenAmount {
    pub amount: u128,
    pub decimals: u32,
}

impl TokenAmount {
    pub fn new(amount: u128, decimals: u32) -> Self {
        TokenAmount { amount, decimals }
    }

    /// Same token, different amount
    pub fn with_amount(&self, amount: u128) -> Self {
        TokenAmount {
            amount,
            decimals: self.decimals,
        }
    }

    /// Amount scaled to PRECISION (1e18) decimals
    fn normalized(&self, env: &Env) -> U256 {
        U256::from_u128(env, self.amount)
            .mul(&precision(env))
            .div(&unit(env, self.decimals))
    }
}

fn precision(env: &Env) -> U256 {
    U256::from_u128(env, PRECISION)
}

fn unit(env: &Env, decimals: u32) -> U256 {
    U256::from_u32(env, 10).pow(decimals)
}

/// Curve invariant of two reserves
///
/// Volatile: x * y
/// Stable:   x * y^3 + x^3 * y  (on 1e18-normalised reserves)
pub fn k(env: &Env, curve: CurveType, x: TokenAmount, y: TokenAmount) -> U256 {
    match curve {
        CurveType::Volatile => U256::from_u128(env, x.amount).mul(&U256::from_u128(env, y.amount)),
        CurveType::Stable => stable_f(env, &x.normalized(env), &y.normalized(env)),
    }
}

/// Fee charged on a swap input, rounded down
pub fn fee_amount(env: &Env, amount_in: u128, fee_bps: u32) -> u128 {
    mul_div(env, amount_in, fee_bps as u128, BPS_DENOMINATOR as u128)
}

/// Output of an exact-input swap against (input, output) reserves
///
/// The fee is taken from the input first. Rounding always favours the pair.
pub fn get_amount_out(
    env: &Env,
    curve: CurveType,
    amount_in: u128,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
    fee_bps: u32,
) -> Result<u128, AmmError> {
    if amount_in == 0 {
        return Err(AmmError::ZeroInput);
    }
    if reserve_in.amount == 0 || reserve_out.amount == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }

    let amount_in = amount_in - fee_amount(env, amount_in, fee_bps);

    match curve {
        CurveType::Volatile => {
            let denominator = reserve_in
                .amount
                .checked_add(amount_in)
                .ok_or(AmmError::InvalidAmount)?;
            Ok(mul_div(env, amount_in, reserve_out.amount, denominator))
        }
        CurveType::Stable => {
            let xy = k(env, curve, reserve_in, reserve_out);
            let x0 = reserve_in.normalized(env).add(&reserve_in.with_amount(amount_in).normalized(env));
            let y_reserve = reserve_out.normalized(env);
            let y = get_y(env, &x0, &xy, &y_reserve)?;
            if y >= y_reserve {
                return Ok(0);
            }
            let out = y_reserve.sub(&y).mul(&unit(env, reserve_out.decimals)).div(&precision(env));
            Ok(u128_from_u256(env, &out))
        }
    }
}

/// f(x0, y) = x0 * y^3 + x0^3 * y
fn stable_f(env: &Env, x0: &U256, y: &U256) -> U256 {
    let p = precision(env);
    let y3 = y.mul(y).div(&p).mul(y).div(&p);
    let x3 = x0.mul(x0).div(&p).mul(x0).div(&p);
    x0.mul(&y3).div(&p).add(&x3.mul(y).div(&p))
}

/// df/dy scaled by PRECISION: 3 * x0 * y^2 + x0^3
fn stable_d(env: &Env, x0: &U256, y: &U256) -> U256 {
    let p = precision(env);
    let y2 = y.mul(y).div(&p);
    let x3 = x0.mul(x0).div(&p).mul(x0).div(&p);
    U256::from_u32(env, 3).mul(x0).mul(&y2).div(&p).add(&x3)
}

/// Solve f(x0, y) = xy for y by Newton iteration, starting at `y`
///
/// Returns the smallest y found with f(x0, y) >= xy so the output side is
/// never over-paid.
fn get_y(env: &Env, x0: &U256, xy: &U256, y: &U256) -> Result<U256, AmmError> {
    let p = precision(env);
    let zero = U256::from_u32(env, 0);
    let one = U256::from_u32(env, 1);
    let mut y = y.clone();

    for _ in 0..MAX_STABLE_ITERATIONS {
        let f = stable_f(env, x0, &y);
        let d = stable_d(env, x0, &y);
        if d == zero {
            return Err(AmmError::DegenerateState);
        }

        if f < *xy {
            let mut dy = xy.sub(&f).mul(&p).div(&d);
            if dy == zero {
                let next = y.add(&one);
                if stable_f(env, x0, &next) > *xy {
                    return Ok(next);
                }
                dy = one.clone();
            }
            y = y.add(&dy);
        } else {
            let mut dy = f.sub(xy).mul(&p).div(&d);
            if dy == zero {
                if f == *xy || y == zero || stable_f(env, x0, &y.sub(&one)) < *xy {
                    return Ok(y);
                }
                dy = one.clone();
            }
            if dy > y {
                return Err(AmmError::DegenerateState);
            }
            y = y.sub(&dy);
        }
    }

    Err(AmmError::DegenerateState)
}
