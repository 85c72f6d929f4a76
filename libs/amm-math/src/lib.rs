#![no_std]

mod curve_math;
mod full_math;
mod liquidity_math;
mod split_math;

pub use curve_math::*;
pub use full_math::*;
pub use liquidity_math::*;
pub use split_math::*;
