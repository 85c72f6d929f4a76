#![no_std]

use amm_math::{optimal_amounts, to_amount, to_magnitude, TokenAmount};
use amm_types::{AddLiquidityParams, AmmError, MintResult, PairInfo, PairState, Route};
use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Env, IntoVal, Symbol};

#[contract]
pub struct AmmRouter;

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Factory,
}

#[contractimpl]
impl AmmRouter {
    /// Initialize router with factory address
    pub fn initialize(env: Env, factory: Address) {
        if env.storage().instance().has(&DataKey::Factory) {
            panic!("Already initialized");
        }
        env.storage().instance().set(&DataKey::Factory, &factory);
    }

    /// Deposit into the (token_a, token_b, stable) pair, creating it on first
    /// use
    ///
    /// Only the amounts that keep the pair's ratio are taken from `sender`.
    /// The result is oriented as (token_a, token_b).
    pub fn add_liquidity(
        env: Env,
        sender: Address,
        params: AddLiquidityParams,
    ) -> Result<MintResult, AmmError> {
        sender.require_auth();
        check_deadline(&env, params.deadline)?;

        let factory = get_factory(&env);
        let pair = match find_pair(&env, &factory, &params.token_a, &params.token_b, params.stable) {
            Some(pair) => pair,
            None => create_pair(&env, &factory, &params.token_a, &params.token_b, params.stable),
        };

        let info = get_pair_info(&env, &factory, pair);
        let state = get_pair_state(&env, &factory, pair);
        let a_is_0 = info.is_token0(&params.token_a).ok_or(AmmError::InvalidToken)?;
        let (reserve_a, reserve_b) = state.oriented(a_is_0);

        let (amount_a, amount_b) = optimal_amounts(
            &env,
            to_magnitude(reserve_a)?,
            to_magnitude(reserve_b)?,
            to_magnitude(params.amount_a_desired)?,
            to_magnitude(params.amount_b_desired)?,
            to_magnitude(params.amount_a_min)?,
            to_magnitude(params.amount_b_min)?,
        )?;
        let amount_a = to_amount(amount_a)?;
        let amount_b = to_amount(amount_b)?;

        token::Client::new(&env, &params.token_a).transfer(&sender, &factory, &amount_a);
        token::Client::new(&env, &params.token_b).transfer(&sender, &factory, &amount_b);

        let result: MintResult = env.invoke_contract(
            &factory,
            &Symbol::new(&env, "mint"),
            (pair, params.to).into_val(&env),
        );

        log!(&env, "router add_liquidity", pair, amount_a, amount_b);

        if a_is_0 {
            Ok(result)
        } else {
            Ok(result.flipped())
        }
    }

    /// Amounts `add_liquidity` would take for the desired amounts, and the
    /// liquidity it would mint: (amount_a, amount_b, liquidity)
    pub fn quote_add_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        stable: bool,
        amount_a_desired: i128,
        amount_b_desired: i128,
    ) -> Result<(i128, i128, i128), AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAssets);
        }

        let factory = get_factory(&env);
        let (a_is_0, decimals_a, decimals_b, state) =
            match find_pair(&env, &factory, &token_a, &token_b, stable) {
                Some(pair) => {
                    let info = get_pair_info(&env, &factory, pair);
                    let a_is_0 = info.is_token0(&token_a).ok_or(AmmError::InvalidToken)?;
                    let (decimals_a, decimals_b) = if a_is_0 {
                        (info.decimals0, info.decimals1)
                    } else {
                        (info.decimals1, info.decimals0)
                    };
                    (a_is_0, decimals_a, decimals_b, get_pair_state(&env, &factory, pair))
                }
                None => (
                    token_a < token_b,
                    token::Client::new(&env, &token_a).decimals(),
                    token::Client::new(&env, &token_b).decimals(),
                    PairState::default(),
                ),
            };

        let (reserve_a, reserve_b) = state.oriented(a_is_0);
        let (amount_a, amount_b) = optimal_amounts(
            &env,
            to_magnitude(reserve_a)?,
            to_magnitude(reserve_b)?,
            to_magnitude(amount_a_desired)?,
            to_magnitude(amount_b_desired)?,
            0,
            0,
        )?;

        // liquidity_for_deposit works in pair order
        let reserve_a = TokenAmount::new(to_magnitude(reserve_a)?, decimals_a);
        let reserve_b = TokenAmount::new(to_magnitude(reserve_b)?, decimals_b);
        let (reserve0, reserve1, amount0, amount1) = if a_is_0 {
            (reserve_a, reserve_b, amount_a, amount_b)
        } else {
            (reserve_b, reserve_a, amount_b, amount_a)
        };
        let liquidity = amm_math::liquidity_for_deposit(
            &env,
            amm_types::CurveType::from_stable(stable),
            reserve0,
            reserve1,
            to_magnitude(state.total_supply)?,
            amount0,
            amount1,
        )?;

        Ok((to_amount(amount_a)?, to_amount(amount_b)?, to_amount(liquidity)?))
    }

    /// Single-hop exact-input swap along `route`
    pub fn swap_exact_tokens_for_tokens(
        env: Env,
        sender: Address,
        amount_in: i128,
        amount_out_min: i128,
        route: Route,
        to: Address,
        deadline: u64,
    ) -> Result<i128, AmmError> {
        sender.require_auth();
        check_deadline(&env, deadline)?;

        let factory = get_factory(&env);
        let pair = find_pair(&env, &factory, &route.from, &route.to, route.stable)
            .ok_or(AmmError::PairNotFound)?;

        let quoted = quote_amount_out(&env, &factory, pair, &route.from, amount_in)?;
        if quoted < amount_out_min {
            return Err(AmmError::InsufficientOutput);
        }

        token::Client::new(&env, &route.from).transfer(&sender, &factory, &amount_in);

        let amount_out: i128 = env.invoke_contract(
            &factory,
            &Symbol::new(&env, "swap"),
            (pair, route.from, to).into_val(&env),
        );

        log!(&env, "router swap", pair, amount_in, amount_out);

        Ok(amount_out)
    }

    /// Quote a single-hop exact-input swap
    pub fn get_amount_out(env: Env, amount_in: i128, route: Route) -> Result<i128, AmmError> {
        let factory = get_factory(&env);
        let pair = find_pair(&env, &factory, &route.from, &route.to, route.stable)
            .ok_or(AmmError::PairNotFound)?;
        quote_amount_out(&env, &factory, pair, &route.from, amount_in)
    }

    /// Get factory address
    pub fn get_factory(env: Env) -> Address {
        get_factory(&env)
    }
}

fn get_factory(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .expect("Not initialized")
}

fn check_deadline(env: &Env, deadline: u64) -> Result<(), AmmError> {
    let current_time = env.ledger().timestamp();
    if current_time > deadline {
        return Err(AmmError::Expired);
    }
    Ok(())
}

fn find_pair(env: &Env, factory: &Address, token_a: &Address, token_b: &Address, stable: bool) -> Option<u32> {
    env.invoke_contract(
        factory,
        &Symbol::new(env, "get_pair"),
        (token_a, token_b, stable).into_val(env),
    )
}

fn create_pair(env: &Env, factory: &Address, token_a: &Address, token_b: &Address, stable: bool) -> u32 {
    env.invoke_contract(
        factory,
        &Symbol::new(env, "create_pair"),
        (token_a, token_b, stable).into_val(env),
    )
}

fn get_pair_info(env: &Env, factory: &Address, pair: u32) -> PairInfo {
    env.invoke_contract(
        factory,
        &Symbol::new(env, "get_pair_info"),
        (pair,).into_val(env),
    )
}

fn get_pair_state(env: &Env, factory: &Address, pair: u32) -> PairState {
    env.invoke_contract(
        factory,
        &Symbol::new(env, "get_state"),
        (pair,).into_val(env),
    )
}

fn quote_amount_out(
    env: &Env,
    factory: &Address,
    pair: u32,
    token_in: &Address,
    amount_in: i128,
) -> Result<i128, AmmError> {
    if amount_in < 0 {
        return Err(AmmError::InvalidAmount);
    }
    if amount_in == 0 {
        return Err(AmmError::ZeroInput);
    }
    Ok(env.invoke_contract(
        factory,
        &Symbol::new(env, "get_amount_out"),
        (pair, token_in, amount_in).into_val(env),
    ))
}
