#![no_std]

use amm_math::{halve, split_amount};
use amm_types::{
    AddLiquidityParams, AmmError, MintResult, Route, SplitMintResult, MAX_SPLIT_RATIO,
};
use soroban_sdk::auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, token, vec, Address, Env, IntoVal, Symbol, Vec,
};

/// Seconds added to the current ledger time for every router call
pub const DEADLINE_EXTENSION: u64 = 600;

#[contract]
pub struct LiquidityManager;

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
}

/// Manager configuration - stored in Instance storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// May change the split ratio and sweep balances
    pub operator: Address,
    /// Asset users deposit
    pub base_asset: Address,
    /// Asset shared by both pools
    pub bridge_asset: Address,
    pub quote_asset: Address,
    /// Share of each deposit sent to the base/bridge pool, in parts per 10_000
    pub split_ratio: u32,
    pub router: Address,
    /// Curve of all three pools
    pub stable: bool,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl LiquidityManager {
    /// Initialize with the three assets, the split ratio and the router
    pub fn initialize(
        env: Env,
        operator: Address,
        base_asset: Address,
        bridge_asset: Address,
        quote_asset: Address,
        split_ratio: u32,
        router: Address,
        stable: bool,
    ) -> Result<(), AmmError> {
        if env.storage().instance().has(&DataKey::Config) {
            panic!("Already initialized");
        }

        operator.require_auth();

        if base_asset == bridge_asset || base_asset == quote_asset || bridge_asset == quote_asset {
            return Err(AmmError::IdenticalAssets);
        }
        if split_ratio > MAX_SPLIT_RATIO {
            return Err(AmmError::InvalidRatio);
        }

        set_config(
            &env,
            &Config {
                operator,
                base_asset,
                bridge_asset,
                quote_asset,
                split_ratio,
                router,
                stable,
            },
        );

        Ok(())
    }

    /// Deposit `amount` of the base asset and spread it over the base/bridge
    /// and quote/bridge pools by the split ratio. Liquidity goes to `sender`.
    pub fn add_liquidity(env: Env, sender: Address, amount: i128) -> Result<SplitMintResult, AmmError> {
        sender.require_auth();

        let config = get_config(&env);
        let (portion_a, portion_b) = split_amount(amount, config.split_ratio)?;
        let (deposit, convert) = halve(portion_a);
        let (to_quote, to_bridge) = halve(portion_b);

        // A leg that runs needs a non-zero amount on both of its halves
        if (portion_a > 0 && deposit == 0) || (portion_b > 0 && to_quote == 0) {
            return Err(AmmError::ZeroInput);
        }

        let manager = env.current_contract_address();
        token::Client::new(&env, &config.base_asset).transfer(&sender, &manager, &amount);

        let deadline = env.ledger().timestamp() + DEADLINE_EXTENSION;
        let factory: Address = env.invoke_contract(
            &config.router,
            &Symbol::new(&env, "get_factory"),
            Vec::new(&env),
        );
        let leg = Leg {
            env: &env,
            config: &config,
            factory: &factory,
            to: &sender,
            deadline,
        };

        let mut result = SplitMintResult::default();

        // base/bridge: deposit half, convert the other half to bridge
        if portion_a > 0 {
            let bridge_out = leg.swap(&config.base_asset, &config.bridge_asset, convert)?;
            result.pool_a = leg.add_liquidity(&config.base_asset, &config.bridge_asset, deposit, bridge_out)?;
        }

        // quote/bridge: convert everything, half to quote and half to bridge
        if portion_b > 0 {
            let quote_out = leg.swap(&config.base_asset, &config.quote_asset, to_quote)?;
            let bridge_out = leg.swap(&config.base_asset, &config.bridge_asset, to_bridge)?;
            result.pool_b = leg.add_liquidity(&config.quote_asset, &config.bridge_asset, quote_out, bridge_out)?;
        }

        env.events().publish(
            (Symbol::new(&env, "liquidity_split"),),
            (sender, amount, portion_a, portion_b),
        );
        log!(&env, "liquidity split", amount, portion_a, portion_b);

        Ok(result)
    }

    /// Change the base/bridge share of future deposits (operator only)
    pub fn change_split_ratio(env: Env, caller: Address, new_ratio: u32) -> Result<(), AmmError> {
        let mut config = require_operator(&env, &caller)?;

        if new_ratio > MAX_SPLIT_RATIO {
            return Err(AmmError::InvalidRatio);
        }

        let old_ratio = config.split_ratio;
        config.split_ratio = new_ratio;
        set_config(&env, &config);

        env.events().publish(
            (Symbol::new(&env, "split_ratio_changed"),),
            (old_ratio, new_ratio),
        );

        Ok(())
    }

    /// Send the manager's whole balance of `token` to the operator (operator only)
    pub fn sweep(env: Env, caller: Address, token: Address) -> Result<i128, AmmError> {
        let config = require_operator(&env, &caller)?;

        let client = token::Client::new(&env, &token);
        let amount = client.balance(&env.current_contract_address());
        if amount > 0 {
            client.transfer(&env.current_contract_address(), &config.operator, &amount);
        }

        env.events()
            .publish((Symbol::new(&env, "sweep"),), (token, amount));

        Ok(amount)
    }

    // === Views ===

    pub fn operator(env: Env) -> Address {
        get_config(&env).operator
    }

    pub fn base_asset(env: Env) -> Address {
        get_config(&env).base_asset
    }

    pub fn bridge_asset(env: Env) -> Address {
        get_config(&env).bridge_asset
    }

    pub fn quote_asset(env: Env) -> Address {
        get_config(&env).quote_asset
    }

    pub fn split_ratio(env: Env) -> u32 {
        get_config(&env).split_ratio
    }

    pub fn router(env: Env) -> Address {
        get_config(&env).router
    }

    pub fn stable(env: Env) -> bool {
        get_config(&env).stable
    }

    pub fn get_config(env: Env) -> Config {
        get_config(&env)
    }
}

fn get_config(env: &Env) -> Config {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("Not initialized")
}

fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn require_operator(env: &Env, caller: &Address) -> Result<Config, AmmError> {
    caller.require_auth();
    let config = get_config(env);
    if *caller != config.operator {
        return Err(AmmError::Unauthorized);
    }
    Ok(config)
}

/// Router calls made on the manager's behalf during one deposit
struct Leg<'a> {
    env: &'a Env,
    config: &'a Config,
    factory: &'a Address,
    to: &'a Address,
    deadline: u64,
}

impl Leg<'_> {
    /// Swap `amount_in` held by the manager through the router
    fn swap(&self, from: &Address, to: &Address, amount_in: i128) -> Result<i128, AmmError> {
        if amount_in == 0 {
            return Err(AmmError::ZeroInput);
        }

        let env = self.env;
        let manager = env.current_contract_address();
        env.authorize_as_current_contract(vec![env, self.transfer_entry(from, amount_in)]);

        let route = Route {
            from: from.clone(),
            to: to.clone(),
            stable: self.config.stable,
        };
        Ok(env.invoke_contract(
            &self.config.router,
            &Symbol::new(env, "swap_exact_tokens_for_tokens"),
            (manager.clone(), amount_in, 0i128, route, manager, self.deadline).into_val(env),
        ))
    }

    /// Add manager-held tokens to the (token_a, token_b) pool for `to`
    ///
    /// The router takes only the ratio-preserving amounts, so those are
    /// quoted first and exactly those transfers are authorized.
    fn add_liquidity(
        &self,
        token_a: &Address,
        token_b: &Address,
        amount_a: i128,
        amount_b: i128,
    ) -> Result<MintResult, AmmError> {
        let env = self.env;
        let (used_a, used_b, _): (i128, i128, i128) = env.invoke_contract(
            &self.config.router,
            &Symbol::new(env, "quote_add_liquidity"),
            (token_a, token_b, self.config.stable, amount_a, amount_b).into_val(env),
        );
        env.authorize_as_current_contract(vec![
            env,
            self.transfer_entry(token_a, used_a),
            self.transfer_entry(token_b, used_b),
        ]);

        let params = AddLiquidityParams {
            token_a: token_a.clone(),
            token_b: token_b.clone(),
            stable: self.config.stable,
            amount_a_desired: amount_a,
            amount_b_desired: amount_b,
            amount_a_min: 0,
            amount_b_min: 0,
            to: self.to.clone(),
            deadline: self.deadline,
        };
        Ok(env.invoke_contract(
            &self.config.router,
            &Symbol::new(env, "add_liquidity"),
            (env.current_contract_address(), params).into_val(env),
        ))
    }

    /// token.transfer(manager, factory, amount) as the router will call it
    fn transfer_entry(&self, token: &Address, amount: i128) -> InvokerContractAuthEntry {
        let env = self.env;
        InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: token.clone(),
                fn_name: Symbol::new(env, "transfer"),
                args: (env.current_contract_address(), self.factory.clone(), amount).into_val(env),
            },
            sub_invocations: Vec::new(env),
        })
    }
}
