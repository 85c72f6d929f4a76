#![no_std]

mod invariants;
mod pair;
mod storage;

#[cfg(feature = "certora")]
pub mod certora_specs;

use amm_types::{AmmError, MintResult, PairInfo, PairState, MAX_FEE_BPS};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};
use storage::*;

#[contract]
pub struct AmmFactory;

// ============================================================================
// SOROBAN RESOURCE LIMITS - Important constraints to be aware of:
// ============================================================================
// - Ledger entry size: 128 KiB max
// - Storage key size: 250 bytes max
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
// - CPU instructions: 100M per tx
//
// Design choices to stay within limits:
// - Pairs are indexed by a sequential id (PairCount + PairInfo(id)) instead
//   of a Vec, so the registry never becomes one unbounded ledger entry
// - Stable-curve Newton iteration is capped at 255 rounds
// ============================================================================

#[contractimpl]
impl AmmFactory {
    /// Initialize factory with its admin
    pub fn initialize(env: Env, admin: Address) {
        if has_admin(&env) {
            panic!("Already initialized");
        }

        admin.require_auth();

        set_admin(&env, &admin);
        set_pair_count(&env, 0);
    }

    /// Create a pair for two tokens on the chosen curve. Returns the pair id.
    pub fn create_pair(
        env: Env,
        token_a: Address,
        token_b: Address,
        stable: bool,
    ) -> Result<u32, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAssets);
        }

        // Sort tokens
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        if get_pair_id(&env, &token0, &token1, stable).is_some() {
            return Err(AmmError::PairExists);
        }

        let info = PairInfo {
            decimals0: token::Client::new(&env, &token0).decimals(),
            decimals1: token::Client::new(&env, &token1).decimals(),
            token0: token0.clone(),
            token1: token1.clone(),
            stable,
        };

        let pair = get_pair_count(&env);
        set_pair_info(&env, pair, &info);
        set_pair_state(&env, pair, &PairState::default());
        set_pair_id(&env, &token0, &token1, stable, pair);
        set_pair_count(&env, pair + 1);

        env.events().publish(
            (Symbol::new(&env, "pair_created"),),
            (token0, token1, stable, pair),
        );
        log!(&env, "pair created", pair, stable);

        Ok(pair)
    }

    /// Look up a pair id in either token order
    pub fn get_pair(env: Env, token_a: Address, token_b: Address, stable: bool) -> Option<u32> {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        get_pair_id(&env, &token0, &token1, stable)
    }

    /// Total number of pairs created
    pub fn get_pair_count(env: Env) -> u32 {
        get_pair_count(&env)
    }

    /// Pair at a given index (pair ids are assigned in creation order)
    pub fn get_pair_at(env: Env, index: u32) -> Option<PairInfo> {
        if index >= get_pair_count(&env) {
            return None;
        }
        get_pair_info(&env, index).ok()
    }

    pub fn get_pair_info(env: Env, pair: u32) -> Result<PairInfo, AmmError> {
        get_pair_info(&env, pair)
    }

    /// (reserve0, reserve1, block_timestamp_last)
    pub fn get_reserves(env: Env, pair: u32) -> Result<(i128, i128, u64), AmmError> {
        get_pair_info(&env, pair)?;
        let state = get_pair_state(&env, pair);
        Ok((state.reserve0, state.reserve1, state.block_timestamp_last))
    }

    pub fn get_state(env: Env, pair: u32) -> Result<PairState, AmmError> {
        get_pair_info(&env, pair)?;
        Ok(get_pair_state(&env, pair))
    }

    pub fn total_supply(env: Env, pair: u32) -> Result<i128, AmmError> {
        get_pair_info(&env, pair)?;
        Ok(get_pair_state(&env, pair).total_supply)
    }

    /// Liquidity held by `holder` in a pair
    pub fn balance(env: Env, pair: u32, holder: Address) -> i128 {
        get_balance(&env, pair, &holder)
    }

    // === Pair operations ===

    /// Mint liquidity to `to` for tokens already transferred to the factory
    pub fn mint(env: Env, pair: u32, to: Address) -> Result<MintResult, AmmError> {
        extend_instance_ttl(&env);
        pair::mint(&env, pair, &to)
    }

    /// Swap tokens already transferred to the factory, paying `to`
    pub fn swap(env: Env, pair: u32, token_in: Address, to: Address) -> Result<i128, AmmError> {
        extend_instance_ttl(&env);
        pair::swap(&env, pair, &token_in, &to)
    }

    /// Quote an exact-input swap against current reserves
    pub fn get_amount_out(
        env: Env,
        pair: u32,
        token_in: Address,
        amount_in: i128,
    ) -> Result<i128, AmmError> {
        pair::quote_amount_out(&env, pair, &token_in, amount_in)
    }

    // === Admin ===

    /// Set the swap fee for a curve (admin only)
    pub fn set_fee(env: Env, stable: bool, fee_bps: u32) -> Result<(), AmmError> {
        let admin = get_admin(&env);
        admin.require_auth();

        if fee_bps > MAX_FEE_BPS {
            return Err(AmmError::InvalidFee);
        }

        set_fee(&env, stable, fee_bps);

        env.events()
            .publish((Symbol::new(&env, "fee_changed"),), (stable, fee_bps));

        Ok(())
    }

    pub fn get_fee(env: Env, stable: bool) -> u32 {
        get_fee(&env, stable)
    }

    pub fn get_admin(env: Env) -> Address {
        get_admin(&env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_types::{MINIMUM_LIQUIDITY, STABLE_FEE_BPS, VOLATILE_FEE_BPS};
    use soroban_sdk::testutils::{Address as _, Events, Ledger};
    use soroban_sdk::{token::StellarAssetClient, Address, Env, IntoVal, TryIntoVal, Val, Vec};

    struct Setup<'a> {
        env: Env,
        factory: AmmFactoryClient<'a>,
        admin: Address,
        token_a: Address,
        token_b: Address,
    }

    fn create_token(env: &Env, admin: &Address) -> Address {
        env.register_stellar_asset_contract_v2(admin.clone()).address()
    }

    fn mint_tokens(env: &Env, token: &Address, to: &Address, amount: i128) {
        StellarAssetClient::new(env, token).mint(to, &amount);
    }

    fn setup<'a>() -> Setup<'a> {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let contract_id = env.register(AmmFactory, ());
        let factory = AmmFactoryClient::new(&env, &contract_id);
        factory.initialize(&admin);

        let token_a = create_token(&env, &admin);
        let token_b = create_token(&env, &admin);

        Setup {
            env,
            factory,
            admin,
            token_a,
            token_b,
        }
    }

    /// Transfer deposits to the factory and mint, the way the router does
    fn deposit(s: &Setup, pair: u32, amount_a: i128, amount_b: i128, to: &Address) -> MintResult {
        mint_tokens(&s.env, &s.token_a, &s.factory.address, amount_a);
        mint_tokens(&s.env, &s.token_b, &s.factory.address, amount_b);
        s.factory.mint(&pair, to)
    }

    // === Initialization Tests ===

    #[test]
    fn test_initialize_factory() {
        let s = setup();
        assert_eq!(s.factory.get_admin(), s.admin);
        assert_eq!(s.factory.get_pair_count(), 0);
        assert_eq!(s.factory.get_fee(&true), STABLE_FEE_BPS);
        assert_eq!(s.factory.get_fee(&false), VOLATILE_FEE_BPS);
    }

    #[test]
    #[should_panic(expected = "Already initialized")]
    fn test_initialize_twice_fails() {
        let s = setup();
        s.factory.initialize(&s.admin);
    }

    // === Pair Creation Tests ===

    #[test]
    fn test_create_pair() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &true);

        assert_eq!(pair, 0);
        assert_eq!(s.factory.get_pair_count(), 1);
        assert_eq!(s.factory.get_pair(&s.token_a, &s.token_b, &true), Some(pair));

        let info = s.factory.get_pair_info(&pair);
        assert!(info.token0 < info.token1);
        assert!(info.stable);
        assert_eq!(info.decimals0, 7);
        assert_eq!(info.decimals1, 7);

        assert_eq!(s.factory.get_reserves(&pair), (0, 0, 0));
        assert_eq!(s.factory.total_supply(&pair), 0);
    }

    #[test]
    fn test_get_pair_is_order_independent() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_b, &s.token_a, &false);

        assert_eq!(s.factory.get_pair(&s.token_a, &s.token_b, &false), Some(pair));
        assert_eq!(s.factory.get_pair(&s.token_b, &s.token_a, &false), Some(pair));
        assert_eq!(s.factory.get_pair(&s.token_a, &s.token_b, &true), None);
    }

    #[test]
    fn test_stable_and_volatile_pairs_coexist() {
        let s = setup();
        let stable = s.factory.create_pair(&s.token_a, &s.token_b, &true);
        let volatile = s.factory.create_pair(&s.token_a, &s.token_b, &false);

        assert_ne!(stable, volatile);
        assert_eq!(s.factory.get_pair_count(), 2);
        assert!(s.factory.get_pair_at(&0).unwrap().stable);
        assert!(!s.factory.get_pair_at(&1).unwrap().stable);
        assert_eq!(s.factory.get_pair_at(&2), None);
    }

    #[test]
    fn test_create_pair_identical_tokens_fails() {
        let s = setup();
        let result = s.factory.try_create_pair(&s.token_a, &s.token_a, &true);
        assert_eq!(result, Err(Ok(AmmError::IdenticalAssets)));
    }

    #[test]
    fn test_create_duplicate_pair_fails() {
        let s = setup();
        s.factory.create_pair(&s.token_a, &s.token_b, &true);
        let result = s.factory.try_create_pair(&s.token_b, &s.token_a, &true);
        assert_eq!(result, Err(Ok(AmmError::PairExists)));
    }

    #[test]
    fn test_unknown_pair_not_found() {
        let s = setup();
        assert_eq!(s.factory.try_get_reserves(&7), Err(Ok(AmmError::PairNotFound)));
        assert_eq!(s.factory.try_get_pair_info(&7), Err(Ok(AmmError::PairNotFound)));
    }

    // === Mint Tests ===

    #[test]
    fn test_first_mint_locks_minimum_liquidity() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);
        s.env.ledger().set_timestamp(1_000);

        let result = deposit(&s, pair, 1_000_000, 1_000_000, &lp);

        assert_eq!(result.liquidity, 1_000_000 - MINIMUM_LIQUIDITY as i128);
        assert_eq!(result.amount_a, 1_000_000);
        assert_eq!(result.amount_b, 1_000_000);
        assert_eq!(s.factory.balance(&pair, &lp), result.liquidity);
        assert_eq!(s.factory.total_supply(&pair), 1_000_000);
        assert_eq!(s.factory.get_reserves(&pair), (1_000_000, 1_000_000, 1_000));
    }

    #[test]
    fn test_second_mint_is_proportional() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);

        deposit(&s, pair, 1_000_000, 1_000_000, &lp);
        let result = deposit(&s, pair, 10_000, 10_000, &lp);

        assert_eq!(result.liquidity, 10_000);
        assert_eq!(s.factory.total_supply(&pair), 1_010_000);
        assert_eq!(s.factory.balance(&pair, &lp), 1_009_000);
    }

    #[test]
    fn test_mint_event_matches_reserve_change() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);
        deposit(&s, pair, 1_000_000, 2_000_000, &lp);
        let (before0, before1, _) = s.factory.get_reserves(&pair);

        let result = deposit(&s, pair, 10_000, 20_000, &lp);

        let topics: Vec<Val> = (Symbol::new(&s.env, "mint"), pair).into_val(&s.env);
        let mut data = None;
        for (emitter, event_topics, event_data) in s.env.events().all().iter() {
            if emitter == s.factory.address && event_topics == topics {
                data = Some(event_data);
            }
        }
        let (amount0, amount1, to): (i128, i128, Address) =
            data.unwrap().try_into_val(&s.env).unwrap();

        let (after0, after1, _) = s.factory.get_reserves(&pair);
        assert_eq!((amount0, amount1), (after0 - before0, after1 - before1));
        assert_eq!((amount0, amount1), (result.amount_a, result.amount_b));
        assert_eq!(to, lp);
    }

    #[test]
    fn test_first_mint_too_small_fails() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);

        mint_tokens(&s.env, &s.token_a, &s.factory.address, 1_000);
        mint_tokens(&s.env, &s.token_b, &s.factory.address, 1_000);

        let result = s.factory.try_mint(&pair, &lp);
        assert_eq!(result, Err(Ok(AmmError::InsufficientLiquidity)));
        assert_eq!(s.factory.total_supply(&pair), 0);
    }

    #[test]
    fn test_mint_without_deposit_fails() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);

        let result = s.factory.try_mint(&pair, &lp);
        assert_eq!(result, Err(Ok(AmmError::ZeroInput)));
    }

    #[test]
    fn test_deposits_settle_per_pair() {
        let s = setup();
        let stable = s.factory.create_pair(&s.token_a, &s.token_b, &true);
        let volatile = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);

        deposit(&s, stable, 1_000_000, 1_000_000, &lp);
        deposit(&s, volatile, 2_000_000, 2_000_000, &lp);

        assert_eq!(s.factory.get_reserves(&stable).0, 1_000_000);
        assert_eq!(s.factory.get_reserves(&volatile).0, 2_000_000);
    }

    // === Swap Tests ===

    #[test]
    fn test_volatile_swap() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);
        let trader = Address::generate(&s.env);
        deposit(&s, pair, 1_000_000, 1_000_000, &lp);

        let quoted = s.factory.get_amount_out(&pair, &s.token_a, &10_000);
        // Net input 9_970: 9_970 * 1_000_000 / 1_009_970
        assert_eq!(quoted, 9_871);

        mint_tokens(&s.env, &s.token_a, &s.factory.address, 10_000);
        let out = s.factory.swap(&pair, &s.token_a, &trader);

        assert_eq!(out, quoted);
        assert_eq!(token::Client::new(&s.env, &s.token_b).balance(&trader), out);

        let info = s.factory.get_pair_info(&pair);
        let (reserve0, reserve1, _) = s.factory.get_reserves(&pair);
        if info.token0 == s.token_a {
            assert_eq!((reserve0, reserve1), (1_010_000, 1_000_000 - out));
        } else {
            assert_eq!((reserve0, reserve1), (1_000_000 - out, 1_010_000));
        }
    }

    #[test]
    fn test_stable_swap_near_parity() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &true);
        let lp = Address::generate(&s.env);
        let trader = Address::generate(&s.env);
        deposit(&s, pair, 10_000_000_000, 10_000_000_000, &lp);

        mint_tokens(&s.env, &s.token_b, &s.factory.address, 1_000_000);
        let out = s.factory.swap(&pair, &s.token_b, &trader);

        // Stable curve stays close to 1:1 after the 5 bps fee
        assert!(out < 999_500);
        assert!(out > 999_000);
    }

    #[test]
    fn test_swap_without_input_fails() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);
        deposit(&s, pair, 1_000_000, 1_000_000, &lp);

        let result = s.factory.try_swap(&pair, &s.token_a, &lp);
        assert_eq!(result, Err(Ok(AmmError::ZeroInput)));
    }

    #[test]
    fn test_swap_foreign_token_fails() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);
        deposit(&s, pair, 1_000_000, 1_000_000, &lp);

        let other = create_token(&s.env, &s.admin);
        let result = s.factory.try_swap(&pair, &other, &lp);
        assert_eq!(result, Err(Ok(AmmError::InvalidToken)));
    }

    #[test]
    fn test_swap_on_empty_pair_fails() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let trader = Address::generate(&s.env);

        mint_tokens(&s.env, &s.token_a, &s.factory.address, 1_000);
        let result = s.factory.try_swap(&pair, &s.token_a, &trader);
        assert_eq!(result, Err(Ok(AmmError::InsufficientLiquidity)));
    }

    // === Fee Tests ===

    #[test]
    fn test_set_fee() {
        let s = setup();
        s.factory.set_fee(&false, &100);
        assert_eq!(s.factory.get_fee(&false), 100);
        assert_eq!(s.factory.get_fee(&true), STABLE_FEE_BPS);
    }

    #[test]
    fn test_set_fee_above_max_fails() {
        let s = setup();
        let result = s.factory.try_set_fee(&true, &(MAX_FEE_BPS + 1));
        assert_eq!(result, Err(Ok(AmmError::InvalidFee)));
        assert_eq!(s.factory.get_fee(&true), STABLE_FEE_BPS);
    }

    #[test]
    fn test_fee_applies_to_quotes() {
        let s = setup();
        let pair = s.factory.create_pair(&s.token_a, &s.token_b, &false);
        let lp = Address::generate(&s.env);
        deposit(&s, pair, 1_000_000, 1_000_000, &lp);

        let before = s.factory.get_amount_out(&pair, &s.token_a, &10_000);
        s.factory.set_fee(&false, &0);
        let after = s.factory.get_amount_out(&pair, &s.token_a, &10_000);

        // 10_000 * 1_000_000 / 1_010_000
        assert_eq!(after, 9_900);
        assert!(after > before);
    }
}
