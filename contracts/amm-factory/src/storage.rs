use amm_types::{AmmError, PairInfo, PairState, STABLE_FEE_BPS, VOLATILE_FEE_BPS};
use soroban_sdk::{contracttype, Address, Env};

// ============================================================================
// SOROBAN RESOURCE LIMITS - Storage layout:
// ============================================================================
// - Ledger entry size: 128 KiB max per entry
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// - Every pair lives in its own Persistent entries (info, state), indexed
//   by a sequential pair id instead of a single unbounded Vec
// - Liquidity balances are one entry per (pair, holder)
// - TokenReserves(token) is the sum of all pair reserves held in `token`;
//   anything the factory holds above it is an unsettled deposit
// - A mint touches 2 token reserve totals + pair state + 1 balance,
//   a swap 2 token reserve totals + pair state
// ============================================================================

/// Storage keys for the factory contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address (Instance storage)
    Admin,
    /// Number of pairs created (Instance storage)
    PairCount,
    /// Swap fee in basis points per curve, keyed by the stable flag (Instance storage)
    Fee(bool),
    /// (token0, token1, stable) -> pair id (Persistent storage)
    Pair(Address, Address, bool),
    /// Pair id -> PairInfo (Persistent storage)
    PairInfo(u32),
    /// Pair id -> PairState (Persistent storage)
    PairState(u32),
    /// (pair id, holder) -> liquidity balance (Persistent storage)
    Balance(u32, Address),
    /// Token -> total reserves across all pairs (Persistent storage)
    TokenReserves(Address),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Admin ===

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Address {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("Not initialized")
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

// === Fees ===

pub fn get_fee(env: &Env, stable: bool) -> u32 {
    let default = if stable {
        STABLE_FEE_BPS
    } else {
        VOLATILE_FEE_BPS
    };
    env.storage()
        .instance()
        .get(&DataKey::Fee(stable))
        .unwrap_or(default)
}

pub fn set_fee(env: &Env, stable: bool, fee_bps: u32) {
    env.storage().instance().set(&DataKey::Fee(stable), &fee_bps);
    extend_instance_ttl(env);
}

// === Pair registry ===

pub fn get_pair_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PairCount)
        .unwrap_or(0)
}

pub fn set_pair_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PairCount, &count);
    extend_instance_ttl(env);
}

pub fn get_pair_id(env: &Env, token0: &Address, token1: &Address, stable: bool) -> Option<u32> {
    let key = DataKey::Pair(token0.clone(), token1.clone(), stable);
    env.storage().persistent().get(&key)
}

pub fn set_pair_id(env: &Env, token0: &Address, token1: &Address, stable: bool, pair: u32) {
    let key = DataKey::Pair(token0.clone(), token1.clone(), stable);
    env.storage().persistent().set(&key, &pair);
    extend_persistent_ttl(env, &key);
}

pub fn get_pair_info(env: &Env, pair: u32) -> Result<PairInfo, AmmError> {
    let key = DataKey::PairInfo(pair);
    let info = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(AmmError::PairNotFound)?;
    extend_persistent_ttl(env, &key);
    Ok(info)
}

pub fn set_pair_info(env: &Env, pair: u32, info: &PairInfo) {
    let key = DataKey::PairInfo(pair);
    env.storage().persistent().set(&key, info);
    extend_persistent_ttl(env, &key);
}

// === Pair state ===

pub fn get_pair_state(env: &Env, pair: u32) -> PairState {
    let key = DataKey::PairState(pair);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_default()
}

pub fn set_pair_state(env: &Env, pair: u32, state: &PairState) {
    let key = DataKey::PairState(pair);
    env.storage().persistent().set(&key, state);
    extend_persistent_ttl(env, &key);
}

// === Liquidity balances ===

pub fn get_balance(env: &Env, pair: u32, holder: &Address) -> i128 {
    let key = DataKey::Balance(pair, holder.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_balance(env: &Env, pair: u32, holder: &Address, balance: i128) {
    let key = DataKey::Balance(pair, holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        extend_persistent_ttl(env, &key);
    }
}

// === Token reserve totals ===

pub fn get_token_reserves(env: &Env, token: &Address) -> i128 {
    let key = DataKey::TokenReserves(token.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_token_reserves(env: &Env, token: &Address, reserves: i128) {
    let key = DataKey::TokenReserves(token.clone());
    env.storage().persistent().set(&key, &reserves);
    extend_persistent_ttl(env, &key);
}
