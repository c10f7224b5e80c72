use shared::errors::Error;
use shared::types::{Amount, EscrowAccount, SystemConfig};
use soroban_sdk::{contracttype, Address, Env};

/// Storage keys for escrow data structures
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Account(u64),
    NftBalance(u64, Address),
    NftSupply(u64),
    NftPaused(u64),
    Reputation(Address),
}

/// Store the deploy-time configuration
pub fn set_config(env: &Env, config: &SystemConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/// Retrieve the deploy-time configuration
pub fn get_config(env: &Env) -> Result<SystemConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

/// Check if the contract was initialized
pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Store custody bookkeeping for an id
pub fn set_account(env: &Env, account: &EscrowAccount) {
    env.storage()
        .persistent()
        .set(&DataKey::Account(account.id), account);
}

/// Retrieve custody bookkeeping for an id
pub fn get_account(env: &Env, id: u64) -> Result<EscrowAccount, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Account(id))
        .ok_or(Error::NotFound)
}

pub fn account_exists(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Account(id))
}

// ==================== Funding NFTs ====================

pub fn get_nft_balance(env: &Env, id: u64, holder: &Address) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::NftBalance(id, holder.clone()))
        .unwrap_or(0)
}

pub fn set_nft_balance(env: &Env, id: u64, holder: &Address, balance: Amount) {
    let key = DataKey::NftBalance(id, holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
    }
}

pub fn get_nft_supply(env: &Env, id: u64) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::NftSupply(id))
        .unwrap_or(0)
}

pub fn set_nft_supply(env: &Env, id: u64, supply: Amount) {
    env.storage().persistent().set(&DataKey::NftSupply(id), &supply);
}

pub fn is_nft_paused(env: &Env, id: u64) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::NftPaused(id))
        .unwrap_or(false)
}

pub fn set_nft_paused(env: &Env, id: u64, paused: bool) {
    env.storage().persistent().set(&DataKey::NftPaused(id), &paused);
}

// ==================== Reputational token ====================

pub fn get_reputation(env: &Env, account: &Address) -> Amount {
    env.storage()
        .persistent()
        .get(&DataKey::Reputation(account.clone()))
        .unwrap_or(0)
}

pub fn set_reputation(env: &Env, account: &Address, balance: Amount) {
    env.storage()
        .persistent()
        .set(&DataKey::Reputation(account.clone()), &balance);
}
