use shared::errors::Error;
use shared::types::{RequestKind, SystemConfig};
use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Investment, LenderPosition, Loan, LotteryEntry, LotteryState, RegistryParams};

/// Storage keys for registry data structures
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Params,
    /// Last allocated request id, shared by investments and loans
    NextId,
    Kind(u64),
    Investment(u64),
    Lottery(u64),
    Entry(u64, Address),
    /// Lender at a participation index of a lottery
    Participant(u64, u32),
    Loan(u64),
    Position(u64, Address),
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &SystemConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Result<SystemConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_params(env: &Env, params: &RegistryParams) {
    env.storage().instance().set(&DataKey::Params, params);
}

pub fn get_params(env: &Env) -> Result<RegistryParams, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Params)
        .ok_or(Error::NotInitialized)
}

/// Allocate the next request id. Ids start at 1.
pub fn next_id(env: &Env) -> u64 {
    let id: u64 = env.storage().instance().get(&DataKey::NextId).unwrap_or(0) + 1;
    env.storage().instance().set(&DataKey::NextId, &id);
    id
}

pub fn set_kind(env: &Env, id: u64, kind: RequestKind) {
    env.storage().persistent().set(&DataKey::Kind(id), &kind);
}

pub fn get_kind(env: &Env, id: u64) -> Result<RequestKind, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Kind(id))
        .ok_or(Error::NotFound)
}

// ==================== Investments ====================

pub fn set_investment(env: &Env, investment: &Investment) {
    env.storage()
        .persistent()
        .set(&DataKey::Investment(investment.id), investment);
}

pub fn get_investment(env: &Env, id: u64) -> Result<Investment, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Investment(id))
        .ok_or(Error::NotFound)
}

pub fn set_lottery(env: &Env, id: u64, state: &LotteryState) {
    env.storage().persistent().set(&DataKey::Lottery(id), state);
}

pub fn get_lottery(env: &Env, id: u64) -> Result<LotteryState, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Lottery(id))
        .ok_or(Error::NotFound)
}

pub fn has_entry(env: &Env, id: u64, lender: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Entry(id, lender.clone()))
}

/// Lottery entry of a lender, empty if the lender never showed interest
pub fn get_entry(env: &Env, id: u64, lender: &Address) -> LotteryEntry {
    env.storage()
        .persistent()
        .get(&DataKey::Entry(id, lender.clone()))
        .unwrap_or_default()
}

pub fn set_entry(env: &Env, id: u64, lender: &Address, entry: &LotteryEntry) {
    env.storage()
        .persistent()
        .set(&DataKey::Entry(id, lender.clone()), entry);
}

pub fn get_participant(env: &Env, id: u64, index: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Participant(id, index))
}

pub fn set_participant(env: &Env, id: u64, index: u32, lender: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::Participant(id, index), lender);
}

// ==================== Loans ====================

pub fn set_loan(env: &Env, loan: &Loan) {
    env.storage().persistent().set(&DataKey::Loan(loan.id), loan);
}

pub fn get_loan(env: &Env, id: u64) -> Result<Loan, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Loan(id))
        .ok_or(Error::NotFound)
}

/// Position of a lender in a loan, empty if the lender never funded it
pub fn get_position(env: &Env, id: u64, lender: &Address) -> LenderPosition {
    env.storage()
        .persistent()
        .get(&DataKey::Position(id, lender.clone()))
        .unwrap_or_default()
}

pub fn set_position(env: &Env, id: u64, lender: &Address, position: &LenderPosition) {
    env.storage()
        .persistent()
        .set(&DataKey::Position(id, lender.clone()), position);
}
