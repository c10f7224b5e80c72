use shared::errors::Error;
use shared::types::SystemConfig;
use soroban_sdk::{contracttype, Address, Env};

use crate::types::{ApprovalRequest, CronjobList, CronjobNode, GovernanceParams};

/// Storage keys for governance data structures
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    Params,
    Delegator(Address),
    LastRequestId,
    Request(u64),
    /// Marks that a delegator voted on a request
    Voted(u64, Address),
    CronjobList,
    LastCronjobId,
    Cronjob(u64),
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

pub fn set_params(env: &Env, params: &GovernanceParams) {
    env.storage().instance().set(&DataKey::Params, params);
}

pub fn get_params(env: &Env) -> Result<GovernanceParams, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Params)
        .ok_or(Error::NotInitialized)
}

// ==================== Delegators ====================

pub fn is_delegator(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Delegator(account.clone()))
}

pub fn set_delegator(env: &Env, account: &Address, enabled: bool) {
    let key = DataKey::Delegator(account.clone());
    if enabled {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

// ==================== Approval requests ====================

pub fn next_request_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::LastRequestId)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&DataKey::LastRequestId, &id);
    id
}

pub fn set_request(env: &Env, request: &ApprovalRequest) {
    env.storage()
        .persistent()
        .set(&DataKey::Request(request.id), request);
}

pub fn get_request(env: &Env, id: u64) -> Result<ApprovalRequest, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Request(id))
        .ok_or(Error::NotFound)
}

pub fn has_voted(env: &Env, request_id: u64, delegator: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Voted(request_id, delegator.clone()))
}

pub fn set_voted(env: &Env, request_id: u64, delegator: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::Voted(request_id, delegator.clone()), &true);
}

// ==================== Cronjobs ====================

pub fn get_cronjob_list(env: &Env) -> CronjobList {
    env.storage()
        .instance()
        .get(&DataKey::CronjobList)
        .unwrap_or_default()
}

pub fn set_cronjob_list(env: &Env, list: &CronjobList) {
    env.storage().instance().set(&DataKey::CronjobList, list);
}

pub fn next_cronjob_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::LastCronjobId)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&DataKey::LastCronjobId, &id);
    id
}

pub fn get_cronjob(env: &Env, id: u64) -> Option<CronjobNode> {
    env.storage().persistent().get(&DataKey::Cronjob(id))
}

pub fn set_cronjob(env: &Env, node: &CronjobNode) {
    env.storage()
        .persistent()
        .set(&DataKey::Cronjob(node.id), node);
}
