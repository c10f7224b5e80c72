//! Client interfaces for calls between the marketplace contracts.

use soroban_sdk::{contractclient, Address, BytesN, Env};

use crate::types::{Action, CronjobOutcome, CronjobType, ScheduledJob};

/// Custody calls the registry, staking and action verifier make on escrow.
#[contractclient(name = "EscrowClient")]
pub trait EscrowInterface {
    fn open_account(
        env: Env,
        caller: Address,
        id: u64,
        lending_token: Address,
        collateral_token: Address,
    );
    fn deposit_collateral(env: Env, caller: Address, id: u64, from: Address, amount: i128);
    fn deposit_lending(env: Env, caller: Address, id: u64, from: Address, amount: i128);
    fn release_lending(env: Env, caller: Address, id: u64, to: Address, amount: i128);
    fn release_collateral(env: Env, caller: Address, id: u64, to: Address, amount: i128);
    fn mint_funding_nft(env: Env, caller: Address, id: u64, amount: i128);
    fn burn_funding_nft(env: Env, caller: Address, id: u64, from: Address, amount: i128);
    fn transfer_funding_nft(env: Env, caller: Address, id: u64, amount: i128, to: Address);
    fn set_nft_paused(env: Env, caller: Address, id: u64, paused: bool);
    fn nft_balance(env: Env, id: u64, holder: Address) -> i128;
    fn mint_reputational(env: Env, caller: Address, to: Address, amount: i128);
    fn burn_reputational(env: Env, caller: Address, from: Address, amount: i128);
    fn reputational_balance(env: Env, account: Address) -> i128;
}

/// Approval and scheduling calls the registry makes on governance.
#[contractclient(name = "GovernanceClient")]
pub trait GovernanceInterface {
    fn request_approval(env: Env, caller: Address, subject_id: u64, is_milestone: bool) -> u64;
    fn schedule_cronjob(
        env: Env,
        caller: Address,
        external_id: u64,
        job_type: CronjobType,
        due: u64,
    );
}

/// Decision and cronjob callbacks governance makes on the registry.
#[contractclient(name = "RegistryClient")]
pub trait RegistryInterface {
    fn decide(
        env: Env,
        caller: Address,
        subject_id: u64,
        is_milestone: bool,
        approved: bool,
    ) -> Option<ScheduledJob>;
    fn check_cronjob(
        env: Env,
        caller: Address,
        external_id: u64,
        job_type: CronjobType,
    ) -> CronjobOutcome;
}

/// External verifier of off-chain action signatures.
#[contractclient(name = "SignatureVerifierClient")]
pub trait SignatureVerifierInterface {
    fn verify_action_signature(env: Env, action: Action, signature: BytesN<64>) -> bool;
}
