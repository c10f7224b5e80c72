#![no_std]

//! Investment and loan registry.
//!
//! Seekers open requests here; governance approves them and drives their
//! deadlines through the cronjob queue, lenders fund loans or win investment
//! tickets through the lottery. All tokens sit in the escrow contract.

use shared::access::{require_role, Role};
use shared::errors::Error;
use shared::types::{Amount, CronjobOutcome, CronjobType, RequestKind, ScheduledJob, SystemConfig};
use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

mod investment;
mod loan;
mod lottery;
mod storage;
mod types;
mod validation;

pub use types::*;

use storage::*;

#[contract]
pub struct RegistryContract;

#[contractimpl]
impl RegistryContract {
    /// Initialize the registry
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `config` - Deploy-time addresses; `config.owner` must authorize
    /// * `params` - Ticket size, lottery and funding parameters
    pub fn initialize(env: Env, config: SystemConfig, params: RegistryParams) -> Result<(), Error> {
        if has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        config.owner.require_auth();
        validation::validate_params(&params)?;

        set_config(&env, &config);
        set_params(&env, &params);

        Ok(())
    }

    // ==================== Requests ====================

    /// Request an investment: sell `token_amount` investment tokens for
    /// `amount_requested` lending tokens, split into tickets of `base_amount`
    ///
    /// # Returns
    /// * `Result<u64, Error>` - The new request id
    pub fn request_investment(
        env: Env,
        seeker: Address,
        investment_token: Address,
        token_amount: Amount,
        lending_token: Address,
        amount_requested: Amount,
        ipfs_hash: String,
    ) -> Result<u64, Error> {
        investment::request(
            &env,
            seeker,
            investment_token,
            token_amount,
            lending_token,
            amount_requested,
            ipfs_hash,
        )
    }

    /// Request a loan repaid in batches after full funding
    pub fn request_personal_loan(
        env: Env,
        seeker: Address,
        terms: LoanTerms,
        ipfs_hash: String,
    ) -> Result<u64, Error> {
        let milestones = Vec::new(&env);
        loan::request(&env, seeker, RequestKind::PersonalLoan, terms, milestones, ipfs_hash)
    }

    /// Request a loan released milestone by milestone
    pub fn request_project_loan(
        env: Env,
        seeker: Address,
        terms: LoanTerms,
        milestones: Vec<Milestone>,
        ipfs_hash: String,
    ) -> Result<u64, Error> {
        loan::request(&env, seeker, RequestKind::ProjectLoan, terms, milestones, ipfs_hash)
    }

    // ==================== Governance callbacks ====================

    /// Apply an approval decision. Returns the job governance has to schedule.
    ///
    /// # Arguments
    /// * `caller` - Must be governance
    /// * `subject_id` - Investment or loan id
    /// * `is_milestone` - Whether the decision is about a loan milestone
    /// * `approved` - Outcome of the vote
    pub fn decide(
        env: Env,
        caller: Address,
        subject_id: u64,
        is_milestone: bool,
        approved: bool,
    ) -> Result<Option<ScheduledJob>, Error> {
        let config = get_config(&env)?;
        let params = get_params(&env)?;
        require_role(&config, &caller, Role::Governance)?;

        match (get_kind(&env, subject_id)?, is_milestone) {
            (RequestKind::Investment, false) => {
                investment::decide(&env, &config, &params, subject_id, approved)
            }
            (RequestKind::Investment, true) => Err(Error::InvalidInput),
            (_, false) => loan::decide(&env, &config, params.funding_timeframe, subject_id, approved),
            (_, true) => loan::decide_milestone(&env, &config, subject_id, approved),
        }
    }

    /// Check the request a due cronjob watches
    pub fn check_cronjob(
        env: Env,
        caller: Address,
        external_id: u64,
        job_type: CronjobType,
    ) -> Result<CronjobOutcome, Error> {
        let config = get_config(&env)?;
        require_role(&config, &caller, Role::Governance)?;

        match job_type {
            CronjobType::InvestmentLottery => {
                investment::check_lottery_start(&env, &config, external_id)
            }
            _ => loan::check_job(&env, &config, external_id, job_type),
        }
    }

    // ==================== Investments ====================

    /// Spend reputation on lottery numbers for `partitions` tickets and pay
    /// for them up front
    pub fn show_interest(env: Env, lender: Address, id: u64, partitions: u64) -> Result<(), Error> {
        investment::show_interest(&env, lender, id, partitions)
    }

    /// Draw the next batch of tickets. Returns the number of tickets awarded.
    pub fn execute_lottery_run(env: Env, id: u64) -> Result<u64, Error> {
        investment::execute_lottery_run(&env, id)
    }

    /// Take won tickets out: `lock` stay with the registry, `receive` are
    /// transferred as funding NFTs
    pub fn withdraw_investment_tickets(
        env: Env,
        lender: Address,
        id: u64,
        lock: u64,
        receive: u64,
    ) -> Result<(), Error> {
        investment::withdraw_tickets(&env, lender, id, lock, receive)
    }

    pub fn unlock_investment_tickets(
        env: Env,
        lender: Address,
        id: u64,
        amount: u64,
    ) -> Result<(), Error> {
        investment::unlock_tickets(&env, lender, id, amount)
    }

    pub fn withdraw_non_won_amount(env: Env, lender: Address, id: u64) -> Result<Amount, Error> {
        investment::withdraw_non_won(&env, lender, id)
    }

    pub fn convert_nft_to_tokens(
        env: Env,
        holder: Address,
        id: u64,
        amount: u64,
    ) -> Result<Amount, Error> {
        investment::convert_nft(&env, holder, id, amount)
    }

    pub fn withdraw_investment(env: Env, seeker: Address, id: u64) -> Result<Amount, Error> {
        investment::withdraw(&env, seeker, id)
    }

    // ==================== Loans ====================

    pub fn fund_loan(env: Env, lender: Address, id: u64, partitions: u64) -> Result<(), Error> {
        loan::fund(&env, lender, id, partitions)
    }

    /// Ask governance to release the current milestone. Returns the approval
    /// request id.
    pub fn apply_milestone(env: Env, seeker: Address, id: u64) -> Result<u64, Error> {
        loan::apply_milestone(&env, seeker, id)
    }

    pub fn execute_payment(env: Env, seeker: Address, id: u64) -> Result<Amount, Error> {
        loan::execute_payment(&env, seeker, id)
    }

    pub fn receive_payments(env: Env, lender: Address, id: u64) -> Result<Amount, Error> {
        loan::receive_payments(&env, lender, id)
    }

    pub fn withdraw_unfunded(env: Env, lender: Address, id: u64) -> Result<Amount, Error> {
        loan::withdraw_unfunded(&env, lender, id)
    }

    pub fn liquidate_loan(env: Env, lender: Address, id: u64) -> Result<(), Error> {
        loan::liquidate(&env, lender, id)
    }

    pub fn claim_collateral(env: Env, lender: Address, id: u64) -> Result<(Amount, Amount), Error> {
        loan::claim_collateral(&env, lender, id)
    }

    // ==================== Queries ====================

    pub fn get_investment(env: Env, id: u64) -> Result<Investment, Error> {
        get_investment(&env, id)
    }

    pub fn get_lottery(env: Env, id: u64) -> Result<LotteryState, Error> {
        get_lottery(&env, id)
    }

    pub fn get_lottery_entry(env: Env, id: u64, lender: Address) -> LotteryEntry {
        get_entry(&env, id, &lender)
    }

    pub fn get_loan(env: Env, id: u64) -> Result<Loan, Error> {
        get_loan(&env, id)
    }

    pub fn get_position(env: Env, id: u64, lender: Address) -> LenderPosition {
        get_position(&env, id, &lender)
    }

    /// Total owed by the seeker of a loan, interest included
    pub fn loan_total_due(env: Env, id: u64) -> Result<Amount, Error> {
        loan::total_due(&get_loan(&env, id)?.terms)
    }

    pub fn request_kind(env: Env, id: u64) -> Result<RequestKind, Error> {
        get_kind(&env, id)
    }

    pub fn get_params(env: Env) -> Result<RegistryParams, Error> {
        get_params(&env)
    }

    pub fn get_config(env: Env) -> Result<SystemConfig, Error> {
        get_config(&env)
    }
}
