#![no_std]

use shared::access::{require_role, Role};
use shared::errors::Error;
use shared::events::*;
use shared::interfaces::RegistryClient;
use shared::types::{CronjobOutcome, CronjobType, SystemConfig};
use soroban_sdk::{contract, contractimpl, log, Address, Env};

mod cronjob;
mod storage;
mod types;


pub use types::*;

use storage::*;

#[contract]
pub struct GovernanceContract;

#[contractimpl]
impl GovernanceContract {
    /// Initialize governance
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `config` - Deploy-time addresses; `config.owner` must authorize
    /// * `params` - Vote threshold, voting period and cronjob extension interval
    pub fn initialize(env: Env, config: SystemConfig, params: GovernanceParams) -> Result<(), Error> {
        if has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        config.owner.require_auth();

        if params.approval_threshold == 0 || params.voting_period == 0 || params.extension_interval == 0 {
            return Err(Error::InvalidInput);
        }

        set_config(&env, &config);
        set_params(&env, &params);

        Ok(())
    }

    // ==================== Delegators ====================

    pub fn add_delegator(env: Env, owner: Address, delegator: Address) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &owner, Role::Owner)?;

        if is_delegator(&env, &delegator) {
            return Err(Error::InvalidInput);
        }
        set_delegator(&env, &delegator, true);

        env.events().publish((DELEGATOR_ADDED,), delegator);
        Ok(())
    }

    pub fn remove_delegator(env: Env, owner: Address, delegator: Address) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &owner, Role::Owner)?;

        if !is_delegator(&env, &delegator) {
            return Err(Error::NotFound);
        }
        set_delegator(&env, &delegator, false);

        env.events().publish((DELEGATOR_REMOVED,), delegator);
        Ok(())
    }

    pub fn is_delegator(env: Env, account: Address) -> bool {
        is_delegator(&env, &account)
    }

    // ==================== Approval requests ====================

    /// Open a vote on a registry request or milestone
    ///
    /// # Arguments
    /// * `caller` - Must be the registry
    /// * `subject_id` - Investment or loan id
    /// * `is_milestone` - Whether the vote releases a loan milestone
    ///
    /// # Returns
    /// * `Result<u64, Error>` - The approval request id
    pub fn request_approval(
        env: Env,
        caller: Address,
        subject_id: u64,
        is_milestone: bool,
    ) -> Result<u64, Error> {
        let config = get_config(&env)?;
        let params = get_params(&env)?;
        require_role(&config, &caller, Role::Project)?;

        let request = ApprovalRequest {
            id: next_request_id(&env),
            subject_id,
            is_milestone,
            approvals_provided: 0,
            is_approved: false,
            is_processed: false,
            deadline: env.ledger().timestamp() + params.voting_period,
        };
        set_request(&env, &request);

        env.events().publish(
            (APPROVAL_REQUESTED,),
            (request.id, subject_id, is_milestone),
        );

        Ok(request.id)
    }

    /// Cast a delegator vote. The vote that reaches the threshold approves
    /// the request and forwards the decision to the registry.
    pub fn vote_for_request(
        env: Env,
        delegator: Address,
        request_id: u64,
        approve: bool,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        let params = get_params(&env)?;
        delegator.require_auth();

        if !is_delegator(&env, &delegator) {
            return Err(Error::OnlyDelegator);
        }

        let mut request = get_request(&env, request_id)?;
        if request.is_processed {
            return Err(Error::RequestProcessed);
        }
        if env.ledger().timestamp() > request.deadline {
            return Err(Error::OutsideVotingPeriod);
        }
        if has_voted(&env, request_id, &delegator) {
            return Err(Error::AlreadyVoted);
        }

        set_voted(&env, request_id, &delegator);
        if approve {
            request.approvals_provided = request
                .approvals_provided
                .checked_add(1)
                .ok_or(Error::Overflow)?;
        }

        env.events()
            .publish((VOTED,), (request_id, delegator, approve));

        if request.approvals_provided >= params.approval_threshold {
            process(&env, &config, request, true)
        } else {
            set_request(&env, &request);
            Ok(())
        }
    }

    /// Decide a request at once, without delegator votes
    pub fn super_vote_for_request(
        env: Env,
        owner: Address,
        request_id: u64,
        approve: bool,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &owner, Role::Owner)?;

        let request = get_request(&env, request_id)?;
        if request.is_processed {
            return Err(Error::RequestProcessed);
        }

        process(&env, &config, request, approve)
    }

    /// Reject a request whose voting period ended without approval
    pub fn expire_request(env: Env, request_id: u64) -> Result<(), Error> {
        let config = get_config(&env)?;

        let request = get_request(&env, request_id)?;
        if request.is_processed {
            return Err(Error::RequestProcessed);
        }
        if env.ledger().timestamp() <= request.deadline {
            return Err(Error::OutsideVotingPeriod);
        }

        process(&env, &config, request, false)
    }

    pub fn get_request(env: Env, request_id: u64) -> Result<ApprovalRequest, Error> {
        get_request(&env, request_id)
    }

    pub fn has_voted(env: Env, request_id: u64, delegator: Address) -> bool {
        has_voted(&env, request_id, &delegator)
    }

    // ==================== Cronjobs ====================

    /// Queue a registry check for `external_id`, due at `due`
    pub fn schedule_cronjob(
        env: Env,
        caller: Address,
        external_id: u64,
        job_type: CronjobType,
        due: u64,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &caller, Role::Project)?;

        schedule(&env, external_id, job_type, due);
        Ok(())
    }

    /// Run one due cronjob. Returns false when no job is due.
    ///
    /// The registry reports what to do with the job: retire it, extend it by
    /// the extension interval, or reschedule it at a given time.
    pub fn check_cronjobs(env: Env) -> Result<bool, Error> {
        let config = get_config(&env)?;
        let params = get_params(&env)?;
        let now = env.ledger().timestamp();

        let Some(job) = cronjob::take_due(&env, now) else {
            return Ok(false);
        };

        let outcome = RegistryClient::new(&env, &config.registry).check_cronjob(
            &env.current_contract_address(),
            &job.external_id,
            &job.job_type,
        );
        log!(&env, "cronjob checked", job.id, job.external_id);

        match outcome {
            CronjobOutcome::Retire => {}
            CronjobOutcome::Extend => {
                schedule(&env, job.external_id, job.job_type, now + params.extension_interval);
            }
            CronjobOutcome::Reschedule(due) => {
                schedule(&env, job.external_id, job.job_type, due);
            }
        }

        env.events()
            .publish((CRONJOB_RUN,), (job.id, job.external_id, outcome));

        Ok(true)
    }

    pub fn cronjob_list(env: Env) -> CronjobList {
        get_cronjob_list(&env)
    }

    pub fn get_cronjob(env: Env, id: u64) -> Result<CronjobNode, Error> {
        get_cronjob(&env, id).ok_or(Error::NotFound)
    }

    pub fn get_params(env: Env) -> Result<GovernanceParams, Error> {
        get_params(&env)
    }
}

/// Close a request and hand the decision to the registry
fn process(env: &Env, config: &SystemConfig, mut request: ApprovalRequest, approved: bool) -> Result<(), Error> {
    request.is_processed = true;
    request.is_approved = approved;
    set_request(env, &request);

    let job = RegistryClient::new(env, &config.registry).decide(
        &env.current_contract_address(),
        &request.subject_id,
        &request.is_milestone,
        &approved,
    );
    if let Some(job) = job {
        schedule(env, request.subject_id, job.job_type, job.due);
    }

    env.events()
        .publish((REQUEST_PROCESSED,), (request.id, request.subject_id, approved));

    Ok(())
}

fn schedule(env: &Env, external_id: u64, job_type: CronjobType, due: u64) {
    let id = cronjob::enqueue(env, external_id, job_type, due);
    env.events()
        .publish((CRONJOB_ADDED,), (id, external_id, job_type, due));
}
