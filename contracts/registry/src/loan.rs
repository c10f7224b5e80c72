use shared::constants::BASIS_POINTS;
use shared::errors::Error;
use shared::events::*;
use shared::interfaces::{EscrowClient, GovernanceClient};
use shared::types::{Amount, CronjobOutcome, CronjobType, RequestKind, ScheduledJob, SystemConfig};
use soroban_sdk::{Address, Env, String, Vec};

use crate::storage::*;
use crate::types::{LenderPosition, Loan, LoanStatus, LoanTerms, Milestone};
use crate::validation::{partitions_amount, validate_milestones, validate_terms};

/// Open a personal or project loan request and lock its collateral
pub fn request(
    env: &Env,
    seeker: Address,
    kind: RequestKind,
    terms: LoanTerms,
    milestones: Vec<Milestone>,
    ipfs_hash: String,
) -> Result<u64, Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;
    seeker.require_auth();

    let partitions = validate_terms(&terms, params.base_amount)?;
    match kind {
        RequestKind::ProjectLoan => validate_milestones(&milestones, terms.amount_requested)?,
        RequestKind::PersonalLoan => {}
        RequestKind::Investment => return Err(Error::InvalidInput),
    }

    let id = next_id(env);
    let loan = Loan {
        id,
        kind,
        seeker: seeker.clone(),
        terms: terms.clone(),
        milestones,
        total_partitions: partitions,
        partitions_purchased: 0,
        status: LoanStatus::Requested,
        ipfs_hash,
        approval_date: 0,
        starting_date: 0,
        next_deadline: 0,
        batches_paid: 0,
        current_milestone: 0,
        amount_repaid: 0,
    };
    set_loan(env, &loan);
    set_kind(env, id, kind);

    let this = env.current_contract_address();
    let escrow = EscrowClient::new(env, &config.escrow);
    escrow.open_account(&this, &id, &terms.lending_token, &terms.collateral_token);
    escrow.deposit_collateral(&this, &id, &seeker, &terms.collateral_amount);

    GovernanceClient::new(env, &config.governance).request_approval(&this, &id, &false);

    env.events().publish(
        (LOAN_REQUESTED,),
        (id, seeker, kind, terms.amount_requested),
    );

    Ok(id)
}

/// Apply a governance decision on a loan request
pub fn decide(
    env: &Env,
    config: &SystemConfig,
    funding_timeframe: u64,
    id: u64,
    approved: bool,
) -> Result<Option<ScheduledJob>, Error> {
    let mut loan = get_loan(env, id)?;
    if loan.status != LoanStatus::Requested {
        return Err(Error::AlreadyDecided);
    }

    env.events().publish((REQUEST_DECIDED,), (id, approved));

    let now = env.ledger().timestamp();
    if approved {
        loan.status = LoanStatus::Approved;
        loan.approval_date = now;
        set_loan(env, &loan);

        return Ok(Some(ScheduledJob {
            job_type: CronjobType::LoanFunding,
            due: now + funding_timeframe + 1,
        }));
    }

    loan.status = LoanStatus::Rejected;
    set_loan(env, &loan);
    return_collateral(env, config, &loan);

    Ok(None)
}

/// Apply a governance decision on the pending milestone of a project loan
pub fn decide_milestone(
    env: &Env,
    config: &SystemConfig,
    id: u64,
    approved: bool,
) -> Result<Option<ScheduledJob>, Error> {
    let mut loan = get_loan(env, id)?;
    if loan.status != LoanStatus::AwaitingMilestoneApproval {
        return Err(Error::AlreadyDecided);
    }

    env.events().publish((REQUEST_DECIDED,), (id, approved));

    if !approved {
        loan.status = LoanStatus::AwaitingMilestoneApplication;
        set_loan(env, &loan);
        return Ok(None);
    }

    let milestone = loan
        .milestones
        .get(loan.current_milestone)
        .ok_or(Error::NotFound)?;
    let now = env.ledger().timestamp();

    loan.current_milestone += 1;
    let job_type = match loan.milestones.get(loan.current_milestone) {
        Some(next) => {
            loan.status = LoanStatus::AwaitingMilestoneApplication;
            loan.next_deadline = now + next.duration;
            CronjobType::LoanMilestone
        }
        None => {
            loan.status = LoanStatus::AwaitingRepayment;
            loan.next_deadline = now + loan.terms.batch_interval;
            CronjobType::LoanPayment
        }
    };
    set_loan(env, &loan);

    EscrowClient::new(env, &config.escrow).release_lending(
        &env.current_contract_address(),
        &id,
        &loan.seeker,
        &milestone.amount,
    );

    env.events().publish(
        (MILESTONE_RELEASED,),
        (id, loan.current_milestone, milestone.amount),
    );

    Ok(Some(ScheduledJob {
        job_type,
        due: watch_after(loan.next_deadline),
    }))
}

pub fn fund(env: &Env, lender: Address, id: u64, partitions: u64) -> Result<(), Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;
    lender.require_auth();

    let mut loan = get_loan(env, id)?;
    if loan.status != LoanStatus::Approved {
        return Err(Error::NotFundable);
    }
    if env.ledger().timestamp() > loan.approval_date + params.funding_timeframe {
        return Err(Error::OutsideFundingTimeframe);
    }
    if partitions == 0 {
        return Err(Error::ZeroPartitions);
    }
    if partitions > loan.total_partitions - loan.partitions_purchased {
        return Err(Error::PartitionsExceeded);
    }

    let amount = partitions_amount(partitions, params.base_amount)?;
    let this = env.current_contract_address();
    EscrowClient::new(env, &config.escrow).deposit_lending(&this, &id, &lender, &amount);

    let mut position = get_position(env, id, &lender);
    position.partitions += partitions;
    set_position(env, id, &lender, &position);

    loan.partitions_purchased += partitions;
    env.events()
        .publish((LOAN_FUNDED,), (id, lender, partitions, amount));

    if loan.partitions_purchased == loan.total_partitions {
        start(env, &config, &mut loan)?;
    }
    set_loan(env, &loan);

    Ok(())
}

/// Disburse a fully funded loan and put its first deadline under watch
fn start(env: &Env, config: &SystemConfig, loan: &mut Loan) -> Result<(), Error> {
    let now = env.ledger().timestamp();
    let this = env.current_contract_address();
    loan.starting_date = now;

    let job_type = match loan.kind {
        RequestKind::PersonalLoan => {
            loan.status = LoanStatus::Started;
            loan.next_deadline = now + loan.terms.batch_interval;
            EscrowClient::new(env, &config.escrow).release_lending(
                &this,
                &loan.id,
                &loan.seeker,
                &loan.terms.amount_requested,
            );
            CronjobType::LoanPayment
        }
        RequestKind::ProjectLoan => {
            let first = loan.milestones.get(0).ok_or(Error::InvalidMilestones)?;
            loan.status = LoanStatus::AwaitingMilestoneApplication;
            loan.next_deadline = now + first.duration;
            CronjobType::LoanMilestone
        }
        RequestKind::Investment => return Err(Error::InvalidInput),
    };

    GovernanceClient::new(env, &config.governance).schedule_cronjob(
        &this,
        &loan.id,
        &job_type,
        &watch_after(loan.next_deadline),
    );

    env.events()
        .publish((LOAN_STARTED,), (loan.id, loan.status, loan.next_deadline));

    Ok(())
}

pub fn apply_milestone(env: &Env, seeker: Address, id: u64) -> Result<u64, Error> {
    let config = get_config(env)?;
    seeker.require_auth();

    let mut loan = get_loan(env, id)?;
    if loan.seeker != seeker {
        return Err(Error::OnlySeeker);
    }
    if loan.status != LoanStatus::AwaitingMilestoneApplication {
        return Err(Error::NotAwaitingMilestone);
    }
    if env.ledger().timestamp() > loan.next_deadline {
        return Err(Error::OutsideMilestoneTimeframe);
    }

    loan.status = LoanStatus::AwaitingMilestoneApproval;
    set_loan(env, &loan);

    let request_id = GovernanceClient::new(env, &config.governance).request_approval(
        &env.current_contract_address(),
        &id,
        &true,
    );

    env.events()
        .publish((MILESTONE_APPLIED,), (id, loan.current_milestone, request_id));

    Ok(request_id)
}

/// Pay the next repayment batch. Returns the amount paid.
pub fn execute_payment(env: &Env, seeker: Address, id: u64) -> Result<Amount, Error> {
    let config = get_config(env)?;
    seeker.require_auth();

    let mut loan = get_loan(env, id)?;
    if loan.seeker != seeker {
        return Err(Error::OnlySeeker);
    }
    if !matches!(loan.status, LoanStatus::Started | LoanStatus::AwaitingRepayment) {
        return Err(Error::NotAwaitingRepayment);
    }
    if env.ledger().timestamp() > loan.next_deadline {
        return Err(Error::OutsideRepaymentTimeframe);
    }

    let total_due = total_due(&loan.terms)?;
    let batches = Amount::from(loan.terms.payment_batches);
    let batch = if loan.batches_paid + 1 == loan.terms.payment_batches {
        total_due - loan.amount_repaid
    } else {
        total_due / batches
    };

    let this = env.current_contract_address();
    let escrow = EscrowClient::new(env, &config.escrow);
    escrow.deposit_lending(&this, &id, &seeker, &batch);

    loan.amount_repaid += batch;
    loan.batches_paid += 1;

    if loan.batches_paid == loan.terms.payment_batches {
        loan.status = LoanStatus::Settled;
        set_loan(env, &loan);
        escrow.release_collateral(&this, &id, &seeker, &loan.terms.collateral_amount);
    } else {
        loan.next_deadline += loan.terms.batch_interval;
        set_loan(env, &loan);
    }

    env.events()
        .publish((PAYMENT_EXECUTED,), (id, loan.batches_paid, batch));

    Ok(batch)
}

/// Pay a lender its share of the repayments received so far
pub fn receive_payments(env: &Env, lender: Address, id: u64) -> Result<Amount, Error> {
    let config = get_config(env)?;
    lender.require_auth();

    let loan = get_loan(env, id)?;
    let mut position = require_position(env, id, &lender)?;

    let share = pro_rata(loan.amount_repaid, position.partitions, loan.total_partitions)?;
    let due = share - position.claimed_repayment;
    if due <= 0 {
        return Err(Error::NothingToClaim);
    }

    position.claimed_repayment = share;
    set_position(env, id, &lender, &position);

    EscrowClient::new(env, &config.escrow).release_lending(
        &env.current_contract_address(),
        &id,
        &lender,
        &due,
    );

    env.events().publish((PAYMENT_CLAIMED,), (id, lender, due));

    Ok(due)
}

/// Refund a lender of a loan that never got fully funded
pub fn withdraw_unfunded(env: &Env, lender: Address, id: u64) -> Result<Amount, Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;
    lender.require_auth();

    let loan = get_loan(env, id)?;
    if loan.status != LoanStatus::Rejected {
        return Err(Error::NotRejected);
    }
    let mut position = require_position(env, id, &lender)?;
    if position.refunded {
        return Err(Error::AlreadyWithdrawn);
    }

    let refund = partitions_amount(position.partitions, params.base_amount)?;
    position.refunded = true;
    set_position(env, id, &lender, &position);

    EscrowClient::new(env, &config.escrow).release_lending(
        &env.current_contract_address(),
        &id,
        &lender,
        &refund,
    );

    env.events().publish((NON_WON_REFUNDED,), (id, lender, refund));

    Ok(refund)
}

pub fn liquidate(env: &Env, lender: Address, id: u64) -> Result<(), Error> {
    get_config(env)?;
    lender.require_auth();

    let mut loan = get_loan(env, id)?;
    if loan.status != LoanStatus::Default {
        return Err(Error::NotDefaulted);
    }
    require_position(env, id, &lender)?;

    loan.status = LoanStatus::Liquidated;
    set_loan(env, &loan);

    env.events().publish((LOAN_LIQUIDATED,), (id, lender));

    Ok(())
}

/// Pay a lender its share of a liquidated loan's collateral, plus its share
/// of any principal a project loan never disbursed.
/// Returns `(collateral, principal)`.
pub fn claim_collateral(env: &Env, lender: Address, id: u64) -> Result<(Amount, Amount), Error> {
    let config = get_config(env)?;
    lender.require_auth();

    let loan = get_loan(env, id)?;
    if loan.status != LoanStatus::Liquidated {
        return Err(Error::NotDefaulted);
    }
    let mut position = require_position(env, id, &lender)?;
    if position.claimed_collateral {
        return Err(Error::AlreadyClaimed);
    }

    let share = pro_rata(
        loan.terms.collateral_amount,
        position.partitions,
        loan.total_partitions,
    )?;
    let principal = pro_rata(
        undisbursed(&loan)?,
        position.partitions,
        loan.total_partitions,
    )?;
    position.claimed_collateral = true;
    set_position(env, id, &lender, &position);

    let escrow = EscrowClient::new(env, &config.escrow);
    let this = env.current_contract_address();
    if share > 0 {
        escrow.release_collateral(&this, &id, &lender, &share);
    }
    if principal > 0 {
        escrow.release_lending(&this, &id, &lender, &principal);
    }

    env.events()
        .publish((COLLATERAL_CLAIMED,), (id, lender, share, principal));

    Ok((share, principal))
}

/// Principal still held in escrow: milestones a project loan never released
fn undisbursed(loan: &Loan) -> Result<Amount, Error> {
    if loan.kind != RequestKind::ProjectLoan {
        return Ok(0);
    }
    let mut total: Amount = 0;
    for index in loan.current_milestone..loan.milestones.len() {
        let milestone = loan.milestones.get(index).ok_or(Error::NotFound)?;
        total = total.checked_add(milestone.amount).ok_or(Error::Overflow)?;
    }
    Ok(total)
}

/// Decide what happens to a loan whose watched deadline came due
pub fn check_job(
    env: &Env,
    config: &SystemConfig,
    id: u64,
    job_type: CronjobType,
) -> Result<CronjobOutcome, Error> {
    let mut loan = get_loan(env, id)?;
    let now = env.ledger().timestamp();

    match (job_type, loan.status) {
        (CronjobType::LoanFunding, LoanStatus::Approved) => {
            loan.status = LoanStatus::Rejected;
            set_loan(env, &loan);
            return_collateral(env, config, &loan);
            Ok(CronjobOutcome::Retire)
        }
        (CronjobType::LoanPayment, LoanStatus::Started | LoanStatus::AwaitingRepayment) => {
            if now > loan.next_deadline {
                mark_default(env, &mut loan);
                Ok(CronjobOutcome::Retire)
            } else {
                Ok(CronjobOutcome::Reschedule(watch_after(loan.next_deadline)))
            }
        }
        (CronjobType::LoanMilestone, LoanStatus::AwaitingMilestoneApplication) => {
            if now > loan.next_deadline {
                mark_default(env, &mut loan);
            }
            Ok(CronjobOutcome::Retire)
        }
        // a pending vote decides; keep watching in case it rejects
        (CronjobType::LoanMilestone, LoanStatus::AwaitingMilestoneApproval) => {
            Ok(CronjobOutcome::Extend)
        }
        _ => Ok(CronjobOutcome::Retire),
    }
}

fn mark_default(env: &Env, loan: &mut Loan) {
    loan.status = LoanStatus::Default;
    set_loan(env, loan);
    env.events()
        .publish((LOAN_DEFAULTED,), (loan.id, loan.next_deadline));
}

fn return_collateral(env: &Env, config: &SystemConfig, loan: &Loan) {
    EscrowClient::new(env, &config.escrow).release_collateral(
        &env.current_contract_address(),
        &loan.id,
        &loan.seeker,
        &loan.terms.collateral_amount,
    );
}

fn require_position(env: &Env, id: u64, lender: &Address) -> Result<LenderPosition, Error> {
    let position = get_position(env, id, lender);
    if position.partitions == 0 {
        return Err(Error::OnlyLender);
    }
    Ok(position)
}

/// Principal plus interest owed over the whole loan
pub fn total_due(terms: &LoanTerms) -> Result<Amount, Error> {
    let interest = terms
        .amount_requested
        .checked_mul(Amount::from(terms.interest_bps))
        .ok_or(Error::Overflow)?
        / BASIS_POINTS;
    terms
        .amount_requested
        .checked_add(interest)
        .ok_or(Error::Overflow)
}

fn pro_rata(amount: Amount, partitions: u64, total_partitions: u64) -> Result<Amount, Error> {
    Ok(amount
        .checked_mul(Amount::from(partitions))
        .ok_or(Error::Overflow)?
        / Amount::from(total_partitions))
}

/// Jobs come due strictly after the deadline they watch
fn watch_after(deadline: u64) -> u64 {
    deadline + 1
}
