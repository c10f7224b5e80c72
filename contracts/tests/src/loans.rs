use crate::setup::*;
use registry::{LoanStatus, Milestone};
use shared::errors::Error;
use shared::types::RequestKind;
use soroban_sdk::{vec, Address, Vec};

const INTERVAL: u64 = 30 * DAY;

fn personal_loan(m: &Marketplace, seeker: &Address) -> u64 {
    m.registry
        .request_personal_loan(seeker, &m.terms(10_000, 5_000), &m.ipfs())
}

/// A personal loan funded 60/40 by two lenders
fn funded_loan(m: &Marketplace) -> (u64, Address, Address, Address) {
    let seeker = m.seeker();
    let id = personal_loan(m, &seeker);
    m.decide(1, true);

    let first = m.lender(0);
    let second = m.lender(0);
    m.registry.fund_loan(&first, &id, &60);
    m.registry.fund_loan(&second, &id, &40);
    (id, seeker, first, second)
}

fn milestones(m: &Marketplace) -> Vec<Milestone> {
    vec![
        &m.env,
        Milestone {
            amount: 6_000,
            duration: 10 * DAY,
        },
        Milestone {
            amount: 4_000,
            duration: 10 * DAY,
        },
    ]
}

fn project_loan(m: &Marketplace) -> (u64, Address, Address) {
    let seeker = m.seeker();
    let id = m.registry.request_project_loan(
        &seeker,
        &m.terms(10_000, 5_000),
        &milestones(m),
        &m.ipfs(),
    );
    m.decide(1, true);

    let lender = m.lender(0);
    m.registry.fund_loan(&lender, &id, &100);
    (id, seeker, lender)
}

#[test]
fn test_personal_loan_lifecycle() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let collateral_before = m.collateral.balance(&seeker);
    let id = personal_loan(&m, &seeker);
    assert_eq!(m.registry.request_kind(&id), RequestKind::PersonalLoan);
    assert_eq!(m.collateral.balance(&m.config.escrow), 5_000);

    m.decide(1, true);
    let first = m.lender(0);
    let second = m.lender(0);

    m.registry.fund_loan(&first, &id, &60);
    let result = m.registry.try_fund_loan(&second, &id, &41);
    assert_eq!(result, Err(Ok(Error::PartitionsExceeded)));
    let result = m.registry.try_fund_loan(&second, &id, &0);
    assert_eq!(result, Err(Ok(Error::ZeroPartitions)));

    let wallet_before = m.lending.balance(&seeker);
    m.registry.fund_loan(&second, &id, &40);

    let loan = m.registry.get_loan(&id);
    assert_eq!(loan.status, LoanStatus::Started);
    assert_eq!(loan.next_deadline, m.now() + INTERVAL);
    assert_eq!(m.lending.balance(&seeker), wallet_before + 10_000);
    assert_eq!(m.registry.get_position(&id, &first).partitions, 60);
    assert_eq!(m.registry.loan_total_due(&id), 11_000);

    let result = m.registry.try_fund_loan(&second, &id, &1);
    assert_eq!(result, Err(Ok(Error::NotFundable)));

    assert_eq!(m.registry.execute_payment(&seeker, &id), 5_500);
    assert_eq!(m.registry.receive_payments(&first, &id), 3_300);
    assert_eq!(m.registry.receive_payments(&second, &id), 2_200);
    let result = m.registry.try_receive_payments(&first, &id);
    assert_eq!(result, Err(Ok(Error::NothingToClaim)));

    // funding job retires, payment job moves to the next deadline
    m.advance(INTERVAL + 1);
    assert_eq!(m.drain_cronjobs(), 2);
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Started);

    assert_eq!(m.registry.execute_payment(&seeker, &id), 5_500);
    let loan = m.registry.get_loan(&id);
    assert_eq!(loan.status, LoanStatus::Settled);
    assert_eq!(loan.amount_repaid, 11_000);
    assert_eq!(m.collateral.balance(&seeker), collateral_before);
    assert_eq!(m.collateral.balance(&m.config.escrow), 0);

    let result = m.registry.try_execute_payment(&seeker, &id);
    assert_eq!(result, Err(Ok(Error::NotAwaitingRepayment)));

    assert_eq!(m.registry.receive_payments(&first, &id), 3_300);
    assert_eq!(m.registry.receive_payments(&second, &id), 2_200);
    assert_eq!(m.escrow.get_account(&id).lending_available(), 0);
}

#[test]
fn test_missed_payment_defaults_and_liquidates() {
    let m = Marketplace::new();
    let (id, seeker, first, second) = funded_loan(&m);
    let stranger = m.lender(0);

    let result = m.registry.try_execute_payment(&stranger, &id);
    assert_eq!(result, Err(Ok(Error::OnlySeeker)));

    m.advance(INTERVAL + 1);
    let result = m.registry.try_execute_payment(&seeker, &id);
    assert_eq!(result, Err(Ok(Error::OutsideRepaymentTimeframe)));

    let result = m.registry.try_liquidate_loan(&first, &id);
    assert_eq!(result, Err(Ok(Error::NotDefaulted)));

    assert_eq!(m.drain_cronjobs(), 2);
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Default);
    assert_eq!(m.governance.cronjob_list().size, 0);

    let result = m.registry.try_claim_collateral(&first, &id);
    assert_eq!(result, Err(Ok(Error::NotDefaulted)));
    let result = m.registry.try_liquidate_loan(&stranger, &id);
    assert_eq!(result, Err(Ok(Error::OnlyLender)));

    m.registry.liquidate_loan(&first, &id);
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Liquidated);

    assert_eq!(m.registry.claim_collateral(&first, &id), (3_000, 0));
    assert_eq!(m.registry.claim_collateral(&second, &id), (2_000, 0));
    assert_eq!(m.collateral.balance(&first), 3_000);
    assert_eq!(m.collateral.balance(&second), 2_000);

    let result = m.registry.try_claim_collateral(&first, &id);
    assert_eq!(result, Err(Ok(Error::AlreadyClaimed)));
    assert_eq!(m.escrow.get_account(&id).collateral_available(), 0);
}

#[test]
fn test_unfunded_loan_is_rejected_at_deadline() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let wallet_before = m.collateral.balance(&seeker);
    let id = personal_loan(&m, &seeker);
    m.decide(1, true);

    let lender = m.lender(0);
    m.registry.fund_loan(&lender, &id, &30);
    let result = m.registry.try_withdraw_unfunded(&lender, &id);
    assert_eq!(result, Err(Ok(Error::NotRejected)));

    m.advance(FUNDING_TIMEFRAME + 1);
    let result = m.registry.try_fund_loan(&lender, &id, &70);
    assert_eq!(result, Err(Ok(Error::OutsideFundingTimeframe)));

    assert_eq!(m.drain_cronjobs(), 1);
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Rejected);
    assert_eq!(m.collateral.balance(&seeker), wallet_before);

    let wallet = m.lending.balance(&lender);
    assert_eq!(m.registry.withdraw_unfunded(&lender, &id), 3_000);
    assert_eq!(m.lending.balance(&lender), wallet + 3_000);

    let result = m.registry.try_withdraw_unfunded(&lender, &id);
    assert_eq!(result, Err(Ok(Error::AlreadyWithdrawn)));
    let stranger = m.lender(0);
    let result = m.registry.try_withdraw_unfunded(&stranger, &id);
    assert_eq!(result, Err(Ok(Error::OnlyLender)));

    assert_eq!(m.escrow.get_account(&id).lending_available(), 0);
}

#[test]
fn test_rejected_loan_returns_collateral() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let wallet_before = m.collateral.balance(&seeker);
    let id = personal_loan(&m, &seeker);

    m.decide(1, false);

    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Rejected);
    assert_eq!(m.collateral.balance(&seeker), wallet_before);
    assert_eq!(m.governance.cronjob_list().size, 0);

    let lender = m.lender(0);
    let result = m.registry.try_fund_loan(&lender, &id, &1);
    assert_eq!(result, Err(Ok(Error::NotFundable)));
}

#[test]
fn test_loan_terms_are_validated() {
    let m = Marketplace::new();
    let seeker = m.seeker();

    let mut terms = m.terms(10_000, 5_000);
    terms.payment_batches = 0;
    let result = m.registry.try_request_personal_loan(&seeker, &terms, &m.ipfs());
    assert_eq!(result, Err(Ok(Error::InvalidPaymentBatches)));

    let terms = m.terms(10_050, 5_000);
    let result = m.registry.try_request_personal_loan(&seeker, &terms, &m.ipfs());
    assert_eq!(result, Err(Ok(Error::NonIntegerPartitions)));

    let terms = m.terms(10_000, 0);
    let result = m.registry.try_request_personal_loan(&seeker, &terms, &m.ipfs());
    assert_eq!(result, Err(Ok(Error::ZeroAmount)));

    let terms = m.terms(12_000, 5_000);
    let result = m
        .registry
        .try_request_project_loan(&seeker, &terms, &milestones(&m), &m.ipfs());
    assert_eq!(result, Err(Ok(Error::InvalidMilestones)));

    let result = m
        .registry
        .try_request_project_loan(&seeker, &terms, &Vec::new(&m.env), &m.ipfs());
    assert_eq!(result, Err(Ok(Error::InvalidMilestones)));
}

#[test]
fn test_project_loan_releases_milestones() {
    let m = Marketplace::new();
    let (id, seeker, _) = project_loan(&m);
    assert_eq!(m.registry.request_kind(&id), RequestKind::ProjectLoan);
    let wallet = m.lending.balance(&seeker);

    let loan = m.registry.get_loan(&id);
    assert_eq!(loan.status, LoanStatus::AwaitingMilestoneApplication);
    assert_eq!(loan.next_deadline, m.now() + 10 * DAY);

    let request_id = m.registry.apply_milestone(&seeker, &id);
    assert_eq!(request_id, 2);
    assert!(m.governance.get_request(&request_id).is_milestone);
    assert_eq!(
        m.registry.get_loan(&id).status,
        LoanStatus::AwaitingMilestoneApproval
    );
    let result = m.registry.try_apply_milestone(&seeker, &id);
    assert_eq!(result, Err(Ok(Error::NotAwaitingMilestone)));

    m.decide(request_id, true);
    let loan = m.registry.get_loan(&id);
    assert_eq!(loan.status, LoanStatus::AwaitingMilestoneApplication);
    assert_eq!(loan.current_milestone, 1);
    assert_eq!(m.lending.balance(&seeker), wallet + 6_000);

    let request_id = m.registry.apply_milestone(&seeker, &id);
    m.decide(request_id, false);
    let loan = m.registry.get_loan(&id);
    assert_eq!(loan.status, LoanStatus::AwaitingMilestoneApplication);
    assert_eq!(loan.current_milestone, 1);
    assert_eq!(m.lending.balance(&seeker), wallet + 6_000);

    let request_id = m.registry.apply_milestone(&seeker, &id);
    m.decide(request_id, true);
    let loan = m.registry.get_loan(&id);
    assert_eq!(loan.status, LoanStatus::AwaitingRepayment);
    assert_eq!(loan.next_deadline, m.now() + INTERVAL);
    assert_eq!(m.lending.balance(&seeker), wallet + 10_000);

    assert_eq!(m.registry.execute_payment(&seeker, &id), 5_500);
}

#[test]
fn test_missed_milestone_deadline_defaults() {
    let m = Marketplace::new();
    let (id, seeker, _) = project_loan(&m);

    m.advance(10 * DAY + 1);
    let result = m.registry.try_apply_milestone(&seeker, &id);
    assert_eq!(result, Err(Ok(Error::OutsideMilestoneTimeframe)));

    assert_eq!(m.drain_cronjobs(), 2);
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Default);
}

#[test]
fn test_liquidated_project_loan_refunds_unreleased_milestones() {
    let m = Marketplace::new();
    let (id, seeker, lender) = project_loan(&m);

    let request_id = m.registry.apply_milestone(&seeker, &id);
    m.decide(request_id, true);
    assert_eq!(m.escrow.get_account(&id).lending_available(), 4_000);

    m.advance(10 * DAY + 1);
    m.drain_cronjobs();
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Default);
    m.registry.liquidate_loan(&lender, &id);

    let wallet = m.lending.balance(&lender);
    assert_eq!(m.registry.claim_collateral(&lender, &id), (5_000, 4_000));
    assert_eq!(m.lending.balance(&lender), wallet + 4_000);
    assert_eq!(m.collateral.balance(&lender), 5_000);

    let account = m.escrow.get_account(&id);
    assert_eq!(account.lending_available(), 0);
    assert_eq!(account.collateral_available(), 0);
}

#[test]
fn test_pending_milestone_vote_keeps_the_job_alive() {
    let m = Marketplace::new();
    let (id, seeker, _) = project_loan(&m);
    let request_id = m.registry.apply_milestone(&seeker, &id);

    m.advance(10 * DAY + 1);
    assert_eq!(m.drain_cronjobs(), 2);
    assert_eq!(
        m.registry.get_loan(&id).status,
        LoanStatus::AwaitingMilestoneApproval
    );
    assert_eq!(m.governance.cronjob_list().size, 1);

    m.decide(request_id, false);
    m.advance(EXTENSION);
    assert_eq!(m.drain_cronjobs(), 1);
    assert_eq!(m.registry.get_loan(&id).status, LoanStatus::Default);
}
