use crate::setup::*;
use registry::InvestmentStatus;
use shared::errors::Error;
use shared::types::{CronjobType, RequestKind};

#[test]
fn test_request_investment_locks_collateral() {
    let m = Marketplace::new();
    let seeker = m.seeker();

    let id = m.request_investment(&seeker, 60_000, 30_000);

    let investment = m.registry.get_investment(&id);
    assert_eq!(investment.total_partitions, 300);
    assert_eq!(investment.investment_tokens_per_ticket, 200);
    assert_eq!(investment.status, InvestmentStatus::Requested);
    assert_eq!(m.registry.request_kind(&id), RequestKind::Investment);

    assert_eq!(m.escrow.get_account(&id).collateral_deposited, 60_000);
    assert_eq!(m.collateral.balance(&m.config.escrow), 60_000);
    assert_eq!(m.escrow.nft_supply(&id), 300);
    assert!(m.escrow.is_nft_paused(&id));

    let request = m.governance.get_request(&1);
    assert_eq!(request.subject_id, id);
    assert!(!request.is_milestone);
}

#[test]
fn test_request_must_split_into_whole_tickets() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let request = |token_amount: i128, amount: i128| {
        m.registry.try_request_investment(
            &seeker,
            &m.collateral.address(),
            &token_amount,
            &m.lending.address(),
            &amount,
            &m.ipfs(),
        )
    };

    assert_eq!(request(60_000, 30_050), Err(Ok(Error::NonIntegerPartitions)));
    assert_eq!(request(60_001, 30_000), Err(Ok(Error::NonIntegerPartitions)));
    assert_eq!(request(60_000, 0), Err(Ok(Error::ZeroAmount)));

    let id = request(60_000, 30_000).unwrap().unwrap();
    assert_eq!(m.registry.get_investment(&id).total_partitions, 300);
}

#[test]
fn test_interest_requires_reputation() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 60_000, 30_000);
    let lender = m.lender(0);

    let result = m.registry.try_show_interest(&lender, &id, &5);
    assert_eq!(result, Err(Ok(Error::NotApproved)));

    m.decide(1, true);
    let result = m.registry.try_show_interest(&lender, &id, &0);
    assert_eq!(result, Err(Ok(Error::ZeroPartitions)));
    let result = m.registry.try_show_interest(&lender, &id, &5);
    assert_eq!(result, Err(Ok(Error::NotEligible)));

    m.stake_token.admin.mint(&lender, &STAKING_AMOUNTS[1]);
    m.staking.stake(&lender, &1);
    assert_eq!(m.escrow.reputational_balance(&lender), REPUTATION_AMOUNTS[1]);

    let numbers_before = m.registry.get_lottery(&id).total_lottery_numbers;
    let wallet_before = m.lending.balance(&lender);
    m.registry.show_interest(&lender, &id, &5);

    let lottery = m.registry.get_lottery(&id);
    let entry = m.registry.get_lottery_entry(&id, &lender);
    assert_eq!(
        lottery.total_lottery_numbers - numbers_before,
        (REPUTATION_AMOUNTS[1] / RALBT_PER_NUMBER) as u64
    );
    assert_eq!(entry.lottery_numbers, 10);
    assert_eq!(entry.remaining_tickets, 5);
    assert_eq!(m.escrow.reputational_balance(&lender), 0);

    assert_eq!(m.lending.balance(&lender), wallet_before - 5 * BASE_AMOUNT);
    assert_eq!(m.escrow.get_account(&id).lending_deposited, 5 * BASE_AMOUNT);
    assert_eq!(m.registry.get_investment(&id).partitions_requested, 5);
}

#[test]
fn test_restaking_does_not_refill_spent_reputation() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let first = m.request_investment(&seeker, 60_000, 30_000);
    let second = m.request_investment(&seeker, 60_000, 30_000);
    m.decide(1, true);
    m.decide(2, true);

    let lender = m.lender(1);
    m.registry.show_interest(&lender, &first, &5);
    assert_eq!(m.escrow.reputational_balance(&lender), 0);

    m.staking.exit(&lender);
    m.staking.stake(&lender, &1);
    assert_eq!(m.escrow.reputational_balance(&lender), 0);

    let result = m.registry.try_show_interest(&lender, &second, &5);
    assert_eq!(result, Err(Ok(Error::NotEligible)));
}

#[test]
fn test_three_lenders_fill_a_3000_ticket_pool() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 3_000_000, 300_000);
    m.decide(1, true);

    let lenders = [m.lender(1), m.lender(1), m.lender(3)];
    for (lender, partitions) in lenders.iter().zip([900u64, 900, 1_200]) {
        m.registry.show_interest(lender, &id, &partitions);
    }
    // 150 numbers at tier 3 buy two tickets outright
    assert_eq!(m.registry.get_investment(&id).partitions_purchased, 2);
    let lottery = m.registry.get_lottery(&id);
    assert_eq!(lottery.participant_count, 3);
    assert_eq!(lottery.outstanding_tickets, 2_998);
    assert_eq!(lottery.pooled_numbers, 10 + 10 + 50);

    assert!(!m.governance.check_cronjobs());
    m.advance(LOTTERY_DELAY);
    assert!(m.governance.check_cronjobs());
    assert_eq!(m.registry.get_investment(&id).status, InvestmentStatus::Started);

    let awarded = m.registry.execute_lottery_run(&id);
    assert_eq!(awarded, 2_998);

    let investment = m.registry.get_investment(&id);
    assert_eq!(investment.status, InvestmentStatus::Settled);
    assert_eq!(investment.partitions_purchased, 3_000);
    let lottery = m.registry.get_lottery(&id);
    assert_eq!(lottery.tickets_remaining, 0);
    assert_eq!((lottery.outstanding_tickets, lottery.pooled_numbers), (0, 0));

    let won: u64 = lenders
        .iter()
        .map(|lender| m.registry.get_lottery_entry(&id, lender).tickets_won)
        .sum();
    assert_eq!(won, 3_000);
    assert!(!m.escrow.is_nft_paused(&id));

    let result = m.registry.try_execute_lottery_run(&id);
    assert_eq!(result, Err(Ok(Error::NotStarted)));
}

#[test]
fn test_no_interest_extends_the_cronjob() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 60_000, 30_000);
    m.decide(1, true);
    m.advance(LOTTERY_DELAY);

    let before = m.governance.cronjob_list();
    assert_eq!(before.size, 1);
    assert!(m.governance.check_cronjobs());

    let after = m.governance.cronjob_list();
    assert_eq!(after.size, 1);
    assert_eq!(after.head, before.head + 1);

    let job = m.governance.get_cronjob(&after.head);
    assert_eq!(job.external_id, id);
    assert_eq!(job.job_type, CronjobType::InvestmentLottery);
    assert_eq!(job.due, m.now() + EXTENSION);
    assert_eq!(m.registry.get_investment(&id).status, InvestmentStatus::Approved);

    let result = m.registry.try_execute_lottery_run(&id);
    assert_eq!(result, Err(Ok(Error::NotStarted)));
}

#[test]
fn test_draws_then_refunds_balance_the_escrow() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 10_000, 1_000);
    m.decide(1, true);

    let lenders = [m.lender(1), m.lender(2)];
    for lender in lenders.iter() {
        m.registry.show_interest(lender, &id, &8);
    }
    m.advance(LOTTERY_DELAY);
    m.drain_cronjobs();

    assert_eq!(m.registry.execute_lottery_run(&id), 10);
    assert_eq!(m.registry.get_investment(&id).status, InvestmentStatus::Settled);

    let entries = [
        m.registry.get_lottery_entry(&id, &lenders[0]),
        m.registry.get_lottery_entry(&id, &lenders[1]),
    ];
    assert_eq!(entries[0].tickets_won + entries[1].tickets_won, 10);
    assert_eq!(entries[0].remaining_tickets + entries[1].remaining_tickets, 6);
    assert_eq!(m.escrow.get_account(&id).lending_deposited, 16 * BASE_AMOUNT);

    for (lender, entry) in lenders.iter().zip(entries.iter()) {
        if entry.remaining_tickets == 0 {
            let result = m.registry.try_withdraw_non_won_amount(lender, &id);
            assert_eq!(result, Err(Ok(Error::NoNonWonTickets)));
            continue;
        }
        let refund = m.registry.withdraw_non_won_amount(lender, &id);
        assert_eq!(refund, entry.remaining_tickets as i128 * BASE_AMOUNT);
        let result = m.registry.try_withdraw_non_won_amount(lender, &id);
        assert_eq!(result, Err(Ok(Error::NoNonWonTickets)));
    }

    let lottery = m.registry.get_lottery(&id);
    assert_eq!((lottery.outstanding_tickets, lottery.pooled_numbers), (0, 0));

    let result = m.registry.try_withdraw_investment(&lenders[0], &id);
    assert_eq!(result, Err(Ok(Error::OnlySeeker)));

    let wallet_before = m.lending.balance(&seeker);
    assert_eq!(m.registry.withdraw_investment(&seeker, &id), 1_000);
    assert_eq!(m.lending.balance(&seeker), wallet_before + 1_000);

    let result = m.registry.try_withdraw_investment(&seeker, &id);
    assert_eq!(result, Err(Ok(Error::AlreadyWithdrawn)));
    assert_eq!(m.lending.balance(&seeker), wallet_before + 1_000);

    assert_eq!(m.escrow.get_account(&id).lending_available(), 0);
    assert_eq!(m.lending.balance(&m.config.escrow), 0);
}

#[test]
fn test_won_tickets_become_transferable_nfts() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 10_000, 1_000);
    m.decide(1, true);

    let first = m.lender(1);
    let second = m.lender(1);
    m.registry.show_interest(&first, &id, &4);
    m.registry.show_interest(&second, &id, &6);

    let result = m.registry.try_withdraw_investment_tickets(&first, &id, &0, &1);
    assert_eq!(result, Err(Ok(Error::NotSettled)));

    m.advance(LOTTERY_DELAY);
    m.drain_cronjobs();
    m.registry.execute_lottery_run(&id);
    assert_eq!(m.registry.get_lottery_entry(&id, &first).tickets_won, 4);

    m.registry.withdraw_investment_tickets(&first, &id, &1, &2);
    let entry = m.registry.get_lottery_entry(&id, &first);
    assert_eq!(entry.tickets_withdrawn, 3);
    assert_eq!(entry.locked_tickets, 1);
    assert_eq!(m.escrow.nft_balance(&id, &first), 2);

    let result = m.registry.try_withdraw_investment_tickets(&first, &id, &0, &2);
    assert_eq!(result, Err(Ok(Error::NotEnoughTicketsWon)));
    let result = m.registry.try_withdraw_investment_tickets(&first, &id, &0, &0);
    assert_eq!(result, Err(Ok(Error::ZeroAmount)));

    m.registry.unlock_investment_tickets(&first, &id, &1);
    assert_eq!(m.escrow.nft_balance(&id, &first), 3);
    let result = m.registry.try_unlock_investment_tickets(&first, &id, &1);
    assert_eq!(result, Err(Ok(Error::NotEnoughTicketsWon)));

    m.escrow.transfer_nft(&first, &second, &id, &1);
    assert_eq!(m.escrow.nft_balance(&id, &second), 1);

    assert_eq!(m.registry.convert_nft_to_tokens(&first, &id, &2), 2_000);
    assert_eq!(m.collateral.balance(&first), 2_000);
    assert_eq!(m.escrow.nft_balance(&id, &first), 0);

    let result = m.registry.try_convert_nft_to_tokens(&first, &id, &0);
    assert_eq!(result, Err(Ok(Error::ZeroNftAmount)));
    let result = m.registry.try_convert_nft_to_tokens(&second, &id, &5);
    assert_eq!(result, Err(Ok(Error::NotEnoughNft)));
}

#[test]
fn test_immediate_tickets_can_fill_the_supply() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 2_000, 200);
    m.decide(1, true);

    let whale = m.lender(3);
    m.registry.show_interest(&whale, &id, &2);

    let entry = m.registry.get_lottery_entry(&id, &whale);
    assert_eq!(entry.tickets_won, 2);
    assert_eq!(entry.remaining_tickets, 0);
    assert_eq!(m.registry.get_lottery(&id).tickets_remaining, 0);
    assert_eq!(m.escrow.reputational_balance(&whale), 0);

    m.advance(LOTTERY_DELAY);
    m.drain_cronjobs();
    assert_eq!(m.registry.get_investment(&id).status, InvestmentStatus::Settled);

    let result = m.registry.try_execute_lottery_run(&id);
    assert_eq!(result, Err(Ok(Error::NotStarted)));

    m.registry.withdraw_investment_tickets(&whale, &id, &0, &2);
    assert_eq!(m.escrow.nft_balance(&id, &whale), 2);
}

#[test]
fn test_rejected_investment_returns_collateral() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let wallet_before = m.collateral.balance(&seeker);
    let id = m.request_investment(&seeker, 60_000, 30_000);

    m.decide(1, false);

    assert_eq!(m.registry.get_investment(&id).status, InvestmentStatus::Rejected);
    assert_eq!(m.collateral.balance(&seeker), wallet_before);
    assert_eq!(m.escrow.nft_supply(&id), 0);
    assert_eq!(m.governance.cronjob_list().size, 0);

    let result = m
        .governance
        .try_super_vote_for_request(&m.config.owner, &1, &true);
    assert_eq!(result, Err(Ok(Error::RequestProcessed)));

    let lender = m.lender(1);
    let result = m.registry.try_show_interest(&lender, &id, &1);
    assert_eq!(result, Err(Ok(Error::NotApproved)));
}

#[test]
fn test_delegator_votes_approve_once() {
    let m = Marketplace::new();
    let seeker = m.seeker();
    let id = m.request_investment(&seeker, 60_000, 30_000);

    m.governance.vote_for_request(&m.delegators[0], &1, &true);
    assert_eq!(m.registry.get_investment(&id).status, InvestmentStatus::Requested);

    let result = m.governance.try_vote_for_request(&m.delegators[0], &1, &true);
    assert_eq!(result, Err(Ok(Error::AlreadyVoted)));

    m.governance.vote_for_request(&m.delegators[1], &1, &true);
    let investment = m.registry.get_investment(&id);
    assert_eq!(investment.status, InvestmentStatus::Approved);
    assert_eq!(investment.approval_date, m.now());

    let list = m.governance.cronjob_list();
    assert_eq!(list.size, 1);
    assert_eq!(m.governance.get_cronjob(&list.head).due, m.now() + LOTTERY_DELAY);

    let result = m.governance.try_vote_for_request(&m.delegators[0], &1, &false);
    assert_eq!(result, Err(Ok(Error::RequestProcessed)));
}
