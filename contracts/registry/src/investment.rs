use shared::errors::Error;
use shared::events::*;
use shared::interfaces::{EscrowClient, GovernanceClient};
use shared::random::LedgerRandom;
use shared::types::{Amount, CronjobOutcome, CronjobType, RequestKind, ScheduledJob, SystemConfig};
use soroban_sdk::{log, Address, Env, Map, String};

use crate::lottery::{self, Entries};
use crate::storage::*;
use crate::types::{Investment, InvestmentStatus, LotteryEntry, LotteryState, RegistryParams};
use crate::validation::{partitions_amount, partitions_for, tokens_per_ticket};

pub fn request(
    env: &Env,
    seeker: Address,
    investment_token: Address,
    token_amount: Amount,
    lending_token: Address,
    amount_requested: Amount,
    ipfs_hash: String,
) -> Result<u64, Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;
    seeker.require_auth();

    let partitions = partitions_for(amount_requested, params.base_amount)?;
    let per_ticket = tokens_per_ticket(token_amount, partitions)?;

    let id = next_id(env);
    let investment = Investment {
        id,
        seeker: seeker.clone(),
        investment_token: investment_token.clone(),
        investment_token_amount: token_amount,
        lending_token: lending_token.clone(),
        total_amount_requested: amount_requested,
        total_partitions: partitions,
        investment_tokens_per_ticket: per_ticket,
        partitions_requested: 0,
        partitions_purchased: 0,
        status: InvestmentStatus::Requested,
        ipfs_hash,
        approval_date: 0,
        start_date: 0,
        seeker_withdrawn: false,
    };
    set_investment(env, &investment);
    set_kind(env, id, RequestKind::Investment);
    set_lottery(
        env,
        id,
        &LotteryState {
            tickets_remaining: partitions,
            ..Default::default()
        },
    );

    let this = env.current_contract_address();
    let escrow = EscrowClient::new(env, &config.escrow);
    escrow.open_account(&this, &id, &lending_token, &investment_token);
    escrow.deposit_collateral(&this, &id, &seeker, &token_amount);
    escrow.mint_funding_nft(&this, &id, &Amount::from(partitions));

    GovernanceClient::new(env, &config.governance).request_approval(&this, &id, &false);

    env.events().publish(
        (INVESTMENT_REQUESTED,),
        (id, seeker, amount_requested, partitions),
    );

    Ok(id)
}

/// Apply a governance decision on an investment request
pub fn decide(
    env: &Env,
    config: &SystemConfig,
    params: &RegistryParams,
    id: u64,
    approved: bool,
) -> Result<Option<ScheduledJob>, Error> {
    let mut investment = get_investment(env, id)?;
    if investment.status != InvestmentStatus::Requested {
        return Err(Error::AlreadyDecided);
    }

    env.events().publish((REQUEST_DECIDED,), (id, approved));

    let now = env.ledger().timestamp();
    if approved {
        investment.status = InvestmentStatus::Approved;
        investment.approval_date = now;
        set_investment(env, &investment);

        return Ok(Some(ScheduledJob {
            job_type: CronjobType::InvestmentLottery,
            due: now + params.lottery_delay,
        }));
    }

    investment.status = InvestmentStatus::Rejected;
    set_investment(env, &investment);

    let this = env.current_contract_address();
    let escrow = EscrowClient::new(env, &config.escrow);
    escrow.release_collateral(
        &this,
        &id,
        &investment.seeker,
        &investment.investment_token_amount,
    );
    escrow.burn_funding_nft(
        &this,
        &id,
        &config.escrow,
        &Amount::from(investment.total_partitions),
    );

    Ok(None)
}

pub fn show_interest(env: &Env, lender: Address, id: u64, partitions: u64) -> Result<(), Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;
    lender.require_auth();

    let mut investment = get_investment(env, id)?;
    if investment.status != InvestmentStatus::Approved {
        return Err(Error::NotApproved);
    }
    if partitions == 0 {
        return Err(Error::ZeroPartitions);
    }

    let escrow = EscrowClient::new(env, &config.escrow);
    let reputation = escrow.reputational_balance(&lender);

    let mut state = get_lottery(env, id)?;
    let mut entry = get_entry(env, id, &lender);
    let allocation = lottery::allocate(&params, &mut state, &mut entry, reputation, partitions)?;

    if !has_entry(env, id, &lender) {
        set_participant(env, id, state.participant_count, &lender);
        state.participant_count = state
            .participant_count
            .checked_add(1)
            .ok_or(Error::Overflow)?;
    }
    investment.partitions_requested = investment
        .partitions_requested
        .checked_add(partitions)
        .ok_or(Error::Overflow)?;
    investment.partitions_purchased = investment
        .partitions_purchased
        .checked_add(allocation.immediate_tickets)
        .ok_or(Error::Overflow)?;

    set_entry(env, id, &lender, &entry);
    set_lottery(env, id, &state);
    set_investment(env, &investment);

    let this = env.current_contract_address();
    let amount = partitions_amount(partitions, params.base_amount)?;
    escrow.deposit_lending(&this, &id, &lender, &amount);
    escrow.burn_reputational(&this, &lender, &allocation.reputation_spent);

    env.events().publish(
        (INTEREST_SHOWN,),
        (
            id,
            lender,
            partitions,
            allocation.lottery_numbers,
            allocation.immediate_tickets,
        ),
    );

    Ok(())
}

/// Start the lottery once interest covers every ticket
pub fn check_lottery_start(env: &Env, config: &SystemConfig, id: u64) -> Result<CronjobOutcome, Error> {
    let mut investment = get_investment(env, id)?;
    if investment.status != InvestmentStatus::Approved {
        return Ok(CronjobOutcome::Retire);
    }
    if investment.partitions_requested < investment.total_partitions {
        return Ok(CronjobOutcome::Extend);
    }

    investment.status = InvestmentStatus::Started;
    investment.start_date = env.ledger().timestamp();
    env.events().publish((LOTTERY_STARTED,), id);

    if get_lottery(env, id)?.tickets_remaining == 0 {
        settle(env, config, &mut investment);
    }
    set_investment(env, &investment);

    Ok(CronjobOutcome::Retire)
}

pub fn execute_lottery_run(env: &Env, id: u64) -> Result<u64, Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;

    let mut investment = get_investment(env, id)?;
    if investment.status != InvestmentStatus::Started {
        return Err(Error::NotStarted);
    }
    let mut state = get_lottery(env, id)?;
    if state.tickets_remaining == 0 {
        return Err(Error::NoRemainingTickets);
    }

    let mut entries = StoredEntries::new(env, id, state.participant_count);
    let awarded = lottery::run(
        &mut state,
        &mut entries,
        params.lottery_batch_size,
        &mut LedgerRandom::new(env),
    );

    investment.partitions_purchased += awarded;
    log!(env, "lottery run", id, awarded, state.tickets_remaining);

    if state.tickets_remaining == 0 {
        settle(env, &config, &mut investment);
    }
    set_lottery(env, id, &state);
    set_investment(env, &investment);

    env.events()
        .publish((LOTTERY_RUN,), (id, awarded, state.tickets_remaining));

    Ok(awarded)
}

/// Lottery entries of one investment, read from storage as a draw reaches them
struct StoredEntries<'a> {
    env: &'a Env,
    id: u64,
    count: u32,
    loaded: Map<u32, (Address, LotteryEntry)>,
}

impl<'a> StoredEntries<'a> {
    fn new(env: &'a Env, id: u64, count: u32) -> Self {
        Self {
            env,
            id,
            count,
            loaded: Map::new(env),
        }
    }
}

impl Entries for StoredEntries<'_> {
    fn count(&self) -> u32 {
        self.count
    }

    fn load(&mut self, index: u32) -> Option<LotteryEntry> {
        if let Some((_, entry)) = self.loaded.get(index) {
            return Some(entry);
        }
        let lender = get_participant(self.env, self.id, index)?;
        let entry = get_entry(self.env, self.id, &lender);
        self.loaded.set(index, (lender, entry.clone()));
        Some(entry)
    }

    fn store(&mut self, index: u32, entry: LotteryEntry) {
        if let Some((lender, _)) = self.loaded.get(index) {
            set_entry(self.env, self.id, &lender, &entry);
            self.loaded.set(index, (lender, entry));
        }
    }
}

pub fn withdraw_tickets(
    env: &Env,
    lender: Address,
    id: u64,
    lock: u64,
    receive: u64,
) -> Result<(), Error> {
    let config = get_config(env)?;
    lender.require_auth();

    require_settled(env, id)?;
    let total = lock.checked_add(receive).ok_or(Error::Overflow)?;
    if total == 0 {
        return Err(Error::ZeroAmount);
    }

    let mut entry = get_entry(env, id, &lender);
    if total > entry.tickets_won - entry.tickets_withdrawn {
        return Err(Error::NotEnoughTicketsWon);
    }
    entry.tickets_withdrawn += total;
    entry.locked_tickets += lock;
    set_entry(env, id, &lender, &entry);

    if receive > 0 {
        EscrowClient::new(env, &config.escrow).transfer_funding_nft(
            &env.current_contract_address(),
            &id,
            &Amount::from(receive),
            &lender,
        );
    }

    env.events()
        .publish((TICKETS_WITHDRAWN,), (id, lender, lock, receive));

    Ok(())
}

/// Hand locked tickets out as funding NFTs
pub fn unlock_tickets(env: &Env, lender: Address, id: u64, amount: u64) -> Result<(), Error> {
    let config = get_config(env)?;
    lender.require_auth();

    require_settled(env, id)?;
    if amount == 0 {
        return Err(Error::ZeroAmount);
    }

    let mut entry = get_entry(env, id, &lender);
    if amount > entry.locked_tickets {
        return Err(Error::NotEnoughTicketsWon);
    }
    entry.locked_tickets -= amount;
    set_entry(env, id, &lender, &entry);

    EscrowClient::new(env, &config.escrow).transfer_funding_nft(
        &env.current_contract_address(),
        &id,
        &Amount::from(amount),
        &lender,
    );

    env.events()
        .publish((TICKETS_WITHDRAWN,), (id, lender, 0u64, amount));

    Ok(())
}

/// Refund the lending tokens paid for tickets the lender did not win
pub fn withdraw_non_won(env: &Env, lender: Address, id: u64) -> Result<Amount, Error> {
    let config = get_config(env)?;
    let params = get_params(env)?;
    lender.require_auth();

    require_settled(env, id)?;
    let mut entry = get_entry(env, id, &lender);
    if entry.remaining_tickets == 0 {
        return Err(Error::NoNonWonTickets);
    }

    let refund = partitions_amount(entry.remaining_tickets, params.base_amount)?;
    let mut state = get_lottery(env, id)?;
    state.outstanding_tickets = state.outstanding_tickets.saturating_sub(entry.remaining_tickets);
    state.pooled_numbers = state.pooled_numbers.saturating_sub(entry.lottery_numbers);
    entry.remaining_tickets = 0;
    set_entry(env, id, &lender, &entry);
    set_lottery(env, id, &state);

    EscrowClient::new(env, &config.escrow).release_lending(
        &env.current_contract_address(),
        &id,
        &lender,
        &refund,
    );

    env.events().publish((NON_WON_REFUNDED,), (id, lender, refund));

    Ok(refund)
}

/// Burn funding NFTs for the investment tokens backing them
pub fn convert_nft(env: &Env, holder: Address, id: u64, amount: u64) -> Result<Amount, Error> {
    let config = get_config(env)?;
    holder.require_auth();

    let investment = require_settled(env, id)?;
    if amount == 0 {
        return Err(Error::ZeroNftAmount);
    }

    let escrow = EscrowClient::new(env, &config.escrow);
    let nft_amount = Amount::from(amount);
    if escrow.nft_balance(&id, &holder) < nft_amount {
        return Err(Error::NotEnoughNft);
    }

    let tokens = investment
        .investment_tokens_per_ticket
        .checked_mul(nft_amount)
        .ok_or(Error::Overflow)?;

    let this = env.current_contract_address();
    escrow.burn_funding_nft(&this, &id, &holder, &nft_amount);
    escrow.release_collateral(&this, &id, &holder, &tokens);

    env.events()
        .publish((NFT_CONVERTED,), (id, holder, amount, tokens));

    Ok(tokens)
}

/// Pay the seeker the lending tokens raised by a settled investment
pub fn withdraw(env: &Env, seeker: Address, id: u64) -> Result<Amount, Error> {
    let config = get_config(env)?;
    seeker.require_auth();

    let mut investment = get_investment(env, id)?;
    if investment.seeker != seeker {
        return Err(Error::OnlySeeker);
    }
    if investment.status != InvestmentStatus::Settled {
        return Err(Error::NotSettled);
    }
    if investment.seeker_withdrawn {
        return Err(Error::AlreadyWithdrawn);
    }

    investment.seeker_withdrawn = true;
    set_investment(env, &investment);

    let amount = investment.total_amount_requested;
    EscrowClient::new(env, &config.escrow).release_lending(
        &env.current_contract_address(),
        &id,
        &seeker,
        &amount,
    );

    env.events().publish((SEEKER_WITHDRAWN,), (id, seeker, amount));

    Ok(amount)
}

fn require_settled(env: &Env, id: u64) -> Result<Investment, Error> {
    let investment = get_investment(env, id)?;
    if investment.status != InvestmentStatus::Settled {
        return Err(Error::NotSettled);
    }
    Ok(investment)
}

/// Close the lottery and let funding NFTs circulate
fn settle(env: &Env, config: &SystemConfig, investment: &mut Investment) {
    investment.status = InvestmentStatus::Settled;

    EscrowClient::new(env, &config.escrow).set_nft_paused(
        &env.current_contract_address(),
        &investment.id,
        &false,
    );

    env.events().publish(
        (INVESTMENT_SETTLED,),
        (investment.id, investment.partitions_purchased),
    );
}
