//! Ticket allocation for investments.
//!
//! Reputation is exchanged for lottery numbers when a lender shows interest.
//! Numbers beyond `numbers_for_immediate_ticket` buy tickets outright; the rest
//! weigh the lender's chances in the draws run once the investment starts.
//! Nothing here touches storage, so the math is tested with a scripted
//! [`RandomSource`].

use shared::errors::Error;
use shared::random::RandomSource;
use shared::types::Amount;
use soroban_sdk::Vec;

use crate::types::{LotteryEntry, LotteryState, RegistryParams};

/// Result of turning a lender's reputation into lottery participation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub lottery_numbers: u64,
    pub immediate_tickets: u64,
    /// Reputation the numbers cost, to be burned
    pub reputation_spent: Amount,
}

/// Convert `reputation` into lottery numbers for a request of `partitions`
/// tickets and book them on `entry` and `state`.
pub fn allocate(
    params: &RegistryParams,
    state: &mut LotteryState,
    entry: &mut LotteryEntry,
    reputation: Amount,
    partitions: u64,
) -> Result<Allocation, Error> {
    if reputation < params.ralbt_per_lottery_number {
        return Err(Error::NotEligible);
    }

    let numbers = u64::try_from(reputation / params.ralbt_per_lottery_number)
        .map_err(|_| Error::Overflow)?;
    let per_ticket = params.numbers_for_immediate_ticket;

    let mut immediate = 0;
    if numbers > per_ticket {
        immediate = ((numbers - 1) / per_ticket)
            .min(state.tickets_remaining)
            .min(partitions);
    }
    let pooled = numbers - immediate * per_ticket;
    let requested = partitions - immediate;

    let lottery_numbers = entry
        .lottery_numbers
        .checked_add(pooled)
        .ok_or(Error::Overflow)?;
    let remaining_tickets = entry
        .remaining_tickets
        .checked_add(requested)
        .ok_or(Error::Overflow)?;
    let total_lottery_numbers = state
        .total_lottery_numbers
        .checked_add(numbers)
        .ok_or(Error::Overflow)?;
    let outstanding_tickets = state
        .outstanding_tickets
        .checked_add(requested)
        .ok_or(Error::Overflow)?;
    // An entry joins the pool with all its numbers once it waits for tickets
    let joining = match (entry.remaining_tickets, remaining_tickets) {
        (_, 0) => 0,
        (0, _) => lottery_numbers,
        _ => pooled,
    };
    let pooled_numbers = state
        .pooled_numbers
        .checked_add(joining)
        .ok_or(Error::Overflow)?;
    let reputation_spent = Amount::from(numbers)
        .checked_mul(params.ralbt_per_lottery_number)
        .ok_or(Error::Overflow)?;

    entry.lottery_numbers = lottery_numbers;
    entry.remaining_tickets = remaining_tickets;
    entry.tickets_won += immediate;
    state.tickets_remaining -= immediate;
    state.total_lottery_numbers = total_lottery_numbers;
    state.outstanding_tickets = outstanding_tickets;
    state.pooled_numbers = pooled_numbers;

    Ok(Allocation {
        lottery_numbers: numbers,
        immediate_tickets: immediate,
        reputation_spent,
    })
}

/// Lottery entries addressed by participation index.
///
/// Draws read entries in order and stop at the winner, so a backing store
/// only has to produce the entries actually looked at.
pub trait Entries {
    fn count(&self) -> u32;
    fn load(&mut self, index: u32) -> Option<LotteryEntry>;
    fn store(&mut self, index: u32, entry: LotteryEntry);
}

impl Entries for Vec<LotteryEntry> {
    fn count(&self) -> u32 {
        self.len()
    }

    fn load(&mut self, index: u32) -> Option<LotteryEntry> {
        self.get(index)
    }

    fn store(&mut self, index: u32, entry: LotteryEntry) {
        self.set(index, entry);
    }
}

/// Award tickets to `entries` until the supply runs out, every outstanding
/// request is served, or `batch` draws were made. Returns tickets awarded.
///
/// `state` carries the outstanding and pooled totals of `entries`.
pub fn run(
    state: &mut LotteryState,
    entries: &mut impl Entries,
    batch: u32,
    rng: &mut impl RandomSource,
) -> u64 {
    let mut awarded = 0;
    let mut draws = 0;

    while state.tickets_remaining > 0 {
        if state.outstanding_tickets <= state.tickets_remaining {
            awarded += award_all(state, entries);
            break;
        }
        if draws == batch || state.pooled_numbers == 0 {
            break;
        }

        if let Some((index, entry)) = pick(entries, rng.next_below(state.pooled_numbers)) {
            award(state, entries, index, entry);
            awarded += 1;
        }
        draws += 1;
    }

    awarded
}

/// Participant holding number `target` of the pool
fn pick(entries: &mut impl Entries, mut target: u64) -> Option<(u32, LotteryEntry)> {
    for index in 0..entries.count() {
        let Some(entry) = entries.load(index) else {
            continue;
        };
        if entry.remaining_tickets == 0 {
            continue;
        }
        if target < entry.lottery_numbers {
            return Some((index, entry));
        }
        target -= entry.lottery_numbers;
    }
    None
}

fn award(
    state: &mut LotteryState,
    entries: &mut impl Entries,
    index: u32,
    mut entry: LotteryEntry,
) {
    entry.remaining_tickets -= 1;
    entry.tickets_won += 1;
    state.tickets_remaining -= 1;
    state.outstanding_tickets -= 1;
    if entry.remaining_tickets == 0 {
        state.pooled_numbers -= entry.lottery_numbers;
    }
    entries.store(index, entry);
}

fn award_all(state: &mut LotteryState, entries: &mut impl Entries) -> u64 {
    let mut awarded = 0;
    for index in 0..entries.count() {
        let Some(mut entry) = entries.load(index) else {
            continue;
        };
        if entry.remaining_tickets == 0 {
            continue;
        }
        awarded += entry.remaining_tickets;
        state.tickets_remaining -= entry.remaining_tickets;
        state.outstanding_tickets -= entry.remaining_tickets;
        state.pooled_numbers -= entry.lottery_numbers;
        entry.tickets_won += entry.remaining_tickets;
        entry.remaining_tickets = 0;
        entries.store(index, entry);
    }
    awarded
}
