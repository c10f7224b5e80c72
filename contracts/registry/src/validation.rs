use shared::constants::MAX_LOTTERY_BATCH;
use shared::errors::Error;
use shared::types::Amount;
use soroban_sdk::Vec;

use crate::types::{LoanTerms, Milestone, RegistryParams};

pub fn validate_params(params: &RegistryParams) -> Result<(), Error> {
    if params.base_amount <= 0 || params.ralbt_per_lottery_number <= 0 {
        return Err(Error::ZeroAmount);
    }
    if params.numbers_for_immediate_ticket == 0
        || params.lottery_batch_size == 0
        || params.lottery_batch_size > MAX_LOTTERY_BATCH
        || params.funding_timeframe == 0
    {
        return Err(Error::InvalidInput);
    }
    Ok(())
}

/// Number of partitions `amount` splits into, failing unless it is a
/// positive multiple of `base_amount`
pub fn partitions_for(amount: Amount, base_amount: Amount) -> Result<u64, Error> {
    if amount <= 0 {
        return Err(Error::ZeroAmount);
    }
    if amount % base_amount != 0 {
        return Err(Error::NonIntegerPartitions);
    }
    u64::try_from(amount / base_amount).map_err(|_| Error::Overflow)
}

/// Investment tokens backing one ticket
pub fn tokens_per_ticket(token_amount: Amount, partitions: u64) -> Result<Amount, Error> {
    if token_amount <= 0 {
        return Err(Error::ZeroAmount);
    }
    let partitions = Amount::from(partitions);
    if token_amount % partitions != 0 {
        return Err(Error::NonIntegerPartitions);
    }
    Ok(token_amount / partitions)
}

/// Checks the loan terms and returns the number of partitions
pub fn validate_terms(terms: &LoanTerms, base_amount: Amount) -> Result<u64, Error> {
    let partitions = partitions_for(terms.amount_requested, base_amount)?;
    if terms.collateral_amount <= 0 {
        return Err(Error::ZeroAmount);
    }
    if terms.payment_batches == 0 || terms.batch_interval == 0 {
        return Err(Error::InvalidPaymentBatches);
    }
    Ok(partitions)
}

pub fn validate_milestones(milestones: &Vec<Milestone>, amount_requested: Amount) -> Result<(), Error> {
    if milestones.is_empty() {
        return Err(Error::InvalidMilestones);
    }
    let mut total: Amount = 0;
    for milestone in milestones.iter() {
        if milestone.amount <= 0 || milestone.duration == 0 {
            return Err(Error::InvalidMilestones);
        }
        total = total
            .checked_add(milestone.amount)
            .ok_or(Error::Overflow)?;
    }
    if total != amount_requested {
        return Err(Error::InvalidMilestones);
    }
    Ok(())
}

/// Lending amount paid for `partitions` tickets
pub fn partitions_amount(partitions: u64, base_amount: Amount) -> Result<Amount, Error> {
    Amount::from(partitions)
        .checked_mul(base_amount)
        .ok_or(Error::Overflow)
}
