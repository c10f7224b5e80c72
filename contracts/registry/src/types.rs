use shared::types::{Amount, RequestKind, Timestamp};
use soroban_sdk::{contracttype, Address, String, Vec};

/// Registry-wide parameters fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryParams {
    /// Lending amount of one partition (one ticket)
    pub base_amount: Amount,
    /// Reputation exchanged for one lottery number
    pub ralbt_per_lottery_number: Amount,
    /// Lottery numbers that buy one immediate ticket
    pub numbers_for_immediate_ticket: u64,
    /// Upper bound on draws per lottery run
    pub lottery_batch_size: u32,
    /// Interest window between approval and the first lottery check
    pub lottery_delay: Timestamp,
    /// Window after approval during which a loan can be funded
    pub funding_timeframe: Timestamp,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum InvestmentStatus {
    Requested = 0,
    Approved = 1,
    Started = 2,
    Settled = 3,
    Rejected = 4,
}

/// A seeker selling investment tokens for lending tokens, ticket by ticket.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Investment {
    pub id: u64,
    pub seeker: Address,
    pub investment_token: Address,
    pub investment_token_amount: Amount,
    pub lending_token: Address,
    pub total_amount_requested: Amount,
    pub total_partitions: u64,
    pub investment_tokens_per_ticket: Amount,
    /// Partitions lenders showed interest for, immediate tickets included
    pub partitions_requested: u64,
    /// Tickets won so far
    pub partitions_purchased: u64,
    pub status: InvestmentStatus,
    pub ipfs_hash: String,
    pub approval_date: Timestamp,
    pub start_date: Timestamp,
    pub seeker_withdrawn: bool,
}

/// Ticket supply of one investment's lottery.
///
/// Participants are stored one per key in participation order; the running
/// totals below let a draw stop reading entries once the winner is found.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LotteryState {
    pub tickets_remaining: u64,
    pub total_lottery_numbers: u64,
    pub participant_count: u32,
    /// Sum of `remaining_tickets` over all entries
    pub outstanding_tickets: u64,
    /// Lottery numbers of entries still waiting for tickets
    pub pooled_numbers: u64,
}

/// One lender's standing in an investment's lottery.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LotteryEntry {
    /// Numbers held in the draw pool
    pub lottery_numbers: u64,
    /// Requested tickets not yet won
    pub remaining_tickets: u64,
    pub tickets_won: u64,
    /// Won tickets already taken out, locked ones included
    pub tickets_withdrawn: u64,
    pub locked_tickets: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LoanStatus {
    Requested = 0,
    /// Open for funding
    Approved = 1,
    Rejected = 2,
    /// Personal loan funded and being repaid
    Started = 3,
    AwaitingMilestoneApplication = 4,
    AwaitingMilestoneApproval = 5,
    /// Project loan past its last milestone, being repaid
    AwaitingRepayment = 6,
    Settled = 7,
    Default = 8,
    Liquidated = 9,
}

/// Money terms shared by personal and project loans.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanTerms {
    pub lending_token: Address,
    pub amount_requested: Amount,
    pub collateral_token: Address,
    pub collateral_amount: Amount,
    /// Interest over the whole loan, in basis points
    pub interest_bps: u32,
    pub payment_batches: u32,
    pub batch_interval: Timestamp,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub amount: Amount,
    /// Time the seeker has to apply for this milestone
    pub duration: Timestamp,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Loan {
    pub id: u64,
    pub kind: RequestKind,
    pub seeker: Address,
    pub terms: LoanTerms,
    pub milestones: Vec<Milestone>,
    pub total_partitions: u64,
    pub partitions_purchased: u64,
    pub status: LoanStatus,
    pub ipfs_hash: String,
    pub approval_date: Timestamp,
    pub starting_date: Timestamp,
    /// Deadline of the pending milestone application or repayment batch
    pub next_deadline: Timestamp,
    pub batches_paid: u32,
    pub current_milestone: u32,
    pub amount_repaid: Amount,
}

/// One lender's share of a loan.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LenderPosition {
    pub partitions: u64,
    pub claimed_repayment: Amount,
    pub claimed_collateral: bool,
    pub refunded: bool,
}
