use soroban_sdk::contracterror;

/// Failure reasons shared by every marketplace contract.
///
/// Each variant documents the reason string it stands for.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// "Not initialized"
    NotInitialized = 1,
    /// "Cannot initialize second time"
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    NotFound = 5,

    // Authorization
    /// "Only Project"
    OnlyProject = 10,
    /// "Only Project or Owner"
    OnlyProjectOrOwner = 11,
    /// "Only Project or Staking"
    OnlyProjectOrStaking = 12,
    /// "Only Staking"
    OnlyStaking = 13,
    /// "Only Governance"
    OnlyGovernance = 14,
    /// "Only seeker"
    OnlySeeker = 15,
    /// "Only delegator"
    OnlyDelegator = 16,
    /// "Only lender"
    OnlyLender = 17,

    // Validation
    /// "Amount cannot be zero"
    ZeroAmount = 20,
    /// "Token amount and price should result in integer amount of tickets"
    NonIntegerPartitions = 21,
    /// "Cannot show interest for 0 partitions"
    ZeroPartitions = 22,
    /// "Amount of nft to convert cannot be 0"
    ZeroNftAmount = 23,
    /// "Milestones do not add up to the requested amount"
    InvalidMilestones = 24,
    /// "Payment batches and interval must be positive"
    InvalidPaymentBatches = 25,
    /// "Cannot stake for type zero"
    ZeroTypeStake = 26,
    /// "Cannot stake for same type again"
    SameTypeStake = 27,
    /// "Can only drop to lower level", also for exiting with nothing staked
    OnlyLowerLevel = 28,
    /// "Signature verification failed"
    InvalidSignature = 30,

    // State preconditions
    /// "Can show interest only in Approved state"
    NotApproved = 40,
    /// "Can run lottery only in Started state"
    NotStarted = 41,
    /// "Can withdraw only in Settled state"
    NotSettled = 42,
    /// "Can fund only in Approved state"
    NotFundable = 43,
    /// "Can apply only while awaiting milestone application"
    NotAwaitingMilestone = 44,
    /// "Can pay only while awaiting repayment"
    NotAwaitingRepayment = 45,
    /// "Can liquidate only in Default state, claim only once liquidated"
    NotDefaulted = 46,
    /// "Can withdraw only in Rejected state"
    NotRejected = 48,
    /// "Transfers are paused"
    NftPaused = 49,

    // Resource exhaustion
    /// "Not eligible for lottery numbers"
    NotEligible = 60,
    /// "Can run lottery only if has remaining ticket"
    NoRemainingTickets = 61,
    /// "Not enough tickets won"
    NotEnoughTicketsWon = 62,
    /// "No non-won tickets to withdraw"
    NoNonWonTickets = 63,
    /// "Not enough NFT to convert"
    NotEnoughNft = 64,
    /// "Not enough partitions left"
    PartitionsExceeded = 65,
    /// "Not enough funds in escrow", tokens or reputation
    EscrowInsufficient = 66,
    /// "Nothing to claim"
    NothingToClaim = 67,
    /// "Arithmetic overflow"
    Overflow = 68,

    // Timing
    /// "Only between funding timeframe"
    OutsideFundingTimeframe = 80,
    /// "Only between awaiting for repayment timeframe"
    OutsideRepaymentTimeframe = 81,
    /// "Only between milestone timeframe"
    OutsideMilestoneTimeframe = 82,
    /// "Voting period is over" for votes, "not over" for expiry
    OutsideVotingPeriod = 83,

    // Idempotence
    /// "Cannot approve again same investment"
    AlreadyDecided = 90,
    /// "Cannot vote again"
    AlreadyVoted = 91,
    /// "Request already processed"
    RequestProcessed = 92,
    /// "Already withdrawn"
    AlreadyWithdrawn = 93,
    /// "Already claimed"
    AlreadyClaimed = 94,
}
