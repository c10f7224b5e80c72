use soroban_sdk::{contracttype, Address, Symbol};

/// Timestamp in seconds, as reported by the ledger.
pub type Timestamp = u64;

/// Token amount, in the token's smallest unit.
pub type Amount = i128;

/// Addresses wired once at deploy time and handed to every contract's
/// `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SystemConfig {
    pub owner: Address,
    pub escrow: Address,
    pub registry: Address,
    pub staking: Address,
    pub governance: Address,
    pub action_verifier: Address,
    pub stake_token: Address,
}

/// Which kind of funding request an id refers to.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RequestKind {
    Investment = 0,
    PersonalLoan = 1,
    ProjectLoan = 2,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CronjobType {
    /// Starts the lottery once enough interest was shown.
    InvestmentLottery = 0,
    /// Closes the funding window of a loan.
    LoanFunding = 1,
    /// Watches the deadline of the next repayment batch.
    LoanPayment = 2,
    /// Watches the deadline of the current milestone application.
    LoanMilestone = 3,
}

/// A job the registry asks governance to put in the cronjob queue.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduledJob {
    pub job_type: CronjobType,
    pub due: Timestamp,
}

/// What the scheduler does with a job after the registry checked it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CronjobOutcome {
    /// Nothing left to watch; the job leaves the queue.
    Retire,
    /// Precondition not met yet; re-enqueue after the extension interval.
    Extend,
    /// Re-enqueue with an explicit due timestamp.
    Reschedule(Timestamp),
}

/// An off-chain action that earns reputation once verified.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Action {
    pub account: Address,
    pub action_name: Symbol,
    pub reference: u64,
}

/// Custody bookkeeping for one investment or loan.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowAccount {
    pub id: u64,
    pub lending_token: Address,
    pub collateral_token: Address,
    pub lending_deposited: Amount,
    pub lending_released: Amount,
    pub collateral_deposited: Amount,
    pub collateral_released: Amount,
}

impl EscrowAccount {
    pub fn lending_available(&self) -> Amount {
        self.lending_deposited - self.lending_released
    }

    pub fn collateral_available(&self) -> Amount {
        self.collateral_deposited - self.collateral_released
    }
}
