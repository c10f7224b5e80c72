use shared::types::{CronjobType, Timestamp};
use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceParams {
    /// Approve votes needed to approve a request
    pub approval_threshold: u32,
    /// Seconds a request stays open for votes
    pub voting_period: Timestamp,
    /// Delay before a job whose precondition failed is checked again
    pub extension_interval: Timestamp,
}

/// A vote on a registry request or one of its milestones.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalRequest {
    pub id: u64,
    pub subject_id: u64,
    pub is_milestone: bool,
    pub approvals_provided: u32,
    pub is_approved: bool,
    pub is_processed: bool,
    pub deadline: Timestamp,
}

/// Queue node. Nodes stay in storage after leaving the queue.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CronjobNode {
    pub id: u64,
    pub external_id: u64,
    pub job_type: CronjobType,
    pub due: Timestamp,
    /// Id of the following node, `NO_CRONJOB` at the tail
    pub next: u64,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CronjobList {
    pub head: u64,
    pub tail: u64,
    pub size: u32,
}
