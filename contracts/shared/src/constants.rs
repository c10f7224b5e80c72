/// Number of staking tiers, tier 0 included.
pub const TIER_COUNT: u32 = 4;

/// Highest staking tier.
pub const MAX_TIER: u32 = TIER_COUNT - 1;

/// Basis points denominator (10000 = 100%).
pub const BASIS_POINTS: i128 = 10_000;

/// Upper bound on draws a single lottery run may perform.
pub const MAX_LOTTERY_BATCH: u32 = 500;

/// Sentinel id of an empty cronjob list and of a node without successor.
pub const NO_CRONJOB: u64 = 0;
