use soroban_sdk::{symbol_short, Symbol};

// Staking
pub const STAKED: Symbol = symbol_short!("staked");
pub const UNSTAKED: Symbol = symbol_short!("unstaked");
pub const EXITED: Symbol = symbol_short!("exited");
pub const MEDAL_MINTED: Symbol = symbol_short!("medal_mnt");
pub const MEDAL_BURNED: Symbol = symbol_short!("medal_brn");

// Escrow
pub const ACCOUNT_OPENED: Symbol = symbol_short!("acc_open");
pub const FUNDS_LOCKED: Symbol = symbol_short!("locked");
pub const FUNDS_RELEASED: Symbol = symbol_short!("released");
pub const NFT_PAUSED: Symbol = symbol_short!("nft_pause");

// Registry
pub const INVESTMENT_REQUESTED: Symbol = symbol_short!("inv_req");
pub const LOAN_REQUESTED: Symbol = symbol_short!("loan_req");
pub const REQUEST_DECIDED: Symbol = symbol_short!("decided");
pub const INTEREST_SHOWN: Symbol = symbol_short!("interest");
pub const LOTTERY_STARTED: Symbol = symbol_short!("lot_start");
pub const LOTTERY_RUN: Symbol = symbol_short!("lot_run");
pub const INVESTMENT_SETTLED: Symbol = symbol_short!("inv_settl");
pub const TICKETS_WITHDRAWN: Symbol = symbol_short!("tkt_wdr");
pub const NON_WON_REFUNDED: Symbol = symbol_short!("refund");
pub const NFT_CONVERTED: Symbol = symbol_short!("nft_conv");
pub const SEEKER_WITHDRAWN: Symbol = symbol_short!("seek_wdr");
pub const LOAN_FUNDED: Symbol = symbol_short!("funded");
pub const LOAN_STARTED: Symbol = symbol_short!("loan_strt");
pub const MILESTONE_APPLIED: Symbol = symbol_short!("ms_apply");
pub const MILESTONE_RELEASED: Symbol = symbol_short!("ms_rel");
pub const PAYMENT_EXECUTED: Symbol = symbol_short!("payment");
pub const PAYMENT_CLAIMED: Symbol = symbol_short!("pay_claim");
pub const LOAN_DEFAULTED: Symbol = symbol_short!("default");
pub const LOAN_LIQUIDATED: Symbol = symbol_short!("liquidate");
pub const COLLATERAL_CLAIMED: Symbol = symbol_short!("coll_clm");

// Governance
pub const APPROVAL_REQUESTED: Symbol = symbol_short!("appr_req");
pub const VOTED: Symbol = symbol_short!("voted");
pub const REQUEST_PROCESSED: Symbol = symbol_short!("processed");
pub const DELEGATOR_ADDED: Symbol = symbol_short!("dlg_add");
pub const DELEGATOR_REMOVED: Symbol = symbol_short!("dlg_rm");
pub const CRONJOB_ADDED: Symbol = symbol_short!("cron_add");
pub const CRONJOB_RUN: Symbol = symbol_short!("cron_run");

// Action rewards
pub const ACTION_REWARDED: Symbol = symbol_short!("act_rwd");
