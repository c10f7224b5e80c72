#![no_std]

use shared::constants::{MAX_TIER, TIER_COUNT};
use shared::errors::Error;
use shared::events::{EXITED, MEDAL_BURNED, MEDAL_MINTED, STAKED, UNSTAKED};
use shared::interfaces::EscrowClient;
use shared::types::{Amount, SystemConfig};
use soroban_sdk::{contract, contractimpl, contracttype, token::TokenClient, Address, Env, Vec};

/// Storage keys for the staking contract
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Deploy-time configuration
    Config,
    /// Tier tables
    Params,
    /// Stake account keyed by address
    Account(Address),
    /// Tier of the medal an address holds
    Medal(Address),
}

/// Amounts required and reputation granted per tier, indexed by tier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub struct StakingParams {
    /// Total stake-token amount an account holds at each tier
    pub staking_amounts: Vec<Amount>,
    /// Reputation an account is granted at each tier
    pub reputational_amounts: Vec<Amount>,
}

/// Stake held by one account
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub struct StakeAccount {
    pub account: Address,
    pub staked_amount: Amount,
    /// Current tier (0 = nothing staked)
    pub tier: u32,
    /// Reputation granted by staking that is still attributed to the stake
    pub staking_reputation: Amount,
    /// Reputation a drop could not burn because it was already spent;
    /// withheld from later grants
    pub reputation_debt: Amount,
}

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    /// Initialize the staking contract
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `config` - Deploy-time addresses; `config.owner` must authorize
    /// * `params` - Tier tables, one entry per tier starting at tier 0
    ///
    /// # Returns
    /// * `Result<(), Error>` - Ok if successful, Error if already initialized
    pub fn initialize(env: Env, config: SystemConfig, params: StakingParams) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }

        config.owner.require_auth();
        Self::validate_params(&params)?;

        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Params, &params);

        Ok(())
    }

    /// Stake up to a higher tier
    ///
    /// Pulls the difference between the tier amount and what is already
    /// staked, swaps the medal and tops reputation up to the tier's grant.
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `account` - The staker
    /// * `tier` - Target tier, higher than the current one
    ///
    /// # Returns
    /// * `Result<StakeAccount, Error>` - The updated account or an error
    pub fn stake(env: Env, account: Address, tier: u32) -> Result<StakeAccount, Error> {
        let (config, params) = Self::load(&env)?;
        account.require_auth();

        if tier == 0 {
            return Err(Error::ZeroTypeStake);
        }
        if tier > MAX_TIER {
            return Err(Error::InvalidInput);
        }

        let mut stake = Self::get_account_internal(&env, &account);
        if tier == stake.tier {
            return Err(Error::SameTypeStake);
        }
        if tier < stake.tier {
            return Err(Error::InvalidInput);
        }

        let target = Self::table_entry(&params.staking_amounts, tier)?;
        let amount = target - stake.staked_amount;
        if amount > 0 {
            TokenClient::new(&env, &config.stake_token).transfer(
                &account,
                &env.current_contract_address(),
                &amount,
            );
        }

        let previous_tier = stake.tier;
        stake.staked_amount = target;
        stake.tier = tier;

        Self::swap_medal(&env, &account, previous_tier, tier);
        Self::settle_reputation(&env, &config, &params, &mut stake)?;
        Self::save_account(&env, &stake);

        env.events().publish((STAKED,), (account, tier, amount));

        Ok(stake)
    }

    /// Drop to a lower tier and withdraw the difference
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `account` - The staker
    /// * `tier` - Target tier, lower than the current one
    ///
    /// # Returns
    /// * `Result<StakeAccount, Error>` - The updated account or an error
    pub fn unstake(env: Env, account: Address, tier: u32) -> Result<StakeAccount, Error> {
        let (config, params) = Self::load(&env)?;
        account.require_auth();

        let mut stake = Self::get_account_internal(&env, &account);
        if tier >= stake.tier {
            return Err(Error::OnlyLowerLevel);
        }

        let refund = Self::drop_to(&env, &config, &params, &mut stake, tier)?;
        env.events().publish((UNSTAKED,), (account, tier, refund));

        Ok(stake)
    }

    /// Withdraw the whole stake and give up every tier benefit
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `account` - The staker
    ///
    /// # Returns
    /// * `Result<Amount, Error>` - The amount returned or an error
    pub fn exit(env: Env, account: Address) -> Result<Amount, Error> {
        let (config, params) = Self::load(&env)?;
        account.require_auth();

        let mut stake = Self::get_account_internal(&env, &account);
        if stake.tier == 0 {
            return Err(Error::OnlyLowerLevel);
        }

        let refund = Self::drop_to(&env, &config, &params, &mut stake, 0)?;
        env.events().publish((EXITED,), (account, refund));

        Ok(refund)
    }

    /// Get an account's stake; accounts that never staked read as tier 0
    pub fn get_account(env: Env, account: Address) -> StakeAccount {
        Self::get_account_internal(&env, &account)
    }

    pub fn get_tier(env: Env, account: Address) -> u32 {
        Self::get_account_internal(&env, &account).tier
    }

    /// Medal balance of `account` for `tier`: 1 for the current tier's medal, else 0
    pub fn medal_balance(env: Env, account: Address, tier: u32) -> u32 {
        let held: Option<u32> = env.storage().persistent().get(&DataKey::Medal(account));
        match held {
            Some(medal) if medal == tier => 1,
            _ => 0,
        }
    }

    /// Total stake required at `tier`
    pub fn staking_amount(env: Env, tier: u32) -> Result<Amount, Error> {
        let (_, params) = Self::load(&env)?;
        Self::table_entry(&params.staking_amounts, tier)
    }

    pub fn get_params(env: Env) -> Result<StakingParams, Error> {
        Ok(Self::load(&env)?.1)
    }

    fn load(env: &Env) -> Result<(SystemConfig, StakingParams), Error> {
        let config = env
            .storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)?;
        let params = env
            .storage()
            .instance()
            .get(&DataKey::Params)
            .ok_or(Error::NotInitialized)?;
        Ok((config, params))
    }

    fn validate_params(params: &StakingParams) -> Result<(), Error> {
        for table in [&params.staking_amounts, &params.reputational_amounts] {
            if table.len() != TIER_COUNT || table.get(0) != Some(0) {
                return Err(Error::InvalidInput);
            }
            let mut previous: Amount = 0;
            for value in table.iter() {
                if value < previous {
                    return Err(Error::InvalidInput);
                }
                previous = value;
            }
        }
        Ok(())
    }

    fn table_entry(table: &Vec<Amount>, tier: u32) -> Result<Amount, Error> {
        table.get(tier).ok_or(Error::InvalidInput)
    }

    /// Internal helper to get an account, defaulting to an empty stake
    fn get_account_internal(env: &Env, account: &Address) -> StakeAccount {
        env.storage()
            .persistent()
            .get(&DataKey::Account(account.clone()))
            .unwrap_or(StakeAccount {
                account: account.clone(),
                staked_amount: 0,
                tier: 0,
                staking_reputation: 0,
                reputation_debt: 0,
            })
    }

    fn save_account(env: &Env, stake: &StakeAccount) {
        let key = DataKey::Account(stake.account.clone());
        if stake.tier == 0
            && stake.staked_amount == 0
            && stake.staking_reputation == 0
            && stake.reputation_debt == 0
        {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, stake);
        }
    }

    /// Lower `stake` to `tier`, returning the refunded amount
    fn drop_to(
        env: &Env,
        config: &SystemConfig,
        params: &StakingParams,
        stake: &mut StakeAccount,
        tier: u32,
    ) -> Result<Amount, Error> {
        let target = Self::table_entry(&params.staking_amounts, tier)?;
        let refund = stake.staked_amount - target;
        if refund > 0 {
            TokenClient::new(env, &config.stake_token).transfer(
                &env.current_contract_address(),
                &stake.account,
                &refund,
            );
        }

        let previous_tier = stake.tier;
        stake.staked_amount = target;
        stake.tier = tier;

        Self::swap_medal(env, &stake.account, previous_tier, tier);
        Self::settle_reputation(env, config, params, stake)?;
        Self::save_account(env, stake);

        Ok(refund)
    }

    /// Burn the medal of `from` and mint the medal of `to`; tier 0 has none
    fn swap_medal(env: &Env, account: &Address, from: u32, to: u32) {
        let key = DataKey::Medal(account.clone());
        if from > 0 {
            env.storage().persistent().remove(&key);
            env.events().publish((MEDAL_BURNED,), (account.clone(), from));
        }
        if to > 0 {
            env.storage().persistent().set(&key, &to);
            env.events().publish((MEDAL_MINTED,), (account.clone(), to));
        }
    }

    /// Mint or burn so the staking reputation matches the current tier's grant.
    /// Burns are capped by what the account still holds; the shortfall becomes
    /// debt that is netted against the next mint, so spent reputation is never
    /// granted twice.
    fn settle_reputation(
        env: &Env,
        config: &SystemConfig,
        params: &StakingParams,
        stake: &mut StakeAccount,
    ) -> Result<(), Error> {
        let target = Self::table_entry(&params.reputational_amounts, stake.tier)?;
        let escrow = EscrowClient::new(env, &config.escrow);
        let this = env.current_contract_address();

        if target > stake.staking_reputation {
            let grant = target - stake.staking_reputation;
            let withheld = grant.min(stake.reputation_debt);
            stake.reputation_debt -= withheld;
            if grant > withheld {
                escrow.mint_reputational(&this, &stake.account, &(grant - withheld));
            }
        } else if target < stake.staking_reputation {
            let excess = stake.staking_reputation - target;
            let burn = excess.min(escrow.reputational_balance(&stake.account));
            if burn > 0 {
                escrow.burn_reputational(&this, &stake.account, &burn);
            }
            stake.reputation_debt = stake
                .reputation_debt
                .checked_add(excess - burn)
                .ok_or(Error::Overflow)?;
        }

        stake.staking_reputation = target;
        Ok(())
    }
}
