#![no_std]

use shared::{
    access::{require_any_role, require_role, Role},
    errors::Error,
    events::*,
    types::{Amount, EscrowAccount, SystemConfig},
};
use soroban_sdk::{contract, contractimpl, token::TokenClient, Address, Env};
use soroban_token_sdk::TokenUtils;

mod storage;
mod validation;


use storage::*;
use validation::{validate_amount, validate_available};

/// Which of an account's two token balances an operation touches.
#[derive(Clone, Copy)]
enum Side {
    Lending,
    Collateral,
}

#[contract]
pub struct EscrowContract;

#[contractimpl]
impl EscrowContract {
    /// Initialize the contract with the deploy-time configuration
    pub fn initialize(env: Env, config: SystemConfig) -> Result<(), Error> {
        if has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        config.owner.require_auth();
        set_config(&env, &config);
        Ok(())
    }

    /// Open custody bookkeeping for a new investment or loan
    ///
    /// # Arguments
    /// * `caller` - Must be the registry
    /// * `id` - Investment or loan identifier
    /// * `lending_token` - Token lenders pay in
    /// * `collateral_token` - Token the seeker locks
    pub fn open_account(
        env: Env,
        caller: Address,
        id: u64,
        lending_token: Address,
        collateral_token: Address,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &caller, Role::Project)?;

        if account_exists(&env, id) {
            return Err(Error::AlreadyInitialized);
        }

        let account = EscrowAccount {
            id,
            lending_token: lending_token.clone(),
            collateral_token: collateral_token.clone(),
            lending_deposited: 0,
            lending_released: 0,
            collateral_deposited: 0,
            collateral_released: 0,
        };
        set_account(&env, &account);

        env.events()
            .publish((ACCOUNT_OPENED,), (id, lending_token, collateral_token));

        Ok(())
    }

    /// Pull collateral tokens from `from` into custody
    pub fn deposit_collateral(
        env: Env,
        caller: Address,
        id: u64,
        from: Address,
        amount: Amount,
    ) -> Result<(), Error> {
        lock_funds(&env, &caller, id, &from, amount, Side::Collateral)
    }

    /// Pull lending tokens from `from` into custody
    pub fn deposit_lending(
        env: Env,
        caller: Address,
        id: u64,
        from: Address,
        amount: Amount,
    ) -> Result<(), Error> {
        lock_funds(&env, &caller, id, &from, amount, Side::Lending)
    }

    /// Pay lending tokens held for `id` out to `to`
    pub fn release_lending(
        env: Env,
        caller: Address,
        id: u64,
        to: Address,
        amount: Amount,
    ) -> Result<(), Error> {
        release_funds(&env, &caller, id, &to, amount, Side::Lending)
    }

    /// Pay collateral tokens held for `id` out to `to`
    pub fn release_collateral(
        env: Env,
        caller: Address,
        id: u64,
        to: Address,
        amount: Amount,
    ) -> Result<(), Error> {
        release_funds(&env, &caller, id, &to, amount, Side::Collateral)
    }

    /// Get custody bookkeeping for an id
    pub fn get_account(env: Env, id: u64) -> Result<EscrowAccount, Error> {
        get_account(&env, id)
    }

    // ==================== Funding NFTs ====================

    /// Mint funding NFTs into custody. Transfers between holders start paused.
    pub fn mint_funding_nft(env: Env, caller: Address, id: u64, amount: Amount) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_any_role(&config, &caller, &[Role::Project, Role::Owner])?;
        validate_amount(amount)?;

        let custody = env.current_contract_address();
        let supply = get_nft_supply(&env, id)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let held = get_nft_balance(&env, id, &custody) + amount;

        set_nft_supply(&env, id, supply);
        set_nft_balance(&env, id, &custody, held);
        set_nft_paused(&env, id, true);

        TokenUtils::new(&env).events().mint(caller, custody, amount);

        Ok(())
    }

    /// Burn funding NFTs owned by `from`
    pub fn burn_funding_nft(
        env: Env,
        caller: Address,
        id: u64,
        from: Address,
        amount: Amount,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &caller, Role::Project)?;
        validate_amount(amount)?;

        let balance = get_nft_balance(&env, id, &from);
        validate_available(balance, amount, Error::NotEnoughNft)?;

        set_nft_balance(&env, id, &from, balance - amount);
        set_nft_supply(&env, id, get_nft_supply(&env, id) - amount);

        TokenUtils::new(&env).events().burn(from, amount);

        Ok(())
    }

    /// Hand funding NFTs out of custody. Allowed while holder transfers are paused.
    pub fn transfer_funding_nft(
        env: Env,
        caller: Address,
        id: u64,
        amount: Amount,
        to: Address,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_role(&config, &caller, Role::Project)?;
        validate_amount(amount)?;

        let custody = env.current_contract_address();
        move_nft(&env, id, &custody, &to, amount)
    }

    /// Pause or resume holder-to-holder transfers of an id
    pub fn set_nft_paused(env: Env, caller: Address, id: u64, paused: bool) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_any_role(&config, &caller, &[Role::Project, Role::Owner])?;

        set_nft_paused(&env, id, paused);
        env.events().publish((NFT_PAUSED,), (id, paused));

        Ok(())
    }

    /// Transfer funding NFTs between holders
    pub fn transfer_nft(
        env: Env,
        from: Address,
        to: Address,
        id: u64,
        amount: Amount,
    ) -> Result<(), Error> {
        get_config(&env)?;
        from.require_auth();
        validate_amount(amount)?;

        if is_nft_paused(&env, id) {
            return Err(Error::NftPaused);
        }

        move_nft(&env, id, &from, &to, amount)
    }

    pub fn nft_balance(env: Env, id: u64, holder: Address) -> Amount {
        get_nft_balance(&env, id, &holder)
    }

    pub fn nft_supply(env: Env, id: u64) -> Amount {
        get_nft_supply(&env, id)
    }

    pub fn is_nft_paused(env: Env, id: u64) -> bool {
        is_nft_paused(&env, id)
    }

    // ==================== Reputational token ====================

    /// Mint non-transferable reputation to `to`
    pub fn mint_reputational(env: Env, caller: Address, to: Address, amount: Amount) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_any_role(&config, &caller, &[Role::Staking, Role::ActionVerifier])?;
        validate_amount(amount)?;

        let balance = get_reputation(&env, &to)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        set_reputation(&env, &to, balance);

        TokenUtils::new(&env).events().mint(caller, to, amount);

        Ok(())
    }

    /// Burn reputation held by `from`
    pub fn burn_reputational(
        env: Env,
        caller: Address,
        from: Address,
        amount: Amount,
    ) -> Result<(), Error> {
        let config = get_config(&env)?;
        require_any_role(&config, &caller, &[Role::Project, Role::Staking])?;
        validate_amount(amount)?;

        let balance = get_reputation(&env, &from);
        validate_available(balance, amount, Error::EscrowInsufficient)?;
        set_reputation(&env, &from, balance - amount);

        TokenUtils::new(&env).events().burn(from, amount);

        Ok(())
    }

    pub fn reputational_balance(env: Env, account: Address) -> Amount {
        get_reputation(&env, &account)
    }

    pub fn get_config(env: Env) -> Result<SystemConfig, Error> {
        get_config(&env)
    }
}

/// Pull tokens into custody and book them against `id`
fn lock_funds(
    env: &Env,
    caller: &Address,
    id: u64,
    from: &Address,
    amount: Amount,
    side: Side,
) -> Result<(), Error> {
    let config = get_config(env)?;
    require_role(&config, caller, Role::Project)?;
    validate_amount(amount)?;

    let mut account = get_account(env, id)?;
    let token = match side {
        Side::Lending => {
            account.lending_deposited = account
                .lending_deposited
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            account.lending_token.clone()
        }
        Side::Collateral => {
            account.collateral_deposited = account
                .collateral_deposited
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            account.collateral_token.clone()
        }
    };

    TokenClient::new(env, &token).transfer(from, &env.current_contract_address(), &amount);
    set_account(env, &account);

    env.events()
        .publish((FUNDS_LOCKED,), (id, token, from.clone(), amount));

    Ok(())
}

/// Pay tokens booked against `id` out of custody
fn release_funds(
    env: &Env,
    caller: &Address,
    id: u64,
    to: &Address,
    amount: Amount,
    side: Side,
) -> Result<(), Error> {
    let config = get_config(env)?;
    require_role(&config, caller, Role::Project)?;
    validate_amount(amount)?;

    let mut account = get_account(env, id)?;
    let token = match side {
        Side::Lending => {
            validate_available(account.lending_available(), amount, Error::EscrowInsufficient)?;
            account.lending_released += amount;
            account.lending_token.clone()
        }
        Side::Collateral => {
            validate_available(
                account.collateral_available(),
                amount,
                Error::EscrowInsufficient,
            )?;
            account.collateral_released += amount;
            account.collateral_token.clone()
        }
    };

    set_account(env, &account);
    TokenClient::new(env, &token).transfer(&env.current_contract_address(), to, &amount);

    env.events()
        .publish((FUNDS_RELEASED,), (id, token, to.clone(), amount));

    Ok(())
}

fn move_nft(env: &Env, id: u64, from: &Address, to: &Address, amount: Amount) -> Result<(), Error> {
    let from_balance = get_nft_balance(env, id, from);
    validate_available(from_balance, amount, Error::NotEnoughNft)?;

    set_nft_balance(env, id, from, from_balance - amount);
    set_nft_balance(env, id, to, get_nft_balance(env, id, to) + amount);

    TokenUtils::new(env)
        .events()
        .transfer(from.clone(), to.clone(), amount);

    Ok(())
}
