#![no_std]

use shared::access::{require_role, Role};
use shared::errors::Error;
use shared::events::ACTION_REWARDED;
use shared::interfaces::{EscrowClient, SignatureVerifierClient};
use shared::types::{Action, Amount, SystemConfig};
use soroban_sdk::{contract, contractimpl, contracttype, Address, BytesN, Env, Symbol};

/// Storage keys for the action verifier
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    /// External signature verifier contract
    Verifier,
    /// Reputation paid for an action name
    Reward(Symbol),
    /// Marks an action as rewarded
    Claimed(Action),
}

#[contract]
pub struct ActionVerifierContract;

#[contractimpl]
impl ActionVerifierContract {
    /// Initialize the action verifier
    ///
    /// # Arguments
    /// * `env` - The contract environment
    /// * `config` - Deploy-time addresses; `config.owner` must authorize
    /// * `verifier` - Contract that checks action signatures
    pub fn initialize(env: Env, config: SystemConfig, verifier: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        config.owner.require_auth();

        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Verifier, &verifier);

        Ok(())
    }

    /// Set the reputation paid for an action. Zero removes the action.
    pub fn set_action_reward(
        env: Env,
        owner: Address,
        action_name: Symbol,
        amount: Amount,
    ) -> Result<(), Error> {
        let config = Self::load_config(&env)?;
        require_role(&config, &owner, Role::Owner)?;

        let key = DataKey::Reward(action_name);
        match amount {
            0 => env.storage().persistent().remove(&key),
            amount if amount > 0 => env.storage().persistent().set(&key, &amount),
            _ => return Err(Error::ZeroAmount),
        }

        Ok(())
    }

    /// Mint the reward for a signed off-chain action, once per action
    ///
    /// # Arguments
    /// * `action` - Account, action name and a reference making it unique
    /// * `signature` - Signature checked by the external verifier
    ///
    /// # Returns
    /// * `Result<Amount, Error>` - Reputation minted to `action.account`
    pub fn reward_action(env: Env, action: Action, signature: BytesN<64>) -> Result<Amount, Error> {
        let config = Self::load_config(&env)?;

        let reward: Amount = env
            .storage()
            .persistent()
            .get(&DataKey::Reward(action.action_name.clone()))
            .ok_or(Error::NotFound)?;

        let claimed = DataKey::Claimed(action.clone());
        if env.storage().persistent().has(&claimed) {
            return Err(Error::AlreadyClaimed);
        }

        let verifier: Address = env
            .storage()
            .instance()
            .get(&DataKey::Verifier)
            .ok_or(Error::NotInitialized)?;
        if !SignatureVerifierClient::new(&env, &verifier).verify_action_signature(&action, &signature) {
            return Err(Error::InvalidSignature);
        }

        env.storage().persistent().set(&claimed, &true);
        EscrowClient::new(&env, &config.escrow).mint_reputational(
            &env.current_contract_address(),
            &action.account,
            &reward,
        );

        env.events().publish(
            (ACTION_REWARDED,),
            (action.account, action.action_name, action.reference, reward),
        );

        Ok(reward)
    }

    pub fn action_reward(env: Env, action_name: Symbol) -> Amount {
        env.storage()
            .persistent()
            .get(&DataKey::Reward(action_name))
            .unwrap_or(0)
    }

    pub fn is_rewarded(env: Env, action: Action) -> bool {
        env.storage().persistent().has(&DataKey::Claimed(action))
    }

    fn load_config(env: &Env) -> Result<SystemConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }
}
