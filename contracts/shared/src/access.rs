use soroban_sdk::Address;

use crate::errors::Error;
use crate::types::SystemConfig;

/// A registered address a contract-to-contract call can come from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Owner,
    /// The investment registry.
    Project,
    Staking,
    ActionVerifier,
    Governance,
}

impl Role {
    /// Address registered for this role.
    pub fn address<'a>(&self, config: &'a SystemConfig) -> &'a Address {
        match self {
            Role::Owner => &config.owner,
            Role::Project => &config.registry,
            Role::Staking => &config.staking,
            Role::ActionVerifier => &config.action_verifier,
            Role::Governance => &config.governance,
        }
    }
}

/// Fails unless `caller` holds `role` and authorized the call.
pub fn require_role(config: &SystemConfig, caller: &Address, role: Role) -> Result<(), Error> {
    require_any_role(config, caller, &[role])
}

/// Fails unless `caller` holds one of `roles` and authorized the call.
pub fn require_any_role(
    config: &SystemConfig,
    caller: &Address,
    roles: &[Role],
) -> Result<(), Error> {
    if !roles.iter().any(|role| role.address(config) == caller) {
        return Err(denial(roles));
    }
    caller.require_auth();
    Ok(())
}

fn denial(roles: &[Role]) -> Error {
    match roles {
        [Role::Project] => Error::OnlyProject,
        [Role::Project, Role::Owner] => Error::OnlyProjectOrOwner,
        [Role::Project, Role::Staking] => Error::OnlyProjectOrStaking,
        [Role::Staking] | [Role::Staking, Role::ActionVerifier] => Error::OnlyStaking,
        [Role::Governance] => Error::OnlyGovernance,
        _ => Error::Unauthorized,
    }
}
