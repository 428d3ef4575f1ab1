multiversx_sc::imports!();

use crate::errors::*;
use crate::types::Role;

impl Role {
    pub fn missing_error(&self) -> &'static str {
        match self {
            Role::Attester => ERR_MISSING_ATTESTER_ROLE,
            Role::Arbiter => ERR_MISSING_ARBITER_ROLE,
            Role::Registrar => ERR_MISSING_REGISTRAR_ROLE,
            Role::Governance => ERR_MISSING_GOVERNANCE_ROLE,
            Role::Pauser => ERR_MISSING_PAUSER_ROLE,
            Role::Minter => ERR_MISSING_MINTER_ROLE,
        }
    }
}

/// Role → member-set capability table, kept apart from business logic.
#[multiversx_sc::module]
pub trait RolesModule: crate::events::EventsModule {
    #[endpoint(grantRole)]
    fn grant_role(&self, role: Role, account: ManagedAddress) {
        self.require_role(Role::Governance);
        require!(!account.is_zero(), ERR_ZERO_ADDRESS);
        require!(
            self.role_members(role).insert(account.clone()),
            ERR_ROLE_ALREADY_GRANTED
        );

        self.role_granted_event(role, &account);
    }

    #[endpoint(revokeRole)]
    fn revoke_role(&self, role: Role, account: ManagedAddress) {
        self.require_role(Role::Governance);
        require!(
            self.role_members(role).contains(&account),
            ERR_ROLE_NOT_GRANTED
        );
        if role == Role::Governance {
            require!(
                self.role_members(role).len() > 1,
                ERR_LAST_GOVERNANCE_MEMBER
            );
        }

        self.role_members(role).swap_remove(&account);
        self.role_revoked_event(role, &account);
    }

    #[view(hasRole)]
    fn has_role(&self, role: Role, account: ManagedAddress) -> bool {
        self.role_members(role).contains(&account)
    }

    fn require_role(&self, role: Role) {
        let caller = self.blockchain().get_caller();
        if !self.role_members(role).contains(&caller) {
            sc_panic!(role.missing_error());
        }
    }

    fn caller_has_role(&self, role: Role) -> bool {
        let caller = self.blockchain().get_caller();
        self.role_members(role).contains(&caller)
    }

    #[storage_mapper("roleMembers")]
    fn role_members(&self, role: Role) -> UnorderedSetMapper<ManagedAddress>;
}
