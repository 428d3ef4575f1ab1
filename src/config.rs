multiversx_sc::imports!();

use crate::errors::*;
use crate::types::{CollaboratorKey, GovernanceParam, Role};

pub const DEFAULT_VOTING_PERIOD: u64 = 7 * 86_400;
pub const DEFAULT_EXECUTION_DELAY: u64 = 86_400;
pub const DEFAULT_REDEMPTION_TIMEOUT: u64 = 2 * 86_400;
/// Upper bound for every duration parameter (ten years).
pub const MAX_DURATION: u64 = 10 * 365 * 86_400;

/// Governance-tunable parameters and the collaborator registry.
#[multiversx_sc::module]
pub trait ConfigModule: crate::roles::RolesModule + crate::events::EventsModule {
    // ========================================================
    // ENDPOINT: setGovernanceParam
    // Direct path for the Governance role. Quorum changes are
    // reserved for executed ParamChange proposals.
    // ========================================================

    #[endpoint(setGovernanceParam)]
    fn set_governance_param(&self, param: GovernanceParam, value: BigUint) {
        self.require_role(Role::Governance);
        require!(
            param != GovernanceParam::RequiredVotes,
            ERR_QUORUM_NEEDS_CONSENSUS
        );
        self.apply_param(param, &value);
    }

    #[endpoint(setCollaborator)]
    fn set_collaborator(&self, key: CollaboratorKey, address: ManagedAddress) {
        self.require_role(Role::Governance);
        require!(!address.is_zero(), ERR_ZERO_ADDRESS);

        self.collaborators(key).set(&address);
        self.collaborator_set_event(key, &address);
    }

    /// Validates and stores every parameter except `RequiredVotes`,
    /// whose bound depends on the watchdog set.
    fn apply_param(&self, param: GovernanceParam, value: &BigUint) {
        match param {
            GovernanceParam::RequiredVotes => sc_panic!(ERR_QUORUM_NEEDS_CONSENSUS),
            GovernanceParam::StaleThreshold => {
                self.stale_threshold().set(self.positive_seconds(value));
            }
            GovernanceParam::ExecutionDelay => {
                self.execution_delay().set(self.bounded_seconds(value));
            }
            GovernanceParam::VotingPeriod => {
                self.voting_period().set(self.positive_seconds(value));
            }
            GovernanceParam::RedemptionTimeout => {
                self.redemption_timeout().set(self.positive_seconds(value));
            }
            GovernanceParam::MinMintAmount => {
                require!(*value > 0u64, ERR_INVALID_PARAM_VALUE);
                require!(*value <= self.max_single_mint().get(), ERR_INVALID_MINT_BOUNDS);
                self.min_mint_amount().set(value);
            }
            GovernanceParam::MaxSingleMint => {
                require!(*value >= self.min_mint_amount().get(), ERR_INVALID_MINT_BOUNDS);
                self.max_single_mint().set(value);
            }
        }

        self.param_changed_event(param, value);
    }

    fn bounded_seconds(&self, value: &BigUint) -> u64 {
        match value.to_u64() {
            Some(seconds) if seconds <= MAX_DURATION => seconds,
            _ => sc_panic!(ERR_INVALID_PARAM_VALUE),
        }
    }

    fn positive_seconds(&self, value: &BigUint) -> u64 {
        let seconds = self.bounded_seconds(value);
        require!(seconds > 0, ERR_INVALID_PARAM_VALUE);
        seconds
    }

    fn require_collaborator(&self, key: CollaboratorKey) -> ManagedAddress {
        require!(!self.collaborators(key).is_empty(), ERR_COLLABORATOR_MISSING);
        self.collaborators(key).get()
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getGovernanceParams)]
    fn get_governance_params(&self) -> MultiValue7<u32, u64, u64, u64, u64, BigUint, BigUint> {
        (
            self.required_votes().get(),
            self.stale_threshold().get(),
            self.execution_delay().get(),
            self.voting_period().get(),
            self.redemption_timeout().get(),
            self.min_mint_amount().get(),
            self.max_single_mint().get(),
        )
            .into()
    }

    #[view(getCollaborator)]
    fn get_collaborator(&self, key: CollaboratorKey) -> OptionalValue<ManagedAddress> {
        if self.collaborators(key).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.collaborators(key).get())
        }
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[view(getClaimToken)]
    #[storage_mapper("claimToken")]
    fn claim_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("requiredVotes")]
    fn required_votes(&self) -> SingleValueMapper<u32>;

    #[storage_mapper("staleThreshold")]
    fn stale_threshold(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("executionDelay")]
    fn execution_delay(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("votingPeriod")]
    fn voting_period(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("redemptionTimeout")]
    fn redemption_timeout(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("minMintAmount")]
    fn min_mint_amount(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("maxSingleMint")]
    fn max_single_mint(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("collaborators")]
    fn collaborators(&self, key: CollaboratorKey) -> SingleValueMapper<ManagedAddress>;
}
