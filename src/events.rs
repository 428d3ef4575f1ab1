multiversx_sc::imports!();

use crate::types::{
    CollaboratorKey, CustodianStatus, GovernanceParam, ProposalKind, ReserveType, Role,
};

#[multiversx_sc::module]
pub trait EventsModule {
    // ── Reserves ──

    #[event("reserveAuthorized")]
    fn reserve_authorized_event(
        &self,
        #[indexed] reserve: &ManagedAddress,
        #[indexed] reserve_type: ReserveType,
        minting_cap: &BigUint,
    );

    #[event("reserveDeauthorized")]
    fn reserve_deauthorized_event(&self, #[indexed] reserve: &ManagedAddress);

    #[event("backingChanged")]
    fn backing_changed_event(
        &self,
        #[indexed] reserve: &ManagedAddress,
        #[indexed] old_backing: &BigUint,
        new_backing: &BigUint,
    );

    #[event("mintExecuted")]
    fn mint_executed_event(
        &self,
        #[indexed] reserve: &ManagedAddress,
        #[indexed] recipient: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("batchMintExecuted")]
    fn batch_mint_executed_event(
        &self,
        #[indexed] reserve: &ManagedAddress,
        #[indexed] recipients: usize,
        total: &BigUint,
    );

    #[event("redemptionProcessed")]
    fn redemption_processed_event(
        &self,
        #[indexed] reserve: &ManagedAddress,
        #[indexed] holder: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("reservePaused")]
    fn reserve_paused_event(&self, #[indexed] reserve: &ManagedAddress);

    #[event("reserveUnpaused")]
    fn reserve_unpaused_event(&self, #[indexed] reserve: &ManagedAddress);

    #[event("systemPauseChanged")]
    fn system_pause_changed_event(&self, #[indexed] paused: bool);

    // ── Attestations ──

    #[event("attestationSubmitted")]
    fn attestation_submitted_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        #[indexed] old_balance: &BigUint,
        #[indexed] timestamp: u64,
        new_balance: &BigUint,
    );

    #[event("attestationInvalidated")]
    fn attestation_invalidated_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        #[indexed] sequence: usize,
        reason: &ManagedBuffer,
    );

    // ── Custodians ──

    #[event("custodianRegistered")]
    fn custodian_registered_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        max_capacity: &BigUint,
    );

    #[event("custodianCapacityChanged")]
    fn custodian_capacity_changed_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        #[indexed] old_capacity: &BigUint,
        new_capacity: &BigUint,
    );

    #[event("statusChanged")]
    fn status_changed_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        #[indexed] new_status: CustodianStatus,
        #[indexed] actor: &ManagedAddress,
        reason: &ManagedBuffer,
    );

    #[event("walletRegistered")]
    fn wallet_registered_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        wallet: &ManagedBuffer,
    );

    #[event("walletDeregistered")]
    fn wallet_deregistered_event(
        &self,
        #[indexed] custodian: &ManagedAddress,
        wallet: &ManagedBuffer,
    );

    // ── Redemptions ──

    #[event("redemptionRequested")]
    fn redemption_requested_event(
        &self,
        #[indexed] redemption_id: u64,
        #[indexed] custodian: &ManagedAddress,
        #[indexed] redeemer: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("redemptionFulfilled")]
    fn redemption_fulfilled_event(&self, #[indexed] redemption_id: u64);

    #[event("redemptionDefaulted")]
    fn redemption_defaulted_event(
        &self,
        #[indexed] redemption_id: u64,
        #[indexed] custodian: &ManagedAddress,
        reason: &ManagedBuffer,
    );

    // ── Governance ──

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        #[indexed] kind: ProposalKind,
        required_votes: u32,
    );

    #[event("voteCast")]
    fn vote_cast_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        vote_count: u32,
    );

    #[event("quorumReached")]
    fn quorum_reached_event(&self, #[indexed] proposal_id: u64, #[indexed] reached_at: u64);

    #[event("proposalExecuted")]
    fn proposal_executed_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] executor: &ManagedAddress,
    );

    #[event("proposalCancelled")]
    fn proposal_cancelled_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] cancelled_by: &ManagedAddress,
    );

    #[event("watchdogAdded")]
    fn watchdog_added_event(&self, #[indexed] watchdog: &ManagedAddress);

    #[event("watchdogRemoved")]
    fn watchdog_removed_event(&self, #[indexed] watchdog: &ManagedAddress);

    #[event("paramChanged")]
    fn param_changed_event(&self, #[indexed] param: GovernanceParam, value: &BigUint);

    #[event("collaboratorSet")]
    fn collaborator_set_event(
        &self,
        #[indexed] key: CollaboratorKey,
        address: &ManagedAddress,
    );

    #[event("roleGranted")]
    fn role_granted_event(&self, #[indexed] role: Role, #[indexed] account: &ManagedAddress);

    #[event("roleRevoked")]
    fn role_revoked_event(&self, #[indexed] role: Role, #[indexed] account: &ManagedAddress);
}
