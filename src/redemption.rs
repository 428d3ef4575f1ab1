multiversx_sc::imports!();

use crate::errors::*;
use crate::proof_validator_proxy;
use crate::types::{CollaboratorKey, CustodianStatus, Redemption, RedemptionStatus, Role};

pub const DEFAULT_REASON: &[u8] = b"redemption defaulted";

/// Redemption requests against a custodian. The claim tokens are burned up
/// front; the custodian then owes an off-ledger payout that is either
/// proven fulfilled or flagged as defaulted after the timeout.
#[multiversx_sc::module]
pub trait RedemptionModule:
    crate::reserve::ReserveModule
    + crate::capacity::CapacityModule
    + crate::custodian::CustodianModule
    + crate::attestation::AttestationModule
    + crate::config::ConfigModule
    + crate::roles::RolesModule
    + crate::events::EventsModule
{
    #[payable("*")]
    #[endpoint(requestRedemption)]
    fn request_redemption(&self, custodian: ManagedAddress, destination: ManagedBuffer) -> u64 {
        require!(!destination.is_empty(), ERR_EMPTY_DESTINATION);
        self.require_custodian(&custodian);

        let redeemer = self.blockchain().get_caller();
        let amount = self.receive_claim_tokens();

        self.acquire_reserve_lock(&custodian);
        self.process_redemption(&custodian, &redeemer, &amount);
        self.release_reserve_lock(&custodian);

        let redemption_id = self.redemption_count().get() + 1;
        let redemption = Redemption {
            id: redemption_id,
            custodian: custodian.clone(),
            redeemer: redeemer.clone(),
            amount: amount.clone(),
            destination,
            requested_at: self.blockchain().get_block_timestamp(),
            status: RedemptionStatus::Pending,
        };
        self.redemptions(redemption_id).set(&redemption);
        self.redemption_count().set(redemption_id);

        self.redemption_requested_event(redemption_id, &custodian, &redeemer, &amount);

        redemption_id
    }

    #[endpoint(recordFulfillment)]
    fn record_fulfillment(&self, redemption_id: u64, proof: ManagedBuffer) {
        self.require_role(Role::Arbiter);
        let mut redemption = self.require_pending_redemption(redemption_id);

        let validator = self.require_collaborator(CollaboratorKey::ProofValidator);
        let verified: bool = self
            .tx()
            .to(&validator)
            .typed(proof_validator_proxy::ProofValidatorProxy)
            .verify_redemption_fulfillment(&proof, &redemption.amount)
            .returns(ReturnsResult)
            .sync_call();
        require!(verified, ERR_INVALID_PROOF);

        redemption.status = RedemptionStatus::Fulfilled;
        self.redemptions(redemption_id).set(&redemption);

        self.redemption_fulfilled_event(redemption_id);
    }

    #[endpoint(flagRedemptionDefault)]
    fn flag_redemption_default(&self, redemption_id: u64, reason: ManagedBuffer) {
        self.require_role(Role::Arbiter);
        let actor = self.blockchain().get_caller();
        self.apply_redemption_default(redemption_id, &reason, &actor);
    }

    /// Marks a pending, timed-out redemption as defaulted and puts an
    /// Active custodian under review.
    fn apply_redemption_default(
        &self,
        redemption_id: u64,
        reason: &ManagedBuffer,
        actor: &ManagedAddress,
    ) {
        require!(!reason.is_empty(), ERR_EMPTY_REASON);
        let mut redemption = self.require_pending_redemption(redemption_id);

        let now = self.blockchain().get_block_timestamp();
        require!(
            now > redemption
                .requested_at
                .saturating_add(self.redemption_timeout().get()),
            ERR_REDEMPTION_TIMEOUT
        );

        redemption.status = RedemptionStatus::Defaulted;
        self.redemptions(redemption_id).set(&redemption);

        let record = self.require_custodian(&redemption.custodian);
        if record.status == CustodianStatus::Active {
            self.transition_status(
                &redemption.custodian,
                CustodianStatus::UnderReview,
                &ManagedBuffer::new_from_bytes(DEFAULT_REASON),
                actor,
            );
        }

        self.redemption_defaulted_event(redemption_id, &redemption.custodian, reason);
    }

    fn require_pending_redemption(&self, redemption_id: u64) -> Redemption<Self::Api> {
        require!(
            !self.redemptions(redemption_id).is_empty(),
            ERR_REDEMPTION_NOT_FOUND
        );
        let redemption = self.redemptions(redemption_id).get();
        require!(
            redemption.status == RedemptionStatus::Pending,
            ERR_REDEMPTION_NOT_PENDING
        );
        redemption
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getRedemption)]
    fn get_redemption(&self, redemption_id: u64) -> OptionalValue<Redemption<Self::Api>> {
        if self.redemptions(redemption_id).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.redemptions(redemption_id).get())
        }
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[view(getRedemptionCount)]
    #[storage_mapper("redemptionCount")]
    fn redemption_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("redemptions")]
    fn redemptions(&self, id: u64) -> SingleValueMapper<Redemption<Self::Api>>;
}
