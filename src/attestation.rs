multiversx_sc::imports!();

use crate::errors::*;
use crate::types::{Attestation, Role};

/// Append-only collateral attestations per custodian. Only the latest entry
/// is authoritative, and only while it is valid and fresh.
#[multiversx_sc::module]
pub trait AttestationModule:
    crate::config::ConfigModule + crate::roles::RolesModule + crate::events::EventsModule
{
    #[endpoint(submitAttestation)]
    fn submit_attestation(&self, custodian: ManagedAddress, balance: BigUint) {
        self.require_role(Role::Attester);
        require!(!custodian.is_zero(), ERR_ZERO_ADDRESS);

        let old_balance = match self.latest_attestation(&custodian) {
            Some(previous) => previous.balance,
            None => BigUint::zero(),
        };
        let timestamp = self.blockchain().get_block_timestamp();

        let attestation = Attestation {
            balance: balance.clone(),
            timestamp,
            attester: self.blockchain().get_caller(),
            is_valid: true,
        };
        self.attestations(&custodian).push(&attestation);

        self.attestation_submitted_event(&custodian, &old_balance, timestamp, &balance);
    }

    // ========================================================
    // ENDPOINT: invalidateAttestation
    // Flips the validity flag of the current attestation. Balance,
    // timestamp and history length are left untouched.
    // ========================================================

    #[endpoint(invalidateAttestation)]
    fn invalidate_attestation(&self, custodian: ManagedAddress, reason: ManagedBuffer) {
        self.require_role(Role::Governance);
        require!(!reason.is_empty(), ERR_EMPTY_REASON);

        let sequence = self.attestations(&custodian).len();
        require!(sequence > 0, ERR_NO_ATTESTATION);

        let mut attestation = self.attestations(&custodian).get(sequence);
        require!(attestation.is_valid, ERR_ATTESTATION_ALREADY_INVALID);

        attestation.is_valid = false;
        self.attestations(&custodian).set(sequence, &attestation);
        self.invalidation_reason(&custodian, sequence).set(&reason);

        self.attestation_invalidated_event(&custodian, sequence, &reason);
    }

    fn latest_attestation(&self, custodian: &ManagedAddress) -> Option<Attestation<Self::Api>> {
        let len = self.attestations(custodian).len();
        if len == 0 {
            return None;
        }
        Some(self.attestations(custodian).get(len))
    }

    /// Stale once strictly older than the threshold in force right now.
    fn is_stale_at(&self, timestamp: u64) -> bool {
        let now = self.blockchain().get_block_timestamp();
        now.saturating_sub(timestamp) > self.stale_threshold().get()
    }

    /// Latest recorded balance and whether it is unusable (missing,
    /// invalidated or stale).
    fn balance_and_staleness(&self, custodian: &ManagedAddress) -> (BigUint, bool) {
        match self.latest_attestation(custodian) {
            Some(attestation) => {
                let stale = !attestation.is_valid || self.is_stale_at(attestation.timestamp);
                (attestation.balance, stale)
            }
            None => (BigUint::zero(), true),
        }
    }

    /// Balance of the latest attestation if it is still valid, regardless
    /// of age. Zero when missing or invalidated.
    fn valid_balance(&self, custodian: &ManagedAddress) -> BigUint {
        match self.latest_attestation(custodian) {
            Some(attestation) if attestation.is_valid => attestation.balance,
            _ => BigUint::zero(),
        }
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getBalanceAndStaleness)]
    fn get_balance_and_staleness(&self, custodian: ManagedAddress) -> MultiValue2<BigUint, bool> {
        self.balance_and_staleness(&custodian).into()
    }

    #[view(getLatestAttestation)]
    fn get_latest_attestation(
        &self,
        custodian: ManagedAddress,
    ) -> OptionalValue<Attestation<Self::Api>> {
        self.latest_attestation(&custodian).into()
    }

    #[view(getAttestationCount)]
    fn get_attestation_count(&self, custodian: ManagedAddress) -> usize {
        self.attestations(&custodian).len()
    }

    #[view(getAttestations)]
    fn get_attestations(
        &self,
        custodian: ManagedAddress,
        from: usize,
        count: usize,
    ) -> MultiValueEncoded<Attestation<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let total = self.attestations(&custodian).len();
        let start = if from == 0 { 1 } else { from };
        if count == 0 || start > total {
            return result;
        }
        let end = core::cmp::min(start.saturating_add(count - 1), total);

        for sequence in start..=end {
            result.push(self.attestations(&custodian).get(sequence));
        }
        result
    }

    #[view(getInvalidationReason)]
    fn get_invalidation_reason(&self, custodian: ManagedAddress, sequence: usize) -> ManagedBuffer {
        self.invalidation_reason(&custodian, sequence).get()
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("attestations")]
    fn attestations(&self, custodian: &ManagedAddress) -> VecMapper<Attestation<Self::Api>>;

    #[storage_mapper("invalidationReason")]
    fn invalidation_reason(
        &self,
        custodian: &ManagedAddress,
        sequence: usize,
    ) -> SingleValueMapper<ManagedBuffer>;
}
