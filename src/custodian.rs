multiversx_sc::imports!();

use crate::errors::*;
use crate::proof_validator_proxy;
use crate::types::{CollaboratorKey, CustodianRecord, CustodianStatus, Role, StatusChange};

pub const SOLVENCY_REASON: &[u8] = b"attested balance below minted amount";

/// Custodian registry and the status state machine.
#[multiversx_sc::module]
pub trait CustodianModule:
    crate::attestation::AttestationModule
    + crate::config::ConfigModule
    + crate::roles::RolesModule
    + crate::events::EventsModule
{
    #[endpoint(registerCustodian)]
    fn register_custodian(&self, custodian: ManagedAddress, max_capacity: BigUint) {
        self.require_role(Role::Registrar);
        require!(!custodian.is_zero(), ERR_ZERO_ADDRESS);
        require!(
            self.custodians(&custodian).is_empty(),
            ERR_CUSTODIAN_ALREADY_REGISTERED
        );

        let record = CustodianRecord {
            status: CustodianStatus::Active,
            minted_amount: BigUint::zero(),
            max_capacity: max_capacity.clone(),
            registered_at: self.blockchain().get_block_timestamp(),
        };
        self.custodians(&custodian).set(&record);
        self.custodian_list().insert(custodian.clone());

        self.custodian_registered_event(&custodian, &max_capacity);
    }

    #[endpoint(setCustodianCapacity)]
    fn set_custodian_capacity(&self, custodian: ManagedAddress, max_capacity: BigUint) {
        self.require_role(Role::Registrar);
        let mut record = self.require_custodian(&custodian);
        require!(max_capacity >= record.minted_amount, ERR_CAPACITY_BELOW_MINTED);

        let old_capacity = core::mem::replace(&mut record.max_capacity, max_capacity);
        self.custodians(&custodian).set(&record);

        self.custodian_capacity_changed_event(&custodian, &old_capacity, &record.max_capacity);
    }

    #[endpoint(setCustodianStatus)]
    fn set_custodian_status(
        &self,
        custodian: ManagedAddress,
        new_status: CustodianStatus,
        reason: ManagedBuffer,
    ) {
        self.require_role(Role::Arbiter);
        let caller = self.blockchain().get_caller();
        self.transition_status(&custodian, new_status, &reason, &caller);
    }

    // ========================================================
    // ENDPOINT: verifySolvency
    // The only self-triggered transition: an Active custodian whose
    // latest valid attested balance is below its minted amount is
    // moved to UnderReview. Age alone never makes a custodian
    // insolvent. Returns whether the custodian is solvent.
    // ========================================================

    #[endpoint(verifySolvency)]
    fn verify_solvency(&self, custodian: ManagedAddress) -> bool {
        self.require_role(Role::Arbiter);
        let record = self.require_custodian(&custodian);

        let balance = self.valid_balance(&custodian);
        if balance >= record.minted_amount {
            return true;
        }

        if record.status == CustodianStatus::Active {
            let actor = self.blockchain().get_sc_address();
            let reason = ManagedBuffer::new_from_bytes(SOLVENCY_REASON);
            self.transition_status(&custodian, CustodianStatus::UnderReview, &reason, &actor);
        }
        false
    }

    #[endpoint(registerWallet)]
    fn register_wallet(
        &self,
        custodian: ManagedAddress,
        wallet: ManagedBuffer,
        proof: ManagedBuffer,
    ) {
        self.require_role(Role::Registrar);
        require!(!wallet.is_empty(), ERR_EMPTY_WALLET);
        let record = self.require_custodian(&custodian);
        require!(
            record.status == CustodianStatus::Active,
            ERR_CUSTODIAN_NOT_ACTIVE
        );
        require!(
            self.wallet_owner(&wallet).is_empty(),
            ERR_WALLET_ALREADY_REGISTERED
        );

        let validator = self.require_collaborator(CollaboratorKey::ProofValidator);
        let verified: bool = self
            .tx()
            .to(&validator)
            .typed(proof_validator_proxy::ProofValidatorProxy)
            .verify_wallet_control(&custodian, &wallet, &proof)
            .returns(ReturnsResult)
            .sync_call();
        require!(verified, ERR_INVALID_PROOF);

        self.wallet_owner(&wallet).set(&custodian);
        self.custodian_wallets(&custodian).insert(wallet.clone());

        self.wallet_registered_event(&custodian, &wallet);
    }

    fn require_custodian(&self, custodian: &ManagedAddress) -> CustodianRecord<Self::Api> {
        require!(
            !self.custodians(custodian).is_empty(),
            ERR_CUSTODIAN_NOT_REGISTERED
        );
        self.custodians(custodian).get()
    }

    /// Applies a status change through the transition table and logs it.
    fn transition_status(
        &self,
        custodian: &ManagedAddress,
        new_status: CustodianStatus,
        reason: &ManagedBuffer,
        actor: &ManagedAddress,
    ) {
        require!(!reason.is_empty(), ERR_EMPTY_REASON);
        let mut record = self.require_custodian(custodian);
        require!(
            record.status.can_transition_to(&new_status),
            ERR_INVALID_TRANSITION
        );

        let change = StatusChange {
            from: record.status,
            to: new_status,
            actor: actor.clone(),
            reason: reason.clone(),
            timestamp: self.blockchain().get_block_timestamp(),
        };
        record.status = new_status;
        self.custodians(custodian).set(&record);
        self.status_history(custodian).push(&change);

        self.status_changed_event(custodian, new_status, actor, reason);
    }

    fn deregister_wallet(&self, custodian: &ManagedAddress, wallet: &ManagedBuffer) {
        self.require_custodian(custodian);
        require!(
            self.custodian_wallets(custodian).swap_remove(wallet),
            ERR_WALLET_NOT_REGISTERED
        );
        self.wallet_owner(wallet).clear();

        self.wallet_deregistered_event(custodian, wallet);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getCustodian)]
    fn get_custodian(&self, custodian: ManagedAddress) -> OptionalValue<CustodianRecord<Self::Api>> {
        if self.custodians(&custodian).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.custodians(&custodian).get())
        }
    }

    #[view(getCustodianStatus)]
    fn get_custodian_status(&self, custodian: ManagedAddress) -> CustodianStatus {
        self.require_custodian(&custodian).status
    }

    #[view(getCustodianWallets)]
    fn get_custodian_wallets(&self, custodian: ManagedAddress) -> MultiValueEncoded<ManagedBuffer> {
        let mut result = MultiValueEncoded::new();
        for wallet in self.custodian_wallets(&custodian).iter() {
            result.push(wallet);
        }
        result
    }

    #[view(getWalletOwner)]
    fn get_wallet_owner(&self, wallet: ManagedBuffer) -> OptionalValue<ManagedAddress> {
        if self.wallet_owner(&wallet).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.wallet_owner(&wallet).get())
        }
    }

    #[view(getStatusHistory)]
    fn get_status_history(
        &self,
        custodian: ManagedAddress,
    ) -> MultiValueEncoded<StatusChange<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for change in self.status_history(&custodian).iter() {
            result.push(change);
        }
        result
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("custodians")]
    fn custodians(&self, custodian: &ManagedAddress) -> SingleValueMapper<CustodianRecord<Self::Api>>;

    #[storage_mapper("custodianList")]
    fn custodian_list(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("custodianWallets")]
    fn custodian_wallets(&self, custodian: &ManagedAddress) -> UnorderedSetMapper<ManagedBuffer>;

    #[storage_mapper("walletOwner")]
    fn wallet_owner(&self, wallet: &ManagedBuffer) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("statusHistory")]
    fn status_history(&self, custodian: &ManagedAddress) -> VecMapper<StatusChange<Self::Api>>;
}
