#![no_std]

multiversx_sc::imports!();

/// Test double answering both collaborator interfaces of reserve-control:
/// proof verification and the per-holder balance ledger.
#[multiversx_sc::contract]
pub trait CollaboratorMock {
    #[init]
    fn init(&self) {
        self.proofs_accepted().set(true);
    }

    #[endpoint(setProofsAccepted)]
    fn set_proofs_accepted(&self, accepted: bool) {
        self.proofs_accepted().set(accepted);
    }

    /// Every ledger credit after this calls `mint` back on `controller`.
    #[endpoint(setReentryTarget)]
    fn set_reentry_target(&self, controller: ManagedAddress, reserve: ManagedAddress) {
        self.reentry_controller().set(&controller);
        self.reentry_reserve().set(&reserve);
    }

    // ProofValidator

    #[view(verifyWalletControl)]
    fn verify_wallet_control(
        &self,
        _custodian: ManagedAddress,
        wallet: ManagedBuffer,
        proof: ManagedBuffer,
    ) -> bool {
        self.proofs_accepted().get() && !wallet.is_empty() && !proof.is_empty()
    }

    #[view(verifyRedemptionFulfillment)]
    fn verify_redemption_fulfillment(&self, proof: ManagedBuffer, expected_amount: BigUint) -> bool {
        self.proofs_accepted().get() && !proof.is_empty() && expected_amount > 0u64
    }

    // BalanceLedger

    #[endpoint(increaseBalance)]
    fn increase_balance(&self, holder: ManagedAddress, amount: BigUint) {
        self.balance(&holder).update(|balance| *balance += &amount);

        if !self.reentry_controller().is_empty() {
            self.tx()
                .to(&self.reentry_controller().get())
                .raw_call("mint")
                .argument(&self.reentry_reserve().get())
                .argument(&holder)
                .argument(&amount)
                .sync_call();
        }
    }

    #[endpoint(decreaseBalance)]
    fn decrease_balance(&self, holder: ManagedAddress, amount: BigUint) {
        let balance = self.balance(&holder).get();
        require!(balance >= amount, "ledger balance too low");
        self.balance(&holder).set(balance - amount);
    }

    #[view(getBalance)]
    fn get_balance(&self, holder: ManagedAddress) -> BigUint {
        self.balance(&holder).get()
    }

    #[storage_mapper("balance")]
    fn balance(&self, holder: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("proofsAccepted")]
    fn proofs_accepted(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("reentryController")]
    fn reentry_controller(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("reentryReserve")]
    fn reentry_reserve(&self) -> SingleValueMapper<ManagedAddress>;
}
