multiversx_sc::imports!();

use crate::balance_ledger_proxy;
use crate::errors::*;
use crate::types::{CollaboratorKey, CustodianStatus, ReserveAccount, ReserveType, Role};

/// Reserve authorization and the backing/minted guard. Every mutating path
/// checks `minted <= backing` and `minted <= minting_cap` before writing.
#[multiversx_sc::module]
pub trait ReserveModule:
    crate::capacity::CapacityModule
    + crate::custodian::CustodianModule
    + crate::attestation::AttestationModule
    + crate::config::ConfigModule
    + crate::roles::RolesModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: authorize
    // Re-authorizing an authorized reserve only updates its cap.
    // ========================================================

    #[endpoint(authorize)]
    fn authorize(&self, reserve: ManagedAddress, reserve_type: ReserveType, minting_cap: BigUint) {
        self.require_role(Role::Governance);
        require!(!reserve.is_zero(), ERR_ZERO_ADDRESS);

        if !self.reserves(&reserve).is_empty() {
            let mut account = self.reserves(&reserve).get();
            if account.authorized {
                require!(minting_cap >= account.minted, ERR_CAP_BELOW_MINTED);
                account.minting_cap = minting_cap;
                self.reserves(&reserve).set(&account);
                self.reserve_authorized_event(&reserve, account.reserve_type, &account.minting_cap);
                return;
            }
        }

        if reserve_type == ReserveType::Permissioned {
            self.require_custodian(&reserve);
        }

        // A returning reserve keeps its pause flag and backing audit count.
        let account = if self.reserves(&reserve).is_empty() {
            ReserveAccount::new(reserve_type, minting_cap)
        } else {
            let mut account = self.reserves(&reserve).get();
            account.authorized = true;
            account.reserve_type = reserve_type;
            account.minting_cap = minting_cap;
            account
        };
        self.reserves(&reserve).set(&account);
        self.known_reserves().insert(reserve.clone());

        self.reserve_authorized_event(&reserve, reserve_type, &account.minting_cap);
    }

    #[endpoint(deauthorize)]
    fn deauthorize(&self, reserve: ManagedAddress) {
        self.require_role(Role::Governance);
        let mut account = self.require_authorized_reserve(&reserve);
        require!(account.minted == 0u64, ERR_OUTSTANDING_BALANCE);

        account.authorized = false;
        account.backing = BigUint::zero();
        self.reserves(&reserve).set(&account);

        self.reserve_deauthorized_event(&reserve);
    }

    // ========================================================
    // ENDPOINT: setBacking
    // Called by the reserve itself or governance. Backing can move
    // freely as long as outstanding mints stay collateralized.
    // ========================================================

    #[endpoint(setBacking)]
    fn set_backing(&self, reserve: ManagedAddress, new_backing: BigUint) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == reserve || self.caller_has_role(Role::Governance),
            ERR_NOT_RESERVE_OPERATOR
        );

        let mut account = self.require_authorized_reserve(&reserve);
        require!(new_backing >= account.minted, ERR_BACKING_BELOW_MINTED);

        let old_backing = core::mem::replace(&mut account.backing, new_backing);
        account.backing_updates += 1;
        self.reserves(&reserve).set(&account);

        self.backing_changed_event(&reserve, &old_backing, &account.backing);
    }

    #[endpoint(mint)]
    fn mint(&self, reserve: ManagedAddress, recipient: ManagedAddress, amount: BigUint) {
        self.require_mint_operator(&reserve);
        require!(!recipient.is_zero(), ERR_ZERO_ADDRESS);
        self.require_amount_in_bounds(&amount);

        self.acquire_reserve_lock(&reserve);

        let mut account = self.check_mint_capacity(&reserve, &amount);
        self.record_mint(&reserve, &mut account, &amount);
        self.credit_holder(&reserve, &recipient, &amount);

        self.release_reserve_lock(&reserve);
    }

    // ========================================================
    // ENDPOINT: batchMint
    // Every entry is validated and the aggregate is checked against
    // backing once before anything is written. All or nothing.
    // ========================================================

    #[endpoint(batchMint)]
    fn batch_mint(
        &self,
        reserve: ManagedAddress,
        recipients: ManagedVec<ManagedAddress>,
        amounts: ManagedVec<BigUint>,
    ) {
        self.require_mint_operator(&reserve);
        require!(recipients.len() == amounts.len(), ERR_LENGTH_MISMATCH);
        require!(!recipients.is_empty(), ERR_EMPTY_BATCH);

        let mut total = BigUint::zero();
        for index in 0..recipients.len() {
            require!(!recipients.get(index).is_zero(), ERR_ZERO_ADDRESS);
            let amount = amounts.get(index);
            self.require_amount_in_bounds(&amount);
            total += &*amount;
        }

        self.acquire_reserve_lock(&reserve);

        let mut account = self.check_mint_capacity(&reserve, &total);
        self.record_mint(&reserve, &mut account, &total);
        for index in 0..recipients.len() {
            self.credit_holder(&reserve, &recipients.get(index), &amounts.get(index));
        }

        self.release_reserve_lock(&reserve);

        self.batch_mint_executed_event(&reserve, recipients.len(), &total);
    }

    // ========================================================
    // ENDPOINT: redeem
    // The holder pays claim tokens in; they are burned against the
    // holder's minted share. Only a system pause blocks this.
    // ========================================================

    #[payable("*")]
    #[endpoint(redeem)]
    fn redeem(&self, reserve: ManagedAddress) {
        let holder = self.blockchain().get_caller();
        let amount = self.receive_claim_tokens();

        self.acquire_reserve_lock(&reserve);
        self.process_redemption(&reserve, &holder, &amount);
        self.release_reserve_lock(&reserve);
    }

    // ========================================================
    // ENDPOINTS: pause controls
    // ========================================================

    #[endpoint(pauseReserve)]
    fn pause_reserve(&self, reserve: ManagedAddress) {
        self.require_role(Role::Pauser);
        let mut account = self.require_known_reserve(&reserve);
        require!(!account.paused, ERR_RESERVE_PAUSED);

        account.paused = true;
        self.reserves(&reserve).set(&account);
        self.reserve_paused_event(&reserve);
    }

    #[endpoint(unpauseReserve)]
    fn unpause_reserve(&self, reserve: ManagedAddress) {
        self.require_role(Role::Pauser);
        let mut account = self.require_known_reserve(&reserve);
        require!(account.paused, ERR_RESERVE_NOT_PAUSED);

        account.paused = false;
        self.reserves(&reserve).set(&account);
        self.reserve_unpaused_event(&reserve);
    }

    #[endpoint(pauseSystem)]
    fn pause_system(&self) {
        self.require_role(Role::Pauser);
        require!(!self.system_paused().get(), ERR_SYSTEM_PAUSED);

        self.system_paused().set(true);
        self.system_pause_changed_event(true);
    }

    #[endpoint(unpauseSystem)]
    fn unpause_system(&self) {
        self.require_role(Role::Pauser);
        require!(self.system_paused().get(), ERR_SYSTEM_NOT_PAUSED);

        self.system_paused().set(false);
        self.system_pause_changed_event(false);
    }

    // ========================================================
    // INTERNAL: guard checks
    // ========================================================

    fn require_known_reserve(&self, reserve: &ManagedAddress) -> ReserveAccount<Self::Api> {
        require!(!self.reserves(reserve).is_empty(), ERR_RESERVE_UNKNOWN);
        self.reserves(reserve).get()
    }

    fn require_authorized_reserve(&self, reserve: &ManagedAddress) -> ReserveAccount<Self::Api> {
        require!(!self.reserves(reserve).is_empty(), ERR_RESERVE_NOT_AUTHORIZED);
        let account = self.reserves(reserve).get();
        require!(account.authorized, ERR_RESERVE_NOT_AUTHORIZED);
        account
    }

    fn require_mint_operator(&self, reserve: &ManagedAddress) {
        let caller = self.blockchain().get_caller();
        require!(
            &caller == reserve || self.caller_has_role(Role::Minter),
            ERR_MISSING_MINTER_ROLE
        );
    }

    fn require_amount_in_bounds(&self, amount: &BigUint) {
        require!(*amount > 0u64, ERR_ZERO_AMOUNT);
        require!(*amount >= self.min_mint_amount().get(), ERR_AMOUNT_BELOW_MIN);
        require!(*amount <= self.max_single_mint().get(), ERR_AMOUNT_ABOVE_MAX);
    }

    /// Checks that `amount` more can be minted against the reserve as of now.
    fn check_mint_capacity(
        &self,
        reserve: &ManagedAddress,
        amount: &BigUint,
    ) -> ReserveAccount<Self::Api> {
        let account = self.require_authorized_reserve(reserve);
        require!(!self.system_paused().get(), ERR_SYSTEM_PAUSED);
        require!(!account.paused, ERR_RESERVE_PAUSED);

        let new_minted = &account.minted + amount;
        require!(new_minted <= account.backing, ERR_INSUFFICIENT_BACKING);
        require!(new_minted <= account.minting_cap, ERR_EXCEEDS_MINTING_CAP);

        if account.reserve_type == ReserveType::Permissioned {
            let record = self.require_custodian(reserve);
            require!(
                record.status == CustodianStatus::Active,
                ERR_CUSTODIAN_NOT_ACTIVE
            );
            require!(
                *amount <= self.available_minting_capacity(reserve),
                ERR_INSUFFICIENT_CAPACITY
            );
        }

        account
    }

    fn acquire_reserve_lock(&self, reserve: &ManagedAddress) {
        require!(!self.reserve_busy(reserve).get(), ERR_RESERVE_BUSY);
        self.reserve_busy(reserve).set(true);
    }

    fn release_reserve_lock(&self, reserve: &ManagedAddress) {
        self.reserve_busy(reserve).clear();
    }

    // ========================================================
    // INTERNAL: bookkeeping and ledger legs
    // ========================================================

    fn record_mint(
        &self,
        reserve: &ManagedAddress,
        account: &mut ReserveAccount<Self::Api>,
        amount: &BigUint,
    ) {
        account.minted += amount;
        self.reserves(reserve).set(&*account);
        self.total_minted().update(|total| *total += amount);

        if account.reserve_type == ReserveType::Permissioned {
            self.custodians(reserve)
                .update(|record| record.minted_amount += amount);
        }
    }

    fn credit_holder(&self, reserve: &ManagedAddress, recipient: &ManagedAddress, amount: &BigUint) {
        self.minted_share(reserve, recipient)
            .update(|share| *share += amount);

        let token = self.claim_token().get();
        self.send().esdt_local_mint(&token, 0, amount);
        self.send().direct_esdt(recipient, &token, 0, amount);

        if !self.collaborators(CollaboratorKey::BalanceLedger).is_empty() {
            let ledger = self.collaborators(CollaboratorKey::BalanceLedger).get();
            self.tx()
                .to(&ledger)
                .typed(balance_ledger_proxy::BalanceLedgerProxy)
                .increase_balance(recipient, amount)
                .sync_call();
        }

        self.mint_executed_event(reserve, recipient, amount);
    }

    fn receive_claim_tokens(&self) -> BigUint {
        let payment = self.call_value().single_esdt();
        require!(
            payment.token_identifier == self.claim_token().get(),
            ERR_WRONG_TOKEN
        );
        require!(payment.amount > 0u64, ERR_ZERO_AMOUNT);
        payment.amount.clone()
    }

    /// Burns `amount` already paid in by `holder` and unwinds its mint.
    fn process_redemption(&self, reserve: &ManagedAddress, holder: &ManagedAddress, amount: &BigUint) {
        require!(!self.system_paused().get(), ERR_SYSTEM_PAUSED);
        let mut account = self.require_known_reserve(reserve);

        let share = self.minted_share(reserve, holder).get();
        require!(*amount <= share, ERR_EXCEEDS_MINTED_SHARE);
        require!(*amount <= account.minted, ERR_EXCEEDS_MINTED_SHARE);

        account.minted -= amount;
        self.reserves(reserve).set(&account);
        self.minted_share(reserve, holder).set(share - amount);
        self.total_minted().update(|total| *total -= amount);

        if account.reserve_type == ReserveType::Permissioned && !self.custodians(reserve).is_empty() {
            self.custodians(reserve).update(|record| {
                record.minted_amount =
                    crate::capacity::saturating_sub(&record.minted_amount, amount);
            });
        }

        let token = self.claim_token().get();
        self.send().esdt_local_burn(&token, 0, amount);

        if !self.collaborators(CollaboratorKey::BalanceLedger).is_empty() {
            let ledger = self.collaborators(CollaboratorKey::BalanceLedger).get();
            self.tx()
                .to(&ledger)
                .typed(balance_ledger_proxy::BalanceLedgerProxy)
                .decrease_balance(holder, amount)
                .sync_call();
        }

        self.redemption_processed_event(reserve, holder, amount);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getReserve)]
    fn get_reserve(&self, reserve: ManagedAddress) -> OptionalValue<ReserveAccount<Self::Api>> {
        if self.reserves(&reserve).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.reserves(&reserve).get())
        }
    }

    #[view(getReserves)]
    fn get_reserves(&self) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for reserve in self.known_reserves().iter() {
            result.push(reserve);
        }
        result
    }

    #[view(getMintedShare)]
    fn get_minted_share(&self, reserve: ManagedAddress, holder: ManagedAddress) -> BigUint {
        self.minted_share(&reserve, &holder).get()
    }

    #[view(verifyReserveInvariants)]
    fn verify_reserve_invariants(&self) -> bool {
        self.known_reserves()
            .iter()
            .all(|reserve| self.reserves(&reserve).get().is_within_invariants())
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("reserves")]
    fn reserves(&self, reserve: &ManagedAddress) -> SingleValueMapper<ReserveAccount<Self::Api>>;

    #[storage_mapper("knownReserves")]
    fn known_reserves(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("mintedShare")]
    fn minted_share(
        &self,
        reserve: &ManagedAddress,
        holder: &ManagedAddress,
    ) -> SingleValueMapper<BigUint>;

    #[view(getTotalMinted)]
    #[storage_mapper("totalMinted")]
    fn total_minted(&self) -> SingleValueMapper<BigUint>;

    #[view(isSystemPaused)]
    #[storage_mapper("systemPaused")]
    fn system_paused(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("reserveBusy")]
    fn reserve_busy(&self, reserve: &ManagedAddress) -> SingleValueMapper<bool>;
}
