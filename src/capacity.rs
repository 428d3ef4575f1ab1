multiversx_sc::imports!();

use crate::types::CustodianStatus;

/// Minting capacity, derived fresh on every query from status, attestation
/// freshness, minted amount and the custodian's cap. Nothing here is cached.
#[multiversx_sc::module]
pub trait CapacityModule:
    crate::custodian::CustodianModule
    + crate::attestation::AttestationModule
    + crate::config::ConfigModule
    + crate::roles::RolesModule
    + crate::events::EventsModule
{
    #[view(getAvailableMintingCapacity)]
    fn get_available_minting_capacity(&self, custodian: ManagedAddress) -> BigUint {
        self.available_minting_capacity(&custodian)
    }

    fn available_minting_capacity(&self, custodian: &ManagedAddress) -> BigUint {
        if self.custodians(custodian).is_empty() {
            return BigUint::zero();
        }
        let record = self.custodians(custodian).get();
        if record.status != CustodianStatus::Active {
            return BigUint::zero();
        }

        let (balance, stale) = self.balance_and_staleness(custodian);
        if stale {
            return BigUint::zero();
        }

        let reserve_capacity = saturating_sub(&balance, &record.minted_amount);
        let cap_capacity = saturating_sub(&record.max_capacity, &record.minted_amount);
        if reserve_capacity < cap_capacity {
            reserve_capacity
        } else {
            cap_capacity
        }
    }
}

pub fn saturating_sub<M: ManagedTypeApi>(a: &BigUint<M>, b: &BigUint<M>) -> BigUint<M> {
    if a > b {
        a - b
    } else {
        BigUint::zero()
    }
}
