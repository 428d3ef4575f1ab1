#![no_std]

multiversx_sc::imports!();

pub mod attestation;
pub mod balance_ledger_proxy;
pub mod capacity;
pub mod config;
pub mod consensus;
pub mod custodian;
pub mod errors;
pub mod events;
pub mod proof_validator_proxy;
pub mod redemption;
pub mod reserve;
pub mod roles;
pub mod types;

use config::{
    DEFAULT_EXECUTION_DELAY, DEFAULT_REDEMPTION_TIMEOUT, DEFAULT_VOTING_PERIOD, MAX_DURATION,
};
use errors::{ERR_INVALID_MINT_BOUNDS, ERR_INVALID_PARAM_VALUE, ERR_INVALID_QUORUM};
use types::Role;

// ============================================================
// Contract
// ============================================================

/// Reserve-backed claim-token minting under solvency enforcement and
/// M-of-N watchdog governance.
#[multiversx_sc::contract]
pub trait ReserveControl:
    consensus::ConsensusModule
    + redemption::RedemptionModule
    + reserve::ReserveModule
    + capacity::CapacityModule
    + custodian::CustodianModule
    + attestation::AttestationModule
    + config::ConfigModule
    + roles::RolesModule
    + events::EventsModule
{
    // ========================================================
    // Init / Upgrade
    // The deployer becomes the first Governance member. The claim
    // token must grant this contract local mint and burn roles.
    // ========================================================

    #[init]
    fn init(
        &self,
        claim_token: TokenIdentifier,
        required_votes: u32,
        stale_threshold: u64,
        min_mint_amount: BigUint,
        max_single_mint: BigUint,
    ) {
        require!(claim_token.is_valid_esdt_identifier(), ERR_INVALID_PARAM_VALUE);
        require!(required_votes >= 1, ERR_INVALID_QUORUM);
        require!(
            stale_threshold > 0 && stale_threshold <= MAX_DURATION,
            ERR_INVALID_PARAM_VALUE
        );
        require!(min_mint_amount > 0u64, ERR_INVALID_PARAM_VALUE);
        require!(min_mint_amount <= max_single_mint, ERR_INVALID_MINT_BOUNDS);

        self.claim_token().set(&claim_token);
        self.required_votes().set(required_votes);
        self.stale_threshold().set(stale_threshold);
        self.min_mint_amount().set(&min_mint_amount);
        self.max_single_mint().set(&max_single_mint);
        self.voting_period().set(DEFAULT_VOTING_PERIOD);
        self.execution_delay().set(DEFAULT_EXECUTION_DELAY);
        self.redemption_timeout().set(DEFAULT_REDEMPTION_TIMEOUT);
        self.total_minted().set(BigUint::zero());

        let deployer = self.blockchain().get_caller();
        self.role_members(Role::Governance).insert(deployer.clone());
        self.role_granted_event(Role::Governance, &deployer);
    }

    #[upgrade]
    fn upgrade(&self) {}
}
