#![allow(dead_code)]

use multiversx_sc::types::{Address, EsdtLocalRole, ManagedVec};
use multiversx_sc_scenario::{
    api::DebugApi, managed_address, managed_biguint, managed_buffer, managed_token_id,
    rust_biguint, whitebox_legacy::*,
};

use reserve_control::attestation::AttestationModule;
use reserve_control::capacity::CapacityModule;
use reserve_control::consensus::ConsensusModule;
use reserve_control::custodian::CustodianModule;
use reserve_control::reserve::ReserveModule;
use reserve_control::roles::RolesModule;
use reserve_control::types::{
    CustodianStatus, GovernanceParam, ProposalAction, ProposalStatus, ReserveType, Role,
};
use reserve_control::ReserveControl;

pub const WASM_PATH: &str = "output/reserve-control.wasm";
pub const CLAIM_TOKEN: &[u8] = b"CLAIM-a1b2c3";
pub const REQUIRED_VOTES: u32 = 2;
pub const WATCHDOG_COUNT: usize = 5;
pub const STALE_THRESHOLD: u64 = 3_600;
pub const MIN_MINT: u64 = 1;
pub const MAX_SINGLE_MINT: u64 = 1_000_000;
pub const START: u64 = 1_700_000_000;

pub struct ReserveControlSetup<Builder>
where
    Builder: 'static + Copy + Fn() -> reserve_control::ContractObj<DebugApi>,
{
    pub b_mock: BlockchainStateWrapper,
    pub owner: Address,
    pub attester: Address,
    pub arbiter: Address,
    pub registrar: Address,
    pub pauser: Address,
    pub watchdogs: Vec<Address>,
    pub sc_wrapper: ContractObjWrapper<reserve_control::ContractObj<DebugApi>, Builder>,
    now: u64,
}

impl<Builder> ReserveControlSetup<Builder>
where
    Builder: 'static + Copy + Fn() -> reserve_control::ContractObj<DebugApi>,
{
    pub fn new(builder: Builder) -> Self {
        let rust_zero = rust_biguint!(0u64);
        let mut b_mock = BlockchainStateWrapper::new();
        let owner = b_mock.create_user_account(&rust_zero);
        let attester = b_mock.create_user_account(&rust_zero);
        let arbiter = b_mock.create_user_account(&rust_zero);
        let registrar = b_mock.create_user_account(&rust_zero);
        let pauser = b_mock.create_user_account(&rust_zero);
        let watchdogs: Vec<Address> = (0..WATCHDOG_COUNT)
            .map(|_| b_mock.create_user_account(&rust_zero))
            .collect();

        let sc_wrapper =
            b_mock.create_sc_account(&rust_zero, Some(&owner), builder, WASM_PATH);
        b_mock.set_esdt_local_roles(
            sc_wrapper.address_ref(),
            CLAIM_TOKEN,
            &[EsdtLocalRole::Mint, EsdtLocalRole::Burn],
        );
        b_mock.set_block_timestamp(START);

        b_mock
            .execute_tx(&owner, &sc_wrapper, &rust_zero, |sc| {
                sc.init(
                    managed_token_id!(CLAIM_TOKEN),
                    REQUIRED_VOTES,
                    STALE_THRESHOLD,
                    managed_biguint!(MIN_MINT),
                    managed_biguint!(MAX_SINGLE_MINT),
                );
            })
            .assert_ok();

        b_mock
            .execute_tx(&owner, &sc_wrapper, &rust_zero, |sc| {
                sc.grant_role(Role::Attester, managed_address!(&attester));
                sc.grant_role(Role::Arbiter, managed_address!(&arbiter));
                sc.grant_role(Role::Registrar, managed_address!(&registrar));
                sc.grant_role(Role::Pauser, managed_address!(&pauser));
                for watchdog in watchdogs.iter() {
                    sc.add_watchdog(managed_address!(watchdog));
                }
            })
            .assert_ok();

        ReserveControlSetup {
            b_mock,
            owner,
            attester,
            arbiter,
            registrar,
            pauser,
            watchdogs,
            sc_wrapper,
            now: START,
        }
    }

    // ── Clock ──

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn set_time(&mut self, timestamp: u64) {
        self.now = timestamp;
        self.b_mock.set_block_timestamp(timestamp);
    }

    pub fn advance(&mut self, seconds: u64) {
        let next = self.now + seconds;
        self.set_time(next);
    }

    pub fn new_user(&mut self) -> Address {
        self.b_mock.create_user_account(&rust_biguint!(0u64))
    }

    // ── Reserves ──

    pub fn authorize(&mut self, reserve: &Address, reserve_type: ReserveType, cap: u64) -> TxResult {
        let owner = self.owner.clone();
        self.b_mock
            .execute_tx(&owner, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.authorize(managed_address!(reserve), reserve_type, managed_biguint!(cap));
            })
    }

    pub fn deauthorize(&mut self, reserve: &Address) -> TxResult {
        let owner = self.owner.clone();
        self.b_mock
            .execute_tx(&owner, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.deauthorize(managed_address!(reserve));
            })
    }

    /// Called by the reserve itself.
    pub fn set_backing(&mut self, reserve: &Address, backing: u64) -> TxResult {
        self.b_mock
            .execute_tx(reserve, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.set_backing(managed_address!(reserve), managed_biguint!(backing));
            })
    }

    /// Called by the reserve itself.
    pub fn mint(&mut self, reserve: &Address, recipient: &Address, amount: u64) -> TxResult {
        self.b_mock
            .execute_tx(reserve, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.mint(
                    managed_address!(reserve),
                    managed_address!(recipient),
                    managed_biguint!(amount),
                );
            })
    }

    pub fn batch_mint(
        &mut self,
        reserve: &Address,
        recipients: &[Address],
        amounts: &[u64],
    ) -> TxResult {
        self.b_mock
            .execute_tx(reserve, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                let mut managed_recipients = ManagedVec::new();
                for recipient in recipients {
                    managed_recipients.push(managed_address!(recipient));
                }
                let mut managed_amounts = ManagedVec::new();
                for amount in amounts {
                    managed_amounts.push(managed_biguint!(*amount));
                }
                sc.batch_mint(managed_address!(reserve), managed_recipients, managed_amounts);
            })
    }

    pub fn redeem(&mut self, holder: &Address, reserve: &Address, amount: u64) -> TxResult {
        self.b_mock.execute_esdt_transfer(
            holder,
            &self.sc_wrapper,
            CLAIM_TOKEN,
            0,
            &rust_biguint!(amount),
            |sc| {
                sc.redeem(managed_address!(reserve));
            },
        )
    }

    pub fn pause_reserve(&mut self, reserve: &Address) -> TxResult {
        let pauser = self.pauser.clone();
        self.b_mock
            .execute_tx(&pauser, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.pause_reserve(managed_address!(reserve));
            })
    }

    pub fn pause_system(&mut self) -> TxResult {
        let pauser = self.pauser.clone();
        self.b_mock
            .execute_tx(&pauser, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.pause_system();
            })
    }

    pub fn unpause_system(&mut self) -> TxResult {
        let pauser = self.pauser.clone();
        self.b_mock
            .execute_tx(&pauser, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.unpause_system();
            })
    }

    // ── Custodians and attestations ──

    pub fn register_custodian(&mut self, custodian: &Address, max_capacity: u64) -> TxResult {
        let registrar = self.registrar.clone();
        self.b_mock
            .execute_tx(&registrar, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.register_custodian(managed_address!(custodian), managed_biguint!(max_capacity));
            })
    }

    pub fn attest(&mut self, custodian: &Address, balance: u64) -> TxResult {
        let attester = self.attester.clone();
        self.b_mock
            .execute_tx(&attester, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.submit_attestation(managed_address!(custodian), managed_biguint!(balance));
            })
    }

    pub fn set_custodian_status(
        &mut self,
        custodian: &Address,
        status: CustodianStatus,
        reason: &[u8],
    ) -> TxResult {
        let arbiter = self.arbiter.clone();
        self.b_mock
            .execute_tx(&arbiter, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.set_custodian_status(managed_address!(custodian), status, managed_buffer!(reason));
            })
    }

    /// Registers a custodian, authorizes it as a permissioned reserve,
    /// attests `balance` and sets backing to the same amount.
    pub fn onboard_custodian(&mut self, custodian: &Address, capacity: u64, balance: u64) {
        self.register_custodian(custodian, capacity).assert_ok();
        self.authorize(custodian, ReserveType::Permissioned, capacity)
            .assert_ok();
        self.attest(custodian, balance).assert_ok();
        self.set_backing(custodian, balance).assert_ok();
    }

    // ── Governance ──

    pub fn propose_status_change(
        &mut self,
        proposer: &Address,
        custodian: &Address,
        new_status: CustodianStatus,
    ) -> TxResult {
        self.b_mock
            .execute_tx(proposer, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.create_proposal(ProposalAction::StatusChange {
                    custodian: managed_address!(custodian),
                    new_status,
                    reason: managed_buffer!(b"watchdog report"),
                });
            })
    }

    pub fn propose_param_change(
        &mut self,
        proposer: &Address,
        param: GovernanceParam,
        value: u64,
    ) -> TxResult {
        self.b_mock
            .execute_tx(proposer, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.create_proposal(ProposalAction::ParamChange {
                    param,
                    value: managed_biguint!(value),
                });
            })
    }

    pub fn vote(&mut self, voter: &Address, proposal_id: u64) -> TxResult {
        self.b_mock
            .execute_tx(voter, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.vote(proposal_id);
            })
    }

    pub fn execute(&mut self, executor: &Address, proposal_id: u64) -> TxResult {
        self.b_mock
            .execute_tx(executor, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.execute_proposal(proposal_id);
            })
    }

    pub fn cancel(&mut self, caller: &Address, proposal_id: u64) -> TxResult {
        self.b_mock
            .execute_tx(caller, &self.sc_wrapper, &rust_biguint!(0u64), |sc| {
                sc.cancel_proposal(proposal_id);
            })
    }

    // ── Queries ──

    pub fn reserve_state(&mut self, reserve: &Address) -> (u64, u64, u64, bool, bool) {
        let mut state = (0u64, 0u64, 0u64, false, false);
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                let account = sc
                    .get_reserve(managed_address!(reserve))
                    .into_option()
                    .unwrap();
                state = (
                    account.backing.to_u64().unwrap(),
                    account.minted.to_u64().unwrap(),
                    account.minting_cap.to_u64().unwrap(),
                    account.authorized,
                    account.paused,
                );
            })
            .assert_ok();
        state
    }

    pub fn minted(&mut self, reserve: &Address) -> u64 {
        self.reserve_state(reserve).1
    }

    pub fn backing(&mut self, reserve: &Address) -> u64 {
        self.reserve_state(reserve).0
    }

    pub fn total_minted(&mut self) -> u64 {
        let mut total = 0u64;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                total = sc.total_minted().get().to_u64().unwrap();
            })
            .assert_ok();
        total
    }

    pub fn invariants_hold(&mut self) -> bool {
        let mut holds = false;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                holds = sc.verify_reserve_invariants();
            })
            .assert_ok();
        holds
    }

    pub fn capacity(&mut self, custodian: &Address) -> u64 {
        let mut capacity = 0u64;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                capacity = sc
                    .get_available_minting_capacity(managed_address!(custodian))
                    .to_u64()
                    .unwrap();
            })
            .assert_ok();
        capacity
    }

    pub fn custodian_status(&mut self, custodian: &Address) -> CustodianStatus {
        let mut status = CustodianStatus::Active;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                status = sc.get_custodian_status(managed_address!(custodian));
            })
            .assert_ok();
        status
    }

    pub fn custodian_minted(&mut self, custodian: &Address) -> u64 {
        let mut minted = 0u64;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                let record = sc
                    .get_custodian(managed_address!(custodian))
                    .into_option()
                    .unwrap();
                minted = record.minted_amount.to_u64().unwrap();
            })
            .assert_ok();
        minted
    }

    pub fn balance_and_staleness(&mut self, custodian: &Address) -> (u64, bool) {
        let mut result = (0u64, false);
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                let (balance, stale) = sc
                    .get_balance_and_staleness(managed_address!(custodian))
                    .into_tuple();
                result = (balance.to_u64().unwrap(), stale);
            })
            .assert_ok();
        result
    }

    pub fn attestation_count(&mut self, custodian: &Address) -> usize {
        let mut count = 0usize;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                count = sc.get_attestation_count(managed_address!(custodian));
            })
            .assert_ok();
        count
    }

    pub fn proposal_status(&mut self, proposal_id: u64) -> ProposalStatus {
        let mut status = ProposalStatus::Open;
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                status = sc.get_proposal_status(proposal_id);
            })
            .assert_ok();
        status
    }

    pub fn proposal_votes(&mut self, proposal_id: u64) -> (u32, u32) {
        let mut votes = (0u32, 0u32);
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                let proposal = sc.get_proposal(proposal_id);
                votes = (proposal.vote_count, proposal.required_votes);
            })
            .assert_ok();
        votes
    }

    pub fn consensus_params(&mut self) -> (u32, u32) {
        let mut params = (0u32, 0u32);
        self.b_mock
            .execute_query(&self.sc_wrapper, |sc| {
                params = sc.get_consensus_params().into_tuple();
            })
            .assert_ok();
        params
    }

    pub fn check_claim_balance(&self, holder: &Address, amount: u64) {
        self.b_mock
            .check_esdt_balance(holder, CLAIM_TOKEN, &rust_biguint!(amount));
    }
}
