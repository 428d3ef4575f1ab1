// Redemption requests: burn on request, fulfillment and default handling.

mod setup;

use multiversx_sc::types::Address;
use multiversx_sc_scenario::{
    api::DebugApi, managed_address, managed_biguint, managed_buffer, rust_biguint,
    whitebox_legacy::TxResult,
};
use reserve_control::config::{
    ConfigModule, DEFAULT_EXECUTION_DELAY, DEFAULT_REDEMPTION_TIMEOUT, MAX_DURATION,
};
use reserve_control::consensus::ConsensusModule;
use reserve_control::errors::*;
use reserve_control::redemption::RedemptionModule;
use reserve_control::types::{CustodianStatus, GovernanceParam, ProposalAction, RedemptionStatus};
use setup::*;

fn request<Builder>(
    setup: &mut ReserveControlSetup<Builder>,
    holder: &Address,
    custodian: &Address,
    amount: u64,
) -> TxResult
where
    Builder: 'static + Copy + Fn() -> reserve_control::ContractObj<DebugApi>,
{
    setup.b_mock.execute_esdt_transfer(
        holder,
        &setup.sc_wrapper,
        CLAIM_TOKEN,
        0,
        &rust_biguint!(amount),
        |sc| {
            sc.request_redemption(managed_address!(custodian), managed_buffer!(b"bc1qpayout"));
        },
    )
}

fn flag_default<Builder>(
    setup: &mut ReserveControlSetup<Builder>,
    redemption_id: u64,
    reason: &[u8],
) -> TxResult
where
    Builder: 'static + Copy + Fn() -> reserve_control::ContractObj<DebugApi>,
{
    let arbiter = setup.arbiter.clone();
    setup
        .b_mock
        .execute_tx(&arbiter, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.flag_redemption_default(redemption_id, managed_buffer!(reason));
        })
}

fn redemption_status<Builder>(
    setup: &mut ReserveControlSetup<Builder>,
    redemption_id: u64,
) -> RedemptionStatus
where
    Builder: 'static + Copy + Fn() -> reserve_control::ContractObj<DebugApi>,
{
    let mut status = RedemptionStatus::Pending;
    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            status = sc
                .get_redemption(redemption_id)
                .into_option()
                .unwrap()
                .status;
        })
        .assert_ok();
    status
}

/// Custodian with 10 attested and backed, and `user` holding 5 claim tokens.
fn funded<Builder>(builder: Builder) -> (ReserveControlSetup<Builder>, Address, Address)
where
    Builder: 'static + Copy + Fn() -> reserve_control::ContractObj<DebugApi>,
{
    let mut setup = ReserveControlSetup::new(builder);
    let custodian = setup.new_user();
    let user = setup.new_user();
    setup.onboard_custodian(&custodian, 100, 10);
    setup.mint(&custodian, &user, 5).assert_ok();
    (setup, custodian, user)
}

#[test]
fn test_request_burns_and_records_pending() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);

    request(&mut setup, &user, &custodian, 3).assert_ok();

    setup.check_claim_balance(&user, 2);
    assert_eq!(setup.minted(&custodian), 2);
    assert_eq!(setup.custodian_minted(&custodian), 2);
    assert_eq!(setup.total_minted(), 2);
    assert!(setup.invariants_hold());

    setup
        .b_mock
        .execute_query(&setup.sc_wrapper, |sc| {
            assert_eq!(sc.redemption_count().get(), 1);
            let redemption = sc.get_redemption(1).into_option().unwrap();
            assert_eq!(redemption.status, RedemptionStatus::Pending);
            assert_eq!(redemption.redeemer, managed_address!(&user));
            assert_eq!(redemption.custodian, managed_address!(&custodian));
            assert_eq!(redemption.requested_at, START);
            assert_eq!(redemption.destination, managed_buffer!(b"bc1qpayout"));
        })
        .assert_ok();

    // Capacity frees up by the redeemed amount.
    assert_eq!(setup.capacity(&custodian), 8);
}

#[test]
fn test_request_validation() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);
    let stranger = setup.new_user();

    setup
        .b_mock
        .execute_esdt_transfer(
            &user,
            &setup.sc_wrapper,
            CLAIM_TOKEN,
            0,
            &rust_biguint!(1u64),
            |sc| {
                sc.request_redemption(managed_address!(&custodian), managed_buffer!(b""));
            },
        )
        .assert_user_error(ERR_EMPTY_DESTINATION);

    request(&mut setup, &user, &stranger, 1).assert_user_error(ERR_CUSTODIAN_NOT_REGISTERED);

    // Holds 5, asks for 6.
    setup.b_mock.set_esdt_balance(&user, CLAIM_TOKEN, &rust_biguint!(6u64));
    request(&mut setup, &user, &custodian, 6).assert_user_error(ERR_EXCEEDS_MINTED_SHARE);

    setup.b_mock.set_esdt_balance(&user, b"OTHER-123456", &rust_biguint!(5u64));
    setup
        .b_mock
        .execute_esdt_transfer(
            &user,
            &setup.sc_wrapper,
            b"OTHER-123456",
            0,
            &rust_biguint!(1u64),
            |sc| {
                sc.request_redemption(managed_address!(&custodian), managed_buffer!(b"bc1q"));
            },
        )
        .assert_user_error(ERR_WRONG_TOKEN);

    setup.pause_system().assert_ok();
    request(&mut setup, &user, &custodian, 1).assert_user_error(ERR_SYSTEM_PAUSED);
    assert_eq!(setup.minted(&custodian), 5);
}

#[test]
fn test_default_after_timeout_moves_custodian_under_review() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);
    request(&mut setup, &user, &custodian, 2).assert_ok();

    flag_default(&mut setup, 1, b"no payout").assert_user_error(ERR_REDEMPTION_TIMEOUT);
    setup.advance(DEFAULT_REDEMPTION_TIMEOUT);
    flag_default(&mut setup, 1, b"no payout").assert_user_error(ERR_REDEMPTION_TIMEOUT);
    flag_default(&mut setup, 9, b"no payout").assert_user_error(ERR_REDEMPTION_NOT_FOUND);

    setup.advance(1);
    flag_default(&mut setup, 1, b"").assert_user_error(ERR_EMPTY_REASON);
    flag_default(&mut setup, 1, b"no payout").assert_ok();

    assert_eq!(redemption_status(&mut setup, 1), RedemptionStatus::Defaulted);
    assert_eq!(
        setup.custodian_status(&custodian),
        CustodianStatus::UnderReview
    );

    flag_default(&mut setup, 1, b"no payout").assert_user_error(ERR_REDEMPTION_NOT_PENDING);
}

#[test]
fn test_default_leaves_custodian_already_under_review() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);
    request(&mut setup, &user, &custodian, 1).assert_ok();
    request(&mut setup, &user, &custodian, 1).assert_ok();

    setup.advance(DEFAULT_REDEMPTION_TIMEOUT + 1);
    flag_default(&mut setup, 1, b"no payout").assert_ok();
    flag_default(&mut setup, 2, b"no payout").assert_ok();

    assert_eq!(redemption_status(&mut setup, 2), RedemptionStatus::Defaulted);
    assert_eq!(
        setup.custodian_status(&custodian),
        CustodianStatus::UnderReview
    );
}

#[test]
fn test_default_through_watchdog_proposal() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);
    let w = setup.watchdogs.clone();
    request(&mut setup, &user, &custodian, 2).assert_ok();

    let proposer = w[0].clone();
    setup
        .b_mock
        .execute_tx(&proposer, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.create_proposal(ProposalAction::RedemptionDefault {
                redemption_id: 1,
                reason: managed_buffer!(b"payout never arrived"),
            });
        })
        .assert_ok();
    setup.vote(&w[1], 1).assert_ok();

    // Delay passed but the redemption has not timed out yet.
    setup.advance(DEFAULT_EXECUTION_DELAY);
    setup.execute(&w[2], 1).assert_user_error(ERR_REDEMPTION_TIMEOUT);

    setup.advance(DEFAULT_REDEMPTION_TIMEOUT);
    setup.execute(&w[2], 1).assert_ok();
    assert_eq!(redemption_status(&mut setup, 1), RedemptionStatus::Defaulted);
    assert_eq!(
        setup.custodian_status(&custodian),
        CustodianStatus::UnderReview
    );
}

#[test]
fn test_fulfillment_requires_arbiter_and_validator() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);
    request(&mut setup, &user, &custodian, 2).assert_ok();

    setup
        .b_mock
        .execute_tx(&user, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.record_fulfillment(1, managed_buffer!(b"txid"));
        })
        .assert_user_error(ERR_MISSING_ARBITER_ROLE);

    let arbiter = setup.arbiter.clone();
    setup
        .b_mock
        .execute_tx(&arbiter, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.record_fulfillment(2, managed_buffer!(b"txid"));
        })
        .assert_user_error(ERR_REDEMPTION_NOT_FOUND);
    setup
        .b_mock
        .execute_tx(&arbiter, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.record_fulfillment(1, managed_buffer!(b"txid"));
        })
        .assert_user_error(ERR_COLLABORATOR_MISSING);

    assert_eq!(redemption_status(&mut setup, 1), RedemptionStatus::Pending);
}

#[test]
fn test_longest_redemption_timeout_is_honoured() {
    let (mut setup, custodian, user) = funded(reserve_control::contract_obj);
    let owner = setup.owner.clone();

    setup
        .b_mock
        .execute_tx(&owner, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.set_governance_param(
                GovernanceParam::RedemptionTimeout,
                managed_biguint!(MAX_DURATION + 1),
            );
        })
        .assert_user_error(ERR_INVALID_PARAM_VALUE);
    setup
        .b_mock
        .execute_tx(&owner, &setup.sc_wrapper, &rust_biguint!(0u64), |sc| {
            sc.set_governance_param(GovernanceParam::RedemptionTimeout, managed_biguint!(MAX_DURATION));
        })
        .assert_ok();

    request(&mut setup, &user, &custodian, 1).assert_ok();
    flag_default(&mut setup, 1, b"no payout").assert_user_error(ERR_REDEMPTION_TIMEOUT);

    setup.advance(MAX_DURATION);
    flag_default(&mut setup, 1, b"no payout").assert_user_error(ERR_REDEMPTION_TIMEOUT);
    setup.advance(1);
    flag_default(&mut setup, 1, b"no payout").assert_ok();
}
