multiversx_sc::imports!();

use crate::errors::*;
use crate::types::{GovernanceParam, Proposal, ProposalAction, ProposalStatus, Role};

/// M-of-N watchdog governance.
///
/// A proposal snapshots the quorum in force when it is created. Once
/// `vote_count` reaches that quorum the proposal is Approved and becomes
/// executable after `executionDelay` seconds, measured from the block in
/// which quorum was reached. Proposals that never reach quorum freeze as
/// Expired once their voting window closes.
#[multiversx_sc::module]
pub trait ConsensusModule:
    crate::redemption::RedemptionModule
    + crate::reserve::ReserveModule
    + crate::capacity::CapacityModule
    + crate::custodian::CustodianModule
    + crate::attestation::AttestationModule
    + crate::config::ConfigModule
    + crate::roles::RolesModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINTS: watchdog set
    // ========================================================

    #[endpoint(addWatchdog)]
    fn add_watchdog(&self, watchdog: ManagedAddress) {
        self.require_role(Role::Governance);
        require!(!watchdog.is_zero(), ERR_ZERO_ADDRESS);
        require!(
            self.watchdogs().insert(watchdog.clone()),
            ERR_WATCHDOG_ALREADY_ACTIVE
        );

        self.watchdog_added_event(&watchdog);
    }

    /// Votes already cast by the watchdog stay counted.
    #[endpoint(removeWatchdog)]
    fn remove_watchdog(&self, watchdog: ManagedAddress) {
        self.require_role(Role::Governance);
        require!(
            self.watchdogs().contains(&watchdog),
            ERR_WATCHDOG_NOT_ACTIVE
        );
        require!(
            self.watchdogs().len() - 1 >= self.required_votes().get() as usize,
            ERR_WATCHDOG_BELOW_QUORUM
        );

        self.watchdogs().swap_remove(&watchdog);
        self.watchdog_removed_event(&watchdog);
    }

    // ========================================================
    // ENDPOINT: createProposal
    // The proposer's vote is counted immediately.
    // ========================================================

    #[endpoint(createProposal)]
    fn create_proposal(&self, action: ProposalAction<Self::Api>) -> u64 {
        self.require_watchdog();
        self.validate_action(&action);

        let caller = self.blockchain().get_caller();
        let now = self.blockchain().get_block_timestamp();
        let required_votes = self.required_votes().get();
        let proposal_id = self.proposal_count().get() + 1;
        let kind = action.kind();

        let proposal = Proposal {
            id: proposal_id,
            proposer: caller.clone(),
            action,
            vote_count: 1,
            required_votes,
            created_at: now,
            expires_at: now.saturating_add(self.voting_period().get()),
            quorum_reached_at: if required_votes <= 1 { Some(now) } else { None },
            executed: false,
            cancelled: false,
        };

        self.proposals(proposal_id).set(&proposal);
        self.proposal_count().set(proposal_id);
        self.voters(proposal_id).push(&caller);
        self.has_voted(proposal_id, &caller).set(true);

        self.proposal_created_event(proposal_id, &caller, kind, required_votes);
        if proposal.quorum_reached_at.is_some() {
            self.quorum_reached_event(proposal_id, now);
        }

        proposal_id
    }

    #[endpoint(vote)]
    fn vote(&self, proposal_id: u64) {
        self.require_watchdog();
        let mut proposal = self.require_proposal(proposal_id);
        let now = self.blockchain().get_block_timestamp();
        self.require_live(proposal.status(now));

        let caller = self.blockchain().get_caller();
        require!(
            !self.has_voted(proposal_id, &caller).get(),
            ERR_ALREADY_VOTED
        );

        proposal.vote_count += 1;
        self.voters(proposal_id).push(&caller);
        self.has_voted(proposal_id, &caller).set(true);

        let reached_now =
            proposal.quorum_reached_at.is_none() && proposal.vote_count >= proposal.required_votes;
        if reached_now {
            proposal.quorum_reached_at = Some(now);
        }
        self.proposals(proposal_id).set(&proposal);

        self.vote_cast_event(proposal_id, &caller, proposal.vote_count);
        if reached_now {
            self.quorum_reached_event(proposal_id, now);
        }
    }

    // ========================================================
    // ENDPOINT: executeProposal
    // Marks the proposal executed, then applies its action. A failing
    // action reverts the whole call, including the executed flag.
    // ========================================================

    #[endpoint(executeProposal)]
    fn execute_proposal(&self, proposal_id: u64) {
        self.require_watchdog();
        let mut proposal = self.require_proposal(proposal_id);
        let now = self.blockchain().get_block_timestamp();
        self.require_live(proposal.status(now));

        let reached_at = match proposal.quorum_reached_at {
            Some(reached_at) => reached_at,
            None => sc_panic!(ERR_QUORUM_NOT_REACHED),
        };
        require!(
            now >= reached_at.saturating_add(self.execution_delay().get()),
            ERR_EXECUTION_DELAY
        );

        proposal.executed = true;
        self.proposals(proposal_id).set(&proposal);

        self.dispatch_action(&proposal.action);

        let executor = self.blockchain().get_caller();
        self.proposal_executed_event(proposal_id, &executor);
    }

    #[endpoint(cancelProposal)]
    fn cancel_proposal(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();
        let mut proposal = self.require_proposal(proposal_id);
        require!(
            caller == proposal.proposer || self.caller_has_role(Role::Governance),
            ERR_NOT_PROPOSER_OR_ADMIN
        );

        let now = self.blockchain().get_block_timestamp();
        self.require_live(proposal.status(now));
        require!(proposal.vote_count <= 1, ERR_PROPOSAL_HAS_VOTES);
        require!(
            proposal.quorum_reached_at.is_none(),
            ERR_PROPOSAL_APPROVED
        );

        proposal.cancelled = true;
        self.proposals(proposal_id).set(&proposal);

        self.proposal_cancelled_event(proposal_id, &caller);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_watchdog(&self) {
        let caller = self.blockchain().get_caller();
        require!(self.watchdogs().contains(&caller), ERR_NOT_WATCHDOG);
    }

    fn require_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        require!(
            !self.proposals(proposal_id).is_empty(),
            ERR_PROPOSAL_NOT_FOUND
        );
        self.proposals(proposal_id).get()
    }

    /// Rejects every terminal status.
    fn require_live(&self, status: ProposalStatus) {
        match status {
            ProposalStatus::Executed => sc_panic!(ERR_PROPOSAL_EXECUTED),
            ProposalStatus::Cancelled => sc_panic!(ERR_PROPOSAL_CANCELLED),
            ProposalStatus::Expired => sc_panic!(ERR_PROPOSAL_EXPIRED),
            ProposalStatus::Open | ProposalStatus::Approved => {}
        }
    }

    fn validate_action(&self, action: &ProposalAction<Self::Api>) {
        match action {
            ProposalAction::StatusChange {
                custodian, reason, ..
            } => {
                require!(!custodian.is_zero(), ERR_ZERO_ADDRESS);
                require!(!reason.is_empty(), ERR_EMPTY_REASON);
            }
            ProposalAction::WalletDeregistration { custodian, wallet } => {
                require!(!custodian.is_zero(), ERR_ZERO_ADDRESS);
                require!(!wallet.is_empty(), ERR_EMPTY_WALLET);
            }
            ProposalAction::RedemptionDefault { reason, .. } => {
                require!(!reason.is_empty(), ERR_EMPTY_REASON);
            }
            ProposalAction::ParamChange { .. } => {}
        }
    }

    fn dispatch_action(&self, action: &ProposalAction<Self::Api>) {
        let actor = self.blockchain().get_sc_address();
        match action {
            ProposalAction::StatusChange {
                custodian,
                new_status,
                reason,
            } => self.transition_status(custodian, *new_status, reason, &actor),
            ProposalAction::WalletDeregistration { custodian, wallet } => {
                self.deregister_wallet(custodian, wallet)
            }
            ProposalAction::RedemptionDefault {
                redemption_id,
                reason,
            } => self.apply_redemption_default(*redemption_id, reason, &actor),
            ProposalAction::ParamChange { param, value } => {
                if *param == GovernanceParam::RequiredVotes {
                    self.apply_required_votes(value);
                } else {
                    self.apply_param(*param, value);
                }
            }
        }
    }

    /// New quorum must be reachable by the current watchdog set.
    fn apply_required_votes(&self, value: &BigUint) {
        let required = match value.to_u64() {
            Some(required) if required >= 1 && required <= self.watchdogs().len() as u64 => {
                required as u32
            }
            _ => sc_panic!(ERR_INVALID_QUORUM),
        };

        self.required_votes().set(required);
        self.param_changed_event(GovernanceParam::RequiredVotes, value);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getProposal)]
    fn get_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        self.require_proposal(proposal_id)
    }

    #[view(getProposalStatus)]
    fn get_proposal_status(&self, proposal_id: u64) -> ProposalStatus {
        let now = self.blockchain().get_block_timestamp();
        self.require_proposal(proposal_id).status(now)
    }

    #[view(getProposalVoters)]
    fn get_proposal_voters(&self, proposal_id: u64) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for voter in self.voters(proposal_id).iter() {
            result.push(voter);
        }
        result
    }

    #[view(hasWatchdogVoted)]
    fn has_watchdog_voted(&self, proposal_id: u64, watchdog: ManagedAddress) -> bool {
        self.has_voted(proposal_id, &watchdog).get()
    }

    /// `(required, total)` where total is the active watchdog count.
    #[view(getConsensusParams)]
    fn get_consensus_params(&self) -> MultiValue2<u32, u32> {
        (self.required_votes().get(), self.watchdogs().len() as u32).into()
    }

    #[view(isWatchdog)]
    fn is_watchdog(&self, account: ManagedAddress) -> bool {
        self.watchdogs().contains(&account)
    }

    #[view(getWatchdogs)]
    fn get_watchdogs(&self) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for watchdog in self.watchdogs().iter() {
            result.push(watchdog);
        }
        result
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("watchdogs")]
    fn watchdogs(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[view(getProposalCount)]
    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    #[storage_mapper("voters")]
    fn voters(&self, proposal_id: u64) -> VecMapper<ManagedAddress>;

    #[storage_mapper("hasVoted")]
    fn has_voted(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<bool>;
}
