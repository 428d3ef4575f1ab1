multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Roles: capabilities checked at every mutating entry point
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum Role {
    /// Submits collateral attestations.
    Attester,
    /// Moves custodian status, checks solvency, settles redemptions.
    Arbiter,
    /// Registers custodians and their wallets.
    Registrar,
    /// Administers reserves, parameters, roles and the watchdog set.
    Governance,
    /// Flips reserve-level and system-level pause flags.
    Pauser,
    /// Mints on behalf of a reserve.
    Minter,
}

// ============================================================
// Reserve Account: backing vs minted accounting
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ReserveType {
    /// Backed by a registered custodian; minting is also gated on
    /// custodian status and attested capacity.
    Permissioned,
    /// Gated by backing and cap only.
    Other,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct ReserveAccount<M: ManagedTypeApi> {
    pub authorized: bool,
    pub reserve_type: ReserveType,
    pub backing: BigUint<M>,
    pub minted: BigUint<M>,
    pub minting_cap: BigUint<M>,
    pub paused: bool,
    /// Number of backing updates applied since the reserve was first authorized
    pub backing_updates: u64,
}

impl<M: ManagedTypeApi> ReserveAccount<M> {
    pub fn new(reserve_type: ReserveType, minting_cap: BigUint<M>) -> Self {
        ReserveAccount {
            authorized: true,
            reserve_type,
            backing: BigUint::zero(),
            minted: BigUint::zero(),
            minting_cap,
            paused: false,
            backing_updates: 0,
        }
    }

    /// `minted <= backing` and `minted <= minting_cap`.
    pub fn is_within_invariants(&self) -> bool {
        self.minted <= self.backing && self.minted <= self.minting_cap
    }
}

// ============================================================
// Custodian: lifecycle record and status state machine
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum CustodianStatus {
    Active,
    UnderReview,
    /// Terminal. Record is retained, minting is closed for good.
    Revoked,
}

impl CustodianStatus {
    /// Exhaustive transition table. Self-transitions are rejected.
    pub fn can_transition_to(&self, next: &CustodianStatus) -> bool {
        matches!(
            (self, next),
            (CustodianStatus::Active, CustodianStatus::UnderReview)
                | (CustodianStatus::Active, CustodianStatus::Revoked)
                | (CustodianStatus::UnderReview, CustodianStatus::Active)
                | (CustodianStatus::UnderReview, CustodianStatus::Revoked)
        )
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct CustodianRecord<M: ManagedTypeApi> {
    pub status: CustodianStatus,
    pub minted_amount: BigUint<M>,
    pub max_capacity: BigUint<M>,
    pub registered_at: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct StatusChange<M: ManagedTypeApi> {
    pub from: CustodianStatus,
    pub to: CustodianStatus,
    pub actor: ManagedAddress<M>,
    pub reason: ManagedBuffer<M>,
    pub timestamp: u64,
}

// ============================================================
// Attestation: append-only collateral reports
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Attestation<M: ManagedTypeApi> {
    pub balance: BigUint<M>,
    pub timestamp: u64,
    pub attester: ManagedAddress<M>,
    pub is_valid: bool,
}

// ============================================================
// Governance parameters and collaborators
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum GovernanceParam {
    /// M in M-of-N. Only adjustable through consensus.
    RequiredVotes,
    StaleThreshold,
    ExecutionDelay,
    VotingPeriod,
    RedemptionTimeout,
    MinMintAmount,
    MaxSingleMint,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum CollaboratorKey {
    ProofValidator,
    BalanceLedger,
}

// ============================================================
// Proposal: M-of-N governance record
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalKind {
    StatusChange,
    WalletDeregistration,
    RedemptionDefault,
    ParamChange,
}

/// The governed action a proposal applies once executed.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub enum ProposalAction<M: ManagedTypeApi> {
    StatusChange {
        custodian: ManagedAddress<M>,
        new_status: CustodianStatus,
        reason: ManagedBuffer<M>,
    },
    WalletDeregistration {
        custodian: ManagedAddress<M>,
        wallet: ManagedBuffer<M>,
    },
    RedemptionDefault {
        redemption_id: u64,
        reason: ManagedBuffer<M>,
    },
    ParamChange {
        param: GovernanceParam,
        value: BigUint<M>,
    },
}

impl<M: ManagedTypeApi> ProposalAction<M> {
    pub fn kind(&self) -> ProposalKind {
        match self {
            ProposalAction::StatusChange { .. } => ProposalKind::StatusChange,
            ProposalAction::WalletDeregistration { .. } => ProposalKind::WalletDeregistration,
            ProposalAction::RedemptionDefault { .. } => ProposalKind::RedemptionDefault,
            ProposalAction::ParamChange { .. } => ProposalKind::ParamChange,
        }
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalStatus {
    /// Collecting votes, quorum not yet reached.
    Open,
    /// Quorum reached. Executable once the execution delay has elapsed.
    Approved,
    /// Action applied. Terminal.
    Executed,
    /// Withdrawn before a second vote. Terminal.
    Cancelled,
    /// Voting window closed without quorum. Terminal.
    Expired,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub proposer: ManagedAddress<M>,
    pub action: ProposalAction<M>,
    pub vote_count: u32,
    /// Quorum in force when the proposal was created
    pub required_votes: u32,
    pub created_at: u64,
    /// End of the voting window, fixed at creation
    pub expires_at: u64,
    /// Block timestamp at which vote_count first reached required_votes
    pub quorum_reached_at: Option<u64>,
    pub executed: bool,
    pub cancelled: bool,
}

impl<M: ManagedTypeApi> Proposal<M> {
    pub fn status(&self, now: u64) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if self.cancelled {
            ProposalStatus::Cancelled
        } else if self.quorum_reached_at.is_some() {
            ProposalStatus::Approved
        } else if now > self.expires_at {
            ProposalStatus::Expired
        } else {
            ProposalStatus::Open
        }
    }
}

// ============================================================
// Redemption: user exit against a custodian
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum RedemptionStatus {
    Pending,
    Fulfilled,
    Defaulted,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Redemption<M: ManagedTypeApi> {
    pub id: u64,
    pub custodian: ManagedAddress<M>,
    pub redeemer: ManagedAddress<M>,
    pub amount: BigUint<M>,
    /// Off-ledger address the custodian must pay out to
    pub destination: ManagedBuffer<M>,
    pub requested_at: u64,
    pub status: RedemptionStatus,
}
