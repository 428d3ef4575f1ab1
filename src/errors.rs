// Every abort message carries its category as a prefix:
// `unauthorized`, `invalid input`, `invalid state`, `invariant violation`.

// ── Authorization ──

pub const ERR_MISSING_ATTESTER_ROLE: &str = "unauthorized: missing attester role";
pub const ERR_MISSING_ARBITER_ROLE: &str = "unauthorized: missing arbiter role";
pub const ERR_MISSING_REGISTRAR_ROLE: &str = "unauthorized: missing registrar role";
pub const ERR_MISSING_GOVERNANCE_ROLE: &str = "unauthorized: missing governance role";
pub const ERR_MISSING_PAUSER_ROLE: &str = "unauthorized: missing pauser role";
pub const ERR_MISSING_MINTER_ROLE: &str = "unauthorized: caller is neither the reserve nor a minter";
pub const ERR_NOT_RESERVE_OPERATOR: &str =
    "unauthorized: caller is neither the reserve nor governance";
pub const ERR_NOT_WATCHDOG: &str = "unauthorized: caller is not an active watchdog";
pub const ERR_NOT_PROPOSER_OR_ADMIN: &str = "unauthorized: only proposer or governance can cancel";
pub const ERR_QUORUM_NEEDS_CONSENSUS: &str =
    "unauthorized: required votes can only change through consensus";

// ── Validation ──

pub const ERR_ZERO_ADDRESS: &str = "invalid input: zero address";
pub const ERR_EMPTY_REASON: &str = "invalid input: empty reason";
pub const ERR_EMPTY_WALLET: &str = "invalid input: empty wallet";
pub const ERR_EMPTY_DESTINATION: &str = "invalid input: empty destination";
pub const ERR_ZERO_AMOUNT: &str = "invalid input: zero amount";
pub const ERR_AMOUNT_BELOW_MIN: &str = "invalid input: amount below minimum mint";
pub const ERR_AMOUNT_ABOVE_MAX: &str = "invalid input: amount above maximum single mint";
pub const ERR_LENGTH_MISMATCH: &str = "invalid input: recipients and amounts length mismatch";
pub const ERR_EMPTY_BATCH: &str = "invalid input: empty batch";
pub const ERR_WRONG_TOKEN: &str = "invalid input: payment is not the claim token";
pub const ERR_INVALID_PARAM_VALUE: &str = "invalid input: parameter value out of range";
pub const ERR_INVALID_QUORUM: &str = "invalid input: required votes out of range";
pub const ERR_INVALID_MINT_BOUNDS: &str = "invalid input: minimum mint exceeds maximum mint";
pub const ERR_INVALID_PROOF: &str = "invalid input: proof rejected by validator";

// ── State ──

pub const ERR_RESERVE_NOT_AUTHORIZED: &str = "invalid state: reserve not authorized";
pub const ERR_RESERVE_UNKNOWN: &str = "invalid state: reserve unknown";
pub const ERR_RESERVE_PAUSED: &str = "invalid state: reserve paused";
pub const ERR_RESERVE_NOT_PAUSED: &str = "invalid state: reserve not paused";
pub const ERR_SYSTEM_PAUSED: &str = "invalid state: system paused";
pub const ERR_SYSTEM_NOT_PAUSED: &str = "invalid state: system not paused";
pub const ERR_RESERVE_BUSY: &str = "invalid state: reserve operation already in progress";
pub const ERR_CUSTODIAN_NOT_REGISTERED: &str = "invalid state: custodian not registered";
pub const ERR_CUSTODIAN_ALREADY_REGISTERED: &str = "invalid state: custodian already registered";
pub const ERR_CUSTODIAN_NOT_ACTIVE: &str = "invalid state: custodian not active";
pub const ERR_INVALID_TRANSITION: &str = "invalid state: status transition not allowed";
pub const ERR_WALLET_ALREADY_REGISTERED: &str = "invalid state: wallet already registered";
pub const ERR_WALLET_NOT_REGISTERED: &str = "invalid state: wallet not registered to custodian";
pub const ERR_NO_ATTESTATION: &str = "invalid state: no attestation";
pub const ERR_ATTESTATION_ALREADY_INVALID: &str = "invalid state: attestation already invalidated";
pub const ERR_COLLABORATOR_MISSING: &str = "invalid state: collaborator not configured";
pub const ERR_ROLE_ALREADY_GRANTED: &str = "invalid state: role already granted";
pub const ERR_ROLE_NOT_GRANTED: &str = "invalid state: role not granted";
pub const ERR_LAST_GOVERNANCE_MEMBER: &str = "invalid state: cannot revoke last governance member";
pub const ERR_WATCHDOG_ALREADY_ACTIVE: &str = "invalid state: watchdog already active";
pub const ERR_WATCHDOG_NOT_ACTIVE: &str = "invalid state: watchdog not active";
pub const ERR_WATCHDOG_BELOW_QUORUM: &str =
    "invalid state: removal would leave fewer watchdogs than required votes";
pub const ERR_PROPOSAL_NOT_FOUND: &str = "invalid state: proposal not found";
pub const ERR_PROPOSAL_EXECUTED: &str = "invalid state: proposal already executed";
pub const ERR_PROPOSAL_CANCELLED: &str = "invalid state: proposal cancelled";
pub const ERR_PROPOSAL_EXPIRED: &str = "invalid state: proposal expired";
pub const ERR_ALREADY_VOTED: &str = "invalid state: already voted";
pub const ERR_QUORUM_NOT_REACHED: &str = "invalid state: quorum not reached";
pub const ERR_EXECUTION_DELAY: &str = "invalid state: execution delay not elapsed";
pub const ERR_PROPOSAL_HAS_VOTES: &str = "invalid state: proposal already has votes";
pub const ERR_PROPOSAL_APPROVED: &str = "invalid state: proposal already reached quorum";
pub const ERR_REDEMPTION_NOT_FOUND: &str = "invalid state: redemption not found";
pub const ERR_REDEMPTION_NOT_PENDING: &str = "invalid state: redemption already fulfilled or defaulted";
pub const ERR_REDEMPTION_TIMEOUT: &str = "invalid state: redemption timeout not reached";

// ── Invariant ──

pub const ERR_INSUFFICIENT_BACKING: &str = "invariant violation: insufficient backing";
pub const ERR_EXCEEDS_MINTING_CAP: &str = "invariant violation: exceeds minting cap";
pub const ERR_INSUFFICIENT_CAPACITY: &str = "invariant violation: insufficient minting capacity";
pub const ERR_BACKING_BELOW_MINTED: &str = "invariant violation: backing below minted";
pub const ERR_CAP_BELOW_MINTED: &str = "invariant violation: minting cap below minted";
pub const ERR_CAPACITY_BELOW_MINTED: &str = "invariant violation: custodian capacity below minted";
pub const ERR_OUTSTANDING_BALANCE: &str =
    "invariant violation: cannot deauthorize with outstanding balance";
pub const ERR_EXCEEDS_MINTED_SHARE: &str = "invariant violation: redemption exceeds minted share";
