// programs/tempest_policy/src/errors.rs

use anchor_lang::prelude::*;

#[error_code]
pub enum PolicyError {
    #[msg("Unauthorized: caller lacks permission")]
    NotAuthorized,

    #[msg("Only the designated trigger oracle can settle payouts")]
    NotOracle,

    #[msg("Policy already settled or released")]
    AlreadyPaid,

    #[msg("Coverage window has ended")]
    Expired,

    #[msg("Coverage window has not ended yet")]
    NotExpired,

    #[msg("Observed value does not meet the trigger threshold")]
    ThresholdNotMet,

    #[msg("Requested payout exceeds the policy's max coverage")]
    ExceedsMaxCoverage,

    #[msg("Hazard category missing or removed")]
    InvalidHazard,

    #[msg("Hazard category already exists")]
    HazardAlreadyExists,

    #[msg("Hazard category does not exist")]
    HazardNotFound,

    #[msg("Hazard name exceeds 32 bytes")]
    NameTooLong,

    #[msg("Pool cannot reserve the shares required for this coverage")]
    ReservationFailed,

    #[msg("Coverage is worth zero pool shares")]
    ZeroShares,

    #[msg("Batch is empty")]
    EmptyBatch,

    #[msg("Batch exceeds the maximum size")]
    BatchTooLarge,

    #[msg("Coverage duration must be between 1 and 3650 days")]
    InvalidDuration,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Policy issuance is paused")]
    IssuancePaused,

    #[msg("Signer is not the current policy holder")]
    NotPolicyHolder,

    #[msg("Account is not the policy PDA for the given id")]
    InvalidPolicyAccount,

    #[msg("Token account does not belong to the policy holder")]
    InvalidHolderAccount,

    #[msg("Ledger reservation total does not match the pool")]
    ReservationMismatch,

    #[msg("Math overflow in calculation")]
    MathOverflow,
}
