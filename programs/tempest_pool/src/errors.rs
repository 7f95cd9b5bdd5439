// programs/tempest_pool/src/errors.rs

use anchor_lang::prelude::*;

#[error_code]
pub enum PoolError {
    #[msg("Unauthorized: caller lacks permission")]
    NotAuthorized,

    #[msg("Deposits are paused")]
    Paused,

    #[msg("Deposit would exceed the pool deposit cap")]
    CapacityExceeded,

    #[msg("Not enough unreserved shares in the pool")]
    InsufficientLiquidity,

    #[msg("Release exceeds the reserved share total")]
    Underflow,

    #[msg("Payout is worth more shares than the reservation")]
    ExceedsReservation,

    #[msg("Deposit too small to mint a share")]
    ZeroShares,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Amount exceeds the holder's withdrawable maximum")]
    ExceedsMaxWithdraw,

    #[msg("Invalid basis points value (must be <= 1000)")]
    InvalidFeeBps,

    #[msg("Invalid asset mint")]
    InvalidMint,

    #[msg("Invalid vault account")]
    InvalidVault,

    #[msg("Invalid fee recipient account")]
    InvalidFeeRecipient,

    #[msg("Policy ledger cannot change while reservations are outstanding")]
    ReservationsOutstanding,

    #[msg("Math overflow in calculation")]
    MathOverflow,
}
