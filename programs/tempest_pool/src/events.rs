// programs/tempest_pool/src/events.rs

use anchor_lang::prelude::*;

/// Emitted when the pool is initialized
#[event]
pub struct PoolInitialized {
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub asset_vault: Pubkey,
    pub fee_recipient: Pubkey,
    pub deposit_fee_bps: u16,
    pub deposit_cap: u64,
    pub policy_ledger: Pubkey,
    pub timestamp: i64,
}

/// Emitted on every deposit (including premium deposits by the ledger)
#[event]
pub struct Deposited {
    pub depositor: Pubkey,
    pub receiver: Pubkey,
    pub gross_amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub shares_minted: u64,
    pub total_shares: u64,
    pub total_assets: u64,
    pub timestamp: i64,
}

/// Emitted when a holder burns shares for assets
#[event]
pub struct Withdrawn {
    pub holder: Pubkey,
    pub receiver: Pubkey,
    pub shares_burned: u64,
    pub assets: u64,
    pub total_shares: u64,
    pub total_assets: u64,
    pub timestamp: i64,
}

#[event]
pub struct SharesReserved {
    pub amount: u64,
    pub total_reserved_shares: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct SharesUnreserved {
    pub amount: u64,
    pub total_reserved_shares: u64,
    pub timestamp: i64,
}

/// Emitted when a claim payout leaves the pool
#[event]
pub struct PayoutWithdrawn {
    pub receiver: Pubkey,
    pub asset_amount: u64,
    pub reserved_released: u64,
    pub share_equivalent: u64,
    pub total_assets: u64,
    pub total_reserved_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct DepositsPaused {
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DepositsUnpaused {
    pub authority: Pubkey,
    pub timestamp: i64,
}

/// Emitted when admin parameters change
#[event]
pub struct PoolConfigUpdated {
    pub old_deposit_fee_bps: u16,
    pub new_deposit_fee_bps: u16,
    pub old_deposit_cap: u64,
    pub new_deposit_cap: u64,
    pub old_policy_ledger: Pubkey,
    pub new_policy_ledger: Pubkey,
    pub fee_recipient: Pubkey,
    pub updater: Pubkey,
    pub timestamp: i64,
}

/// Point-in-time pool totals for indexers
#[event]
pub struct PoolSnapshot {
    pub total_shares: u64,
    pub total_assets: u64,
    pub total_reserved_shares: u64,
    pub unreserved_shares: u64,
    /// Asset value depositors could take out right now
    pub withdrawable_assets: u64,
    pub solvent: bool,
    pub vault_balance: u64,
    pub total_fees_collected: u64,
    pub total_deposited: u64,
    pub total_paid_out: u64,
    pub timestamp: i64,
}
