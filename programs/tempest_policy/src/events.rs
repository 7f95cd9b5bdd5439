// programs/tempest_policy/src/events.rs

use anchor_lang::prelude::*;
use tempest_core::TriggerDirection;

/// Emitted when the ledger is initialized
#[event]
pub struct LedgerInitialized {
    pub authority: Pubkey,
    pub oracle: Pubkey,
    pub asset_mint: Pubkey,
    pub ledger_authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct LedgerConfigUpdated {
    pub old_oracle: Pubkey,
    pub new_oracle: Pubkey,
    pub issuance_paused: bool,
    pub authority: Pubkey,
    pub updater: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct HazardCategoryAdded {
    pub hazard_id: u16,
    pub name: String,
    pub direction: TriggerDirection,
    pub timestamp: i64,
}

#[event]
pub struct HazardCategoryRemoved {
    pub hazard_id: u16,
    pub policies_issued: u64,
    pub timestamp: i64,
}

/// Emitted per issued policy (single and batch)
#[event]
pub struct PolicyIssued {
    pub policy_id: u64,
    pub holder: Pubkey,
    pub purchaser: Pubkey,
    pub hazard_id: u16,
    pub start_time: i64,
    pub end_time: i64,
    pub max_coverage: u64,
    pub premium: u64,
    pub trigger_threshold: i64,
    pub reserved_shares: u64,
    pub unit_mint: Pubkey,
}

/// Settlement audit record (requested vs actually paid)
#[event]
pub struct PolicySettled {
    pub policy_id: u64,
    pub holder: Pubkey,
    pub observed_value: i64,
    pub requested_payout: u64,
    pub actual_payout: u64,
    pub shares_released: u64,
    pub timestamp: i64,
}

#[event]
pub struct PolicyReleased {
    pub policy_id: u64,
    pub shares_released: u64,
    pub caller: Pubkey,
    pub timestamp: i64,
}

/// Summary of an expiry sweep
#[event]
pub struct BatchReleaseCompleted {
    pub requested: u32,
    pub released: u32,
    pub skipped: u32,
    pub shares_released: u64,
    pub caller: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PolicyTransferred {
    pub policy_id: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub timestamp: i64,
}

/// Emitted when admin redeems unreserved premium shares
#[event]
pub struct PremiumSurplusWithdrawn {
    pub shares: u64,
    pub receiver: Pubkey,
    pub authority: Pubkey,
    pub timestamp: i64,
}
