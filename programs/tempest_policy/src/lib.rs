// programs/tempest_policy/src/lib.rs
//
// Tempest Policy Ledger
// =====================
// Parametric policies backed by the collateral pool:
// - Open hazard registry (id -> name, trigger direction, validity)
// - Issuance deposits the premium into the pool and reserves claim-sized shares
// - One frozen, one-of-one SPL unit per policy; settlement pays its current holder
// - Oracle settlement pays min(requested, redeemable value of the reservation)
// - Permissionless expiry release returns reservations to the pool

use anchor_lang::prelude::*;

pub mod state;
pub mod errors;
pub mod events;
pub mod instructions;

use instructions::*;
use state::PolicyTerms;
use tempest_core::TriggerDirection;

declare_id!("9sC3xiqv8Eafp1M9u3XWg4GtheTPewXDW6mSGMYZs7Jd");

#[program]
pub mod tempest_policy {
    use super::*;

    // ==================== INITIALIZATION ====================

    pub fn initialize_ledger(
        ctx: Context<InitializeLedger>,
        params: InitializeLedgerParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Rotate oracle or admin, pause or resume issuance
    pub fn update_ledger_config(
        ctx: Context<UpdateLedgerConfig>,
        params: UpdateLedgerConfigParams,
    ) -> Result<()> {
        instructions::initialize::update_ledger_config(ctx, params)
    }

    // ==================== HAZARD REGISTRY ====================

    pub fn add_hazard_category(
        ctx: Context<AddHazardCategory>,
        hazard_id: u16,
        name: String,
        direction: TriggerDirection,
    ) -> Result<()> {
        instructions::hazards::add_hazard_category(ctx, hazard_id, name, direction)
    }

    pub fn remove_hazard_category(
        ctx: Context<RemoveHazardCategory>,
        hazard_id: u16,
    ) -> Result<()> {
        instructions::hazards::remove_hazard_category(ctx, hazard_id)
    }

    // ==================== ISSUANCE ====================

    /// Issue one policy to `holder`
    pub fn issue_policy(ctx: Context<IssuePolicy>, terms: PolicyTerms) -> Result<()> {
        instructions::issuance::issue_policy(ctx, terms)
    }

    /// Issue several policies with one premium deposit
    pub fn issue_policies_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, IssuePoliciesBatch<'info>>,
        items: Vec<PolicyTerms>,
    ) -> Result<()> {
        instructions::issuance::issue_policies_batch(ctx, items)
    }

    // ==================== SETTLEMENT ====================

    /// Pay a triggered policy (oracle only)
    pub fn settle_payout(
        ctx: Context<SettlePayout>,
        policy_id: u64,
        observed_value: i64,
        requested_payout: u64,
    ) -> Result<()> {
        instructions::settlement::settle_payout(ctx, policy_id, observed_value, requested_payout)
    }

    // ==================== EXPIRY ====================

    pub fn release_expired_policy(
        ctx: Context<ReleaseExpiredPolicy>,
        policy_id: u64,
    ) -> Result<()> {
        instructions::release::release_expired_policy(ctx, policy_id)
    }

    /// Sweep a mixed list of ids; skips anything not releasable
    pub fn release_expired_policies_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, ReleaseExpiredPoliciesBatch<'info>>,
        policy_ids: Vec<u64>,
    ) -> Result<()> {
        instructions::release::release_expired_policies_batch(ctx, policy_ids)
    }

    // ==================== OWNERSHIP ====================

    pub fn transfer_policy(ctx: Context<TransferPolicy>, policy_id: u64) -> Result<()> {
        instructions::transfer::transfer_policy(ctx, policy_id)
    }

    // ==================== TREASURY ====================

    /// Redeem premium shares above the outstanding reservation
    pub fn withdraw_premium_surplus(
        ctx: Context<WithdrawPremiumSurplus>,
        shares: u64,
    ) -> Result<()> {
        instructions::surplus::withdraw_premium_surplus(ctx, shares)
    }
}
