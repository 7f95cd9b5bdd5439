// programs/tempest_pool/src/lib.rs
//
// Tempest Collateral Pool
// =======================
// Share-based collateral pool backing parametric policies:
// - Depositors receive shares priced at pool assets / total shares
// - Premiums are deposited by the policy ledger and accrue to every share
// - The ledger reserves shares per policy; reserved backing cannot be withdrawn
// - Payouts leave the pool without burning shares, so losses are mutualized

use anchor_lang::prelude::*;

pub mod state;
pub mod errors;
pub mod events;
pub mod instructions;

use instructions::*;

declare_id!("3wuKtyEfMJHKdG7gcrggzMWmKVM5iEok5aiGHDP5VTiu");

#[program]
pub mod tempest_pool {
    use super::*;

    // ==================== INITIALIZATION ====================

    /// Initialize pool config, state and the asset vault
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        params: InitializePoolParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    // ==================== DEPOSITS & WITHDRAWALS ====================

    /// Deposit assets, minting shares to the receiver
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposits::deposit(ctx, amount)
    }

    /// Withdraw an exact asset amount
    pub fn withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<()> {
        instructions::deposits::withdraw(ctx, assets)
    }

    /// Redeem an exact share amount
    pub fn redeem(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
        instructions::deposits::redeem(ctx, shares)
    }

    // ==================== RESERVATIONS (LEDGER ONLY) ====================

    pub fn reserve_shares(ctx: Context<AdjustReservation>, amount: u64) -> Result<()> {
        instructions::reservations::reserve_shares(ctx, amount)
    }

    pub fn unreserve_shares(ctx: Context<AdjustReservation>, amount: u64) -> Result<()> {
        instructions::reservations::unreserve_shares(ctx, amount)
    }

    /// Pay a claim and release its whole reservation
    pub fn withdraw_for_payout(
        ctx: Context<WithdrawForPayout>,
        asset_amount: u64,
        reserved_amount: u64,
    ) -> Result<()> {
        instructions::reservations::withdraw_for_payout(ctx, asset_amount, reserved_amount)
    }

    // ==================== ADMIN ====================

    pub fn update_pool_config(
        ctx: Context<UpdatePoolConfig>,
        params: UpdatePoolConfigParams,
    ) -> Result<()> {
        instructions::admin::update_pool_config(ctx, params)
    }

    pub fn pause_deposits(ctx: Context<SetDepositsPaused>) -> Result<()> {
        instructions::admin::pause_deposits(ctx)
    }

    pub fn unpause_deposits(ctx: Context<SetDepositsPaused>) -> Result<()> {
        instructions::admin::unpause_deposits(ctx)
    }

    /// Emit current pool totals
    pub fn take_pool_snapshot(ctx: Context<TakePoolSnapshot>) -> Result<()> {
        instructions::admin::take_pool_snapshot(ctx)
    }
}
