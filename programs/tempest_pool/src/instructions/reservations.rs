// programs/tempest_pool/src/instructions/reservations.rs
//
// Ledger-only instructions. The pool tracks one aggregate reservation counter;
// per-policy bookkeeping lives in the policy ledger.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::errors::PoolError;
use crate::events::{PayoutWithdrawn, SharesReserved, SharesUnreserved};
use crate::state::{PoolConfig, PoolState, VaultAuthority};

// ============================================================================
// RESERVE / UNRESERVE
// ============================================================================

#[derive(Accounts)]
pub struct AdjustReservation<'info> {
    #[account(
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
    )]
    pub pool_config: Account<'info, PoolConfig>,

    #[account(
        mut,
        seeds = [PoolState::SEED_PREFIX],
        bump = pool_state.bump,
    )]
    pub pool_state: Account<'info, PoolState>,

    #[account(
        constraint = pool_config.is_policy_ledger(&policy_ledger.key()) @ PoolError::NotAuthorized
    )]
    pub policy_ledger: Signer<'info>,
}

pub fn reserve_shares(ctx: Context<AdjustReservation>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let state = &mut ctx.accounts.pool_state;

    state.reserve(amount)?;

    emit!(SharesReserved {
        amount,
        total_reserved_shares: state.total_reserved_shares,
        total_shares: state.total_shares,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Reserved {} shares ({} / {})",
        amount,
        state.total_reserved_shares,
        state.total_shares
    );

    Ok(())
}

pub fn unreserve_shares(ctx: Context<AdjustReservation>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let state = &mut ctx.accounts.pool_state;

    state.unreserve(amount)?;

    emit!(SharesUnreserved {
        amount,
        total_reserved_shares: state.total_reserved_shares,
        timestamp: clock.unix_timestamp,
    });

    msg!("Released {} reserved shares", amount);

    Ok(())
}

// ============================================================================
// WITHDRAW FOR PAYOUT
// ============================================================================

#[derive(Accounts)]
pub struct WithdrawForPayout<'info> {
    #[account(
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        mut,
        seeds = [PoolState::SEED_PREFIX],
        bump = pool_state.bump,
    )]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(
        seeds = [VaultAuthority::SEED_PREFIX],
        bump = vault_authority.bump,
    )]
    pub vault_authority: Box<Account<'info, VaultAuthority>>,

    #[account(
        mut,
        constraint = asset_vault.key() == vault_authority.asset_vault @ PoolError::InvalidVault
    )]
    pub asset_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = receiver_token_account.mint == pool_config.asset_mint @ PoolError::InvalidMint
    )]
    pub receiver_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        constraint = pool_config.is_policy_ledger(&policy_ledger.key()) @ PoolError::NotAuthorized
    )]
    pub policy_ledger: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Pay `asset_amount` out of the pool and release `reserved_amount` shares.
/// Shares are not burned: the loss is shared by every holder.
pub fn withdraw_for_payout(
    ctx: Context<WithdrawForPayout>,
    asset_amount: u64,
    reserved_amount: u64,
) -> Result<()> {
    let clock = Clock::get()?;

    let share_equivalent = ctx
        .accounts
        .pool_state
        .record_payout(asset_amount, reserved_amount)?;

    if asset_amount > 0 {
        let seeds = &[
            VaultAuthority::SEED_PREFIX,
            &[ctx.accounts.vault_authority.bump],
        ];
        let signer_seeds = &[&seeds[..]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                token::Transfer {
                    from: ctx.accounts.asset_vault.to_account_info(),
                    to: ctx.accounts.receiver_token_account.to_account_info(),
                    authority: ctx.accounts.vault_authority.to_account_info(),
                },
                signer_seeds,
            ),
            asset_amount,
        )?;
    }

    let state = &ctx.accounts.pool_state;
    emit!(PayoutWithdrawn {
        receiver: ctx.accounts.receiver_token_account.key(),
        asset_amount,
        reserved_released: reserved_amount,
        share_equivalent,
        total_assets: state.total_assets,
        total_reserved_shares: state.total_reserved_shares,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Payout {} against {} reserved shares ({} share equivalent)",
        asset_amount,
        reserved_amount,
        share_equivalent
    );

    Ok(())
}
