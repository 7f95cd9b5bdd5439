// programs/tempest_pool/src/instructions/admin.rs

use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::errors::PoolError;
use crate::events::{DepositsPaused, DepositsUnpaused, PoolConfigUpdated, PoolSnapshot};
use crate::state::{PoolConfig, PoolState, VaultAuthority};

// ============================================================================
// CONFIG UPDATE
// ============================================================================

#[derive(Accounts)]
pub struct UpdatePoolConfig<'info> {
    #[account(
        mut,
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
        has_one = authority @ PoolError::NotAuthorized
    )]
    pub pool_config: Account<'info, PoolConfig>,

    #[account(
        seeds = [PoolState::SEED_PREFIX],
        bump = pool_state.bump,
    )]
    pub pool_state: Account<'info, PoolState>,

    /// Replacement fee recipient (optional)
    #[account(
        constraint = new_fee_recipient.mint == pool_config.asset_mint @ PoolError::InvalidFeeRecipient
    )]
    pub new_fee_recipient: Option<Account<'info, TokenAccount>>,

    pub authority: Signer<'info>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct UpdatePoolConfigParams {
    pub deposit_fee_bps: Option<u16>,
    pub deposit_cap: Option<u64>,
    pub policy_ledger: Option<Pubkey>,
}

pub fn update_pool_config(
    ctx: Context<UpdatePoolConfig>,
    params: UpdatePoolConfigParams,
) -> Result<()> {
    let clock = Clock::get()?;
    let reserved = ctx.accounts.pool_state.total_reserved_shares;
    let config = &mut ctx.accounts.pool_config;

    let old_fee = config.deposit_fee_bps;
    let old_cap = config.deposit_cap;
    let old_ledger = config.policy_ledger;

    if let Some(fee_bps) = params.deposit_fee_bps {
        PoolConfig::validate_fee_bps(fee_bps)?;
        config.deposit_fee_bps = fee_bps;
    }

    if let Some(cap) = params.deposit_cap {
        config.deposit_cap = cap;
    }

    if let Some(ledger) = params.policy_ledger {
        // Outstanding reservations belong to the current ledger
        if ledger != config.policy_ledger {
            require!(reserved == 0, PoolError::ReservationsOutstanding);
        }
        config.policy_ledger = ledger;
    }

    if let Some(recipient) = &ctx.accounts.new_fee_recipient {
        config.fee_recipient = recipient.key();
    }

    emit!(PoolConfigUpdated {
        old_deposit_fee_bps: old_fee,
        new_deposit_fee_bps: config.deposit_fee_bps,
        old_deposit_cap: old_cap,
        new_deposit_cap: config.deposit_cap,
        old_policy_ledger: old_ledger,
        new_policy_ledger: config.policy_ledger,
        fee_recipient: config.fee_recipient,
        updater: ctx.accounts.authority.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

// ============================================================================
// PAUSE
// ============================================================================

#[derive(Accounts)]
pub struct SetDepositsPaused<'info> {
    #[account(
        mut,
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
        has_one = authority @ PoolError::NotAuthorized
    )]
    pub pool_config: Account<'info, PoolConfig>,

    pub authority: Signer<'info>,
}

pub fn pause_deposits(ctx: Context<SetDepositsPaused>) -> Result<()> {
    let clock = Clock::get()?;
    ctx.accounts.pool_config.deposits_paused = true;

    emit!(DepositsPaused {
        authority: ctx.accounts.authority.key(),
        timestamp: clock.unix_timestamp,
    });

    msg!("Deposits paused");
    Ok(())
}

pub fn unpause_deposits(ctx: Context<SetDepositsPaused>) -> Result<()> {
    let clock = Clock::get()?;
    ctx.accounts.pool_config.deposits_paused = false;

    emit!(DepositsUnpaused {
        authority: ctx.accounts.authority.key(),
        timestamp: clock.unix_timestamp,
    });

    msg!("Deposits unpaused");
    Ok(())
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Permissionless: emit current totals for indexers
#[derive(Accounts)]
pub struct TakePoolSnapshot<'info> {
    #[account(
        seeds = [PoolState::SEED_PREFIX],
        bump = pool_state.bump,
    )]
    pub pool_state: Account<'info, PoolState>,

    #[account(
        seeds = [VaultAuthority::SEED_PREFIX],
        bump = vault_authority.bump,
    )]
    pub vault_authority: Account<'info, VaultAuthority>,

    #[account(
        constraint = asset_vault.key() == vault_authority.asset_vault @ PoolError::InvalidVault
    )]
    pub asset_vault: Account<'info, TokenAccount>,
}

pub fn take_pool_snapshot(ctx: Context<TakePoolSnapshot>) -> Result<()> {
    let clock = Clock::get()?;
    let state = &ctx.accounts.pool_state;

    // Every share held by depositors, capped at the unreserved supply
    let withdrawable_assets = state.max_withdraw(state.total_shares, false)?;
    let solvent = state.is_solvent();
    if !solvent {
        msg!(
            "WARNING: reserved {} exceeds supply {}",
            state.total_reserved_shares,
            state.total_shares
        );
    }

    emit!(PoolSnapshot {
        total_shares: state.total_shares,
        total_assets: state.total_assets,
        total_reserved_shares: state.total_reserved_shares,
        unreserved_shares: state.unreserved_shares(),
        withdrawable_assets,
        solvent,
        vault_balance: ctx.accounts.asset_vault.amount,
        total_fees_collected: state.total_fees_collected,
        total_deposited: state.total_deposited,
        total_paid_out: state.total_paid_out,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
