// programs/tempest_policy/src/instructions/surplus.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use tempest_pool::cpi::accounts::Withdraw;
use tempest_pool::program::TempestPool;
use tempest_pool::state::{PoolConfig, PoolState, ShareAccount};

use crate::errors::PolicyError;
use crate::events::PremiumSurplusWithdrawn;
use crate::state::LedgerConfig;

/// Redeem premium shares the ledger holds above the pool-wide reservation
#[derive(Accounts)]
pub struct WithdrawPremiumSurplus<'info> {
    #[account(
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        has_one = authority @ PolicyError::NotAuthorized
    )]
    pub ledger_config: Box<Account<'info, LedgerConfig>>,

    /// CHECK: PDA signer, no data
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump = ledger_config.authority_bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    #[account(
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
        seeds::program = tempest_pool::ID
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        mut,
        seeds = [PoolState::SEED_PREFIX],
        bump = pool_state.bump,
        seeds::program = tempest_pool::ID
    )]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(
        mut,
        seeds = [ShareAccount::SEED_PREFIX, ledger_authority.key().as_ref()],
        bump = ledger_share_account.bump,
        seeds::program = tempest_pool::ID
    )]
    pub ledger_share_account: Box<Account<'info, ShareAccount>>,

    /// CHECK: Verified by the pool program
    pub pool_vault_authority: UncheckedAccount<'info>,

    /// CHECK: Verified by the pool program
    #[account(mut)]
    pub pool_asset_vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub receiver_token_account: Box<Account<'info, TokenAccount>>,

    pub authority: Signer<'info>,

    pub pool_program: Program<'info, TempestPool>,
    pub token_program: Program<'info, Token>,
}

pub fn withdraw_premium_surplus(ctx: Context<WithdrawPremiumSurplus>, shares: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let ledger_shares = accounts.ledger_share_account.shares;
    let available = accounts.pool_state.max_redeem(ledger_shares, true);
    let available_assets = accounts.pool_state.max_withdraw(ledger_shares, true)?;
    msg!(
        "Premium surplus available: {} shares ({} assets)",
        available,
        available_assets
    );

    let bump = [accounts.ledger_config.authority_bump];
    let seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
    let signer_seeds = &[&seeds[..]];

    // The pool enforces the ledger's redeem cap
    tempest_pool::cpi::redeem(
        CpiContext::new_with_signer(
            accounts.pool_program.to_account_info(),
            Withdraw {
                pool_config: accounts.pool_config.to_account_info(),
                pool_state: accounts.pool_state.to_account_info(),
                vault_authority: accounts.pool_vault_authority.to_account_info(),
                asset_vault: accounts.pool_asset_vault.to_account_info(),
                share_account: accounts.ledger_share_account.to_account_info(),
                receiver_token_account: accounts.receiver_token_account.to_account_info(),
                holder: accounts.ledger_authority.to_account_info(),
                token_program: accounts.token_program.to_account_info(),
            },
            signer_seeds,
        ),
        shares,
    )?;
    accounts.pool_state.reload()?;

    accounts
        .ledger_config
        .check_reservation_sync(accounts.pool_state.total_reserved_shares)?;

    emit!(PremiumSurplusWithdrawn {
        shares,
        receiver: accounts.receiver_token_account.key(),
        authority: accounts.authority.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
