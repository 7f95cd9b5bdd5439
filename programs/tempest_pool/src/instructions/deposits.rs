// programs/tempest_pool/src/instructions/deposits.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::errors::PoolError;
use crate::events::{Deposited, Withdrawn};
use crate::state::{PoolConfig, PoolState, ShareAccount, VaultAuthority};

// ============================================================================
// DEPOSIT
// ============================================================================

/// Deposit assets and mint shares to `receiver`.
/// The policy ledger uses this same instruction (via CPI) for premiums.
#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
        constraint = !pool_config.deposits_paused @ PoolError::Paused
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
        constraint = fee_recipient.key() == pool_config.fee_recipient @ PoolError::InvalidFeeRecipient
    )]
    pub fee_recipient: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = depositor_token_account.mint == pool_config.asset_mint @ PoolError::InvalidMint,
        constraint = depositor_token_account.owner == depositor.key() @ PoolError::NotAuthorized
    )]
    pub depositor_token_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: Any wallet or PDA; only used as the share account seed
    pub receiver: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + ShareAccount::INIT_SPACE,
        seeds = [ShareAccount::SEED_PREFIX, receiver.key().as_ref()],
        bump
    )]
    pub receiver_share_account: Box<Account<'info, ShareAccount>>,

    #[account(mut)]
    pub depositor: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, PoolError::ZeroAmount);

    let clock = Clock::get()?;
    let config = &ctx.accounts.pool_config;
    let (fee, net) = config.split_deposit(amount);

    let state = &mut ctx.accounts.pool_state;
    let minted = state.record_deposit(net, fee, config.deposit_cap)?;

    if fee > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                token::Transfer {
                    from: ctx.accounts.depositor_token_account.to_account_info(),
                    to: ctx.accounts.fee_recipient.to_account_info(),
                    authority: ctx.accounts.depositor.to_account_info(),
                },
            ),
            fee,
        )?;
    }

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.depositor_token_account.to_account_info(),
                to: ctx.accounts.asset_vault.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        ),
        net,
    )?;

    let share_account = &mut ctx.accounts.receiver_share_account;
    if share_account.holder == Pubkey::default() {
        share_account.holder = ctx.accounts.receiver.key();
        share_account.bump = ctx.bumps.receiver_share_account;
    }
    share_account.credit(minted, net)?;

    let state = &ctx.accounts.pool_state;
    emit!(Deposited {
        depositor: ctx.accounts.depositor.key(),
        receiver: ctx.accounts.receiver.key(),
        gross_amount: amount,
        fee,
        net_amount: net,
        shares_minted: minted,
        total_shares: state.total_shares,
        total_assets: state.total_assets,
        timestamp: clock.unix_timestamp,
    });

    msg!("Deposited {} ({} fee) for {} shares", net, fee, minted);

    Ok(())
}

// ============================================================================
// WITHDRAW / REDEEM
// ============================================================================

/// Burn the holder's shares for assets
#[derive(Accounts)]
pub struct Withdraw<'info> {
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
        seeds = [ShareAccount::SEED_PREFIX, holder.key().as_ref()],
        bump = share_account.bump,
        constraint = share_account.holder == holder.key() @ PoolError::NotAuthorized
    )]
    pub share_account: Box<Account<'info, ShareAccount>>,

    #[account(
        mut,
        constraint = receiver_token_account.mint == pool_config.asset_mint @ PoolError::InvalidMint
    )]
    pub receiver_token_account: Box<Account<'info, TokenAccount>>,

    pub holder: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Withdraw an exact asset amount (share cost rounded up)
pub fn withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<()> {
    require!(assets > 0, PoolError::ZeroAmount);
    let shares = ctx.accounts.pool_state.preview_withdraw(assets)?;
    burn_and_pay(ctx, shares, assets)
}

/// Redeem an exact share amount (asset value rounded down)
pub fn redeem(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
    require!(shares > 0, PoolError::ZeroAmount);
    let assets = ctx.accounts.pool_state.convert_to_assets(shares)?;
    burn_and_pay(ctx, shares, assets)
}

fn burn_and_pay(ctx: Context<Withdraw>, shares: u64, assets: u64) -> Result<()> {
    let clock = Clock::get()?;
    let holder = ctx.accounts.holder.key();
    let is_ledger = ctx.accounts.pool_config.is_policy_ledger(&holder);

    let holder_shares = ctx.accounts.share_account.shares;
    ctx.accounts
        .pool_state
        .record_withdrawal(shares, assets, holder_shares, is_ledger)?;
    ctx.accounts.share_account.debit(shares)?;

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
        assets,
    )?;

    let state = &ctx.accounts.pool_state;
    emit!(Withdrawn {
        holder,
        receiver: ctx.accounts.receiver_token_account.key(),
        shares_burned: shares,
        assets,
        total_shares: state.total_shares,
        total_assets: state.total_assets,
        timestamp: clock.unix_timestamp,
    });

    msg!("Burned {} shares for {}", shares, assets);

    Ok(())
}
