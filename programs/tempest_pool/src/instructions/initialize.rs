// programs/tempest_pool/src/instructions/initialize.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::PoolError;
use crate::events::PoolInitialized;
use crate::state::{PoolConfig, PoolState, VaultAuthority};

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + PoolConfig::INIT_SPACE,
        seeds = [PoolConfig::SEED_PREFIX],
        bump
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        init,
        payer = authority,
        space = 8 + PoolState::INIT_SPACE,
        seeds = [PoolState::SEED_PREFIX],
        bump
    )]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(
        init,
        payer = authority,
        space = 8 + VaultAuthority::INIT_SPACE,
        seeds = [VaultAuthority::SEED_PREFIX],
        bump
    )]
    pub vault_authority: Box<Account<'info, VaultAuthority>>,

    /// Pool asset vault
    #[account(
        init,
        payer = authority,
        token::mint = asset_mint,
        token::authority = vault_authority,
        seeds = [VaultAuthority::VAULT_SEED],
        bump
    )]
    pub asset_vault: Box<Account<'info, TokenAccount>>,

    pub asset_mint: Box<Account<'info, Mint>>,

    #[account(
        constraint = fee_recipient.mint == asset_mint.key() @ PoolError::InvalidFeeRecipient
    )]
    pub fee_recipient: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializePoolParams {
    /// Ledger authority PDA allowed to reserve and pay out
    pub policy_ledger: Pubkey,
    pub deposit_fee_bps: Option<u16>,
    pub deposit_cap: Option<u64>,
}

pub fn handler(ctx: Context<InitializePool>, params: InitializePoolParams) -> Result<()> {
    let clock = Clock::get()?;

    let fee_bps = params
        .deposit_fee_bps
        .unwrap_or(PoolConfig::DEFAULT_DEPOSIT_FEE_BPS);
    let deposit_cap = params
        .deposit_cap
        .unwrap_or(PoolConfig::DEFAULT_DEPOSIT_CAP);

    PoolConfig::validate_fee_bps(fee_bps)?;

    let config = &mut ctx.accounts.pool_config;
    config.authority = ctx.accounts.authority.key();
    config.asset_mint = ctx.accounts.asset_mint.key();
    config.fee_recipient = ctx.accounts.fee_recipient.key();
    config.deposit_fee_bps = fee_bps;
    config.deposit_cap = deposit_cap;
    config.policy_ledger = params.policy_ledger;
    config.deposits_paused = false;
    config.bump = ctx.bumps.pool_config;

    let state = &mut ctx.accounts.pool_state;
    state.total_shares = 0;
    state.total_assets = 0;
    state.total_reserved_shares = 0;
    state.total_fees_collected = 0;
    state.total_deposited = 0;
    state.total_paid_out = 0;
    state.bump = ctx.bumps.pool_state;

    let vault_authority = &mut ctx.accounts.vault_authority;
    vault_authority.asset_vault = ctx.accounts.asset_vault.key();
    vault_authority.asset_mint = ctx.accounts.asset_mint.key();
    vault_authority.bump = ctx.bumps.vault_authority;

    emit!(PoolInitialized {
        authority: ctx.accounts.authority.key(),
        asset_mint: ctx.accounts.asset_mint.key(),
        asset_vault: ctx.accounts.asset_vault.key(),
        fee_recipient: ctx.accounts.fee_recipient.key(),
        deposit_fee_bps: fee_bps,
        deposit_cap,
        policy_ledger: params.policy_ledger,
        timestamp: clock.unix_timestamp,
    });

    msg!("Collateral pool initialized");
    msg!("Deposit fee: {} bps", fee_bps);
    msg!("Deposit cap: {}", deposit_cap);

    Ok(())
}
